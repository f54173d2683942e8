//! Failures reported back to the connection that triggered them

use crate::types::RoomCode;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Room {0} not found")]
    RoomNotFound(String),

    #[error("Room is full")]
    RoomFull,

    #[error("Game already in progress")]
    GameInProgress,

    #[error("Only the host can {0}")]
    NotAuthorized(&'static str),

    #[error("Need at least {0} players")]
    NotEnoughPlayers(usize),

    #[error("Invalid room code: {0:?}")]
    InvalidRoomCode(String),

    #[error("Player name must not be empty")]
    InvalidName,

    #[error("Not in a room")]
    NotInRoom,

    #[error("Already in room {0}")]
    AlreadyInRoom(RoomCode),
}

impl GameError {
    /// Stable machine-readable code sent in `ServerMessage::Error`
    pub fn code(&self) -> &'static str {
        match self {
            GameError::RoomNotFound(_) => "ROOM_NOT_FOUND",
            GameError::RoomFull => "ROOM_FULL",
            GameError::GameInProgress => "GAME_IN_PROGRESS",
            GameError::NotAuthorized(_) => "NOT_AUTHORIZED",
            GameError::NotEnoughPlayers(_) => "NOT_ENOUGH_PLAYERS",
            GameError::InvalidRoomCode(_) => "INVALID_ROOM_CODE",
            GameError::InvalidName => "INVALID_NAME",
            GameError::NotInRoom => "NOT_IN_ROOM",
            GameError::AlreadyInRoom(_) => "ALREADY_IN_ROOM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_messages() {
        let err = GameError::NotEnoughPlayers(3);
        assert_eq!(err.code(), "NOT_ENOUGH_PLAYERS");
        assert_eq!(err.to_string(), "Need at least 3 players");

        let err = GameError::NotAuthorized("start the game");
        assert_eq!(err.code(), "NOT_AUTHORIZED");
        assert_eq!(err.to_string(), "Only the host can start the game");
    }
}
