use crate::error::GameError;
use crate::types::*;
use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    CreateRoom {
        player_name: String,
    },
    JoinRoom {
        player_name: String,
        room_code: String,
    },
    // Host-only messages
    StartGame {
        #[serde(default)]
        options: GameOptions,
    },
    ProceedToVoting,
    PlayAgain,
    // In-game messages
    MarkReady,
    SubmitWord {
        word: String,
    },
    /// Negative `suspect_index` is a skip vote
    CastVote {
        suspect_index: i64,
    },
    LeaveRoom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        player_id: PlayerId,
        server_now: String,
    },
    RoomCreated {
        room_code: RoomCode,
        players: Vec<Player>,
    },
    RoomJoined {
        room_code: RoomCode,
        players: Vec<Player>,
    },
    /// Sent to the players already in the room when someone joins
    PlayerJoined {
        players: Vec<Player>,
    },
    PlayerLeft {
        players: Vec<Player>,
        left_player_name: String,
    },
    /// Acknowledges a successful `start_game` to the host
    StartAccepted,
    /// Per-player: each player gets their own reveal
    GameStarted {
        phase: Phase,
        reveal: RevealPayload,
        players: Vec<Player>,
        turn_order: Vec<usize>,
        my_index: usize,
    },
    ReadyUpdate {
        ready: usize,
        total: usize,
    },
    PhaseChange {
        phase: Phase,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_turn_index: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        submitted_words: Option<Vec<SubmittedWord>>,
    },
    WordSubmitted {
        submitted_words: Vec<SubmittedWord>,
        current_turn_index: Option<usize>,
    },
    /// Voting progress only; individual votes stay hidden until results
    VoteUpdate {
        votes_received: usize,
        total_players: usize,
    },
    GameResults {
        results: GameResults,
    },
    GameReset {
        players: Vec<Player>,
    },
    RoundAborted {
        reason: String,
        players: Vec<Player>,
    },
    LeftRoom,
    Error {
        code: String,
        msg: String,
    },
}

impl From<GameError> for ServerMessage {
    fn from(err: GameError) -> Self {
        ServerMessage::Error {
            code: err.code().to_string(),
            msg: err.to_string(),
        }
    }
}

/// Outbound delivery instruction produced by a room transition
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Broadcast to every connection bound to the room
    ToRoom { code: RoomCode, msg: ServerMessage },
    /// Unicast to a single connection
    ToPlayer { player_id: PlayerId, msg: ServerMessage },
}
