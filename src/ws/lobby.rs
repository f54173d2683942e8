//! Lobby message handlers
//!
//! Creating, joining and leaving rooms.

use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::PlayerId;
use std::sync::Arc;

pub async fn handle_create_room(
    state: &Arc<AppState>,
    player_id: &PlayerId,
    player_name: String,
) -> Option<ServerMessage> {
    match state.create_room(player_id, &player_name).await {
        Ok((room_code, players)) => Some(ServerMessage::RoomCreated { room_code, players }),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_join_room(
    state: &Arc<AppState>,
    player_id: &PlayerId,
    player_name: String,
    room_code: String,
) -> Option<ServerMessage> {
    tracing::info!("Join request for room {:?}", room_code);
    match state.join_room(player_id, &player_name, &room_code).await {
        Ok((room_code, players)) => Some(ServerMessage::RoomJoined { room_code, players }),
        Err(e) => {
            tracing::debug!("Join failed: {}", e);
            Some(e.into())
        }
    }
}

pub async fn handle_leave_room(state: &Arc<AppState>, player_id: &PlayerId) -> Option<ServerMessage> {
    match state.leave_room(player_id).await {
        Ok(()) => Some(ServerMessage::LeftRoom),
        Err(e) => Some(e.into()),
    }
}
