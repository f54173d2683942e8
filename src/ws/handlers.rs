//! WebSocket message dispatch
//!
//! Every message is handled on behalf of the connection that sent it. The
//! returned message (if any) goes back to that connection only; everything
//! other players need to see is delivered through their own queues.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::PlayerId;
use std::sync::Arc;

use super::{lobby, round};

/// Parse a text frame and handle it; malformed frames get a `PARSE_ERROR`
pub async fn handle_text(
    text: &str,
    player_id: &PlayerId,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => handle_message(msg, player_id, state).await,
        Err(e) => {
            tracing::warn!("Failed to parse client message: {}", e);
            Some(ServerMessage::Error {
                code: "PARSE_ERROR".to_string(),
                msg: format!("Invalid message format: {}", e),
            })
        }
    }
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    player_id: &PlayerId,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        // Lobby messages
        ClientMessage::CreateRoom { player_name } => {
            lobby::handle_create_room(state, player_id, player_name).await
        }

        ClientMessage::JoinRoom {
            player_name,
            room_code,
        } => lobby::handle_join_room(state, player_id, player_name, room_code).await,

        ClientMessage::LeaveRoom => lobby::handle_leave_room(state, player_id).await,

        // Host-only messages (the room checks who the host is)
        ClientMessage::StartGame { options } => {
            round::handle_start_game(state, player_id, options).await
        }

        ClientMessage::ProceedToVoting => round::handle_proceed_to_voting(state, player_id).await,

        ClientMessage::PlayAgain => round::handle_play_again(state, player_id).await,

        // In-game messages
        ClientMessage::MarkReady => round::handle_mark_ready(state, player_id).await,

        ClientMessage::SubmitWord { word } => round::handle_submit_word(state, player_id, word).await,

        ClientMessage::CastVote { suspect_index } => {
            round::handle_cast_vote(state, player_id, suspect_index).await
        }
    }
}
