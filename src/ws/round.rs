//! In-game message handlers
//!
//! Successful actions answer through room broadcasts, so most of these only
//! return a message on error.

use crate::error::GameResult;
use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::{GameOptions, PlayerId};
use std::sync::Arc;

fn error_only(result: GameResult<()>) -> Option<ServerMessage> {
    result.err().map(ServerMessage::from)
}

pub async fn handle_start_game(
    state: &Arc<AppState>,
    player_id: &PlayerId,
    options: GameOptions,
) -> Option<ServerMessage> {
    match state.start_game(player_id, &options).await {
        Ok(()) => Some(ServerMessage::StartAccepted),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_mark_ready(state: &Arc<AppState>, player_id: &PlayerId) -> Option<ServerMessage> {
    error_only(state.mark_ready(player_id).await)
}

pub async fn handle_submit_word(
    state: &Arc<AppState>,
    player_id: &PlayerId,
    word: String,
) -> Option<ServerMessage> {
    error_only(state.submit_word(player_id, &word).await)
}

pub async fn handle_proceed_to_voting(
    state: &Arc<AppState>,
    player_id: &PlayerId,
) -> Option<ServerMessage> {
    error_only(state.proceed_to_voting(player_id).await)
}

pub async fn handle_cast_vote(
    state: &Arc<AppState>,
    player_id: &PlayerId,
    suspect_index: i64,
) -> Option<ServerMessage> {
    error_only(state.cast_vote(player_id, suspect_index).await)
}

pub async fn handle_play_again(state: &Arc<AppState>, player_id: &PlayerId) -> Option<ServerMessage> {
    error_only(state.play_again(player_id).await)
}
