//! Small HTTP JSON endpoints next to the WebSocket.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsResponse {
    pub active_rooms: usize,
    pub games_played: u64,
}

/// Live room count and total games played.
///
/// GET /api/stats
///
/// `games_played` comes from the external counter when one is configured
/// and reachable, otherwise from this process.
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        active_rooms: state.active_rooms().await,
        games_played: state.stats.total().await,
    })
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
