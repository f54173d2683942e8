pub mod connections;
pub mod registry;
pub mod roles;
pub mod room;
pub mod turn;
pub mod vote;
pub mod words;

use crate::error::{GameError, GameResult};
use crate::metrics::PlayStats;
use crate::types::*;
use connections::Connection;
use registry::{RoomRegistry, SharedRoom};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// New position of `index` after the player at `removed` left, or `None` if
/// `index` was the one removed.
pub(crate) fn shift_index(index: usize, removed: usize) -> Option<usize> {
    match index.cmp(&removed) {
        std::cmp::Ordering::Less => Some(index),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(index - 1),
    }
}

/// Shared application state
///
/// Lock order: a room's mutex may be held while taking `connections`;
/// `rooms` is only held long enough to clone a room handle out of it.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<RoomRegistry>>,
    pub connections: Arc<RwLock<HashMap<PlayerId, Connection>>>,
    pub stats: PlayStats,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_stats(PlayStats::new())
    }

    pub fn with_stats(stats: PlayStats) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(RoomRegistry::new())),
            connections: Arc::new(RwLock::new(HashMap::new())),
            stats,
        }
    }

    /// The room this connection is currently bound to
    async fn bound_room(&self, player_id: &str) -> GameResult<(RoomCode, SharedRoom)> {
        let code = self.room_of(player_id).await.ok_or(GameError::NotInRoom)?;
        let room = self.rooms.read().await.find(&code);
        match room {
            Some(room) => Ok((code, room)),
            None => Err(GameError::RoomNotFound(code.to_string())),
        }
    }

    async fn ensure_unbound(&self, player_id: &str) -> GameResult<()> {
        match self.room_of(player_id).await {
            Some(code) => Err(GameError::AlreadyInRoom(code)),
            None => Ok(()),
        }
    }

    /// Create a room with this connection as host
    pub async fn create_room(
        &self,
        player_id: &PlayerId,
        player_name: &str,
    ) -> GameResult<(RoomCode, Vec<Player>)> {
        self.ensure_unbound(player_id).await?;
        let name = room::normalize_player_name(player_name)?;

        let mut rooms = self.rooms.write().await;
        let (code, room) = rooms.create_room(player_id.clone(), name, &mut rand::rng());
        drop(rooms);

        let room = room.lock().await;
        self.bind_room(player_id, code.clone()).await;
        Ok((code, room.players.clone()))
    }

    /// Join an existing room by user-typed code
    pub async fn join_room(
        &self,
        player_id: &PlayerId,
        player_name: &str,
        room_code: &str,
    ) -> GameResult<(RoomCode, Vec<Player>)> {
        self.ensure_unbound(player_id).await?;
        let name = room::normalize_player_name(player_name)?;
        let (code, room) = self.rooms.read().await.find_by_input(room_code)?;

        let mut room = room.lock().await;
        let directives = room.join(player_id.clone(), name, &mut rand::rng())?;
        self.bind_room(player_id, code.clone()).await;
        self.deliver(directives).await;
        Ok((code, room.players.clone()))
    }

    pub async fn start_game(&self, player_id: &str, options: &GameOptions) -> GameResult<()> {
        let (_, room) = self.bound_room(player_id).await?;

        let mut room = room.lock().await;
        let directives = room.start_game(player_id, options, &mut rand::rng())?;
        if directives.is_empty() {
            return Ok(());
        }
        let player_count = room.players.len();
        self.deliver(directives).await;
        drop(room);

        self.stats.record_game_started(player_count);
        Ok(())
    }

    pub async fn mark_ready(&self, player_id: &str) -> GameResult<()> {
        let (_, room) = self.bound_room(player_id).await?;
        let mut room = room.lock().await;
        let directives = room.mark_ready(player_id);
        self.deliver(directives).await;
        Ok(())
    }

    pub async fn submit_word(&self, player_id: &str, word: &str) -> GameResult<()> {
        let (_, room) = self.bound_room(player_id).await?;
        let mut room = room.lock().await;
        let directives = room.submit_word(player_id, word);
        self.deliver(directives).await;
        Ok(())
    }

    pub async fn proceed_to_voting(&self, player_id: &str) -> GameResult<()> {
        let (_, room) = self.bound_room(player_id).await?;
        let mut room = room.lock().await;
        let directives = room.proceed_to_voting(player_id)?;
        self.deliver(directives).await;
        Ok(())
    }

    pub async fn cast_vote(&self, player_id: &str, suspect_index: i64) -> GameResult<()> {
        let (_, room) = self.bound_room(player_id).await?;
        let mut room = room.lock().await;
        let directives = room.cast_vote(player_id, suspect_index);
        self.deliver(directives).await;
        Ok(())
    }

    pub async fn play_again(&self, player_id: &str) -> GameResult<()> {
        let (_, room) = self.bound_room(player_id).await?;
        let mut room = room.lock().await;
        let directives = room.play_again(player_id)?;
        self.deliver(directives).await;
        Ok(())
    }

    /// Leave the current room but keep the connection open
    pub async fn leave_room(&self, player_id: &str) -> GameResult<()> {
        let code = self.room_of(player_id).await.ok_or(GameError::NotInRoom)?;
        self.remove_from_room(player_id, &code, true).await;
        Ok(())
    }

    /// Connection closed: forget it and remove its player from any room
    pub async fn disconnect(&self, player_id: &str) {
        if let Some(code) = self.drop_connection(player_id).await {
            self.remove_from_room(player_id, &code, false).await;
        }
        tracing::debug!("Connection {} dropped", player_id);
    }

    async fn remove_from_room(&self, player_id: &str, code: &RoomCode, unbind: bool) {
        let room = self.rooms.read().await.find(code);
        let Some(room) = room else {
            if unbind {
                self.unbind_room(player_id).await;
            }
            return;
        };

        let mut guard = room.lock().await;
        if unbind {
            self.unbind_room(player_id).await;
        }
        let Some(departure) = guard.remove_player(player_id) else {
            return;
        };
        self.deliver(departure.directives).await;
        drop(guard);

        if departure.room_empty {
            self.rooms.write().await.remove(code);
        }
    }

    pub async fn active_rooms(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
