use super::AppState;
use crate::protocol::ServerMessage;
use crate::types::*;
use tokio::sync::mpsc;

/// Outbound half of a live WebSocket plus the room it is bound to
#[derive(Debug)]
pub struct Connection {
    pub tx: mpsc::UnboundedSender<ServerMessage>,
    pub room: Option<RoomCode>,
}

impl AppState {
    /// Register a new connection and hand back its id and outbound queue
    pub async fn connect(&self) -> (PlayerId, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let player_id = ulid::Ulid::new().to_string();

        self.connections
            .write()
            .await
            .insert(player_id.clone(), Connection { tx, room: None });
        tracing::debug!("Connection {} registered", player_id);
        (player_id, rx)
    }

    /// Forget a connection entirely; returns the room it was bound to
    pub(crate) async fn drop_connection(&self, player_id: &str) -> Option<RoomCode> {
        self.connections
            .write()
            .await
            .remove(player_id)
            .and_then(|conn| conn.room)
    }

    pub async fn room_of(&self, player_id: &str) -> Option<RoomCode> {
        self.connections
            .read()
            .await
            .get(player_id)
            .and_then(|conn| conn.room.clone())
    }

    pub(crate) async fn bind_room(&self, player_id: &str, code: RoomCode) {
        if let Some(conn) = self.connections.write().await.get_mut(player_id) {
            conn.room = Some(code);
        }
    }

    pub(crate) async fn unbind_room(&self, player_id: &str) {
        if let Some(conn) = self.connections.write().await.get_mut(player_id) {
            conn.room = None;
        }
    }

    /// Number of live connections
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}
