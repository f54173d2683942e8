use crate::protocol::{Directive, ServerMessage};
use crate::state::AppState;
use crate::types::RoomCode;

impl AppState {
    /// Deliver the output of a room transition to the affected connections
    pub async fn deliver(&self, directives: Vec<Directive>) {
        for directive in directives {
            match directive {
                Directive::ToRoom { code, msg } => self.broadcast_to_room(&code, msg).await,
                Directive::ToPlayer { player_id, msg } => {
                    self.send_to_player(&player_id, msg).await
                }
            }
        }
    }

    /// Queue a message for one connection. A closed or unknown connection is
    /// skipped; its disconnect cleanup is already on the way.
    pub async fn send_to_player(&self, player_id: &str, msg: ServerMessage) {
        let connections = self.connections.read().await;
        match connections.get(player_id) {
            Some(conn) => {
                if conn.tx.send(msg).is_err() {
                    tracing::debug!("Dropping message for closed connection {}", player_id);
                }
            }
            None => tracing::debug!("Dropping message for unknown connection {}", player_id),
        }
    }

    /// Queue a message for every connection bound to `code`
    pub async fn broadcast_to_room(&self, code: &RoomCode, msg: ServerMessage) {
        let connections = self.connections.read().await;
        // Ignore send errors (receiver task already gone)
        for conn in connections
            .values()
            .filter(|conn| conn.room.as_ref() == Some(code))
        {
            let _ = conn.tx.send(msg.clone());
        }
    }
}
