use super::room::Room;
use crate::error::{GameError, GameResult};
use crate::types::*;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A room shared between connection tasks; all transitions hold its lock
pub type SharedRoom = Arc<Mutex<Room>>;

/// Generate a random room code from the unambiguous alphabet
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> RoomCode {
    let code = (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_CHARS[rng.random_range(0..ROOM_CODE_CHARS.len())] as char)
        .collect();
    RoomCode::from_generated(code)
}

/// All live rooms keyed by code
#[derive(Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, SharedRoom>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room with a fresh code and the host as its first player
    pub fn create_room<R: Rng + ?Sized>(
        &mut self,
        host_id: PlayerId,
        host_name: String,
        rng: &mut R,
    ) -> (RoomCode, SharedRoom) {
        // Regenerate on collision (rare with ~1M codes)
        let code = loop {
            let code = generate_room_code(rng);
            if !self.rooms.contains_key(&code) {
                break code;
            }
        };

        let room = Room::new(code.clone(), host_id, host_name, rng);
        let shared = Arc::new(Mutex::new(room));
        self.rooms.insert(code.clone(), shared.clone());

        tracing::info!("Created room {} ({} active)", code, self.rooms.len());
        (code, shared)
    }

    pub fn find(&self, code: &RoomCode) -> Option<SharedRoom> {
        self.rooms.get(code).cloned()
    }

    /// Look up a room by user-typed code (case-insensitive, whitespace trimmed)
    pub fn find_by_input(&self, input: &str) -> GameResult<(RoomCode, SharedRoom)> {
        let code = RoomCode::parse(input)?;
        match self.find(&code) {
            Some(room) => Ok((code, room)),
            None => Err(GameError::RoomNotFound(code.to_string())),
        }
    }

    pub fn remove(&mut self, code: &RoomCode) -> Option<SharedRoom> {
        let removed = self.rooms.remove(code);
        if removed.is_some() {
            tracing::info!("Removed empty room {} ({} active)", code, self.rooms.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_room_code_format() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
            assert!(code.as_str().bytes().all(|b| ROOM_CODE_CHARS.contains(&b)));
            assert!(RoomCode::parse(code.as_str()).is_ok());
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut registry = RoomRegistry::new();
        let (code, _) = registry.create_room("p0".to_string(), "Host".to_string(), &mut rng);

        let (found_code, room) = registry
            .find_by_input(&format!("  {}  ", code.as_str().to_lowercase()))
            .unwrap();
        assert_eq!(found_code, code);

        let room = room.lock().await;
        assert_eq!(room.host_id, "p0");
        assert_eq!(room.players[0].name, "Host");
    }

    #[test]
    fn test_find_unknown_room() {
        let registry = RoomRegistry::new();
        assert_eq!(
            registry.find_by_input("ZZZZ").err(),
            Some(GameError::RoomNotFound("ZZZZ".to_string()))
        );
        assert_eq!(
            registry.find_by_input("A1").err(),
            Some(GameError::InvalidRoomCode("A1".to_string()))
        );
    }

    #[test]
    fn test_codes_unique_among_live_rooms() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut registry = RoomRegistry::new();
        for i in 0..300 {
            registry.create_room(format!("p{}", i), "Host".to_string(), &mut rng);
        }
        assert_eq!(registry.len(), 300);
    }

    #[test]
    fn test_remove_room() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut registry = RoomRegistry::new();
        let (code, _) = registry.create_room("p0".to_string(), "Host".to_string(), &mut rng);

        assert!(registry.remove(&code).is_some());
        assert!(registry.is_empty());
        assert!(registry.remove(&code).is_none());
    }
}
