//! Board-scoped pub/sub rooms. One broadcast channel per board id, created
//! on demand and dropped once nobody is listening. Delivery is FIFO per
//! subscriber; lagged subscribers skip ahead rather than stall the room.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use corkboard_domain::{BoardEvent, BoardId};
use tokio::sync::broadcast;

const ROOM_CAPACITY: usize = 256;

#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<Mutex<HashMap<BoardId, broadcast::Sender<BoardEvent>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a board's room, creating the room if needed.
    pub fn subscribe(&self, board_id: BoardId) -> broadcast::Receiver<BoardEvent> {
        let mut rooms = self.rooms.lock().expect("room registry lock poisoned");
        rooms
            .entry(board_id)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to its board's room. Returns how many sessions
    /// received it; zero when nobody is watching the board, which also
    /// retires the idle room.
    pub fn publish(&self, event: BoardEvent) -> usize {
        let board_id = event.board_id();
        let mut rooms = self.rooms.lock().expect("room registry lock poisoned");
        let Some(sender) = rooms.get(&board_id) else {
            return 0;
        };
        match sender.send(event) {
            Ok(count) => {
                tracing::debug!(%board_id, subscribers = count, "event published to board room");
                count
            }
            Err(_) => {
                rooms.remove(&board_id);
                tracing::debug!(%board_id, "board room retired, no subscribers left");
                0
            }
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().expect("room registry lock poisoned").len()
    }
}
