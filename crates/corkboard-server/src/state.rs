use std::sync::Arc;

use corkboard_persistence::DocumentStore;

use crate::realtime::RoomRegistry;
use crate::services::{BoardService, CardService, ColumnService, InvitationService};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub rooms: RoomRegistry,
    pub boards: BoardService,
    pub columns: ColumnService,
    pub cards: CardService,
    pub invitations: InvitationService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, rooms: RoomRegistry) -> Self {
        Self {
            boards: BoardService::new(Arc::clone(&store), rooms.clone()),
            columns: ColumnService::new(Arc::clone(&store), rooms.clone()),
            cards: CardService::new(Arc::clone(&store), rooms.clone()),
            invitations: InvitationService::new(Arc::clone(&store), rooms.clone()),
            store,
            rooms,
        }
    }
}
