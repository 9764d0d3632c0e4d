use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::BoardId;
use crate::card::CardId;

pub type ColumnId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    /// Immutable once created; columns never move between boards.
    pub board_id: BoardId,
    pub title: String,
    /// Sole source of truth for card ordering within this column.
    #[serde(default)]
    pub card_order_ids: Vec<CardId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub destroyed: bool,
}

impl Column {
    pub fn new(board_id: BoardId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            title,
            card_order_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            destroyed: false,
        }
    }

    pub fn update_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn set_card_order(&mut self, card_order_ids: Vec<CardId>) {
        self.card_order_ids = card_order_ids;
        self.updated_at = Utc::now();
    }

    pub fn push_card(&mut self, card_id: CardId) {
        self.card_order_ids.push(card_id);
        self.updated_at = Utc::now();
    }

    pub fn pull_card(&mut self, card_id: CardId) {
        self.card_order_ids.retain(|id| *id != card_id);
        self.updated_at = Utc::now();
    }
}
