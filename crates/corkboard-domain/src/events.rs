use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardId, UserId};
use crate::card::{Card, CardId};
use crate::column::{Column, ColumnId};
use crate::label::Label;

/// Realtime events published to a board's room. Each carries enough payload
/// for a recipient to apply the change without a follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardEvent {
    BoardUpdated {
        board: Board,
    },
    BoardDeleted {
        board_id: BoardId,
        board_title: String,
    },
    ColumnOrderUpdated {
        board_id: BoardId,
        column_order_ids: Vec<ColumnId>,
    },
    ColumnCreated {
        column: Column,
    },
    ColumnUpdated {
        column: Column,
    },
    ColumnDeleted {
        board_id: BoardId,
        column_id: ColumnId,
        column_title: String,
    },
    CardCreated {
        card: Card,
    },
    CardUpdated {
        card: Card,
    },
    CardDeleted {
        board_id: BoardId,
        column_id: ColumnId,
        card_id: CardId,
        card_title: String,
    },
    CardMovedAcrossColumns {
        board_id: BoardId,
        card_id: CardId,
        origin_column_id: ColumnId,
        origin_card_order_ids: Vec<CardId>,
        dest_column_id: ColumnId,
        dest_card_order_ids: Vec<CardId>,
        card: Card,
    },
    MemberJoined {
        board_id: BoardId,
        user_id: UserId,
    },
    MemberRemoved {
        board_id: BoardId,
        user_id: UserId,
    },
    LabelAdded {
        board_id: BoardId,
        column_id: ColumnId,
        card_id: CardId,
        labels: Vec<Label>,
    },
    LabelUpdated {
        board_id: BoardId,
        column_id: ColumnId,
        card_id: CardId,
        labels: Vec<Label>,
    },
    LabelRemoved {
        board_id: BoardId,
        column_id: ColumnId,
        card_id: CardId,
        labels: Vec<Label>,
    },
}

impl BoardEvent {
    /// The board whose room this event belongs to.
    pub fn board_id(&self) -> BoardId {
        match self {
            Self::BoardUpdated { board } => board.id,
            Self::BoardDeleted { board_id, .. } => *board_id,
            Self::ColumnOrderUpdated { board_id, .. } => *board_id,
            Self::ColumnCreated { column } | Self::ColumnUpdated { column } => column.board_id,
            Self::ColumnDeleted { board_id, .. } => *board_id,
            Self::CardCreated { card } | Self::CardUpdated { card } => card.board_id,
            Self::CardDeleted { board_id, .. } => *board_id,
            Self::CardMovedAcrossColumns { board_id, .. } => *board_id,
            Self::MemberJoined { board_id, .. } => *board_id,
            Self::MemberRemoved { board_id, .. } => *board_id,
            Self::LabelAdded { board_id, .. }
            | Self::LabelUpdated { board_id, .. }
            | Self::LabelRemoved { board_id, .. } => *board_id,
        }
    }
}
