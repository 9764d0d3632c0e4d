use serde::{Deserialize, Serialize};

use crate::board::{BoardVisibility, UserId};
use crate::card::{CardId, CommentId};
use crate::column::ColumnId;
use crate::field_update::FieldUpdate;
use crate::label::LabelColor;

/// Partial update for a board. Absent fields are left untouched; the server
/// dispatches on whichever group of fields is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub visibility: Option<BoardVisibility>,
    pub column_order_ids: Option<Vec<ColumnId>>,
    pub member_id_to_remove: Option<UserId>,
}

impl BoardUpdate {
    pub fn has_general_fields(&self) -> bool {
        self.title.is_some() || self.description.is_change() || self.visibility.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnUpdate {
    pub title: Option<String>,
    pub card_order_ids: Option<Vec<CardId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardMemberAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMemberUpdate {
    pub action: CardMemberAction,
    pub user_id: UserId,
}

/// Comment author fields are supplied by the upstream auth layer alongside
/// the user id; the card embeds them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub content: String,
    pub author_email: String,
    #[serde(default)]
    pub author_display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub cover: FieldUpdate<String>,
    pub comment_to_add: Option<CommentInput>,
    pub comment_id_to_remove: Option<CommentId>,
    pub member_update: Option<CardMemberUpdate>,
}

impl CardUpdate {
    pub fn has_general_fields(&self) -> bool {
        self.title.is_some() || self.description.is_change() || self.cover.is_change()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelInput {
    pub color: LabelColor,
    #[serde(default)]
    pub title: Option<String>,
}

/// Wire payload for the transactional cross-column move. The caller has
/// already excluded the card from the origin array and included it in the
/// destination array; placeholder ids never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMovePayload {
    pub current_card_id: CardId,
    pub original_column_id: ColumnId,
    pub original_card_order_ids: Vec<CardId>,
    pub new_column_id: ColumnId,
    pub new_card_order_ids: Vec<CardId>,
}
