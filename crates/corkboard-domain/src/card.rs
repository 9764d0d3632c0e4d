use chrono::{DateTime, Utc};
use corkboard_core::{CorkboardError, CorkboardResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{BoardId, UserId};
use crate::column::ColumnId;
use crate::label::{Label, LabelColor, LabelId};

pub type CardId = Uuid;
pub type CommentId = Uuid;

/// Comments are embedded in the card rather than stored standalone.
/// Author fields are denormalized at comment time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub author_id: UserId,
    pub author_email: String,
    #[serde(default)]
    pub author_display_name: Option<String>,
    pub content: String,
    pub commented_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    /// The card's half of the ordering relationship; the other half is the
    /// owning column's `card_order_ids`. Both change together on a
    /// cross-column move.
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<UserId>,
    /// Most recent first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub destroyed: bool,
}

impl Card {
    pub fn new(board_id: BoardId, column_id: ColumnId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            column_id,
            title,
            description: None,
            cover: None,
            member_ids: Vec::new(),
            comments: Vec::new(),
            labels: Vec::new(),
            created_at: now,
            updated_at: now,
            destroyed: false,
        }
    }

    pub fn move_to_column(&mut self, column_id: ColumnId) {
        self.column_id = column_id;
        self.updated_at = Utc::now();
    }

    pub fn update_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn update_cover(&mut self, cover: Option<String>) {
        self.cover = cover;
        self.updated_at = Utc::now();
    }

    /// New comments go to the front so the activity feed reads newest-first.
    pub fn unshift_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
        self.updated_at = Utc::now();
    }

    pub fn pull_comment(&mut self, comment_id: CommentId) -> CorkboardResult<()> {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != comment_id);
        if self.comments.len() == before {
            return Err(CorkboardError::NotFound(format!(
                "comment {comment_id} not found on card {}",
                self.id
            )));
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn push_member(&mut self, user_id: UserId) {
        if !self.member_ids.contains(&user_id) {
            self.member_ids.push(user_id);
            self.updated_at = Utc::now();
        }
    }

    pub fn pull_member(&mut self, user_id: UserId) {
        self.member_ids.retain(|id| *id != user_id);
        self.updated_at = Utc::now();
    }

    pub fn find_label(&self, label_id: LabelId) -> Option<&Label> {
        self.labels.iter().find(|l| l.id == label_id)
    }

    /// At most one label per color on a card.
    pub fn add_label(&mut self, label: Label) -> CorkboardResult<()> {
        if self.labels.iter().any(|l| l.color == label.color) {
            return Err(CorkboardError::Conflict(format!(
                "label with color '{}' already exists on this card",
                label.color.as_str()
            )));
        }
        self.labels.push(label);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn update_label(
        &mut self,
        label_id: LabelId,
        color: Option<LabelColor>,
        title: Option<Option<String>>,
    ) -> CorkboardResult<()> {
        if self.find_label(label_id).is_none() {
            return Err(CorkboardError::NotFound(format!(
                "label {label_id} not found on card {}",
                self.id
            )));
        }
        if let Some(new_color) = color {
            let color_taken = self
                .labels
                .iter()
                .any(|l| l.color == new_color && l.id != label_id);
            if color_taken {
                return Err(CorkboardError::Conflict(format!(
                    "label with color '{}' already exists on this card",
                    new_color.as_str()
                )));
            }
        }
        let label = self
            .labels
            .iter_mut()
            .find(|l| l.id == label_id)
            .ok_or_else(|| CorkboardError::NotFound(format!("label {label_id} not found")))?;
        if let Some(new_color) = color {
            label.color = new_color;
        }
        if let Some(new_title) = title {
            label.title = new_title;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_label(&mut self, label_id: LabelId) -> CorkboardResult<()> {
        let before = self.labels.len();
        self.labels.retain(|l| l.id != label_id);
        if self.labels.len() == before {
            return Err(CorkboardError::NotFound(format!(
                "label {label_id} not found on card {}",
                self.id
            )));
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_card() -> Card {
        Card::new(Uuid::new_v4(), Uuid::new_v4(), "Write tests".to_string())
    }

    #[test]
    fn test_add_label_rejects_duplicate_color() {
        let mut card = test_card();
        card.add_label(Label::new(LabelColor::Red, None)).unwrap();

        let err = card
            .add_label(Label::new(LabelColor::Red, Some("urgent".to_string())))
            .unwrap_err();
        assert!(matches!(err, CorkboardError::Conflict(_)));
        assert_eq!(card.labels.len(), 1);
    }

    #[test]
    fn test_update_label_color_rechecks_uniqueness() {
        let mut card = test_card();
        let red = Label::new(LabelColor::Red, None);
        let red_id = red.id;
        card.add_label(red).unwrap();
        card.add_label(Label::new(LabelColor::Blue, None)).unwrap();

        let err = card
            .update_label(red_id, Some(LabelColor::Blue), None)
            .unwrap_err();
        assert!(matches!(err, CorkboardError::Conflict(_)));

        // Re-setting the same color on the same label is fine.
        card.update_label(red_id, Some(LabelColor::Red), None)
            .unwrap();
    }

    #[test]
    fn test_unshift_comment_prepends() {
        let mut card = test_card();
        let author = Uuid::new_v4();
        for content in ["first", "second"] {
            card.unshift_comment(Comment {
                id: Uuid::new_v4(),
                author_id: author,
                author_email: "user@example.com".to_string(),
                author_display_name: None,
                content: content.to_string(),
                commented_at: Utc::now(),
            });
        }

        assert_eq!(card.comments[0].content, "second");
        assert_eq!(card.comments[1].content, "first");
    }

    #[test]
    fn test_pull_comment_unknown_id_is_not_found() {
        let mut card = test_card();
        let err = card.pull_comment(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CorkboardError::NotFound(_)));
    }

    #[test]
    fn test_move_to_column_updates_pointer() {
        let mut card = test_card();
        let dest = Uuid::new_v4();
        card.move_to_column(dest);
        assert_eq!(card.column_id, dest);
    }
}
