use chrono::{DateTime, Utc};
use corkboard_core::validate::slugify;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::column::ColumnId;

pub type BoardId = Uuid;
pub type UserId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardVisibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub visibility: BoardVisibility,
    /// Sole source of truth for column ordering.
    #[serde(default)]
    pub column_order_ids: Vec<ColumnId>,
    pub owner_ids: Vec<UserId>,
    #[serde(default)]
    pub member_ids: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub destroyed: bool,
}

impl Board {
    pub fn new(
        creator: UserId,
        title: String,
        description: Option<String>,
        visibility: BoardVisibility,
    ) -> Self {
        let now = Utc::now();
        let slug = slugify(&title);
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description,
            visibility,
            column_order_ids: Vec::new(),
            owner_ids: vec![creator],
            member_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            destroyed: false,
        }
    }

    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_ids.contains(&user_id)
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.member_ids.contains(&user_id)
    }

    /// Owners and members share read/mutate access to board content.
    pub fn can_access(&self, user_id: UserId) -> bool {
        self.is_owner(user_id) || self.is_member(user_id)
    }

    pub fn update_title(&mut self, title: String) {
        self.slug = slugify(&title);
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn update_visibility(&mut self, visibility: BoardVisibility) {
        self.visibility = visibility;
        self.updated_at = Utc::now();
    }

    pub fn set_column_order(&mut self, column_order_ids: Vec<ColumnId>) {
        self.column_order_ids = column_order_ids;
        self.updated_at = Utc::now();
    }

    pub fn push_column(&mut self, column_id: ColumnId) {
        self.column_order_ids.push(column_id);
        self.updated_at = Utc::now();
    }

    pub fn pull_column(&mut self, column_id: ColumnId) {
        self.column_order_ids.retain(|id| *id != column_id);
        self.updated_at = Utc::now();
    }

    /// Idempotent: a user already present is not added twice.
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_creator_is_sole_owner() {
        let creator = Uuid::new_v4();
        let board = Board::new(
            creator,
            "Launch Plan".to_string(),
            None,
            BoardVisibility::Private,
        );

        assert_eq!(board.owner_ids, vec![creator]);
        assert!(board.member_ids.is_empty());
        assert_eq!(board.slug, "launch-plan");
        assert!(board.is_owner(creator));
        assert!(board.can_access(creator));
    }

    #[test]
    fn test_push_member_is_idempotent() {
        let mut board = Board::new(
            Uuid::new_v4(),
            "Test Board".to_string(),
            None,
            BoardVisibility::Public,
        );
        let member = Uuid::new_v4();

        board.push_member(member);
        board.push_member(member);

        assert_eq!(board.member_ids, vec![member]);
        assert!(board.can_access(member));
    }

    #[test]
    fn test_update_title_refreshes_slug() {
        let mut board = Board::new(
            Uuid::new_v4(),
            "Old Title".to_string(),
            None,
            BoardVisibility::Public,
        );
        board.update_title("Brand New".to_string());

        assert_eq!(board.slug, "brand-new");
    }

    #[test]
    fn test_pull_column_removes_from_order() {
        let mut board = Board::new(
            Uuid::new_v4(),
            "Test Board".to_string(),
            None,
            BoardVisibility::Public,
        );
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        board.push_column(a);
        board.push_column(b);

        board.pull_column(a);

        assert_eq!(board.column_order_ids, vec![b]);
    }
}
