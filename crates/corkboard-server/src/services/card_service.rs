use std::sync::Arc;

use chrono::Utc;
use corkboard_core::validate::{validate_comment, validate_description, validate_title};
use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::{
    BoardEvent, BoardId, Card, CardId, CardMemberAction, CardUpdate, Column, ColumnId, Comment,
    FieldUpdate, Label, LabelColor, LabelId, LabelInput, UserId,
};
use corkboard_persistence::DocumentStore;
use serde::Deserialize;
use uuid::Uuid;

use crate::realtime::RoomRegistry;
use crate::services::require_board_access;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLabelRequest {
    pub color: Option<LabelColor>,
    pub title: FieldUpdate<String>,
}

#[derive(Clone)]
pub struct CardService {
    store: Arc<dyn DocumentStore>,
    rooms: RoomRegistry,
}

impl CardService {
    pub fn new(store: Arc<dyn DocumentStore>, rooms: RoomRegistry) -> Self {
        Self { store, rooms }
    }

    /// Create a card and append it to its column's order array.
    pub async fn create_card(
        &self,
        user_id: UserId,
        request: CreateCardRequest,
    ) -> CorkboardResult<Card> {
        validate_title("title", &request.title)?;
        let column = self.require_column(request.column_id).await?;
        if column.board_id != request.board_id {
            return Err(CorkboardError::Validation(
                "columnId: column does not belong to the board".to_string(),
            ));
        }
        require_board_access(self.store.as_ref(), column.board_id, user_id).await?;

        let card = Card::new(column.board_id, column.id, request.title.trim().to_string());
        let card = self.store.insert_card(card).await?;
        self.store.push_card_order(column.id, card.id).await?;

        self.rooms.publish(BoardEvent::CardCreated { card: card.clone() });
        Ok(card)
    }

    /// Apply a partial card update: general fields, a comment to add or
    /// remove, or a member change. All validation runs before the write.
    pub async fn update_card(
        &self,
        user_id: UserId,
        card_id: CardId,
        update: CardUpdate,
    ) -> CorkboardResult<Card> {
        if let Some(title) = &update.title {
            validate_title("title", title)?;
        }
        if let Some(description) = update.description.as_set() {
            validate_description("description", description)?;
        }
        if let Some(comment) = &update.comment_to_add {
            validate_comment("commentToAdd", &comment.content)?;
        }

        let card = self.require_card(card_id).await?;
        require_board_access(self.store.as_ref(), card.board_id, user_id).await?;

        let comment = update.comment_to_add.map(|input| Comment {
            id: Uuid::new_v4(),
            author_id: user_id,
            author_email: input.author_email,
            author_display_name: input.author_display_name,
            content: input.content.trim().to_string(),
            commented_at: Utc::now(),
        });

        let updated = self
            .store
            .modify_card(
                card_id,
                Box::new(move |card| {
                    if let Some(title) = update.title {
                        card.update_title(title.trim().to_string());
                    }
                    if update.description.is_change() {
                        let mut description = card.description.clone();
                        update.description.apply_to(&mut description);
                        card.update_description(description);
                    }
                    if update.cover.is_change() {
                        let mut cover = card.cover.clone();
                        update.cover.apply_to(&mut cover);
                        card.update_cover(cover);
                    }
                    if let Some(comment) = comment {
                        card.unshift_comment(comment);
                    }
                    if let Some(comment_id) = update.comment_id_to_remove {
                        card.pull_comment(comment_id)?;
                    }
                    if let Some(member) = update.member_update {
                        match member.action {
                            CardMemberAction::Add => card.push_member(member.user_id),
                            CardMemberAction::Remove => card.pull_member(member.user_id),
                        }
                    }
                    Ok(())
                }),
            )
            .await?;

        self.rooms.publish(BoardEvent::CardUpdated {
            card: updated.clone(),
        });
        Ok(updated)
    }

    /// Delete a card and pull it from its column's order array.
    pub async fn delete_card(&self, user_id: UserId, card_id: CardId) -> CorkboardResult<()> {
        let card = self.require_card(card_id).await?;
        require_board_access(self.store.as_ref(), card.board_id, user_id).await?;

        self.store.delete_card(card_id).await?;
        self.store.pull_card_order(card.column_id, card_id).await?;

        self.rooms.publish(BoardEvent::CardDeleted {
            board_id: card.board_id,
            column_id: card.column_id,
            card_id,
            card_title: card.title,
        });
        Ok(())
    }

    /// Attach a label; at most one label per color per card.
    pub async fn add_label(
        &self,
        user_id: UserId,
        card_id: CardId,
        input: LabelInput,
    ) -> CorkboardResult<Card> {
        let card = self.require_card(card_id).await?;
        require_board_access(self.store.as_ref(), card.board_id, user_id).await?;

        let label = Label::new(input.color, input.title);
        let updated = self
            .store
            .modify_card(card_id, Box::new(move |card| card.add_label(label)))
            .await?;

        self.rooms.publish(BoardEvent::LabelAdded {
            board_id: updated.board_id,
            column_id: updated.column_id,
            card_id: updated.id,
            labels: updated.labels.clone(),
        });
        Ok(updated)
    }

    /// Change a label's color or title; a color change is re-checked for
    /// uniqueness against the card's other labels.
    pub async fn update_label(
        &self,
        user_id: UserId,
        card_id: CardId,
        label_id: LabelId,
        request: UpdateLabelRequest,
    ) -> CorkboardResult<Card> {
        let card = self.require_card(card_id).await?;
        require_board_access(self.store.as_ref(), card.board_id, user_id).await?;

        let title = match request.title {
            FieldUpdate::NoChange => None,
            FieldUpdate::Set(title) => Some(Some(title)),
            FieldUpdate::Clear => Some(None),
        };
        let updated = self
            .store
            .modify_card(
                card_id,
                Box::new(move |card| card.update_label(label_id, request.color, title)),
            )
            .await?;

        self.rooms.publish(BoardEvent::LabelUpdated {
            board_id: updated.board_id,
            column_id: updated.column_id,
            card_id: updated.id,
            labels: updated.labels.clone(),
        });
        Ok(updated)
    }

    pub async fn remove_label(
        &self,
        user_id: UserId,
        card_id: CardId,
        label_id: LabelId,
    ) -> CorkboardResult<Card> {
        let card = self.require_card(card_id).await?;
        require_board_access(self.store.as_ref(), card.board_id, user_id).await?;

        let updated = self
            .store
            .modify_card(card_id, Box::new(move |card| card.remove_label(label_id)))
            .await?;

        self.rooms.publish(BoardEvent::LabelRemoved {
            board_id: updated.board_id,
            column_id: updated.column_id,
            card_id: updated.id,
            labels: updated.labels.clone(),
        });
        Ok(updated)
    }

    async fn require_card(&self, card_id: CardId) -> CorkboardResult<Card> {
        self.store
            .find_card(card_id)
            .await?
            .ok_or_else(|| CorkboardError::NotFound(format!("card {card_id} not found")))
    }

    async fn require_column(&self, column_id: ColumnId) -> CorkboardResult<Column> {
        self.store
            .find_column(column_id)
            .await?
            .ok_or_else(|| CorkboardError::NotFound(format!("column {column_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_domain::{Board, BoardVisibility, CardMemberUpdate, CommentInput};
    use corkboard_persistence::{BoardGateway, CardGateway, ColumnGateway, MemoryStore};

    struct Fixture {
        service: CardService,
        store: Arc<MemoryStore>,
        owner: UserId,
        board_id: BoardId,
        column_id: ColumnId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let owner = Uuid::new_v4();
        let board = Board::new(
            owner,
            "Card Board".to_string(),
            None,
            BoardVisibility::Private,
        );
        let board_id = board.id;
        let column = Column::new(board_id, "Todo".to_string());
        let column_id = column.id;
        store.insert_board(board).await.unwrap();
        store.insert_column(column).await.unwrap();

        let service = CardService::new(store.clone(), RoomRegistry::new());
        Fixture {
            service,
            store,
            owner,
            board_id,
            column_id,
        }
    }

    async fn create(fx: &Fixture, title: &str) -> Card {
        fx.service
            .create_card(
                fx.owner,
                CreateCardRequest {
                    board_id: fx.board_id,
                    column_id: fx.column_id,
                    title: title.to_string(),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_card_appends_to_column_order() {
        let fx = fixture().await;
        let first = create(&fx, "first card").await;
        let second = create(&fx, "second card").await;

        let column = fx.store.find_column(fx.column_id).await.unwrap().unwrap();
        assert_eq!(column.card_order_ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_create_card_rejects_mismatched_board() {
        let fx = fixture().await;
        let err = fx
            .service
            .create_card(
                fx.owner,
                CreateCardRequest {
                    board_id: Uuid::new_v4(),
                    column_id: fx.column_id,
                    title: "misfiled".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CorkboardError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_card_adds_comment_newest_first() {
        let fx = fixture().await;
        let card = create(&fx, "commented card").await;

        for content in ["first", "second"] {
            fx.service
                .update_card(
                    fx.owner,
                    card.id,
                    CardUpdate {
                        comment_to_add: Some(CommentInput {
                            content: content.to_string(),
                            author_email: "owner@example.com".to_string(),
                            author_display_name: None,
                        }),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let card = fx.store.find_card(card.id).await.unwrap().unwrap();
        assert_eq!(card.comments[0].content, "second");
        assert_eq!(card.comments[0].author_id, fx.owner);
        assert_eq!(card.comments[1].content, "first");
    }

    #[tokio::test]
    async fn test_update_card_clears_cover_with_null() {
        let fx = fixture().await;
        let card = create(&fx, "covered card").await;
        fx.service
            .update_card(
                fx.owner,
                card.id,
                CardUpdate {
                    cover: FieldUpdate::Set("https://example.com/cover.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = fx
            .service
            .update_card(
                fx.owner,
                card.id,
                CardUpdate {
                    cover: FieldUpdate::Clear,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.cover, None);
    }

    #[tokio::test]
    async fn test_update_card_member_roundtrip() {
        let fx = fixture().await;
        let card = create(&fx, "staffed card").await;
        let member = Uuid::new_v4();

        let updated = fx
            .service
            .update_card(
                fx.owner,
                card.id,
                CardUpdate {
                    member_update: Some(CardMemberUpdate {
                        action: CardMemberAction::Add,
                        user_id: member,
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.member_ids, vec![member]);

        let updated = fx
            .service
            .update_card(
                fx.owner,
                card.id,
                CardUpdate {
                    member_update: Some(CardMemberUpdate {
                        action: CardMemberAction::Remove,
                        user_id: member,
                    }),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.member_ids.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_label_color_is_conflict() {
        let fx = fixture().await;
        let card = create(&fx, "labeled card").await;

        fx.service
            .add_label(
                fx.owner,
                card.id,
                LabelInput {
                    color: LabelColor::Red,
                    title: Some("urgent".to_string()),
                },
            )
            .await
            .unwrap();

        let err = fx
            .service
            .add_label(
                fx.owner,
                card.id,
                LabelInput {
                    color: LabelColor::Red,
                    title: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CorkboardError::Conflict(_)));

        // The failed add left exactly one red label behind.
        let card = fx.store.find_card(card.id).await.unwrap().unwrap();
        assert_eq!(card.labels.len(), 1);
    }

    #[tokio::test]
    async fn test_update_label_clears_title() {
        let fx = fixture().await;
        let card = create(&fx, "labeled card").await;
        let labeled = fx
            .service
            .add_label(
                fx.owner,
                card.id,
                LabelInput {
                    color: LabelColor::Blue,
                    title: Some("design".to_string()),
                },
            )
            .await
            .unwrap();
        let label_id = labeled.labels[0].id;

        let updated = fx
            .service
            .update_label(
                fx.owner,
                card.id,
                label_id,
                UpdateLabelRequest {
                    color: None,
                    title: FieldUpdate::Clear,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.labels[0].title, None);
        assert_eq!(updated.labels[0].color, LabelColor::Blue);
    }

    #[tokio::test]
    async fn test_delete_card_pulls_column_order() {
        let fx = fixture().await;
        let card = create(&fx, "doomed card").await;

        fx.service.delete_card(fx.owner, card.id).await.unwrap();

        assert!(fx.store.find_card(card.id).await.unwrap().is_none());
        let column = fx.store.find_column(fx.column_id).await.unwrap().unwrap();
        assert!(column.card_order_ids.is_empty());
    }

    #[tokio::test]
    async fn test_update_card_requires_membership() {
        let fx = fixture().await;
        let card = create(&fx, "private card").await;
        let outsider = Uuid::new_v4();

        let err = fx
            .service
            .update_card(
                outsider,
                card.id,
                CardUpdate {
                    title: Some("hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CorkboardError::Forbidden(_)));
    }
}
