use std::sync::Arc;

use corkboard_core::validate::validate_title;
use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::ordering::is_permutation_of;
use corkboard_domain::{BoardEvent, BoardId, CardId, Column, ColumnId, ColumnUpdate, UserId};
use corkboard_persistence::DocumentStore;
use serde::Deserialize;

use crate::realtime::RoomRegistry;
use crate::services::require_board_access;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub board_id: BoardId,
    pub title: String,
}

#[derive(Clone)]
pub struct ColumnService {
    store: Arc<dyn DocumentStore>,
    rooms: RoomRegistry,
}

impl ColumnService {
    pub fn new(store: Arc<dyn DocumentStore>, rooms: RoomRegistry) -> Self {
        Self { store, rooms }
    }

    /// Create a column and append it to the board's order array.
    pub async fn create_column(
        &self,
        user_id: UserId,
        request: CreateColumnRequest,
    ) -> CorkboardResult<Column> {
        validate_title("title", &request.title)?;
        require_board_access(self.store.as_ref(), request.board_id, user_id).await?;

        let column = Column::new(request.board_id, request.title.trim().to_string());
        let column = self.store.insert_column(column).await?;
        self.store
            .push_column_order(request.board_id, column.id)
            .await?;

        self.rooms.publish(BoardEvent::ColumnCreated {
            column: column.clone(),
        });
        Ok(column)
    }

    /// Dispatch a column update: a rename or a same-column card reorder.
    pub async fn update_column(
        &self,
        user_id: UserId,
        column_id: ColumnId,
        update: ColumnUpdate,
    ) -> CorkboardResult<Column> {
        if let Some(card_order_ids) = update.card_order_ids {
            return self
                .move_card_same_column(user_id, column_id, card_order_ids)
                .await;
        }

        if let Some(title) = update.title {
            validate_title("title", &title)?;
            let column = self.require_column(column_id).await?;
            require_board_access(self.store.as_ref(), column.board_id, user_id).await?;

            let column = self
                .store
                .update_column_title(column_id, title.trim().to_string())
                .await?;
            self.rooms.publish(BoardEvent::ColumnUpdated {
                column: column.clone(),
            });
            return Ok(column);
        }

        Err(CorkboardError::Validation(
            "no updatable fields provided".to_string(),
        ))
    }

    /// Persist a new card order within one column and fan it out. Last write
    /// wins when two sessions reorder concurrently; the permutation check
    /// keeps a corrupted hybrid array from ever landing.
    pub async fn move_card_same_column(
        &self,
        user_id: UserId,
        column_id: ColumnId,
        card_order_ids: Vec<CardId>,
    ) -> CorkboardResult<Column> {
        let column = self.require_column(column_id).await?;
        require_board_access(self.store.as_ref(), column.board_id, user_id).await?;
        if !is_permutation_of(&card_order_ids, &column.card_order_ids) {
            return Err(CorkboardError::Validation(
                "cardOrderIds: must be a permutation of the column's cards".to_string(),
            ));
        }

        let column = self.store.set_card_order(column_id, card_order_ids).await?;
        self.rooms.publish(BoardEvent::ColumnUpdated {
            column: column.clone(),
        });
        Ok(column)
    }

    /// Delete a column, its cards, and its entry in the board's order array.
    pub async fn delete_column(&self, user_id: UserId, column_id: ColumnId) -> CorkboardResult<()> {
        let column = self.require_column(column_id).await?;
        require_board_access(self.store.as_ref(), column.board_id, user_id).await?;

        self.store.delete_cards_for_column(column_id).await?;
        self.store.delete_column(column_id).await?;
        self.store
            .pull_column_order(column.board_id, column_id)
            .await?;

        self.rooms.publish(BoardEvent::ColumnDeleted {
            board_id: column.board_id,
            column_id,
            column_title: column.title,
        });
        Ok(())
    }

    async fn require_column(&self, column_id: ColumnId) -> CorkboardResult<Column> {
        self.store
            .find_column(column_id)
            .await?
            .ok_or_else(|| CorkboardError::NotFound(format!("column {column_id} not found")))
    }
}
