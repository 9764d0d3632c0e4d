//! Board operations, including the three move operations at the heart of the
//! reordering protocol. Business-rule checks always run before any write;
//! the cross-column move is the one multi-document transaction.

use std::sync::Arc;

use corkboard_core::config::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE};
use corkboard_core::validate::{validate_description, validate_title};
use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::ordering::is_permutation_of;
use corkboard_domain::{
    Board, BoardEvent, BoardId, BoardUpdate, BoardVisibility, Card, CardMovePayload, Column,
    ColumnId, UserId,
};
use corkboard_persistence::DocumentStore;
use serde::{Deserialize, Serialize};

use crate::realtime::RoomRegistry;
use crate::services::{require_board_access, require_board_owner};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub visibility: BoardVisibility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWithCards {
    #[serde(flatten)]
    pub column: Column,
    pub cards: Vec<Card>,
}

/// Full board fetch: the board plus its columns, each carrying its cards.
/// This is what the client reconciler hydrates from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetails {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnWithCards>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardListing {
    pub boards: Vec<Board>,
    pub total_boards: usize,
}

#[derive(Clone)]
pub struct BoardService {
    store: Arc<dyn DocumentStore>,
    rooms: RoomRegistry,
}

impl BoardService {
    pub fn new(store: Arc<dyn DocumentStore>, rooms: RoomRegistry) -> Self {
        Self { store, rooms }
    }

    pub async fn create_board(
        &self,
        user_id: UserId,
        request: CreateBoardRequest,
    ) -> CorkboardResult<Board> {
        validate_title("title", &request.title)?;
        if let Some(description) = &request.description {
            validate_description("description", description)?;
        }
        let board = Board::new(
            user_id,
            request.title.trim().to_string(),
            request.description,
            request.visibility,
        );
        self.store.insert_board(board).await
    }

    pub async fn list_boards(
        &self,
        user_id: UserId,
        page: Option<u32>,
        items_per_page: Option<u32>,
        title_filter: Option<String>,
    ) -> CorkboardResult<BoardListing> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let items_per_page = items_per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE).max(1);

        let mut boards = self.store.boards_for_user(user_id).await?;
        if let Some(filter) = title_filter.filter(|f| !f.trim().is_empty()) {
            let needle = filter.to_lowercase();
            boards.retain(|b| b.title.to_lowercase().contains(&needle));
        }

        let total_boards = boards.len();
        let start = (page as usize - 1) * items_per_page as usize;
        let boards = boards
            .into_iter()
            .skip(start)
            .take(items_per_page as usize)
            .collect();
        Ok(BoardListing {
            boards,
            total_boards,
        })
    }

    pub async fn board_details(
        &self,
        user_id: UserId,
        board_id: BoardId,
    ) -> CorkboardResult<BoardDetails> {
        let board = require_board_access(self.store.as_ref(), board_id, user_id).await?;
        let columns = self.store.columns_for_board(board_id).await?;
        let cards = self.store.cards_for_board(board_id).await?;

        // Nest each card under its own column, the shape the client hydrates.
        let columns = columns
            .into_iter()
            .map(|column| {
                let cards = cards
                    .iter()
                    .filter(|card| card.column_id == column.id)
                    .cloned()
                    .collect();
                ColumnWithCards { column, cards }
            })
            .collect();

        Ok(BoardDetails { board, columns })
    }

    /// Dispatch a board update: exactly one of column order, member removal,
    /// or general fields per request.
    pub async fn update_board(
        &self,
        user_id: UserId,
        board_id: BoardId,
        update: BoardUpdate,
    ) -> CorkboardResult<Board> {
        if let Some(column_order_ids) = update.column_order_ids {
            return self.move_column(user_id, board_id, column_order_ids).await;
        }

        if let Some(member_id) = update.member_id_to_remove {
            return self.remove_member(user_id, board_id, member_id).await;
        }

        if update.has_general_fields() {
            require_board_owner(self.store.as_ref(), board_id, user_id).await?;
            if let Some(title) = &update.title {
                validate_title("title", title)?;
            }
            if let Some(description) = update.description.as_set() {
                validate_description("description", description)?;
            }
            let title = update.title.map(|t| t.trim().to_string());
            let board = self
                .store
                .update_board_fields(board_id, title, update.description, update.visibility)
                .await?;
            self.rooms.publish(BoardEvent::BoardUpdated {
                board: board.clone(),
            });
            return Ok(board);
        }

        Err(CorkboardError::Validation(
            "no updatable fields provided".to_string(),
        ))
    }

    /// Persist a new column order for the board and fan it out.
    pub async fn move_column(
        &self,
        user_id: UserId,
        board_id: BoardId,
        column_order_ids: Vec<ColumnId>,
    ) -> CorkboardResult<Board> {
        let board = require_board_access(self.store.as_ref(), board_id, user_id).await?;
        if !is_permutation_of(&column_order_ids, &board.column_order_ids) {
            return Err(CorkboardError::Validation(
                "columnOrderIds: must be a permutation of the board's columns".to_string(),
            ));
        }

        let board = self
            .store
            .set_column_order(board_id, column_order_ids)
            .await?;
        self.rooms.publish(BoardEvent::ColumnOrderUpdated {
            board_id,
            column_order_ids: board.column_order_ids.clone(),
        });
        Ok(board)
    }

    /// The transactional cross-column move. All business-rule checks happen
    /// before the transaction opens; the three writes (origin order,
    /// destination order, card pointer) land atomically or not at all.
    pub async fn move_card_across_columns(
        &self,
        user_id: UserId,
        payload: CardMovePayload,
    ) -> CorkboardResult<Card> {
        let card = self
            .store
            .find_card(payload.current_card_id)
            .await?
            .ok_or_else(|| {
                CorkboardError::NotFound(format!("card {} not found", payload.current_card_id))
            })?;
        let origin = self
            .store
            .find_column(payload.original_column_id)
            .await?
            .ok_or_else(|| {
                CorkboardError::NotFound(format!(
                    "column {} not found",
                    payload.original_column_id
                ))
            })?;
        let dest = self
            .store
            .find_column(payload.new_column_id)
            .await?
            .ok_or_else(|| {
                CorkboardError::NotFound(format!("column {} not found", payload.new_column_id))
            })?;

        if origin.board_id != dest.board_id {
            return Err(CorkboardError::Domain(
                "columns must belong to the same board".to_string(),
            ));
        }
        require_board_access(self.store.as_ref(), origin.board_id, user_id).await?;

        if payload
            .original_card_order_ids
            .contains(&payload.current_card_id)
        {
            return Err(CorkboardError::Validation(
                "originalCardOrderIds: must not contain the moved card".to_string(),
            ));
        }
        if !payload.new_card_order_ids.contains(&payload.current_card_id) {
            return Err(CorkboardError::Validation(
                "newCardOrderIds: must contain the moved card".to_string(),
            ));
        }

        let mut txn = self.store.begin().await?;
        txn.set_card_order(origin.id, payload.original_card_order_ids.clone());
        txn.set_card_order(dest.id, payload.new_card_order_ids.clone());
        txn.set_card_column(card.id, dest.id);
        txn.commit().await?;

        let updated = self
            .store
            .find_card(payload.current_card_id)
            .await?
            .ok_or_else(|| {
                CorkboardError::Internal("card vanished after committed move".to_string())
            })?;

        self.rooms.publish(BoardEvent::CardMovedAcrossColumns {
            board_id: updated.board_id,
            card_id: updated.id,
            origin_column_id: origin.id,
            origin_card_order_ids: payload.original_card_order_ids,
            dest_column_id: dest.id,
            dest_card_order_ids: payload.new_card_order_ids,
            card: updated.clone(),
        });
        Ok(updated)
    }

    async fn remove_member(
        &self,
        user_id: UserId,
        board_id: BoardId,
        member_id: UserId,
    ) -> CorkboardResult<Board> {
        require_board_owner(self.store.as_ref(), board_id, user_id).await?;
        let board = self.store.pull_member(board_id, member_id).await?;
        self.rooms.publish(BoardEvent::MemberRemoved {
            board_id,
            user_id: member_id,
        });
        Ok(board)
    }

    /// Hard delete, cascading to the board's columns and cards.
    pub async fn delete_board(&self, user_id: UserId, board_id: BoardId) -> CorkboardResult<()> {
        let board = require_board_owner(self.store.as_ref(), board_id, user_id).await?;
        self.store.delete_columns_for_board(board_id).await?;
        self.store.delete_cards_for_board(board_id).await?;
        self.store.delete_board(board_id).await?;
        self.rooms.publish(BoardEvent::BoardDeleted {
            board_id,
            board_title: board.title,
        });
        Ok(())
    }
}
