pub mod board_service;
pub mod card_service;
pub mod column_service;
pub mod invitation_service;

pub use board_service::{BoardDetails, BoardListing, BoardService, ColumnWithCards, CreateBoardRequest};
pub use card_service::{CardService, CreateCardRequest, UpdateLabelRequest};
pub use column_service::{ColumnService, CreateColumnRequest};
pub use invitation_service::{CreateInvitationRequest, InvitationService, UpdateInvitationRequest};

use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::{Board, BoardId, UserId};
use corkboard_persistence::DocumentStore;

/// Caller must be an owner or member of the board. Returns the board so the
/// caller doesn't fetch it twice.
pub(crate) async fn require_board_access(
    store: &dyn DocumentStore,
    board_id: BoardId,
    user_id: UserId,
) -> CorkboardResult<Board> {
    let board = store
        .find_board(board_id)
        .await?
        .ok_or_else(|| CorkboardError::NotFound(format!("board {board_id} not found")))?;
    if !board.can_access(user_id) {
        return Err(CorkboardError::Forbidden(
            "you do not have permission to access this board".to_string(),
        ));
    }
    Ok(board)
}

pub(crate) async fn require_board_owner(
    store: &dyn DocumentStore,
    board_id: BoardId,
    user_id: UserId,
) -> CorkboardResult<Board> {
    let board = store
        .find_board(board_id)
        .await?
        .ok_or_else(|| CorkboardError::NotFound(format!("board {board_id} not found")))?;
    if !board.is_owner(user_id) {
        return Err(CorkboardError::Forbidden(
            "only a board owner may do this".to_string(),
        ));
    }
    Ok(board)
}
