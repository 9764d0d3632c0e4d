use async_trait::async_trait;
use corkboard_core::CorkboardResult;
use corkboard_domain::{
    Board, BoardId, BoardVisibility, Card, CardId, Column, ColumnId, FieldUpdate, Invitation,
    InvitationId, UserId,
};

/// findAndModify-style mutation applied atomically to one document.
/// Returning an error aborts the update; nothing is written.
pub type CardMutation = Box<dyn FnOnce(&mut Card) -> CorkboardResult<()> + Send>;
pub type InvitationMutation = Box<dyn FnOnce(&mut Invitation) -> CorkboardResult<()> + Send>;

/// Board documents: CRUD plus the atomic array operations the ordering model
/// relies on. Every method is atomic at the document level.
#[async_trait]
pub trait BoardGateway: Send + Sync {
    async fn insert_board(&self, board: Board) -> CorkboardResult<Board>;
    async fn find_board(&self, id: BoardId) -> CorkboardResult<Option<Board>>;
    /// Boards where the user is an owner or member, most recently created first.
    async fn boards_for_user(&self, user_id: UserId) -> CorkboardResult<Vec<Board>>;
    async fn update_board_fields(
        &self,
        id: BoardId,
        title: Option<String>,
        description: FieldUpdate<String>,
        visibility: Option<BoardVisibility>,
    ) -> CorkboardResult<Board>;
    async fn set_column_order(
        &self,
        id: BoardId,
        column_order_ids: Vec<ColumnId>,
    ) -> CorkboardResult<Board>;
    async fn push_column_order(&self, id: BoardId, column_id: ColumnId) -> CorkboardResult<Board>;
    async fn pull_column_order(&self, id: BoardId, column_id: ColumnId) -> CorkboardResult<Board>;
    async fn push_member(&self, id: BoardId, user_id: UserId) -> CorkboardResult<Board>;
    async fn pull_member(&self, id: BoardId, user_id: UserId) -> CorkboardResult<Board>;
    async fn delete_board(&self, id: BoardId) -> CorkboardResult<()>;
}

#[async_trait]
pub trait ColumnGateway: Send + Sync {
    async fn insert_column(&self, column: Column) -> CorkboardResult<Column>;
    async fn find_column(&self, id: ColumnId) -> CorkboardResult<Option<Column>>;
    async fn columns_for_board(&self, board_id: BoardId) -> CorkboardResult<Vec<Column>>;
    async fn update_column_title(&self, id: ColumnId, title: String) -> CorkboardResult<Column>;
    async fn set_card_order(
        &self,
        id: ColumnId,
        card_order_ids: Vec<CardId>,
    ) -> CorkboardResult<Column>;
    async fn push_card_order(&self, id: ColumnId, card_id: CardId) -> CorkboardResult<Column>;
    async fn pull_card_order(&self, id: ColumnId, card_id: CardId) -> CorkboardResult<Column>;
    async fn delete_column(&self, id: ColumnId) -> CorkboardResult<()>;
    async fn delete_columns_for_board(&self, board_id: BoardId) -> CorkboardResult<usize>;
}

#[async_trait]
pub trait CardGateway: Send + Sync {
    async fn insert_card(&self, card: Card) -> CorkboardResult<Card>;
    async fn find_card(&self, id: CardId) -> CorkboardResult<Option<Card>>;
    async fn cards_for_board(&self, board_id: BoardId) -> CorkboardResult<Vec<Card>>;
    async fn cards_for_column(&self, column_id: ColumnId) -> CorkboardResult<Vec<Card>>;
    /// Atomic read-modify-write of one card. The mutation may fail (e.g. a
    /// business-rule check); the document is then left untouched.
    async fn modify_card(&self, id: CardId, mutation: CardMutation) -> CorkboardResult<Card>;
    async fn delete_card(&self, id: CardId) -> CorkboardResult<()>;
    async fn delete_cards_for_board(&self, board_id: BoardId) -> CorkboardResult<usize>;
    async fn delete_cards_for_column(&self, column_id: ColumnId) -> CorkboardResult<usize>;
}

#[async_trait]
pub trait InvitationGateway: Send + Sync {
    async fn insert_invitation(&self, invitation: Invitation) -> CorkboardResult<Invitation>;
    async fn find_invitation(&self, id: InvitationId) -> CorkboardResult<Option<Invitation>>;
    async fn invitations_for_invitee(&self, invitee_id: UserId) -> CorkboardResult<Vec<Invitation>>;
    /// A pending invitation for the same invitee and board, if one exists.
    async fn find_pending_invitation(
        &self,
        invitee_id: UserId,
        board_id: BoardId,
    ) -> CorkboardResult<Option<Invitation>>;
    async fn modify_invitation(
        &self,
        id: InvitationId,
        mutation: InvitationMutation,
    ) -> CorkboardResult<Invitation>;
}

/// The one multi-document write in the system: a cross-column card move.
/// Writes are buffered on the transaction and applied atomically at commit;
/// dropping the transaction without committing discards them.
#[async_trait]
pub trait BoardTransaction: Send {
    fn set_card_order(&mut self, column_id: ColumnId, card_order_ids: Vec<CardId>);
    fn set_card_column(&mut self, card_id: CardId, column_id: ColumnId);
    /// Validates every buffered target still exists, then applies all writes
    /// as one unit. Any failure leaves the store exactly as before.
    async fn commit(self: Box<Self>) -> CorkboardResult<()>;
}

#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn begin(&self) -> CorkboardResult<Box<dyn BoardTransaction>>;
}

/// The full persistence surface the services are wired against.
pub trait DocumentStore:
    BoardGateway + ColumnGateway + CardGateway + InvitationGateway + TransactionSource
{
}

impl<T> DocumentStore for T where
    T: BoardGateway + ColumnGateway + CardGateway + InvitationGateway + TransactionSource
{
}
