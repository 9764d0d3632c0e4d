use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::{
    Board, BoardId, BoardVisibility, Card, CardId, Column, ColumnId, FieldUpdate, Invitation,
    InvitationId, InvitationStatus, UserId,
};
use tokio::sync::RwLock;

use crate::traits::{
    BoardGateway, BoardTransaction, CardGateway, CardMutation, ColumnGateway, InvitationGateway,
    InvitationMutation, TransactionSource,
};

/// In-memory document store. Single-document operations take the write lock
/// once, giving the same atomicity contract as a document database's
/// findAndModify; the transaction applies its buffered writes under one lock
/// acquisition so no partial state is ever observable.
#[derive(Default)]
struct StoreInner {
    boards: HashMap<BoardId, Board>,
    columns: HashMap<ColumnId, Column>,
    cards: HashMap<CardId, Card>,
    invitations: HashMap<InvitationId, Invitation>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(entity: &str, id: impl std::fmt::Display) -> CorkboardError {
    CorkboardError::NotFound(format!("{entity} {id} not found"))
}

#[async_trait]
impl BoardGateway for MemoryStore {
    async fn insert_board(&self, board: Board) -> CorkboardResult<Board> {
        let mut inner = self.inner.write().await;
        inner.boards.insert(board.id, board.clone());
        Ok(board)
    }

    async fn find_board(&self, id: BoardId) -> CorkboardResult<Option<Board>> {
        let inner = self.inner.read().await;
        Ok(inner.boards.get(&id).filter(|b| !b.destroyed).cloned())
    }

    async fn boards_for_user(&self, user_id: UserId) -> CorkboardResult<Vec<Board>> {
        let inner = self.inner.read().await;
        let mut boards: Vec<Board> = inner
            .boards
            .values()
            .filter(|b| !b.destroyed && b.can_access(user_id))
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    async fn update_board_fields(
        &self,
        id: BoardId,
        title: Option<String>,
        description: FieldUpdate<String>,
        visibility: Option<BoardVisibility>,
    ) -> CorkboardResult<Board> {
        let mut inner = self.inner.write().await;
        let board = inner.boards.get_mut(&id).ok_or_else(|| not_found("board", id))?;
        if let Some(title) = title {
            board.update_title(title);
        }
        if description.is_change() {
            let mut updated = board.description.clone();
            description.apply_to(&mut updated);
            board.update_description(updated);
        }
        if let Some(visibility) = visibility {
            board.update_visibility(visibility);
        }
        Ok(board.clone())
    }

    async fn set_column_order(
        &self,
        id: BoardId,
        column_order_ids: Vec<ColumnId>,
    ) -> CorkboardResult<Board> {
        let mut inner = self.inner.write().await;
        let board = inner.boards.get_mut(&id).ok_or_else(|| not_found("board", id))?;
        board.set_column_order(column_order_ids);
        Ok(board.clone())
    }

    async fn push_column_order(&self, id: BoardId, column_id: ColumnId) -> CorkboardResult<Board> {
        let mut inner = self.inner.write().await;
        let board = inner.boards.get_mut(&id).ok_or_else(|| not_found("board", id))?;
        board.push_column(column_id);
        Ok(board.clone())
    }

    async fn pull_column_order(&self, id: BoardId, column_id: ColumnId) -> CorkboardResult<Board> {
        let mut inner = self.inner.write().await;
        let board = inner.boards.get_mut(&id).ok_or_else(|| not_found("board", id))?;
        board.pull_column(column_id);
        Ok(board.clone())
    }

    async fn push_member(&self, id: BoardId, user_id: UserId) -> CorkboardResult<Board> {
        let mut inner = self.inner.write().await;
        let board = inner.boards.get_mut(&id).ok_or_else(|| not_found("board", id))?;
        board.push_member(user_id);
        Ok(board.clone())
    }

    async fn pull_member(&self, id: BoardId, user_id: UserId) -> CorkboardResult<Board> {
        let mut inner = self.inner.write().await;
        let board = inner.boards.get_mut(&id).ok_or_else(|| not_found("board", id))?;
        board.pull_member(user_id);
        Ok(board.clone())
    }

    async fn delete_board(&self, id: BoardId) -> CorkboardResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .boards
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("board", id))
    }
}

#[async_trait]
impl ColumnGateway for MemoryStore {
    async fn insert_column(&self, column: Column) -> CorkboardResult<Column> {
        let mut inner = self.inner.write().await;
        inner.columns.insert(column.id, column.clone());
        Ok(column)
    }

    async fn find_column(&self, id: ColumnId) -> CorkboardResult<Option<Column>> {
        let inner = self.inner.read().await;
        Ok(inner.columns.get(&id).filter(|c| !c.destroyed).cloned())
    }

    async fn columns_for_board(&self, board_id: BoardId) -> CorkboardResult<Vec<Column>> {
        let inner = self.inner.read().await;
        Ok(inner
            .columns
            .values()
            .filter(|c| !c.destroyed && c.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn update_column_title(&self, id: ColumnId, title: String) -> CorkboardResult<Column> {
        let mut inner = self.inner.write().await;
        let column = inner
            .columns
            .get_mut(&id)
            .ok_or_else(|| not_found("column", id))?;
        column.update_title(title);
        Ok(column.clone())
    }

    async fn set_card_order(
        &self,
        id: ColumnId,
        card_order_ids: Vec<CardId>,
    ) -> CorkboardResult<Column> {
        let mut inner = self.inner.write().await;
        let column = inner
            .columns
            .get_mut(&id)
            .ok_or_else(|| not_found("column", id))?;
        column.set_card_order(card_order_ids);
        Ok(column.clone())
    }

    async fn push_card_order(&self, id: ColumnId, card_id: CardId) -> CorkboardResult<Column> {
        let mut inner = self.inner.write().await;
        let column = inner
            .columns
            .get_mut(&id)
            .ok_or_else(|| not_found("column", id))?;
        column.push_card(card_id);
        Ok(column.clone())
    }

    async fn pull_card_order(&self, id: ColumnId, card_id: CardId) -> CorkboardResult<Column> {
        let mut inner = self.inner.write().await;
        let column = inner
            .columns
            .get_mut(&id)
            .ok_or_else(|| not_found("column", id))?;
        column.pull_card(card_id);
        Ok(column.clone())
    }

    async fn delete_column(&self, id: ColumnId) -> CorkboardResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .columns
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("column", id))
    }

    async fn delete_columns_for_board(&self, board_id: BoardId) -> CorkboardResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.columns.len();
        inner.columns.retain(|_, c| c.board_id != board_id);
        Ok(before - inner.columns.len())
    }
}

#[async_trait]
impl CardGateway for MemoryStore {
    async fn insert_card(&self, card: Card) -> CorkboardResult<Card> {
        let mut inner = self.inner.write().await;
        inner.cards.insert(card.id, card.clone());
        Ok(card)
    }

    async fn find_card(&self, id: CardId) -> CorkboardResult<Option<Card>> {
        let inner = self.inner.read().await;
        Ok(inner.cards.get(&id).filter(|c| !c.destroyed).cloned())
    }

    async fn cards_for_board(&self, board_id: BoardId) -> CorkboardResult<Vec<Card>> {
        let inner = self.inner.read().await;
        Ok(inner
            .cards
            .values()
            .filter(|c| !c.destroyed && c.board_id == board_id)
            .cloned()
            .collect())
    }

    async fn cards_for_column(&self, column_id: ColumnId) -> CorkboardResult<Vec<Card>> {
        let inner = self.inner.read().await;
        Ok(inner
            .cards
            .values()
            .filter(|c| !c.destroyed && c.column_id == column_id)
            .cloned()
            .collect())
    }

    async fn modify_card(&self, id: CardId, mutation: CardMutation) -> CorkboardResult<Card> {
        let mut inner = self.inner.write().await;
        let card = inner.cards.get_mut(&id).ok_or_else(|| not_found("card", id))?;
        // Mutate a scratch copy so a failed business-rule check writes nothing.
        let mut updated = card.clone();
        mutation(&mut updated)?;
        *card = updated.clone();
        Ok(updated)
    }

    async fn delete_card(&self, id: CardId) -> CorkboardResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .cards
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("card", id))
    }

    async fn delete_cards_for_board(&self, board_id: BoardId) -> CorkboardResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.cards.len();
        inner.cards.retain(|_, c| c.board_id != board_id);
        Ok(before - inner.cards.len())
    }

    async fn delete_cards_for_column(&self, column_id: ColumnId) -> CorkboardResult<usize> {
        let mut inner = self.inner.write().await;
        let before = inner.cards.len();
        inner.cards.retain(|_, c| c.column_id != column_id);
        Ok(before - inner.cards.len())
    }
}

#[async_trait]
impl InvitationGateway for MemoryStore {
    async fn insert_invitation(&self, invitation: Invitation) -> CorkboardResult<Invitation> {
        let mut inner = self.inner.write().await;
        inner.invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn find_invitation(&self, id: InvitationId) -> CorkboardResult<Option<Invitation>> {
        let inner = self.inner.read().await;
        Ok(inner.invitations.get(&id).cloned())
    }

    async fn invitations_for_invitee(
        &self,
        invitee_id: UserId,
    ) -> CorkboardResult<Vec<Invitation>> {
        let inner = self.inner.read().await;
        let mut invitations: Vec<Invitation> = inner
            .invitations
            .values()
            .filter(|i| i.invitee_id == invitee_id)
            .cloned()
            .collect();
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invitations)
    }

    async fn find_pending_invitation(
        &self,
        invitee_id: UserId,
        board_id: BoardId,
    ) -> CorkboardResult<Option<Invitation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .invitations
            .values()
            .find(|i| {
                i.invitee_id == invitee_id
                    && i.board_id == board_id
                    && i.status == InvitationStatus::Pending
            })
            .cloned())
    }

    async fn modify_invitation(
        &self,
        id: InvitationId,
        mutation: InvitationMutation,
    ) -> CorkboardResult<Invitation> {
        let mut inner = self.inner.write().await;
        let invitation = inner
            .invitations
            .get_mut(&id)
            .ok_or_else(|| not_found("invitation", id))?;
        let mut updated = invitation.clone();
        mutation(&mut updated)?;
        *invitation = updated.clone();
        Ok(updated)
    }
}

enum TxWrite {
    SetCardOrder {
        column_id: ColumnId,
        card_order_ids: Vec<CardId>,
    },
    SetCardColumn {
        card_id: CardId,
        column_id: ColumnId,
    },
}

pub struct MemoryTransaction {
    inner: Arc<RwLock<StoreInner>>,
    writes: Vec<TxWrite>,
}

#[async_trait]
impl BoardTransaction for MemoryTransaction {
    fn set_card_order(&mut self, column_id: ColumnId, card_order_ids: Vec<CardId>) {
        self.writes.push(TxWrite::SetCardOrder {
            column_id,
            card_order_ids,
        });
    }

    fn set_card_column(&mut self, card_id: CardId, column_id: ColumnId) {
        self.writes.push(TxWrite::SetCardColumn { card_id, column_id });
    }

    async fn commit(self: Box<Self>) -> CorkboardResult<()> {
        let mut inner = self.inner.write().await;

        // Validate every target before touching anything; a concurrent delete
        // between service-level checks and commit aborts the whole move.
        for write in &self.writes {
            match write {
                TxWrite::SetCardOrder { column_id, .. } => {
                    if !inner.columns.contains_key(column_id) {
                        return Err(CorkboardError::Conflict(format!(
                            "transaction aborted: column {column_id} no longer exists"
                        )));
                    }
                }
                TxWrite::SetCardColumn { card_id, column_id } => {
                    if !inner.cards.contains_key(card_id) {
                        return Err(CorkboardError::Conflict(format!(
                            "transaction aborted: card {card_id} no longer exists"
                        )));
                    }
                    if !inner.columns.contains_key(column_id) {
                        return Err(CorkboardError::Conflict(format!(
                            "transaction aborted: column {column_id} no longer exists"
                        )));
                    }
                }
            }
        }

        for write in self.writes {
            match write {
                TxWrite::SetCardOrder {
                    column_id,
                    card_order_ids,
                } => {
                    if let Some(column) = inner.columns.get_mut(&column_id) {
                        column.set_card_order(card_order_ids);
                    }
                }
                TxWrite::SetCardColumn { card_id, column_id } => {
                    if let Some(card) = inner.cards.get_mut(&card_id) {
                        card.move_to_column(column_id);
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TransactionSource for MemoryStore {
    async fn begin(&self) -> CorkboardResult<Box<dyn BoardTransaction>> {
        Ok(Box::new(MemoryTransaction {
            inner: Arc::clone(&self.inner),
            writes: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_domain::BoardVisibility;
    use uuid::Uuid;

    fn seed_board() -> Board {
        Board::new(
            Uuid::new_v4(),
            "Test Board".to_string(),
            None,
            BoardVisibility::Private,
        )
    }

    #[tokio::test]
    async fn test_board_crud_roundtrip() {
        let store = MemoryStore::new();
        let board = store.insert_board(seed_board()).await.unwrap();

        let found = store.find_board(board.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Test Board");

        store.delete_board(board.id).await.unwrap();
        assert!(store.find_board(board.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_boards_for_user_includes_memberships() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let outsider = Uuid::new_v4();

        let mut board = Board::new(
            owner,
            "Shared Board".to_string(),
            None,
            BoardVisibility::Private,
        );
        board.push_member(member);
        store.insert_board(board).await.unwrap();

        assert_eq!(store.boards_for_user(owner).await.unwrap().len(), 1);
        assert_eq!(store.boards_for_user(member).await.unwrap().len(), 1);
        assert!(store.boards_for_user(outsider).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_modify_card_failure_writes_nothing() {
        let store = MemoryStore::new();
        let card = Card::new(Uuid::new_v4(), Uuid::new_v4(), "A Card".to_string());
        let card_id = card.id;
        store.insert_card(card).await.unwrap();

        let result = store
            .modify_card(
                card_id,
                Box::new(|card| {
                    card.update_title("clobbered".to_string());
                    Err(CorkboardError::Conflict("business rule failed".to_string()))
                }),
            )
            .await;

        assert!(result.is_err());
        let unchanged = store.find_card(card_id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "A Card");
    }

    #[tokio::test]
    async fn test_transaction_commit_applies_all_writes() {
        let store = MemoryStore::new();
        let board_id = Uuid::new_v4();
        let origin = Column::new(board_id, "Origin".to_string());
        let dest = Column::new(board_id, "Dest".to_string());
        let mut card = Card::new(board_id, origin.id, "Mover".to_string());
        card.column_id = origin.id;

        let (origin_id, dest_id, card_id) = (origin.id, dest.id, card.id);
        store.insert_column(origin).await.unwrap();
        store.insert_column(dest).await.unwrap();
        store.insert_card(card).await.unwrap();
        store.set_card_order(origin_id, vec![card_id]).await.unwrap();

        let mut txn = store.begin().await.unwrap();
        txn.set_card_order(origin_id, vec![]);
        txn.set_card_order(dest_id, vec![card_id]);
        txn.set_card_column(card_id, dest_id);
        txn.commit().await.unwrap();

        let origin = store.find_column(origin_id).await.unwrap().unwrap();
        let dest = store.find_column(dest_id).await.unwrap().unwrap();
        let card = store.find_card(card_id).await.unwrap().unwrap();
        assert!(origin.card_order_ids.is_empty());
        assert_eq!(dest.card_order_ids, vec![card_id]);
        assert_eq!(card.column_id, dest_id);
    }

    #[tokio::test]
    async fn test_transaction_aborts_wholesale_on_missing_target() {
        let store = MemoryStore::new();
        let board_id = Uuid::new_v4();
        let origin = Column::new(board_id, "Origin".to_string());
        let card = Card::new(board_id, origin.id, "Mover".to_string());
        let (origin_id, card_id) = (origin.id, card.id);
        store.insert_column(origin).await.unwrap();
        store.insert_card(card).await.unwrap();
        store.set_card_order(origin_id, vec![card_id]).await.unwrap();

        let missing_dest = Uuid::new_v4();
        let mut txn = store.begin().await.unwrap();
        txn.set_card_order(origin_id, vec![]);
        txn.set_card_order(missing_dest, vec![card_id]);
        txn.set_card_column(card_id, missing_dest);

        let err = txn.commit().await.unwrap_err();
        assert!(matches!(err, CorkboardError::Conflict(_)));

        // Nothing moved: the origin write buffered before the bad one is
        // also discarded.
        let origin = store.find_column(origin_id).await.unwrap().unwrap();
        let card = store.find_card(card_id).await.unwrap().unwrap();
        assert_eq!(origin.card_order_ids, vec![card_id]);
        assert_eq!(card.column_id, origin_id);
    }

    #[tokio::test]
    async fn test_dropped_transaction_writes_nothing() {
        let store = MemoryStore::new();
        let board_id = Uuid::new_v4();
        let column = Column::new(board_id, "Origin".to_string());
        let column_id = column.id;
        store.insert_column(column).await.unwrap();

        {
            let mut txn = store.begin().await.unwrap();
            txn.set_card_order(column_id, vec![Uuid::new_v4()]);
            // Dropped without commit.
        }

        let column = store.find_column(column_id).await.unwrap().unwrap();
        assert!(column.card_order_ids.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_set_card_order_last_write_wins() {
        let store = MemoryStore::new();
        let column = Column::new(Uuid::new_v4(), "Busy".to_string());
        let column_id = column.id;
        store.insert_column(column).await.unwrap();

        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let first = vec![a, b, c];
        let second = vec![c, b, a];

        let s1 = store.clone();
        let s2 = store.clone();
        let order1 = first.clone();
        let order2 = second.clone();
        let t1 = tokio::spawn(async move { s1.set_card_order(column_id, order1).await });
        let t2 = tokio::spawn(async move { s2.set_card_order(column_id, order2).await });
        t1.await.unwrap().unwrap();
        t2.await.unwrap().unwrap();

        // Whichever write landed last is intact; never an interleaved hybrid.
        let column = store.find_column(column_id).await.unwrap().unwrap();
        assert!(column.card_order_ids == first || column.card_order_ids == second);
    }
}
