//! Normalized, display-ordered view of one board. Placeholder cards exist
//! only at this layer: they keep empty columns valid as drop targets and are
//! never sent to the server.

use corkboard_domain::ordering::sort_by_order;
use corkboard_domain::{Board, BoardId, Card, CardId, Column, ColumnId};
use uuid::Uuid;

/// Deterministic placeholder id for a column, stable across clients and
/// re-renders of the same column.
pub fn placeholder_card_id(column_id: ColumnId) -> CardId {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, column_id.as_bytes())
}

/// One slot in a column's card list: a real card or the column's placeholder.
#[derive(Debug, Clone)]
pub enum CardSlot {
    Real(Card),
    Placeholder {
        id: CardId,
        board_id: BoardId,
        column_id: ColumnId,
    },
}

impl CardSlot {
    pub fn placeholder_for(column: &ColumnView) -> Self {
        Self::Placeholder {
            id: placeholder_card_id(column.id),
            board_id: column.board_id,
            column_id: column.id,
        }
    }

    pub fn id(&self) -> CardId {
        match self {
            Self::Real(card) => card.id,
            Self::Placeholder { id, .. } => *id,
        }
    }

    pub fn column_id(&self) -> ColumnId {
        match self {
            Self::Real(card) => card.column_id,
            Self::Placeholder { column_id, .. } => *column_id,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    pub fn as_card(&self) -> Option<&Card> {
        match self {
            Self::Real(card) => Some(card),
            Self::Placeholder { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ColumnView {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    pub cards: Vec<CardSlot>,
    pub card_order_ids: Vec<CardId>,
}

impl ColumnView {
    /// Build a view from a column and its cards, sorted by the column's
    /// order array, with a placeholder materialized when empty.
    pub fn from_parts(column: &Column, cards: Vec<Card>) -> Self {
        let ordered = sort_by_order(cards, &column.card_order_ids, |card| card.id);
        let mut view = Self {
            id: column.id,
            board_id: column.board_id,
            title: column.title.clone(),
            cards: ordered.into_iter().map(CardSlot::Real).collect(),
            card_order_ids: column.card_order_ids.clone(),
        };
        view.ensure_placeholder();
        view.sync_order_ids();
        view
    }

    pub fn has_real_cards(&self) -> bool {
        self.cards.iter().any(|slot| !slot.is_placeholder())
    }

    /// If the column holds no real card, materialize exactly one placeholder.
    /// Idempotent.
    pub fn ensure_placeholder(&mut self) {
        if self.cards.iter().all(|slot| slot.is_placeholder()) {
            let placeholder = CardSlot::placeholder_for(self);
            self.cards = vec![placeholder];
            self.sync_order_ids();
        }
    }

    /// Drop any placeholder and recompute the order array from real cards.
    /// No-op when none is present.
    pub fn remove_placeholder(&mut self) {
        if self.cards.iter().any(|slot| slot.is_placeholder()) {
            self.cards.retain(|slot| !slot.is_placeholder());
            self.sync_order_ids();
        }
    }

    /// Recompute `card_order_ids` from the current card list.
    pub fn sync_order_ids(&mut self) {
        self.card_order_ids = self.cards.iter().map(|slot| slot.id()).collect();
    }

    /// Order ids as the server must see them: a lone placeholder means the
    /// column is empty.
    pub fn persistable_order_ids(&self) -> Vec<CardId> {
        self.cards
            .iter()
            .filter(|slot| !slot.is_placeholder())
            .map(|slot| slot.id())
            .collect()
    }

    /// Strip a stale placeholder when real cards exist, then re-materialize
    /// one if the column ended up empty. Run before arrays leave the client.
    pub fn normalize(&mut self) {
        if self.has_real_cards() {
            self.remove_placeholder();
        }
        self.ensure_placeholder();
    }

    pub fn card_index(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|slot| slot.id() == card_id)
    }
}

#[derive(Debug, Clone)]
pub struct BoardView {
    pub board: Board,
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Assemble the normalized aggregate from a full board fetch: columns
    /// sorted by the board's order array, cards sorted per column, empty
    /// columns given placeholders.
    pub fn hydrate(board: Board, columns: Vec<Column>, cards: Vec<Card>) -> Self {
        let ordered_columns = sort_by_order(columns, &board.column_order_ids, |c| c.id);
        let column_views = ordered_columns
            .iter()
            .map(|column| {
                let column_cards: Vec<Card> = cards
                    .iter()
                    .filter(|card| card.column_id == column.id)
                    .cloned()
                    .collect();
                ColumnView::from_parts(column, column_cards)
            })
            .collect();
        Self {
            board,
            columns: column_views,
        }
    }

    pub fn column(&self, column_id: ColumnId) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: ColumnId) -> Option<&mut ColumnView> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    /// The column currently holding this card (placeholders included).
    pub fn column_of_card(&self, card_id: CardId) -> Option<&ColumnView> {
        self.columns
            .iter()
            .find(|column| column.cards.iter().any(|slot| slot.id() == card_id))
    }

    pub fn column_index(&self, column_id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Re-sort `columns` to match `board.column_order_ids`.
    pub fn resort_columns(&mut self) {
        let order = self.board.column_order_ids.clone();
        let columns = std::mem::take(&mut self.columns);
        self.columns = sort_by_order(columns, &order, |c| c.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_domain::BoardVisibility;

    fn board_with_columns(titles: &[&str]) -> (Board, Vec<Column>) {
        let mut board = Board::new(
            Uuid::new_v4(),
            "View Board".to_string(),
            None,
            BoardVisibility::Private,
        );
        let columns: Vec<Column> = titles
            .iter()
            .map(|t| Column::new(board.id, t.to_string()))
            .collect();
        for column in &columns {
            board.push_column(column.id);
        }
        (board, columns)
    }

    #[test]
    fn test_placeholder_id_is_deterministic() {
        let column_id = Uuid::new_v4();
        assert_eq!(placeholder_card_id(column_id), placeholder_card_id(column_id));
        assert_ne!(
            placeholder_card_id(column_id),
            placeholder_card_id(Uuid::new_v4())
        );
    }

    #[test]
    fn test_hydrate_sorts_and_materializes_placeholders() {
        let (mut board, mut columns) = board_with_columns(&["Todo", "Doing"]);
        let card_b = Card::new(board.id, columns[0].id, "card b".to_string());
        let card_a = Card::new(board.id, columns[0].id, "card a".to_string());
        columns[0].push_card(card_b.id);
        columns[0].push_card(card_a.id);
        // Reverse the column order to prove hydration follows the order array.
        board.set_column_order(vec![columns[1].id, columns[0].id]);

        let view = BoardView::hydrate(
            board,
            columns.clone(),
            vec![card_a.clone(), card_b.clone()],
        );

        assert_eq!(view.columns[0].id, columns[1].id);
        assert_eq!(view.columns[1].id, columns[0].id);

        // Empty column got exactly one placeholder.
        let empty = &view.columns[0];
        assert_eq!(empty.cards.len(), 1);
        assert!(empty.cards[0].is_placeholder());
        assert_eq!(empty.card_order_ids, vec![placeholder_card_id(empty.id)]);
        assert!(empty.persistable_order_ids().is_empty());

        // Populated column keeps the stored order with no placeholder.
        let filled = &view.columns[1];
        assert_eq!(filled.card_order_ids, vec![card_b.id, card_a.id]);
        assert!(filled.cards.iter().all(|slot| !slot.is_placeholder()));
    }

    #[test]
    fn test_ensure_placeholder_is_idempotent() {
        let (board, columns) = board_with_columns(&["Todo"]);
        let view = BoardView::hydrate(board, columns, vec![]);
        let mut column = view.columns[0].clone();

        column.ensure_placeholder();
        column.ensure_placeholder();

        assert_eq!(column.cards.len(), 1);
        assert!(column.cards[0].is_placeholder());
    }

    #[test]
    fn test_normalize_strips_placeholder_once_real_cards_exist() {
        let (board, columns) = board_with_columns(&["Todo"]);
        let view = BoardView::hydrate(board.clone(), columns.clone(), vec![]);
        let mut column = view.columns[0].clone();
        assert!(column.cards[0].is_placeholder());

        let card = Card::new(board.id, columns[0].id, "first real".to_string());
        column.cards.push(CardSlot::Real(card.clone()));
        column.normalize();

        assert_eq!(column.cards.len(), 1);
        assert!(!column.cards[0].is_placeholder());
        assert_eq!(column.card_order_ids, vec![card.id]);
    }
}
