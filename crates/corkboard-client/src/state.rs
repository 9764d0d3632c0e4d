//! Client state reconciler: one normalized board aggregate fed by both the
//! optimistic drag path and incoming realtime events. Merge order is
//! last-write-wins; applying a session's own event back is a no-op.

use corkboard_domain::ordering::sort_by_order;
use corkboard_domain::{Board, BoardEvent, Card, Column};

use crate::board_view::{BoardView, CardSlot, ColumnView};

#[derive(Debug, Default)]
pub struct BoardState {
    view: Option<BoardView>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial load from a full board fetch.
    pub fn hydrate(&mut self, board: Board, columns: Vec<Column>, cards: Vec<Card>) {
        self.view = Some(BoardView::hydrate(board, columns, cards));
    }

    pub fn view(&self) -> Option<&BoardView> {
        self.view.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.view.is_some()
    }

    /// Snapshot for optimistic-update rollback.
    pub fn snapshot(&self) -> Option<BoardView> {
        self.view.clone()
    }

    /// Restore the exact pre-optimistic-update snapshot after a rejected move.
    pub fn restore(&mut self, snapshot: BoardView) {
        self.view = Some(snapshot);
    }

    /// Adopt the drag reconciler's already-mutated board copy as the new
    /// truth (the optimistic half of a move).
    pub fn apply_optimistic(&mut self, view: BoardView) {
        self.view = Some(view);
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    /// Apply one realtime event. Events for other boards are ignored;
    /// duplicates (including a session's own event echoed back) are no-ops.
    pub fn apply_event(&mut self, event: &BoardEvent) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        if event.board_id() != view.board.id {
            return;
        }

        match event {
            BoardEvent::BoardUpdated { board } => {
                view.board = board.clone();
                view.resort_columns();
            }
            BoardEvent::BoardDeleted { .. } => {
                self.view = None;
            }
            BoardEvent::ColumnOrderUpdated {
                column_order_ids, ..
            } => {
                view.board.set_column_order(column_order_ids.clone());
                view.resort_columns();
            }
            BoardEvent::ColumnCreated { column } => {
                if view.column(column.id).is_none() {
                    view.columns.push(ColumnView::from_parts(column, vec![]));
                    if !view.board.column_order_ids.contains(&column.id) {
                        view.board.push_column(column.id);
                    }
                }
            }
            BoardEvent::ColumnUpdated { column } => {
                if let Some(existing) = view.column_mut(column.id) {
                    existing.title = column.title.clone();
                    existing.card_order_ids = column.card_order_ids.clone();
                    let cards = std::mem::take(&mut existing.cards);
                    existing.cards =
                        sort_by_order(cards, &column.card_order_ids, |slot| slot.id());
                    existing.normalize();
                }
            }
            BoardEvent::ColumnDeleted { column_id, .. } => {
                view.columns.retain(|c| c.id != *column_id);
                view.board.pull_column(*column_id);
            }
            BoardEvent::CardCreated { card } => {
                if let Some(column) = view.column_mut(card.column_id) {
                    let already_there = column.cards.iter().any(|slot| slot.id() == card.id);
                    if !already_there {
                        column.remove_placeholder();
                        column.cards.push(CardSlot::Real(card.clone()));
                        column.sync_order_ids();
                    }
                }
            }
            BoardEvent::CardUpdated { card } => {
                if let Some(column) = view.column_mut(card.column_id) {
                    if let Some(slot) = column
                        .cards
                        .iter_mut()
                        .find(|slot| slot.id() == card.id)
                    {
                        *slot = CardSlot::Real(card.clone());
                    }
                }
            }
            BoardEvent::CardDeleted {
                column_id, card_id, ..
            } => {
                if let Some(column) = view.column_mut(*column_id) {
                    column.cards.retain(|slot| slot.id() != *card_id);
                    column.ensure_placeholder();
                    column.sync_order_ids();
                }
            }
            BoardEvent::CardMovedAcrossColumns {
                card_id,
                origin_column_id,
                dest_column_id,
                dest_card_order_ids,
                card,
                ..
            } => {
                if let Some(origin) = view.column_mut(*origin_column_id) {
                    origin.cards.retain(|slot| slot.id() != *card_id);
                    origin.ensure_placeholder();
                    origin.sync_order_ids();
                }
                if let Some(dest) = view.column_mut(*dest_column_id) {
                    dest.cards.retain(|slot| slot.id() != *card_id);
                    dest.remove_placeholder();
                    dest.cards.push(CardSlot::Real(card.clone()));
                    let cards = std::mem::take(&mut dest.cards);
                    dest.cards = sort_by_order(cards, dest_card_order_ids, |slot| slot.id());
                    dest.sync_order_ids();
                }
            }
            BoardEvent::MemberJoined { user_id, .. } => {
                view.board.push_member(*user_id);
            }
            BoardEvent::MemberRemoved { user_id, .. } => {
                view.board.pull_member(*user_id);
            }
            BoardEvent::LabelAdded {
                column_id,
                card_id,
                labels,
                ..
            }
            | BoardEvent::LabelUpdated {
                column_id,
                card_id,
                labels,
                ..
            }
            | BoardEvent::LabelRemoved {
                column_id,
                card_id,
                labels,
                ..
            } => {
                if let Some(column) = view.column_mut(*column_id) {
                    if let Some(CardSlot::Real(card)) = column
                        .cards
                        .iter_mut()
                        .find(|slot| slot.id() == *card_id)
                    {
                        card.labels = labels.clone();
                    }
                }
            }
        }
    }
}
