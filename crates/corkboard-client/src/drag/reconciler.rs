//! Optimistic drag-and-drop engine. Owns a working copy of the board view,
//! mutates it locally while a drag is in flight, and resolves the drag into
//! a move request for the network layer.

use corkboard_core::{CorkboardError, CorkboardResult};
use corkboard_domain::ordering::reorder;
use corkboard_domain::{Card, CardMovePayload, ColumnId};
use uuid::Uuid;

use crate::board_view::{BoardView, CardSlot, ColumnView};
use crate::drag::collision::{closest_corners, pointer_within, Droppable, Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragItemKind {
    Column,
    Card,
}

/// The single in-flight drag. At most one exists at a time; starting a new
/// drag while one is active is rejected.
#[derive(Debug, Clone)]
pub struct ActiveDrag {
    pub item_id: Uuid,
    pub kind: DragItemKind,
    /// Snapshot of the dragged card at drag start.
    pub card: Option<Card>,
    /// The column holding the card when the drag began. The live column can
    /// change with every `drag_over`; the move request compares against this.
    pub origin_column_id: Option<ColumnId>,
}

/// One frame of pointer input: where the pointer is, where the dragged rect
/// currently sits, and every droppable's rect this frame.
#[derive(Debug, Clone)]
pub struct DragFrame {
    pub pointer: Point,
    pub active_rect: Rect,
    pub droppables: Vec<Droppable>,
}

/// What the network layer should do once a drag resolves.
#[derive(Debug, Clone)]
pub enum MoveRequest {
    ColumnReorder {
        board_id: Uuid,
        column_order_ids: Vec<ColumnId>,
    },
    CardWithinColumn {
        column_id: ColumnId,
        card_order_ids: Vec<Uuid>,
    },
    CardAcrossColumns { payload: CardMovePayload },
}

pub struct DragReconciler {
    board: BoardView,
    active: Option<ActiveDrag>,
    /// Last collision target, reused when a frame produces none so the drop
    /// target does not flicker away mid-drag.
    last_over_id: Option<Uuid>,
}

impl DragReconciler {
    pub fn new(board: BoardView) -> Self {
        Self {
            board,
            active: None,
            last_over_id: None,
        }
    }

    /// Replace the working copy, e.g. after the state reconciler applied a
    /// remote event.
    pub fn sync_board(&mut self, board: BoardView) {
        self.board = board;
    }

    pub fn board(&self) -> &BoardView {
        &self.board
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn drag_start(&mut self, item_id: Uuid) -> CorkboardResult<()> {
        if self.active.is_some() {
            return Err(CorkboardError::Conflict(
                "a drag is already in progress".to_string(),
            ));
        }

        if self.board.column_index(item_id).is_some() {
            self.active = Some(ActiveDrag {
                item_id,
                kind: DragItemKind::Column,
                card: None,
                origin_column_id: None,
            });
            return Ok(());
        }

        let column = self
            .board
            .column_of_card(item_id)
            .ok_or_else(|| CorkboardError::NotFound(format!("drag item {item_id} not found")))?;
        let slot = column
            .cards
            .iter()
            .find(|slot| slot.id() == item_id)
            .expect("column_of_card guarantees the slot exists");
        let card = slot.as_card().cloned().ok_or_else(|| {
            CorkboardError::Validation("placeholder cards cannot be dragged".to_string())
        })?;

        tracing::debug!(%item_id, origin_column = %column.id, "card drag started");
        self.active = Some(ActiveDrag {
            item_id,
            kind: DragItemKind::Card,
            origin_column_id: Some(column.id),
            card: Some(card),
        });
        Ok(())
    }

    /// Continuous hover handling. Only card drags mutate state here; column
    /// reordering resolves entirely in `drag_end`.
    pub fn drag_over(&mut self, frame: &DragFrame) {
        let Some(active) = self.active.clone() else {
            return;
        };
        if active.kind != DragItemKind::Card {
            return;
        }
        let Some(over_id) = self.resolve_target(&active, frame) else {
            return;
        };

        let Some(live_column_id) = self.board.column_of_card(active.item_id).map(|c| c.id) else {
            return;
        };
        let Some(over_column_id) = self.column_for_target(over_id) else {
            return;
        };

        if live_column_id != over_column_id {
            let index = self.insertion_index(over_column_id, over_id, frame);
            self.move_card_between_columns(live_column_id, over_column_id, &active, index);
        }
    }

    /// Resolve the drag. Always returns to Idle; `None` means nothing to
    /// persist (no-op drop or abandoned drag).
    pub fn drag_end(&mut self, frame: &DragFrame) -> Option<MoveRequest> {
        let active = self.active.take()?;
        let over_id = self.resolve_target(&active, frame);
        self.last_over_id = None;

        let Some(over_id) = over_id else {
            tracing::debug!(item_id = %active.item_id, "drag abandoned with no target");
            return None;
        };

        match active.kind {
            DragItemKind::Column => self.finish_column_drag(&active, over_id),
            DragItemKind::Card => self.finish_card_drag(&active, over_id, frame),
        }
    }

    fn finish_column_drag(&mut self, active: &ActiveDrag, over_id: Uuid) -> Option<MoveRequest> {
        if over_id == active.item_id {
            return None;
        }
        let old_index = self.board.column_index(active.item_id)?;
        let new_index = self.board.column_index(over_id)?;
        if old_index == new_index {
            return None;
        }

        self.board.columns = reorder(&self.board.columns, old_index, new_index);
        let column_order_ids: Vec<ColumnId> = self.board.columns.iter().map(|c| c.id).collect();
        self.board.board.set_column_order(column_order_ids.clone());

        Some(MoveRequest::ColumnReorder {
            board_id: self.board.board.id,
            column_order_ids,
        })
    }

    fn finish_card_drag(
        &mut self,
        active: &ActiveDrag,
        over_id: Uuid,
        frame: &DragFrame,
    ) -> Option<MoveRequest> {
        let origin_column_id = active.origin_column_id?;
        let live_column_id = self.board.column_of_card(active.item_id).map(|c| c.id)?;
        let over_column_id = self.column_for_target(over_id)?;

        if origin_column_id != over_column_id {
            // Apply the final position locally, then normalize every column so
            // the arrays handed to the network layer never mix placeholder and
            // real ids.
            let index = self.insertion_index(over_column_id, over_id, frame);
            self.move_card_between_columns(live_column_id, over_column_id, active, index);
            for column in &mut self.board.columns {
                column.normalize();
            }

            let origin_card_order_ids = self
                .board
                .column(origin_column_id)
                .map(|c| c.persistable_order_ids())?;
            let dest_card_order_ids = self
                .board
                .column(over_column_id)
                .map(|c| c.persistable_order_ids())?;

            return Some(MoveRequest::CardAcrossColumns {
                payload: CardMovePayload {
                    current_card_id: active.item_id,
                    original_column_id: origin_column_id,
                    original_card_order_ids: origin_card_order_ids,
                    new_column_id: over_column_id,
                    new_card_order_ids: dest_card_order_ids,
                },
            });
        }

        // Same column: a plain reorder.
        let column = self.board.column(origin_column_id)?;
        let old_index = column.card_index(active.item_id)?;
        let new_index = column.card_index(over_id)?;
        if old_index == new_index {
            return None;
        }

        let column = self.board.column_mut(origin_column_id)?;
        column.cards = reorder(&column.cards, old_index, new_index);
        column.sync_order_ids();
        let card_order_ids = column.card_order_ids.clone();

        Some(MoveRequest::CardWithinColumn {
            column_id: origin_column_id,
            card_order_ids,
        })
    }

    /// Collision strategy. Columns use corner proximity against every
    /// droppable column. Cards resolve pointer containment first; a hit on a
    /// column container is narrowed to that column's own cards so a card
    /// dropped over empty column space still lands among its cards. Falls
    /// back to the previous frame's target when nothing collides.
    fn resolve_target(&mut self, active: &ActiveDrag, frame: &DragFrame) -> Option<Uuid> {
        if active.kind == DragItemKind::Column {
            let columns: Vec<Droppable> = frame
                .droppables
                .iter()
                .filter(|d| self.board.column_index(d.id).is_some())
                .cloned()
                .collect();
            let over = closest_corners(&frame.active_rect, &columns);
            if over.is_some() {
                self.last_over_id = over;
            }
            return over.or(self.last_over_id);
        }

        let hits = pointer_within(frame.pointer, &frame.droppables);
        let Some(first) = hits.first().copied() else {
            return self.last_over_id;
        };

        let over = if let Some(column) = self.board.column(first) {
            let card_ids = &column.card_order_ids;
            let narrowed: Vec<Droppable> = frame
                .droppables
                .iter()
                .filter(|d| d.id != first && card_ids.contains(&d.id))
                .cloned()
                .collect();
            closest_corners(&frame.active_rect, &narrowed).unwrap_or(first)
        } else {
            first
        };

        self.last_over_id = Some(over);
        Some(over)
    }

    /// The column a collision target belongs to: itself when the target is a
    /// column container, otherwise the column holding the target card.
    fn column_for_target(&self, over_id: Uuid) -> Option<ColumnId> {
        if self.board.column_index(over_id).is_some() {
            return Some(over_id);
        }
        self.board.column_of_card(over_id).map(|c| c.id)
    }

    /// Where to splice the dragged card into the target column: after the
    /// hovered card when the dragged rect has passed below it, before it
    /// otherwise, and at the end when hovering the column body itself.
    fn insertion_index(&self, over_column_id: ColumnId, over_id: Uuid, frame: &DragFrame) -> usize {
        let Some(column) = self.board.column(over_column_id) else {
            return 0;
        };
        match column.card_index(over_id) {
            Some(over_index) => {
                let below = frame
                    .droppables
                    .iter()
                    .find(|d| d.id == over_id)
                    .map(|d| frame.active_rect.top() > d.rect.top() + d.rect.height)
                    .unwrap_or(false);
                over_index + usize::from(below)
            }
            None => column.cards.len(),
        }
    }

    /// Move the dragged card between columns in local state only: remove from
    /// the source (placeholder in if it empties), splice into the target at
    /// `index`, strip the target's placeholder, resync both order arrays.
    fn move_card_between_columns(
        &mut self,
        source_column_id: ColumnId,
        target_column_id: ColumnId,
        active: &ActiveDrag,
        index: usize,
    ) {
        let Some(card) = active.card.clone() else {
            return;
        };

        if let Some(source) = self.board.column_mut(source_column_id) {
            source.cards.retain(|slot| slot.id() != active.item_id);
            source.ensure_placeholder();
            source.sync_order_ids();
        }

        if let Some(target) = self.board.column_mut(target_column_id) {
            target.cards.retain(|slot| slot.id() != active.item_id);
            let mut moved = card;
            moved.column_id = target_column_id;
            let index = index.min(target.cards.len());
            target.cards.insert(index, CardSlot::Real(moved));
            target.remove_placeholder();
            target.sync_order_ids();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_view::placeholder_card_id;
    use crate::drag::collision::DroppableKind;
    use corkboard_domain::{Board, BoardVisibility, Column};

    const COLUMN_WIDTH: f64 = 300.0;
    const CARD_HEIGHT: f64 = 80.0;

    struct Fixture {
        reconciler: DragReconciler,
        board: Board,
        column_ids: Vec<ColumnId>,
    }

    /// Build a board whose columns sit side by side, each holding the given
    /// number of cards stacked vertically.
    fn fixture(cards_per_column: &[usize]) -> Fixture {
        let mut board = Board::new(
            Uuid::new_v4(),
            "Drag Board".to_string(),
            None,
            BoardVisibility::Private,
        );
        let mut columns = Vec::new();
        let mut cards = Vec::new();
        for (i, count) in cards_per_column.iter().enumerate() {
            let mut column = Column::new(board.id, format!("Column {i}"));
            for j in 0..*count {
                let card = Card::new(board.id, column.id, format!("card {i}.{j}"));
                column.push_card(card.id);
                cards.push(card);
            }
            board.push_column(column.id);
            columns.push(column);
        }
        let column_ids = columns.iter().map(|c| c.id).collect();
        let view = BoardView::hydrate(board.clone(), columns, cards);
        Fixture {
            reconciler: DragReconciler::new(view),
            board,
            column_ids,
        }
    }

    fn column_rect(column_index: usize) -> Rect {
        Rect::new(column_index as f64 * COLUMN_WIDTH, 0.0, COLUMN_WIDTH, 600.0)
    }

    fn card_rect(column_index: usize, card_index: usize) -> Rect {
        Rect::new(
            column_index as f64 * COLUMN_WIDTH,
            card_index as f64 * CARD_HEIGHT,
            COLUMN_WIDTH,
            CARD_HEIGHT,
        )
    }

    /// Droppables for the board's current layout: one per column plus one per
    /// card slot (placeholders included, exactly as the UI registers them).
    fn droppables(reconciler: &DragReconciler) -> Vec<Droppable> {
        let mut all = Vec::new();
        for (ci, column) in reconciler.board().columns.iter().enumerate() {
            all.push(Droppable::new(column.id, DroppableKind::Column, column_rect(ci)));
            for (si, slot) in column.cards.iter().enumerate() {
                all.push(Droppable::new(slot.id(), DroppableKind::Card, card_rect(ci, si)));
            }
        }
        all
    }

    fn frame_over(reconciler: &DragReconciler, pointer: Point, active_rect: Rect) -> DragFrame {
        DragFrame {
            pointer,
            active_rect,
            droppables: droppables(reconciler),
        }
    }

    #[test]
    fn test_same_column_reorder_scenario() {
        // Column X has [c1, c2, c3]; drag c1 onto c3 (index 2).
        let mut fx = fixture(&[3]);
        let column_id = fx.column_ids[0];
        let ids = fx.reconciler.board().column(column_id).unwrap().card_order_ids.clone();
        let (c1, c2, c3) = (ids[0], ids[1], ids[2]);

        fx.reconciler.drag_start(c1).unwrap();
        // Pointer over c3's slot.
        let frame = frame_over(
            &fx.reconciler,
            Point::new(150.0, 2.5 * CARD_HEIGHT),
            card_rect(0, 2),
        );
        let request = fx.reconciler.drag_end(&frame).unwrap();

        match request {
            MoveRequest::CardWithinColumn {
                column_id: id,
                card_order_ids,
            } => {
                assert_eq!(id, column_id);
                assert_eq!(card_order_ids, vec![c2, c3, c1]);
            }
            other => panic!("expected CardWithinColumn, got {other:?}"),
        }
        let column = fx.reconciler.board().column(column_id).unwrap();
        assert_eq!(column.card_order_ids, vec![c2, c3, c1]);
        assert!(!fx.reconciler.is_dragging());
    }

    #[test]
    fn test_cross_column_move_into_empty_column_scenario() {
        // Column X holds [c1]; column Y is empty (placeholder only).
        let mut fx = fixture(&[1, 0]);
        let x = fx.column_ids[0];
        let y = fx.column_ids[1];
        let c1 = fx.reconciler.board().column(x).unwrap().card_order_ids[0];
        assert_eq!(
            fx.reconciler.board().column(y).unwrap().card_order_ids,
            vec![placeholder_card_id(y)]
        );

        fx.reconciler.drag_start(c1).unwrap();
        // Hover over column Y's body.
        let over_y = frame_over(
            &fx.reconciler,
            Point::new(1.5 * COLUMN_WIDTH, 300.0),
            Rect::new(COLUMN_WIDTH + 10.0, 300.0, COLUMN_WIDTH, CARD_HEIGHT),
        );
        fx.reconciler.drag_over(&over_y);

        // Mid-drag: X got a fresh placeholder, Y's placeholder is gone.
        let x_column = fx.reconciler.board().column(x).unwrap();
        assert_eq!(x_column.card_order_ids, vec![placeholder_card_id(x)]);
        let y_column = fx.reconciler.board().column(y).unwrap();
        assert_eq!(y_column.card_order_ids, vec![c1]);

        let drop = frame_over(
            &fx.reconciler,
            Point::new(1.5 * COLUMN_WIDTH, 300.0),
            Rect::new(COLUMN_WIDTH + 10.0, 300.0, COLUMN_WIDTH, CARD_HEIGHT),
        );
        let request = fx.reconciler.drag_end(&drop).unwrap();

        match request {
            MoveRequest::CardAcrossColumns { payload } => {
                assert_eq!(payload.current_card_id, c1);
                assert_eq!(payload.original_column_id, x);
                assert_eq!(payload.new_column_id, y);
                // Placeholder ids never reach the wire.
                assert!(payload.original_card_order_ids.is_empty());
                assert_eq!(payload.new_card_order_ids, vec![c1]);
            }
            other => panic!("expected CardAcrossColumns, got {other:?}"),
        }
        assert!(!fx.reconciler.is_dragging());
    }

    #[test]
    fn test_column_reorder() {
        let mut fx = fixture(&[1, 1, 1]);
        let first = fx.column_ids[0];

        fx.reconciler.drag_start(first).unwrap();
        // Drop the first column onto the third's position.
        let frame = frame_over(
            &fx.reconciler,
            Point::new(2.5 * COLUMN_WIDTH, 300.0),
            column_rect(2),
        );
        let request = fx.reconciler.drag_end(&frame).unwrap();

        let expected = vec![fx.column_ids[1], fx.column_ids[2], fx.column_ids[0]];
        match request {
            MoveRequest::ColumnReorder {
                board_id,
                column_order_ids,
            } => {
                assert_eq!(board_id, fx.board.id);
                assert_eq!(column_order_ids, expected);
            }
            other => panic!("expected ColumnReorder, got {other:?}"),
        }
        assert_eq!(fx.reconciler.board().board.column_order_ids, expected);
    }

    #[test]
    fn test_dropping_column_on_itself_is_a_noop() {
        let mut fx = fixture(&[1, 1]);
        let first = fx.column_ids[0];

        fx.reconciler.drag_start(first).unwrap();
        let frame = frame_over(&fx.reconciler, Point::new(150.0, 300.0), column_rect(0));
        assert!(fx.reconciler.drag_end(&frame).is_none());
        assert_eq!(
            fx.reconciler.board().board.column_order_ids,
            vec![fx.column_ids[0], fx.column_ids[1]]
        );
    }

    #[test]
    fn test_abandoned_drag_keeps_last_drag_over_state() {
        let mut fx = fixture(&[1, 1]);
        let x = fx.column_ids[0];
        let y = fx.column_ids[1];
        let c1 = fx.reconciler.board().column(x).unwrap().card_order_ids[0];

        fx.reconciler.drag_start(c1).unwrap();
        let over_y = frame_over(
            &fx.reconciler,
            Point::new(1.5 * COLUMN_WIDTH, 40.0),
            Rect::new(COLUMN_WIDTH + 10.0, 0.0, COLUMN_WIDTH, CARD_HEIGHT),
        );
        fx.reconciler.drag_over(&over_y);

        // Release the pointer outside every droppable, with no prior target
        // from this frame and the history cleared by taking it off-screen.
        let mut abandoned = frame_over(
            &fx.reconciler,
            Point::new(-500.0, -500.0),
            Rect::new(-500.0, -500.0, COLUMN_WIDTH, CARD_HEIGHT),
        );
        abandoned.droppables.clear();
        let mut lost = fx.reconciler;
        lost.last_over_id = None;
        assert!(lost.drag_end(&abandoned).is_none());

        // The card stays where the last drag_over put it.
        assert!(lost.board().column(y).unwrap().card_order_ids.contains(&c1));
        assert!(!lost.is_dragging());
    }

    #[test]
    fn test_placeholder_cannot_be_dragged() {
        let mut fx = fixture(&[0]);
        let placeholder = placeholder_card_id(fx.column_ids[0]);
        let err = fx.reconciler.drag_start(placeholder).unwrap_err();
        assert!(matches!(err, CorkboardError::Validation(_)));
    }

    #[test]
    fn test_second_drag_start_is_rejected_while_dragging() {
        let mut fx = fixture(&[2]);
        let ids = fx.reconciler.board().column(fx.column_ids[0]).unwrap().card_order_ids.clone();

        fx.reconciler.drag_start(ids[0]).unwrap();
        let err = fx.reconciler.drag_start(ids[1]).unwrap_err();
        assert!(matches!(err, CorkboardError::Conflict(_)));
    }

    #[test]
    fn test_collision_falls_back_to_last_target() {
        let mut fx = fixture(&[1, 1]);
        let x = fx.column_ids[0];
        let y = fx.column_ids[1];
        let c1 = fx.reconciler.board().column(x).unwrap().card_order_ids[0];

        fx.reconciler.drag_start(c1).unwrap();
        let over_y = frame_over(
            &fx.reconciler,
            Point::new(1.5 * COLUMN_WIDTH, 40.0),
            Rect::new(COLUMN_WIDTH + 10.0, 0.0, COLUMN_WIDTH, CARD_HEIGHT),
        );
        fx.reconciler.drag_over(&over_y);

        // Pointer leaves every droppable for the drop frame; the previous
        // target is reused and the move still completes into Y.
        let gap = frame_over(
            &fx.reconciler,
            Point::new(-50.0, -50.0),
            Rect::new(-50.0, -50.0, COLUMN_WIDTH, CARD_HEIGHT),
        );
        let request = fx.reconciler.drag_end(&gap);
        match request {
            Some(MoveRequest::CardAcrossColumns { payload }) => {
                assert_eq!(payload.new_column_id, y);
            }
            other => panic!("expected CardAcrossColumns, got {other:?}"),
        }
    }
}
