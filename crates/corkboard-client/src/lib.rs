pub mod board_view;
pub mod drag;
pub mod state;

pub use board_view::{placeholder_card_id, BoardView, CardSlot, ColumnView};
pub use drag::{
    ActiveDrag, DragFrame, DragItemKind, DragReconciler, Droppable, DroppableKind, MoveRequest,
    Point, Rect,
};
pub use state::BoardState;
