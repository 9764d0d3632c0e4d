pub mod collision;
pub mod reconciler;

pub use collision::{closest_corners, pointer_within, Droppable, DroppableKind, Point, Rect};
pub use reconciler::{ActiveDrag, DragFrame, DragItemKind, DragReconciler, MoveRequest};
