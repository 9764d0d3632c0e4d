pub mod board;
pub mod card;
pub mod column;
pub mod events;
pub mod field_update;
pub mod invitation;
pub mod label;
pub mod ordering;
pub mod updates;

pub use board::{Board, BoardId, BoardVisibility, UserId};
pub use field_update::FieldUpdate;
pub use card::{Card, CardId, Comment, CommentId};
pub use column::{Column, ColumnId};
pub use events::BoardEvent;
pub use invitation::{Invitation, InvitationId, InvitationStatus};
pub use label::{Label, LabelColor, LabelId};
pub use updates::{
    BoardUpdate, CardMemberAction, CardMemberUpdate, CardMovePayload, CardUpdate, CommentInput,
    ColumnUpdate, LabelInput,
};
