pub mod rooms;
pub mod socket;

pub use rooms::RoomRegistry;
pub use socket::{ws_handler, ClientMessage, ServerMessage};
