pub mod error;
pub mod realtime;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
