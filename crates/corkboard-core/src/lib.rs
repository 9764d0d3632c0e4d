pub mod config;
pub mod error;
pub mod result;
pub mod validate;

pub use config::AppConfig;
pub use error::CorkboardError;
pub use result::CorkboardResult;
