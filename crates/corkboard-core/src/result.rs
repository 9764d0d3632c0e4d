use crate::error::CorkboardError;

pub type CorkboardResult<T> = Result<T, CorkboardError>;
