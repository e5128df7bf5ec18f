//! Convenience result type alias for GameForge.

use crate::error::AppError;

/// A specialized `Result` type for GameForge operations.
pub type AppResult<T> = Result<T, AppError>;
