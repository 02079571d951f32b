//! Application result alias

use super::AppError;

/// Result type used by handlers and services
pub type AppResult<T> = Result<T, AppError>;
