//! Result alias used across all coedit crates.

use crate::error::AppError;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;
