//! API handlers module

pub mod articles;
pub mod catalog;
pub mod comments;
pub mod health;
pub mod topics;
pub mod users;

use newsroom_common::errors::{AppError, Result};

/// Parse a numeric path id.
///
/// Ids that are not 32-bit integers never reach the database.
pub(crate) fn parse_id(raw: &str) -> Result<i32> {
    raw.parse::<i32>().map_err(|_| AppError::invalid_input())
}
