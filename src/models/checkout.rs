//! Checkout model and history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// A user holding (or having held) a book.
/// Rows are never reassigned; checkin only flips `checked_in`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Checkout {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub checked_in: bool,
    /// When the book left the shelf
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// Guard run before a book leaves the shelf, once the user and book rows are locked.
///
/// `open_for_user` is the number of books the user holds, `holder` the user
/// currently holding the requested book, if any. The quota is checked first.
pub fn ensure_checkout_allowed(
    open_for_user: i64,
    max_per_user: i64,
    holder: Option<i32>,
) -> AppResult<()> {
    if open_for_user >= max_per_user {
        return Err(AppError::CheckoutLimitReached(
            "You have checked out too many books.".to_string(),
        ));
    }
    if holder.is_some() {
        return Err(AppError::BookUnavailable(
            "Someone has checked this book out".to_string(),
        ));
    }
    Ok(())
}

/// Checkout / checkin request body
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CheckoutRequest {
    pub user_id: i32,
    pub book_id: i32,
}

/// One entry of a user's borrowing history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookRecord {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub checked_out: DateTime<Utc>,
    /// None while the book is still out
    pub checked_in: Option<DateTime<Utc>>,
}

/// One entry of a book's borrowing history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserRecord {
    pub user_id: i32,
    pub email: String,
    pub checked_out: DateTime<Utc>,
    pub checked_in: Option<DateTime<Utc>>,
}
