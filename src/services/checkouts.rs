//! Checkout management service

use crate::{
    config::LibraryConfig,
    error::{AppError, AppResult},
    models::{
        book::Book,
        checkout::{BookRecord, Checkout, CheckoutRequest, UserRecord},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CheckoutsService {
    repository: Repository,
    max_per_user: i64,
    list_limit: i64,
}

impl CheckoutsService {
    pub fn new(repository: Repository, library: &LibraryConfig) -> Self {
        Self {
            repository,
            max_per_user: library.max_checkouts_per_user,
            list_limit: library.list_limit,
        }
    }

    /// Take a book off the shelf
    pub async fn checkout(&self, request: CheckoutRequest) -> AppResult<Checkout> {
        tracing::info!(
            "Checking out book {} for user {}",
            request.book_id,
            request.user_id
        );

        match self
            .repository
            .checkouts
            .checkout(request.user_id, request.book_id, self.max_per_user)
            .await
        {
            Ok(checkout) => Ok(checkout),
            Err(e @ (AppError::BookUnavailable(_) | AppError::CheckoutLimitReached(_))) => {
                tracing::warn!(
                    "Checkout of book {} by user {} refused: {}",
                    request.book_id,
                    request.user_id,
                    e
                );
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Put a held book back on the shelf
    pub async fn checkin(&self, request: CheckoutRequest) -> AppResult<Checkout> {
        tracing::info!(
            "Returning book {} by user {}",
            request.book_id,
            request.user_id
        );
        self.repository
            .checkouts
            .checkin(request.user_id, request.book_id)
            .await
    }

    /// Books a user currently holds
    pub async fn current_books(&self, user_id: i32) -> AppResult<Vec<Book>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository
            .checkouts
            .current_books(user_id, self.list_limit)
            .await
    }

    /// A user's borrowing history
    pub async fn user_history(&self, user_id: i32) -> AppResult<Vec<BookRecord>> {
        self.repository
            .checkouts
            .user_history(user_id, self.list_limit)
            .await
    }

    /// A book's borrowing history
    pub async fn book_history(&self, book_id: i32) -> AppResult<Vec<UserRecord>> {
        self.repository
            .checkouts
            .book_history(book_id, self.list_limit)
            .await
    }
}
