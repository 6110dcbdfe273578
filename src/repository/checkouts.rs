//! Checkouts repository: the checkout/checkin transitions and borrowing history

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        checkout::{ensure_checkout_allowed, BookRecord, Checkout, UserRecord},
    },
};

const CHECKOUT_COLUMNS: &str =
    "id, user_id, book_id, checked_in, created_at, updated_at, checked_in_at";

#[derive(Clone)]
pub struct CheckoutsRepository {
    pool: Pool<Postgres>,
}

impl CheckoutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Check a book out to a user.
    ///
    /// Runs in one transaction holding row locks on the user and the book, so
    /// concurrent checkouts of the same book, or by the same user, are serialized
    /// and the availability flag always matches the open checkout rows.
    pub async fn checkout(&self, user_id: i32, book_id: i32, max_per_user: i64) -> AppResult<Checkout> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>(
            "SELECT id FROM users WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user_id)))?;

        sqlx::query_scalar::<_, i32>(
            "SELECT id FROM books WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("This book was not found in the library".to_string()))?;

        let open_for_user: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM checkouts WHERE user_id = $1 AND NOT checked_in",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let holder: Option<i32> = sqlx::query_scalar(
            "SELECT user_id FROM checkouts WHERE book_id = $1 AND NOT checked_in",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        ensure_checkout_allowed(open_for_user, max_per_user, holder)?;

        let now = Utc::now();

        sqlx::query("UPDATE books SET available = FALSE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let checkout = sqlx::query_as::<_, Checkout>(&format!(
            r#"
            INSERT INTO checkouts (user_id, book_id, checked_in, created_at, updated_at)
            VALUES ($1, $2, FALSE, $3, $3)
            RETURNING {}
            "#,
            CHECKOUT_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match AppError::on_unique_violation(e, "Someone has checked this book out") {
            AppError::Conflict(msg) => AppError::BookUnavailable(msg),
            other => other,
        })?;

        tx.commit().await?;
        Ok(checkout)
    }

    /// Return a book the user currently holds
    pub async fn checkin(&self, user_id: i32, book_id: i32) -> AppResult<Checkout> {
        let mut tx = self.pool.begin().await?;

        let open_id: i32 = sqlx::query_scalar(
            r#"
            SELECT id FROM checkouts
            WHERE user_id = $1 AND book_id = $2 AND NOT checked_in
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotCheckedOut("You do not currently have this book checked out".to_string())
        })?;

        let now = Utc::now();

        let checkout = sqlx::query_as::<_, Checkout>(&format!(
            r#"
            UPDATE checkouts SET checked_in = TRUE, checked_in_at = $1, updated_at = $1
            WHERE id = $2
            RETURNING {}
            "#,
            CHECKOUT_COLUMNS
        ))
        .bind(now)
        .bind(open_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET available = TRUE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(checkout)
    }

    /// Books the user currently holds
    pub async fn current_books(&self, user_id: i32, limit: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.author, b.isbn, b.description, b.available,
                   b.created_at, b.updated_at
            FROM checkouts c
            JOIN books b ON b.id = c.book_id
            WHERE c.user_id = $1 AND NOT c.checked_in AND b.deleted_at IS NULL
            ORDER BY c.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Everything a user has borrowed, newest first
    pub async fn user_history(&self, user_id: i32, limit: i64) -> AppResult<Vec<BookRecord>> {
        let records = sqlx::query_as::<_, BookRecord>(
            r#"
            SELECT b.id AS book_id, b.title, b.author,
                   c.created_at AS checked_out, c.checked_in_at AS checked_in
            FROM checkouts c
            JOIN books b ON b.id = c.book_id
            WHERE c.user_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Everyone who has borrowed a book, newest first
    pub async fn book_history(&self, book_id: i32, limit: i64) -> AppResult<Vec<UserRecord>> {
        let records = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id AS user_id, u.email,
                   c.created_at AS checked_out, c.checked_in_at AS checked_in
            FROM checkouts c
            JOIN users u ON u.id = c.user_id
            WHERE c.book_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2
            "#,
        )
        .bind(book_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
