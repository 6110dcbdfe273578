//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookInput, BookQuery},
};

const BOOK_COLUMNS: &str =
    "id, title, author, isbn, description, available, created_at, updated_at";

fn not_found() -> AppError {
    AppError::NotFound("This book was not found in the library".to_string())
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1 AND deleted_at IS NULL",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    /// List books, most recently updated first
    pub async fn list(&self, query: &BookQuery, max_per_page: i64) -> AppResult<Vec<Book>> {
        let (limit, offset) = query.limit_offset(max_per_page);

        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {} FROM books
            WHERE deleted_at IS NULL
              AND ($1::BOOLEAN IS NULL OR available = $1)
            ORDER BY updated_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            BOOK_COLUMNS
        ))
        .bind(query.available)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Create a new book; it starts on the shelf
    pub async fn create(&self, book: &BookInput) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, isbn, description, available, created_at, updated_at)
            VALUES ($1, $2, $3, $4, TRUE, $5, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Replace bibliographic data, keeping availability as it is
    pub async fn update(&self, id: i32, book: &BookInput) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, description = $4, updated_at = $5
            WHERE id = $6 AND deleted_at IS NULL
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.description)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    /// Soft delete a book. Refused while someone holds it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>(
            "SELECT id FROM books WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(not_found)?;

        let checked_out: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM checkouts WHERE book_id = $1 AND NOT checked_in)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if checked_out {
            return Err(AppError::Conflict(
                "Book is checked out and cannot be deleted".to_string(),
            ));
        }

        let now = Utc::now();
        sqlx::query("UPDATE books SET deleted_at = $1, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
