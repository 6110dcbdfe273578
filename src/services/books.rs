//! Catalog management service

use crate::{
    config::LibraryConfig,
    error::AppResult,
    models::book::{Book, BookInput, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    list_limit: i64,
}

impl BooksService {
    pub fn new(repository: Repository, library: &LibraryConfig) -> Self {
        Self {
            repository,
            list_limit: library.list_limit,
        }
    }

    /// List books
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query, self.list_limit).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Add a book to the catalog
    pub async fn create_book(&self, book: BookInput) -> AppResult<Book> {
        let book = book.prepare()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!("Created book {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Replace a book's bibliographic data
    pub async fn update_book(&self, id: i32, book: BookInput) -> AppResult<Book> {
        let book = book.prepare()?;
        let updated = self.repository.books.update(id, &book).await?;
        tracing::info!("Updated book {}", id);
        Ok(updated)
    }

    /// Remove a book from the catalog
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
