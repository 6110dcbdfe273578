//! Business logic services

pub mod books;
pub mod checkouts;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub checkouts: checkouts::CheckoutsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone(), &config.library),
            books: books::BooksService::new(repository.clone(), &config.library),
            checkouts: checkouts::CheckoutsService::new(repository.clone(), &config.library),
            repository,
        }
    }

    /// True when the database answers
    pub async fn is_ready(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Readiness check failed: {}", e);
                false
            }
        }
    }
}
