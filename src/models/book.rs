//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub description: String,
    /// False while an open checkout exists for this book
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace a book's bibliographic data.
/// Availability is owned by the checkout flow and never taken from requests.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, message = "Required Title"))]
    #[serde(default)]
    pub title: String,
    #[validate(length(min = 1, message = "Required Author"))]
    #[serde(default)]
    pub author: String,
    #[validate(length(min = 1, message = "Required Isbn"))]
    #[serde(default)]
    pub isbn: String,
    #[validate(length(min = 1, message = "Required Description"))]
    #[serde(default)]
    pub description: String,
}

impl BookInput {
    /// Trim every field and check that none is empty
    pub fn prepare(mut self) -> AppResult<Self> {
        for field in [
            &mut self.title,
            &mut self.author,
            &mut self.isbn,
            &mut self.description,
        ] {
            *field = field.trim().to_string();
        }
        self.validate().map_err(|e| {
            AppError::from_validation(e, &["title", "author", "isbn", "description"])
        })?;
        Ok(self)
    }
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Only books that are (or are not) on the shelf
    pub available: Option<bool>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl BookQuery {
    /// Resolve `(limit, offset)`, capping the page size at `max_per_page`
    pub fn limit_offset(&self, max_per_page: i64) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(max_per_page).clamp(1, max_per_page);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1).saturating_mul(per_page))
    }
}
