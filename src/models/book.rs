//! Book model and the copy-availability rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Book row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub quantity: i64,
    pub borrowed_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Book with derived availability
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Total number of copies owned
    pub quantity: i64,
    /// Copies currently on loan
    pub borrowed_count: i64,
    /// `quantity - borrowed_count`
    pub available_copies: i64,
    /// At least one copy is on the shelf
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl BookRow {
    pub fn available_copies(&self) -> i64 {
        available_copies(self.quantity, self.borrowed_count)
    }

    pub fn can_lend(&self) -> bool {
        self.available_copies() > 0
    }
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        let available_copies = row.available_copies();
        Self {
            id: row.id,
            title: row.title,
            author: row.author,
            quantity: row.quantity,
            borrowed_count: row.borrowed_count,
            available_copies,
            available: available_copies > 0,
            created_at: row.created_at,
        }
    }
}

/// Copies left on the shelf. Never negative, even for inconsistent input.
pub fn available_copies(quantity: i64, borrowed_count: i64) -> i64 {
    (quantity - borrowed_count).max(0)
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    /// Number of copies (defaults to 1)
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: Option<i64>,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    /// Same bounds as on creation, and never below the copies on loan
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: Option<i64>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.quantity.is_none()
    }
}
