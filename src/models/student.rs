//! Student model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Student row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub created_at: DateTime<Utc>,
}

/// Active loan as shown on a student record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowedBook {
    pub book_id: Uuid,
    pub book_title: String,
    pub borrowed_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub is_overdue: bool,
}

/// Student with their active loans
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub borrowed_books: Vec<BorrowedBook>,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn from_row(row: StudentRow, borrowed_books: Vec<BorrowedBook>) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            class_name: row.class_name,
            borrowed_books,
            created_at: row.created_at,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudent {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Class name is required"))]
    pub class_name: String,
}

/// Update student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudent {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, message = "Class name cannot be empty"))]
    pub class_name: Option<String>,
}

impl UpdateStudent {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.class_name.is_none()
    }
}
