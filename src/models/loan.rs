//! Loan (borrow) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::student::BorrowedBook;
use crate::error::{AppError, AppResult};

/// Active loan joined with its book title
#[derive(Debug, Clone, FromRow)]
pub struct LoanEntry {
    pub student_id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub borrowed_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl LoanEntry {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }

    pub fn into_borrowed_book(self, now: DateTime<Utc>) -> BorrowedBook {
        BorrowedBook {
            is_overdue: self.is_overdue(now),
            book_id: self.book_id,
            book_title: self.book_title,
            borrowed_date: self.borrowed_date,
            due_date: self.due_date,
        }
    }
}

/// Borrow request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub student_id: Uuid,
    pub book_id: Uuid,
    /// Loan duration in days (defaults to 14)
    pub due_days: Option<i64>,
}

/// Return request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub student_id: Uuid,
    pub book_id: Uuid,
}

/// Outcome of a successful borrow
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowReceipt {
    pub student_id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub borrowed_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// Copies left on the shelf after this loan
    pub available_copies: i64,
}

/// Outcome of a successful return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnReceipt {
    pub student_id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub borrowed_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_date: DateTime<Utc>,
    pub was_overdue: bool,
    /// Copies on the shelf after this return
    pub available_copies: i64,
}

/// Compute the due date of a loan starting at `now`.
///
/// `due_days` must lie in `1..=max_days`.
pub fn due_date_for(now: DateTime<Utc>, due_days: i64, max_days: i64) -> AppResult<DateTime<Utc>> {
    if !(1..=max_days).contains(&due_days) {
        return Err(AppError::Validation(format!(
            "Loan duration must be between 1 and {} days",
            max_days
        )));
    }
    Ok(now + Duration::days(due_days))
}
