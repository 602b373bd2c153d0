//! Loan management service

use chrono::Utc;

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{due_date_for, BorrowReceipt, BorrowRequest, ReturnReceipt, ReturnRequest},
    repository::Repository,
};

use super::locks::BookLocks;

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
    locks: BookLocks,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig, locks: BookLocks) -> Self {
        Self {
            repository,
            config,
            locks,
        }
    }

    /// Lend a copy of a book to a student
    pub async fn borrow(&self, request: BorrowRequest) -> AppResult<BorrowReceipt> {
        let now = Utc::now();
        let due_days = request.due_days.unwrap_or(self.config.default_due_days);
        let due_date = due_date_for(now, due_days, self.config.max_due_days)?;

        let _guard = self.locks.acquire(request.book_id).await;

        let result = self
            .repository
            .loans
            .borrow(request.student_id, request.book_id, now, due_date)
            .await;

        match &result {
            Ok(receipt) => tracing::info!(
                student_id = %receipt.student_id,
                book_id = %receipt.book_id,
                due_date = %receipt.due_date,
                available = receipt.available_copies,
                "Book borrowed"
            ),
            Err(e) => tracing::warn!(
                student_id = %request.student_id,
                book_id = %request.book_id,
                "Borrow refused: {}",
                e
            ),
        }
        result
    }

    /// Take back a copy of a book from a student
    pub async fn return_book(&self, request: ReturnRequest) -> AppResult<ReturnReceipt> {
        // Name the missing record rather than reporting a missing loan
        self.repository.students.get_by_id(request.student_id).await?;
        self.repository.books.get_by_id(request.book_id).await?;

        let _guard = self.locks.acquire(request.book_id).await;

        let result = self
            .repository
            .loans
            .return_book(request.student_id, request.book_id, Utc::now())
            .await;

        match &result {
            Ok(receipt) => tracing::info!(
                student_id = %receipt.student_id,
                book_id = %receipt.book_id,
                overdue = receipt.was_overdue,
                available = receipt.available_copies,
                "Book returned"
            ),
            Err(AppError::NotFound(msg)) => tracing::warn!(
                student_id = %request.student_id,
                book_id = %request.book_id,
                "Return refused: {}",
                msg
            ),
            Err(_) => {}
        }
        result
    }
}
