//! Statistics service
//!
//! Stats are never stored: every call recomputes them from the current
//! classes, students, books and active loans.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    api::stats::StatsResponse,
    error::AppResult,
    models::{book::BookRow, loan::LoanEntry},
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let class_counts = self.repository.classes.student_counts().await?;
        let total_students = self.repository.students.count().await?;
        let books = self.repository.books.list().await?;
        let loans = self.repository.loans.list_active(None).await?;

        Ok(compute_stats(total_students, class_counts, &books, &loans, Utc::now()))
    }
}

/// Aggregate counts over the given collections
pub fn compute_stats(
    total_students: i64,
    class_counts: Vec<(String, i64)>,
    books: &[BookRow],
    loans: &[LoanEntry],
    now: DateTime<Utc>,
) -> StatsResponse {
    let total_copies: i64 = books.iter().map(|b| b.quantity).sum();
    let available_copies: i64 = books.iter().map(BookRow::available_copies).sum();
    let class_counts: BTreeMap<String, i64> = class_counts.into_iter().collect();

    StatsResponse {
        total_students,
        total_classes: class_counts.len() as i64,
        total_books: books.len() as i64,
        total_copies,
        borrowed_copies: books.iter().map(|b| b.borrowed_count).sum(),
        available_copies,
        available_books: books.iter().filter(|b| b.can_lend()).count() as i64,
        active_loans: loans.len() as i64,
        overdue_loans: loans.iter().filter(|l| l.is_overdue(now)).count() as i64,
        class_counts,
    }
}
