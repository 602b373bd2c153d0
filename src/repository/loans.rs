//! Loans repository for database operations
//!
//! A loan row exists only while the book is out. Borrowing and returning
//! each run in one transaction that touches both the `loans` table and the
//! book's `borrowed_count`, so the two never drift apart.

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::available_copies,
        loan::{BorrowReceipt, LoanEntry, ReturnReceipt},
    },
};

const ENTRY_SELECT: &str = r#"
    SELECT l.student_id, l.book_id, b.title AS book_title, l.borrowed_date, l.due_date
    FROM loans l
    JOIN books b ON b.id = l.book_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Active loans of one student, oldest first
    pub async fn get_student_loans(&self, student_id: Uuid) -> AppResult<Vec<LoanEntry>> {
        let loans = sqlx::query_as::<_, LoanEntry>(&format!(
            "{} WHERE l.student_id = ? ORDER BY l.rowid",
            ENTRY_SELECT
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// All active loans, optionally restricted to the students of one class
    pub async fn list_active(&self, class_name: Option<&str>) -> AppResult<Vec<LoanEntry>> {
        let loans = match class_name {
            Some(class_name) => {
                sqlx::query_as::<_, LoanEntry>(&format!(
                    "{} JOIN students s ON s.id = l.student_id WHERE s.class_name = ? ORDER BY l.rowid",
                    ENTRY_SELECT
                ))
                .bind(class_name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, LoanEntry>(&format!("{} ORDER BY l.rowid", ENTRY_SELECT))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(loans)
    }

    /// Lend one copy of a book to a student.
    ///
    /// The counter increment is the first statement of the transaction and
    /// only succeeds while `borrowed_count < quantity`, so the database
    /// itself refuses to lend a copy that is not on the shelf.
    pub async fn borrow(
        &self,
        student_id: Uuid,
        book_id: Uuid,
        borrowed_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<BorrowReceipt> {
        let mut tx = self.pool.begin().await?;

        let reserved = sqlx::query(
            "UPDATE books SET borrowed_count = borrowed_count + 1 WHERE id = ? AND borrowed_count < quantity",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            let book_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
            return Err(if book_exists {
                AppError::BusinessRule("No copies available".to_string())
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        }

        let student_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = ?)")
            .bind(student_id)
            .fetch_one(&mut *tx)
            .await?;
        if !student_exists {
            return Err(AppError::NotFound(format!("Student with id {} not found", student_id)));
        }

        sqlx::query(
            r#"
            INSERT INTO loans (id, student_id, book_id, borrowed_date, due_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(book_id)
        .bind(borrowed_date)
        .bind(due_date)
        .execute(&mut *tx)
        .await?;

        let (book_title, quantity, borrowed_count): (String, i64, i64) =
            sqlx::query_as("SELECT title, quantity, borrowed_count FROM books WHERE id = ?")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(BorrowReceipt {
            student_id,
            book_id,
            book_title,
            borrowed_date,
            due_date,
            available_copies: available_copies(quantity, borrowed_count),
        })
    }

    /// Take back one copy of a book from a student.
    ///
    /// Removes the student's oldest active loan of that book and releases
    /// the copy. The counter never drops below zero.
    pub async fn return_book(
        &self,
        student_id: Uuid,
        book_id: Uuid,
        returned_date: DateTime<Utc>,
    ) -> AppResult<ReturnReceipt> {
        let mut tx = self.pool.begin().await?;

        let loan: Option<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            DELETE FROM loans
            WHERE id = (
                SELECT id FROM loans
                WHERE student_id = ? AND book_id = ?
                ORDER BY rowid
                LIMIT 1
            )
            RETURNING borrowed_date, due_date
            "#,
        )
        .bind(student_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((borrowed_date, due_date)) = loan else {
            return Err(AppError::NotFound(
                "No active loan of this book for this student".to_string(),
            ));
        };

        let (book_title, quantity, borrowed_count): (String, i64, i64) = sqlx::query_as(
            r#"
            UPDATE books SET borrowed_count = MAX(borrowed_count - 1, 0)
            WHERE id = ?
            RETURNING title, quantity, borrowed_count
            "#,
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ReturnReceipt {
            student_id,
            book_id,
            book_title,
            borrowed_date,
            due_date,
            returned_date,
            was_overdue: due_date < returned_date,
            available_copies: available_copies(quantity, borrowed_count),
        })
    }
}
