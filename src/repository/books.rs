//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{BookRow, CreateBook, UpdateBook},
};

const BOOK_COLUMNS: &str = "id, title, author, quantity, borrowed_count, created_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookRow> {
        sqlx::query_as::<_, BookRow>(&format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List all books ordered by title
    pub async fn list(&self) -> AppResult<Vec<BookRow>> {
        let books = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books ORDER BY title, author",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Create a book with no copies on loan
    pub async fn create(&self, data: &CreateBook) -> AppResult<BookRow> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            INSERT INTO books (id, title, author, quantity, borrowed_count, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.quantity.unwrap_or(1))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the provided fields of a book.
    ///
    /// A new quantity is only applied when it still covers the copies on loan.
    pub async fn update(&self, id: Uuid, data: &UpdateBook) -> AppResult<BookRow> {
        let mut sets = Vec::new();

        macro_rules! add_field {
            ($field:expr, $name:literal) => {
                if $field.is_some() {
                    sets.push(concat!($name, " = ?"));
                }
            };
        }

        add_field!(data.title, "title");
        add_field!(data.author, "author");
        add_field!(data.quantity, "quantity");

        if sets.is_empty() {
            return Err(AppError::BadRequest("No valid fields provided for update".to_string()));
        }

        let query = format!(
            "UPDATE books SET {} WHERE id = ? AND borrowed_count <= ? RETURNING {}",
            sets.join(", "),
            BOOK_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, BookRow>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.title);
        bind_field!(data.author);
        bind_field!(data.quantity);

        let updated = builder
            .bind(id)
            .bind(data.quantity.unwrap_or(i64::MAX))
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(row) => Ok(row),
            None => {
                let current = self.get_by_id(id).await?;
                Err(AppError::BusinessRule(format!(
                    "Quantity cannot be lower than the {} copies currently on loan",
                    current.borrowed_count
                )))
            }
        }
    }

    /// Delete a book. Fails while copies are on loan.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM books WHERE id = ? AND borrowed_count = 0 AND NOT EXISTS (SELECT 1 FROM loans WHERE book_id = ?)",
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_by_id(id).await?;
            return Err(AppError::Conflict(format!(
                "Book '{}' has {} copies on loan",
                current.title, current.borrowed_count
            )));
        }
        Ok(())
    }
}
