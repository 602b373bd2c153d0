//! Students repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::student::{CreateStudent, StudentRow, UpdateStudent},
};

const STUDENT_COLUMNS: &str = "id, first_name, last_name, class_name, created_at";

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Sqlite>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<StudentRow> {
        sqlx::query_as::<_, StudentRow>(&format!("SELECT {} FROM students WHERE id = ?", STUDENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// List students, optionally restricted to one class
    pub async fn list(&self, class_name: Option<&str>) -> AppResult<Vec<StudentRow>> {
        let students = match class_name {
            Some(class_name) => {
                sqlx::query_as::<_, StudentRow>(&format!(
                    "SELECT {} FROM students WHERE class_name = ? ORDER BY last_name, first_name",
                    STUDENT_COLUMNS
                ))
                .bind(class_name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StudentRow>(&format!(
                    "SELECT {} FROM students ORDER BY class_name, last_name, first_name",
                    STUDENT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(students)
    }

    /// Create a student
    pub async fn create(&self, data: &CreateStudent) -> AppResult<StudentRow> {
        let row = sqlx::query_as::<_, StudentRow>(&format!(
            r#"
            INSERT INTO students (id, first_name, last_name, class_name, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.class_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the provided fields of a student
    pub async fn update(&self, id: Uuid, data: &UpdateStudent) -> AppResult<StudentRow> {
        let mut sets = Vec::new();

        macro_rules! add_field {
            ($field:expr, $name:literal) => {
                if $field.is_some() {
                    sets.push(concat!($name, " = ?"));
                }
            };
        }

        add_field!(data.first_name, "first_name");
        add_field!(data.last_name, "last_name");
        add_field!(data.class_name, "class_name");

        if sets.is_empty() {
            return Err(AppError::BadRequest("No valid fields provided for update".to_string()));
        }

        let query = format!(
            "UPDATE students SET {} WHERE id = ? RETURNING {}",
            sets.join(", "),
            STUDENT_COLUMNS
        );

        let mut builder = sqlx::query_as::<_, StudentRow>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.first_name);
        bind_field!(data.last_name);
        bind_field!(data.class_name);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// Delete a student. Fails while the student holds active loans.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let active: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE student_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if active > 0 {
            return Err(AppError::Conflict(format!(
                "Student has {} borrowed book(s) that must be returned first",
                active
            )));
        }

        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Student with id {} not found", id)));
        }
        Ok(())
    }

    /// Count students
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
