//! Classes repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::class::Class,
};

#[derive(Clone)]
pub struct ClassesRepository {
    pool: Pool<Sqlite>,
}

impl ClassesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all classes ordered by name
    pub async fn list(&self) -> AppResult<Vec<Class>> {
        let classes = sqlx::query_as::<_, Class>("SELECT name, created_at FROM classes ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(classes)
    }

    pub async fn exists(&self, name: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM classes WHERE name = ?)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a class
    pub async fn create(&self, name: &str) -> AppResult<Class> {
        let class = sqlx::query_as::<_, Class>(
            "INSERT INTO classes (name, created_at) VALUES (?, ?) RETURNING name, created_at",
        )
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict(format!("Class '{}' already exists", name)),
            other => other,
        })?;
        Ok(class)
    }

    /// Delete a class. Fails while students still belong to it.
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        let members: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE class_name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        if members > 0 {
            return Err(AppError::Conflict(format!(
                "Class '{}' still has {} student(s)",
                name, members
            )));
        }

        let result = sqlx::query("DELETE FROM classes WHERE name = ?")
            .bind(name)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Class '{}' not found", name)));
        }
        Ok(())
    }

    /// Number of students per class, every class included
    pub async fn student_counts(&self) -> AppResult<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT c.name, COUNT(s.id)
            FROM classes c
            LEFT JOIN students s ON s.class_name = c.name
            GROUP BY c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
