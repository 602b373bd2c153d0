//! Book catalog service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook, UpdateBook},
    repository::Repository,
};

use super::locks::BookLocks;

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    locks: BookLocks,
}

impl BooksService {
    pub fn new(repository: Repository, locks: BookLocks) -> Self {
        Self { repository, locks }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = self.repository.books.list().await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await.map(Book::from)
    }

    /// Add a title to the catalog
    pub async fn create(&self, data: CreateBook) -> AppResult<Book> {
        let data = CreateBook {
            title: data.title.trim().to_string(),
            author: data.author.trim().to_string(),
            quantity: data.quantity,
        };
        data.validate()?;

        let row = self.repository.books.create(&data).await?;
        tracing::info!(book_id = %row.id, title = %row.title, quantity = row.quantity, "Book created");
        Ok(row.into())
    }

    /// Update title, author or stock. Stock never drops below the copies on loan.
    pub async fn update(&self, id: Uuid, data: UpdateBook) -> AppResult<Book> {
        let data = UpdateBook {
            title: data.title.map(|s| s.trim().to_string()),
            author: data.author.map(|s| s.trim().to_string()),
            quantity: data.quantity,
        };
        if data.is_empty() {
            return Err(AppError::BadRequest("No valid fields provided for update".to_string()));
        }
        data.validate()?;

        let _guard = self.locks.acquire(id).await;
        let row = self.repository.books.update(id, &data).await?;
        tracing::info!(book_id = %id, quantity = row.quantity, "Book updated");
        Ok(row.into())
    }

    /// Remove a title with no copies on loan
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let _guard = self.locks.acquire(id).await;
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_repository;

    fn matilda(quantity: i64) -> CreateBook {
        CreateBook {
            title: "Matilda".into(),
            author: "Roald Dahl".into(),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_to_one_copy() {
        let service = BooksService::new(test_repository().await, BookLocks::new());
        let book = service
            .create(CreateBook { title: "Holes".into(), author: "Louis Sachar".into(), quantity: None })
            .await
            .unwrap();
        assert_eq!(book.quantity, 1);
        assert_eq!(book.borrowed_count, 0);
        assert!(book.available);
    }

    #[tokio::test]
    async fn test_update_fields() {
        let service = BooksService::new(test_repository().await, BookLocks::new());
        let book = service.create(matilda(2)).await.unwrap();

        let updated = service
            .update(book.id, UpdateBook { title: None, author: None, quantity: Some(5) })
            .await
            .unwrap();
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.available_copies, 5);
        assert_eq!(updated.title, "Matilda");
    }

    #[tokio::test]
    async fn test_update_unknown_book() {
        let service = BooksService::new(test_repository().await, BookLocks::new());
        let err = service
            .update(Uuid::new_v4(), UpdateBook { title: Some("X".into()), author: None, quantity: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = BooksService::new(test_repository().await, BookLocks::new());
        let book = service.create(matilda(1)).await.unwrap();
        service.delete(book.id).await.unwrap();

        let err = service.get_by_id(book.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
