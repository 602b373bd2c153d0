//! Per-book serialization of count updates

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Keyed async mutex: at most one borrow, return or stock change runs
/// for a given book at a time. Different books proceed independently.
/// An entry lives only while someone holds or waits for it.
#[derive(Clone, Default)]
pub struct BookLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

/// Exclusive access to one book, released on drop
pub struct BookGuard {
    locks: BookLocks,
    book_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl BookLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a book
    pub async fn acquire(&self, book_id: Uuid) -> BookGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(book_id).or_default().clone()
        };
        BookGuard {
            locks: self.clone(),
            book_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for BookGuard {
    fn drop(&mut self) {
        // Waiters clone the entry under the map lock, so a count of one
        // means nobody else wants this book.
        let mut map = self.locks.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.guard.take();
        if map.get(&self.book_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&self.book_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_book_is_exclusive() {
        let locks = BookLocks::new();
        let book = Uuid::new_v4();

        let guard = locks.acquire(book).await;
        let waiting = tokio::time::timeout(Duration::from_millis(50), locks.acquire(book)).await;
        assert!(waiting.is_err());

        drop(guard);
        let again = tokio::time::timeout(Duration::from_millis(50), locks.acquire(book)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_different_books_do_not_block() {
        let locks = BookLocks::new();
        let _first = locks.acquire(Uuid::new_v4()).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(Uuid::new_v4())).await;
        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_released_lock_leaves_no_entry() {
        let locks = BookLocks::new();
        for _ in 0..100 {
            drop(locks.acquire(Uuid::new_v4()).await);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_entry_kept_while_another_task_waits() {
        let locks = BookLocks::new();
        let book = Uuid::new_v4();

        let guard = locks.acquire(book).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(book).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
