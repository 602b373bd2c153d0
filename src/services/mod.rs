//! Business logic services

pub mod books;
pub mod classes;
pub mod export;
pub mod loans;
pub mod locks;
pub mod stats;
pub mod students;

use crate::{config::LoansConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub classes: classes::ClassesService,
    pub students: students::StudentsService,
    pub books: books::BooksService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
    pub export: export::ExportService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, loans_config: LoansConfig) -> Self {
        let book_locks = locks::BookLocks::new();
        let students = students::StudentsService::new(repository.clone());
        Self {
            classes: classes::ClassesService::new(repository.clone()),
            export: export::ExportService::new(repository.clone(), students.clone()),
            students,
            books: books::BooksService::new(repository.clone(), book_locks.clone()),
            loans: loans::LoansService::new(repository.clone(), loans_config, book_locks),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }
}
