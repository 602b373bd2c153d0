//! Librarian Assistant
//!
//! A school library management server: classes, students, books and the
//! loans that tie them together, served as a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Connect to the database, apply migrations and wire the services
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let pool = repository::connect(&config.database).await?;
        let services = services::Services::new(repository::Repository::new(pool), config.loans);

        Ok(Self {
            services: Arc::new(services),
        })
    }
}
