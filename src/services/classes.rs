//! Class directory service

use validator::Validate;

use crate::{
    error::AppResult,
    models::class::{Class, CreateClass},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClassesService {
    repository: Repository,
}

impl ClassesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all classes
    pub async fn list(&self) -> AppResult<Vec<Class>> {
        self.repository.classes.list().await
    }

    /// Create a class; names are unique and stored trimmed
    pub async fn create(&self, data: CreateClass) -> AppResult<Class> {
        let data = CreateClass {
            name: data.name.trim().to_string(),
        };
        data.validate()?;

        let class = self.repository.classes.create(&data.name).await?;
        tracing::info!(class = %class.name, "Class created");
        Ok(class)
    }

    /// Delete an empty class
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        self.repository.classes.delete(name).await?;
        tracing::info!(class = %name, "Class deleted");
        Ok(())
    }
}
