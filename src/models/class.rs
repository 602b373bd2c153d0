//! School class model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Class record, identified by its name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Create class request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClass {
    #[validate(length(min = 1, max = 100, message = "Class name must be 1 to 100 characters"))]
    pub name: String,
}
