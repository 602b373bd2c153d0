//! Statistics endpoints

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;

/// Statistics response
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_students: i64,
    pub total_classes: i64,
    /// Number of titles in the catalog
    pub total_books: i64,
    /// Copies owned across all titles
    pub total_copies: i64,
    /// Copies currently on loan
    pub borrowed_copies: i64,
    /// Copies on the shelf
    pub available_copies: i64,
    /// Titles with at least one copy on the shelf
    pub available_books: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    /// Students per class, every class included
    pub class_counts: BTreeMap<String, i64>,
}

/// Get library statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Library statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> AppResult<Json<StatsResponse>> {
    let stats = state.services.stats.get_stats().await?;
    Ok(Json(stats))
}
