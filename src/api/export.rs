//! CSV export endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::AppResult;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentExportQuery {
    /// Only export this class
    pub class_name: Option<String>,
}

fn csv_attachment(filename: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// Export students as CSV
#[utoipa::path(
    get,
    path = "/export/students",
    tag = "export",
    params(StudentExportQuery),
    responses(
        (status = 200, description = "Students CSV", content_type = "text/csv", body = String),
        (status = 404, description = "Class not found")
    )
)]
pub async fn export_students(
    State(state): State<crate::AppState>,
    Query(query): Query<StudentExportQuery>,
) -> AppResult<impl IntoResponse> {
    let csv = state.services.export.students_csv(query.class_name.as_deref()).await?;
    let filename = match query.class_name {
        Some(class_name) => format!("students_{}.csv", class_name.replace(['"', '/', '\\'], "_")),
        None => "students.csv".to_string(),
    };
    Ok(csv_attachment(&filename, csv))
}

/// Export books as CSV
#[utoipa::path(
    get,
    path = "/export/books",
    tag = "export",
    responses(
        (status = 200, description = "Books CSV", content_type = "text/csv", body = String)
    )
)]
pub async fn export_books(State(state): State<crate::AppState>) -> AppResult<impl IntoResponse> {
    let csv = state.services.export.books_csv().await?;
    Ok(csv_attachment("books.csv", csv))
}
