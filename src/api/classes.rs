//! Class directory endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::{AppJson, AppPath};
use crate::{error::AppResult, models::class::CreateClass};

/// Class names, sorted
#[derive(Serialize, ToSchema)]
pub struct ClassListResponse {
    pub classes: Vec<String>,
}

/// Created class
#[derive(Serialize, ToSchema)]
pub struct ClassCreatedResponse {
    pub message: String,
    pub class_name: String,
}

/// List all classes
#[utoipa::path(
    get,
    path = "/classes",
    tag = "classes",
    responses(
        (status = 200, description = "Class names", body = ClassListResponse)
    )
)]
pub async fn list_classes(State(state): State<crate::AppState>) -> AppResult<Json<ClassListResponse>> {
    let classes = state.services.classes.list().await?;
    Ok(Json(ClassListResponse {
        classes: classes.into_iter().map(|c| c.name).collect(),
    }))
}

/// Create a class
#[utoipa::path(
    post,
    path = "/classes",
    tag = "classes",
    request_body = CreateClass,
    responses(
        (status = 201, description = "Class created", body = ClassCreatedResponse),
        (status = 400, description = "Invalid name"),
        (status = 409, description = "Class already exists")
    )
)]
pub async fn create_class(
    State(state): State<crate::AppState>,
    AppJson(data): AppJson<CreateClass>,
) -> AppResult<(StatusCode, Json<ClassCreatedResponse>)> {
    let class = state.services.classes.create(data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ClassCreatedResponse {
            message: format!("Class {} is ready to accept students", class.name),
            class_name: class.name,
        }),
    ))
}

/// Delete an empty class
#[utoipa::path(
    delete,
    path = "/classes/{name}",
    tag = "classes",
    params(("name" = String, Path, description = "Class name")),
    responses(
        (status = 204, description = "Class deleted"),
        (status = 404, description = "Class not found"),
        (status = 409, description = "Class still has students")
    )
)]
pub async fn delete_class(
    State(state): State<crate::AppState>,
    AppPath(name): AppPath<String>,
) -> AppResult<StatusCode> {
    state.services.classes.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
