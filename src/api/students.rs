//! Student roster endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{AppJson, AppPath};
use crate::{
    error::AppResult,
    models::student::{CreateStudent, Student, UpdateStudent},
};

/// List all students with their active loans
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "All students", body = Vec<Student>)
    )
)]
pub async fn list_students(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.students.list().await?;
    Ok(Json(students))
}

/// List the students of a class
#[utoipa::path(
    get,
    path = "/students/class/{class_name}",
    tag = "students",
    params(("class_name" = String, Path, description = "Class name")),
    responses(
        (status = 200, description = "Students of the class", body = Vec<Student>),
        (status = 404, description = "Class not found")
    )
)]
pub async fn list_students_by_class(
    State(state): State<crate::AppState>,
    AppPath(class_name): AppPath<String>,
) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.students.list_by_class(&class_name).await?;
    Ok(Json(students))
}

/// Get student details by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Student>> {
    let student = state.services.students.get_by_id(id).await?;
    Ok(Json(student))
}

/// Enroll a new student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input or unknown class")
    )
)]
pub async fn create_student(
    State(state): State<crate::AppState>,
    AppJson(data): AppJson<CreateStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let created = state.services.students.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "No fields or unknown class"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<UpdateStudent>,
) -> AppResult<Json<Student>> {
    let updated = state.services.students.update(id, data).await?;
    Ok(Json(updated))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Student still has borrowed books")
    )
)]
pub async fn delete_student(
    State(state): State<crate::AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.students.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
