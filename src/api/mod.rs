//! API handlers for the Librarian REST endpoints

pub mod books;
pub mod classes;
pub mod export;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod stats;
pub mod students;

use axum::{
    extract::{FromRequest, FromRequestParts},
    routing::{delete, get, post},
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, AppState};

/// Plain confirmation message
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// JSON body extractor answering malformed input with a 400 error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path extractor answering unparsable segments with a 400 error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/", get(health::root))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Classes
        .route("/classes", get(classes::list_classes).post(classes::create_class))
        .route("/classes/:name", delete(classes::delete_class))
        // Students
        .route("/students", get(students::list_students).post(students::create_student))
        .route(
            "/students/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/students/class/:class_name", get(students::list_students_by_class))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book).put(books::update_book).delete(books::delete_book),
        )
        // Loans
        .route("/borrow", post(loans::borrow_book))
        .route("/return", post(loans::return_book))
        // Statistics
        .route("/stats", get(stats::get_stats))
        // CSV exports
        .route("/export/students", get(export::export_students))
        .route("/export/books", get(export::export_books))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
