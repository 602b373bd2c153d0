//! OpenAPI documentation

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::api::{books, classes, export, health, loans, stats, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Librarian Assistant API",
        version = "0.1.0",
        description = "School library management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "Librarian API")
    ),
    paths(
        // Health
        health::root,
        health::health_check,
        health::readiness_check,
        // Classes
        classes::list_classes,
        classes::create_class,
        classes::delete_class,
        // Students
        students::list_students,
        students::list_students_by_class,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Loans
        loans::borrow_book,
        loans::return_book,
        // Stats
        stats::get_stats,
        // Export
        export::export_students,
        export::export_books,
    ),
    components(
        schemas(
            crate::api::MessageResponse,
            // Classes
            crate::models::class::Class,
            crate::models::class::CreateClass,
            classes::ClassListResponse,
            classes::ClassCreatedResponse,
            // Students
            crate::models::student::Student,
            crate::models::student::BorrowedBook,
            crate::models::student::CreateStudent,
            crate::models::student::UpdateStudent,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Loans
            crate::models::loan::BorrowRequest,
            crate::models::loan::ReturnRequest,
            crate::models::loan::BorrowReceipt,
            crate::models::loan::ReturnReceipt,
            loans::BorrowResponse,
            loans::ReturnResponse,
            // Stats
            stats::StatsResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "classes", description = "Class directory"),
        (name = "students", description = "Student roster"),
        (name = "books", description = "Book catalog"),
        (name = "loans", description = "Borrowing and returning books"),
        (name = "stats", description = "Statistics"),
        (name = "export", description = "CSV exports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
