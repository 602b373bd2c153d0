//! Borrow and return endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::AppJson;
use crate::{
    error::AppResult,
    models::loan::{BorrowReceipt, BorrowRequest, ReturnReceipt, ReturnRequest},
};

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Status message
    pub message: String,
    pub loan: BorrowReceipt,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Status message
    pub message: String,
    pub loan: ReturnReceipt,
}

/// Lend a book to a student
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "loans",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 400, description = "Loan duration out of range"),
        (status = 404, description = "Student or book not found"),
        (status = 422, description = "No copies available")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let loan = state.services.loans.borrow(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            message: "Book borrowed successfully".to_string(),
            loan,
        }),
    ))
}

/// Take back a borrowed book
#[utoipa::path(
    post,
    path = "/return",
    tag = "loans",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 404, description = "Student, book or active loan not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AppJson(request): AppJson<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let loan = state.services.loans.return_book(request).await?;
    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
        loan,
    }))
}
