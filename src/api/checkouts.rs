//! Checkout and checkin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        checkout::{BookRecord, Checkout, CheckoutRequest, UserRecord},
    },
};

use super::AuthenticatedUser;

/// Check a book out to the caller
#[utoipa::path(
    post,
    path = "/checkouts/checkout",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Book checked out", body = Checkout),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Checkout on behalf of another user", body = crate::error::ErrorResponse),
        (status = 404, description = "User or book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book already checked out", body = crate::error::ErrorResponse),
        (status = 429, description = "Checkout limit reached", body = crate::error::ErrorResponse)
    )
)]
pub async fn checkout_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Checkout>)> {
    claims.require_self(request.user_id)?;

    let checkout = state.services.checkouts.checkout(request).await?;
    Ok((StatusCode::CREATED, Json(checkout)))
}

/// Return a book the caller holds
#[utoipa::path(
    post,
    path = "/checkouts/checkin",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 202, description = "Book checked in", body = Checkout),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Book not held by the caller", body = crate::error::ErrorResponse)
    )
)]
pub async fn checkin_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<Checkout>)> {
    claims.require_self(request.user_id)?;

    let checkout = state.services.checkouts.checkin(request).await?;
    Ok((StatusCode::ACCEPTED, Json(checkout)))
}

/// Books a user currently holds
#[utoipa::path(
    get,
    path = "/checkouts/current-books/{id}",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Books currently held", body = Vec<Book>),
        (status = 403, description = "Not the account owner", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn current_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Book>>> {
    claims.require_self(id)?;

    let books = state.services.checkouts.current_books(id).await?;
    Ok(Json(books))
}

/// Every book a user has borrowed
#[utoipa::path(
    get,
    path = "/checkouts/all-books/{id}",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Borrowing history", body = Vec<BookRecord>),
        (status = 403, description = "Not the account owner", body = crate::error::ErrorResponse)
    )
)]
pub async fn user_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookRecord>>> {
    claims.require_self(id)?;

    let records = state.services.checkouts.user_history(id).await?;
    Ok(Json(records))
}

/// Every user who has borrowed a book
#[utoipa::path(
    get,
    path = "/checkouts/all-users/{id}",
    tag = "checkouts",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Borrowers of the book", body = Vec<UserRecord>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<UserRecord>>> {
    let records = state.services.checkouts.book_history(id).await?;
    Ok(Json(records))
}
