//! Authentication endpoints

use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{CreateUser, LoginRequest, Role, User},
};

use super::AuthenticatedUser;

/// Login response with JWT token
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub email: String,
    pub role: Role,
    pub id: i32,
}

/// Authenticate user and get JWT token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
        (status = 422, description = "Missing email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state.services.users.authenticate(request).await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        email: user.email,
        role: user.role,
        id: user.id,
    }))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 403, description = "Admin accounts need an administrator", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already taken", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    caller: Option<AuthenticatedUser>,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, [(axum::http::HeaderName, String); 1], Json<User>)> {
    let caller = caller.map(|AuthenticatedUser(claims)| claims);

    let user = state.services.users.signup(request, caller.as_ref()).await?;
    let location = format!("/api/v1/users/{}", user.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(user)))
}
