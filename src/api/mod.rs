//! API handlers for Lectern REST endpoints

pub mod auth;
pub mod books;
pub mod checkouts;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{
        header::{self, AUTHORIZATION},
        request::Parts,
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::CorsConfig, error::AppError, models::user::UserClaims, AppState};

/// Response header carrying the id of a deleted entity
pub const ENTITY_HEADER: HeaderName = HeaderName::from_static("entity");

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Bearer token from the `Authorization` header, or the `token` query parameter
fn extract_token(parts: &Parts) -> Option<String> {
    if let Ok(Query(TokenQuery { token: Some(token) })) =
        Query::<TokenQuery>::try_from_uri(&parts.uri)
    {
        if !token.is_empty() {
            return Some(token);
        }
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)
            .ok_or_else(|| AppError::Authentication("Unauthorized".to_string()))?;

        let claims = state.services.users.verify_token(&token)?;

        Ok(AuthenticatedUser(claims))
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = match config.allowed_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(_)) => {
            tracing::warn!("Ignoring invalid CORS origin, allowing any origin");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::CONTENT_LENGTH,
            header::ACCEPT_ENCODING,
            header::AUTHORIZATION,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LOCATION, ENTITY_HEADER])
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        // Users
        .route("/users", get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Checkouts
        .route("/checkouts/checkout", post(checkouts::checkout_book))
        .route("/checkouts/checkin", post(checkouts::checkin_book))
        .route("/checkouts/current-books/:id", get(checkouts::current_books))
        .route("/checkouts/all-books/:id", get(checkouts::user_history))
        .route("/checkouts/all-users/:id", get(checkouts::book_history))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
