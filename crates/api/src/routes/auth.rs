//! Authentication routes: register, login, current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use moneta_core::auth::{hash_password, verify_password};
use moneta_db::UserRepository;
use moneta_shared::{LoginRequest, RegisterRequest, TokenResponse, UserInfo};

/// Creates the public authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Creates the authentication routes that require a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

/// POST `/auth/register` - Create a user account.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    if payload.username.trim().is_empty() || payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_input",
                "message": "Username is required and password must be at least 8 characters"
            })),
        )
            .into_response();
    }

    let default_currency = payload
        .default_currency
        .unwrap_or_else(|| state.config.currencies.default.clone());
    if !state.config.currencies.is_allowed(&default_currency) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "unknown_currency",
                "message": format!("Currency not supported: {default_currency}")
            })),
        )
            .into_response();
    }

    match user_repo.username_exists(&payload.username).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "username_taken",
                    "message": "Username is already registered"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error during registration");
            return internal_error();
        }
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    match user_repo
        .create(&payload.username, &password_hash, &default_currency)
        .await
    {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "User registered");
            (
                StatusCode::CREATED,
                Json(json!(UserInfo {
                    id: user.id,
                    username: user.username,
                    default_currency: user.default_currency,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create user");
            internal_error()
        }
    }
}

/// POST `/auth/login` - Exchange credentials for an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(username = %payload.username, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = user.id, "Failed login attempt");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    let access_token = match state
        .jwt_service
        .generate_access_token(user.id, &user.username)
    {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    info!(user_id = user.id, "User logged in");
    (
        StatusCode::OK,
        Json(json!(TokenResponse::bearer(
            access_token,
            state.jwt_service.access_token_expires_in(),
        ))),
    )
        .into_response()
}

/// GET `/auth/me` - Current authenticated user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!(UserInfo {
                id: user.id,
                username: user.username,
                default_currency: user.default_currency,
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "User no longer exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error fetching current user");
            internal_error()
        }
    }
}

/// POST `/auth/logout` - Acknowledge logout.
///
/// Tokens are stateless, so the server keeps nothing to invalidate; the
/// client discards its token.
async fn logout(auth: AuthUser) -> impl IntoResponse {
    info!(user_id = auth.user_id(), "User logged out");
    (
        StatusCode::OK,
        Json(json!({ "message": "Successfully logged out" })),
    )
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid username or password"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
