//! Settings routes: currencies, user preferences, exchange rates.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::routes::budgets::map_validation_error;
use crate::{AppState, middleware::AuthUser};
use moneta_core::validation::validate_currency;
use moneta_db::UserRepository;
use moneta_db::repositories::currency_rate::{
    CurrencyRateError, CurrencyRateRepository, RateFilter, UpsertCurrencyRateInput,
};
use moneta_shared::UserInfo;

/// Creates the settings routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings/currencies", get(list_currencies))
        .route("/settings/user/preferences", get(get_preferences))
        .route("/settings/user/preferences", put(update_preferences))
        .route("/settings/currencies/rates", get(list_rates))
        .route("/settings/currencies/rates", post(upsert_rate))
        .route("/settings/currencies/rates/{id}", delete(delete_rate))
}

/// Request body for updating preferences.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    /// New default currency.
    pub default_currency: String,
}

/// Request body for recording an exchange rate.
#[derive(Debug, Deserialize)]
pub struct UpsertRateRequest {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// Units of target currency per unit of source currency.
    pub rate: f64,
    /// Date the rate takes effect.
    pub effective_date: NaiveDate,
}

/// Query parameters for listing rates.
#[derive(Debug, Deserialize)]
pub struct ListRatesQuery {
    /// Restrict to one source currency.
    pub from_currency: Option<String>,
    /// Restrict to one target currency.
    pub to_currency: Option<String>,
}

/// GET `/settings/currencies` - Configured currency allow-list.
async fn list_currencies(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "available": state.config.currencies.available,
            "default": state.config.currencies.default,
        })),
    )
}

/// GET `/settings/user/preferences` - Current user's preferences.
async fn get_preferences(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(json!(UserInfo {
                id: user.id,
                username: user.username,
                default_currency: user.default_currency,
            })),
        )
            .into_response(),
        Ok(None) => user_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch preferences");
            internal_error()
        }
    }
}

/// PUT `/settings/user/preferences` - Update the user's default currency.
async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_currency(&payload.default_currency, &state.config.currencies) {
        return map_validation_error(&e);
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo
        .update_default_currency(auth.user_id(), &payload.default_currency)
        .await
    {
        Ok(Some(user)) => {
            info!(user_id = user.id, currency = %user.default_currency, "Preferences updated");
            (
                StatusCode::OK,
                Json(json!(UserInfo {
                    id: user.id,
                    username: user.username,
                    default_currency: user.default_currency,
                })),
            )
                .into_response()
        }
        Ok(None) => user_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update preferences");
            internal_error()
        }
    }
}

/// GET `/settings/currencies/rates` - List recorded exchange rates.
async fn list_rates(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListRatesQuery>,
) -> impl IntoResponse {
    let repo = CurrencyRateRepository::new((*state.db).clone());
    let filter = RateFilter {
        from_currency: query.from_currency,
        to_currency: query.to_currency,
    };

    match repo.list(&filter).await {
        Ok(rates) => (StatusCode::OK, Json(json!(rates))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list rates");
            map_rate_error(&e)
        }
    }
}

/// POST `/settings/currencies/rates` - Record a rate for a pair and date.
///
/// An existing rate for the same (from, to, date) triple is replaced.
async fn upsert_rate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<UpsertRateRequest>,
) -> impl IntoResponse {
    for code in [&payload.from_currency, &payload.to_currency] {
        if let Err(e) = validate_currency(code, &state.config.currencies) {
            return map_validation_error(&e);
        }
    }
    if payload.from_currency == payload.to_currency {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_input",
                "message": "Source and target currencies must differ"
            })),
        )
            .into_response();
    }
    if payload.rate <= 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_rate",
                "message": "Rate must be positive"
            })),
        )
            .into_response();
    }

    let repo = CurrencyRateRepository::new((*state.db).clone());
    let input = UpsertCurrencyRateInput {
        from_currency: payload.from_currency,
        to_currency: payload.to_currency,
        rate: payload.rate,
        effective_date: payload.effective_date,
    };

    match repo.upsert(input).await {
        Ok(rate) => {
            info!(
                rate_id = rate.id,
                from = %rate.from_currency,
                to = %rate.to_currency,
                "Exchange rate recorded"
            );
            (StatusCode::CREATED, Json(json!(rate))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to record rate");
            map_rate_error(&e)
        }
    }
}

/// DELETE `/settings/currencies/rates/{id}` - Delete a recorded rate.
async fn delete_rate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = CurrencyRateRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(rate_id = id, "Exchange rate deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete rate");
            map_rate_error(&e)
        }
    }
}

fn user_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "User no longer exists"
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

/// Maps currency rate errors to HTTP responses.
fn map_rate_error(e: &CurrencyRateError) -> axum::response::Response {
    match e {
        CurrencyRateError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Currency rate not found: {id}")
            })),
        )
            .into_response(),
        CurrencyRateError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
