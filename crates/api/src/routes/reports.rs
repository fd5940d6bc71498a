//! Report routes: trends and monthly breakdowns.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::routes::budgets::map_validation_error;
use crate::{AppState, middleware::AuthUser};
use moneta_core::reports::ReportError;
use moneta_core::validation::validate_currency;
use moneta_db::repositories::report::{ReportQueryError, ReportRepository};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trends", get(trends))
        .route("/reports/monthly/{year}/{month}", get(monthly))
}

/// Query parameters for the trend report.
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    /// Range start.
    pub start_date: NaiveDate,
    /// Range end.
    pub end_date: NaiveDate,
    /// Currency; falls back to the configured default.
    pub currency: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<i32>,
    /// Restrict to one subcategory.
    pub subcategory_id: Option<i32>,
}

/// Query parameters for the monthly report.
#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// Currency; falls back to the configured default.
    pub currency: Option<String>,
}

/// GET `/reports/trends` - Budget and actual series per month.
async fn trends(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<TrendQuery>,
) -> impl IntoResponse {
    let currency = query
        .currency
        .unwrap_or_else(|| state.config.currencies.default.clone());
    if let Err(e) = validate_currency(&currency, &state.config.currencies) {
        return map_validation_error(&e);
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .trend(
            query.start_date,
            query.end_date,
            &currency,
            query.category_id,
            query.subcategory_id,
        )
        .await
    {
        Ok(data) => (StatusCode::OK, Json(json!(data))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute trend report");
            map_report_error(&e)
        }
    }
}

/// GET `/reports/monthly/{year}/{month}` - Full breakdown of one month.
async fn monthly(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<MonthlyQuery>,
) -> impl IntoResponse {
    let currency = query
        .currency
        .unwrap_or_else(|| state.config.currencies.default.clone());
    if let Err(e) = validate_currency(&currency, &state.config.currencies) {
        return map_validation_error(&e);
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo.monthly_report(year, month, &currency).await {
        Ok(report) => (StatusCode::OK, Json(json!(report))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute monthly report");
            map_report_error(&e)
        }
    }
}

/// Maps report query errors to HTTP responses.
pub(crate) fn map_report_error(e: &ReportQueryError) -> axum::response::Response {
    match e {
        ReportQueryError::Report(report_error) => {
            let error = match report_error {
                ReportError::InvalidDateRange { .. } => "invalid_range",
                ReportError::InvalidMonth(_) => "invalid_month",
                ReportError::InvalidGroupBy(_) => "invalid_group_by",
            };
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error, "message": report_error.to_string() })),
            )
                .into_response()
        }
        ReportQueryError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
