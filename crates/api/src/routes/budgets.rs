//! Budget management routes.

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

use crate::{AppState, middleware::AuthUser, routes::reports::map_report_error};
use moneta_core::validation::{ValidationError, validate_budget_window, validate_currency};
use moneta_db::repositories::budget::{
    BudgetError, BudgetFilter, BudgetRepository, CreateBudgetInput, UpdateBudgetInput,
};
use moneta_db::repositories::report::ReportRepository;
use moneta_shared::PeriodType;

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets))
        .route("/budgets", post(create_budget))
        .route("/budgets/summary", get(budget_summary))
        .route("/budgets/{id}", get(get_budget))
        .route("/budgets/{id}", put(update_budget))
        .route("/budgets/{id}", delete(delete_budget))
}

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Category the budget applies to.
    pub category_id: i32,
    /// Optional subcategory refinement.
    pub subcategory_id: Option<i32>,
    /// Budgeted amount for one period.
    pub amount: f64,
    /// Currency code; falls back to the configured default.
    pub currency: Option<String>,
    /// Window start.
    pub start_date: NaiveDate,
    /// Window end.
    pub end_date: NaiveDate,
    /// Monthly or yearly; defaults to monthly.
    pub period_type: Option<PeriodType>,
}

/// Request body for updating a budget.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    /// New category.
    pub category_id: Option<i32>,
    /// New subcategory; an explicit `null` clears it.
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    pub subcategory_id: Option<Option<i32>>,
    /// New amount.
    pub amount: Option<f64>,
    /// New currency code.
    pub currency: Option<String>,
    /// New window start.
    pub start_date: Option<NaiveDate>,
    /// New window end.
    pub end_date: Option<NaiveDate>,
    /// New period type.
    pub period_type: Option<PeriodType>,
}

/// Query parameters for listing budgets.
#[derive(Debug, Deserialize)]
pub struct ListBudgetsQuery {
    /// Restrict to one category.
    pub category_id: Option<i32>,
    /// Restrict to one subcategory.
    pub subcategory_id: Option<i32>,
    /// Restrict to one currency.
    pub currency: Option<String>,
    /// Keep budgets whose window overlaps starting here.
    pub start_date: Option<NaiveDate>,
    /// Keep budgets whose window overlaps up to here.
    pub end_date: Option<NaiveDate>,
    /// Keep only budgets whose window contains today.
    pub active_only: Option<bool>,
}

/// Query parameters for the budget summary.
#[derive(Debug, Deserialize)]
pub struct BudgetSummaryQuery {
    /// Period start.
    pub start_date: NaiveDate,
    /// Period end.
    pub end_date: NaiveDate,
    /// Currency; falls back to the configured default.
    pub currency: Option<String>,
}

/// GET `/budgets` - List budgets matching optional filters.
async fn list_budgets(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());
    let filter = BudgetFilter {
        category_id: query.category_id,
        subcategory_id: query.subcategory_id,
        currency: query.currency,
        overlaps: match (query.start_date, query.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        },
        active_on: query
            .active_only
            .unwrap_or(false)
            .then(|| chrono::Utc::now().date_naive()),
    };

    match repo.list(&filter).await {
        Ok(budgets) => (StatusCode::OK, Json(json!(budgets))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list budgets");
            map_budget_error(&e)
        }
    }
}

/// POST `/budgets` - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    if payload.amount <= 0.0 {
        return positive_amount_required();
    }
    if let Err(e) = validate_budget_window(payload.start_date, payload.end_date) {
        return map_validation_error(&e);
    }
    let currency = payload
        .currency
        .unwrap_or_else(|| state.config.currencies.default.clone());
    if let Err(e) = validate_currency(&currency, &state.config.currencies) {
        return map_validation_error(&e);
    }

    let repo = BudgetRepository::new((*state.db).clone());
    let input = CreateBudgetInput {
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        amount: payload.amount,
        currency,
        start_date: payload.start_date,
        end_date: payload.end_date,
        period_type: payload.period_type.unwrap_or(PeriodType::Monthly).into(),
    };

    match repo.create(input).await {
        Ok(budget) => {
            info!(budget_id = budget.id, category_id = budget.category_id, "Budget created");
            (StatusCode::CREATED, Json(json!(budget))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create budget");
            map_budget_error(&e)
        }
    }
}

/// GET `/budgets/summary` - Budget-vs-actual summary for a period.
async fn budget_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<BudgetSummaryQuery>,
) -> impl IntoResponse {
    let currency = query
        .currency
        .unwrap_or_else(|| state.config.currencies.default.clone());
    if let Err(e) = validate_currency(&currency, &state.config.currencies) {
        return map_validation_error(&e);
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .budget_summary(query.start_date, query.end_date, &currency)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute budget summary");
            map_report_error(&e)
        }
    }
}

/// GET `/budgets/{id}` - Get one budget.
async fn get_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(budget) => (StatusCode::OK, Json(json!(budget))).into_response(),
        Err(e) => map_budget_error(&e),
    }
}

/// PUT `/budgets/{id}` - Partially update a budget.
///
/// Window and currency checks run against the post-update field values.
async fn update_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    let existing = match repo.get(id).await {
        Ok(budget) => budget,
        Err(e) => return map_budget_error(&e),
    };

    if let Some(amount) = payload.amount {
        if amount <= 0.0 {
            return positive_amount_required();
        }
    }
    let start_date = payload.start_date.unwrap_or(existing.start_date);
    let end_date = payload.end_date.unwrap_or(existing.end_date);
    if let Err(e) = validate_budget_window(start_date, end_date) {
        return map_validation_error(&e);
    }
    if let Some(currency) = &payload.currency {
        if let Err(e) = validate_currency(currency, &state.config.currencies) {
            return map_validation_error(&e);
        }
    }

    let input = UpdateBudgetInput {
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        amount: payload.amount,
        currency: payload.currency,
        start_date: payload.start_date,
        end_date: payload.end_date,
        period_type: payload.period_type.map(Into::into),
    };

    match repo.update(id, input).await {
        Ok(budget) => {
            info!(budget_id = budget.id, "Budget updated");
            (StatusCode::OK, Json(json!(budget))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update budget");
            map_budget_error(&e)
        }
    }
}

/// DELETE `/budgets/{id}` - Delete a budget.
async fn delete_budget(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(budget_id = id, "Budget deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete budget");
            map_budget_error(&e)
        }
    }
}

fn positive_amount_required() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_amount",
            "message": "Amount must be positive"
        })),
    )
        .into_response()
}

/// Maps validation errors to HTTP responses.
pub(crate) fn map_validation_error(e: &ValidationError) -> axum::response::Response {
    let status = match e {
        ValidationError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    let error = match e {
        ValidationError::InvalidRange { .. } => "invalid_range",
        ValidationError::UnknownCurrency(_) => "unknown_currency",
        ValidationError::NotFound(_) => "not_found",
        ValidationError::TypeMismatch { .. } => "type_mismatch",
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

/// Maps budget errors to HTTP responses.
fn map_budget_error(e: &BudgetError) -> axum::response::Response {
    match e {
        BudgetError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Budget not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::CategoryNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::SubcategoryNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Subcategory not found: {id}")
            })),
        )
            .into_response(),
        BudgetError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_null_clears_subcategory() {
        let payload: UpdateBudgetRequest =
            serde_json::from_str(r#"{"subcategory_id": null}"#).unwrap();
        assert_eq!(payload.subcategory_id, Some(None));

        let payload: UpdateBudgetRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.subcategory_id, None);

        let payload: UpdateBudgetRequest =
            serde_json::from_str(r#"{"subcategory_id": 7}"#).unwrap();
        assert_eq!(payload.subcategory_id, Some(Some(7)));
    }

    #[test]
    fn test_missing_reference_maps_to_not_found() {
        assert_eq!(
            map_budget_error(&BudgetError::CategoryNotFound(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            map_budget_error(&BudgetError::SubcategoryNotFound(2)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            map_budget_error(&BudgetError::NotFound(3)).status(),
            StatusCode::NOT_FOUND
        );
    }
}
