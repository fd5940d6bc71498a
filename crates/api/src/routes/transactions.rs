//! Transaction management routes.

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
use crate::routes::reports::map_report_error;
use crate::{AppState, middleware::AuthUser};
use moneta_core::reports::GroupBy;
use moneta_core::validation::validate_currency;
use moneta_db::repositories::report::ReportRepository;
use moneta_db::repositories::transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
use moneta_shared::CategoryKind;

/// Creates the transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/summary", get(transaction_summary))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}", put(update_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
}

/// Request body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Category the transaction is recorded under.
    pub category_id: i32,
    /// Optional subcategory refinement.
    pub subcategory_id: Option<i32>,
    /// Transaction amount.
    pub amount: f64,
    /// Currency code; falls back to the configured default.
    pub currency: Option<String>,
    /// Date the transaction occurred.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub description: Option<String>,
    /// Income or expense; must match the category's kind.
    pub kind: CategoryKind,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New category.
    pub category_id: Option<i32>,
    /// New subcategory; an explicit `null` clears it.
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    pub subcategory_id: Option<Option<i32>>,
    /// New amount.
    pub amount: Option<f64>,
    /// New currency code.
    pub currency: Option<String>,
    /// New transaction date.
    pub transaction_date: Option<NaiveDate>,
    /// New description; an explicit `null` clears it.
    #[serde(default, deserialize_with = "crate::routes::double_option")]
    pub description: Option<Option<String>>,
    /// New kind.
    pub kind: Option<CategoryKind>,
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Restrict to one category.
    pub category_id: Option<i32>,
    /// Restrict to one subcategory.
    pub subcategory_id: Option<i32>,
    /// Restrict to one currency.
    pub currency: Option<String>,
    /// Restrict to income or expense.
    pub kind: Option<CategoryKind>,
    /// Keep transactions on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Keep transactions on or before this date.
    pub end_date: Option<NaiveDate>,
}

/// Query parameters for the transaction summary.
#[derive(Debug, Deserialize)]
pub struct TransactionSummaryQuery {
    /// Period start.
    pub start_date: NaiveDate,
    /// Period end.
    pub end_date: NaiveDate,
    /// Currency; falls back to the configured default.
    pub currency: Option<String>,
    /// Grouping mode: "category" or "subcategory".
    pub group_by: Option<String>,
}

/// GET `/transactions` - List transactions matching optional filters.
async fn list_transactions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        category_id: query.category_id,
        subcategory_id: query.subcategory_id,
        currency: query.currency,
        kind: query.kind.map(Into::into),
        start_date: query.start_date,
        end_date: query.end_date,
    };

    match repo.list(&filter).await {
        Ok(transactions) => (StatusCode::OK, Json(json!(transactions))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list transactions");
            map_transaction_error(&e)
        }
    }
}

/// POST `/transactions` - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let currency = payload
        .currency
        .unwrap_or_else(|| state.config.currencies.default.clone());
    if let Err(e) = validate_currency(&currency, &state.config.currencies) {
        return map_validation_error(&e);
    }

    let repo = TransactionRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        amount: payload.amount,
        currency,
        transaction_date: payload.transaction_date,
        description: payload.description,
        kind: payload.kind.into(),
    };

    match repo.create(input).await {
        Ok(transaction) => {
            info!(
                transaction_id = transaction.id,
                category_id = transaction.category_id,
                "Transaction recorded"
            );
            (StatusCode::CREATED, Json(json!(transaction))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create transaction");
            map_transaction_error(&e)
        }
    }
}

/// GET `/transactions/summary` - Grouped totals over a period.
async fn transaction_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<TransactionSummaryQuery>,
) -> impl IntoResponse {
    let currency = query
        .currency
        .unwrap_or_else(|| state.config.currencies.default.clone());
    if let Err(e) = validate_currency(&currency, &state.config.currencies) {
        return map_validation_error(&e);
    }
    let group_by = match query
        .group_by
        .as_deref()
        .unwrap_or("category")
        .parse::<GroupBy>()
    {
        Ok(group_by) => group_by,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_group_by",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .transaction_summary(query.start_date, query.end_date, &currency, group_by)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(json!(summary))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute transaction summary");
            map_report_error(&e)
        }
    }
}

/// GET `/transactions/{id}` - Get one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(transaction) => (StatusCode::OK, Json(json!(transaction))).into_response(),
        Err(e) => map_transaction_error(&e),
    }
}

/// PUT `/transactions/{id}` - Partially update a transaction.
///
/// Currency, referential, and kind checks run against the post-update
/// field values.
async fn update_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    if let Some(currency) = &payload.currency {
        if let Err(e) = validate_currency(currency, &state.config.currencies) {
            return map_validation_error(&e);
        }
    }

    let repo = TransactionRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        category_id: payload.category_id,
        subcategory_id: payload.subcategory_id,
        amount: payload.amount,
        currency: payload.currency,
        transaction_date: payload.transaction_date,
        description: payload.description,
        kind: payload.kind.map(Into::into),
    };

    match repo.update(id, input).await {
        Ok(transaction) => {
            info!(transaction_id = transaction.id, "Transaction updated");
            (StatusCode::OK, Json(json!(transaction))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update transaction");
            map_transaction_error(&e)
        }
    }
}

/// DELETE `/transactions/{id}` - Delete a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(transaction_id = id, "Transaction deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete transaction");
            map_transaction_error(&e)
        }
    }
}

/// Maps transaction errors to HTTP responses.
fn map_transaction_error(e: &TransactionError) -> axum::response::Response {
    match e {
        TransactionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Transaction not found: {id}")
            })),
        )
            .into_response(),
        TransactionError::CategoryNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        TransactionError::SubcategoryNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Subcategory not found: {id}")
            })),
        )
            .into_response(),
        TransactionError::KindMismatch => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "type_mismatch",
                "message": "Transaction kind does not match category kind"
            })),
        )
            .into_response(),
        TransactionError::Database(_) => (
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
    fn test_update_request_null_clears_nullable_fields() {
        let payload: UpdateTransactionRequest =
            serde_json::from_str(r#"{"subcategory_id": null, "description": null}"#).unwrap();
        assert_eq!(payload.subcategory_id, Some(None));
        assert_eq!(payload.description, Some(None));

        let payload: UpdateTransactionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.subcategory_id, None);
        assert_eq!(payload.description, None);

        let payload: UpdateTransactionRequest =
            serde_json::from_str(r#"{"description": "groceries"}"#).unwrap();
        assert_eq!(payload.description, Some(Some("groceries".to_string())));
    }

    #[test]
    fn test_missing_reference_maps_to_not_found() {
        assert_eq!(
            map_transaction_error(&TransactionError::CategoryNotFound(1)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            map_transaction_error(&TransactionError::SubcategoryNotFound(2)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            map_transaction_error(&TransactionError::KindMismatch).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
