//! Category management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use moneta_db::repositories::category::{
    CategoryError, CategoryFilter, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
use moneta_db::repositories::subcategory::SubcategoryRepository;
use moneta_shared::CategoryKind;

/// Creates the category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{id}", get(get_category))
        .route("/categories/{id}", put(update_category))
        .route("/categories/{id}", delete(delete_category))
        .route("/categories/{id}/subcategories", get(list_category_subcategories))
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name.
    pub name: String,
    /// Income or expense.
    pub kind: CategoryKind,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<CategoryKind>,
}

/// Query parameters for listing categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Restrict to income or expense categories.
    pub kind: Option<CategoryKind>,
    /// Number of rows to skip.
    pub skip: Option<u64>,
    /// Maximum number of rows to return.
    pub limit: Option<u64>,
}

/// GET `/categories` - List categories, optionally filtered and paginated.
async fn list_categories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListCategoriesQuery>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());
    let filter = CategoryFilter {
        kind: query.kind.map(Into::into),
        skip: query.skip,
        limit: query.limit,
    };

    match repo.list(filter).await {
        Ok(categories) => (StatusCode::OK, Json(json!(categories))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            map_category_error(&e)
        }
    }
}

/// POST `/categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_input",
                "message": "Category name is required"
            })),
        )
            .into_response();
    }

    let repo = CategoryRepository::new((*state.db).clone());
    let input = CreateCategoryInput {
        name: payload.name,
        kind: payload.kind.into(),
    };

    match repo.create(input).await {
        Ok(category) => {
            info!(category_id = category.id, name = %category.name, "Category created");
            (StatusCode::CREATED, Json(json!(category))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create category");
            map_category_error(&e)
        }
    }
}

/// GET `/categories/{id}` - Get one category.
async fn get_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(category) => (StatusCode::OK, Json(json!(category))).into_response(),
        Err(e) => map_category_error(&e),
    }
}

/// PUT `/categories/{id}` - Partially update a category.
async fn update_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());
    let input = UpdateCategoryInput {
        name: payload.name,
        kind: payload.kind.map(Into::into),
    };

    match repo.update(id, input).await {
        Ok(category) => {
            info!(category_id = category.id, "Category updated");
            (StatusCode::OK, Json(json!(category))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update category");
            map_category_error(&e)
        }
    }
}

/// DELETE `/categories/{id}` - Delete a category and its dependents.
async fn delete_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(category_id = id, "Category deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete category");
            map_category_error(&e)
        }
    }
}

/// GET `/categories/{id}/subcategories` - Subcategories of one category.
async fn list_category_subcategories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let categories = CategoryRepository::new((*state.db).clone());
    if let Err(e) = categories.get(id).await {
        return map_category_error(&e);
    }

    let subcategories = SubcategoryRepository::new((*state.db).clone());
    match subcategories.list(Some(id)).await {
        Ok(items) => (StatusCode::OK, Json(json!(items))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list category subcategories");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// Maps category errors to HTTP responses.
fn map_category_error(e: &CategoryError) -> axum::response::Response {
    match e {
        CategoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        CategoryError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
