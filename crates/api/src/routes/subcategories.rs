//! Subcategory management routes.

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
use moneta_db::repositories::subcategory::{
    CreateSubcategoryInput, SubcategoryError, SubcategoryRepository, UpdateSubcategoryInput,
};

/// Creates the subcategory routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/subcategories", get(list_subcategories))
        .route("/subcategories", post(create_subcategory))
        .route("/subcategories/{id}", get(get_subcategory))
        .route("/subcategories/{id}", put(update_subcategory))
        .route("/subcategories/{id}", delete(delete_subcategory))
}

/// Request body for creating a subcategory.
#[derive(Debug, Deserialize)]
pub struct CreateSubcategoryRequest {
    /// Subcategory name.
    pub name: String,
    /// Parent category ID.
    pub category_id: i32,
}

/// Request body for updating a subcategory.
#[derive(Debug, Deserialize)]
pub struct UpdateSubcategoryRequest {
    /// New name.
    pub name: Option<String>,
    /// New parent category.
    pub category_id: Option<i32>,
}

/// Query parameters for listing subcategories.
#[derive(Debug, Deserialize)]
pub struct ListSubcategoriesQuery {
    /// Restrict to one category.
    pub category_id: Option<i32>,
}

/// GET `/subcategories` - List subcategories, optionally for one category.
async fn list_subcategories(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListSubcategoriesQuery>,
) -> impl IntoResponse {
    let repo = SubcategoryRepository::new((*state.db).clone());

    match repo.list(query.category_id).await {
        Ok(subcategories) => (StatusCode::OK, Json(json!(subcategories))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list subcategories");
            map_subcategory_error(&e)
        }
    }
}

/// POST `/subcategories` - Create a subcategory.
async fn create_subcategory(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<CreateSubcategoryRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_input",
                "message": "Subcategory name is required"
            })),
        )
            .into_response();
    }

    let repo = SubcategoryRepository::new((*state.db).clone());
    let input = CreateSubcategoryInput {
        name: payload.name,
        category_id: payload.category_id,
    };

    match repo.create(input).await {
        Ok(subcategory) => {
            info!(
                subcategory_id = subcategory.id,
                category_id = subcategory.category_id,
                "Subcategory created"
            );
            (StatusCode::CREATED, Json(json!(subcategory))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create subcategory");
            map_subcategory_error(&e)
        }
    }
}

/// GET `/subcategories/{id}` - Get one subcategory.
async fn get_subcategory(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = SubcategoryRepository::new((*state.db).clone());

    match repo.get(id).await {
        Ok(subcategory) => (StatusCode::OK, Json(json!(subcategory))).into_response(),
        Err(e) => map_subcategory_error(&e),
    }
}

/// PUT `/subcategories/{id}` - Partially update a subcategory.
async fn update_subcategory(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSubcategoryRequest>,
) -> impl IntoResponse {
    let repo = SubcategoryRepository::new((*state.db).clone());
    let input = UpdateSubcategoryInput {
        name: payload.name,
        category_id: payload.category_id,
    };

    match repo.update(id, input).await {
        Ok(subcategory) => {
            info!(subcategory_id = subcategory.id, "Subcategory updated");
            (StatusCode::OK, Json(json!(subcategory))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to update subcategory");
            map_subcategory_error(&e)
        }
    }
}

/// DELETE `/subcategories/{id}` - Delete a subcategory.
async fn delete_subcategory(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = SubcategoryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(subcategory_id = id, "Subcategory deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to delete subcategory");
            map_subcategory_error(&e)
        }
    }
}

/// Maps subcategory errors to HTTP responses.
fn map_subcategory_error(e: &SubcategoryError) -> axum::response::Response {
    match e {
        SubcategoryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Subcategory not found: {id}")
            })),
        )
            .into_response(),
        SubcategoryError::CategoryNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("Category not found: {id}")
            })),
        )
            .into_response(),
        SubcategoryError::Database(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}
