//! API route definitions.

use axum::{Router, middleware};
use serde::{Deserialize, Deserializer};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod health;
pub mod reports;
pub mod settings;
pub mod subcategories;
pub mod transactions;

/// Deserializes a nullable field so an absent key and an explicit
/// `null` stay distinguishable: absent stays `None` (via
/// `#[serde(default)]`), `null` becomes `Some(None)` ("clear"), and a
/// value becomes `Some(Some(value))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(auth::routes())
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(categories::routes())
        .merge(subcategories::routes())
        .merge(budgets::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
        .merge(settings::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
