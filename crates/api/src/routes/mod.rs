pub mod health;
pub mod promotions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /promotions          list, create
/// /promotions/{key}    get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/promotions", promotions::router())
}
