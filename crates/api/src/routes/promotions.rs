//! Route definitions for promotions.

use axum::routing::get;
use axum::Router;

use crate::handlers::promotions;
use crate::state::AppState;

/// Promotion routes mounted at `/promotions`.
///
/// ```text
/// GET    /        -> list_promotions
/// POST   /        -> create_promotion
/// GET    /{key}   -> get_promotion
/// PUT    /{key}   -> update_promotion
/// DELETE /{key}   -> delete_promotion
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(promotions::list_promotions).post(promotions::create_promotion),
        )
        .route(
            "/{key}",
            get(promotions::get_promotion)
                .put(promotions::update_promotion)
                .delete(promotions::delete_promotion),
        )
}
