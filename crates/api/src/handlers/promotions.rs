//! Handlers for promotion CRUD.
//!
//! The `{key}` path segment is a promotion code or a numeric id depending on
//! the deployment's identity mode.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promotrack_core::promotion::PromotionInput;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/promotions
///
/// List all promotions by ascending start date.
pub async fn list_promotions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let promotions = state.promotions.list().await?;

    Ok(Json(DataResponse { data: promotions }))
}

/// GET /api/v1/promotions/{key}
pub async fn get_promotion(
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = state.promotions.parse_key(&raw_key)?;
    let promotion = state.promotions.get(&key).await?;

    Ok(Json(DataResponse { data: promotion }))
}

/// POST /api/v1/promotions
///
/// Create a promotion. Returns 409 if its window overlaps another promotion
/// in the same scope.
pub async fn create_promotion(
    State(state): State<AppState>,
    payload: Result<Json<PromotionInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let promotion = state.promotions.create(input).await?;

    tracing::info!(
        promotion_id = promotion.id,
        promotion_code = ?promotion.promotion_code,
        start_date = %promotion.start_date,
        end_date = %promotion.end_date,
        "Promotion created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: promotion })))
}

/// PUT /api/v1/promotions/{key}
///
/// Replace every mutable field of a promotion.
pub async fn update_promotion(
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
    payload: Result<Json<PromotionInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let key = state.promotions.parse_key(&raw_key)?;
    let Json(input) = payload?;
    let promotion = state.promotions.update(&key, input).await?;

    tracing::info!(
        promotion_id = promotion.id,
        promotion_code = ?promotion.promotion_code,
        "Promotion updated",
    );

    Ok(Json(DataResponse { data: promotion }))
}

/// DELETE /api/v1/promotions/{key}
pub async fn delete_promotion(
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = state.promotions.parse_key(&raw_key)?;
    state.promotions.delete(&key).await?;

    tracing::info!(key = %key, "Promotion deleted");

    Ok(StatusCode::NO_CONTENT)
}
