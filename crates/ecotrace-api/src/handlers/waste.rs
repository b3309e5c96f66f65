//! Waste-item handlers — the technician bench.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use ecotrace_core::error::AppError;
use ecotrace_core::types::pagination::PageResponse;
use ecotrace_entity::waste::WasteItem;
use ecotrace_service::waste::FinalizeValorizationInput;

use crate::dto::request::{FinalizeValorizationRequest, WasteListParams};
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/waste-items
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<WasteListParams>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<WasteItem>>>, AppError> {
    let result = state
        .waste_service
        .list(&auth, params.status, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/waste-items/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WasteItem>>, AppError> {
    let item = state.waste_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/waste-items/{id}/start
pub async fn start(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WasteItem>>, AppError> {
    let item = state.waste_service.start(&auth, id).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/waste-items/{id}/finalize
pub async fn finalize(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<FinalizeValorizationRequest>,
) -> Result<Json<ApiResponse<WasteItem>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let item = state
        .waste_service
        .finalize(
            &auth,
            id,
            FinalizeValorizationInput {
                outcome: req.outcome,
                quantity_valorized_kg: req.quantity_valorized_kg,
                yield_pct: req.yield_pct,
                notes: req.notes,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(item)))
}
