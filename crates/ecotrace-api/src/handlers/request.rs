//! Collection-request handlers — intake and the approval gate.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;
use validator::Validate;

use ecotrace_core::error::AppError;
use ecotrace_core::types::pagination::PageResponse;
use ecotrace_entity::request::CollectionRequest;
use ecotrace_service::request::{ApproveInput, RejectInput, SubmitRequestInput};

use crate::dto::request::{ApproveRequestRequest, RejectRequestRequest, SubmitRequestRequest};
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/requests
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SubmitRequestRequest>,
) -> Result<Json<ApiResponse<CollectionRequest>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let request = state
        .request_service
        .submit(
            &auth,
            SubmitRequestInput {
                waste_type: req.waste_type,
                description: req.description,
                quantity: req.quantity,
                mode: req.mode,
                desired_date: req.desired_date,
                time_slot: req.time_slot,
                address: req.address,
                phone: req.phone,
                special_instructions: req.special_instructions,
                photo_urls: req.photo_urls,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(request)))
}

/// GET /api/requests
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<CollectionRequest>>>, AppError> {
    let result = state
        .request_service
        .list(&auth, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/requests/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CollectionRequest>>, AppError> {
    let request = state.request_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/requests/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ApproveRequestRequest>,
) -> Result<Json<ApiResponse<CollectionRequest>>, AppError> {
    let request = state
        .request_service
        .approve(
            &auth,
            id,
            ApproveInput {
                priority: req.priority,
                notes: req.notes,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}

/// POST /api/requests/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequestRequest>,
) -> Result<Json<ApiResponse<CollectionRequest>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let request = state
        .request_service
        .reject(
            &auth,
            id,
            RejectInput {
                motive: req.motive,
                notes: req.notes,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}
