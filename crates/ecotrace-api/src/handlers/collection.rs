//! Collection handlers — scheduling and the transport handshake.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use ecotrace_core::error::AppError;
use ecotrace_core::types::pagination::PageResponse;
use ecotrace_entity::collection::Collection;
use ecotrace_entity::waste::WasteItem;
use ecotrace_service::collection::{
    CancelInput, ConfirmDeliveryInput, ExtraItemInput, ScheduleCollectionInput,
};

use crate::dto::request::{
    AssignTransporterRequest, CancelCollectionRequest, ConfirmDeliveryRequest,
    ConfirmReceptionRequest, ScheduleCollectionRequest,
};
use crate::dto::response::ApiResponse;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// Delivery confirmation result: the completed collection and the waste
/// items it produced.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryResponse {
    /// The completed collection.
    pub collection: Collection,
    /// The waste items handed to the technicians.
    pub waste_items: Vec<WasteItem>,
}

/// POST /api/collections
pub async fn schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ScheduleCollectionRequest>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let collection = state
        .collection_service
        .schedule(
            &auth,
            ScheduleCollectionInput {
                request_id: req.request_id,
                date: req.date,
                transporter_id: req.transporter_id,
                instructions: req.instructions,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(collection)))
}

/// GET /api/collections
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Collection>>>, AppError> {
    let result = state
        .collection_service
        .list(&auth, page.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/collections/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let collection = state.collection_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(collection)))
}

/// PUT /api/collections/{id}/transporter
pub async fn assign_transporter(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignTransporterRequest>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let collection = state
        .collection_service
        .assign_transporter(&auth, id, req.transporter_id)
        .await?;
    Ok(Json(ApiResponse::ok(collection)))
}

/// POST /api/collections/{id}/confirm-reception
pub async fn confirm_reception(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmReceptionRequest>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    let collection = state
        .collection_service
        .confirm_reception(&auth, id, req.notes)
        .await?;
    Ok(Json(ApiResponse::ok(collection)))
}

/// POST /api/collections/{id}/confirm-delivery
pub async fn confirm_delivery(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ConfirmDeliveryRequest>,
) -> Result<Json<ApiResponse<DeliveryResponse>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let extra_items = req
        .extra_items
        .into_iter()
        .map(|item| ExtraItemInput {
            waste_type: item.waste_type,
            category: item.category,
            description: item.description,
            quantity_kg: item.quantity_kg,
        })
        .collect();

    let (collection, waste_items) = state
        .collection_service
        .confirm_delivery(
            &auth,
            id,
            ConfirmDeliveryInput {
                notes: req.notes,
                actual_quantity_kg: req.actual_quantity_kg,
                extra_items,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(DeliveryResponse {
        collection,
        waste_items,
    })))
}

/// POST /api/collections/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CancelCollectionRequest>,
) -> Result<Json<ApiResponse<Collection>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let collection = state
        .collection_service
        .cancel(&auth, id, CancelInput { motive: req.motive })
        .await?;
    Ok(Json(ApiResponse::ok(collection)))
}
