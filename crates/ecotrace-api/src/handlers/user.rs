//! User profile and directory handlers.

use axum::Json;
use axum::extract::{Query, State};
use validator::Validate;

use ecotrace_core::error::AppError;
use ecotrace_core::types::pagination::PageResponse;
use ecotrace_service::user::UpdateProfileInput;

use crate::dto::request::{ChangePasswordRequest, UpdateProfileRequest, UserListParams};
use crate::dto::response::{ApiResponse, MessageResponse, UserResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state
        .user_service
        .update_profile(
            &auth,
            UpdateProfileInput {
                display_name: req.display_name,
                email: req.email,
                phone: req.phone,
                address: req.address,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state
        .user_service
        .change_password(&auth, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password changed".to_string(),
    })))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<UserListParams>,
    Query(page): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<UserResponse>>>, AppError> {
    let result = state
        .user_service
        .list(&auth, params.role, page.into_page_request())
        .await?;

    let users = PageResponse {
        items: result.items.into_iter().map(UserResponse::from).collect(),
        page: result.page,
        page_size: result.page_size,
        total_items: result.total_items,
        total_pages: result.total_pages,
        has_next: result.has_next,
        has_previous: result.has_previous,
    };

    Ok(Json(ApiResponse::ok(users)))
}
