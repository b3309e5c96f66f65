//! Dashboard handlers.

use axum::Json;
use axum::extract::State;

use ecotrace_core::error::AppError;
use ecotrace_service::report::DashboardStats;

use crate::dto::response::ApiResponse;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = state.dashboard_service.stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
