//! Per-role dashboard counters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ecotrace_core::error::AppError;
use ecotrace_database::repositories::collection::CollectionRepository;
use ecotrace_database::repositories::request::RequestRepository;
use ecotrace_database::repositories::waste::WasteRepository;
use ecotrace_entity::collection::CollectionStatus;
use ecotrace_entity::request::RequestStatus;
use ecotrace_entity::user::UserRole;
use ecotrace_entity::waste::WasteItemStatus;

use crate::context::RequestContext;

/// Counter set shown on a dashboard. Which counters are populated depends
/// on the viewer's role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Total requests visible to the viewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_total: Option<i64>,
    /// Requests awaiting a decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_pending: Option<i64>,
    /// Scheduled collections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections_planned: Option<i64>,
    /// Collections in transit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections_in_progress: Option<i64>,
    /// Completed collections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections_completed: Option<i64>,
    /// Unassigned planned collections (transporter view).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections_available: Option<i64>,
    /// Items waiting on the bench.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_pending: Option<i64>,
    /// Items being processed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_in_progress: Option<i64>,
    /// Items the viewing technician has handled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waste_processed: Option<i64>,
}

/// Builds per-role dashboard counters.
#[derive(Debug, Clone)]
pub struct DashboardService {
    request_repo: Arc<RequestRepository>,
    collection_repo: Arc<CollectionRepository>,
    waste_repo: Arc<WasteRepository>,
}

impl DashboardService {
    /// Creates a new dashboard service.
    pub fn new(
        request_repo: Arc<RequestRepository>,
        collection_repo: Arc<CollectionRepository>,
        waste_repo: Arc<WasteRepository>,
    ) -> Self {
        Self {
            request_repo,
            collection_repo,
            waste_repo,
        }
    }

    /// Builds the counter set for the acting role.
    pub async fn stats(&self, ctx: &RequestContext) -> Result<DashboardStats, AppError> {
        let mut stats = DashboardStats::default();

        match ctx.role {
            UserRole::Particulier | UserRole::Entreprise => {
                stats.requests_pending = Some(
                    self.request_repo
                        .count_by_requester_and_status(ctx.user_id, RequestStatus::EnAttente)
                        .await?,
                );
                stats.requests_total = Some(
                    self.requester_total(ctx).await?,
                );
            }
            UserRole::Transporteur => {
                stats.collections_in_progress = Some(
                    self.collection_repo
                        .count_for_transporter(ctx.user_id, CollectionStatus::EnCours)
                        .await?,
                );
                stats.collections_completed = Some(
                    self.collection_repo
                        .count_for_transporter(ctx.user_id, CollectionStatus::Terminee)
                        .await?,
                );
                stats.collections_available =
                    Some(self.collection_repo.count_unassigned_planned().await?);
            }
            UserRole::Technicien => {
                stats.waste_pending = Some(
                    self.waste_repo
                        .count_by_status(WasteItemStatus::Nouveau)
                        .await?,
                );
                stats.waste_in_progress = Some(
                    self.waste_repo
                        .count_by_status(WasteItemStatus::EnCours)
                        .await?,
                );
                stats.waste_processed =
                    Some(self.waste_repo.count_by_technician(ctx.user_id).await?);
            }
            UserRole::Administrateur | UserRole::ResponsableLogistique => {
                stats.requests_pending = Some(
                    self.request_repo
                        .count_by_status(RequestStatus::EnAttente)
                        .await?,
                );
                stats.collections_planned = Some(
                    self.collection_repo
                        .count_by_status(CollectionStatus::Planifiee)
                        .await?,
                );
                stats.collections_in_progress = Some(
                    self.collection_repo
                        .count_by_status(CollectionStatus::EnCours)
                        .await?,
                );
                stats.waste_pending = Some(
                    self.waste_repo
                        .count_by_status(WasteItemStatus::Nouveau)
                        .await?,
                );
            }
        }

        Ok(stats)
    }

    async fn requester_total(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        let mut total = 0;
        for status in [
            RequestStatus::EnAttente,
            RequestStatus::Approuvee,
            RequestStatus::Rejetee,
            RequestStatus::Planifiee,
        ] {
            total += self
                .request_repo
                .count_by_requester_and_status(ctx.user_id, status)
                .await?;
        }
        Ok(total)
    }
}
