//! Valorization operations for waste items.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use ecotrace_core::error::AppError;
use ecotrace_core::events::{DomainEvent, EventPayload, WasteEvent};
use ecotrace_core::types::pagination::{PageRequest, PageResponse};
use ecotrace_database::repositories::collection::CollectionRepository;
use ecotrace_database::repositories::waste::WasteRepository;
use ecotrace_entity::user::UserRole;
use ecotrace_entity::waste::{ValorizationOutcome, WasteItem, WasteItemStatus};

use crate::context::RequestContext;
use crate::notification::Notifier;

/// Input for finalizing a waste item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeValorizationInput {
    /// The mandatory outcome decision.
    pub outcome: Option<ValorizationOutcome>,
    /// Quantity actually valorized in kilograms.
    pub quantity_valorized_kg: Option<f64>,
    /// Yield percentage (0-100).
    pub yield_pct: Option<f64>,
    /// Technician notes.
    pub notes: Option<String>,
}

/// Handles technician processing of waste items.
#[derive(Debug, Clone)]
pub struct WasteService {
    /// Waste repository.
    waste_repo: Arc<WasteRepository>,
    /// Collection repository (to resolve the requester for notifications).
    collection_repo: Arc<CollectionRepository>,
    /// Notification fan-out.
    notifier: Arc<Notifier>,
}

impl WasteService {
    /// Creates a new waste service.
    pub fn new(
        waste_repo: Arc<WasteRepository>,
        collection_repo: Arc<CollectionRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            waste_repo,
            collection_repo,
            notifier,
        }
    }

    /// Starts valorization: assigns the acting technician and moves the
    /// item to `en_cours`. Allowed only from `nouveau`.
    pub async fn start(&self, ctx: &RequestContext, item_id: Uuid) -> Result<WasteItem, AppError> {
        self.check_technician(ctx)?;

        let item = self.load(item_id).await?;
        if !item.status.can_transition(WasteItemStatus::EnCours) {
            return Err(AppError::invalid_state(format!(
                "Cannot start valorization of item {} in status {}",
                item.id, item.status
            )));
        }

        let updated = self
            .waste_repo
            .start(item_id, ctx.user_id)
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!("Item {} was claimed concurrently", item.id))
            })?;

        info!(item_id = %updated.id, technician = %ctx.user_id, "Valorization started");

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Waste(WasteEvent::ValorizationStarted {
                    item_id: updated.id,
                    technician_id: ctx.user_id,
                }),
            ))
            .await?;

        Ok(updated)
    }

    /// Finalizes valorization with an outcome, yield, and notes.
    ///
    /// Allowed only from `en_cours` and only for the technician who
    /// started the item; re-finalizing fails and leaves the recorded
    /// outcome untouched.
    pub async fn finalize(
        &self,
        ctx: &RequestContext,
        item_id: Uuid,
        input: FinalizeValorizationInput,
    ) -> Result<WasteItem, AppError> {
        self.check_technician(ctx)?;

        let outcome = input
            .outcome
            .ok_or_else(|| AppError::validation("An outcome (recycle or destroy) is required"))?;

        if let Some(pct) = input.yield_pct {
            if !(0.0..=100.0).contains(&pct) {
                return Err(AppError::validation("Yield must be between 0 and 100"));
            }
        }

        let item = self.load(item_id).await?;
        if !item.status.can_transition(WasteItemStatus::Termine) {
            return Err(AppError::invalid_state(format!(
                "Cannot finalize item {} in status {}",
                item.id, item.status
            )));
        }

        if item.technician_id != Some(ctx.user_id) {
            return Err(AppError::authorization(
                "Only the technician who started this item may finalize it",
            ));
        }

        let updated = self
            .waste_repo
            .finalize(
                item_id,
                outcome,
                input.quantity_valorized_kg,
                input.yield_pct,
                input.notes.as_deref(),
            )
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!("Item {} was finalized concurrently", item.id))
            })?;

        info!(
            item_id = %updated.id,
            outcome = %outcome,
            "Valorization finalized"
        );

        let collection = self
            .collection_repo
            .find_by_id(updated.collection_id)
            .await?;

        if let Some(collection) = collection {
            self.notifier
                .dispatch(&DomainEvent::new(
                    Some(ctx.user_id),
                    EventPayload::Waste(WasteEvent::ValorizationFinalized {
                        item_id: updated.id,
                        requester_id: collection.requester_id,
                        outcome: outcome.to_string(),
                        yield_pct: updated.yield_pct,
                    }),
                ))
                .await?;
        }

        Ok(updated)
    }

    /// Gets one waste item, enforcing per-role visibility.
    pub async fn get(&self, ctx: &RequestContext, item_id: Uuid) -> Result<WasteItem, AppError> {
        let item = self.load(item_id).await?;

        if ctx.role.is_requester() {
            let owns = self
                .collection_repo
                .find_by_id(item.collection_id)
                .await?
                .map(|c| c.requester_id == ctx.user_id)
                .unwrap_or(false);
            if !owns {
                return Err(AppError::not_found("Waste item not found"));
            }
        }

        Ok(item)
    }

    /// Lists items by processing state (the technician bench views), or a
    /// requester's own item history.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<WasteItemStatus>,
        page: PageRequest,
    ) -> Result<PageResponse<WasteItem>, AppError> {
        if ctx.role.is_requester() {
            return self.waste_repo.find_by_requester(ctx.user_id, &page).await;
        }

        let status = status.unwrap_or(WasteItemStatus::Nouveau);
        self.waste_repo.find_by_status(status, &page).await
    }

    async fn load(&self, item_id: Uuid) -> Result<WasteItem, AppError> {
        self.waste_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Waste item {item_id} not found")))
    }

    fn check_technician(&self, ctx: &RequestContext) -> Result<(), AppError> {
        if ctx.role != UserRole::Technicien {
            return Err(AppError::authorization(
                "Only technicians may valorize waste items",
            ));
        }
        Ok(())
    }
}
