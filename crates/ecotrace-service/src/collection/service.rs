//! Scheduler and transport-confirmation operations for collections.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use ecotrace_core::error::AppError;
use ecotrace_core::events::{CollectionEvent, DomainEvent, EventPayload};
use ecotrace_core::types::pagination::{PageRequest, PageResponse};
use ecotrace_database::repositories::collection::CollectionRepository;
use ecotrace_database::repositories::request::RequestRepository;
use ecotrace_database::repositories::user::UserRepository;
use ecotrace_database::repositories::waste::WasteRepository;
use ecotrace_entity::collection::model::CreateCollection;
use ecotrace_entity::collection::{Collection, CollectionStatus};
use ecotrace_entity::request::{CollectionRequest, WasteType};
use ecotrace_entity::user::UserRole;
use ecotrace_entity::waste::model::CreateWasteItem;

use crate::context::RequestContext;
use crate::notification::Notifier;

/// Fallback base-item weight when the request declared no quantity bucket
/// and the transporter measured nothing.
const DEFAULT_ITEM_KG: f64 = 1.0;

/// Input for scheduling a collection from an approved request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCollectionInput {
    /// The approved request to plan.
    pub request_id: Uuid,
    /// Pickup date.
    pub date: NaiveDate,
    /// Optional transporter; assignment may be deferred.
    pub transporter_id: Option<Uuid>,
    /// Free-text instructions for the crew.
    pub instructions: Option<String>,
}

/// One extra waste item discovered on-site at delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraItemInput {
    /// Waste type of the discovered item.
    pub waste_type: WasteType,
    /// Category refinement.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Measured quantity in kilograms.
    pub quantity_kg: f64,
}

/// Input for confirming delivery to the technicians.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmDeliveryInput {
    /// Mandatory handover notes.
    pub notes: String,
    /// Measured quantity of the declared waste, when weighed.
    pub actual_quantity_kg: Option<f64>,
    /// Extra items discovered on-site.
    pub extra_items: Vec<ExtraItemInput>,
}

/// Input for cancelling a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelInput {
    /// Mandatory cancellation motive.
    pub motive: String,
}

/// Handles scheduling, transporter assignment, and the two-phase
/// transport handshake.
#[derive(Debug, Clone)]
pub struct CollectionService {
    /// Collection repository.
    collection_repo: Arc<CollectionRepository>,
    /// Request repository (for the one-to-one precondition).
    request_repo: Arc<RequestRepository>,
    /// Waste repository (items are created at delivery).
    waste_repo: Arc<WasteRepository>,
    /// User repository (transporter validation).
    user_repo: Arc<UserRepository>,
    /// Notification fan-out.
    notifier: Arc<Notifier>,
}

impl CollectionService {
    /// Creates a new collection service.
    pub fn new(
        collection_repo: Arc<CollectionRepository>,
        request_repo: Arc<RequestRepository>,
        waste_repo: Arc<WasteRepository>,
        user_repo: Arc<UserRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            collection_repo,
            request_repo,
            waste_repo,
            user_repo,
            notifier,
        }
    }

    /// Converts an approved request into a scheduled collection.
    ///
    /// Preconditions: the request is `APPROUVEE` and no collection
    /// references it yet. The request is denormalized to `PLANIFIEE`.
    pub async fn schedule(
        &self,
        ctx: &RequestContext,
        input: ScheduleCollectionInput,
    ) -> Result<Collection, AppError> {
        if !ctx.can_schedule() {
            return Err(AppError::authorization(
                "Only logistics may schedule collections",
            ));
        }

        let request = self
            .request_repo
            .find_by_id(input.request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {} not found", input.request_id)))?;

        if !request.schedulable() {
            return Err(AppError::invalid_state(format!(
                "Cannot schedule request {} in status {}",
                request.reference, request.status
            )));
        }

        if let Some(existing) = self.collection_repo.find_by_request(request.id).await? {
            return Err(AppError::conflict(format!(
                "Request {} is already scheduled as {}",
                request.reference, existing.reference
            )));
        }

        if let Some(transporter_id) = input.transporter_id {
            self.check_transporter(transporter_id).await?;
        }

        let collection = self
            .collection_repo
            .create(&CreateCollection {
                request_id: request.id,
                requester_id: request.requester_id,
                transporter_id: input.transporter_id,
                scheduled_date: input.date,
                address: request.address.clone(),
                phone: request.phone.clone(),
                instructions: input.instructions,
            })
            .await?;

        if self.request_repo.mark_planned(request.id).await?.is_none() {
            // The unique constraint on request_id already guarantees the
            // one-to-one invariant; losing this denormalization race only
            // means the request status lags.
            warn!(request_id = %request.id, "Request left APPROUVEE during scheduling");
        }

        info!(
            collection_id = %collection.id,
            reference = %collection.reference,
            request = %request.reference,
            "Collection scheduled"
        );

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Collection(CollectionEvent::Scheduled {
                    collection_id: collection.id,
                    reference: collection.reference.clone(),
                    requester_id: collection.requester_id,
                    transporter_id: collection.transporter_id,
                    scheduled_date: collection.scheduled_date,
                }),
            ))
            .await?;

        Ok(collection)
    }

    /// Assigns a transporter to a planned collection.
    ///
    /// Logistics assigns anyone with the transporter role; a transporter
    /// may claim an unassigned collection for themselves.
    pub async fn assign_transporter(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        transporter_id: Uuid,
    ) -> Result<Collection, AppError> {
        let self_assign = ctx.role == UserRole::Transporteur && transporter_id == ctx.user_id;
        if !ctx.can_schedule() && !self_assign {
            return Err(AppError::authorization(
                "Only logistics may assign transporters",
            ));
        }

        let collection = self.load(collection_id).await?;
        if !collection.assignable() {
            return Err(AppError::invalid_state(format!(
                "Cannot assign a transporter to collection {} in status {}",
                collection.reference, collection.status
            )));
        }

        self.check_transporter(transporter_id).await?;

        let updated = self
            .collection_repo
            .assign_transporter(collection_id, transporter_id)
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "Collection {} left PLANIFIEE concurrently",
                    collection.reference
                ))
            })?;

        info!(
            collection_id = %updated.id,
            transporter_id = %transporter_id,
            "Transporter assigned"
        );

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Collection(CollectionEvent::TransporterAssigned {
                    collection_id: updated.id,
                    reference: updated.reference.clone(),
                    transporter_id,
                    scheduled_date: updated.scheduled_date,
                }),
            ))
            .await?;

        Ok(updated)
    }

    /// Phase one of the transport handshake: the assigned transporter
    /// confirms physical receipt.
    pub async fn confirm_reception(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        notes: Option<String>,
    ) -> Result<Collection, AppError> {
        let collection = self.load(collection_id).await?;
        self.check_acting_transporter(ctx, &collection)?;

        if !collection.status.can_transition(CollectionStatus::EnCours) {
            return Err(AppError::invalid_state(format!(
                "Cannot confirm reception of collection {} in status {}",
                collection.reference, collection.status
            )));
        }

        let updated = self
            .collection_repo
            .confirm_reception(collection_id, notes.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "Collection {} left PLANIFIEE concurrently",
                    collection.reference
                ))
            })?;

        info!(collection_id = %updated.id, reference = %updated.reference, "Reception confirmed");

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Collection(CollectionEvent::ReceptionConfirmed {
                    collection_id: updated.id,
                    reference: updated.reference.clone(),
                    requester_id: updated.requester_id,
                }),
            ))
            .await?;

        Ok(updated)
    }

    /// Phase two of the transport handshake: the assigned transporter
    /// confirms delivery, producing the waste items the technicians will
    /// process.
    pub async fn confirm_delivery(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        input: ConfirmDeliveryInput,
    ) -> Result<(Collection, Vec<ecotrace_entity::waste::WasteItem>), AppError> {
        validate_delivery(&input)?;

        let collection = self.load(collection_id).await?;
        self.check_acting_transporter(ctx, &collection)?;

        if !collection.status.can_transition(CollectionStatus::Terminee) {
            return Err(AppError::invalid_state(format!(
                "Cannot confirm delivery of collection {} in status {}",
                collection.reference, collection.status
            )));
        }

        let request = self
            .request_repo
            .find_by_id(collection.request_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Originating request of collection {} not found",
                    collection.reference
                ))
            })?;

        let updated = self
            .collection_repo
            .confirm_delivery(collection_id, input.notes.trim())
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "Collection {} left EN_COURS concurrently",
                    collection.reference
                ))
            })?;

        let batch = delivery_items(&request, updated.id, input.actual_quantity_kg, &input.extra_items);
        let items = self.waste_repo.create_batch(&batch).await?;

        info!(
            collection_id = %updated.id,
            reference = %updated.reference,
            items = items.len(),
            "Delivery confirmed"
        );

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Collection(CollectionEvent::DeliveryConfirmed {
                    collection_id: updated.id,
                    reference: updated.reference.clone(),
                    requester_id: updated.requester_id,
                    item_count: items.len(),
                }),
            ))
            .await?;

        Ok((updated, items))
    }

    /// Cancels a planned or in-transit collection with a mandatory motive.
    ///
    /// Allowed for logistics/admin and for the assigned transporter.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
        input: CancelInput,
    ) -> Result<Collection, AppError> {
        if input.motive.trim().is_empty() {
            return Err(AppError::validation("A cancellation motive is required"));
        }

        let collection = self.load(collection_id).await?;
        if !ctx.can_schedule() && !collection.is_assigned_to(ctx.user_id) {
            return Err(AppError::authorization(
                "Only logistics or the assigned transporter may cancel",
            ));
        }

        if !collection.status.can_transition(CollectionStatus::Annulee) {
            return Err(AppError::invalid_state(format!(
                "Cannot cancel collection {} in status {}",
                collection.reference, collection.status
            )));
        }

        let updated = self
            .collection_repo
            .cancel(collection_id, input.motive.trim())
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "Collection {} reached a terminal state concurrently",
                    collection.reference
                ))
            })?;

        info!(collection_id = %updated.id, reference = %updated.reference, "Collection cancelled");

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Collection(CollectionEvent::Cancelled {
                    collection_id: updated.id,
                    reference: updated.reference.clone(),
                    requester_id: updated.requester_id,
                    transporter_id: updated.transporter_id,
                    motive: input.motive.trim().to_string(),
                }),
            ))
            .await?;

        Ok(updated)
    }

    /// Gets one collection, enforcing per-role visibility.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        collection_id: Uuid,
    ) -> Result<Collection, AppError> {
        let collection = self.load(collection_id).await?;
        if ctx.role.is_requester() && collection.requester_id != ctx.user_id {
            return Err(AppError::not_found("Collection not found"));
        }
        Ok(collection)
    }

    /// Lists collections visible to the acting role.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Collection>, AppError> {
        match ctx.role {
            role if role.can_schedule() => self.collection_repo.find_all(&page).await,
            UserRole::Transporteur => {
                self.collection_repo
                    .find_for_transporter(ctx.user_id, &page)
                    .await
            }
            _ => {
                self.collection_repo
                    .find_by_requester(ctx.user_id, &page)
                    .await
            }
        }
    }

    async fn load(&self, collection_id: Uuid) -> Result<Collection, AppError> {
        self.collection_repo
            .find_by_id(collection_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Collection {collection_id} not found")))
    }

    /// The acting user must be the assigned transporter. An unassigned
    /// collection requires assignment first.
    fn check_acting_transporter(
        &self,
        ctx: &RequestContext,
        collection: &Collection,
    ) -> Result<(), AppError> {
        match collection.transporter_id {
            None => Err(AppError::authorization(format!(
                "Collection {} has no assigned transporter; assign one first",
                collection.reference
            ))),
            Some(assigned) if assigned != ctx.user_id => Err(AppError::authorization(format!(
                "Only the assigned transporter may act on collection {}",
                collection.reference
            ))),
            Some(_) => Ok(()),
        }
    }

    async fn check_transporter(&self, transporter_id: Uuid) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(transporter_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {transporter_id} not found")))?;

        if user.role != UserRole::Transporteur {
            return Err(AppError::validation(format!(
                "User '{}' is not a transporter",
                user.username
            )));
        }
        Ok(())
    }
}

/// A delivery confirmation always carries handover notes, whatever else
/// is set.
fn validate_delivery(input: &ConfirmDeliveryInput) -> Result<(), AppError> {
    if input.notes.trim().is_empty() {
        return Err(AppError::validation("Delivery notes are required"));
    }
    Ok(())
}

/// Builds the waste-item batch a delivery confirmation produces: one base
/// item for the declared waste plus one per on-site discovery.
fn delivery_items(
    request: &CollectionRequest,
    collection_id: Uuid,
    actual_quantity_kg: Option<f64>,
    extra_items: &[ExtraItemInput],
) -> Vec<CreateWasteItem> {
    let base_quantity = actual_quantity_kg
        .or_else(|| request.quantity.map(|q| q.midpoint_kg()))
        .unwrap_or(DEFAULT_ITEM_KG);

    let mut items = vec![CreateWasteItem {
        collection_id,
        waste_type: request.waste_type,
        category: None,
        description: Some(request.description.clone()),
        quantity_kg: base_quantity,
        supplementary: false,
    }];

    for extra in extra_items {
        items.push(CreateWasteItem {
            collection_id,
            waste_type: extra.waste_type,
            category: extra.category.clone(),
            description: extra.description.clone(),
            quantity_kg: extra.quantity_kg,
            supplementary: true,
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ecotrace_entity::request::{
        CollectionMode, QuantityBucket, RequestStatus, TimeSlot,
    };

    fn request(quantity: Option<QuantityBucket>) -> CollectionRequest {
        CollectionRequest {
            id: Uuid::new_v4(),
            reference: "COL-2026-010".to_string(),
            requester_id: Uuid::new_v4(),
            waste_type: WasteType::Electromenager,
            description: "Lave-linge hors service".to_string(),
            quantity,
            mode: CollectionMode::Domicile,
            desired_date: Utc::now().date_naive(),
            time_slot: TimeSlot::Flexible,
            address: "4 place du Marche".to_string(),
            phone: "0611223344".to_string(),
            special_instructions: None,
            photo_urls: vec![],
            status: RequestStatus::Planifiee,
            priority: None,
            rejection_motive: None,
            admin_notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            decided_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_base_item_uses_measured_quantity() {
        let items = delivery_items(&request(Some(QuantityBucket::Kg1To5)), Uuid::new_v4(), Some(12.0), &[]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity_kg, 12.0);
        assert!(!items[0].supplementary);
    }

    #[test]
    fn test_base_item_falls_back_to_bucket_midpoint() {
        let items = delivery_items(&request(Some(QuantityBucket::Kg10To20)), Uuid::new_v4(), None, &[]);
        assert_eq!(items[0].quantity_kg, 15.0);
    }

    #[test]
    fn test_delivery_requires_notes_regardless_of_other_fields() {
        let input = ConfirmDeliveryInput {
            notes: "  ".to_string(),
            actual_quantity_kg: Some(9.0),
            extra_items: vec![ExtraItemInput {
                waste_type: WasteType::Autres,
                category: None,
                description: None,
                quantity_kg: 1.0,
            }],
        };
        let err = validate_delivery(&input).unwrap_err();
        assert_eq!(err.kind, ecotrace_core::error::ErrorKind::Validation);

        let input = ConfirmDeliveryInput {
            notes: "remis au technicien".to_string(),
            actual_quantity_kg: None,
            extra_items: vec![],
        };
        assert!(validate_delivery(&input).is_ok());
    }

    #[test]
    fn test_extras_are_flagged_supplementary() {
        let extras = vec![ExtraItemInput {
            waste_type: WasteType::Composants,
            category: Some("cartes meres".to_string()),
            description: None,
            quantity_kg: 2.5,
        }];
        let items = delivery_items(&request(None), Uuid::new_v4(), None, &extras);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity_kg, DEFAULT_ITEM_KG);
        assert!(items[1].supplementary);
        assert_eq!(items[1].quantity_kg, 2.5);
    }
}
