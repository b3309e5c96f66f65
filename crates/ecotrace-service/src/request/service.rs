//! Intake and approval-gate operations for collection requests.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use ecotrace_core::error::AppError;
use ecotrace_core::events::{DomainEvent, EventPayload, RequestEvent};
use ecotrace_core::types::pagination::{PageRequest, PageResponse};
use ecotrace_database::repositories::request::RequestRepository;
use ecotrace_entity::request::model::CreateRequest;
use ecotrace_entity::request::{
    CollectionMode, CollectionRequest, QuantityBucket, RequestPriority, RequestStatus, TimeSlot,
    WasteType,
};
use ecotrace_entity::user::UserRole;

use crate::context::RequestContext;
use crate::notification::Notifier;

/// Input for submitting a new collection request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequestInput {
    /// Declared waste type.
    pub waste_type: WasteType,
    /// Free-text description of the waste.
    pub description: String,
    /// Estimated quantity bucket.
    pub quantity: Option<QuantityBucket>,
    /// Collection mode.
    pub mode: CollectionMode,
    /// Desired pickup date.
    pub desired_date: NaiveDate,
    /// Preferred time slot.
    pub time_slot: TimeSlot,
    /// Pickup address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Special instructions.
    pub special_instructions: Option<String>,
    /// Photo URL references.
    pub photo_urls: Vec<String>,
}

/// Input for approving a pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveInput {
    /// Priority assigned by the reviewer.
    pub priority: Option<RequestPriority>,
    /// Free-text reviewer notes.
    pub notes: Option<String>,
}

/// Input for rejecting a pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectInput {
    /// Mandatory rejection motive.
    pub motive: String,
    /// Free-text reviewer notes.
    pub notes: Option<String>,
}

/// Handles request intake and the approval gate.
#[derive(Debug, Clone)]
pub struct RequestService {
    /// Request repository.
    request_repo: Arc<RequestRepository>,
    /// Notification fan-out.
    notifier: Arc<Notifier>,
}

impl RequestService {
    /// Creates a new request service.
    pub fn new(request_repo: Arc<RequestRepository>, notifier: Arc<Notifier>) -> Self {
        Self {
            request_repo,
            notifier,
        }
    }

    /// Submits a new collection request on behalf of the acting requester.
    ///
    /// Creates the request in `EN_ATTENTE` and notifies the administrator
    /// role that a decision is due.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        input: SubmitRequestInput,
    ) -> Result<CollectionRequest, AppError> {
        if !ctx.role.is_requester() {
            return Err(AppError::authorization(
                "Only individuals and companies submit collection requests",
            ));
        }

        validate_submission(&input)?;

        let request = self
            .request_repo
            .create(&CreateRequest {
                requester_id: ctx.user_id,
                waste_type: input.waste_type,
                description: input.description,
                quantity: input.quantity,
                mode: input.mode,
                desired_date: input.desired_date,
                time_slot: input.time_slot,
                address: input.address,
                phone: input.phone,
                special_instructions: input.special_instructions,
                photo_urls: input.photo_urls,
            })
            .await?;

        info!(request_id = %request.id, reference = %request.reference, "Request submitted");

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Request(RequestEvent::Submitted {
                    request_id: request.id,
                    reference: request.reference.clone(),
                    requester_id: ctx.user_id,
                    requester_name: ctx.username.clone(),
                }),
            ))
            .await?;

        Ok(request)
    }

    /// Approves a pending request, assigning priority and notes.
    ///
    /// Allowed only from `EN_ATTENTE`; notifies the requester and the
    /// logistics role that planning is due.
    pub async fn approve(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        input: ApproveInput,
    ) -> Result<CollectionRequest, AppError> {
        if !ctx.can_review_requests() {
            return Err(AppError::authorization(
                "Only administrators may approve requests",
            ));
        }

        let request = self.load(request_id).await?;
        if !request.status.can_transition(RequestStatus::Approuvee) {
            return Err(AppError::invalid_state(format!(
                "Cannot approve request {} in status {}",
                request.reference, request.status
            )));
        }

        let priority = input.priority.unwrap_or_default();
        let approved = self
            .request_repo
            .approve(request_id, priority, input.notes.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "Request {} was decided concurrently",
                    request.reference
                ))
            })?;

        info!(
            request_id = %approved.id,
            reference = %approved.reference,
            priority = %priority,
            "Request approved"
        );

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Request(RequestEvent::Approved {
                    request_id: approved.id,
                    reference: approved.reference.clone(),
                    requester_id: approved.requester_id,
                    priority: priority.to_string(),
                }),
            ))
            .await?;

        Ok(approved)
    }

    /// Rejects a pending request with a mandatory motive.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
        input: RejectInput,
    ) -> Result<CollectionRequest, AppError> {
        if !ctx.can_review_requests() {
            return Err(AppError::authorization(
                "Only administrators may reject requests",
            ));
        }

        validate_rejection(&input)?;

        let request = self.load(request_id).await?;
        if !request.status.can_transition(RequestStatus::Rejetee) {
            return Err(AppError::invalid_state(format!(
                "Cannot reject request {} in status {}",
                request.reference, request.status
            )));
        }

        let rejected = self
            .request_repo
            .reject(request_id, input.motive.trim(), input.notes.as_deref())
            .await?
            .ok_or_else(|| {
                AppError::invalid_state(format!(
                    "Request {} was decided concurrently",
                    request.reference
                ))
            })?;

        info!(request_id = %rejected.id, reference = %rejected.reference, "Request rejected");

        self.notifier
            .dispatch(&DomainEvent::new(
                Some(ctx.user_id),
                EventPayload::Request(RequestEvent::Rejected {
                    request_id: rejected.id,
                    reference: rejected.reference.clone(),
                    requester_id: rejected.requester_id,
                    motive: input.motive.trim().to_string(),
                }),
            ))
            .await?;

        Ok(rejected)
    }

    /// Gets one request, enforcing per-role visibility.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> Result<CollectionRequest, AppError> {
        let request = self.load(request_id).await?;
        if ctx.role.is_requester() && request.requester_id != ctx.user_id {
            return Err(AppError::not_found("Request not found"));
        }
        Ok(request)
    }

    /// Lists requests visible to the acting role.
    ///
    /// Admins and logistics see everything, transporters see requests that
    /// made it past the gate, requesters see their own.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<CollectionRequest>, AppError> {
        match ctx.role {
            role if role.can_review_requests() => self.request_repo.find_all(&page).await,
            UserRole::Transporteur => {
                self.request_repo
                    .find_by_statuses(
                        &[RequestStatus::Approuvee, RequestStatus::Planifiee],
                        &page,
                    )
                    .await
            }
            _ => self.request_repo.find_by_requester(ctx.user_id, &page).await,
        }
    }

    async fn load(&self, request_id: Uuid) -> Result<CollectionRequest, AppError> {
        self.request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Request {request_id} not found")))
    }
}

/// A rejection always carries a motive, whatever else is set.
fn validate_rejection(input: &RejectInput) -> Result<(), AppError> {
    if input.motive.trim().is_empty() {
        return Err(AppError::validation("A rejection motive is required"));
    }
    Ok(())
}

/// Semantic validation of a submission beyond DTO shape checks.
fn validate_submission(input: &SubmitRequestInput) -> Result<(), AppError> {
    if input.description.trim().is_empty() {
        return Err(AppError::validation("A description is required"));
    }
    if input.address.trim().is_empty() {
        return Err(AppError::validation("A collection address is required"));
    }
    if input.phone.trim().is_empty() {
        return Err(AppError::validation("A contact phone number is required"));
    }
    if input.desired_date < Utc::now().date_naive() {
        return Err(AppError::validation("Desired date cannot be in the past"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecotrace_core::error::ErrorKind;

    fn valid_input() -> SubmitRequestInput {
        SubmitRequestInput {
            waste_type: WasteType::Ordinateur,
            description: "Deux tours et un ecran".to_string(),
            quantity: Some(QuantityBucket::Kg10To20),
            mode: CollectionMode::Domicile,
            desired_date: Utc::now().date_naive() + chrono::Duration::days(1),
            time_slot: TimeSlot::Matin,
            address: "12 rue des Lilas, 75011 Paris".to_string(),
            phone: "0612345678".to_string(),
            special_instructions: None,
            photo_urls: vec![],
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        assert!(validate_submission(&valid_input()).is_ok());
    }

    #[test]
    fn test_past_date_rejected() {
        let mut input = valid_input();
        input.desired_date = Utc::now().date_naive() - chrono::Duration::days(1);
        let err = validate_submission(&input).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_today_is_allowed() {
        let mut input = valid_input();
        input.desired_date = Utc::now().date_naive();
        assert!(validate_submission(&input).is_ok());
    }

    #[test]
    fn test_rejection_requires_a_motive() {
        let missing = RejectInput {
            motive: "   ".to_string(),
            notes: Some("notes alone are not enough".to_string()),
        };
        let err = validate_rejection(&missing).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let given = RejectInput {
            motive: "quantite_inadequate".to_string(),
            notes: None,
        };
        assert!(validate_rejection(&given).is_ok());
    }

    #[test]
    fn test_blank_required_fields_rejected() {
        for field in ["description", "address", "phone"] {
            let mut input = valid_input();
            match field {
                "description" => input.description = "  ".to_string(),
                "address" => input.address = String::new(),
                _ => input.phone = " ".to_string(),
            }
            let err = validate_submission(&input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "field: {field}");
        }
    }
}
