//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use ecotrace_entity::request::{
    CollectionMode, QuantityBucket, RequestPriority, TimeSlot, WasteType,
};
use ecotrace_entity::waste::{ValorizationOutcome, WasteItemStatus};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// Self-registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Email.
    #[validate(email)]
    pub email: Option<String>,
    /// Password.
    #[validate(length(min = 8))]
    pub password: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Company name (ENTREPRISE only).
    pub company_name: Option<String>,
    /// Company SIRET (ENTREPRISE only).
    #[validate(length(equal = 14))]
    pub company_siret: Option<String>,
    /// Requested role.
    pub role: ecotrace_entity::user::UserRole,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1))]
    pub current_password: String,
    /// New password.
    #[validate(length(min = 8))]
    pub new_password: String,
}

/// Update profile request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// Display name.
    pub display_name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// New collection-request submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRequestRequest {
    /// Declared waste type.
    pub waste_type: WasteType,
    /// Free-text description of the waste.
    #[validate(length(min = 1, message = "A description is required"))]
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
    #[validate(length(min = 1, message = "An address is required"))]
    pub address: String,
    /// Contact phone.
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
    /// Special instructions.
    pub special_instructions: Option<String>,
    /// Photo URL references.
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// Approval decision body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequestRequest {
    /// Priority assigned by the reviewer.
    pub priority: Option<RequestPriority>,
    /// Reviewer notes.
    pub notes: Option<String>,
}

/// Rejection decision body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectRequestRequest {
    /// Mandatory rejection motive.
    #[validate(length(min = 1, message = "A rejection motive is required"))]
    pub motive: String,
    /// Reviewer notes.
    pub notes: Option<String>,
}

/// Schedule a collection from an approved request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCollectionRequest {
    /// The approved request to plan.
    pub request_id: Uuid,
    /// Pickup date.
    pub date: NaiveDate,
    /// Optional transporter (assignment may be deferred).
    pub transporter_id: Option<Uuid>,
    /// Instructions for the crew.
    pub instructions: Option<String>,
}

/// Transporter assignment body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTransporterRequest {
    /// The transporter to assign.
    pub transporter_id: Uuid,
}

/// Receipt confirmation body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmReceptionRequest {
    /// Optional pickup notes.
    pub notes: Option<String>,
}

/// One extra waste item discovered on-site.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExtraItemRequest {
    /// Waste type of the discovered item.
    pub waste_type: WasteType,
    /// Category refinement.
    pub category: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Measured quantity in kilograms.
    #[validate(range(min = 0.0))]
    pub quantity_kg: f64,
}

/// Delivery confirmation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmDeliveryRequest {
    /// Mandatory handover notes.
    #[validate(length(min = 1, message = "Delivery notes are required"))]
    pub notes: String,
    /// Measured quantity of the declared waste.
    #[validate(range(min = 0.0))]
    pub actual_quantity_kg: Option<f64>,
    /// Extra items discovered on-site.
    #[serde(default)]
    #[validate(nested)]
    pub extra_items: Vec<ExtraItemRequest>,
}

/// Cancellation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelCollectionRequest {
    /// Mandatory cancellation motive.
    #[validate(length(min = 1, message = "A cancellation motive is required"))]
    pub motive: String,
}

/// Valorization finalization body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FinalizeValorizationRequest {
    /// Outcome decision; its absence is rejected by the service.
    pub outcome: Option<ValorizationOutcome>,
    /// Quantity actually valorized in kilograms.
    #[validate(range(min = 0.0))]
    pub quantity_valorized_kg: Option<f64>,
    /// Yield percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub yield_pct: Option<f64>,
    /// Technician notes.
    pub notes: Option<String>,
}

/// Query parameters for the notification listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListParams {
    /// Only return unread notifications.
    #[serde(default)]
    pub unread_only: bool,
}

/// Query parameters for the waste-item listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WasteListParams {
    /// Processing state to filter on (technician bench views).
    pub status: Option<WasteItemStatus>,
}

/// Query parameters for the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListParams {
    /// Role to filter on (e.g. the transporter pick-list).
    pub role: Option<ecotrace_entity::user::UserRole>,
}
