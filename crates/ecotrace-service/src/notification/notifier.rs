//! Event-driven notification fan-out rules.
//!
//! Every workflow transition dispatches one [`DomainEvent`] here; the rule
//! table below decides who hears about it. Rules are a pure function of the
//! event so they can be tested without a database.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use ecotrace_core::config::NotifyConfig;
use ecotrace_core::error::AppError;
use ecotrace_core::events::{CollectionEvent, DomainEvent, EventPayload, RequestEvent, WasteEvent};
use ecotrace_database::repositories::notification::NotificationRepository;
use ecotrace_entity::notification::{
    CreateNotification, Notification, NotificationCategory, NotificationKind, NotificationPriority,
};
use ecotrace_entity::user::UserRole;

/// Persists the notifications each domain event fans out to.
#[derive(Debug, Clone)]
pub struct Notifier {
    /// Notification repository.
    notification_repo: Arc<NotificationRepository>,
    /// Days until a created notification expires.
    expiry_days: i64,
}

impl Notifier {
    /// Creates a new notifier.
    pub fn new(notification_repo: Arc<NotificationRepository>, config: &NotifyConfig) -> Self {
        Self {
            notification_repo,
            expiry_days: config.expiry_days,
        }
    }

    /// Resolves the event's recipients and persists one notification each.
    pub async fn dispatch(&self, event: &DomainEvent) -> Result<Vec<Notification>, AppError> {
        let expires_at = Utc::now() + Duration::days(self.expiry_days);
        let pending = notifications_for(&event.payload, expires_at);

        debug!(
            event_id = %event.id,
            recipients = pending.len(),
            "Dispatching workflow event"
        );

        let mut created = Vec::with_capacity(pending.len());
        for notification in &pending {
            created.push(self.notification_repo.create(notification).await?);
        }
        Ok(created)
    }
}

/// The fan-out rule table: which notifications a given event produces.
pub fn notifications_for(
    payload: &EventPayload,
    expires_at: DateTime<Utc>,
) -> Vec<CreateNotification> {
    match payload {
        EventPayload::Request(event) => request_rules(event, expires_at),
        EventPayload::Collection(event) => collection_rules(event, expires_at),
        EventPayload::Waste(event) => waste_rules(event, expires_at),
    }
}

fn request_rules(event: &RequestEvent, expires_at: DateTime<Utc>) -> Vec<CreateNotification> {
    match event {
        RequestEvent::Submitted {
            request_id,
            reference,
            requester_name,
            ..
        } => vec![
            CreateNotification::for_role(
                UserRole::Administrateur,
                "Nouvelle demande de collecte",
                format!("La demande {reference} a ete soumise par {requester_name}"),
            )
            .category(NotificationCategory::Demande)
            .action_url("/dashboard/administrateur?section=demandes")
            .resource("request", *request_id)
            .expires_at(expires_at),
        ],
        RequestEvent::Approved {
            request_id,
            reference,
            requester_id,
            ..
        } => vec![
            CreateNotification::for_user(
                *requester_id,
                "Demande approuvee",
                format!("Votre demande de collecte {reference} a ete approuvee"),
            )
            .kind(NotificationKind::Success)
            .category(NotificationCategory::Demande)
            .resource("request", *request_id)
            .expires_at(expires_at),
            CreateNotification::for_role(
                UserRole::ResponsableLogistique,
                "Nouvelle demande a planifier",
                format!("La demande {reference} a ete approuvee et doit etre planifiee"),
            )
            .kind(NotificationKind::Warning)
            .category(NotificationCategory::Planification)
            .priority(NotificationPriority::High)
            .action_url("/dashboard/responsable-logistique?section=planification")
            .resource("request", *request_id)
            .expires_at(expires_at),
        ],
        RequestEvent::Rejected {
            request_id,
            reference,
            requester_id,
            motive,
        } => vec![
            CreateNotification::for_user(
                *requester_id,
                "Demande rejetee",
                format!("Votre demande de collecte {reference} a ete rejetee: {motive}"),
            )
            .kind(NotificationKind::Warning)
            .category(NotificationCategory::Demande)
            .resource("request", *request_id)
            .expires_at(expires_at),
        ],
    }
}

fn collection_rules(event: &CollectionEvent, expires_at: DateTime<Utc>) -> Vec<CreateNotification> {
    match event {
        CollectionEvent::Scheduled {
            collection_id,
            reference,
            requester_id,
            transporter_id,
            scheduled_date,
        } => {
            let mut out = vec![
                CreateNotification::for_user(
                    *requester_id,
                    "Collecte planifiee",
                    format!(
                        "Votre collecte {reference} est planifiee pour le {}",
                        scheduled_date.format("%d/%m/%Y")
                    ),
                )
                .kind(NotificationKind::Success)
                .category(NotificationCategory::Planification)
                .resource("collection", *collection_id)
                .expires_at(expires_at),
            ];
            if let Some(transporter_id) = transporter_id {
                out.push(assigned_notification(
                    *collection_id,
                    reference,
                    *transporter_id,
                    scheduled_date,
                    expires_at,
                ));
            }
            out
        }
        CollectionEvent::TransporterAssigned {
            collection_id,
            reference,
            transporter_id,
            scheduled_date,
        } => vec![assigned_notification(
            *collection_id,
            reference,
            *transporter_id,
            scheduled_date,
            expires_at,
        )],
        CollectionEvent::ReceptionConfirmed {
            collection_id,
            reference,
            requester_id,
        } => vec![
            CreateNotification::for_user(
                *requester_id,
                "Collecte en cours",
                format!("Vos dechets de la collecte {reference} ont ete pris en charge"),
            )
            .category(NotificationCategory::Collecte)
            .resource("collection", *collection_id)
            .expires_at(expires_at),
        ],
        CollectionEvent::DeliveryConfirmed {
            collection_id,
            reference,
            requester_id,
            item_count,
        } => vec![
            CreateNotification::for_user(
                *requester_id,
                "Collecte terminee",
                format!("Votre collecte {reference} a ete effectuee avec succes"),
            )
            .kind(NotificationKind::Success)
            .category(NotificationCategory::Collecte)
            .resource("collection", *collection_id)
            .expires_at(expires_at),
            CreateNotification::for_role(
                UserRole::Technicien,
                "Nouveaux dechets a traiter",
                format!(
                    "{item_count} nouveaux dechets de la collecte {reference} necessitent un traitement"
                ),
            )
            .category(NotificationCategory::Valorisation)
            .action_url("/dashboard/technicien?section=dechets")
            .resource("collection", *collection_id)
            .expires_at(expires_at),
        ],
        CollectionEvent::Cancelled {
            collection_id,
            reference,
            requester_id,
            transporter_id,
            motive,
        } => {
            let mut out = vec![
                CreateNotification::for_user(
                    *requester_id,
                    "Collecte annulee",
                    format!("La collecte {reference} a ete annulee: {motive}"),
                )
                .kind(NotificationKind::Warning)
                .category(NotificationCategory::Collecte)
                .resource("collection", *collection_id)
                .expires_at(expires_at),
            ];
            if let Some(transporter_id) = transporter_id {
                out.push(
                    CreateNotification::for_user(
                        *transporter_id,
                        "Collecte annulee",
                        format!("La collecte {reference} qui vous etait assignee a ete annulee"),
                    )
                    .kind(NotificationKind::Warning)
                    .category(NotificationCategory::Collecte)
                    .resource("collection", *collection_id)
                    .expires_at(expires_at),
                );
            }
            out
        }
    }
}

fn waste_rules(event: &WasteEvent, expires_at: DateTime<Utc>) -> Vec<CreateNotification> {
    match event {
        // Starting valorization is technician-internal; nobody is notified.
        WasteEvent::ValorizationStarted { .. } => Vec::new(),
        WasteEvent::ValorizationFinalized {
            item_id,
            requester_id,
            outcome,
            ..
        } => vec![
            CreateNotification::for_user(
                *requester_id,
                "Dechets valorises",
                format!("Un lot de vos dechets a ete traite ({outcome})"),
            )
            .kind(NotificationKind::Success)
            .category(NotificationCategory::Valorisation)
            .resource("waste_item", *item_id)
            .expires_at(expires_at),
        ],
    }
}

fn assigned_notification(
    collection_id: uuid::Uuid,
    reference: &str,
    transporter_id: uuid::Uuid,
    scheduled_date: &chrono::NaiveDate,
    expires_at: DateTime<Utc>,
) -> CreateNotification {
    CreateNotification::for_user(
        transporter_id,
        "Nouvelle collecte assignee",
        format!(
            "La collecte {reference} vous a ete assignee pour le {}",
            scheduled_date.format("%d/%m/%Y")
        ),
    )
    .category(NotificationCategory::Collecte)
    .priority(NotificationPriority::High)
    .action_url("/dashboard/transporteur?section=collectes")
    .resource("collection", collection_id)
    .expires_at(expires_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn expiry() -> DateTime<Utc> {
        Utc::now() + Duration::days(30)
    }

    #[test]
    fn test_submission_notifies_admin_role() {
        let out = notifications_for(
            &EventPayload::Request(RequestEvent::Submitted {
                request_id: Uuid::new_v4(),
                reference: "COL-2026-001".to_string(),
                requester_id: Uuid::new_v4(),
                requester_name: "durand".to_string(),
            }),
            expiry(),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].target_role, Some(UserRole::Administrateur));
        assert!(out[0].user_id.is_none());
        assert!(out[0].message.contains("COL-2026-001"));
    }

    #[test]
    fn test_approval_notifies_requester_and_logistics() {
        let requester_id = Uuid::new_v4();
        let out = notifications_for(
            &EventPayload::Request(RequestEvent::Approved {
                request_id: Uuid::new_v4(),
                reference: "COL-2026-002".to_string(),
                requester_id,
                priority: "haute".to_string(),
            }),
            expiry(),
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].user_id, Some(requester_id));
        assert_eq!(out[1].target_role, Some(UserRole::ResponsableLogistique));
        assert_eq!(out[1].priority, NotificationPriority::High);
    }

    #[test]
    fn test_scheduled_without_transporter_skips_assignment_notice() {
        let out = notifications_for(
            &EventPayload::Collection(CollectionEvent::Scheduled {
                collection_id: Uuid::new_v4(),
                reference: "RDV-2026-001".to_string(),
                requester_id: Uuid::new_v4(),
                transporter_id: None,
                scheduled_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            }),
            expiry(),
        );
        assert_eq!(out.len(), 1);

        let out = notifications_for(
            &EventPayload::Collection(CollectionEvent::Scheduled {
                collection_id: Uuid::new_v4(),
                reference: "RDV-2026-002".to_string(),
                requester_id: Uuid::new_v4(),
                transporter_id: Some(Uuid::new_v4()),
                scheduled_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            }),
            expiry(),
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_delivery_notifies_technician_role_with_count() {
        let out = notifications_for(
            &EventPayload::Collection(CollectionEvent::DeliveryConfirmed {
                collection_id: Uuid::new_v4(),
                reference: "RDV-2026-003".to_string(),
                requester_id: Uuid::new_v4(),
                item_count: 3,
            }),
            expiry(),
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].target_role, Some(UserRole::Technicien));
        assert!(out[1].message.starts_with("3 "));
    }

    #[test]
    fn test_valorization_start_is_silent() {
        let out = notifications_for(
            &EventPayload::Waste(WasteEvent::ValorizationStarted {
                item_id: Uuid::new_v4(),
                technician_id: Uuid::new_v4(),
            }),
            expiry(),
        );
        assert!(out.is_empty());
    }
}
