//! Synthetic sample notifications for store outages.
//!
//! Every row produced here carries `synthetic: true` so consumers can tell
//! a usability fallback from real data. The watcher only delivers these
//! when `notify.fallback_enabled` is set.

use chrono::Utc;
use uuid::Uuid;

use ecotrace_entity::notification::{
    Notification, NotificationCategory, NotificationKind, NotificationPriority,
};
use ecotrace_entity::user::UserRole;

/// Builds the role-specific sample set shown while the store is down.
pub fn synthetic_notifications(user_id: Uuid, role: UserRole) -> Vec<Notification> {
    let samples: Vec<(&str, &str, NotificationKind, NotificationCategory)> = match role {
        UserRole::Administrateur => vec![
            (
                "Nouvelle demande en attente",
                "Une nouvelle demande de collecte necessite votre validation",
                NotificationKind::Warning,
                NotificationCategory::Demande,
            ),
            (
                "Rapport mensuel disponible",
                "Le rapport de collectes du mois est pret a etre genere",
                NotificationKind::Info,
                NotificationCategory::System,
            ),
        ],
        UserRole::Transporteur => vec![
            (
                "Nouvelle collecte assignee",
                "Une collecte vous a ete assignee pour demain",
                NotificationKind::Info,
                NotificationCategory::Collecte,
            ),
            (
                "Collecte urgente",
                "Collecte prioritaire a effectuer aujourd'hui",
                NotificationKind::Urgent,
                NotificationCategory::Collecte,
            ),
        ],
        UserRole::Technicien => vec![
            (
                "Nouveaux dechets recus",
                "Des dechets sont arrives et necessitent une valorisation",
                NotificationKind::Info,
                NotificationCategory::Valorisation,
            ),
            (
                "Processus de valorisation en attente",
                "Des processus de valorisation necessitent votre attention",
                NotificationKind::Warning,
                NotificationCategory::Valorisation,
            ),
        ],
        UserRole::Entreprise => vec![
            (
                "Collecte planifiee confirmee",
                "Votre collecte a ete confirmee",
                NotificationKind::Success,
                NotificationCategory::Collecte,
            ),
            (
                "Rappel: collecte a venir",
                "N'oubliez pas votre collecte programmee",
                NotificationKind::Warning,
                NotificationCategory::Collecte,
            ),
        ],
        UserRole::Particulier => vec![
            (
                "Demande de collecte approuvee",
                "Votre demande de collecte a ete approuvee",
                NotificationKind::Success,
                NotificationCategory::Demande,
            ),
            (
                "Collecte programmee",
                "Votre collecte est programmee prochainement",
                NotificationKind::Info,
                NotificationCategory::Collecte,
            ),
        ],
        UserRole::ResponsableLogistique => vec![
            (
                "Nouvelle demande approuvee",
                "Une demande de collecte a ete approuvee et necessite une planification",
                NotificationKind::Info,
                NotificationCategory::Demande,
            ),
            (
                "Collecte urgente a planifier",
                "Une collecte prioritaire doit etre planifiee rapidement",
                NotificationKind::Warning,
                NotificationCategory::Collecte,
            ),
        ],
    };

    samples
        .into_iter()
        .map(|(title, message, kind, category)| Notification {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: message.to_string(),
            kind,
            category,
            priority: NotificationPriority::Normal,
            user_id: Some(user_id),
            target_role: Some(role),
            is_read: false,
            read_at: None,
            action_url: None,
            resource_type: None,
            resource_id: None,
            synthetic: true,
            created_at: Utc::now(),
            expires_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_marked_samples() {
        for role in [
            UserRole::Particulier,
            UserRole::Entreprise,
            UserRole::Transporteur,
            UserRole::Technicien,
            UserRole::Administrateur,
            UserRole::ResponsableLogistique,
        ] {
            let samples = synthetic_notifications(Uuid::new_v4(), role);
            assert!(!samples.is_empty(), "role {role} has no samples");
            assert!(samples.iter().all(|n| n.synthetic));
            assert!(samples.iter().all(|n| !n.is_read));
        }
    }
}
