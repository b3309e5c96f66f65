//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An active user session.
///
/// Sessions are created on login and revoked on logout, expiry, or
/// irrecoverable refresh failure. Refresh rotates the token pair but keeps
/// the session row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// IP address from which the session was created.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the session was revoked (logout or forced).
    pub revoked_at: Option<DateTime<Utc>>,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the session expires (refresh token lifetime).
    pub expires_at: DateTime<Utc>,
    /// Last time the session was seen (request or refresh).
    pub last_seen_at: DateTime<Utc>,
}

impl Session {
    /// Check whether the session is still usable.
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none() && self.expires_at > Utc::now()
    }

    /// Check whether the session has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// IP address of the client.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Absolute expiry time.
    pub expires_at: DateTime<Utc>,
}
