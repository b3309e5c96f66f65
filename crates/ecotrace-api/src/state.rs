//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use ecotrace_auth::jwt::{JwtDecoder, JwtEncoder};
use ecotrace_auth::password::{PasswordHasher, PasswordValidator};
use ecotrace_auth::session::SessionManager;
use ecotrace_core::config::AppConfig;

use ecotrace_database::repositories::collection::CollectionRepository;
use ecotrace_database::repositories::notification::NotificationRepository;
use ecotrace_database::repositories::request::RequestRepository;
use ecotrace_database::repositories::session::SessionRepository;
use ecotrace_database::repositories::user::UserRepository;
use ecotrace_database::repositories::waste::WasteRepository;

use ecotrace_service::collection::CollectionService;
use ecotrace_service::notification::{NotificationService, Notifier};
use ecotrace_service::report::DashboardService;
use ecotrace_service::request::RequestService;
use ecotrace_service::user::UserService;
use ecotrace_service::waste::WasteService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Password policy validator
    pub password_validator: Arc<PasswordValidator>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Session repository
    pub session_repo: Arc<SessionRepository>,
    /// Request repository
    pub request_repo: Arc<RequestRepository>,
    /// Collection repository
    pub collection_repo: Arc<CollectionRepository>,
    /// Waste repository
    pub waste_repo: Arc<WasteRepository>,
    /// Notification repository
    pub notification_repo: Arc<NotificationRepository>,

    // ── Services ─────────────────────────────────────────────
    /// Notification fan-out
    pub notifier: Arc<Notifier>,
    /// Request intake + approval gate
    pub request_service: Arc<RequestService>,
    /// Scheduler + transport handshake
    pub collection_service: Arc<CollectionService>,
    /// Valorization
    pub waste_service: Arc<WasteService>,
    /// Notification CRUD
    pub notification_service: Arc<NotificationService>,
    /// Registration, profile, directory
    pub user_service: Arc<UserService>,
    /// Per-role dashboard counters
    pub dashboard_service: Arc<DashboardService>,
}
