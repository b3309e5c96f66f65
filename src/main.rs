//! EcoTrace Server — role-based waste-collection management platform.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use ecotrace_core::config::AppConfig;
use ecotrace_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("ECOTRACE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting EcoTrace v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = ecotrace_database::connection::DatabasePool::connect(&config.database).await?;
    ecotrace_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // ── Step 2: Repositories ─────────────────────────────────────
    let user_repo = Arc::new(ecotrace_database::repositories::user::UserRepository::new(
        db_pool.clone(),
    ));
    let session_repo = Arc::new(
        ecotrace_database::repositories::session::SessionRepository::new(db_pool.clone()),
    );
    let request_repo = Arc::new(
        ecotrace_database::repositories::request::RequestRepository::new(db_pool.clone()),
    );
    let collection_repo = Arc::new(
        ecotrace_database::repositories::collection::CollectionRepository::new(db_pool.clone()),
    );
    let waste_repo = Arc::new(ecotrace_database::repositories::waste::WasteRepository::new(
        db_pool.clone(),
    ));
    let notification_repo = Arc::new(
        ecotrace_database::repositories::notification::NotificationRepository::new(db_pool.clone()),
    );

    // ── Step 3: Auth ─────────────────────────────────────────────
    let password_hasher = Arc::new(ecotrace_auth::password::PasswordHasher::new());
    let password_validator = Arc::new(ecotrace_auth::password::PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(ecotrace_auth::jwt::JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(ecotrace_auth::jwt::JwtDecoder::new(&config.auth));
    let session_manager = Arc::new(ecotrace_auth::session::SessionManager::new(
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
        Arc::clone(&session_repo),
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        config.auth.clone(),
        config.session.clone(),
    ));

    // ── Step 4: Services ─────────────────────────────────────────
    let notifier = Arc::new(ecotrace_service::notification::Notifier::new(
        Arc::clone(&notification_repo),
        &config.notify,
    ));
    let request_service = Arc::new(ecotrace_service::request::RequestService::new(
        Arc::clone(&request_repo),
        Arc::clone(&notifier),
    ));
    let collection_service = Arc::new(ecotrace_service::collection::CollectionService::new(
        Arc::clone(&collection_repo),
        Arc::clone(&request_repo),
        Arc::clone(&waste_repo),
        Arc::clone(&user_repo),
        Arc::clone(&notifier),
    ));
    let waste_service = Arc::new(ecotrace_service::waste::WasteService::new(
        Arc::clone(&waste_repo),
        Arc::clone(&collection_repo),
        Arc::clone(&notifier),
    ));
    let notification_service = Arc::new(ecotrace_service::notification::NotificationService::new(
        Arc::clone(&notification_repo),
        &config.notify,
    ));
    let user_service = Arc::new(ecotrace_service::user::UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
    ));
    let dashboard_service = Arc::new(ecotrace_service::report::DashboardService::new(
        Arc::clone(&request_repo),
        Arc::clone(&collection_repo),
        Arc::clone(&waste_repo),
    ));

    tracing::info!("Services initialized");

    // ── Step 5: Maintenance scheduler ────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let scheduler = ecotrace_worker::MaintenanceScheduler::new(
            Arc::clone(&notification_repo),
            Arc::clone(&session_repo),
            config.worker.clone(),
            config.notify.clone(),
        )
        .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Maintenance scheduler disabled");
        None
    };

    // ── Step 6: HTTP server ──────────────────────────────────────
    let app_state = ecotrace_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        jwt_encoder,
        jwt_decoder,
        password_hasher,
        password_validator,
        session_manager,
        user_repo,
        session_repo,
        request_repo,
        collection_repo,
        waste_repo,
        notification_repo,
        notifier,
        request_service,
        collection_service,
        waste_service,
        notification_service,
        user_service,
        dashboard_service,
    };

    let app = ecotrace_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("EcoTrace server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 7: Graceful shutdown ────────────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        let _ = scheduler.shutdown().await;
    }

    tracing::info!("EcoTrace server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
