//! Session lifecycle manager — login, logout, refresh token flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use ecotrace_core::config::{AuthConfig, SessionConfig};
use ecotrace_core::error::AppError;
use ecotrace_database::repositories::session::SessionRepository;
use ecotrace_database::repositories::user::UserRepository;
use ecotrace_entity::session::{CreateSession, Session};
use ecotrace_entity::user::User;

use crate::jwt::encoder::TokenPair;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// Created session.
    pub session: Session,
    /// The authenticated user.
    pub user: User,
}

/// Manages the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// JWT encoder for token generation.
    jwt_encoder: Arc<JwtEncoder>,
    /// JWT decoder for token validation.
    jwt_decoder: Arc<JwtDecoder>,
    /// Session persistence.
    session_repo: Arc<SessionRepository>,
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// Auth configuration.
    auth_config: AuthConfig,
    /// Session configuration.
    session_config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("auth_config", &self.auth_config)
            .field("session_config", &self.session_config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        session_repo: Arc<SessionRepository>,
        user_repo: Arc<UserRepository>,
        password_hasher: Arc<PasswordHasher>,
        auth_config: AuthConfig,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            jwt_encoder,
            jwt_decoder,
            session_repo,
            user_repo,
            password_hasher,
            auth_config,
            session_config,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Find the user and check the account is active
    /// 2. Verify the password
    /// 3. Create a session row
    /// 4. Generate the JWT token pair
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ip_address: &str,
        user_agent: Option<&str>,
    ) -> Result<LoginResult, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

        if !user.can_login() {
            warn!(user_id = %user.id, "Login attempt on deactivated account");
            return Err(AppError::authentication("Account is deactivated"));
        }

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            return Err(AppError::authentication("Invalid username or password"));
        }

        let expires_at =
            Utc::now() + chrono::Duration::hours(self.session_config.lifetime_hours as i64);

        let session = self
            .session_repo
            .create(&CreateSession {
                user_id: user.id,
                ip_address: ip_address.to_string(),
                user_agent: user_agent.map(String::from),
                expires_at,
            })
            .await?;

        let tokens =
            self.jwt_encoder
                .generate_token_pair(user.id, session.id, user.role, &user.username)?;

        let _ = self.user_repo.update_last_login(user.id).await;

        info!(user_id = %user.id, session_id = %session.id, "Login successful");

        Ok(LoginResult {
            tokens,
            session,
            user,
        })
    }

    /// Revokes the session, invalidating its refresh token.
    pub async fn logout(&self, session_id: Uuid) -> Result<(), AppError> {
        self.session_repo.revoke(session_id).await?;
        info!(session_id = %session_id, "Logout completed");
        Ok(())
    }

    /// Refreshes the token pair using a valid refresh token.
    ///
    /// The session must still be active; a revoked or expired session
    /// rejects the refresh and forces a new login.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.jwt_decoder.decode_refresh_token(refresh_token)?;
        let session_id = claims.session_id();

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::authentication("Session not found"))?;

        if !session.is_active() {
            return Err(AppError::authentication("Session has been terminated"));
        }

        // Reload the user: the role may have changed since issuance.
        let user = self
            .user_repo
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::authentication("User not found"))?;

        if !user.can_login() {
            return Err(AppError::authentication("Account is deactivated"));
        }

        let tokens =
            self.jwt_encoder
                .generate_token_pair(user.id, session_id, user.role, &user.username)?;

        self.session_repo.touch(session_id).await?;

        info!(user_id = %user.id, session_id = %session_id, "Token refreshed");

        Ok(tokens)
    }

    /// Validates that a session referenced by an access token is still live.
    pub async fn validate_session(&self, session_id: Uuid) -> Result<Session, AppError> {
        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::authentication("Session not found"))?;

        if !session.is_active() {
            return Err(AppError::authentication("Session has been terminated"));
        }

        Ok(session)
    }
}
