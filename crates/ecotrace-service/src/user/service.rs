//! User registration, profile, and directory operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use ecotrace_auth::password::{PasswordHasher, PasswordValidator};
use ecotrace_core::error::AppError;
use ecotrace_core::types::pagination::{PageRequest, PageResponse};
use ecotrace_database::repositories::user::UserRepository;
use ecotrace_entity::user::model::{CreateUser, UpdateUser};
use ecotrace_entity::user::{User, UserRole};

use crate::context::RequestContext;

/// Input for registering a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: Option<String>,
    /// Plaintext password (hashed before storage).
    pub password: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Company name (ENTREPRISE only).
    pub company_name: Option<String>,
    /// Company SIRET (ENTREPRISE only).
    pub company_siret: Option<String>,
    /// Requested role.
    pub role: UserRole,
}

/// Input for updating the current user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    /// New display name.
    pub display_name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New postal address.
    pub address: Option<String>,
}

/// Handles registration, self-service profile operations, and the user
/// directory for admin and logistics roles.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy validator.
    validator: Arc<PasswordValidator>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
        }
    }

    /// Registers a new account.
    ///
    /// Self-registration covers the operational roles; administrator and
    /// logistics accounts are provisioned out of band.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AppError> {
        if input.username.trim().is_empty() {
            return Err(AppError::validation("A username is required"));
        }
        if input.role.can_review_requests() {
            return Err(AppError::authorization(
                "Administrator accounts cannot be self-registered",
            ));
        }
        if input.role == UserRole::Entreprise && input.company_name.is_none() {
            return Err(AppError::validation(
                "Company accounts must provide a company name",
            ));
        }

        self.validator.validate(&input.password)?;
        let password_hash = self.hasher.hash_password(&input.password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                username: input.username.trim().to_string(),
                email: input.email,
                password_hash,
                display_name: input.display_name,
                phone: input.phone,
                address: input.address,
                company_name: input.company_name,
                company_siret: input.company_siret,
                role: input.role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Gets the current user's full profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's profile fields.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        input: UpdateProfileInput,
    ) -> Result<User, AppError> {
        if let Some(email) = &input.email {
            if !email.contains('@') {
                return Err(AppError::validation("Invalid email format"));
            }
        }

        self.user_repo
            .update(&UpdateUser {
                id: ctx.user_id,
                email: input.email,
                display_name: input.display_name,
                phone: input.phone,
                address: input.address,
            })
            .await
    }

    /// Changes the current user's password after verifying the old one.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self.get_profile(ctx).await?;

        let valid = self
            .hasher
            .verify_password(current_password, &user.password_hash)?;
        if !valid {
            return Err(AppError::authentication("Current password is incorrect"));
        }

        self.validator
            .validate_not_same(current_password, new_password)?;
        self.validator.validate(new_password)?;

        let hash = self.hasher.hash_password(new_password)?;
        self.user_repo.update_password(ctx.user_id, &hash).await?;

        info!(user_id = %ctx.user_id, "Password changed");
        Ok(())
    }

    /// Lists users, optionally filtered by role. Admin and logistics only;
    /// the role filter serves the transporter pick-list when scheduling.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        role: Option<UserRole>,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        if !ctx.can_schedule() {
            return Err(AppError::authorization(
                "Only administrators may list users",
            ));
        }

        match role {
            Some(role) => self.user_repo.find_by_role(role, &page).await,
            None => self.user_repo.find_all(&page).await,
        }
    }
}
