//! User management use-cases
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;

use crate::domain::user::{CreateUserDto, UpdateUserDto, UserFilter};
use crate::domain::{DomainError, DomainResult, RepositoryProvider, User};
use crate::infrastructure::crypto::password::hash_password_with_cost;
use crate::shared::{PaginatedResult, PaginationParams, SharedClock};

pub const MAX_USERNAME_LEN: usize = 150;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration, profile updates and account deletion.
pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
    hash_cost: u32,
}

fn validate_username(username: &str) -> DomainResult<()> {
    let len = username.chars().count();
    if len == 0 || len > MAX_USERNAME_LEN {
        return Err(DomainError::Validation(format!(
            "Username must be 1-{MAX_USERNAME_LEN} characters"
        )));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(DomainError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::Validation("Invalid email address".into())),
    }
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self {
            repos,
            clock,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password_with_cost(password, self.hash_cost)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))
    }

    async fn load(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        validate_username(&dto.username)?;
        validate_email(&dto.email)?;
        validate_password(&dto.password)?;

        let users = self.repos.users();
        if users.get_user_by_username(&dto.username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if users.get_user_by_email(&dto.email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let now = self.clock.now();
        let user = User {
            id: 0,
            username: dto.username,
            email: dto.email,
            first_name: dto.first_name,
            last_name: dto.last_name,
            password_hash: self.hash(&dto.password)?,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let user = users.create_user(user).await?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(
        &self,
        filter: UserFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<User>> {
        self.repos.users().list_users(filter, page).await
    }

    pub async fn get_user(&self, id: i32) -> DomainResult<User> {
        self.load(id).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn update_user(&self, id: i32, dto: UpdateUserDto) -> DomainResult<User> {
        let mut user = self.load(id).await?;

        if let Some(email) = dto.email {
            validate_email(&email)?;
            if let Some(other) = self.repos.users().get_user_by_email(&email).await? {
                if other.id != id {
                    return Err(DomainError::Conflict("Email already exists".into()));
                }
            }
            user.email = email;
        }
        if let Some(first_name) = dto.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name;
        }
        if let Some(password) = dto.password {
            validate_password(&password)?;
            user.password_hash = self.hash(&password)?;
        }
        if let Some(is_active) = dto.is_active {
            user.is_active = is_active;
        }
        user.updated_at = self.clock.now();

        self.repos.users().update_user(user.clone()).await?;
        info!(user_id = id, "User updated");
        Ok(user)
    }

    /// Delete a user with everything they host, booked or reviewed.
    pub async fn delete_user(&self, id: i32) -> DomainResult<()> {
        self.load(id).await?;
        self.repos.users().delete_user(id).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
