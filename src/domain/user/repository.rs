use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

/// Filters for listing users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring of username or email
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |s| {
            let s = s.to_lowercase();
            user.username.to_lowercase().contains(&s) || user.email.to_lowercase().contains(&s)
        });
        search_ok && self.is_active.map_or(true, |a| user.is_active == a)
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user (password already hashed). Username and email are unique.
    async fn create_user(&self, user: User) -> DomainResult<User>;

    async fn list_users(
        &self,
        filter: UserFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<User>>;
    async fn get_user_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_users_by_ids(&self, ids: &[i32]) -> DomainResult<Vec<User>>;

    async fn update_user(&self, user: User) -> DomainResult<()>;

    /// Delete a user together with their listings, bookings and reviews.
    async fn delete_user(&self, id: i32) -> DomainResult<()>;
}
