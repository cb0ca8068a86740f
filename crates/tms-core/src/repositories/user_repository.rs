//! User repository trait (port)

use async_trait::async_trait;

use crate::domain::{Role, User};
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub team_id: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_refresh_token_hash(&self, hash: &str) -> Result<Option<User>, DomainError>;
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;
    async fn record_login(&self, id: i64, refresh_token_hash: &str) -> Result<(), DomainError>;
    async fn clear_refresh_token(&self, id: i64) -> Result<(), DomainError>;
}
