//! User repository trait (port)

use async_trait::async_trait;
use supplier_shared::ClaimPair;
use uuid::Uuid;
use crate::domain::IdentityUser;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_normalized_email(&self, normalized_email: &str) -> Result<Option<IdentityUser>, DomainError>;
    /// Fails with `EmailAlreadyExists` when the normalized email is taken.
    async fn create(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError>;
    /// Persists `access_failed_count` and `lockout_end` only.
    async fn update_lockout(&self, user: &IdentityUser) -> Result<(), DomainError>;
    async fn claims(&self, user_id: &Uuid) -> Result<Vec<ClaimPair>, DomainError>;
    async fn roles(&self, user_id: &Uuid) -> Result<Vec<String>, DomainError>;
    async fn add_claim(&self, user_id: &Uuid, claim: &ClaimPair) -> Result<(), DomainError>;
    async fn add_role(&self, user_id: &Uuid, role: &str) -> Result<(), DomainError>;
}
