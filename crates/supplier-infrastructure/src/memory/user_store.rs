use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use supplier_core::domain::IdentityUser;
use supplier_core::error::DomainError;
use supplier_core::repositories::UserRepository;
use supplier_shared::ClaimPair;

/// Users keyed by normalized email; claims and roles keyed by user id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, IdentityUser>,
    claims: DashMap<Uuid, Vec<ClaimPair>>,
    roles: DashMap<Uuid, Vec<String>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_user(&self, user_id: &Uuid) -> Result<(), DomainError> {
        if self.users.iter().any(|e| e.value().id == *user_id) {
            Ok(())
        } else {
            Err(DomainError::UserNotFound(user_id.to_string()))
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_normalized_email(&self, normalized_email: &str) -> Result<Option<IdentityUser>, DomainError> {
        Ok(self.users.get(normalized_email).map(|e| e.value().clone()))
    }

    async fn create(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError> {
        match self.users.entry(user.normalized_email.clone()) {
            Entry::Occupied(_) => Err(DomainError::EmailAlreadyExists(user.email.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user.clone())
            }
        }
    }

    async fn update_lockout(&self, user: &IdentityUser) -> Result<(), DomainError> {
        let mut stored = self
            .users
            .get_mut(&user.normalized_email)
            .ok_or_else(|| DomainError::UserNotFound(user.id.to_string()))?;
        stored.lockout_end = user.lockout_end;
        stored.access_failed_count = user.access_failed_count;
        Ok(())
    }

    async fn claims(&self, user_id: &Uuid) -> Result<Vec<ClaimPair>, DomainError> {
        Ok(self.claims.get(user_id).map(|e| e.value().clone()).unwrap_or_default())
    }

    async fn roles(&self, user_id: &Uuid) -> Result<Vec<String>, DomainError> {
        let mut roles = self.roles.get(user_id).map(|e| e.value().clone()).unwrap_or_default();
        roles.sort();
        Ok(roles)
    }

    async fn add_claim(&self, user_id: &Uuid, claim: &ClaimPair) -> Result<(), DomainError> {
        self.ensure_user(user_id)?;
        self.claims.entry(*user_id).or_default().push(claim.clone());
        Ok(())
    }

    async fn add_role(&self, user_id: &Uuid, role: &str) -> Result<(), DomainError> {
        self.ensure_user(user_id)?;
        let mut roles = self.roles.entry(*user_id).or_default();
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
        Ok(())
    }
}
