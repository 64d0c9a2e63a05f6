//! Supplier repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Supplier;
use crate::error::DomainError;

/// Row-level store for supplier records. Mutations report rows affected so
/// callers can tell a no-op write from a successful one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Supplier>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Supplier>, DomainError>;
    async fn insert(&self, supplier: &Supplier) -> Result<u64, DomainError>;
    async fn update(&self, supplier: &Supplier) -> Result<u64, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<u64, DomainError>;
}
