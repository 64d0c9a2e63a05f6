// ============================================================================
// Supplier Core - Supplier Service
// File: crates/supplier-core/src/services/supplier_service.rs
// ============================================================================
//! Supplier CRUD: validation in front of the record store

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Supplier, SupplierDraft};
use crate::error::DomainError;
use crate::repositories::SupplierRepository;
use crate::validation::validate_supplier;

const SAVE_FAILED: &str = "There was a problem saving the record";

pub struct SupplierService<R: SupplierRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SupplierRepository + ?Sized> SupplierService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Supplier>, DomainError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Supplier, DomainError> {
        self.repo
            .find_by_id(&id)
            .await?
            .ok_or(DomainError::SupplierNotFound(id))
    }

    /// Validate, then insert under the caller's id or a generated one.
    pub async fn create(&self, draft: SupplierDraft) -> Result<Supplier, DomainError> {
        if let Err(errors) = validate_supplier(&draft) {
            warn!("Supplier create rejected: {}", errors);
            return Err(errors.into());
        }

        let id = draft.resolve_id();
        let supplier = draft.into_supplier(id);

        let rows = self.repo.insert(&supplier).await?;
        if rows == 0 {
            warn!("Supplier insert affected no rows: {}", id);
            return Err(DomainError::PersistenceFailed(SAVE_FAILED.to_string()));
        }

        info!("Supplier created: {}", id);
        Ok(supplier)
    }

    /// Overwrite every field of an existing supplier.
    ///
    /// Existence is checked with a plain read before the write; a concurrent
    /// delete between the two is reported as a persistence failure.
    pub async fn update(&self, id: Uuid, draft: SupplierDraft) -> Result<Supplier, DomainError> {
        if self.repo.find_by_id(&id).await?.is_none() {
            warn!("Supplier update for unknown id: {}", id);
            return Err(DomainError::SupplierNotFound(id));
        }

        let mut errors = validate_supplier(&draft).err().unwrap_or_default();
        if let Some(body_id) = draft.id {
            if !body_id.is_nil() && body_id != id {
                errors.add("id", "The id in the body does not match the id in the route.");
            }
        }
        if !errors.is_empty() {
            warn!("Supplier update rejected for {}: {}", id, errors);
            return Err(DomainError::Validation(errors));
        }

        let supplier = draft.into_supplier(id);
        let rows = self.repo.update(&supplier).await?;
        if rows == 0 {
            warn!("Supplier update affected no rows: {}", id);
            return Err(DomainError::PersistenceFailed(SAVE_FAILED.to_string()));
        }

        info!("Supplier updated: {}", id);
        Ok(supplier)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if self.repo.find_by_id(&id).await?.is_none() {
            warn!("Supplier delete for unknown id: {}", id);
            return Err(DomainError::SupplierNotFound(id));
        }

        let rows = self.repo.delete(&id).await?;
        if rows == 0 {
            warn!("Supplier delete affected no rows: {}", id);
            return Err(DomainError::PersistenceFailed(SAVE_FAILED.to_string()));
        }

        info!("Supplier deleted: {}", id);
        Ok(())
    }
}
