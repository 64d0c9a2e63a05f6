use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use supplier_core::domain::Supplier;
use supplier_core::error::DomainError;
use supplier_core::repositories::SupplierRepository;

#[derive(Default)]
pub struct InMemorySupplierRepository {
    suppliers: DashMap<Uuid, Supplier>,
}

impl InMemorySupplierRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SupplierRepository for InMemorySupplierRepository {
    async fn list(&self) -> Result<Vec<Supplier>, DomainError> {
        let mut suppliers: Vec<Supplier> = self.suppliers.iter().map(|e| e.value().clone()).collect();
        suppliers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(suppliers)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Supplier>, DomainError> {
        Ok(self.suppliers.get(id).map(|e| e.value().clone()))
    }

    async fn insert(&self, supplier: &Supplier) -> Result<u64, DomainError> {
        match self.suppliers.entry(supplier.id) {
            Entry::Occupied(_) => Err(DomainError::SupplierAlreadyExists(supplier.id)),
            Entry::Vacant(slot) => {
                slot.insert(supplier.clone());
                Ok(1)
            }
        }
    }

    async fn update(&self, supplier: &Supplier) -> Result<u64, DomainError> {
        match self.suppliers.get_mut(&supplier.id) {
            Some(mut existing) => {
                *existing = supplier.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, DomainError> {
        Ok(self.suppliers.remove(id).map_or(0, |_| 1))
    }
}
