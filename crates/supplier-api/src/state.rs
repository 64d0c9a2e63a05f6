use std::sync::Arc;

use supplier_core::repositories::{SupplierRepository, UserRepository};
use supplier_core::services::{AuthorizationPolicies, IdentityService, SupplierService};

/// Shared handler state; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub suppliers: Arc<SupplierService<dyn SupplierRepository>>,
    pub identity: Arc<IdentityService<dyn UserRepository>>,
    pub policies: Arc<AuthorizationPolicies>,
}

impl AppState {
    pub fn new(
        suppliers: SupplierService<dyn SupplierRepository>,
        identity: IdentityService<dyn UserRepository>,
        policies: AuthorizationPolicies,
    ) -> Self {
        Self {
            suppliers: Arc::new(suppliers),
            identity: Arc::new(identity),
            policies: Arc::new(policies),
        }
    }
}
