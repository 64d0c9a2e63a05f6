//! Domain services (business logic)

pub mod supplier_service;
pub mod identity_service;
pub mod authorization;

pub use supplier_service::SupplierService;
pub use identity_service::IdentityService;
pub use authorization::AuthorizationPolicies;
