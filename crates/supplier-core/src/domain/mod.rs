//! # Supplier Core - Domain Module
//! 
//! Domain entities for the supplier registry.

pub mod supplier;
pub mod identity_user;
pub mod credentials;

// Re-export all entities
pub use supplier::{Supplier, SupplierDraft};
pub use identity_user::{IdentityFailure, IdentityUser, UserResponse, UserToken};
pub use credentials::{LoginUser, RegisterUser};
