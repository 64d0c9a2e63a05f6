//! In-memory repository implementations
//!
//! Process-local stores for development and tests. Nothing survives a restart.

pub mod supplier_store;
pub mod user_store;

pub use supplier_store::InMemorySupplierRepository;
pub use user_store::InMemoryUserRepository;
