//! PostgreSQL repository implementations

pub mod supplier_repo_impl;
pub mod user_repo_impl;

pub use supplier_repo_impl::PgSupplierRepository;
pub use user_repo_impl::PgUserRepository;
