//! # Supplier Infrastructure
//! 
//! Storage adapters: PostgreSQL repositories and an in-memory backend.

pub mod database;
pub mod memory;

pub use database::{create_pool, run_migrations, PgSupplierRepository, PgUserRepository};
pub use memory::{InMemorySupplierRepository, InMemoryUserRepository};
