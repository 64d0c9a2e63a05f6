//! # Supplier API
//! 
//! HTTP handlers, auth extractors, error mapping, and the router.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
