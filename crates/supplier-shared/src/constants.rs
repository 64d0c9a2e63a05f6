//! Application-wide constants

pub const SUPPLIER_NAME_MAX_LENGTH: usize = 200;
pub const SUPPLIER_DOCUMENT_MAX_LENGTH: usize = 14;

pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 7200;
pub const DEFAULT_JWT_ISSUER: &str = "supplier-registry";
pub const DEFAULT_JWT_AUDIENCE: &str = "https://localhost";

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const DEFAULT_MAX_FAILED_ACCESS_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOCKOUT_SECONDS: i64 = 300;

pub const DELETE_SUPPLIER_POLICY: &str = "DeleteSupplier";
pub const DELETE_SUPPLIER_CLAIM: &str = "DeleteSupplier";
