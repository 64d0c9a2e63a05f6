//! # Supplier Security
//! 
//! Security utilities: JWT issuance/verification, password hashing and policy.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtError, JwtService, TokenSubject};
pub use password::{PasswordError, PasswordPolicy, PasswordService, PasswordViolation};
