// ============================================================================
// Supplier Core - Identity User Entity
// File: crates/supplier-core/src/domain/identity_user.rs
// Description: Credential record with lockout bookkeeping, and token responses
// ============================================================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use supplier_shared::{utils::normalize_email, ClaimPair};
use uuid::Uuid;

/// Registered user credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: Uuid,
    pub email: String,
    pub normalized_email: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub lockout_enabled: bool,
    pub lockout_end: Option<DateTime<Utc>>,
    pub access_failed_count: i32,
    pub created_at: DateTime<Utc>,
}

impl IdentityUser {
    pub fn new(email: &str, password_hash: String, lockout_enabled: bool) -> Self {
        let email = email.trim().to_string();
        Self {
            id: Uuid::new_v4(),
            normalized_email: normalize_email(&email),
            email,
            password_hash,
            email_confirmed: true,
            lockout_enabled,
            lockout_end: None,
            access_failed_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_enabled && self.lockout_end.is_some_and(|end| end > now)
    }

    /// Counts a failed password check. Returns `true` when this failure locks
    /// the account; the counter restarts from zero once the lockout is set.
    pub fn record_failed_access(
        &mut self,
        now: DateTime<Utc>,
        max_failed_attempts: u32,
        lockout: Duration,
    ) -> bool {
        if !self.lockout_enabled {
            return false;
        }
        self.access_failed_count += 1;
        if self.access_failed_count >= i32::try_from(max_failed_attempts).unwrap_or(i32::MAX) {
            self.lockout_end = Some(now + lockout);
            self.access_failed_count = 0;
            return true;
        }
        false
    }

    /// Clears the failure counter after a successful sign-in.
    /// Returns `true` if anything changed and needs persisting.
    pub fn reset_access_failed(&mut self) -> bool {
        if self.access_failed_count == 0 && self.lockout_end.is_none() {
            return false;
        }
        self.access_failed_count = 0;
        self.lockout_end = None;
        true
    }
}

/// A single reason registration was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFailure {
    pub code: String,
    pub description: String,
}

impl IdentityFailure {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::new("DuplicateEmail", format!("Email '{}' is already taken.", email))
    }
}

/// Token payload returned by register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user_token: UserToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    pub id: Uuid,
    pub email: String,
    pub claims: Vec<ClaimPair>,
}
