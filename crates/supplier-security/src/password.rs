//! Password hashing with Argon2, plus the registration password policy

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use supplier_shared::config::PasswordSettings;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordViolation {
    TooShort(usize),
    RequiresDigit,
    RequiresLower,
    RequiresUpper,
    RequiresNonAlphanumeric,
}

impl PasswordViolation {
    pub fn code(&self) -> &'static str {
        match self {
            PasswordViolation::TooShort(_) => "PasswordTooShort",
            PasswordViolation::RequiresDigit => "PasswordRequiresDigit",
            PasswordViolation::RequiresLower => "PasswordRequiresLower",
            PasswordViolation::RequiresUpper => "PasswordRequiresUpper",
            PasswordViolation::RequiresNonAlphanumeric => "PasswordRequiresNonAlphanumeric",
        }
    }

    pub fn description(&self) -> String {
        match self {
            PasswordViolation::TooShort(min) => format!("Passwords must be at least {} characters.", min),
            PasswordViolation::RequiresDigit => "Passwords must have at least one digit ('0'-'9').".to_string(),
            PasswordViolation::RequiresLower => "Passwords must have at least one lowercase ('a'-'z').".to_string(),
            PasswordViolation::RequiresUpper => "Passwords must have at least one uppercase ('A'-'Z').".to_string(),
            PasswordViolation::RequiresNonAlphanumeric => {
                "Passwords must have at least one non alphanumeric character.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    settings: PasswordSettings,
}

impl PasswordPolicy {
    pub fn new(settings: PasswordSettings) -> Self {
        Self { settings }
    }

    /// Every rule the password breaks, in a stable order. Empty means acceptable.
    pub fn check(&self, password: &str) -> Vec<PasswordViolation> {
        let s = &self.settings;
        let mut violations = Vec::new();

        if password.chars().count() < s.required_length {
            violations.push(PasswordViolation::TooShort(s.required_length));
        }
        if s.require_non_alphanumeric && password.chars().all(|c| c.is_alphanumeric()) {
            violations.push(PasswordViolation::RequiresNonAlphanumeric);
        }
        if s.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordViolation::RequiresDigit);
        }
        if s.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            violations.push(PasswordViolation::RequiresLower);
        }
        if s.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push(PasswordViolation::RequiresUpper);
        }

        violations
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(PasswordSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash("Sup9lier!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify("Sup9lier!", &hash).unwrap());
        assert!(!PasswordService::verify("sup9lier!", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            PasswordService::verify("whatever", "plain-text"),
            Err(PasswordError::HashError(_))
        ));
    }

    #[test]
    fn test_default_policy_accepts_strong_password() {
        assert!(PasswordPolicy::default().check("Sup9lier!").is_empty());
    }

    #[test]
    fn test_case_rules_need_ascii_letters() {
        assert_eq!(
            PasswordPolicy::default().check("ÀÉÎ9!àéî"),
            vec![PasswordViolation::RequiresLower, PasswordViolation::RequiresUpper]
        );
    }

    #[test]
    fn test_default_policy_lists_every_violation() {
        let violations = PasswordPolicy::default().check("abc");
        assert_eq!(
            violations,
            vec![
                PasswordViolation::TooShort(6),
                PasswordViolation::RequiresNonAlphanumeric,
                PasswordViolation::RequiresDigit,
                PasswordViolation::RequiresUpper,
            ]
        );
        assert_eq!(violations[0].code(), "PasswordTooShort");
    }

    #[test]
    fn test_relaxed_policy() {
        let policy = PasswordPolicy::new(PasswordSettings {
            required_length: 4,
            require_digit: false,
            require_lowercase: true,
            require_uppercase: false,
            require_non_alphanumeric: false,
        });
        assert!(policy.check("plain").is_empty());
        assert_eq!(policy.check("PLAIN"), vec![PasswordViolation::RequiresLower]);
    }
}
