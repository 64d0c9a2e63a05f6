//! JWT token handling

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use supplier_shared::{config::JwtSettings, ClaimPair};
use thiserror::Error;
use uuid::Uuid;

/// Claim names owned by the token itself; user claims may not shadow them.
const REGISTERED_CLAIMS: &[&str] = &["sub", "email", "jti", "iat", "nbf", "exp", "iss", "aud", "role"];

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,
    /// User claims, one entry per claim type. Repeated types are stored as arrays.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    pub fn has_claim(&self, claim_type: &str) -> bool {
        !self.claim_values(claim_type).is_empty()
    }

    pub fn claim_values(&self, claim_type: &str) -> Vec<String> {
        if claim_type == "role" {
            return self.role.clone();
        }
        match self.extra.get(claim_type) {
            Some(Value::String(v)) => vec![v.clone()],
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(other) => vec![other.to_string()],
            None => Vec::new(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.iter().any(|r| r == role)
    }
}

/// Identity data a token is issued for.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub email: &'a str,
    pub roles: &'a [String],
    pub claims: &'a [ClaimPair],
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub claims: Claims,
}

pub struct JwtService {
    secret: String,
    access_token_expiry: i64,
    issuer: String,
    audience: String,
}

impl JwtService {
    pub fn new(secret: String, access_expiry: i64, issuer: String, audience: String) -> Self {
        Self {
            secret,
            access_token_expiry: access_expiry,
            issuer,
            audience,
        }
    }

    pub fn from_settings(settings: &JwtSettings) -> Self {
        Self::new(
            settings.secret.clone(),
            settings.access_token_expiry,
            settings.issuer.clone(),
            settings.audience.clone(),
        )
    }

    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    pub fn generate_access_token(&self, subject: &TokenSubject<'_>) -> Result<IssuedToken, JwtError> {
        self.generate_access_token_at(subject, Utc::now())
    }

    pub fn generate_access_token_at(
        &self,
        subject: &TokenSubject<'_>,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let mut extra = Map::new();
        for claim in subject.claims {
            if REGISTERED_CLAIMS.contains(&claim.claim_type.as_str()) {
                continue;
            }
            let value = Value::String(claim.value.clone());
            match extra.get_mut(&claim.claim_type) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    extra.insert(claim.claim_type.clone(), value);
                }
            }
        }

        let claims = Claims {
            sub: subject.user_id.to_string(),
            email: subject.email.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            role: subject.roles.to_vec(),
            extra,
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.access_token_expiry,
            claims,
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);
        validation.validate_nbf = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::ValidationError(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(
            "test-secret-with-enough-entropy".to_string(),
            3600,
            "supplier-registry".to_string(),
            "https://localhost".to_string(),
        )
    }

    #[test]
    fn test_roundtrip_carries_roles_and_claims() {
        let jwt = service();
        let roles = vec!["Admin".to_string()];
        let claims = vec![
            ClaimPair::new("DeleteSupplier", "true"),
            ClaimPair::new("Region", "north"),
            ClaimPair::new("Region", "south"),
        ];
        let user_id = Uuid::new_v4();
        let issued = jwt
            .generate_access_token(&TokenSubject {
                user_id,
                email: "buyer@example.com",
                roles: &roles,
                claims: &claims,
            })
            .unwrap();

        assert_eq!(issued.expires_in, 3600);

        let decoded = jwt.validate_token(&issued.access_token).unwrap();
        assert_eq!(decoded.user_id(), Some(user_id));
        assert_eq!(decoded.email, "buyer@example.com");
        assert!(decoded.has_role("Admin"));
        assert!(decoded.has_claim("DeleteSupplier"));
        assert_eq!(decoded.claim_values("Region"), vec!["north", "south"]);
        assert!(!decoded.has_claim("Auditor"));
    }

    #[test]
    fn test_user_claims_cannot_shadow_registered_claims() {
        let jwt = service();
        let claims = vec![ClaimPair::new("sub", "someone-else")];
        let user_id = Uuid::new_v4();
        let issued = jwt
            .generate_access_token(&TokenSubject {
                user_id,
                email: "buyer@example.com",
                roles: &[],
                claims: &claims,
            })
            .unwrap();

        let decoded = jwt.validate_token(&issued.access_token).unwrap();
        assert_eq!(decoded.sub, user_id.to_string());
        assert!(decoded.extra.is_empty());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service();
        let issued = jwt
            .generate_access_token_at(
                &TokenSubject {
                    user_id: Uuid::new_v4(),
                    email: "buyer@example.com",
                    roles: &[],
                    claims: &[],
                },
                Utc::now() - Duration::hours(3),
            )
            .unwrap();

        assert!(matches!(
            jwt.validate_token(&issued.access_token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_or_audience_is_rejected() {
        let issued = service()
            .generate_access_token(&TokenSubject {
                user_id: Uuid::new_v4(),
                email: "buyer@example.com",
                roles: &[],
                claims: &[],
            })
            .unwrap();

        let other_secret = JwtService::new(
            "a-different-secret".to_string(),
            3600,
            "supplier-registry".to_string(),
            "https://localhost".to_string(),
        );
        assert!(matches!(
            other_secret.validate_token(&issued.access_token),
            Err(JwtError::ValidationError(_))
        ));

        let other_audience = JwtService::new(
            "test-secret-with-enough-entropy".to_string(),
            3600,
            "supplier-registry".to_string(),
            "https://elsewhere".to_string(),
        );
        assert!(other_audience.validate_token(&issued.access_token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(service().validate_token("not.a.jwt").is_err());
    }
}
