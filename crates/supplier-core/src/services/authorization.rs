//! Named claim-based authorization policies

use std::collections::HashMap;
use supplier_security::Claims;
use supplier_shared::config::AuthorizationSettings;
use tracing::{error, warn};

use crate::error::DomainError;

/// Policy name → claim types the caller must carry.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicies {
    policies: HashMap<String, Vec<String>>,
}

impl AuthorizationPolicies {
    pub fn from_settings(settings: &AuthorizationSettings) -> Self {
        let policies = settings
            .policies
            .iter()
            .map(|p| (p.name.clone(), p.required_claims.clone()))
            .collect();
        Self { policies }
    }

    pub fn contains(&self, policy: &str) -> bool {
        self.policies.contains_key(policy)
    }

    /// Succeeds when `claims` carries every claim type the policy requires.
    /// Claim values are not inspected.
    pub fn authorize(&self, claims: &Claims, policy: &str) -> Result<(), DomainError> {
        let required = self.policies.get(policy).ok_or_else(|| {
            error!("Authorization policy not configured: {}", policy);
            DomainError::InternalError(format!("unknown authorization policy '{}'", policy))
        })?;

        if let Some(missing) = required.iter().find(|c| !claims.has_claim(c)) {
            warn!("Policy {} denied for {}: missing claim {}", policy, claims.sub, missing);
            return Err(DomainError::Forbidden(policy.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use supplier_shared::config::PolicySettings;
    use supplier_shared::constants::{DELETE_SUPPLIER_CLAIM, DELETE_SUPPLIER_POLICY};

    fn claims_with(extra: Map<String, Value>) -> Claims {
        Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "buyer@example.com".to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: 0,
            nbf: 0,
            exp: 0,
            iss: "supplier-registry".to_string(),
            aud: "https://localhost".to_string(),
            role: vec![],
            extra,
        }
    }

    #[test]
    fn test_default_delete_policy() {
        let policies = AuthorizationPolicies::from_settings(&AuthorizationSettings::default());
        assert!(policies.contains(DELETE_SUPPLIER_POLICY));

        let mut extra = Map::new();
        extra.insert(DELETE_SUPPLIER_CLAIM.to_string(), json!("false"));
        assert!(policies.authorize(&claims_with(extra), DELETE_SUPPLIER_POLICY).is_ok());
    }

    #[test]
    fn test_missing_claim_is_forbidden() {
        let policies = AuthorizationPolicies::from_settings(&AuthorizationSettings::default());
        assert!(matches!(
            policies.authorize(&claims_with(Map::new()), DELETE_SUPPLIER_POLICY),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn test_every_required_claim_must_be_present() {
        let settings = AuthorizationSettings {
            policies: vec![PolicySettings {
                name: "Audit".to_string(),
                required_claims: vec!["Auditor".to_string(), "Region".to_string()],
            }],
        };
        let policies = AuthorizationPolicies::from_settings(&settings);

        let mut extra = Map::new();
        extra.insert("Auditor".to_string(), json!("yes"));
        assert!(policies.authorize(&claims_with(extra.clone()), "Audit").is_err());

        extra.insert("Region".to_string(), json!(["EU", "US"]));
        assert!(policies.authorize(&claims_with(extra), "Audit").is_ok());
    }

    #[test]
    fn test_unknown_policy_is_internal_error() {
        let policies = AuthorizationPolicies::default();
        assert!(matches!(
            policies.authorize(&claims_with(Map::new()), "Nope"),
            Err(DomainError::InternalError(_))
        ));
    }
}
