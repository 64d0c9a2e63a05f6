// ============================================================================
// Supplier Core - Identity Service
// File: crates/supplier-core/src/services/identity_service.rs
// ============================================================================
//! Registration, password sign-in with lockout, and token issuance

use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use supplier_security::{Claims, JwtService, PasswordPolicy, PasswordService, TokenSubject};
use supplier_shared::{config::LockoutSettings, utils::{mask_email, normalize_email}, ClaimPair};
use tracing::{info, warn, error};
use validator::Validate;

use crate::domain::{IdentityFailure, IdentityUser, LoginUser, RegisterUser, UserResponse, UserToken};
use crate::error::DomainError;
use crate::repositories::UserRepository;

/// Identity service: the only component that touches credentials or tokens
pub struct IdentityService<R: UserRepository + ?Sized> {
    user_repo: Arc<R>,
    jwt: JwtService,
    password_policy: PasswordPolicy,
    lockout: LockoutSettings,
}

impl<R: UserRepository + ?Sized> IdentityService<R> {
    pub fn new(
        user_repo: Arc<R>,
        jwt: JwtService,
        password_policy: PasswordPolicy,
        lockout: LockoutSettings,
    ) -> Self {
        Self {
            user_repo,
            jwt,
            password_policy,
            lockout,
        }
    }

    /// Register a new user and sign them in
    pub async fn register(&self, request: &RegisterUser) -> Result<UserResponse, DomainError> {
        request.validate()?;
        let email = request.email.trim();
        info!("Registration attempt for email: {}", mask_email(email));

        // 1. Collect every reason to refuse, like the password policy does
        let mut failures: Vec<IdentityFailure> = Vec::new();
        if self
            .user_repo
            .find_by_normalized_email(&normalize_email(email))
            .await?
            .is_some()
        {
            failures.push(IdentityFailure::duplicate_email(email));
        }
        failures.extend(
            self.password_policy
                .check(&request.password)
                .iter()
                .map(|v| IdentityFailure::new(v.code(), v.description())),
        );
        if !failures.is_empty() {
            warn!("Registration refused for {}: {} failure(s)", mask_email(email), failures.len());
            return Err(DomainError::RegistrationFailed(failures));
        }

        // 2. Hash password
        let password_hash = PasswordService::hash(&request.password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        // 3. Save; a concurrent registration can still win the unique index
        let user = IdentityUser::new(email, password_hash, self.lockout.allowed_for_new_users);
        let created = match self.user_repo.create(&user).await {
            Ok(created) => created,
            Err(DomainError::EmailAlreadyExists(_)) => {
                return Err(DomainError::RegistrationFailed(vec![IdentityFailure::duplicate_email(email)]));
            }
            Err(e) => return Err(e),
        };

        info!("Registration successful for: {}", mask_email(email));
        self.build_user_response(&created).await
    }

    /// Login with email and password
    pub async fn login(&self, request: &LoginUser) -> Result<UserResponse, DomainError> {
        self.login_at(request, Utc::now()).await
    }

    /// Login evaluated at `now`; lockout windows are measured against it.
    pub async fn login_at(&self, request: &LoginUser, now: DateTime<Utc>) -> Result<UserResponse, DomainError> {
        request.validate()?;
        let masked = mask_email(&request.email);
        info!("Login attempt for email: {}", masked);

        // 1. Find user by email
        let mut user = self
            .user_repo
            .find_by_normalized_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(|| {
                warn!("Login failed: email not found: {}", masked);
                DomainError::InvalidCredentials
            })?;

        // 2. Locked accounts are refused before the password is looked at
        if user.is_locked_out(now) {
            warn!("Login failed: user locked out: {}", masked);
            return Err(DomainError::LockedOut);
        }

        // 3. Verify password
        let password_valid = PasswordService::verify(&request.password, &user.password_hash)
            .map_err(|e| {
                error!("Stored password hash unreadable for {}: {}", user.id, e);
                DomainError::PasswordHashError(e.to_string())
            })?;

        if !password_valid {
            let locked = user.record_failed_access(
                now,
                self.lockout.max_failed_access_attempts,
                Duration::seconds(self.lockout.lockout_seconds),
            );
            if user.lockout_enabled {
                self.user_repo.update_lockout(&user).await?;
            }
            if locked {
                warn!("Login failed: user locked out after repeated failures: {}", masked);
                return Err(DomainError::LockedOut);
            }
            warn!("Login failed: invalid password for: {}", masked);
            return Err(DomainError::InvalidCredentials);
        }

        // 4. Clear failure bookkeeping
        if user.reset_access_failed() {
            self.user_repo.update_lockout(&user).await?;
        }

        info!("Login successful for: {}", masked);
        self.build_user_response(&user).await
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.jwt
            .validate_token(token)
            .map_err(|e| DomainError::Unauthorized(e.to_string()))
    }

    pub fn has_claim(claims: &Claims, claim_type: &str) -> bool {
        claims.has_claim(claim_type)
    }

    /// Attach a claim to an existing user (administrative path).
    pub async fn grant_claim(&self, email: &str, claim: ClaimPair) -> Result<(), DomainError> {
        let user = self.find_user(email).await?;
        self.user_repo.add_claim(&user.id, &claim).await?;
        info!("Claim {} granted to {}", claim.claim_type, mask_email(email));
        Ok(())
    }

    /// Attach a role to an existing user (administrative path).
    pub async fn assign_role(&self, email: &str, role: &str) -> Result<(), DomainError> {
        let user = self.find_user(email).await?;
        self.user_repo.add_role(&user.id, role).await?;
        info!("Role {} assigned to {}", role, mask_email(email));
        Ok(())
    }

    async fn find_user(&self, email: &str) -> Result<IdentityUser, DomainError> {
        self.user_repo
            .find_by_normalized_email(&normalize_email(email))
            .await?
            .ok_or_else(|| DomainError::UserNotFound(mask_email(email)))
    }

    async fn build_user_response(&self, user: &IdentityUser) -> Result<UserResponse, DomainError> {
        let claims = self.user_repo.claims(&user.id).await?;
        let roles = self.user_repo.roles(&user.id).await?;

        let issued = self
            .jwt
            .generate_access_token(&TokenSubject {
                user_id: user.id,
                email: &user.email,
                roles: &roles,
                claims: &claims,
            })
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        let mut token_claims = vec![
            ClaimPair::new("sub", issued.claims.sub.clone()),
            ClaimPair::new("email", issued.claims.email.clone()),
            ClaimPair::new("jti", issued.claims.jti.clone()),
            ClaimPair::new("nbf", issued.claims.nbf.to_string()),
            ClaimPair::new("iat", issued.claims.iat.to_string()),
        ];
        token_claims.extend(claims);
        token_claims.extend(roles.into_iter().map(|role| ClaimPair::new("role", role)));

        Ok(UserResponse {
            access_token: issued.access_token,
            expires_in: issued.expires_in,
            user_token: UserToken {
                id: user.id,
                email: user.email.clone(),
                claims: token_claims,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;

    const PASSWORD: &str = "Sup9lier!";

    fn jwt() -> JwtService {
        JwtService::new(
            "identity-test-secret".to_string(),
            3600,
            "supplier-registry".to_string(),
            "https://localhost".to_string(),
        )
    }

    fn service(repo: MockUserRepository) -> IdentityService<MockUserRepository> {
        IdentityService::new(
            Arc::new(repo),
            jwt(),
            PasswordPolicy::default(),
            LockoutSettings::default(),
        )
    }

    fn stored_user() -> IdentityUser {
        IdentityUser::new(
            "buyer@example.com",
            PasswordService::hash(PASSWORD).unwrap(),
            true,
        )
    }

    fn login(password: &str) -> LoginUser {
        LoginUser {
            email: "Buyer@Example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .withf(|email| email == "BUYER@EXAMPLE.COM")
            .returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|u| Ok(u.clone()));
        repo.expect_claims().returning(|_| Ok(vec![]));
        repo.expect_roles().returning(|_| Ok(vec![]));
        let identity = service(repo);

        let response = identity
            .register(&RegisterUser {
                email: "buyer@example.com".to_string(),
                password: PASSWORD.to_string(),
                confirm_password: PASSWORD.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.user_token.email, "buyer@example.com");
        let claims = identity.verify_token(&response.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(response.user_token.id));
    }

    #[tokio::test]
    async fn test_register_reports_duplicate_and_policy_failures() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .returning(|_| Ok(Some(stored_user())));
        repo.expect_create().never();
        let identity = service(repo);

        let err = identity
            .register(&RegisterUser {
                email: "buyer@example.com".to_string(),
                password: "weakpass".to_string(),
                confirm_password: "weakpass".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            DomainError::RegistrationFailed(failures) => {
                let codes: Vec<&str> = failures.iter().map(|f| f.code.as_str()).collect();
                assert_eq!(
                    codes,
                    vec![
                        "DuplicateEmail",
                        "PasswordRequiresNonAlphanumeric",
                        "PasswordRequiresDigit",
                        "PasswordRequiresUpper",
                    ]
                );
            }
            other => panic!("expected registration failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_invalid_payload_is_validation_error() {
        let identity = service(MockUserRepository::new());
        let err = identity
            .register(&RegisterUser {
                email: "buyer".to_string(),
                password: PASSWORD.to_string(),
                confirm_password: "different!".to_string(),
            })
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                assert!(errors.field("email").is_some());
                assert!(errors.field("confirm_password").is_some());
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| Ok(None));
        let identity = service(repo);

        assert!(matches!(
            identity.login(&login(PASSWORD)).await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_success_embeds_claims_and_roles() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .returning(|_| Ok(Some(stored_user())));
        repo.expect_update_lockout().never();
        repo.expect_claims()
            .returning(|_| Ok(vec![ClaimPair::new("DeleteSupplier", "true")]));
        repo.expect_roles().returning(|_| Ok(vec!["Admin".to_string()]));
        let identity = service(repo);

        let response = identity.login(&login(PASSWORD)).await.unwrap();
        assert!(response
            .user_token
            .claims
            .contains(&ClaimPair::new("DeleteSupplier", "true")));
        assert!(response.user_token.claims.contains(&ClaimPair::new("role", "Admin")));

        let claims = identity.verify_token(&response.access_token).unwrap();
        assert!(IdentityService::<MockUserRepository>::has_claim(&claims, "DeleteSupplier"));
        assert!(claims.has_role("Admin"));
    }

    #[tokio::test]
    async fn test_wrong_password_counts_failure() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email()
            .returning(|_| Ok(Some(stored_user())));
        repo.expect_update_lockout()
            .withf(|u| u.access_failed_count == 1 && u.lockout_end.is_none())
            .times(1)
            .returning(|_| Ok(()));
        let identity = service(repo);

        assert!(matches!(
            identity.login(&login("Wrong9pass!")).await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_final_failure_locks_out() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| {
            let mut user = stored_user();
            user.access_failed_count = 4;
            Ok(Some(user))
        });
        repo.expect_update_lockout()
            .withf(|u| u.access_failed_count == 0 && u.lockout_end.is_some())
            .times(1)
            .returning(|_| Ok(()));
        let identity = service(repo);

        assert!(matches!(
            identity.login(&login("Wrong9pass!")).await,
            Err(DomainError::LockedOut)
        ));
    }

    #[tokio::test]
    async fn test_locked_user_is_refused_even_with_right_password() {
        let now = Utc::now();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(move |_| {
            let mut user = stored_user();
            user.lockout_end = Some(now + Duration::minutes(5));
            Ok(Some(user))
        });
        repo.expect_update_lockout().never();
        let identity = service(repo);

        assert!(matches!(
            identity.login_at(&login(PASSWORD), now).await,
            Err(DomainError::LockedOut)
        ));
    }

    #[tokio::test]
    async fn test_expired_lockout_allows_login_and_resets() {
        let now = Utc::now();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(move |_| {
            let mut user = stored_user();
            user.lockout_end = Some(now - Duration::minutes(1));
            Ok(Some(user))
        });
        repo.expect_update_lockout()
            .withf(|u| u.lockout_end.is_none() && u.access_failed_count == 0)
            .times(1)
            .returning(|_| Ok(()));
        repo.expect_claims().returning(|_| Ok(vec![]));
        repo.expect_roles().returning(|_| Ok(vec![]));
        let identity = service(repo);

        assert!(identity.login_at(&login(PASSWORD), now).await.is_ok());
    }

    #[tokio::test]
    async fn test_grant_claim_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_normalized_email().returning(|_| Ok(None));
        repo.expect_add_claim().never();
        let identity = service(repo);

        assert!(matches!(
            identity
                .grant_claim("ghost@example.com", ClaimPair::new("DeleteSupplier", "true"))
                .await,
            Err(DomainError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_verify_token_rejects_garbage() {
        let identity = service(MockUserRepository::new());
        assert!(matches!(
            identity.verify_token("garbage"),
            Err(DomainError::Unauthorized(_))
        ));
    }
}
