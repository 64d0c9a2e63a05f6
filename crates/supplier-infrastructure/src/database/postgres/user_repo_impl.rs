// ============================================================================
// Supplier Infrastructure - PostgreSQL User Repository
// File: crates/supplier-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use supplier_core::domain::IdentityUser;
use supplier_core::error::DomainError;
use supplier_core::repositories::UserRepository;
use supplier_shared::{utils::mask_email, ClaimPair};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct IdentityUserRow {
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

impl From<IdentityUserRow> for IdentityUser {
    fn from(row: IdentityUserRow) -> Self {
        IdentityUser {
            id: row.id,
            email: row.email,
            normalized_email: row.normalized_email,
            password_hash: row.password_hash,
            email_confirmed: row.email_confirmed,
            lockout_enabled: row.lockout_enabled,
            lockout_end: row.lockout_end,
            access_failed_count: row.access_failed_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ClaimRow {
    pub claim_type: String,
    pub claim_value: String,
}

fn database_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_normalized_email(&self, normalized_email: &str) -> Result<Option<IdentityUser>, DomainError> {
        let row: Option<IdentityUserRow> = sqlx::query_as(
            r#"
            SELECT
                id, email, normalized_email, password_hash, email_confirmed,
                lockout_enabled, lockout_end, access_failed_count, created_at
            FROM identity_users
            WHERE normalized_email = $1
            "#
        )
        .bind(normalized_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("finding user by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError> {
        info!("Creating user with email: {}", mask_email(&user.email));

        let row: IdentityUserRow = sqlx::query_as(
            r#"
            INSERT INTO identity_users (
                id, email, normalized_email, password_hash, email_confirmed,
                lockout_enabled, lockout_end, access_failed_count, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, email, normalized_email, password_hash, email_confirmed,
                lockout_enabled, lockout_end, access_failed_count, created_at
            "#
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.normalized_email)
        .bind(&user.password_hash)
        .bind(user.email_confirmed)
        .bind(user.lockout_enabled)
        .bind(user.lockout_end)
        .bind(user.access_failed_count)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                error!("Email already registered: {}", mask_email(&user.email));
                DomainError::EmailAlreadyExists(user.email.clone())
            } else {
                database_error("creating user", e)
            }
        })?;

        info!("User created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update_lockout(&self, user: &IdentityUser) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE identity_users
            SET lockout_end = $2, access_failed_count = $3
            WHERE id = $1
            "#
        )
        .bind(user.id)
        .bind(user.lockout_end)
        .bind(user.access_failed_count)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("updating lockout state", e))?;

        Ok(())
    }

    async fn claims(&self, user_id: &Uuid) -> Result<Vec<ClaimPair>, DomainError> {
        let rows: Vec<ClaimRow> = sqlx::query_as(
            r#"
            SELECT claim_type, claim_value
            FROM identity_user_claims
            WHERE user_id = $1
            ORDER BY id
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("loading user claims", e))?;

        Ok(rows
            .into_iter()
            .map(|r| ClaimPair::new(r.claim_type, r.claim_value))
            .collect())
    }

    async fn roles(&self, user_id: &Uuid) -> Result<Vec<String>, DomainError> {
        let roles: Vec<String> = sqlx::query_scalar(
            "SELECT role FROM identity_user_roles WHERE user_id = $1 ORDER BY role"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("loading user roles", e))?;

        Ok(roles)
    }

    async fn add_claim(&self, user_id: &Uuid, claim: &ClaimPair) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO identity_user_claims (user_id, claim_type, claim_value)
            VALUES ($1, $2, $3)
            "#
        )
        .bind(user_id)
        .bind(&claim.claim_type)
        .bind(&claim.value)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("adding user claim", e))?;

        Ok(())
    }

    async fn add_role(&self, user_id: &Uuid, role: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO identity_user_roles (user_id, role)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("adding user role", e))?;

        Ok(())
    }
}
