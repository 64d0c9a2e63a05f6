//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_ACCESS_TOKEN_EXPIRY, DEFAULT_JWT_AUDIENCE, DEFAULT_JWT_ISSUER,
    DEFAULT_LOCKOUT_SECONDS, DEFAULT_MAX_FAILED_ACCESS_ATTEMPTS, DELETE_SUPPLIER_CLAIM,
    DELETE_SUPPLIER_POLICY, MIN_PASSWORD_LENGTH,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub identity: IdentitySettings,
    #[serde(default)]
    pub authorization: AuthorizationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    #[serde(default)]
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct IdentitySettings {
    #[serde(default)]
    pub password: PasswordSettings,
    #[serde(default)]
    pub lockout: LockoutSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PasswordSettings {
    pub required_length: usize,
    pub require_digit: bool,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_non_alphanumeric: bool,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            required_length: MIN_PASSWORD_LENGTH,
            require_digit: true,
            require_lowercase: true,
            require_uppercase: true,
            require_non_alphanumeric: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LockoutSettings {
    pub allowed_for_new_users: bool,
    pub max_failed_access_attempts: u32,
    pub lockout_seconds: i64,
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            allowed_for_new_users: true,
            max_failed_access_attempts: DEFAULT_MAX_FAILED_ACCESS_ATTEMPTS,
            lockout_seconds: DEFAULT_LOCKOUT_SECONDS,
        }
    }
}

/// Named authorization policies, each listing the claim types a caller must carry.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthorizationSettings {
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicySettings>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PolicySettings {
    pub name: String,
    pub required_claims: Vec<String>,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self { policies: default_policies() }
    }
}

impl AuthorizationSettings {
    pub fn policy(&self, name: &str) -> Option<&PolicySettings> {
        self.policies.iter().find(|p| p.name == name)
    }
}

fn default_policies() -> Vec<PolicySettings> {
    vec![PolicySettings {
        name: DELETE_SUPPLIER_POLICY.to_string(),
        required_claims: vec![DELETE_SUPPLIER_CLAIM.to_string()],
    }]
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "supplier-server".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsSettings {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            );
        Self::from_builder(builder)
    }

    /// Built-in defaults every other source layers on top of.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, AppError> {
        Ok(Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "supplier-server")?
            .set_default("database.backend", "postgres")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 3)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.access_token_expiry", DEFAULT_ACCESS_TOKEN_EXPIRY)?
            .set_default("jwt.issuer", DEFAULT_JWT_ISSUER)?
            .set_default("jwt.audience", DEFAULT_JWT_AUDIENCE)?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(AppError::InvalidConfig("jwt.secret must be set".into()));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(AppError::InvalidConfig(
                "jwt.access_token_expiry must be positive".into(),
            ));
        }
        if self.database.backend == StorageBackend::Postgres && self.database.url.trim().is_empty() {
            return Err(AppError::InvalidConfig(
                "database.url is required for the postgres backend".into(),
            ));
        }
        if self.identity.lockout.max_failed_access_attempts == 0 {
            return Err(AppError::InvalidConfig(
                "identity.lockout.max_failed_access_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_from(toml: &str) -> Result<AppConfig, AppError> {
        AppConfig::from_builder(
            AppConfig::defaults()
                .unwrap()
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_defaults_with_memory_backend() {
        let config = load_from(
            r#"
            [database]
            backend = "memory"

            [jwt]
            secret = "unit-test-secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.jwt.access_token_expiry, DEFAULT_ACCESS_TOKEN_EXPIRY);
        assert_eq!(config.identity.lockout.max_failed_access_attempts, 5);
        assert_eq!(config.identity.password.required_length, MIN_PASSWORD_LENGTH);
        let policy = config.authorization.policy(DELETE_SUPPLIER_POLICY).unwrap();
        assert_eq!(policy.required_claims, vec![DELETE_SUPPLIER_CLAIM.to_string()]);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let err = load_from(
            r#"
            [database]
            backend = "memory"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_postgres_requires_url() {
        let err = load_from(
            r#"
            [jwt]
            secret = "unit-test-secret"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("database.url"));
    }

    #[test]
    fn test_policy_table_override() {
        let config = load_from(
            r#"
            [database]
            backend = "memory"

            [jwt]
            secret = "unit-test-secret"

            [[authorization.policies]]
            name = "DeleteSupplier"
            required_claims = ["DeleteSupplier", "Auditor"]
            "#,
        )
        .unwrap();
        assert_eq!(config.authorization.policies.len(), 1);
        assert_eq!(
            config.authorization.policy(DELETE_SUPPLIER_POLICY).unwrap().required_claims,
            vec!["DeleteSupplier".to_string(), "Auditor".to_string()]
        );
    }
}
