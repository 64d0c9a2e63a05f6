use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use supplier_api::{build_router, AppState};
use supplier_core::repositories::{SupplierRepository, UserRepository};
use supplier_core::services::{AuthorizationPolicies, IdentityService, SupplierService};
use supplier_infrastructure::{
    create_pool, run_migrations, InMemorySupplierRepository, InMemoryUserRepository,
    PgSupplierRepository, PgUserRepository,
};
use supplier_security::{JwtService, PasswordPolicy};
use supplier_shared::config::{AppConfig, StorageBackend};
use supplier_shared::ClaimPair;

#[derive(Parser, Debug)]
#[command(
    name = "supplier-server",
    version,
    about = "Supplier registry HTTP API"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Attach a claim to a registered user
    GrantClaim {
        #[arg(long)]
        email: String,
        #[arg(long)]
        claim_type: String,
        #[arg(long, default_value = "true")]
        claim_value: String,
    },
    /// Attach a role to a registered user
    AssignRole {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize telemetry; the guard flushes file output on exit
    let _log_guard = supplier_shared::telemetry::init_telemetry(&config.logging)?;

    info!("{} starting ({})...", config.app.name, config.app.env);

    let (suppliers, users) = build_repositories(&config).await?;
    let identity = IdentityService::new(
        users,
        JwtService::from_settings(&config.jwt),
        PasswordPolicy::new(config.identity.password.clone()),
        config.identity.lockout.clone(),
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, SupplierService::new(suppliers), identity).await,
        Command::GrantClaim { email, claim_type, claim_value } => {
            require_persistent_backend(&config)?;
            identity
                .grant_claim(&email, ClaimPair::new(claim_type, claim_value))
                .await?;
            Ok(())
        }
        Command::AssignRole { email, role } => {
            require_persistent_backend(&config)?;
            identity.assign_role(&email, &role).await?;
            Ok(())
        }
    }
}

async fn build_repositories(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn SupplierRepository>, Arc<dyn UserRepository>)> {
    match config.database.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(&config.database).await?;
            if config.database.run_migrations {
                run_migrations(&pool).await?;
            }
            let suppliers: Arc<dyn SupplierRepository> = Arc::new(PgSupplierRepository::new(pool.clone()));
            let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
            Ok((suppliers, users))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data will not survive restarts");
            let suppliers: Arc<dyn SupplierRepository> = Arc::new(InMemorySupplierRepository::new());
            let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
            Ok((suppliers, users))
        }
    }
}

fn require_persistent_backend(config: &AppConfig) -> anyhow::Result<()> {
    if config.database.backend == StorageBackend::Memory {
        anyhow::bail!("administrative commands need the postgres backend");
    }
    Ok(())
}

async fn serve(
    config: &AppConfig,
    suppliers: SupplierService<dyn SupplierRepository>,
    identity: IdentityService<dyn UserRepository>,
) -> anyhow::Result<()> {
    let state = AppState::new(
        suppliers,
        identity,
        AuthorizationPolicies::from_settings(&config.authorization),
    );
    let app = build_router(state, &config.cors);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
