use clap::Parser;
use tracing_subscriber::EnvFilter;

use vigil_api_rust::app::{router, AppState};
use vigil_api_rust::cli::ServeArgs;
use vigil_api_rust::config::AppConfig;
use vigil_api_rust::database::DatabaseManager;
use vigil_api_rust::resolver::assemble;
use vigil_api_rust::store::{ConfigStore, OrganizationsStore, PrimaryStores};

#[derive(Parser)]
#[command(name = "vigil-api")]
#[command(about = "Vigil API - multi-tenant monitoring console backend")]
#[command(version)]
struct Args {
    #[command(flatten)]
    serve: ServeArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    args.serve.apply(&mut config);
    tracing::info!("Starting Vigil API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }

    let (primary, database) = if args.serve.memory {
        tracing::warn!("Using in-memory primary store; data is lost on exit");
        (PrimaryStores::in_memory(), None)
    } else {
        let database = DatabaseManager::connect(&config.database).await?;
        database.migrate().await?;
        (PrimaryStores::postgres(database.pool().clone()), Some(database))
    };

    let stores = assemble(&config.resolver, primary)?;

    // Seed the records every deployment needs
    let default_org = stores.organizations.create_default().await?;
    stores.config.initialize().await?;
    tracing::info!("Default organization: {} ({})", default_org.name, default_org.id);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(config, stores, database.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Vigil API listening on http://{}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
