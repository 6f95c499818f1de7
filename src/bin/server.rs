use anyhow::{Context, Result};
use clap::Parser;
use plant_profile::server::{build_router, AppState};
use plant_profile::utils::{logger, validation::Validate};
use plant_profile::{engine_from_config, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "plant-profile-server")]
#[command(about = "HTTP service identifying plants from uploaded photographs")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "plant-profile.toml")]
    config: String,

    /// Override the bind address from the config
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init_server_logger();

    tracing::info!("Loading configuration from: {}", args.config);
    let config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.recovery_suggestion()))?;

    let references = config.reference_tables()?;
    tracing::info!("Reference tables loaded: {} species", references.len());

    let engine = engine_from_config(&config, references);
    let uploads = LocalStorage::new(config.upload_directory());
    tokio::fs::create_dir_all(uploads.base_path())
        .await
        .with_context(|| format!("failed to create upload directory {}", uploads.base_path()))?;

    let app = build_router(AppState::new(engine, uploads));

    let bind_address = args.bind.as_deref().unwrap_or(config.bind_address());
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    tracing::info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
