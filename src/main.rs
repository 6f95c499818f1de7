use clap::Parser;
use plant_profile::core::classifier::classify;
use plant_profile::domain::model::ImageUpload;
use plant_profile::domain::ports::{ConfigProvider, Storage};
use plant_profile::utils::{logger, validation::Validate};
use plant_profile::{
    engine_from_config, CliConfig, LocalStorage, PlantError, ReferenceTables, TomlConfig,
};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let outcome = match &config.config {
        Some(path) => match load_toml(path) {
            Ok((toml_config, references)) => {
                identify(&config.image, &toml_config, references).await
            }
            Err(e) => Err(e),
        },
        None => match config.validate().and_then(|_| config.reference_tables()) {
            Ok(references) => identify(&config.image, &config, references).await,
            Err(e) => Err(e),
        },
    };

    match outcome {
        Ok(json) => {
            println!("{}", json);
            Ok(())
        }
        Err(e) => {
            let report = classify(&e);
            eprintln!("❌ {}", report.message);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(report.exit_code());
        }
    }
}

fn load_toml(path: &str) -> Result<(TomlConfig, ReferenceTables), PlantError> {
    tracing::info!("📁 Loading configuration from: {}", path);
    let config = TomlConfig::from_file(path)?;
    config.validate()?;
    let references = config.reference_tables()?;
    Ok((config, references))
}

async fn identify<C: ConfigProvider>(
    image_path: &str,
    config: &C,
    references: ReferenceTables,
) -> Result<String, PlantError> {
    let storage = LocalStorage::new(".");
    let bytes = storage.read_file(image_path).await.map_err(|e| {
        PlantError::input(format!("Cannot read image '{}': {}", image_path, e))
    })?;

    let filename = Path::new(image_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let engine = engine_from_config(config, references);
    let profile = engine.run(&ImageUpload::new(filename, bytes)).await?;

    Ok(serde_json::to_string_pretty(&profile)?)
}
