use crate::config::{
    DEFAULT_RECOGNITION_ENDPOINT, DEFAULT_RECOGNITION_TIMEOUT_SECS, DEFAULT_REGISTRY_TIMEOUT_SECS,
    DEFAULT_REGISTRY_URL,
};
use crate::core::reference::ReferenceTables;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PlantError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "plant-profile")]
#[command(about = "Identify a plant from a photograph and print its profile")]
pub struct CliConfig {
    /// Photograph to identify
    #[arg(long, short)]
    pub image: String,

    /// TOML configuration file; when given it replaces the service options below
    #[arg(long, short)]
    pub config: Option<String>,

    #[arg(long, env = "PLANTNET_API_KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "PLANTNET_API_URL", default_value = DEFAULT_RECOGNITION_ENDPOINT)]
    pub recognition_endpoint: String,

    #[arg(long, env = "GBIF_API_URL", default_value = DEFAULT_REGISTRY_URL)]
    pub registry_url: String,

    #[arg(long, default_value_t = DEFAULT_RECOGNITION_TIMEOUT_SECS)]
    pub recognition_timeout: u64,

    #[arg(long, default_value_t = DEFAULT_REGISTRY_TIMEOUT_SECS)]
    pub registry_timeout: u64,

    #[arg(long, default_value_t = crate::core::resolver::DEFAULT_OCCURRENCE_LIMIT)]
    pub occurrence_limit: usize,

    /// Extra common names and usage notes (TOML)
    #[arg(long)]
    pub reference_file: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn reference_tables(&self) -> Result<ReferenceTables> {
        match &self.reference_file {
            Some(path) => ReferenceTables::with_overrides_file(path),
            None => Ok(ReferenceTables::builtin()),
        }
    }
}

impl ConfigProvider for CliConfig {
    fn recognition_endpoint(&self) -> &str {
        &self.recognition_endpoint
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn recognition_timeout(&self) -> Duration {
        Duration::from_secs(self.recognition_timeout)
    }

    fn registry_base_url(&self) -> &str {
        &self.registry_url
    }

    fn registry_timeout(&self) -> Duration {
        Duration::from_secs(self.registry_timeout)
    }

    fn occurrence_limit(&self) -> usize {
        self.occurrence_limit
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("image", &self.image)?;
        if self.api_key.trim().is_empty() {
            return Err(PlantError::MissingConfigError {
                field: "api_key (or PLANTNET_API_KEY)".to_string(),
            });
        }
        validate_non_empty_string("api_key", &self.api_key)?;
        validate_url("recognition_endpoint", &self.recognition_endpoint)?;
        validate_url("registry_url", &self.registry_url)?;
        validate_range("recognition_timeout", self.recognition_timeout, 1, 300)?;
        validate_range("registry_timeout", self.registry_timeout, 1, 300)?;
        validate_range("occurrence_limit", self.occurrence_limit, 1, 300)?;
        Ok(())
    }
}
