#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_RECOGNITION_ENDPOINT: &str = "https://my-api.plantnet.org/v2/identify/all";
pub const DEFAULT_REGISTRY_URL: &str = "https://api.gbif.org/v1";
pub const DEFAULT_RECOGNITION_TIMEOUT_SECS: u64 = 25;
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_UPLOAD_DIRECTORY: &str = "static/uploads";
