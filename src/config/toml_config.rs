use crate::config::{
    DEFAULT_BIND_ADDRESS, DEFAULT_RECOGNITION_ENDPOINT, DEFAULT_RECOGNITION_TIMEOUT_SECS,
    DEFAULT_REGISTRY_TIMEOUT_SECS, DEFAULT_REGISTRY_URL, DEFAULT_UPLOAD_DIRECTORY,
};
use crate::core::reference::ReferenceTables;
use crate::core::resolver::DEFAULT_OCCURRENCE_LIMIT;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PlantError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    pub reference: Option<ReferenceConfig>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    pub endpoint: Option<String>,
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub occurrence_limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// TOML file with `[common_names]` and `[ayurvedic_uses]` tables.
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: Option<String>,
    pub upload_directory: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlantError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlantError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PLANTNET_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlantError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("recognition.endpoint", self.recognition_endpoint())?;
        validate_non_empty_string("recognition.api_key", &self.recognition.api_key)?;
        if self.recognition.api_key.starts_with("${") {
            return Err(PlantError::MissingConfigError {
                field: format!("recognition.api_key ({})", self.recognition.api_key),
            });
        }

        validate_url("registry.base_url", self.registry_base_url())?;

        if let Some(timeout) = self.recognition.timeout_seconds {
            validate_range("recognition.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(timeout) = self.registry.timeout_seconds {
            validate_range("registry.timeout_seconds", timeout, 1, 300)?;
        }
        if let Some(limit) = self.registry.occurrence_limit {
            validate_range("registry.occurrence_limit", limit, 1, 300)?;
        }

        if let Some(reference) = &self.reference {
            validate_path("reference.path", &reference.path)?;
        }
        validate_path("server.upload_directory", self.upload_directory())?;

        Ok(())
    }

    /// Built-in reference tables, extended by `[reference].path` when set.
    pub fn reference_tables(&self) -> Result<ReferenceTables> {
        match &self.reference {
            Some(reference) => ReferenceTables::with_overrides_file(&reference.path),
            None => Ok(ReferenceTables::builtin()),
        }
    }

    pub fn bind_address(&self) -> &str {
        self.server
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    pub fn upload_directory(&self) -> &str {
        self.server
            .upload_directory
            .as_deref()
            .unwrap_or(DEFAULT_UPLOAD_DIRECTORY)
    }
}

impl ConfigProvider for TomlConfig {
    fn recognition_endpoint(&self) -> &str {
        self.recognition
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_RECOGNITION_ENDPOINT)
    }

    fn api_key(&self) -> &str {
        &self.recognition.api_key
    }

    fn recognition_timeout(&self) -> Duration {
        Duration::from_secs(
            self.recognition
                .timeout_seconds
                .unwrap_or(DEFAULT_RECOGNITION_TIMEOUT_SECS),
        )
    }

    fn registry_base_url(&self) -> &str {
        self.registry
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_REGISTRY_URL)
    }

    fn registry_timeout(&self) -> Duration {
        Duration::from_secs(
            self.registry
                .timeout_seconds
                .unwrap_or(DEFAULT_REGISTRY_TIMEOUT_SECS),
        )
    }

    fn occurrence_limit(&self) -> usize {
        self.registry
            .occurrence_limit
            .unwrap_or(DEFAULT_OCCURRENCE_LIMIT)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[recognition]
api_key = "abc123"
"#,
        )
        .unwrap();

        assert_eq!(config.api_key(), "abc123");
        assert_eq!(
            config.recognition_endpoint(),
            "https://my-api.plantnet.org/v2/identify/all"
        );
        assert_eq!(config.registry_base_url(), "https://api.gbif.org/v1");
        assert_eq!(config.recognition_timeout(), Duration::from_secs(25));
        assert_eq!(config.registry_timeout(), Duration::from_secs(10));
        assert_eq!(config.occurrence_limit(), 10);
        assert_eq!(config.upload_directory(), "static/uploads");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[recognition]
endpoint = "http://localhost:9000/identify"
api_key = "abc123"
timeout_seconds = 40

[registry]
base_url = "http://localhost:9001/v1"
timeout_seconds = 3
occurrence_limit = 25

[server]
bind_address = "0.0.0.0:8080"
upload_directory = "/tmp/plant-uploads"
"#,
        )
        .unwrap();

        assert_eq!(config.recognition_timeout(), Duration::from_secs(40));
        assert_eq!(config.registry_timeout(), Duration::from_secs(3));
        assert_eq!(config.occurrence_limit(), 25);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_PLANT_API_KEY", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[recognition]
api_key = "${TEST_PLANT_API_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), "from-env");

        std::env::remove_var("TEST_PLANT_API_KEY");
    }

    #[test]
    fn test_unresolved_api_key_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[recognition]
api_key = "${PLANT_PROFILE_UNSET_VARIABLE}"
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, PlantError::MissingConfigError { .. }));
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[recognition]
api_key = "abc"

[registry]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[recognition]
api_key = "abc"

[registry]
timeout_seconds = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_recognition_section() {
        assert!(TomlConfig::from_toml_str("[registry]\n").is_err());
    }

    #[test]
    fn test_config_from_file_with_reference_tables() {
        let mut reference_file = NamedTempFile::new().unwrap();
        reference_file
            .write_all(b"[common_names]\n\"Tectona grandis\" = \"Teak\"\n")
            .unwrap();

        let mut config_file = NamedTempFile::new().unwrap();
        let toml_content = format!(
            "[recognition]\napi_key = \"abc\"\n\n[reference]\npath = \"{}\"\n",
            reference_file.path().to_str().unwrap().replace('\\', "/")
        );
        config_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(config_file.path()).unwrap();
        let tables = config.reference_tables().unwrap();
        assert_eq!(tables.common_name("Tectona grandis"), "Teak");
        assert_eq!(tables.common_name("Aloe vera"), "Aloe");
    }
}
