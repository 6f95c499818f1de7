use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlantError {
    #[error("{message}")]
    InputError { message: String },

    #[error("No plant identified.")]
    NoIdentification,

    #[error("API error: {status}")]
    UpstreamError { status: u16 },

    #[error("Recognition service timed out")]
    UpstreamTimeout,

    #[error("Something went wrong: {message}")]
    Internal { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// External-facing grouping of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No file, empty filename or empty payload.
    ClientInput,
    /// The recognition service returned no candidates.
    NoResult,
    /// The recognition service answered with a non-success status.
    Upstream,
    /// The recognition service did not answer in time.
    UpstreamTimeout,
    /// Startup configuration problems.
    Configuration,
    /// Anything else.
    Server,
}

impl PlantError {
    pub fn input(message: impl Into<String>) -> Self {
        PlantError::InputError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PlantError::Internal {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PlantError::InputError { .. } => ErrorCategory::ClientInput,
            PlantError::NoIdentification => ErrorCategory::NoResult,
            PlantError::UpstreamError { .. } => ErrorCategory::Upstream,
            PlantError::UpstreamTimeout => ErrorCategory::UpstreamTimeout,
            PlantError::ConfigError { .. }
            | PlantError::ConfigValidationError { .. }
            | PlantError::InvalidConfigValueError { .. }
            | PlantError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PlantError::Internal { .. }
            | PlantError::IoError(_)
            | PlantError::SerializationError(_) => ErrorCategory::Server,
        }
    }

    /// HTTP status reported at the inbound boundary.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::ClientInput => 400,
            ErrorCategory::NoResult => 404,
            ErrorCategory::UpstreamTimeout => 504,
            ErrorCategory::Upstream | ErrorCategory::Configuration | ErrorCategory::Server => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlantError::Internal { .. }
            | PlantError::IoError(_)
            | PlantError::SerializationError(_) => {
                format!("Something went wrong: {}", self.diagnostic())
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::ClientInput => "Attach a single plant photograph and try again",
            ErrorCategory::NoResult => {
                "Try a closer photograph of a leaf, flower or fruit with a plain background"
            }
            ErrorCategory::Upstream => "Check the recognition API key and quota",
            ErrorCategory::UpstreamTimeout => {
                "The recognition service is slow right now; retry or raise the timeout"
            }
            ErrorCategory::Configuration => {
                "Review the configuration file and environment variables"
            }
            ErrorCategory::Server => "Re-run with --verbose and inspect the logs",
        }
    }

    fn diagnostic(&self) -> String {
        match self {
            PlantError::Internal { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for PlantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PlantError::UpstreamTimeout
        } else {
            PlantError::Internal {
                message: err.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PlantError>;
