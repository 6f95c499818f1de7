use crate::utils::error::{ErrorCategory, PlantError};
use serde::Serialize;

/// User-facing view of a failed identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub category: ErrorCategory,
    pub status: u16,
    pub message: String,
}

/// Body returned at the inbound boundary on failure.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn classify(err: &PlantError) -> FailureReport {
    let report = FailureReport {
        category: err.category(),
        status: err.status_code(),
        message: err.user_friendly_message(),
    };

    match report.category {
        ErrorCategory::ClientInput | ErrorCategory::NoResult => {
            tracing::info!("Identification rejected: {}", report.message)
        }
        _ => tracing::error!(
            "Identification failed ({:?}): {}",
            report.category,
            err
        ),
    }

    report
}

impl FailureReport {
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> i32 {
        match self.category {
            ErrorCategory::ClientInput => 2,
            ErrorCategory::NoResult => 3,
            ErrorCategory::Upstream | ErrorCategory::UpstreamTimeout => 4,
            ErrorCategory::Configuration => 5,
            ErrorCategory::Server => 1,
        }
    }
}
