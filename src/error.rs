use thiserror::Error;

use crate::config::ConfigError;

/// Why an inbound request body was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Wire names of required fields that were absent, null or blank.
    MissingFields(Vec<&'static str>),
    /// The body could not be read as a review request object.
    MalformedBody(String),
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            ValidationIssue::MalformedBody(msg) => write!(f, "invalid JSON body: {msg}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Service is not configured: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Validation failed: {0}")]
    Validation(ValidationIssue),
    #[error("Completion service rejected credentials: {0}")]
    Auth(String),
    #[error("Completion service error: {0}")]
    Capability(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing_fields(fields: Vec<&'static str>) -> Self {
        AppError::Validation(ValidationIssue::MissingFields(fields))
    }

    /// Taxonomy name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "ConfigurationError",
            AppError::Validation(_) => "ValidationError",
            AppError::Auth(_) => "AuthError",
            AppError::Capability(_) => "CapabilityError",
            AppError::Internal(_) => "InternalError",
        }
    }
}

impl From<ValidationIssue> for AppError {
    fn from(issue: ValidationIssue) -> Self {
        AppError::Validation(issue)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
