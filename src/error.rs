//! Error types for the cluster configuration engine

use thiserror::Error;

use crate::wizard::ValidationError;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid settings or CLI configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request to the hosted backend failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    BackendError { status: u16, message: String },

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Settings file could not be parsed
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Settings file could not be read
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A persisted value could not be mapped back onto a known type
    #[error("Failed to parse {field}: {message}")]
    ParseError { field: String, message: String },

    /// Credential record is missing a required field or targets another provider
    #[error("Invalid credential '{id}': {message}")]
    InvalidCredential { id: String, message: String },

    /// The value is not among the options currently derived for the field
    #[error("'{value}' is not a valid option for {field}")]
    UnknownOption { field: String, value: String },

    /// Operation is not allowed in the current wizard phase
    #[error("Invalid wizard state: {0}")]
    InvalidState(String),

    /// Selection failed validation; every failing field is listed
    #[error("Validation failed: {}", summarize(.0))]
    ValidationError(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    pub fn unknown_option(field: impl Into<String>, value: impl Into<String>) -> Self {
        Error::UnknownOption {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn parse(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ParseError {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
