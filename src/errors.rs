use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the hooksync application
#[derive(Error, Debug)]
pub enum HooksyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No hook configuration found - add a .hooksync.toml file or a \"hooksync\" field to package.json"
    )]
    NotFound,

    #[error("Configuration from {source_name} contains unrecognized keys: {}", keys.join(", "))]
    UnrecognizedKeys {
        source_name: String,
        keys: Vec<String>,
    },
}

/// Errors while reading the project manifest (package.json)
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("package.json not found at {}", path.display())]
    Missing { path: PathBuf },

    #[error("package.json must contain a top-level object")]
    NotAnObject,

    #[error("package.json could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Type alias for Result using `HooksyncError`
pub type Result<T> = std::result::Result<T, HooksyncError>;
