//! Error types for the Tenable inventory

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The config source could not be read or parsed
    #[error("Failed to read inventory config '{}': {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// A required option is missing, empty or not a string
    #[error("Missing, empty or invalid option \"{option}\" for inventory plugin {plugin}")]
    InvalidOption {
        option: &'static str,
        plugin: &'static str,
    },

    /// The underlying HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The HTTP call failed at the connection or status level
    #[error("Failed to run {name} API call: method=\"{method}\", path=\"{path}\", error=\"{error}\"")]
    Transport {
        name: &'static str,
        method: String,
        path: String,
        error: String,
    },

    /// The response body is not valid JSON
    #[error("Failed to decode {name} response as JSON: method=\"{method}\", path=\"{path}\", error=\"{error}\"")]
    Decode {
        name: &'static str,
        method: String,
        path: String,
        error: String,
    },

    /// The decoded body does not have the expected shape
    #[error("Unexpected response for path \"{path}\": {reason}")]
    MalformedResponse { path: String, reason: String },

    /// An asset record cannot be projected into a host
    #[error("Malformed asset at index {index}: {reason}")]
    MalformedAsset { index: usize, reason: String },
}

impl InventoryError {
    /// Configuration problems, raised before any network activity
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigFile { .. } | Self::InvalidOption { .. })
    }

    /// Transport or decode failures of the API call
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Decode { .. })
    }
}

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
