//! Error type for the fallible (construction and configuration) paths.
//!
//! Interaction handlers never return errors: a missed visual update is
//! preferred over failing in the middle of pointer handling.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HoverError {
    #[error("series '{key}' has {x_len} x values but {y_len} y values")]
    SeriesLength {
        key: String,
        x_len: usize,
        y_len: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`HoverError`].
pub type Result<T> = std::result::Result<T, HoverError>;
