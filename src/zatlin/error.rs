//! Operational errors.
//!
//! Problems inside a zatlin source are diagnostics, not errors. These variants cover the
//! surrounding plumbing: reading files, loading configuration and rendering output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZatlinError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("unknown output format '{0}' (expected text, json or yaml)")]
    UnknownFormat(String),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
