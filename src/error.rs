use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not determine the config directory")]
    NoConfigDir,
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("prayer calculation failed: {0}")]
    Calculation(String),
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("notification failed: {0}")]
    Notification(String),
    #[error("chime failed: {0}")]
    Chime(#[from] std::io::Error),
}
