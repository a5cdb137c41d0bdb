use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Construction-time failures of the alarm engine.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ServiceError {
    #[error("security repository is required")]
    MissingRepository,
    #[error("image service is required")]
    MissingImageService,
}

/// Durable-write failures reported by a state store.
///
/// The in-memory view of the store is already updated when one of these is
/// returned; only the persisted copy is stale.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("state file io error: {path:?} {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("state encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
