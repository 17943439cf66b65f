use std::path::PathBuf;
use thiserror::Error;

/// Typed failures surfaced by the library.
///
/// Malformed rows are not errors: ingestion drops them and keeps going.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read dataset {path}: {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown view `{0}` (see `oncoviz list`)")]
    UnknownView(String),
    #[error("`{0}` is a map; geographic charts can only be exported as JSON")]
    GeoRender(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
