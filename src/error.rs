use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("forecast service answered with status {0}")]
    Status(u16),
    #[error("malformed forecast: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no configuration directory on this platform")]
    NoConfigDir,
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot encode location: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read city catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse city catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no city named {0:?} in the catalog")]
    UnknownCity(String),
}
