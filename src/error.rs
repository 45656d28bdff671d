use std::path::PathBuf;

/// Failures while loading layer documents, settings, or icon registries.
/// The inference itself never fails; it declines.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {origin}: at JSON path {path} → {message}")]
    Json {
        origin: String,
        path: String,
        message: String,
    },
    #[error("bad input pattern: {0}")]
    Glob(String),
    #[error("jq filter failed on {origin}: {message}")]
    Jq { origin: String, message: String },
}
