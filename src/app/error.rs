use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for the scan/cache/fetch pipeline.
///
/// Scan, startup cache-directory and client-construction failures abort the
/// catalog build; per-entry cache and field errors drop the one file they
/// belong to. Network failures never reach this type; the fetch client
/// reports them as absence.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("library scan failed under {root}: {source}")]
    ScanIo {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache entry {path} is not valid JSON: {source}")]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache i/o failed for {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The API `Runtime` field did not carry a leading integer.
    #[error("malformed runtime field {value:?}")]
    MalformedField { value: String },

    #[error("http client build failed: {0}")]
    Client(#[from] reqwest::Error),
}
