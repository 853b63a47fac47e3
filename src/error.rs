// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can escape the library's public entry points.
///
/// Per-provider failures (network errors, blocked scrapes, invalid
/// credentials for an enhanced tier) never show up here: adapters absorb
/// them into empty source groups and a warning log line.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The person name was empty or whitespace-only. No partial report is
    /// produced.
    #[error("person name must not be empty or whitespace-only")]
    InvalidQuery,

    /// An adapter handed the report builder a record violating the schema
    /// contract (empty title or url). This signals a bug at the
    /// adapter/core boundary, not a user-facing condition.
    #[error("adapter for `{category}` returned malformed output: {reason}")]
    MalformedAdapterOutput { category: String, reason: String },

    /// The report snapshot could not be written.
    #[error("failed to write report to `{}`", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
