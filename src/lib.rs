// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod search;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{PersonSearcher, SearchOptions};
pub use crate::config::SearchConfig;
pub use crate::error::SearchError;
pub use crate::report::Report;
pub use crate::search::types::{
    CategoryResults, ResultRecord, SearchFilters, SearchProvider, SourceGroup,
};
