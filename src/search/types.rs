// src/search/types.rs
use std::collections::BTreeMap;

use anyhow::Result;

/// One hit from one sub-source.
///
/// `extra` holds the provider-specific scalar fields (authors, year, venue,
/// citations, publisher, date, search_type, ...) and is serde-flattened so
/// they land at the record's top level in the persisted snapshot. The field
/// set varies by source family on purpose; no shared rigid schema.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResultRecord {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    pub source_name: String, // e.g. "arxiv", "google_news", "social:medium.com"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Ordered result list from one sub-source call. Provider relevance order,
/// never reordered downstream.
pub type SourceGroup = Vec<ResultRecord>;

/// source_name -> group, for one whole category (papers / news / web).
pub type CategoryResults = BTreeMap<String, SourceGroup>;

/// Per-invocation knobs passed down from the aggregator.
#[derive(Debug, Clone)]
pub struct SearchFilters {
    /// Restrict the university-news sub-source to one institution.
    pub university: Option<String>,
    /// Cap per sub-source; providers truncate rather than error.
    pub max_results: usize,
    /// Enable the low-signal social platform sub-sources (web category).
    pub include_social: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            university: None,
            max_results: 10,
            include_social: false,
        }
    }
}

/// One source family (papers, news, web).
///
/// `search_all` must absorb per-sub-source failures into empty groups; an
/// `Err` from it means something unexpected and fatal inside the adapter,
/// which the aggregator records as an empty category.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search_all(
        &self,
        person_name: &str,
        filters: &SearchFilters,
    ) -> Result<CategoryResults>;

    fn category(&self) -> &'static str;
}
