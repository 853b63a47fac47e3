// src/aggregate.rs
use std::collections::BTreeMap;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::report::{self, Report};
use crate::search::providers::news::NewsSearchProvider;
use crate::search::providers::papers::PaperSearchProvider;
use crate::search::providers::web::WebSearchProvider;
use crate::search::types::{CategoryResults, SearchFilters, SearchProvider};

/// Per-invocation options for [`PersonSearcher::build_report`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Institution filter for the university-news sub-source.
    pub university: Option<String>,
    pub max_results_per_source: usize,
    /// Enable the lower-priority social platform sub-sources.
    pub include_social: bool,
    pub search_papers: bool,
    pub search_news: bool,
    pub search_web: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            university: None,
            max_results_per_source: 10,
            include_social: false,
            search_papers: true,
            search_news: true,
            search_web: true,
        }
    }
}

impl SearchOptions {
    fn category_enabled(&self, category: &str) -> bool {
        match category {
            "papers" => self.search_papers,
            "news" => self.search_news,
            "web" => self.search_web,
            _ => true,
        }
    }

    fn filters(&self) -> SearchFilters {
        SearchFilters {
            university: self.university.clone(),
            max_results: self.max_results_per_source.max(1),
            include_social: self.include_social,
        }
    }
}

/// Fans out one person query to the enabled source-family adapters and
/// assembles the unified [`Report`]. The sole public entry point of the
/// core.
pub struct PersonSearcher {
    providers: Vec<Box<dyn SearchProvider>>,
}

impl PersonSearcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            providers: vec![
                Box::new(PaperSearchProvider::new(config)),
                Box::new(NewsSearchProvider::new(config)),
                Box::new(WebSearchProvider::new(config)),
            ],
        }
    }

    /// Inject adapters directly. Used by tests and by callers wiring
    /// custom source families.
    pub fn with_providers(providers: Vec<Box<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    /// Run one search invocation.
    ///
    /// Fails fast with [`SearchError::InvalidQuery`] on an empty name.
    /// Each enabled category's adapter is invoked exactly once,
    /// sequentially; an adapter that errors out entirely is recorded as a
    /// present-but-empty category so the remaining categories still run.
    pub async fn build_report(
        &self,
        person_name: &str,
        options: &SearchOptions,
    ) -> Result<Report, SearchError> {
        let name = person_name.trim();
        if name.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        let filters = options.filters();
        let mut outputs: BTreeMap<String, CategoryResults> = BTreeMap::new();

        for provider in &self.providers {
            let category = provider.category();
            if !options.category_enabled(category) {
                continue;
            }
            tracing::info!(category, person = name, "searching category");
            let groups = match provider.search_all(name, &filters).await {
                Ok(groups) => groups,
                Err(error) => {
                    tracing::warn!(category, error = ?error, "adapter failed, recording empty category");
                    CategoryResults::new()
                }
            };
            outputs.insert(category.to_string(), groups);
        }

        report::build(name, outputs)
    }
}
