// tests/aggregate_degraded.rs
// Fatal adapter errors and fully-degraded runs must still yield a usable
// report.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use person_search::{
    CategoryResults, PersonSearcher, ResultRecord, SearchFilters, SearchOptions, SearchProvider,
};

struct FailingProvider {
    category: &'static str,
}

#[async_trait]
impl SearchProvider for FailingProvider {
    async fn search_all(
        &self,
        _person_name: &str,
        _filters: &SearchFilters,
    ) -> Result<CategoryResults> {
        Err(anyhow!("simulated total outage"))
    }

    fn category(&self) -> &'static str {
        self.category
    }
}

struct HealthyProvider {
    category: &'static str,
    source: &'static str,
}

#[async_trait]
impl SearchProvider for HealthyProvider {
    async fn search_all(
        &self,
        _person_name: &str,
        _filters: &SearchFilters,
    ) -> Result<CategoryResults> {
        let mut out = CategoryResults::new();
        out.insert(
            self.source.to_string(),
            vec![ResultRecord {
                title: "Still here".to_string(),
                url: "https://ok.example/1".to_string(),
                snippet: String::new(),
                source_name: self.source.to_string(),
                score: None,
                extra: BTreeMap::new(),
            }],
        );
        Ok(out)
    }

    fn category(&self) -> &'static str {
        self.category
    }
}

#[tokio::test]
async fn fatal_adapter_error_keeps_category_present_and_empty() {
    let searcher = PersonSearcher::with_providers(vec![
        Box::new(FailingProvider { category: "papers" }),
        Box::new(HealthyProvider { category: "news", source: "google_news" }),
        Box::new(HealthyProvider { category: "web", source: "general_search" }),
    ]);

    let report = searcher
        .build_report("Aruzhan Abil", &SearchOptions::default())
        .await
        .unwrap();

    assert!(report.categories.contains_key("papers"));
    assert!(report.categories["papers"].is_empty());
    assert_eq!(report.summary["papers"], 0);

    // siblings unaffected
    assert_eq!(report.summary["news"], 1);
    assert_eq!(report.summary["web"], 1);
}

#[tokio::test]
async fn fully_degraded_run_yields_empty_but_complete_report() {
    let searcher = PersonSearcher::with_providers(vec![
        Box::new(FailingProvider { category: "papers" }),
        Box::new(FailingProvider { category: "news" }),
        Box::new(FailingProvider { category: "web" }),
    ]);

    let report = searcher
        .build_report("Aruzhan Abil", &SearchOptions::default())
        .await
        .unwrap();

    let keys: Vec<&str> = report.categories.keys().map(String::as_str).collect();
    assert_eq!(keys, ["news", "papers", "web"]);
    assert!(report.summary.values().all(|&count| count == 0));
}

#[tokio::test]
async fn zero_configured_providers_still_produce_a_report() {
    let searcher = PersonSearcher::with_providers(vec![]);
    let report = searcher
        .build_report("Aruzhan Abil", &SearchOptions::default())
        .await
        .unwrap();
    assert!(report.categories.is_empty());
    assert!(report.summary.is_empty());
}
