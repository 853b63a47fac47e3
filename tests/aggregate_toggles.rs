// tests/aggregate_toggles.rs
use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use person_search::{
    CategoryResults, PersonSearcher, ResultRecord, SearchError, SearchFilters, SearchOptions,
    SearchProvider,
};

struct StaticProvider {
    category: &'static str,
    groups: Vec<(&'static str, Vec<ResultRecord>)>,
}

#[async_trait]
impl SearchProvider for StaticProvider {
    async fn search_all(
        &self,
        _person_name: &str,
        _filters: &SearchFilters,
    ) -> Result<CategoryResults> {
        Ok(self
            .groups
            .iter()
            .map(|(source, group)| (source.to_string(), group.clone()))
            .collect())
    }

    fn category(&self) -> &'static str {
        self.category
    }
}

fn record(source: &str, title: &str, url: &str) -> ResultRecord {
    ResultRecord {
        title: title.to_string(),
        url: url.to_string(),
        snippet: String::new(),
        source_name: source.to_string(),
        score: None,
        extra: BTreeMap::new(),
    }
}

fn three_category_searcher() -> PersonSearcher {
    PersonSearcher::with_providers(vec![
        Box::new(StaticProvider {
            category: "papers",
            groups: vec![
                ("arxiv", vec![record("arxiv", "P1", "https://arxiv.example/abs/1")]),
                ("google_scholar", vec![]),
            ],
        }),
        Box::new(StaticProvider {
            category: "news",
            groups: vec![("google_news", vec![])],
        }),
        Box::new(StaticProvider {
            category: "web",
            groups: vec![(
                "general_search",
                vec![record("general_search", "W1", "https://web.example/1")],
            )],
        }),
    ])
}

#[tokio::test]
async fn enabled_toggles_define_category_keys() {
    let searcher = three_category_searcher();
    let options = SearchOptions {
        university: Some("Columbia".to_string()),
        search_web: false,
        ..Default::default()
    };

    let report = searcher.build_report("Aruzhan Abil", &options).await.unwrap();

    let keys: Vec<&str> = report.categories.keys().map(String::as_str).collect();
    assert_eq!(keys, ["news", "papers"]);
    assert!(!report.categories.contains_key("web"));
    assert_eq!(report.summary.len(), 2);
    assert_eq!(report.summary["papers"], 1);
    assert_eq!(report.summary["news"], 0);
}

#[tokio::test]
async fn all_categories_present_by_default() {
    let searcher = three_category_searcher();
    let report = searcher
        .build_report("Aruzhan Abil", &SearchOptions::default())
        .await
        .unwrap();

    let keys: Vec<&str> = report.categories.keys().map(String::as_str).collect();
    assert_eq!(keys, ["news", "papers", "web"]);
    assert_eq!(report.summary["web"], 1);
}

#[tokio::test]
async fn searched_but_empty_differs_from_disabled() {
    let searcher = three_category_searcher();
    let options = SearchOptions {
        search_papers: false,
        ..Default::default()
    };
    let report = searcher.build_report("Aruzhan Abil", &options).await.unwrap();

    // news was searched and found nothing; papers was never searched
    assert!(report.categories.contains_key("news"));
    assert_eq!(report.summary["news"], 0);
    assert!(!report.categories.contains_key("papers"));
    assert!(!report.summary.contains_key("papers"));
}

#[tokio::test]
async fn empty_and_whitespace_names_fail_fast() {
    let searcher = three_category_searcher();
    for name in ["", "   ", "\t\n"] {
        let err = searcher
            .build_report(name, &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidQuery), "name {name:?}");
    }
    // options make no difference
    let err = searcher
        .build_report(
            "",
            &SearchOptions {
                search_papers: false,
                search_news: false,
                search_web: false,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery));
}

#[tokio::test]
async fn name_is_trimmed_before_use() {
    let searcher = three_category_searcher();
    let report = searcher
        .build_report("  Aruzhan Abil  ", &SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(report.person_name, "Aruzhan Abil");
}
