// tests/export_render.rs
use std::collections::BTreeMap;

use person_search::export;
use person_search::report;
use person_search::{CategoryResults, Report, ResultRecord};
use serde_json::json;

fn record(source: &str, title: &str, url: &str, snippet: &str) -> ResultRecord {
    ResultRecord {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
        source_name: source.to_string(),
        score: None,
        extra: BTreeMap::new(),
    }
}

fn sample_report() -> Report {
    let mut papers = CategoryResults::new();
    papers.insert(
        "arxiv".to_string(),
        vec![{
            let mut rec = record(
                "arxiv",
                "Sparse Attention for Long-Context Retrieval",
                "http://arxiv.example/abs/2401.01001v1",
                "We study sparse attention mechanisms.",
            );
            rec.extra.insert("authors".to_string(), json!("Aruzhan Abil, Dana Bekova"));
            rec.extra.insert("year".to_string(), json!("2024"));
            rec
        }],
    );
    let mut news = CategoryResults::new();
    news.insert("google_news".to_string(), vec![]);
    let mut web = CategoryResults::new();
    web.insert(
        "general_search".to_string(),
        vec![
            record("general_search", "First hit", "https://web.example/1", &"long ".repeat(100)),
            record("general_search", "Second hit", "https://web.example/2", ""),
            record("general_search", "Third hit", "https://web.example/3", ""),
        ],
    );
    let mut datasets = CategoryResults::new();
    datasets.insert(
        "registry".to_string(),
        vec![record("registry", "A dataset", "https://data.example/1", "")],
    );

    let mut outputs = BTreeMap::new();
    outputs.insert("papers".to_string(), papers);
    outputs.insert("news".to_string(), news);
    outputs.insert("web".to_string(), web);
    outputs.insert("datasets".to_string(), datasets);
    report::build("Aruzhan Abil", outputs).unwrap()
}

#[test]
fn summary_orders_known_categories_then_alphabetical() {
    let report = sample_report();
    let out = export::render_summary(&report);

    let papers_at = out.find("Papers: 1").expect("papers line");
    let news_at = out.find("News: 0").expect("news line");
    let web_at = out.find("Web: 3").expect("web line");
    let datasets_at = out.find("Datasets: 1").expect("datasets line");
    assert!(papers_at < news_at && news_at < web_at && web_at < datasets_at);

    // per-source lines with humanized labels
    assert!(out.contains("  - Arxiv: 1"));
    assert!(out.contains("  - General Search: 3"));
    assert!(out.contains("Search summary for: Aruzhan Abil"));
}

#[test]
fn detail_caps_records_and_bounds_snippets() {
    let report = sample_report();
    let out = export::render_detail(&report, 2);

    assert!(out.contains("1. First hit"));
    assert!(out.contains("2. Second hit"));
    assert!(!out.contains("Third hit"));

    // snippet bounded with an ellipsis
    assert!(out.contains("..."));
    assert!(!out.contains(&"long ".repeat(100)));

    // paper extras rendered
    assert!(out.contains("Authors: Aruzhan Abil, Dana Bekova"));
    assert!(out.contains("Year: 2024"));
    assert!(out.contains("URL: http://arxiv.example/abs/2401.01001v1"));
}

#[test]
fn detail_skips_empty_sources() {
    let report = sample_report();
    let out = export::render_detail(&report, 5);
    assert!(!out.contains("Google News:"));
}
