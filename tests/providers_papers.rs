// tests/providers_papers.rs
// Offline parse tests against captured fixtures.

use person_search::search::providers::papers::{
    parse_arxiv_feed, parse_scholar_html, parse_serpapi_scholar,
};

#[test]
fn arxiv_feed_parses_and_dedups() {
    let xml = include_str!("fixtures/arxiv_atom.xml");
    let group = parse_arxiv_feed(xml, 10).unwrap();

    // four entries, one a trailing-slash duplicate
    assert_eq!(group.len(), 3);

    let first = &group[0];
    assert_eq!(first.title, "Sparse Attention for Long-Context Retrieval");
    assert_eq!(first.url, "http://arxiv.org/abs/2401.01001v1");
    assert_eq!(first.source_name, "arxiv");
    assert_eq!(first.extra["authors"], "Aruzhan Abil, Dana Bekova");
    assert_eq!(first.extra["year"], "2024");
    assert_eq!(first.extra["venue"], "arXiv");
    assert!(first.snippet.starts_with("We study sparse attention"));

    // provider order preserved
    assert_eq!(group[1].extra["year"], "2023");
    assert_eq!(group[2].extra["year"], "2021");
}

#[test]
fn arxiv_feed_respects_the_result_cap() {
    let xml = include_str!("fixtures/arxiv_atom.xml");
    let group = parse_arxiv_feed(xml, 1).unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group[0].url, "http://arxiv.org/abs/2401.01001v1");
}

#[test]
fn arxiv_garbage_is_a_parse_error() {
    assert!(parse_arxiv_feed("this is not xml <<<", 10).is_err());
}

#[test]
fn scholar_scrape_extracts_titles_links_and_snippets() {
    let html = include_str!("fixtures/scholar_results.html");
    let group = parse_scholar_html(html, 10);

    // third block has no link and is skipped
    assert_eq!(group.len(), 2);
    assert_eq!(group[0].title, "Sparse attention for long-context retrieval");
    assert_eq!(group[0].url, "https://dl.acm.org/doi/10.1145/3511808");
    assert!(group[0].snippet.contains("block-sparse pattern matches dense baselines"));
    assert_eq!(group[1].url, "https://aclanthology.org/2023.emnlp-main.512/");
}

#[test]
fn serpapi_scholar_payload_parses() {
    let body = include_str!("fixtures/serpapi_scholar.json");
    let group = parse_serpapi_scholar(body, 10).unwrap();

    // linkless citation entry is skipped
    assert_eq!(group.len(), 2);
    assert_eq!(group[0].extra["citations"], 17);
    assert_eq!(
        group[0].extra["authors"],
        "A Abil, D Bekova - Proceedings of CIKM, 2024 - dl.acm.org"
    );
    assert!(group[1].extra.get("citations").is_none());
}
