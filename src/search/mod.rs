// src/search/mod.rs
pub mod providers;
pub mod types;

use std::collections::HashSet;
use std::time::Duration;

use crate::search::types::SourceGroup;

/// Browser User-Agent for the unauthenticated scrape paths. Pages served to
/// the default reqwest UA differ enough to break extraction.
pub(crate) const BROWSER_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Normalize scraped/feed text: decode entities, strip tags, collapse whitespace.
pub fn clean_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 2000 chars
    if out.chars().count() > 2000 {
        out = out.chars().take(2000).collect();
    }

    out
}

/// Dedup key for a record URL: trimmed, trailing slash stripped.
pub fn normalize_url(s: &str) -> String {
    s.trim().trim_end_matches('/').to_string()
}

/// Collapse records sharing a normalized URL to the first occurrence,
/// preserving order. Applied per sub-source group.
pub fn dedup_by_url(group: SourceGroup) -> SourceGroup {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(group.len());
    for rec in group {
        if seen.insert(normalize_url(&rec.url)) {
            keep.push(rec);
        }
    }
    keep
}

/// Fixed politeness delay between consecutive outbound calls from one
/// adapter. Not adaptive backoff.
pub(crate) async fn pace(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_UA)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
