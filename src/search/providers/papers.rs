// src/search/providers/papers.rs
//! Academic papers adapter: arXiv Atom API plus Google Scholar
//! (SerpAPI when keyed, result-page scrape otherwise).

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::search::types::{
    CategoryResults, ResultRecord, SearchFilters, SearchProvider, SourceGroup,
};
use crate::search::{clean_text, dedup_by_url, http_client, pace};

const ARXIV_API: &str = "http://export.arxiv.org/api/query";
const SCHOLAR_URL: &str = "https://scholar.google.com/scholar";
const SERPAPI_URL: &str = "https://serpapi.com/search.json";

pub struct PaperSearchProvider {
    client: reqwest::Client,
    serpapi_key: Option<String>,
    pacing_delay: Duration,
}

impl PaperSearchProvider {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: http_client(config.request_timeout),
            serpapi_key: config.serpapi_key.clone(),
            pacing_delay: config.pacing_delay,
        }
    }

    async fn fetch_arxiv(&self, person_name: &str, max_results: usize) -> Result<SourceGroup> {
        let query = format!("au:\"{person_name}\"");
        let num = max_results.to_string();
        let body = self
            .client
            .get(ARXIV_API)
            .query(&[
                ("search_query", query.as_str()),
                ("start", "0"),
                ("max_results", num.as_str()),
            ])
            .send()
            .await
            .context("arxiv http get")?
            .error_for_status()
            .context("arxiv http status")?
            .text()
            .await
            .context("arxiv http body")?;
        parse_arxiv_feed(&body, max_results)
    }

    async fn fetch_scholar_serpapi(
        &self,
        key: &str,
        person_name: &str,
        max_results: usize,
    ) -> Result<SourceGroup> {
        let query = format!("\"{person_name}\"");
        let num = max_results.to_string();
        let body = self
            .client
            .get(SERPAPI_URL)
            .query(&[
                ("engine", "google_scholar"),
                ("q", query.as_str()),
                ("num", num.as_str()),
                ("api_key", key),
            ])
            .send()
            .await
            .context("serpapi scholar http get")?
            .error_for_status()
            .context("serpapi scholar http status")?
            .text()
            .await
            .context("serpapi scholar http body")?;
        parse_serpapi_scholar(&body, max_results)
    }

    async fn fetch_scholar_scrape(
        &self,
        person_name: &str,
        max_results: usize,
    ) -> Result<SourceGroup> {
        let query = format!("\"{person_name}\"");
        let body = self
            .client
            .get(SCHOLAR_URL)
            .query(&[("q", query.as_str()), ("hl", "en")])
            .send()
            .await
            .context("scholar http get")?
            .error_for_status()
            .context("scholar http status")?
            .text()
            .await
            .context("scholar http body")?;
        Ok(parse_scholar_html(&body, max_results))
    }

    /// Enhanced tier (SerpAPI) -> basic page scrape -> empty.
    async fn scholar_group(&self, person_name: &str, max_results: usize) -> SourceGroup {
        if let Some(key) = self.serpapi_key.as_deref() {
            match self.fetch_scholar_serpapi(key, person_name, max_results).await {
                Ok(group) => return group,
                Err(error) => {
                    tracing::warn!(source = "google_scholar", error = ?error, "enhanced scholar search failed, falling back to page scrape");
                    pace(self.pacing_delay).await;
                }
            }
        }
        match self.fetch_scholar_scrape(person_name, max_results).await {
            Ok(group) => group,
            Err(error) => {
                tracing::warn!(source = "google_scholar", error = ?error, "scholar scrape failed, returning empty group");
                SourceGroup::new()
            }
        }
    }

    async fn arxiv_group(&self, person_name: &str, max_results: usize) -> SourceGroup {
        match self.fetch_arxiv(person_name, max_results).await {
            Ok(group) => group,
            Err(error) => {
                tracing::warn!(source = "arxiv", error = ?error, "arxiv search failed, returning empty group");
                SourceGroup::new()
            }
        }
    }
}

#[async_trait]
impl SearchProvider for PaperSearchProvider {
    async fn search_all(
        &self,
        person_name: &str,
        filters: &SearchFilters,
    ) -> Result<CategoryResults> {
        let mut out = CategoryResults::new();
        out.insert(
            "google_scholar".to_string(),
            self.scholar_group(person_name, filters.max_results).await,
        );
        pace(self.pacing_delay).await;
        out.insert(
            "arxiv".to_string(),
            self.arxiv_group(person_name, filters.max_results).await,
        );
        Ok(out)
    }

    fn category(&self) -> &'static str {
        "papers"
    }
}

// ---- arXiv Atom feed ----

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<EntryAuthor>,
}

#[derive(Debug, Deserialize)]
struct EntryAuthor {
    name: Option<String>,
}

pub fn parse_arxiv_feed(xml: &str, max_results: usize) -> Result<SourceGroup> {
    let feed: Feed = from_str(xml).context("parsing arxiv atom feed")?;

    let mut out = Vec::with_capacity(feed.entries.len().min(max_results));
    for entry in feed.entries.into_iter().take(max_results) {
        let title = clean_text(entry.title.as_deref().unwrap_or_default());
        let url = entry.id.as_deref().unwrap_or_default().trim().to_string();
        if title.is_empty() || url.is_empty() {
            continue;
        }

        let authors: Vec<String> = entry
            .authors
            .into_iter()
            .filter_map(|a| a.name)
            .map(|n| n.trim().to_string())
            .collect();
        // year from the RFC 3339 `published` element
        let year: String = entry
            .published
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(4)
            .collect();

        let mut extra = BTreeMap::new();
        extra.insert("authors".to_string(), json!(authors.join(", ")));
        if !year.is_empty() {
            extra.insert("year".to_string(), json!(year));
        }
        extra.insert("venue".to_string(), json!("arXiv"));

        out.push(ResultRecord {
            title,
            url,
            snippet: clean_text(entry.summary.as_deref().unwrap_or_default()),
            source_name: "arxiv".to_string(),
            score: None,
            extra,
        });
    }
    Ok(dedup_by_url(out))
}

// ---- SerpAPI Google Scholar ----

#[derive(Debug, Deserialize)]
struct ScholarPayload {
    #[serde(default)]
    organic_results: Vec<ScholarItem>,
}

#[derive(Debug, Deserialize)]
struct ScholarItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    publication_info: Option<PublicationInfo>,
    inline_links: Option<InlineLinks>,
}

#[derive(Debug, Deserialize)]
struct PublicationInfo {
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InlineLinks {
    cited_by: Option<CitedBy>,
}

#[derive(Debug, Deserialize)]
struct CitedBy {
    total: Option<u64>,
}

pub fn parse_serpapi_scholar(body: &str, max_results: usize) -> Result<SourceGroup> {
    let payload: ScholarPayload =
        serde_json::from_str(body).context("parsing serpapi scholar payload")?;

    let mut out = Vec::new();
    for item in payload.organic_results.into_iter().take(max_results) {
        let title = clean_text(item.title.as_deref().unwrap_or_default());
        let url = item.link.unwrap_or_default().trim().to_string();
        if title.is_empty() || url.is_empty() {
            continue;
        }

        let mut extra = BTreeMap::new();
        if let Some(summary) = item.publication_info.and_then(|p| p.summary) {
            extra.insert("authors".to_string(), json!(clean_text(&summary)));
        }
        if let Some(total) = item.inline_links.and_then(|l| l.cited_by).and_then(|c| c.total) {
            extra.insert("citations".to_string(), json!(total));
        }
        extra.insert("search_type".to_string(), json!("Google Scholar"));

        out.push(ResultRecord {
            title,
            url,
            snippet: clean_text(item.snippet.as_deref().unwrap_or_default()),
            source_name: "google_scholar".to_string(),
            score: None,
            extra,
        });
    }
    Ok(dedup_by_url(out))
}

// ---- Scholar result-page scrape (degraded tier) ----

pub fn parse_scholar_html(html: &str, max_results: usize) -> SourceGroup {
    static RE_LINK: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_link = RE_LINK
        .get_or_init(|| regex::Regex::new(r#"(?is)<a[^>]+href="([^"]+)"[^>]*>(.*?)</a>"#).unwrap());
    static RE_SNIPPET: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_snippet = RE_SNIPPET
        .get_or_init(|| regex::Regex::new(r#"(?is)<div class="gs_rs[^"]*">(.*?)</div>"#).unwrap());

    let mut out = Vec::new();
    for block in html.split(r#"<div class="gs_ri">"#).skip(1) {
        if out.len() >= max_results {
            break;
        }
        let caps = match re_link.captures(block) {
            Some(c) => c,
            None => continue,
        };
        let url = caps[1].trim().to_string();
        let title = clean_text(&caps[2]);
        if title.is_empty() || !url.starts_with("http") {
            continue;
        }
        let snippet = re_snippet
            .captures(block)
            .map(|c| clean_text(&c[1]))
            .unwrap_or_default();

        out.push(ResultRecord {
            title,
            url,
            snippet,
            source_name: "google_scholar".to_string(),
            score: None,
            extra: BTreeMap::from([("search_type".to_string(), json!("Scholar (Basic)"))]),
        });
    }
    dedup_by_url(out)
}
