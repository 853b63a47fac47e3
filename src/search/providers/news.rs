// src/search/providers/news.rs
//! News adapter: Google News (SerpAPI when keyed, basic result scrape
//! otherwise) plus configured university newsroom pages.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SearchConfig;
use crate::search::types::{
    CategoryResults, ResultRecord, SearchFilters, SearchProvider, SourceGroup,
};
use crate::search::{clean_text, dedup_by_url, http_client, pace};

const GOOGLE_SEARCH: &str = "https://www.google.com/search";
const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// Anchor texts shorter than this are navigation chrome, not articles.
const MIN_ARTICLE_TITLE_LEN: usize = 20;
/// How many anchors of a newsroom page to inspect before giving up.
const MAX_ANCHORS_SCANNED: usize = 40;

pub struct NewsSearchProvider {
    client: reqwest::Client,
    serpapi_key: Option<String>,
    pacing_delay: Duration,
    university_sites: BTreeMap<String, String>,
}

impl NewsSearchProvider {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: http_client(config.request_timeout),
            serpapi_key: config.serpapi_key.clone(),
            pacing_delay: config.pacing_delay,
            university_sites: config.university_sites.clone(),
        }
    }

    async fn fetch_news_serpapi(
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
                ("q", query.as_str()),
                ("tbm", "nws"),
                ("num", num.as_str()),
                ("api_key", key),
            ])
            .send()
            .await
            .context("serpapi news http get")?
            .error_for_status()
            .context("serpapi news http status")?
            .text()
            .await
            .context("serpapi news http body")?;
        parse_serpapi_news(&body, max_results)
    }

    async fn fetch_news_scrape(
        &self,
        person_name: &str,
        max_results: usize,
    ) -> Result<SourceGroup> {
        let body = self
            .client
            .get(GOOGLE_SEARCH)
            .query(&[("q", person_name), ("tbm", "nws")])
            .send()
            .await
            .context("news scrape http get")?
            .error_for_status()
            .context("news scrape http status")?
            .text()
            .await
            .context("news scrape http body")?;
        Ok(parse_news_html(&body, max_results))
    }

    /// Enhanced tier (SerpAPI) -> basic result scrape -> empty.
    async fn google_news_group(&self, person_name: &str, max_results: usize) -> SourceGroup {
        if let Some(key) = self.serpapi_key.as_deref() {
            match self.fetch_news_serpapi(key, person_name, max_results).await {
                Ok(group) => return group,
                Err(error) => {
                    tracing::warn!(source = "google_news", error = ?error, "enhanced news search failed, falling back to basic scrape");
                    pace(self.pacing_delay).await;
                }
            }
        }
        match self.fetch_news_scrape(person_name, max_results).await {
            Ok(group) => group,
            Err(error) => {
                tracing::warn!(source = "google_news", error = ?error, "news scrape failed, returning empty group");
                SourceGroup::new()
            }
        }
    }

    async fn university_group(
        &self,
        person_name: &str,
        university: Option<&str>,
        max_results: usize,
    ) -> SourceGroup {
        let sites: Vec<(String, String)> = match university {
            Some(name) => {
                let key = name.trim().to_lowercase();
                match self.university_sites.get(&key) {
                    Some(url) => vec![(key, url.clone())],
                    None => {
                        tracing::warn!(
                            university = name,
                            "university not in configured sites, skipping targeted news search"
                        );
                        return SourceGroup::new();
                    }
                }
            }
            None => self
                .university_sites
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        };

        let mut out = SourceGroup::new();
        let mut first = true;
        for (uni, base_url) in sites {
            if !first {
                pace(self.pacing_delay).await;
            }
            first = false;
            match self.fetch_university_page(&base_url, person_name).await {
                Ok(body) => out.extend(parse_university_page(&body, &base_url, person_name, &uni)),
                Err(error) => {
                    tracing::warn!(source = "university_news", university = %uni, error = ?error, "newsroom fetch failed");
                }
            }
        }
        let mut out = dedup_by_url(out);
        out.truncate(max_results);
        out
    }

    async fn fetch_university_page(&self, base_url: &str, person_name: &str) -> Result<String> {
        // Newsroom search endpoints take the query appended to the base URL.
        let url = format!("{base_url}{}", person_name.replace(' ', "+"));
        self.client
            .get(&url)
            .send()
            .await
            .context("newsroom http get")?
            .error_for_status()
            .context("newsroom http status")?
            .text()
            .await
            .context("newsroom http body")
    }
}

#[async_trait]
impl SearchProvider for NewsSearchProvider {
    async fn search_all(
        &self,
        person_name: &str,
        filters: &SearchFilters,
    ) -> Result<CategoryResults> {
        let mut out = CategoryResults::new();
        out.insert(
            "google_news".to_string(),
            self.google_news_group(person_name, filters.max_results).await,
        );
        pace(self.pacing_delay).await;
        out.insert(
            "university_news".to_string(),
            self.university_group(person_name, filters.university.as_deref(), filters.max_results)
                .await,
        );
        Ok(out)
    }

    fn category(&self) -> &'static str {
        "news"
    }
}

// ---- SerpAPI news payload ----

#[derive(Debug, Deserialize)]
struct NewsPayload {
    #[serde(default)]
    news_results: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    date: Option<String>,
    source: Option<NewsSource>,
}

/// SerpAPI has shipped `source` both as an object and a bare string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NewsSource {
    Named { name: Option<String> },
    Plain(String),
}

impl NewsSource {
    fn name(&self) -> Option<&str> {
        match self {
            NewsSource::Named { name } => name.as_deref(),
            NewsSource::Plain(s) => Some(s.as_str()),
        }
    }
}

pub fn parse_serpapi_news(body: &str, max_results: usize) -> Result<SourceGroup> {
    let payload: NewsPayload = serde_json::from_str(body).context("parsing serpapi news payload")?;

    let mut out = Vec::new();
    for item in payload.news_results.into_iter().take(max_results) {
        let title = clean_text(item.title.as_deref().unwrap_or_default());
        let url = item.link.unwrap_or_default().trim().to_string();
        if title.is_empty() || url.is_empty() {
            continue;
        }

        let mut extra = BTreeMap::new();
        if let Some(name) = item.source.as_ref().and_then(|s| s.name()) {
            extra.insert("publisher".to_string(), json!(name));
        }
        if let Some(date) = item.date {
            extra.insert("date".to_string(), json!(date));
        }
        extra.insert("search_type".to_string(), json!("Google News"));

        out.push(ResultRecord {
            title,
            url,
            snippet: clean_text(item.snippet.as_deref().unwrap_or_default()),
            source_name: "google_news".to_string(),
            score: None,
            extra,
        });
    }
    Ok(dedup_by_url(out))
}

// ---- Google News result-page scrape (degraded tier) ----

pub fn parse_news_html(html: &str, max_results: usize) -> SourceGroup {
    static RE_HEADING: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_heading = RE_HEADING.get_or_init(|| {
        regex::Regex::new(r#"(?is)<div[^>]*role="heading"[^>]*>(.*?)</div>"#).unwrap()
    });
    static RE_LINK: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_link =
        RE_LINK.get_or_init(|| regex::Regex::new(r#"(?is)<a[^>]+href="([^"]+)""#).unwrap());
    static RE_SOURCE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_source = RE_SOURCE.get_or_init(|| {
        regex::Regex::new(r#"(?is)<div class="MgUUmf[^"]*"[^>]*>(.*?)</div>"#).unwrap()
    });
    static RE_SNIPPET: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_snippet = RE_SNIPPET.get_or_init(|| {
        regex::Regex::new(r#"(?is)<div class="GI74Re[^"]*"[^>]*>(.*?)</div>"#).unwrap()
    });

    let mut out = Vec::new();
    for block in html.split(r#"<div class="SoaBEf""#).skip(1) {
        if out.len() >= max_results {
            break;
        }
        let title = match re_heading.captures(block) {
            Some(c) => clean_text(&c[1]),
            None => continue,
        };
        let url = match re_link.captures(block) {
            Some(c) => c[1].trim().to_string(),
            None => continue,
        };
        if title.is_empty() || url.is_empty() {
            continue;
        }

        let mut extra = BTreeMap::new();
        if let Some(c) = re_source.captures(block) {
            extra.insert("publisher".to_string(), json!(clean_text(&c[1])));
        }
        extra.insert("search_type".to_string(), json!("Google News (Basic)"));

        out.push(ResultRecord {
            title,
            url,
            snippet: re_snippet
                .captures(block)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default(),
            source_name: "google_news".to_string(),
            score: None,
            extra,
        });
    }
    dedup_by_url(out)
}

// ---- University newsroom pages ----

/// Pull likely article links out of a newsroom search page: anchors whose
/// text is long enough and mentions the person.
pub fn parse_university_page(
    html: &str,
    base_url: &str,
    person_name: &str,
    university: &str,
) -> SourceGroup {
    static RE_ANCHOR: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_anchor = RE_ANCHOR.get_or_init(|| {
        regex::Regex::new(r#"(?is)<a\s[^>]*href="([^"]+)"[^>]*>(.*?)</a>"#).unwrap()
    });

    let needle = person_name.to_lowercase();
    let site_root = base_url
        .split('?')
        .next()
        .unwrap_or(base_url)
        .trim_end_matches('/');
    let label = format!("{} News", university.to_uppercase());

    let mut out = SourceGroup::new();
    for caps in re_anchor.captures_iter(html).take(MAX_ANCHORS_SCANNED) {
        let text = clean_text(&caps[2]);
        if text.len() <= MIN_ARTICLE_TITLE_LEN || !text.to_lowercase().contains(&needle) {
            continue;
        }
        let href = caps[1].trim();
        let url = if href.starts_with("http") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{site_root}{href}")
        } else {
            format!("{site_root}/{href}")
        };

        let snippet: String = text.chars().take(200).collect();
        out.push(ResultRecord {
            title: text,
            url,
            snippet,
            source_name: "university_news".to_string(),
            score: None,
            extra: BTreeMap::from([
                ("publisher".to_string(), json!(label.clone())),
                ("search_type".to_string(), json!("University News")),
            ]),
        });
    }
    dedup_by_url(out)
}
