// src/search/providers/web.rs
//! General web adapter backed by the Tavily API, with a basic Google
//! result scrape as the degraded tier, plus optional per-platform social
//! sub-sources.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::SearchConfig;
use crate::search::types::{
    CategoryResults, ResultRecord, SearchFilters, SearchProvider, SourceGroup,
};
use crate::search::{clean_text, dedup_by_url, http_client, pace};

const TAVILY_API: &str = "https://api.tavily.com/search";
const GOOGLE_SEARCH: &str = "https://www.google.com/search";

/// Secondary sub-sources (news/academic/podcasts) stay small regardless of
/// the caller's cap.
const SECONDARY_MAX_RESULTS: usize = 5;
const SOCIAL_MAX_RESULTS: usize = 3;

const SOCIAL_PLATFORMS: &[&str] = &[
    "medium.com",
    "dev.to",
    "stackoverflow.com",
    "reddit.com",
    "youtube.com",
];

pub struct WebSearchProvider {
    client: reqwest::Client,
    tavily_api_key: Option<String>,
    pacing_delay: Duration,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    title: Option<String>,
    url: Option<String>,
    content: Option<String>,
    score: Option<f64>,
}

impl WebSearchProvider {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: http_client(config.request_timeout),
            tavily_api_key: config.tavily_api_key.clone(),
            pacing_delay: config.pacing_delay,
        }
    }

    async fn fetch_tavily(
        &self,
        key: &str,
        query: &str,
        max_results: usize,
        topic: Option<&'static str>,
        source_name: &str,
    ) -> Result<SourceGroup> {
        let request = TavilyRequest {
            api_key: key,
            query,
            max_results,
            search_depth: "advanced",
            topic,
        };
        let body = self
            .client
            .post(TAVILY_API)
            .json(&request)
            .send()
            .await
            .context("tavily http post")?
            .error_for_status()
            .context("tavily http status")?
            .text()
            .await
            .context("tavily http body")?;
        parse_tavily(&body, source_name, max_results)
    }

    async fn fetch_google_scrape(
        &self,
        query: &str,
        max_results: usize,
        source_name: &str,
    ) -> Result<SourceGroup> {
        let num = max_results.to_string();
        let body = self
            .client
            .get(GOOGLE_SEARCH)
            .query(&[("q", query), ("num", num.as_str())])
            .send()
            .await
            .context("web scrape http get")?
            .error_for_status()
            .context("web scrape http status")?
            .text()
            .await
            .context("web scrape http body")?;
        Ok(parse_google_html(&body, source_name, max_results))
    }

    /// Enhanced tier (Tavily) -> basic result scrape -> empty.
    async fn tavily_or_scrape(
        &self,
        query: &str,
        max_results: usize,
        source_name: &str,
    ) -> SourceGroup {
        if let Some(key) = self.tavily_api_key.as_deref() {
            match self
                .fetch_tavily(key, query, max_results, None, source_name)
                .await
            {
                Ok(group) => return group,
                Err(error) => {
                    tracing::warn!(source = source_name, error = ?error, "tavily search failed, falling back to basic scrape");
                    pace(self.pacing_delay).await;
                }
            }
        }
        match self
            .fetch_google_scrape(query, max_results, source_name)
            .await
        {
            Ok(group) => group,
            Err(error) => {
                tracing::warn!(source = source_name, error = ?error, "basic scrape failed, returning empty group");
                SourceGroup::new()
            }
        }
    }

    /// Tavily-only: without a key this group stays empty rather than
    /// duplicating the news category's scrape.
    async fn news_mentions_group(&self, quoted: &str, max_results: usize) -> SourceGroup {
        let key = match self.tavily_api_key.as_deref() {
            Some(k) => k,
            None => {
                tracing::debug!(source = "news", "no tavily key configured, skipping news mentions");
                return SourceGroup::new();
            }
        };
        let query = format!("{quoted} news OR article OR featured");
        match self
            .fetch_tavily(key, &query, max_results, Some("news"), "news")
            .await
        {
            Ok(group) => group,
            Err(error) => {
                tracing::warn!(source = "news", error = ?error, "tavily news search failed, returning empty group");
                SourceGroup::new()
            }
        }
    }
}

#[async_trait]
impl SearchProvider for WebSearchProvider {
    async fn search_all(
        &self,
        person_name: &str,
        filters: &SearchFilters,
    ) -> Result<CategoryResults> {
        let quoted = format!("\"{person_name}\"");
        let secondary_max = filters.max_results.min(SECONDARY_MAX_RESULTS);
        let mut out = CategoryResults::new();

        out.insert(
            "general_search".to_string(),
            self.tavily_or_scrape(&quoted, filters.max_results, "general_search")
                .await,
        );
        pace(self.pacing_delay).await;
        out.insert(
            "news".to_string(),
            self.news_mentions_group(&quoted, secondary_max).await,
        );
        pace(self.pacing_delay).await;
        out.insert(
            "academic".to_string(),
            self.tavily_or_scrape(
                &format!("{quoted} research OR paper OR publication OR scholar OR university"),
                secondary_max,
                "academic",
            )
            .await,
        );
        pace(self.pacing_delay).await;
        out.insert(
            "podcasts_interviews".to_string(),
            self.tavily_or_scrape(
                &format!("{quoted} podcast OR interview OR talk OR guest OR speaker"),
                secondary_max,
                "podcasts_interviews",
            )
            .await,
        );

        if filters.include_social {
            for platform in SOCIAL_PLATFORMS {
                pace(self.pacing_delay).await;
                let source_name = format!("social:{platform}");
                let group = self
                    .tavily_or_scrape(
                        &format!("{quoted} site:{platform}"),
                        SOCIAL_MAX_RESULTS,
                        &source_name,
                    )
                    .await;
                out.insert(source_name, group);
            }
        }

        Ok(out)
    }

    fn category(&self) -> &'static str {
        "web"
    }
}

pub fn parse_tavily(body: &str, source_name: &str, max_results: usize) -> Result<SourceGroup> {
    let payload: TavilyResponse = serde_json::from_str(body).context("parsing tavily response")?;

    let mut out = Vec::new();
    for hit in payload.results.into_iter().take(max_results) {
        let title = clean_text(hit.title.as_deref().unwrap_or_default());
        let url = hit.url.unwrap_or_default().trim().to_string();
        if title.is_empty() || url.is_empty() {
            continue;
        }
        out.push(ResultRecord {
            title,
            url,
            snippet: clean_text(hit.content.as_deref().unwrap_or_default()),
            source_name: source_name.to_string(),
            score: hit.score,
            extra: BTreeMap::from([("search_type".to_string(), json!("Tavily Search"))]),
        });
    }
    Ok(dedup_by_url(out))
}

// ---- Google result-page scrape (degraded tier) ----

pub fn parse_google_html(html: &str, source_name: &str, max_results: usize) -> SourceGroup {
    static RE_TITLE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_title =
        RE_TITLE.get_or_init(|| regex::Regex::new(r"(?is)<h3[^>]*>(.*?)</h3>").unwrap());
    static RE_LINK: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_link =
        RE_LINK.get_or_init(|| regex::Regex::new(r#"(?is)<a[^>]+href="([^"]+)""#).unwrap());
    static RE_SNIPPET: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_snippet = RE_SNIPPET.get_or_init(|| {
        regex::Regex::new(r#"(?is)<(?:div class="VwiC3b|span class="aCOpRe)[^"]*"[^>]*>(.*?)</(?:div|span)>"#)
            .unwrap()
    });

    let mut out = Vec::new();
    for (i, block) in html.split(r#"<div class="g">"#).skip(1).enumerate() {
        if out.len() >= max_results {
            break;
        }
        let title = match re_title.captures(block) {
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

        out.push(ResultRecord {
            title,
            url,
            snippet: re_snippet
                .captures(block)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default(),
            source_name: source_name.to_string(),
            // mirror the descending pseudo-relevance the basic tier reports
            score: Some(1.0 - ((i + 1) as f64) * 0.05),
            extra: BTreeMap::from([("search_type".to_string(), json!("Basic Search"))]),
        });
    }
    dedup_by_url(out)
}
