// src/report.rs
// Pure data assembly; no network or I/O.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::search::dedup_by_url;
use crate::search::types::{CategoryResults, ResultRecord};

/// The aggregate result of one search invocation. Built once by
/// [`build`], immutable afterwards.
///
/// Serializes to the snapshot contract: top-level `person_name`,
/// `search_timestamp`, one key per enabled category (the flattened map),
/// and `summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub person_name: String,
    #[serde(rename = "search_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// category -> source_name -> group. A disabled category is absent
    /// here, which is distinct from "searched, zero results".
    #[serde(flatten)]
    pub categories: BTreeMap<String, CategoryResults>,
    /// category -> total records across its sources. Derived at build time.
    pub summary: BTreeMap<String, usize>,
}

/// Assemble a report from per-category adapter outputs.
///
/// Validates the adapter contract (every record carries a non-empty title
/// and url), enforces the per-group URL uniqueness invariant, computes the
/// summary counts and stamps the timestamp.
pub fn build(
    person_name: &str,
    outputs: BTreeMap<String, CategoryResults>,
) -> Result<Report, SearchError> {
    let mut categories: BTreeMap<String, CategoryResults> = BTreeMap::new();
    let mut summary: BTreeMap<String, usize> = BTreeMap::new();

    for (category, groups) in outputs {
        let mut checked: CategoryResults = CategoryResults::new();
        for (source_name, group) in groups {
            validate_group(&category, &source_name, &group)?;
            checked.insert(source_name, dedup_by_url(group));
        }
        summary.insert(category.clone(), checked.values().map(Vec::len).sum());
        categories.insert(category, checked);
    }

    Ok(Report {
        person_name: person_name.to_string(),
        timestamp: Utc::now(),
        categories,
        summary,
    })
}

fn validate_group(
    category: &str,
    source_name: &str,
    group: &[ResultRecord],
) -> Result<(), SearchError> {
    for rec in group {
        if rec.title.trim().is_empty() {
            return Err(SearchError::MalformedAdapterOutput {
                category: category.to_string(),
                reason: format!("record from `{source_name}` has an empty title"),
            });
        }
        if rec.url.trim().is_empty() {
            return Err(SearchError::MalformedAdapterOutput {
                category: category.to_string(),
                reason: format!("record from `{source_name}` has an empty url"),
            });
        }
    }
    Ok(())
}
