// src/export.rs
//! Rendering and persistence of a finished [`Report`].

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SearchError;
use crate::report::Report;

/// Fixed display order; any further categories follow alphabetically.
const CATEGORY_ORDER: [&str; 3] = ["papers", "news", "web"];

const RULE_WIDTH: usize = 72;
const SNIPPET_DISPLAY_MAX: usize = 160;

fn ordered_categories(report: &Report) -> Vec<&String> {
    let mut ordered: Vec<&String> = Vec::with_capacity(report.categories.len());
    for name in CATEGORY_ORDER {
        if let Some((key, _)) = report.categories.get_key_value(name) {
            ordered.push(key);
        }
    }
    for key in report.categories.keys() {
        if !CATEGORY_ORDER.contains(&key.as_str()) {
            ordered.push(key);
        }
    }
    ordered
}

/// Per-category and per-source counts, stable ordering.
pub fn render_summary(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Search summary for: {}", report.person_name);
    let _ = writeln!(out, "Generated: {}", report.timestamp.to_rfc3339());
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    for category in ordered_categories(report) {
        let count = report.summary.get(category).copied().unwrap_or(0);
        let _ = writeln!(out, "{}: {}", title_case(category), count);
        if let Some(groups) = report.categories.get(category) {
            for (source, group) in groups {
                let _ = writeln!(out, "  - {}: {}", display_source(source), group.len());
            }
        }
    }
    out
}

/// Up to `max_per_source` records per source with title, url and a bounded
/// snippet, in group order.
pub fn render_detail(report: &Report, max_per_source: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Detailed results for: {}", report.person_name);
    for category in ordered_categories(report) {
        let groups = match report.categories.get(category) {
            Some(g) => g,
            None => continue,
        };
        let _ = writeln!(out, "\n{}", title_case(category).to_uppercase());
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
        for (source, group) in groups {
            if group.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{}:", display_source(source));
            for (i, rec) in group.iter().take(max_per_source).enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, rec.title);
                let _ = writeln!(out, "   URL: {}", rec.url);
                for (key, heading) in [
                    ("authors", "Authors"),
                    ("year", "Year"),
                    ("venue", "Venue"),
                    ("citations", "Citations"),
                    ("publisher", "Source"),
                    ("date", "Date"),
                ] {
                    if let Some(value) = rec.extra.get(key) {
                        let rendered = scalar_to_string(value);
                        if !rendered.is_empty() {
                            let _ = writeln!(out, "   {heading}: {rendered}");
                        }
                    }
                }
                if !rec.snippet.is_empty() {
                    let _ = writeln!(out, "   {}", truncate_display(&rec.snippet));
                }
            }
        }
    }
    out
}

/// Write the report as pretty JSON into `destination`; the file name embeds
/// the person slug and the report timestamp.
pub fn persist(report: &Report, destination: &Path) -> Result<PathBuf, SearchError> {
    let file_name = format!(
        "search_results_{}_{}.json",
        slug(&report.person_name),
        report.timestamp.format("%Y%m%d_%H%M%S")
    );
    let path = destination.join(file_name);

    let json = serde_json::to_string_pretty(report).map_err(|e| SearchError::Persistence {
        path: path.clone(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    fs::write(&path, json).map_err(|source| SearchError::Persistence {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Filesystem-safe token from a person name: lowercase, spaces to
/// underscores, everything else non-alphanumeric stripped.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.trim().to_lowercase().chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if ch.is_whitespace() && !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn display_source(source: &str) -> String {
    match source.split_once(':') {
        Some((prefix, rest)) => format!("{} ({rest})", title_case(prefix)),
        None => title_case(source),
    }
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_display(s: &str) -> String {
    if s.chars().count() > SNIPPET_DISPLAY_MAX {
        let cut: String = s.chars().take(SNIPPET_DISPLAY_MAX).collect();
        format!("{}...", cut.trim_end())
    } else {
        s.to_string()
    }
}
