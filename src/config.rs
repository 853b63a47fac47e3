// src/config.rs
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_SITES_PATH: &str = "UNIVERSITY_SITES_PATH";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PACING_MS: u64 = 500;

/// Built-in newsroom search endpoints; a configured sites file replaces these.
const DEFAULT_UNIVERSITY_SITES: &[(&str, &str)] = &[
    ("columbia", "https://news.columbia.edu/?s="),
    ("cornell", "https://news.cornell.edu/?s="),
    ("harvard", "https://news.harvard.edu/gazette/?s="),
    ("mit", "https://news.mit.edu/search/"),
    ("princeton", "https://www.princeton.edu/search?q="),
    ("stanford", "https://news.stanford.edu/search/"),
    ("upenn", "https://penntoday.upenn.edu/?s="),
    ("yale", "https://news.yale.edu/search/"),
];

/// Process-wide configuration, loaded once at startup and passed explicitly
/// into the searcher. Credentials stay in memory only; they are never
/// written into the report snapshot.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Enhanced web search tier. Absent -> basic scraping.
    pub tavily_api_key: Option<String>,
    /// Enhanced Scholar/News tier. Absent -> basic scraping.
    pub serpapi_key: Option<String>,
    /// Per-call HTTP timeout; a timed-out call is a sub-source failure.
    pub request_timeout: Duration,
    /// Minimum delay between consecutive calls from one adapter.
    pub pacing_delay: Duration,
    /// university -> newsroom search URL (query string appended).
    pub university_sites: BTreeMap<String, String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            serpapi_key: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pacing_delay: Duration::from_millis(DEFAULT_PACING_MS),
            university_sites: default_university_sites(),
        }
    }
}

impl SearchConfig {
    /// Read credentials and knobs from the environment (after `dotenvy` has
    /// run). Missing or unparsable values fall back to defaults; this never
    /// fails so a zero-credential run still produces a usable config.
    pub fn from_env() -> Self {
        let request_timeout = non_empty_var("SEARCH_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let pacing_delay = non_empty_var("RATE_LIMIT_DELAY_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_PACING_MS));
        let university_sites = match load_university_sites_default() {
            Ok(sites) => sites,
            Err(error) => {
                tracing::warn!(error = ?error, "failed to load university sites, using built-in defaults");
                default_university_sites()
            }
        };
        Self {
            tavily_api_key: non_empty_var("TAVILY_API_KEY"),
            serpapi_key: non_empty_var("SERPAPI_KEY"),
            request_timeout,
            pacing_delay,
            university_sites,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn default_university_sites() -> BTreeMap<String, String> {
    DEFAULT_UNIVERSITY_SITES
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Load the sites table from an explicit path. Supports TOML or JSON.
pub fn load_university_sites_from(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading university sites from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sites(&content, ext.as_str())
}

/// Load the sites table using env var + fallbacks:
/// 1) $UNIVERSITY_SITES_PATH
/// 2) config/university_sites.toml
/// 3) config/university_sites.json
/// 4) built-in defaults
pub fn load_university_sites_default() -> Result<BTreeMap<String, String>> {
    if let Ok(p) = std::env::var(ENV_SITES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_university_sites_from(&pb);
        }
        return Err(anyhow!("UNIVERSITY_SITES_PATH points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/university_sites.toml");
    if toml_p.exists() {
        return load_university_sites_from(&toml_p);
    }
    let json_p = PathBuf::from("config/university_sites.json");
    if json_p.exists() {
        return load_university_sites_from(&json_p);
    }
    Ok(default_university_sites())
}

fn parse_sites(s: &str, hint_ext: &str) -> Result<BTreeMap<String, String>> {
    let try_toml = hint_ext == "toml" || s.contains("[universities]");
    if try_toml {
        if let Ok(v) = parse_sites_toml(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = parse_sites_json(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = parse_sites_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported university sites format"))
}

fn parse_sites_toml(s: &str) -> Result<BTreeMap<String, String>> {
    #[derive(serde::Deserialize)]
    struct SitesFile {
        universities: BTreeMap<String, String>,
    }
    let v: SitesFile = toml::from_str(s)?;
    Ok(clean_sites(v.universities))
}

fn parse_sites_json(s: &str) -> Result<BTreeMap<String, String>> {
    let v: BTreeMap<String, String> = serde_json::from_str(s)?;
    Ok(clean_sites(v))
}

fn clean_sites(map: BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.into_iter()
        .filter_map(|(k, v)| {
            let k = k.trim().to_lowercase();
            let v = v.trim().to_string();
            (!k.is_empty() && !v.is_empty()).then_some((k, v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn sites_parse_trims_lowercases_and_drops_empties() {
        let toml = r#"
[universities]
Columbia = " https://news.columbia.edu/?s= "
empty = ""
"#;
        let out = parse_sites_toml(toml).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out["columbia"], "https://news.columbia.edu/?s=");

        let json = r#"{"MIT": "https://news.mit.edu/search/", "": "https://x.example"}"#;
        let out = parse_sites_json(json).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out["mit"], "https://news.mit.edu/search/");
    }

    #[serial_test::serial]
    #[test]
    fn default_loader_prefers_env_then_files_then_builtins() {
        // Isolate CWD so a real config/ in the repo does not interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_SITES_PATH);

        // No files in temp CWD -> built-in defaults
        let v = load_university_sites_default().unwrap();
        assert_eq!(v, default_university_sites());

        // Env var takes precedence
        let p_json = tmp.path().join("sites.json");
        fs::write(&p_json, r#"{"columbia": "https://news.columbia.edu/?s="}"#).unwrap();
        env::set_var(ENV_SITES_PATH, p_json.display().to_string());
        let v2 = load_university_sites_default().unwrap();
        assert_eq!(v2.len(), 1);
        assert!(v2.contains_key("columbia"));
        env::remove_var(ENV_SITES_PATH);

        env::set_current_dir(&old).unwrap();
    }

    #[serial_test::serial]
    #[test]
    fn from_env_reads_credentials_and_knobs() {
        env::set_var("TAVILY_API_KEY", "tvly-test");
        env::set_var("SERPAPI_KEY", "  ");
        env::set_var("RATE_LIMIT_DELAY_MS", "250");
        let cfg = SearchConfig::from_env();
        assert_eq!(cfg.tavily_api_key.as_deref(), Some("tvly-test"));
        assert!(cfg.serpapi_key.is_none());
        assert_eq!(cfg.pacing_delay, Duration::from_millis(250));
        env::remove_var("TAVILY_API_KEY");
        env::remove_var("SERPAPI_KEY");
        env::remove_var("RATE_LIMIT_DELAY_MS");
    }
}
