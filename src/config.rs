use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const ENV_FILE: &str = ".env";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub odds_feed: OddsFeedConfig,
    pub live_feed: LiveFeedConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

/// the-odds-api.com pre-match feed.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OddsFeedConfig {
    pub base_url: String,
    pub regions: String,
    pub markets: String,
    pub odds_format: String,
    pub request_timeout_ms: u64,
    pub football_sport: String,
    pub cricket_sport: String,
    pub football_limit: usize,
    pub cricket_limit: usize,
}

impl Default for OddsFeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.the-odds-api.com".to_string(),
            regions: "uk".to_string(),
            markets: "h2h".to_string(),
            odds_format: "decimal".to_string(),
            request_timeout_ms: 5000,
            football_sport: "soccer_epl".to_string(),
            cricket_sport: "cricket".to_string(),
            football_limit: 15,
            cricket_limit: 10,
        }
    }
}

/// BetsAPI-style in-play feed.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LiveFeedConfig {
    pub base_url: String,
    pub sport_id: u32,
    pub request_timeout_ms: u64,
    pub event_limit: usize,
}

impl Default for LiveFeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.b365api.com".to_string(),
            sport_id: 3, // cricket
            request_timeout_ms: 10000,
            event_limit: 10,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config TOML")
    }

    /// Like `load`, but a missing file means built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let content = match std::fs::read_to_string(ENV_FILE) {
            Ok(c) => c,
            Err(_) => return,
        };
        for (key, value) in parse_env_lines(&content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }

    /// the-odds-api key. `None` leaves the pre-match routes serving `[]`.
    pub fn odds_api_key() -> Option<String> {
        non_empty_env("ODDS_API_KEY")
    }

    /// BetsAPI token. `None` leaves `/api/live` serving `[]`.
    pub fn betsapi_token() -> Option<String> {
        non_empty_env("BETSAPI_TOKEN")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| sanitize_key(&v))
        .filter(|v| !v.is_empty())
}

/// Parse KEY=VALUE lines, skipping blanks and comments and stripping quotes.
fn parse_env_lines(content: &str) -> Vec<(String, String)> {
    // Strip BOM if present (common on Windows-created files)
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .map(|line| line.trim().trim_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Strip carriage returns, BOM, and other invisible chars from a key value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}
