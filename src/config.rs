use std::{fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws";
pub const DEFAULT_POSTER_WORKERS: usize = 4;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the catalog backend, no trailing slash.
    pub api_base_url: String,
    /// Push-channel endpoint.
    pub ws_url: String,
    /// Query string appended to the initial movies fetch (e.g. "?page=2").
    pub movies_query: String,
    pub cache_dir: Option<String>,
    pub poster_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            movies_query: String::new(),
            cache_dir: None,
            poster_workers: DEFAULT_POSTER_WORKERS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    ws_url: Option<String>,
    movies_query: Option<String>,
    cache_dir: Option<String>,
    poster_workers: Option<usize>,
}

fn apply_raw(cfg: &mut AppConfig, parsed: RawConfig) {
    if let Some(base) = parsed.api_base_url {
        cfg.api_base_url = base.trim_end_matches('/').to_string();
    }
    if let Some(ws) = parsed.ws_url {
        cfg.ws_url = ws;
    }
    if let Some(q) = parsed.movies_query {
        // Accept both "page=2" and "?page=2" spellings.
        cfg.movies_query = if q.is_empty() || q.starts_with('?') {
            q
        } else {
            format!("?{q}")
        };
    }
    if parsed.cache_dir.is_some() {
        cfg.cache_dir = parsed.cache_dir;
    }
    if let Some(n) = parsed.poster_workers {
        cfg.poster_workers = n.clamp(1, 16);
    }
}

pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from("config.json");
    let mut cfg = AppConfig::default();

    match fs::read_to_string(&cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                apply_raw(&mut cfg, parsed);
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse config.json ({}). Using defaults.", err);
            }
        },
        Err(_) => {
            info!("No config.json found; using defaults");
        }
    }

    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> AppConfig {
        let mut cfg = AppConfig::default();
        apply_raw(&mut cfg, serde_json::from_str(raw).unwrap());
        cfg
    }

    #[test]
    fn defaults_when_keys_missing() {
        let cfg = parse("{}");
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE);
        assert_eq!(cfg.ws_url, DEFAULT_WS_URL);
        assert_eq!(cfg.movies_query, "");
        assert_eq!(cfg.poster_workers, DEFAULT_POSTER_WORKERS);
    }

    #[test]
    fn trims_trailing_slash_on_base_url() {
        let cfg = parse(r#"{"api_base_url":"http://vod.example:9000/"}"#);
        assert_eq!(cfg.api_base_url, "http://vod.example:9000");
    }

    #[test]
    fn normalizes_movies_query() {
        assert_eq!(parse(r#"{"movies_query":"page=2"}"#).movies_query, "?page=2");
        assert_eq!(parse(r#"{"movies_query":"?page=2"}"#).movies_query, "?page=2");
        assert_eq!(parse(r#"{"movies_query":""}"#).movies_query, "");
    }

    #[test]
    fn clamps_poster_workers() {
        assert_eq!(parse(r#"{"poster_workers":99}"#).poster_workers, 16);
        assert_eq!(parse(r#"{"poster_workers":0}"#).poster_workers, 1);
    }
}
