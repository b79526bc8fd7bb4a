use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

pub const LOCAL_API_URL: &str = "http://localhost:8000";
pub const HOSTED_API_URL: &str = "https://opposition-planner-api.up.railway.app";

const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const PRESENTATION_TIMEOUT_SECS: u64 = 300;
const DEFAULT_FETCH_PARALLELISM: usize = 6;

/// Raw inputs for base URL resolution, captured once at startup.
#[derive(Debug, Clone, Default)]
pub struct ApiEnv {
    pub api_base_url: Option<String>,
    pub environment: Option<String>,
    pub production_url: Option<String>,
    pub hostname: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub fetch_parallelism: Option<usize>,
}

impl ApiEnv {
    pub fn from_env() -> Self {
        Self {
            api_base_url: non_empty_var("OPP_API_BASE_URL"),
            environment: non_empty_var("OPP_ENVIRONMENT"),
            production_url: non_empty_var("OPP_PRODUCTION_API_URL"),
            hostname: non_empty_var("OPP_HOSTNAME").or_else(|| non_empty_var("HOSTNAME")),
            request_timeout_secs: non_empty_var("OPP_REQUEST_TIMEOUT_SECS")
                .and_then(|val| val.parse::<u64>().ok()),
            fetch_parallelism: non_empty_var("FETCH_PARALLELISM")
                .and_then(|val| val.parse::<usize>().ok()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    Override,
    Environment,
    Hostname,
    Default,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub source: BaseUrlSource,
    pub environment: String,
    pub request_timeout: Duration,
    pub presentation_timeout: Duration,
    pub fetch_parallelism: usize,
}

impl ApiConfig {
    /// Resolution order: explicit override, then the production URL when the
    /// environment is `production`, then localhost, then the hosted default.
    pub fn resolve(raw: &ApiEnv) -> Self {
        let environment = raw
            .environment
            .clone()
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
            .to_lowercase();

        let (base_url, source) = if let Some(url) = raw.api_base_url.as_ref() {
            (url.clone(), BaseUrlSource::Override)
        } else if let (Some(url), "production") = (raw.production_url.as_ref(), environment.as_str())
        {
            (url.clone(), BaseUrlSource::Environment)
        } else if is_local_host(raw.hostname.as_deref().unwrap_or("localhost")) {
            (LOCAL_API_URL.to_string(), BaseUrlSource::Hostname)
        } else {
            (HOSTED_API_URL.to_string(), BaseUrlSource::Default)
        };

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            source,
            environment,
            request_timeout: Duration::from_secs(
                raw.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                    .max(1),
            ),
            presentation_timeout: Duration::from_secs(PRESENTATION_TIMEOUT_SECS),
            fetch_parallelism: raw
                .fetch_parallelism
                .unwrap_or(DEFAULT_FETCH_PARALLELISM)
                .clamp(2, 32),
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(&ApiEnv::from_env())
    }

    /// Builds `{base}/{segments...}?{query}` with each segment percent-encoded.
    pub fn endpoint_url(&self, segments: &[String], query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid api base url {}", self.base_url))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("api base url cannot take a path: {}", self.base_url))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

fn is_local_host(hostname: &str) -> bool {
    let host = hostname.trim();
    host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1"
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_everything() {
        let cfg = ApiConfig::resolve(&ApiEnv {
            api_base_url: Some("https://stats.example.com/".to_string()),
            environment: Some("production".to_string()),
            production_url: Some("https://prod.example.com".to_string()),
            hostname: Some("localhost".to_string()),
            ..ApiEnv::default()
        });
        assert_eq!(cfg.base_url, "https://stats.example.com");
        assert_eq!(cfg.source, BaseUrlSource::Override);
    }

    #[test]
    fn production_url_only_applies_in_production() {
        let raw = ApiEnv {
            production_url: Some("https://prod.example.com".to_string()),
            hostname: Some("analyst-box".to_string()),
            ..ApiEnv::default()
        };
        let dev = ApiConfig::resolve(&raw);
        assert_eq!(dev.base_url, HOSTED_API_URL);
        assert_eq!(dev.source, BaseUrlSource::Default);

        let prod = ApiConfig::resolve(&ApiEnv {
            environment: Some("Production".to_string()),
            ..raw
        });
        assert_eq!(prod.base_url, "https://prod.example.com");
        assert_eq!(prod.source, BaseUrlSource::Environment);
    }

    #[test]
    fn localhost_uses_local_backend() {
        let cfg = ApiConfig::resolve(&ApiEnv {
            hostname: Some("127.0.0.1".to_string()),
            ..ApiEnv::default()
        });
        assert_eq!(cfg.base_url, LOCAL_API_URL);
        assert_eq!(cfg.fetch_parallelism, 6);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn endpoint_url_encodes_names() {
        let cfg = ApiConfig::resolve(&ApiEnv {
            api_base_url: Some("http://localhost:8000".to_string()),
            ..ApiEnv::default()
        });
        let url = cfg
            .endpoint_url(
                &["player".to_string(), "MS Dhoni".to_string(), "insights".to_string()],
                &[("t", "42".to_string())],
            )
            .expect("url should build");
        assert_eq!(url.as_str(), "http://localhost:8000/player/MS%20Dhoni/insights?t=42");
    }
}
