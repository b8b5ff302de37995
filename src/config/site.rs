//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding `api.endpoint`
pub const ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";
/// Environment variable overriding `api.access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub url: String,
    pub logo: String,
    pub language: String,
    pub timezone: String,

    // Directory
    pub public_dir: String,

    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub reading: ReadingConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Ignite Blog".to_string(),
            description: String::new(),
            url: "http://localhost:3000".to_string(),
            logo: "/Logo.png".to_string(),
            language: "pt-BR".to_string(),
            timezone: "America/Sao_Paulo".to_string(),

            public_dir: "public".to_string(),

            api: ApiConfig::default(),
            reading: ReadingConfig::default(),
            navigation: NavigationConfig::default(),
            build: BuildConfig::default(),
            preview: PreviewConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `PRISMIC_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENDPOINT_ENV).ok(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|s| !s.is_empty()) {
            tracing::debug!("API endpoint overridden from environment");
            self.api.endpoint = endpoint;
        }
        if let Some(token) = token.filter(|s| !s.is_empty()) {
            self.api.access_token = Some(token);
        }
    }

    /// Resolve the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
            chrono_tz::UTC
        })
    }
}

/// Content API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Repository API root, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Custom type holding the blog posts
    pub document_type: String,
    /// Page size used when enumerating every post
    pub page_size: usize,
    pub timeout_secs: u64,
    /// How long a fetched master ref is reused before the API root is read again
    pub ref_ttl_secs: u64,
    /// Read documents from a local JSON file instead of the API
    pub fixture: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 100,
            timeout_secs: 30,
            ref_ttl_secs: 5,
            fixture: None,
        }
    }
}

/// Read-time estimate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}

/// How previous/next neighbours are queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NeighborPolicy {
    /// Previous by ascending first publication, next by descending last
    /// publication.
    #[default]
    Legacy,
    /// Both neighbours by first publication date.
    Chronological,
}

/// Navigation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NavigationConfig {
    pub policy: NeighborPolicy,
}

/// What the server does with a path that was not pre-rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Serve a loading placeholder while the page is generated
    #[default]
    Loading,
    /// Hold the request until the page is generated
    Blocking,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Number of posts assembled at once
    pub concurrency: usize,
    pub fallback: FallbackPolicy,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            fallback: FallbackPolicy::Loading,
        }
    }
}

/// Preview mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub cookie_name: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cookie_name: "ignite_preview".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Ignite Blog");
        assert_eq!(config.api.document_type, "posts");
        assert_eq!(config.reading.words_per_minute, 200);
        assert_eq!(config.navigation.policy, NeighborPolicy::Legacy);
        assert_eq!(config.build.fallback, FallbackPolicy::Loading);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
timezone: Europe/Lisbon
api:
  endpoint: https://example.cdn.prismic.io/api/v2
  page_size: 20
navigation:
  policy: chronological
build:
  fallback: blocking
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.api.endpoint, "https://example.cdn.prismic.io/api/v2");
        assert_eq!(config.api.page_size, 20);
        assert_eq!(config.api.document_type, "posts");
        assert_eq!(config.navigation.policy, NeighborPolicy::Chronological);
        assert_eq!(config.build.fallback, FallbackPolicy::Blocking);
        assert_eq!(config.build.concurrency, 4);
        assert_eq!(config.tz(), chrono_tz::Europe::Lisbon);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SiteConfig::default();
        config.apply_overrides(
            Some("https://other.cdn.prismic.io/api/v2".to_string()),
            Some(String::new()),
        );
        assert_eq!(config.api.endpoint, "https://other.cdn.prismic.io/api/v2");
        assert_eq!(config.api.access_token, None);
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(config.tz(), chrono_tz::UTC);
    }
}
