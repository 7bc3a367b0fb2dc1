//! Site configuration (_config.yml) and CMS credentials

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL
    /// Canonical site URL, used for share links and external-link detection
    pub url: String,

    // Blog
    /// Posts per list page
    pub per_page: usize,
    /// Related posts shown under an article
    pub related_limit: usize,

    // CMS assets
    /// Host substring identifying CMS-served images eligible for
    /// width/format/quality rewriting
    pub asset_host: String,

    // Directory
    pub public_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Fuji Hinoki".to_string(),
            description: "富士山麓のヒノキから生まれた香りの紙".to_string(),
            language: "ja".to_string(),

            url: "http://example.com".to_string(),

            per_page: 12,
            related_limit: 3,

            asset_host: "microcms-assets.io".to_string(),

            public_dir: "public".to_string(),
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
}

/// Configuration errors that are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingEnv(&'static str),
}

/// Credentials for the headless CMS.
///
/// Both values are mandatory: the application refuses to start rather than
/// run with a broken content dependency.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub service_domain: String,
    pub api_key: String,
}

impl CmsConfig {
    /// Read credentials from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            service_domain: require_env("MICROCMS_SERVICE_DOMAIN")?,
            api_key: require_env("MICROCMS_API_KEY")?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingEnv(name))
}
