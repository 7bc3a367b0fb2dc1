//! hinoki-blog: blog front-end for the Fuji Hinoki site
//!
//! Content lives in a headless CMS; this crate wraps it in a typed
//! gateway, post-processes article bodies (image optimization, link
//! hardening, table-of-contents derivation), and serves or pre-renders
//! the blog pages.

pub mod cms;
pub mod commands;
pub mod config;
pub mod helpers;
pub mod render;
pub mod server;
pub mod templates;

use std::path::Path;

use anyhow::Result;

use cms::{ContentGateway, MicroCmsClient};
use config::{CmsConfig, SiteConfig};

/// The main application: site settings plus CMS credentials
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// CMS credentials, mandatory at startup
    pub cms: CmsConfig,
}

impl Site {
    /// Create a site from a base directory. `_config.yml` is optional;
    /// the CMS credentials are not — missing credentials fail here, at
    /// startup, rather than at the first request.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");
        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };
        let cms = CmsConfig::from_env()?;

        Ok(Self { config, cms })
    }

    /// Build the content gateway backed by the real CMS client
    pub fn gateway(&self) -> Result<ContentGateway<MicroCmsClient>> {
        Ok(ContentGateway::new(MicroCmsClient::new(&self.cms)?))
    }
}
