//! Pre-render the blog to static files
//!
//! Enumerates every known route via the gateway and writes
//! `blog/index.html` plus `blog/{slug}/index.html` under the output
//! directory. A dead CMS yields an empty (but valid) site rather than an
//! aborted run, matching the gateway's degradation contract.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cms::{degrade, CmsClient, ContentGateway};
use crate::config::SiteConfig;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Generate the static site
pub async fn run(site: &Site, out: Option<&Path>) -> Result<()> {
    let gateway = site.gateway()?;
    let out_dir = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&site.config.public_dir));
    run_with(&gateway, &site.config, &out_dir).await
}

/// Generate against an arbitrary gateway (injected in tests)
pub async fn run_with<C: CmsClient>(
    gateway: &ContentGateway<C>,
    config: &SiteConfig,
    out_dir: &Path,
) -> Result<()> {
    let start = std::time::Instant::now();
    let templates = TemplateRenderer::new()?;
    let blog_dir = out_dir.join("blog");

    // List page
    let page = degrade(
        gateway.list_posts(config.per_page, 0, None).await,
        "list posts",
    );
    let categories = degrade(gateway.list_categories().await, "list categories");
    let index = templates.render_index(config, &page.posts, page.total_count, &categories)?;
    write_page(&blog_dir.join("index.html"), &index)?;

    // One page per known route
    let slugs = degrade(gateway.list_slugs().await, "list slugs");
    let mut generated = 0usize;
    for slug in &slugs {
        match gateway.get_post_by_slug_or_id(slug).await {
            Ok(Some(post)) => {
                let related = degrade(
                    gateway
                        .related_posts(
                            &post.id,
                            post.category.as_ref().map(|c| c.id.as_str()),
                            config.related_limit,
                        )
                        .await,
                    "related posts",
                );
                let body = templates.render_article(config, &post, &related)?;
                write_page(&blog_dir.join(slug).join("index.html"), &body)?;
                generated += 1;
                tracing::info!("Generated /blog/{}", slug);
            }
            Ok(None) => tracing::warn!("no post for route {}", slug),
            Err(err) => tracing::error!("fetch post {} failed: {}", slug, err),
        }
    }

    tracing::info!(
        "Generated {} of {} routes in {:.2}s",
        generated,
        slugs.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn write_page(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}
