//! List site content from the CLI

use anyhow::Result;

use crate::cms::MAX_LIMIT;
use crate::helpers::date;
use crate::Site;

/// Print posts, categories, or routes
pub async fn run(site: &Site, kind: &str) -> Result<()> {
    let gateway = site.gateway()?;

    match kind {
        "post" | "posts" => {
            let page = gateway.list_posts(MAX_LIMIT, 0, None).await?;
            println!("{} posts ({} total upstream)", page.posts.len(), page.total_count);
            for post in &page.posts {
                println!(
                    "  {}  /blog/{}  {}",
                    date::format_date_opt(post.published_at.as_ref()),
                    post.route_key(),
                    post.title
                );
            }
        }
        "category" | "categories" => {
            let categories = gateway.list_categories().await?;
            println!("{} categories", categories.len());
            for category in &categories {
                println!("  {}  {}", category.slug, category.name);
            }
        }
        "route" | "routes" => {
            for slug in gateway.list_slugs().await? {
                println!("/blog/{}", slug);
            }
        }
        other => anyhow::bail!("unknown list type: {} (post, category, route)", other),
    }

    Ok(())
}
