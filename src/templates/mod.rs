//! Embedded page templates using the Tera template engine
//!
//! All templates are compiled into the binary. View models are prepared
//! here (dates formatted, titles escaped, bodies post-processed) so the
//! templates only interpolate; autoescaping is off because the article
//! body is trusted HTML from the CMS, already post-processed.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::cms::model::{BlogPost, Category};
use crate::config::SiteConfig;
use crate::helpers::{date, html, url as url_helper};
use crate::render::{process_article, ProcessedArticle, RenderContext};

/// IntersectionObserver wiring for the article ToC: a heading crossing
/// the fixed 20%–80% viewport band marks its entry active. Multiple
/// intersecting headings resolve as last-observed-wins; no stricter
/// tie-break is applied.
const TOC_OBSERVER_SCRIPT: &str = r#"<script>
(function () {
  var links = document.querySelectorAll('[data-toc-link]');
  if (links.length === 0 || !('IntersectionObserver' in window)) return;
  var observer = new IntersectionObserver(function (entries) {
    entries.forEach(function (entry) {
      if (!entry.isIntersecting) return;
      links.forEach(function (link) {
        link.classList.toggle('active', link.getAttribute('href') === '#' + entry.target.id);
      });
    });
  }, { rootMargin: '-20% 0px -80% 0px' });
  links.forEach(function (link) {
    var target = document.getElementById(link.getAttribute('href').slice(1));
    if (target) observer.observe(target);
  });
})();
</script>"#;

/// Page renderer with embedded templates
pub struct TemplateRenderer {
    tera: Tera,
}

/// List-page card for one post; all text fields pre-escaped
#[derive(Serialize)]
struct PostCard {
    title: String,
    path: String,
    date: String,
    excerpt: String,
    thumbnail_url: String,
    category_name: String,
}

impl TemplateRenderer {
    /// Create a renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping off: the post body is HTML by design, and all other
        // values are escaped while building the view models
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("article.html", include_str!("theme/article.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
        ])?;

        Ok(Self { tera })
    }

    fn base_context(&self, config: &SiteConfig) -> Context {
        let mut context = Context::new();
        context.insert("site_title", &html::html_escape(&config.title));
        context.insert("site_description", &html::html_escape(&config.description));
        context.insert("site_url", &config.url.trim_end_matches('/'));
        context.insert("language", &config.language);
        context
    }

    /// Render the blog list page
    pub fn render_index(
        &self,
        config: &SiteConfig,
        posts: &[BlogPost],
        total_count: usize,
        categories: &[Category],
    ) -> Result<String> {
        let cards: Vec<PostCard> = posts.iter().map(post_card).collect();
        let category_names: Vec<String> = categories
            .iter()
            .map(|c| html::html_escape(&c.name))
            .collect();

        let mut context = self.base_context(config);
        context.insert("posts", &cards);
        context.insert("total_count", &total_count);
        context.insert("categories", &category_names);

        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render an article detail page
    pub fn render_article(
        &self,
        config: &SiteConfig,
        post: &BlogPost,
        related: &[BlogPost],
    ) -> Result<String> {
        let site_host = url_helper::site_host(config);
        let render_ctx = RenderContext {
            site_host: site_host.as_deref(),
            asset_host: &config.asset_host,
        };
        let ProcessedArticle { html: body, toc } = process_article(&post.content, &render_ctx);

        let canonical = url_helper::post_url(config, post);
        let related_cards: Vec<PostCard> = related.iter().map(post_card).collect();

        let mut context = self.base_context(config);
        context.insert("title", &html::html_escape(&post.title));
        context.insert("canonical", &canonical);
        context.insert(
            "published",
            &date::format_date_opt(post.published_at.as_ref()),
        );
        context.insert("updated", &date::format_date_opt(post.updated_at.as_ref()));
        context.insert(
            "show_updated",
            &(post.updated_at.is_some() && post.updated_at != post.published_at),
        );
        context.insert(
            "excerpt",
            &post
                .excerpt
                .as_deref()
                .map(html::html_escape)
                .unwrap_or_default(),
        );
        context.insert(
            "category_name",
            &post
                .category
                .as_ref()
                .map(|c| html::html_escape(&c.name))
                .unwrap_or_default(),
        );
        context.insert("content", &body);
        context.insert("toc", &toc);
        context.insert("share_twitter", &url_helper::tweet_share_url(&post.title, &canonical));
        context.insert("share_facebook", &url_helper::facebook_share_url(&canonical));
        context.insert("share_line", &url_helper::line_share_url(&post.title, &canonical));
        context.insert("related", &related_cards);
        context.insert(
            "toc_script",
            if toc.is_empty() { "" } else { TOC_OBSERVER_SCRIPT },
        );

        Ok(self.tera.render("article.html", &context)?)
    }

    /// Render the not-found page
    pub fn render_not_found(&self, config: &SiteConfig) -> Result<String> {
        let context = self.base_context(config);
        Ok(self.tera.render("not_found.html", &context)?)
    }
}

fn post_card(post: &BlogPost) -> PostCard {
    let excerpt = post
        .excerpt
        .clone()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| html::truncate(&html::strip_html(&post.content), 120, None));

    PostCard {
        title: html::html_escape(&post.title),
        path: url_helper::post_path(post),
        date: date::format_date_opt(post.published_at.as_ref()),
        excerpt: html::html_escape(&excerpt),
        thumbnail_url: post
            .thumbnail
            .as_ref()
            .map(|t| t.url.clone())
            .unwrap_or_default(),
        category_name: post
            .category
            .as_ref()
            .map(|c| html::html_escape(&c.name))
            .unwrap_or_default(),
    }
}
