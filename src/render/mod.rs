//! Article body post-processing
//!
//! Pure transformations from a raw CMS HTML body to the markup the pages
//! actually ship: image optimization parameters, lazy loading, decorative
//! alt handling, external-link hardening, scrollable table wrappers, and
//! table-of-contents derivation. No DOM involved, so the whole pipeline is
//! unit-testable. Every step is idempotent.

pub mod toc;

pub use toc::{extract_toc, TocItem};

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use url::Url;

/// Image rewrite policy for CMS-hosted assets
const IMAGE_WIDTH: &str = "1200";
const IMAGE_FORMAT: &str = "webp";
const IMAGE_QUALITY: &str = "80";

const TABLE_WRAPPER_OPEN: &str = r#"<div class="table-wrapper">"#;

/// Inputs the transformations need from the surrounding site
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// Host of the site itself; anchors pointing elsewhere are external
    pub site_host: Option<&'a str>,
    /// Host substring identifying CMS-served images
    pub asset_host: &'a str,
}

/// A processed article body plus its derived navigation
#[derive(Debug, Clone)]
pub struct ProcessedArticle {
    pub html: String,
    pub toc: Vec<TocItem>,
}

/// Run the full post-processing pipeline once over a post body.
pub fn process_article(html: &str, ctx: &RenderContext) -> ProcessedArticle {
    let html = normalize_images(html, ctx.asset_host);
    let html = harden_external_links(&html, ctx.site_host);
    let html = wrap_tables(&html);
    let (html, toc) = extract_toc(&html);
    ProcessedArticle { html, toc }
}

lazy_static! {
    static ref IMG_RE: Regex = Regex::new(r"(?is)<img\b[^>]*>").unwrap();
    static ref ANCHOR_RE: Regex = Regex::new(r"(?is)<a\b[^>]*>").unwrap();
    static ref SRC_RE: Regex = Regex::new(r#"(?i)\bsrc\s*=\s*["']([^"']*)["']"#).unwrap();
    static ref HREF_RE: Regex = Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']*)["']"#).unwrap();
    static ref ALT_RE: Regex = Regex::new(r#"(?i)\balt\s*=\s*["']([^"']*)["']"#).unwrap();
    static ref LOADING_RE: Regex = Regex::new(r"(?i)\bloading\s*=").unwrap();
    static ref ARIA_HIDDEN_RE: Regex = Regex::new(r"(?i)\baria-hidden\s*=").unwrap();
    static ref TARGET_RE: Regex = Regex::new(r"(?i)\btarget\s*=").unwrap();
    static ref REL_RE: Regex = Regex::new(r"(?i)\brel\s*=").unwrap();
}

/// Rewrite CMS-hosted images to a fixed width, WebP, quality 80 — an
/// optimization policy, not a correctness requirement. Images that already
/// carry a `w` parameter are left untouched, which makes the rewrite a
/// no-op on its own output. Also flags every image for lazy loading, and
/// marks alt-less images decorative instead of leaving empty-but-announced
/// alt text.
pub fn normalize_images(html: &str, asset_host: &str) -> String {
    IMG_RE
        .replace_all(html, |caps: &Captures| {
            let mut tag = caps[0].to_string();

            if let Some(src) = SRC_RE.captures(&tag).map(|c| c[1].to_string()) {
                if let Some(optimized) = optimize_asset_url(&src, asset_host) {
                    tag = tag.replace(&src, &optimized);
                }
            }

            if !LOADING_RE.is_match(&tag) {
                tag = push_attr(&tag, r#"loading="lazy""#);
            }

            let alt_missing = ALT_RE
                .captures(&tag)
                .map(|c| c[1].trim().is_empty())
                .unwrap_or(true);
            if alt_missing && !ARIA_HIDDEN_RE.is_match(&tag) {
                tag = push_attr(&tag, r#"aria-hidden="true""#);
            }

            tag
        })
        .into_owned()
}

/// Returns the rewritten URL for a CMS asset without a width parameter,
/// `None` when the URL should stay as it is.
fn optimize_asset_url(src: &str, asset_host: &str) -> Option<String> {
    let url = Url::parse(src).ok()?;
    let host = url.host_str()?;
    if !host.contains(asset_host) {
        return None;
    }
    if url.query_pairs().any(|(key, _)| key == "w") {
        return None;
    }

    let mut url = url;
    url.query_pairs_mut()
        .append_pair("w", IMAGE_WIDTH)
        .append_pair("fm", IMAGE_FORMAT)
        .append_pair("q", IMAGE_QUALITY);
    Some(url.to_string())
}

/// Give anchors pointing off-site `target="_blank"` and
/// `rel="noopener noreferrer"`, so the opened page cannot reach back to
/// this one and no referrer leaks. Same-host anchors are untouched.
pub fn harden_external_links(html: &str, site_host: Option<&str>) -> String {
    ANCHOR_RE
        .replace_all(html, |caps: &Captures| {
            let mut tag = caps[0].to_string();

            let Some(href) = HREF_RE.captures(&tag).map(|c| c[1].to_string()) else {
                return tag;
            };
            if !href.starts_with("http://") && !href.starts_with("https://") {
                return tag;
            }
            let Some(host) = Url::parse(&href).ok().and_then(|u| u.host_str().map(String::from))
            else {
                return tag;
            };
            let same_host = site_host.is_some_and(|site| host.contains(site));
            if same_host {
                return tag;
            }

            if !TARGET_RE.is_match(&tag) {
                tag = push_attr(&tag, r#"target="_blank""#);
            }
            if !REL_RE.is_match(&tag) {
                tag = push_attr(&tag, r#"rel="noopener noreferrer""#);
            }
            tag
        })
        .into_owned()
}

/// Enclose tables in a horizontally scrollable wrapper, skipping tables
/// already wrapped.
pub fn wrap_tables(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("<table") {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);

        let already_wrapped = out.trim_end().ends_with(TABLE_WRAPPER_OPEN);
        let end = tail
            .find("</table>")
            .map(|pos| pos + "</table>".len())
            .unwrap_or(tail.len());
        let (table, after) = tail.split_at(end);

        if already_wrapped {
            out.push_str(table);
        } else {
            out.push_str(TABLE_WRAPPER_OPEN);
            out.push_str(table);
            out.push_str("</div>");
        }
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Insert an attribute just before the tag's closing bracket
fn push_attr(tag: &str, attr: &str) -> String {
    if let Some(body) = tag.strip_suffix("/>") {
        format!("{} {}/>", body.trim_end(), attr)
    } else if let Some(body) = tag.strip_suffix('>') {
        format!("{} {}>", body.trim_end(), attr)
    } else {
        tag.to_string()
    }
}
