//! URL and share-link helpers

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::cms::model::BlogPost;
use crate::config::SiteConfig;

/// Characters `encodeURIComponent` leaves verbatim
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a string for use inside a query component
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Site-relative path of a post's detail page
pub fn post_path(post: &BlogPost) -> String {
    format!("/blog/{}", post.route_key())
}

/// Canonical absolute URL of a post's detail page
pub fn post_url(config: &SiteConfig, post: &BlogPost) -> String {
    format!(
        "{}/blog/{}",
        config.url.trim_end_matches('/'),
        post.route_key()
    )
}

/// Host of the site itself, for external-link detection
pub fn site_host(config: &SiteConfig) -> Option<String> {
    url::Url::parse(&config.url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Pre-filled X/Twitter share URL
pub fn tweet_share_url(title: &str, url: &str) -> String {
    format!(
        "https://twitter.com/intent/tweet?text={}&url={}",
        encode_component(title),
        encode_component(url)
    )
}

/// Pre-filled Facebook share URL
pub fn facebook_share_url(url: &str) -> String {
    format!(
        "https://www.facebook.com/sharer/sharer.php?u={}",
        encode_component(url)
    )
}

/// Pre-filled LINE share URL
pub fn line_share_url(title: &str, url: &str) -> String {
    format!(
        "https://line.me/R/msg/text/?{}",
        encode_component(&format!("{} {}", title, url))
    )
}
