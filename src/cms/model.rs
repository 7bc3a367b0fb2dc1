//! CMS content models
//!
//! These are read-only projections of remote CMS state; nothing here is
//! created or mutated locally. Wire names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post as delivered by the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    /// Primary identifier, always present
    pub id: String,

    /// Post title
    pub title: String,

    /// Raw HTML body
    #[serde(default)]
    pub content: String,

    /// Lead paragraph shown above the body
    #[serde(default)]
    pub excerpt: Option<String>,

    /// List thumbnail
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,

    /// Zero or one category per post
    #[serde(default)]
    pub category: Option<Category>,

    /// Publish timestamp
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Human-readable URL key, optional; the id is the fallback key
    #[serde(default)]
    pub slug: Option<String>,
}

impl BlogPost {
    /// The path segment this post is addressed by: its slug when present,
    /// its id otherwise (legacy links predate slugs).
    pub fn route_key(&self) -> &str {
        self.slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .unwrap_or(&self.id)
    }
}

/// An image attached to a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// A post category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Projection used for route enumeration (`fields=id,slug`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugEntry {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Paginated list response from the CMS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsList<T> {
    pub contents: Vec<T>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub limit: usize,
}
