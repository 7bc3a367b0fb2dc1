//! In-memory CMS double for tests
//!
//! Implements [`CmsClient`] over a fixed set of posts and categories,
//! honoring the query features the gateway uses: equality filters on
//! `slug`/`category`, `-publishedAt` ordering, limit/offset, and the
//! `id,slug` projection. Recorded queries let tests assert what was sent
//! upstream.

use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::client::{CmsClient, CmsError, ListQuery};
use super::model::{BlogPost, Category, CmsList};

pub struct MockClient {
    posts: Vec<BlogPost>,
    categories: Vec<Category>,
    fail: bool,
    queries: Mutex<Vec<ListQuery>>,
}

impl MockClient {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self {
            posts,
            categories: Vec::new(),
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// A client whose every request fails upstream
    pub fn failing() -> Self {
        Self {
            posts: Vec::new(),
            categories: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_queries(&self) -> Vec<ListQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn list_value(&self, endpoint: &str, query: &ListQuery) -> Result<serde_json::Value, CmsError> {
        if self.fail {
            return Err(CmsError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        self.queries.lock().unwrap().push(query.clone());

        match endpoint {
            "blogs" => {
                let mut posts = self.posts.clone();

                if let Some(filter) = query.filters.as_deref() {
                    if let Some(id) = filter.strip_prefix("category[equals]") {
                        posts.retain(|p| p.category.as_ref().is_some_and(|c| c.id == id));
                    } else if let Some(slug) = filter.strip_prefix("slug[equals]") {
                        posts.retain(|p| p.slug.as_deref() == Some(slug));
                    }
                }

                if query.orders.as_deref() == Some("-publishedAt") {
                    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
                }

                let total = posts.len();
                let offset = query.offset.unwrap_or(0);
                let limit = query.limit.unwrap_or(total);
                let page: Vec<BlogPost> =
                    posts.into_iter().skip(offset).take(limit).collect();

                let contents: Vec<serde_json::Value> = if query.fields.as_deref() == Some("id,slug")
                {
                    page.iter()
                        .map(|p| json!({ "id": p.id, "slug": p.slug }))
                        .collect()
                } else {
                    page.iter()
                        .map(|p| serde_json::to_value(p).unwrap())
                        .collect()
                };

                Ok(json!({
                    "contents": contents,
                    "totalCount": total,
                    "offset": offset,
                    "limit": limit,
                }))
            }
            "categories" => {
                let total = self.categories.len();
                Ok(json!({
                    "contents": self.categories,
                    "totalCount": total,
                    "offset": 0,
                    "limit": query.limit.unwrap_or(total),
                }))
            }
            _ => Err(CmsError::NotFound),
        }
    }

    fn get_value(&self, endpoint: &str, content_id: &str) -> Result<serde_json::Value, CmsError> {
        if self.fail {
            return Err(CmsError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        if endpoint != "blogs" {
            return Err(CmsError::NotFound);
        }
        self.posts
            .iter()
            .find(|p| p.id == content_id)
            .map(|p| serde_json::to_value(p).unwrap())
            .ok_or(CmsError::NotFound)
    }
}

impl CmsClient for MockClient {
    fn list<T>(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> impl Future<Output = Result<CmsList<T>, CmsError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let value = self.list_value(endpoint, query);
        async move { Ok(serde_json::from_value(value?)?) }
    }

    fn get<T>(
        &self,
        endpoint: &str,
        content_id: &str,
    ) -> impl Future<Output = Result<T, CmsError>> + Send
    where
        T: DeserializeOwned + Send,
    {
        let value = self.get_value(endpoint, content_id);
        async move { Ok(serde_json::from_value(value?)?) }
    }
}

fn parse_ts(ts: &str) -> DateTime<Utc> {
    ts.parse().unwrap()
}

/// A minimal post with an optional slug
pub fn post(id: &str, slug: Option<&str>, published_at: &str) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        title: format!("Post {}", id),
        content: format!("<p>Body of {}</p>", id),
        excerpt: None,
        thumbnail: None,
        category: None,
        published_at: Some(parse_ts(published_at)),
        updated_at: Some(parse_ts(published_at)),
        slug: slug.map(str::to_string),
    }
}

/// A post assigned to a category
pub fn post_in_category(id: &str, category_id: &str, published_at: &str) -> BlogPost {
    BlogPost {
        category: Some(Category {
            id: category_id.to_string(),
            name: category_id.to_string(),
            slug: category_id.to_string(),
        }),
        ..post(id, Some(id), published_at)
    }
}
