//! Gateway operations over the CMS transport
//!
//! The CMS is treated as unreliable and slow. Every operation here returns
//! a `Result` so callers can tell an upstream failure from a genuinely
//! empty result; the page boundary applies [`degrade`] to keep rendering a
//! valid, content-light page when the CMS is down.

use super::client::{CmsClient, CmsError, ListQuery, MAX_LIMIT};
use super::model::{BlogPost, Category, CmsList, SlugEntry};

const POSTS_ENDPOINT: &str = "blogs";
const CATEGORIES_ENDPOINT: &str = "categories";
const ORDER_NEWEST_FIRST: &str = "-publishedAt";

/// One page of posts plus the upstream total
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<BlogPost>,
    pub total_count: usize,
}

/// Typed content requests against an injected CMS transport
#[derive(Debug, Clone)]
pub struct ContentGateway<C: CmsClient> {
    client: C,
}

impl<C: CmsClient> ContentGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// List posts, newest first, optionally filtered to one category
    /// server-side. `limit` is clamped to 100.
    pub async fn list_posts(
        &self,
        limit: usize,
        offset: usize,
        category_id: Option<&str>,
    ) -> Result<PostPage, CmsError> {
        let mut query = ListQuery::new()
            .limit(limit)
            .offset(offset)
            .orders(ORDER_NEWEST_FIRST);
        if let Some(id) = category_id {
            query = query.filters(format!("category[equals]{}", id));
        }

        let list: CmsList<BlogPost> = self.client.list(POSTS_ENDPOINT, &query).await?;
        Ok(PostPage {
            posts: list.contents,
            total_count: list.total_count,
        })
    }

    /// Resolve a path segment to a post: slug equality first, then a
    /// direct id lookup for links created before slugs existed.
    /// `Ok(None)` means no post matches either way.
    pub async fn get_post_by_slug_or_id(&self, key: &str) -> Result<Option<BlogPost>, CmsError> {
        let query = ListQuery::new()
            .limit(1)
            .filters(format!("slug[equals]{}", key));
        let list: CmsList<BlogPost> = self.client.list(POSTS_ENDPOINT, &query).await?;
        if let Some(post) = list.contents.into_iter().next() {
            return Ok(Some(post));
        }

        match self.client.get(POSTS_ENDPOINT, key).await {
            Ok(post) => Ok(Some(post)),
            Err(CmsError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Enumerate every known route key for static generation: the slug
    /// when present, the id otherwise. Only `id,slug` are fetched.
    pub async fn list_slugs(&self) -> Result<Vec<String>, CmsError> {
        let query = ListQuery::new().limit(MAX_LIMIT).fields("id,slug");
        let list: CmsList<SlugEntry> = self.client.list(POSTS_ENDPOINT, &query).await?;
        Ok(list
            .contents
            .into_iter()
            .map(|entry| {
                entry
                    .slug
                    .filter(|slug| !slug.is_empty())
                    .unwrap_or(entry.id)
            })
            .collect())
    }

    /// List all categories, upstream default order
    pub async fn list_categories(&self) -> Result<Vec<Category>, CmsError> {
        let query = ListQuery::new().limit(MAX_LIMIT);
        let list: CmsList<Category> = self.client.list(CATEGORIES_ENDPOINT, &query).await?;
        Ok(list.contents)
    }

    /// Posts related to the current one: newest category-mates, the
    /// current post excluded. One extra post is fetched so the exclusion
    /// does not leave the result short when enough category-mates exist.
    pub async fn related_posts(
        &self,
        current_post_id: &str,
        category_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<BlogPost>, CmsError> {
        let mut query = ListQuery::new()
            .limit(limit + 1)
            .orders(ORDER_NEWEST_FIRST);
        if let Some(id) = category_id {
            query = query.filters(format!("category[equals]{}", id));
        }

        let list: CmsList<BlogPost> = self.client.list(POSTS_ENDPOINT, &query).await?;
        Ok(list
            .contents
            .into_iter()
            .filter(|post| post.id != current_post_id)
            .take(limit)
            .collect())
    }
}

/// Availability over completeness: at the page boundary a failed fetch is
/// logged and rendered as an empty section, never as an error page.
pub fn degrade<T: Default>(result: Result<T, CmsError>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!("{} failed: {}", what, err);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::testing::{post, post_in_category, MockClient};

    #[tokio::test]
    async fn test_list_posts_clamps_limit() {
        let client = MockClient::new(vec![post("a", Some("a-slug"), "2024-03-01T00:00:00Z")]);
        let gateway = ContentGateway::new(client);

        gateway.list_posts(500, 0, None).await.unwrap();

        let queries = gateway.client.recorded_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].limit, Some(100));
        assert_eq!(queries[0].orders.as_deref(), Some("-publishedAt"));
    }

    #[tokio::test]
    async fn test_related_posts_clamps_limit() {
        let client = MockClient::new(vec![]);
        let gateway = ContentGateway::new(client);

        gateway.related_posts("x", None, 200).await.unwrap();

        let queries = gateway.client.recorded_queries();
        assert_eq!(queries[0].limit, Some(100));
    }

    #[tokio::test]
    async fn test_list_posts_filters_by_category() {
        let client = MockClient::new(vec![
            post_in_category("a", "hinoki", "2024-03-01T00:00:00Z"),
            post_in_category("b", "fuji", "2024-02-01T00:00:00Z"),
            post_in_category("c", "hinoki", "2024-01-01T00:00:00Z"),
        ]);
        let gateway = ContentGateway::new(client);

        let page = gateway.list_posts(10, 0, Some("hinoki")).await.unwrap();
        assert_eq!(page.total_count, 2);
        let ids: Vec<_> = page.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_list_posts_orders_newest_first() {
        let client = MockClient::new(vec![
            post("old", None, "2023-01-01T00:00:00Z"),
            post("new", None, "2024-06-01T00:00:00Z"),
            post("mid", None, "2024-01-01T00:00:00Z"),
        ]);
        let gateway = ContentGateway::new(client);

        let page = gateway.list_posts(10, 0, None).await.unwrap();
        let ids: Vec<_> = page.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn test_lookup_by_slug() {
        let client = MockClient::new(vec![
            post("id-1", Some("first-post"), "2024-01-01T00:00:00Z"),
            post("id-2", None, "2024-02-01T00:00:00Z"),
        ]);
        let gateway = ContentGateway::new(client);

        let found = gateway.get_post_by_slug_or_id("first-post").await.unwrap();
        assert_eq!(found.unwrap().id, "id-1");
    }

    #[tokio::test]
    async fn test_lookup_falls_back_to_id() {
        let client = MockClient::new(vec![
            post("id-1", Some("first-post"), "2024-01-01T00:00:00Z"),
            post("id-2", None, "2024-02-01T00:00:00Z"),
        ]);
        let gateway = ContentGateway::new(client);

        let found = gateway.get_post_by_slug_or_id("id-2").await.unwrap();
        assert_eq!(found.unwrap().id, "id-2");
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let client = MockClient::new(vec![post(
            "id-1",
            Some("first-post"),
            "2024-01-01T00:00:00Z",
        )]);
        let gateway = ContentGateway::new(client);

        let found = gateway.get_post_by_slug_or_id("no-such-key").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_slugs_prefers_slug_over_id() {
        let client = MockClient::new(vec![
            post("id-1", Some("first-post"), "2024-01-01T00:00:00Z"),
            post("id-2", None, "2024-02-01T00:00:00Z"),
            post("id-3", Some(""), "2024-03-01T00:00:00Z"),
        ]);
        let gateway = ContentGateway::new(client);

        let mut slugs = gateway.list_slugs().await.unwrap();
        slugs.sort();
        assert_eq!(slugs, vec!["first-post", "id-2", "id-3"]);

        let queries = gateway.client.recorded_queries();
        assert_eq!(queries[0].fields.as_deref(), Some("id,slug"));
        assert_eq!(queries[0].limit, Some(100));
    }

    #[tokio::test]
    async fn test_related_posts_excludes_current_and_truncates() {
        let client = MockClient::new(vec![
            post_in_category("x", "hinoki", "2024-05-01T00:00:00Z"),
            post_in_category("a", "hinoki", "2024-04-01T00:00:00Z"),
            post_in_category("b", "hinoki", "2024-03-01T00:00:00Z"),
            post_in_category("c", "hinoki", "2024-02-01T00:00:00Z"),
            post_in_category("d", "hinoki", "2024-01-01T00:00:00Z"),
        ]);
        let gateway = ContentGateway::new(client);

        let related = gateway.related_posts("x", Some("hinoki"), 3).await.unwrap();
        let ids: Vec<_> = related.iter().map(|p| p.id.as_str()).collect();
        // Exactly 3, current post excluded, newest first
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_related_posts_short_category() {
        let client = MockClient::new(vec![
            post_in_category("x", "hinoki", "2024-05-01T00:00:00Z"),
            post_in_category("a", "hinoki", "2024-04-01T00:00:00Z"),
        ]);
        let gateway = ContentGateway::new(client);

        let related = gateway.related_posts("x", Some("hinoki"), 3).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, "a");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_distinguishable() {
        let client = MockClient::failing();
        let gateway = ContentGateway::new(client);

        assert!(gateway.list_posts(12, 0, None).await.is_err());
        assert!(gateway.list_categories().await.is_err());
        assert!(gateway.get_post_by_slug_or_id("any").await.is_err());
    }

    #[tokio::test]
    async fn test_degrade_renders_empty_page() {
        let client = MockClient::failing();
        let gateway = ContentGateway::new(client);

        let page = degrade(gateway.list_posts(12, 0, None).await, "list posts");
        assert!(page.posts.is_empty());
        assert_eq!(page.total_count, 0);

        let categories = degrade(gateway.list_categories().await, "list categories");
        assert!(categories.is_empty());

        let slugs = degrade(gateway.list_slugs().await, "list slugs");
        assert!(slugs.is_empty());
    }
}
