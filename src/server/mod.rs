//! Blog HTTP server
//!
//! Thin boundary between HTTP and the content gateway. Upstream failures
//! never become error pages here: list sections degrade to empty, and a
//! post that cannot be fetched renders the not-found page.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::cms::{degrade, ContentGateway, MicroCmsClient};
use crate::config::SiteConfig;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Shared handler state
struct AppState {
    config: SiteConfig,
    gateway: ContentGateway<MicroCmsClient>,
    templates: TemplateRenderer,
}

/// Start the blog server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState {
        config: site.config.clone(),
        gateway: site.gateway()?,
        templates: TemplateRenderer::new()?,
    });

    let app = Router::new()
        .route("/", get(|| async { Redirect::permanent("/blog") }))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .with_state(state);

    // Handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Blog list page: newest posts plus the category list, both degraded to
/// empty on upstream failure
async fn blog_index(State(state): State<Arc<AppState>>) -> Response {
    let page = degrade(
        state
            .gateway
            .list_posts(state.config.per_page, 0, None)
            .await,
        "list posts",
    );
    let categories = degrade(state.gateway.list_categories().await, "list categories");

    html_or_error(state.templates.render_index(
        &state.config,
        &page.posts,
        page.total_count,
        &categories,
    ))
}

/// Article detail page: slug-or-id resolution, 404 when nothing matches
async fn blog_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let post = match state.gateway.get_post_by_slug_or_id(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            tracing::debug!("no post for route {}", slug);
            return not_found(&state);
        }
        Err(err) => {
            tracing::error!("fetch post {} failed: {}", slug, err);
            return not_found(&state);
        }
    };

    let related = degrade(
        state
            .gateway
            .related_posts(
                &post.id,
                post.category.as_ref().map(|c| c.id.as_str()),
                state.config.related_limit,
            )
            .await,
        "related posts",
    );

    html_or_error(
        state
            .templates
            .render_article(&state.config, &post, &related),
    )
}

fn not_found(state: &AppState) -> Response {
    match state.templates.render_not_found(&state.config) {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(err) => {
            tracing::error!("render not-found page failed: {}", err);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

fn html_or_error(result: Result<String>) -> Response {
    match result {
        Ok(body) => Html(body).into_response(),
        Err(err) => {
            tracing::error!("render failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
