//! JSON API server over a site's accessors
//!
//! Every accessor is exposed read-only under `/api`. Disabled categories and
//! unknown slugs answer 404; anything else that fails answers 500. Static
//! files from the public directory are served as the fallback.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::aggregate::{ContentSummary, SearchResults};
use crate::config::{ContentConfig, ResumeInfo, Route, SiteSettings};
use crate::content::{Collection, ContentItem};
use crate::generator::Manifest;
use crate::projects::Project;
use crate::watch::ContentWatcher;
use crate::{Error, Site};

/// Default number of items for `/api/recent`
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Library error rendered as a JSON response
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            tracing::error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
struct RecentParams {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// Build the API router
pub fn router(site: Arc<Site>) -> Router {
    let public_dir = site.public_dir.clone();

    Router::new()
        .route("/api/config", get(config))
        .route("/api/routes", get(routes))
        .route("/api/settings", get(settings))
        .route("/api/posts", get(posts))
        .route("/api/posts/:slug", get(post))
        .route("/api/notes", get(notes))
        .route("/api/notes/:slug", get(note))
        .route("/api/projects", get(projects))
        .route("/api/recent", get(recent))
        .route("/api/search", get(search))
        .route("/api/summary", get(summary))
        .route("/api/resume", get(resume))
        .route("/api/manifest/:collection", get(manifest))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(site)
}

/// Start the API server, optionally dropping memoized data when content changes
pub async fn start(site: Arc<Site>, ip: &str, port: u16, watch: bool) -> Result<()> {
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Watching {} for changes...", site.content_dir.display());
        let site = Arc::clone(&site);
        tokio::spawn(async move {
            if let Err(e) = invalidate_on_change(site).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(site)).await?;

    Ok(())
}

async fn invalidate_on_change(site: Arc<Site>) -> Result<()> {
    let mut watcher = ContentWatcher::new(&[site.content_dir.as_path()])?;
    while let Some(paths) = watcher.changed().await {
        for path in &paths {
            tracing::info!("File changed: {}", path.display());
        }
        site.invalidate().await;
    }
    Ok(())
}

async fn config(State(site): State<Arc<Site>>) -> ApiResult<ContentConfig> {
    let config = site.resolve_config().await?;
    Ok(Json(config.as_ref().clone()))
}

async fn routes(State(site): State<Arc<Site>>) -> Json<Vec<Route>> {
    Json(site.settings.enabled_routes())
}

async fn settings(State(site): State<Arc<Site>>) -> Json<SiteSettings> {
    Json(site.settings.clone())
}

async fn list(site: &Site, collection: Collection) -> ApiResult<Vec<ContentItem>> {
    let items = site.list(collection).await?;
    Ok(Json(items.as_ref().clone()))
}

async fn posts(State(site): State<Arc<Site>>) -> ApiResult<Vec<ContentItem>> {
    list(&site, Collection::Posts).await
}

async fn notes(State(site): State<Arc<Site>>) -> ApiResult<Vec<ContentItem>> {
    list(&site, Collection::Notes).await
}

async fn post(State(site): State<Arc<Site>>, Path(slug): Path<String>) -> ApiResult<ContentItem> {
    Ok(Json(site.item(Collection::Posts, &slug).await?))
}

async fn note(State(site): State<Arc<Site>>, Path(slug): Path<String>) -> ApiResult<ContentItem> {
    Ok(Json(site.item(Collection::Notes, &slug).await?))
}

async fn projects(State(site): State<Arc<Site>>) -> ApiResult<Vec<Project>> {
    let projects = site.projects().await?;
    Ok(Json(projects.as_ref().clone()))
}

async fn recent(
    State(site): State<Arc<Site>>,
    Query(params): Query<RecentParams>,
) -> Json<Vec<ContentItem>> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Json(site.aggregator().recent_content(limit).await)
}

async fn search(
    State(site): State<Arc<Site>>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResults> {
    Json(site.aggregator().search_content(&params.q).await)
}

async fn summary(State(site): State<Arc<Site>>) -> Json<ContentSummary> {
    Json(site.aggregator().summary().await)
}

async fn resume(State(site): State<Arc<Site>>) -> ApiResult<ResumeInfo> {
    Ok(Json(site.resume().await?))
}

async fn manifest(
    State(site): State<Arc<Site>>,
    Path(collection): Path<String>,
) -> ApiResult<Manifest> {
    let collection = Collection::parse(&collection)
        .ok_or_else(|| Error::NotFound(format!("collection '{}'", collection)))?;
    Ok(Json(site.summaries(collection).await?))
}
