//! HTTP API over the content repository

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{BlogPost, ContentError, Difficulty, MarkdownRenderer, ProblemPost, Source};
use crate::repository::ContentRepository;
use crate::Folio;

/// Server state
struct ServerState {
    config: SiteConfig,
    repo: ContentRepository,
    renderer: MarkdownRenderer,
}

/// Content errors as HTTP responses
///
/// Drafts answer exactly like missing slugs.
#[derive(Debug)]
pub struct ApiError(ContentError);

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = if self.0.is_not_found() {
            tracing::debug!("{}", self.0);
            (StatusCode::NOT_FOUND, "not found")
        } else {
            tracing::error!("Failed to load content: {}", self.0);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteIndex {
    title: String,
    author: String,
    blog: String,
    problems: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlogSummary {
    slug: String,
    title: String,
    date_published: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<NaiveDate>,
    excerpt: String,
    tags: Vec<String>,
    permalink: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemSummary {
    slug: String,
    title: String,
    source: Source,
    difficulty: Difficulty,
    date_published: NaiveDate,
    time_complexity: String,
    space_complexity: String,
    excerpt: String,
    permalink: String,
}

/// A full record with its rendered body
#[derive(Debug, Serialize)]
struct Detail<R> {
    #[serde(flatten)]
    record: R,
    permalink: String,
    html: String,
}

impl BlogSummary {
    fn new(post: BlogPost, config: &SiteConfig) -> Self {
        Self {
            permalink: config.permalink(&format!("blog/{}", post.slug)),
            slug: post.slug,
            title: post.title,
            date_published: post.date_published,
            updated_at: post.updated_at,
            excerpt: post.excerpt,
            tags: post.tags,
        }
    }
}

impl ProblemSummary {
    fn new(problem: ProblemPost, config: &SiteConfig) -> Self {
        Self {
            permalink: config.permalink(&format!("problems/{}", problem.slug)),
            slug: problem.slug,
            title: problem.title,
            source: problem.source,
            difficulty: problem.difficulty,
            date_published: problem.date_published,
            time_complexity: problem.time_complexity,
            space_complexity: problem.space_complexity,
            excerpt: problem.excerpt,
        }
    }
}

/// Build the API router for a site
pub fn router(folio: &Folio) -> Router {
    let state = Arc::new(ServerState {
        config: folio.config.clone(),
        repo: folio.repository(),
        renderer: folio.renderer(),
    });

    Router::new()
        .route("/", get(site_index))
        .route("/api/blog", get(list_blog))
        .route("/api/blog/:slug", get(blog_detail))
        .route("/api/problems", get(list_problems))
        .route("/api/problems/:slug", get(problem_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let app = router(folio);

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn site_index(State(state): State<Arc<ServerState>>) -> Json<SiteIndex> {
    Json(SiteIndex {
        title: state.config.title.clone(),
        author: state.config.author.clone(),
        blog: "/api/blog".to_string(),
        problems: "/api/problems".to_string(),
    })
}

async fn list_blog(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<BlogSummary>>, ApiError> {
    let posts = state.repo.list_published_blog_posts().await?;
    Ok(Json(
        posts
            .into_iter()
            .map(|post| BlogSummary::new(post, &state.config))
            .collect(),
    ))
}

async fn blog_detail(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<Detail<BlogPost>>, ApiError> {
    let post = state.repo.get_published_blog_post_by_slug(&slug).await?;
    Ok(Json(Detail {
        permalink: state.config.permalink(&format!("blog/{}", post.slug)),
        html: state.renderer.render(&post.content),
        record: post,
    }))
}

async fn list_problems(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<ProblemSummary>>, ApiError> {
    let problems = state.repo.list_published_problems().await?;
    Ok(Json(
        problems
            .into_iter()
            .map(|problem| ProblemSummary::new(problem, &state.config))
            .collect(),
    ))
}

async fn problem_detail(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<Detail<ProblemPost>>, ApiError> {
    let problem = state.repo.get_published_problem_by_slug(&slug).await?;
    Ok(Json(Detail {
        permalink: state.config.permalink(&format!("problems/{}", problem.slug)),
        html: state.renderer.render(&problem.content),
        record: problem,
    }))
}
