/// Public read endpoints
///
/// Listings never fail: store errors are logged and turn into empty results,
/// so the site renders its zero-results state instead of an error.

use crate::api::AppState;
use crate::content::types::{Project, ProjectCard, ProjectFilter};
use crate::content::{Category, Subcategory};
use crate::error::{AppError, AppResult};
use crate::mail::{ContactSubmission, ProposalSubmission};
use crate::media::content_type_for;
use crate::seo::{injectable_snippets, SanitizedSnippet, SeoHead};
use crate::sitemap::{build_entries, render_xml, robots_txt, SitemapEntry};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Query string for public listings; taxonomy accepts labels or slugs
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub limit: Option<i64>,
}

impl ListingQuery {
    fn into_filter(self) -> Result<ProjectFilter, String> {
        let category = self.category.as_deref().map(str::parse::<Category>).transpose()?;
        let subcategory = self
            .subcategory
            .as_deref()
            .map(str::parse::<Subcategory>)
            .transpose()?;

        Ok(ProjectFilter {
            category,
            subcategory,
            limit: self.limit,
            ..ProjectFilter::published()
        })
    }
}

/// A published project with its public URL
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub url: String,
}

/// Create public routes
pub fn create_public_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/carousel", get(list_carousel))
        .route("/api/projects/{slug}", get(get_project))
        .route("/api/seo/{*page_slug}", get(get_page_seo))
        .route("/api/analytics", get(list_analytics))
        .route("/api/contact", post(submit_contact))
        .route("/api/proposal", post(submit_proposal))
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/sitemap.json", get(sitemap_json))
        .route("/robots.txt", get(robots))
        .route("/media/{*path}", get(serve_media))
}

/// GET /healthz
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match state.storage.ping().await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Health check database probe failed: {}", e);
            "unavailable"
        }
    };

    Json(json!({
        "status": "healthy",
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Published projects for a listing; failures yield an empty list
pub async fn published_projects(state: &AppState, filter: &ProjectFilter) -> Vec<Project> {
    match state.storage.list_projects(filter).await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!("Failed to list projects, rendering empty state: {}", e);
            Vec::new()
        }
    }
}

/// Carousel projects; failures yield an empty list
pub async fn carousel_projects(state: &AppState) -> Vec<Project> {
    match state.storage.list_carousel().await {
        Ok(projects) => projects,
        Err(e) => {
            tracing::error!("Failed to load carousel, rendering empty state: {}", e);
            Vec::new()
        }
    }
}

/// GET /api/projects?category=..&subcategory=..&limit=..
async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Json<Vec<ProjectCard>> {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => {
            tracing::warn!("Ignoring listing with invalid filter: {}", e);
            return Json(Vec::new());
        }
    };

    let projects = published_projects(&state, &filter).await;
    Json(projects.iter().map(ProjectCard::from).collect())
}

/// GET /api/projects/carousel
async fn list_carousel(State(state): State<AppState>) -> Json<Vec<ProjectCard>> {
    let projects = carousel_projects(&state).await;
    Json(projects.iter().map(ProjectCard::from).collect())
}

/// GET /api/projects/{slug} (published only)
async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ProjectDetail>> {
    match state.storage.get_project_by_slug(&slug).await? {
        Some(project) if project.is_published() => Ok(Json(ProjectDetail {
            url: project.url(),
            project,
        })),
        _ => Err(AppError::NotFound(format!("Project {}", slug))),
    }
}

/// GET /api/seo/{*page_slug}
///
/// Returns the stored row plus the rendered head for it.
async fn get_page_seo(
    State(state): State<AppState>,
    Path(page_slug): Path<String>,
) -> AppResult<Json<Value>> {
    let page_slug = page_slug.trim_matches('/').to_string();
    let row = match state.storage.get_page_seo(&page_slug).await {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("SEO lookup for '{}' failed: {}", page_slug, e);
            None
        }
    };

    let row = row.ok_or_else(|| AppError::NotFound(format!("SEO for page '{}'", page_slug)))?;
    let path = if page_slug == "home" { "/".to_string() } else { format!("/{}", page_slug) };
    let head = SeoHead::from_page(&path, Some(&row), &state.seo_defaults());

    Ok(Json(json!({
        "page": row,
        "robots": head.robots(),
        "head": head,
        "html": head.render(),
    })))
}

/// Enabled analytics snippets that pass the filter; failures yield none
pub async fn analytics_snippets(state: &AppState) -> Vec<SanitizedSnippet> {
    match state.storage.list_enabled_analytics_codes().await {
        Ok(codes) => injectable_snippets(&codes),
        Err(e) => {
            tracing::error!("Failed to load analytics codes: {}", e);
            Vec::new()
        }
    }
}

/// GET /api/analytics
async fn list_analytics(State(state): State<AppState>) -> Json<Vec<SanitizedSnippet>> {
    Json(analytics_snippets(&state).await)
}

/// Validate, format and send a contact message
pub async fn send_contact(state: &AppState, submission: &ContactSubmission) -> AppResult<()> {
    let email = submission.to_email(state.mailer.inbox())?;
    state.mailer.send(&email).await?;
    tracing::info!("📨 Contact message from {}", submission.email.trim());
    Ok(())
}

/// Validate, format and send a proposal request
pub async fn send_proposal(state: &AppState, submission: &ProposalSubmission) -> AppResult<()> {
    let email = submission.to_email(state.mailer.inbox())?;
    state.mailer.send(&email).await?;
    tracing::info!("📨 Proposal request from {} for {}", submission.email.trim(), submission.service.trim());
    Ok(())
}

/// POST /api/contact
async fn submit_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> AppResult<Json<Value>> {
    send_contact(&state, &submission).await?;
    Ok(Json(json!({ "success": true, "message": "Thank you, we will be in touch shortly." })))
}

/// POST /api/proposal
async fn submit_proposal(
    State(state): State<AppState>,
    Json(submission): Json<ProposalSubmission>,
) -> AppResult<Json<Value>> {
    send_proposal(&state, &submission).await?;
    Ok(Json(json!({ "success": true, "message": "Thank you, your proposal request was sent." })))
}

async fn sitemap_entries(state: &AppState) -> Vec<SitemapEntry> {
    let projects = published_projects(state, &ProjectFilter::published()).await;
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    build_entries(state.config.base_url(), &projects, &today)
}

/// GET /sitemap.xml
async fn sitemap_xml(State(state): State<AppState>) -> Response {
    let entries = sitemap_entries(&state).await;
    tracing::debug!("🗺️ Serving sitemap with {} entries", entries.len());
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_xml(&entries),
    )
        .into_response()
}

/// GET /sitemap.json
async fn sitemap_json(State(state): State<AppState>) -> Json<Vec<SitemapEntry>> {
    Json(sitemap_entries(&state).await)
}

/// GET /robots.txt
async fn robots(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(state.config.base_url()),
    )
        .into_response()
}

/// GET /media/{*path}
async fn serve_media(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match state.media.read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type_for(&path)),
                (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
