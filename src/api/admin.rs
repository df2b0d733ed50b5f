/// Admin console endpoints
///
/// Every handler takes an `AdminSession`, so unauthorized requests are
/// redirected to the login page before any of this code runs.

use crate::api::auth::admin_page;
use crate::api::AppState;
use crate::auth::AdminSession;
use crate::content::carousel::move_item;
use crate::content::types::{AnalyticsCode, PageSeo, Project, ProjectCard, ProjectFilter, ProjectInput, ProjectStatus};
use crate::content::{Category, Subcategory};
use crate::error::{AppError, AppResult};
use crate::html::escape;
use crate::media::StoredMedia;
use crate::seo::sanitize_snippet;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Largest accepted image upload
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct AdminListQuery {
    pub status: Option<ProjectStatus>,
    pub category: Option<Category>,
    pub subcategory: Option<Subcategory>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CarouselOrderRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CarouselMoveRequest {
    pub project_id: String,
    pub to_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsRequest {
    pub code: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdminUserRequest {
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Create admin console routes
pub fn create_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        // Projects
        .route("/admin/api/projects", get(list_projects).post(create_project))
        .route(
            "/admin/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        // Carousel
        .route("/admin/api/carousel", get(get_carousel).put(save_carousel))
        .route("/admin/api/carousel/move", post(move_carousel_item))
        // Page SEO
        .route("/admin/api/seo", get(list_page_seo))
        .route(
            "/admin/api/seo/{*page_slug}",
            get(get_page_seo).put(save_page_seo).delete(delete_page_seo),
        )
        // Analytics
        .route("/admin/api/analytics", get(list_analytics))
        .route(
            "/admin/api/analytics/{platform}",
            put(save_analytics).delete(delete_analytics),
        )
        // Users
        .route("/admin/api/users", get(list_users).post(add_user))
        .route("/admin/api/users/{email}", delete(remove_user))
        // Media
        .route(
            "/admin/api/media/{bucket}/{filename}",
            put(upload_media).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}

/// GET /admin
async fn dashboard(State(state): State<AppState>, session: AdminSession) -> AppResult<Html<String>> {
    let (projects, published, pages, analytics) = state.storage.counts().await?;
    let who = session.email.as_deref().unwrap_or("dev login");

    let body = format!(
        r#"<p class="who">Signed in as {who}</p>
<ul class="stats">
<li><strong>{projects}</strong> projects ({published} published, {drafts} drafts)</li>
<li><strong>{pages}</strong> page SEO rows</li>
<li><strong>{analytics}</strong> analytics codes</li>
</ul>
<nav>
<a href="/admin/api/projects">Projects</a>
<a href="/admin/api/carousel">Carousel</a>
<a href="/admin/api/seo">Page SEO</a>
<a href="/admin/api/analytics">Analytics</a>
<a href="/admin/api/users">Users</a>
</nav>
<form method="post" action="/admin/api/logout"><button type="submit">Sign out</button></form>"#,
        who = escape(who),
        projects = projects,
        published = published,
        drafts = projects - published,
        pages = pages,
        analytics = analytics,
    );

    Ok(admin_page("Studio console", &body))
}

// ---- projects -----------------------------------------------------------

/// GET /admin/api/projects (drafts included unless filtered)
async fn list_projects(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<AdminListQuery>,
) -> AppResult<Json<Vec<Project>>> {
    let filter = ProjectFilter {
        status: query.status,
        category: query.category,
        subcategory: query.subcategory,
        limit: query.limit,
    };
    Ok(Json(state.storage.list_projects(&filter).await?))
}

/// POST /admin/api/projects
async fn create_project(
    State(state): State<AppState>,
    session: AdminSession,
    Json(input): Json<ProjectInput>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state.storage.create_project(input).await?;
    tracing::info!(
        "📝 {} created project '{}' ({})",
        session.email.as_deref().unwrap_or("dev login"),
        project.title,
        project.id
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /admin/api/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    state
        .storage
        .get_project(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))
}

/// PUT /admin/api/projects/{id}
async fn update_project(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
    Json(input): Json<ProjectInput>,
) -> AppResult<Json<Project>> {
    let project = state.storage.update_project(&id, input).await?;
    tracing::info!("📝 Updated project '{}' ({})", project.title, project.id);
    Ok(Json(project))
}

/// DELETE /admin/api/projects/{id}
async fn delete_project(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.storage.delete_project(&id).await? {
        return Err(AppError::NotFound(format!("Project {}", id)));
    }
    tracing::info!("🗑️ Deleted project {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// ---- carousel -----------------------------------------------------------

/// GET /admin/api/carousel
async fn get_carousel(State(state): State<AppState>, _session: AdminSession) -> AppResult<Json<Vec<ProjectCard>>> {
    let projects = state.storage.list_carousel().await?;
    Ok(Json(projects.iter().map(ProjectCard::from).collect()))
}

/// PUT /admin/api/carousel with the full id sequence
async fn save_carousel(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(request): Json<CarouselOrderRequest>,
) -> AppResult<Json<Vec<ProjectCard>>> {
    state.storage.set_carousel_order(&request.ids).await?;
    let projects = state.storage.list_carousel().await?;
    Ok(Json(projects.iter().map(ProjectCard::from).collect()))
}

/// POST /admin/api/carousel/move
///
/// Replays one drag-and-drop move against the current order and saves it.
async fn move_carousel_item(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(request): Json<CarouselMoveRequest>,
) -> AppResult<Json<Vec<ProjectCard>>> {
    let mut ids: Vec<String> = state
        .storage
        .list_carousel()
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    let from = ids
        .iter()
        .position(|id| *id == request.project_id)
        .ok_or_else(|| AppError::NotFound(format!("Project {} is not in the carousel", request.project_id)))?;

    move_item(&mut ids, from, request.to_index)?;
    state.storage.set_carousel_order(&ids).await?;

    let projects = state.storage.list_carousel().await?;
    Ok(Json(projects.iter().map(ProjectCard::from).collect()))
}

// ---- page SEO -----------------------------------------------------------

/// GET /admin/api/seo
async fn list_page_seo(State(state): State<AppState>, _session: AdminSession) -> AppResult<Json<Vec<PageSeo>>> {
    Ok(Json(state.storage.list_page_seo().await?))
}

/// GET /admin/api/seo/{*page_slug}
///
/// Unknown pages return an empty row so the editor can start from defaults.
async fn get_page_seo(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(page_slug): Path<String>,
) -> AppResult<Json<PageSeo>> {
    let page_slug = page_slug.trim_matches('/').to_string();
    let row = state.storage.get_page_seo(&page_slug).await?;
    Ok(Json(row.unwrap_or_else(|| PageSeo::empty(&page_slug))))
}

/// PUT /admin/api/seo/{*page_slug}
async fn save_page_seo(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(page_slug): Path<String>,
    Json(mut row): Json<PageSeo>,
) -> AppResult<Json<PageSeo>> {
    row.page_slug = page_slug.trim_matches('/').to_string();
    if row.page_slug.is_empty() {
        return Err(AppError::Validation("Page slug is required".to_string()));
    }
    Ok(Json(state.storage.upsert_page_seo(&row).await?))
}

/// DELETE /admin/api/seo/{*page_slug}
async fn delete_page_seo(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(page_slug): Path<String>,
) -> AppResult<StatusCode> {
    let page_slug = page_slug.trim_matches('/');
    if !state.storage.delete_page_seo(page_slug).await? {
        return Err(AppError::NotFound(format!("SEO for page '{}'", page_slug)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---- analytics ----------------------------------------------------------

/// GET /admin/api/analytics
///
/// Each row carries an `injectable` flag telling whether the site would emit it.
async fn list_analytics(State(state): State<AppState>, _session: AdminSession) -> AppResult<Json<Vec<Value>>> {
    let codes = state.storage.list_analytics_codes().await?;
    let rows = codes
        .into_iter()
        .map(|code| {
            let injectable = sanitize_snippet(&code.platform, &code.code).is_some();
            json!({
                "platform": code.platform,
                "code": code.code,
                "enabled": code.enabled,
                "updated_at": code.updated_at,
                "injectable": injectable,
            })
        })
        .collect();
    Ok(Json(rows))
}

/// PUT /admin/api/analytics/{platform}
async fn save_analytics(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(platform): Path<String>,
    Json(request): Json<AnalyticsRequest>,
) -> AppResult<Json<Value>> {
    let platform = platform.trim().to_lowercase();
    if platform.is_empty() {
        return Err(AppError::Validation("Platform is required".to_string()));
    }

    if request.enabled && sanitize_snippet(&platform, &request.code).is_none() {
        tracing::warn!("Analytics code for {} will not be injected: it failed the snippet filter", platform);
    }

    let saved = state
        .storage
        .upsert_analytics_code(&AnalyticsCode {
            platform,
            code: request.code,
            enabled: request.enabled,
            updated_at: String::new(),
        })
        .await?;

    let injectable = sanitize_snippet(&saved.platform, &saved.code).is_some();
    Ok(Json(json!({
        "platform": saved.platform,
        "code": saved.code,
        "enabled": saved.enabled,
        "updated_at": saved.updated_at,
        "injectable": injectable,
    })))
}

/// DELETE /admin/api/analytics/{platform}
async fn delete_analytics(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(platform): Path<String>,
) -> AppResult<StatusCode> {
    if !state.storage.delete_analytics_code(&platform).await? {
        return Err(AppError::NotFound(format!("Analytics code for {}", platform)));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---- users --------------------------------------------------------------

/// GET /admin/api/users
async fn list_users(State(state): State<AppState>, _session: AdminSession) -> AppResult<Json<Value>> {
    let users = state.auth.list_admin_users().await?;
    let primary = state.auth.access().snapshot().primary().to_string();
    Ok(Json(json!({ "primary": primary, "users": users })))
}

/// POST /admin/api/users
async fn add_user(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(request): Json<AdminUserRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    if !crate::mail::is_plausible_email(&request.email) {
        return Err(AppError::Validation(format!("'{}' is not a valid email address", request.email.trim())));
    }
    let user = state.auth.add_admin_user(&request.email, request.password.as_deref()).await?;
    tracing::info!("👤 Allow-listed admin {}", user.email);
    Ok((StatusCode::CREATED, Json(json!(user))))
}

/// DELETE /admin/api/users/{email}
async fn remove_user(
    State(state): State<AppState>,
    session: AdminSession,
    Path(email): Path<String>,
) -> AppResult<StatusCode> {
    if session.email.as_deref() == Some(email.trim().to_lowercase().as_str()) {
        return Err(AppError::Validation("You cannot remove your own account".to_string()));
    }
    state.auth.remove_admin_user(&email).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- media --------------------------------------------------------------

/// PUT /admin/api/media/{bucket}/{filename} with the raw image as body
async fn upload_media(
    State(state): State<AppState>,
    _session: AdminSession,
    Path((bucket, filename)): Path<(String, String)>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let stored: StoredMedia = state.media.upload(&bucket, &filename, &body).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
