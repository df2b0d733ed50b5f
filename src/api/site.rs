/// Server-rendered marketing pages
///
/// Pages are plain HTML with the SEO head, the enabled analytics snippets and a
/// project listing. Store failures degrade to the "No projects yet." state.

use crate::api::public::{analytics_snippets, carousel_projects, published_projects, send_contact, send_proposal};
use crate::api::AppState;
use crate::content::types::{PageSeo, Project, ProjectFilter};
use crate::content::{Category, Subcategory};
use crate::error::AppError;
use crate::html::escape;
use crate::mail::{ContactSubmission, ProposalSubmission};
use crate::richtext::{collect_shortcodes, DocumentRenderer, Shortcode};
use crate::seo::SeoHead;
use crate::sitemap::LEGAL_PAGES;
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::Value;
use std::collections::HashMap;

const EMPTY_STATE: &str = r#"<p class="empty">No projects yet.</p>"#;

/// Create marketing page routes
pub fn create_site_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/expertise", get(expertise))
        .route("/expertise/{category}", get(category_page))
        .route("/expertise/{category}/{subcategory}", get(subcategory_page))
        .route(
            "/expertise/{category}/{subcategory}/projects/{slug}",
            get(project_page),
        )
        .route("/legal/{page}", get(legal_page))
        .route("/contact", get(contact_page).post(contact_form))
        .route("/proposal", get(proposal_page).post(proposal_form))
}

// ---- shell --------------------------------------------------------------

/// Stored SEO row for a page; lookup failures fall back to defaults
async fn page_seo(state: &AppState, page_slug: &str) -> Option<PageSeo> {
    match state.storage.get_page_seo(page_slug).await {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("SEO lookup for '{}' failed, using defaults: {}", page_slug, e);
            None
        }
    }
}

/// Head for a site path, keyed in page_seo by the path without its leading slash
async fn head_for(state: &AppState, path: &str) -> SeoHead {
    let page_slug = match path.trim_matches('/') {
        "" => "home",
        slug => slug,
    };
    let row = page_seo(state, page_slug).await;
    SeoHead::from_page(path, row.as_ref(), &state.seo_defaults())
}

async fn render_page(state: &AppState, head: &SeoHead, body: &str) -> Html<String> {
    let analytics: String = analytics_snippets(state)
        .await
        .iter()
        .map(|snippet| snippet.render())
        .collect::<Vec<_>>()
        .join("\n");

    let nav: String = Category::ALL
        .iter()
        .map(|c| format!(r#"<a href="/expertise/{}">{}</a>"#, c.slug(), escape(c.label())))
        .collect::<Vec<_>>()
        .join("\n");

    let legal: String = LEGAL_PAGES
        .iter()
        .map(|(slug, title)| format!(r#"<a href="/legal/{}">{}</a>"#, slug, escape(title)))
        .collect::<Vec<_>>()
        .join("\n");

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{head}
{analytics}
</head>
<body>
<header>
<a href="/" class="brand">{site}</a>
<nav>
<a href="/expertise">Expertise</a>
{nav}
<a href="/contact">Contact</a>
<a href="/proposal">Request a proposal</a>
</nav>
</header>
<main>
{body}
</main>
<footer>
{legal}
</footer>
</body>
</html>"#,
        head = head.render(),
        analytics = analytics,
        site = escape(&state.config.site.name),
        nav = nav,
        body = body,
        legal = legal,
    ))
}

/// 404 page
pub async fn not_found(State(state): State<AppState>) -> Response {
    let mut row = PageSeo::empty("404");
    row.meta_title = Some(format!("Page not found | {}", state.config.site.name));
    row.is_indexed = false;
    let head = SeoHead::from_page("/404", Some(&row), &state.seo_defaults());

    let body = r#"<h1>Page not found</h1>
<p>The page you are looking for does not exist or has moved.</p>
<p><a href="/expertise">Browse our work</a></p>"#;

    (StatusCode::NOT_FOUND, render_page(&state, &head, body).await).into_response()
}

// ---- listings -----------------------------------------------------------

fn project_card(project: &Project) -> String {
    let cover = project
        .cover_image
        .as_deref()
        .map(|src| format!(r#"<img src="{}" alt="{}" loading="lazy">"#, escape(src), escape(&project.title)))
        .unwrap_or_default();

    format!(
        r#"<article class="project-card">
<a href="{url}">{cover}<h3>{title}</h3></a>
<p class="meta">{subcategory}</p>
<p>{summary}</p>
</article>"#,
        url = escape(&project.url()),
        cover = cover,
        title = escape(&project.title),
        subcategory = escape(project.subcategory.label()),
        summary = escape(&project.summary),
    )
}

fn project_grid(projects: &[Project]) -> String {
    if projects.is_empty() {
        return EMPTY_STATE.to_string();
    }
    let cards: Vec<String> = projects.iter().map(project_card).collect();
    format!("<div class=\"project-grid\">\n{}\n</div>", cards.join("\n"))
}

fn carousel_markup(projects: &[Project]) -> String {
    if projects.is_empty() {
        return EMPTY_STATE.to_string();
    }
    let slides: Vec<String> = projects
        .iter()
        .map(|p| format!("<li class=\"slide\">{}</li>", project_card(p)))
        .collect();
    format!("<ul class=\"carousel\">\n{}\n</ul>", slides.join("\n"))
}

fn image_gallery(project: &Project) -> String {
    let images: Vec<String> = project
        .gallery
        .iter()
        .map(|src| format!(r#"<img src="{}" alt="{}" loading="lazy">"#, escape(src), escape(&project.title)))
        .collect();
    format!("<div class=\"image-gallery\">\n{}\n</div>", images.join("\n"))
}

fn limited(limit: Option<u32>) -> Option<i64> {
    limit.map(i64::from)
}

// ---- shortcodes ---------------------------------------------------------

async fn render_shortcode(state: &AppState, code: &Shortcode) -> String {
    match code {
        Shortcode::ProjectGallery { category, subcategory, limit } => {
            let filter = ProjectFilter {
                category: *category,
                subcategory: *subcategory,
                limit: limited(*limit),
                ..ProjectFilter::published()
            };
            project_grid(&published_projects(state, &filter).await)
        }
        Shortcode::Carousel { limit } => {
            let mut projects = carousel_projects(state).await;
            if let Some(limit) = limit {
                projects.truncate(*limit as usize);
            }
            carousel_markup(&projects)
        }
        Shortcode::ImageGallery { project } => match state.storage.get_project_by_slug(project).await {
            Ok(Some(found)) if found.is_published() => image_gallery(&found),
            Ok(_) => {
                tracing::debug!("Image gallery shortcode points at missing project '{}'", project);
                String::new()
            }
            Err(e) => {
                tracing::error!("Image gallery lookup for '{}' failed: {}", project, e);
                String::new()
            }
        },
    }
}

/// Resolve every shortcode in a document, then render it
async fn render_document(state: &AppState, doc: &Value) -> String {
    let mut resolved: HashMap<Shortcode, String> = HashMap::new();
    for code in collect_shortcodes(doc) {
        if !resolved.contains_key(&code) {
            let html = render_shortcode(state, &code).await;
            resolved.insert(code, html);
        }
    }

    let lookup = |code: &Shortcode| resolved.get(code).cloned().unwrap_or_default();
    DocumentRenderer::new(&lookup).render(doc)
}

// ---- pages --------------------------------------------------------------

/// GET /
async fn home(State(state): State<AppState>) -> Html<String> {
    let carousel = carousel_projects(&state).await;
    let recent = published_projects(
        &state,
        &ProjectFilter {
            limit: Some(6),
            ..ProjectFilter::published()
        },
    )
    .await;

    let categories: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!(r#"<li><a href="/expertise/{}">{}</a></li>"#, c.slug(), escape(c.label())))
        .collect();

    let body = format!(
        r#"<h1>{site}</h1>
<section class="featured">
{carousel}
</section>
<section class="expertise">
<h2>Expertise</h2>
<ul>
{categories}
</ul>
</section>
<section class="recent">
<h2>Recent projects</h2>
{recent}
</section>"#,
        site = escape(&state.config.site.name),
        carousel = carousel_markup(&carousel),
        categories = categories.join("\n"),
        recent = project_grid(&recent),
    );

    let head = head_for(&state, "/").await;
    render_page(&state, &head, &body).await
}

/// GET /expertise
async fn expertise(State(state): State<AppState>) -> Html<String> {
    let sections: Vec<String> = Category::ALL
        .iter()
        .map(|category| {
            let links: Vec<String> = category
                .subcategories()
                .iter()
                .map(|s| {
                    format!(
                        r#"<li><a href="/expertise/{}/{}">{}</a></li>"#,
                        category.slug(),
                        s.slug(),
                        escape(s.label())
                    )
                })
                .collect();
            format!(
                "<section>\n<h2><a href=\"/expertise/{}\">{}</a></h2>\n<ul>\n{}\n</ul>\n</section>",
                category.slug(),
                escape(category.label()),
                links.join("\n")
            )
        })
        .collect();

    let body = format!("<h1>Expertise</h1>\n{}", sections.join("\n"));
    let head = head_for(&state, "/expertise").await;
    render_page(&state, &head, &body).await
}

/// GET /expertise/{category}
async fn category_page(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    let Some(category) = Category::from_slug(&category) else {
        return not_found(State(state)).await;
    };

    let links: Vec<String> = category
        .subcategories()
        .iter()
        .map(|s| {
            format!(
                r#"<li><a href="/expertise/{}/{}">{}</a></li>"#,
                category.slug(),
                s.slug(),
                escape(s.label())
            )
        })
        .collect();

    let filter = ProjectFilter {
        category: Some(category),
        ..ProjectFilter::published()
    };
    let projects = published_projects(&state, &filter).await;

    let body = format!(
        "<h1>{}</h1>\n<ul class=\"subcategories\">\n{}\n</ul>\n{}",
        escape(category.label()),
        links.join("\n"),
        project_grid(&projects)
    );

    let path = format!("/expertise/{}", category.slug());
    let head = head_for(&state, &path).await;
    render_page(&state, &head, &body).await.into_response()
}

/// GET /expertise/{category}/{subcategory}
async fn subcategory_page(
    State(state): State<AppState>,
    Path((category, subcategory)): Path<(String, String)>,
) -> Response {
    let Some((category, subcategory)) = resolve_taxonomy(&category, &subcategory) else {
        return not_found(State(state)).await;
    };

    let filter = ProjectFilter {
        category: Some(category),
        subcategory: Some(subcategory),
        ..ProjectFilter::published()
    };
    let projects = published_projects(&state, &filter).await;

    let body = format!(
        r#"<p class="breadcrumb"><a href="/expertise/{category_slug}">{category}</a></p>
<h1>{subcategory}</h1>
{grid}"#,
        category_slug = category.slug(),
        category = escape(category.label()),
        subcategory = escape(subcategory.label()),
        grid = project_grid(&projects),
    );

    let path = format!("/expertise/{}/{}", category.slug(), subcategory.slug());
    let head = head_for(&state, &path).await;
    render_page(&state, &head, &body).await.into_response()
}

fn resolve_taxonomy(category: &str, subcategory: &str) -> Option<(Category, Subcategory)> {
    let category = Category::from_slug(category)?;
    let subcategory = Subcategory::from_slug(category, subcategory)?;
    Some((category, subcategory))
}

/// GET /expertise/{category}/{subcategory}/projects/{slug}
///
/// Only published projects whose classification matches the path are shown.
async fn project_page(
    State(state): State<AppState>,
    Path((category, subcategory, slug)): Path<(String, String, String)>,
) -> Response {
    let Some((category, subcategory)) = resolve_taxonomy(&category, &subcategory) else {
        return not_found(State(state)).await;
    };

    let project = match state.storage.get_project_by_slug(&slug).await {
        Ok(Some(project))
            if project.is_published() && project.category == category && project.subcategory == subcategory =>
        {
            project
        }
        Ok(_) => return not_found(State(state)).await,
        Err(e) => {
            tracing::error!("Case study lookup for '{}' failed: {}", slug, e);
            return not_found(State(state)).await;
        }
    };

    let case_study = render_document(&state, &project.case_study_content).await;
    let cover = project
        .cover_image
        .as_deref()
        .map(|src| format!(r#"<img class="cover" src="{}" alt="{}">"#, escape(src), escape(&project.title)))
        .unwrap_or_default();
    let gallery = if project.gallery.is_empty() { String::new() } else { image_gallery(&project) };

    let body = format!(
        r#"<article class="case-study">
<p class="breadcrumb"><a href="/expertise/{category_slug}">{category}</a> / <a href="/expertise/{category_slug}/{subcategory_slug}">{subcategory}</a></p>
<h1>{title}</h1>
{cover}
<p class="summary">{summary}</p>
<div class="content">
{case_study}
</div>
{gallery}
</article>"#,
        category_slug = category.slug(),
        subcategory_slug = subcategory.slug(),
        category = escape(category.label()),
        subcategory = escape(subcategory.label()),
        title = escape(&project.title),
        cover = cover,
        summary = escape(&project.summary),
        case_study = case_study,
        gallery = gallery,
    );

    let row = page_seo(&state, project.url().trim_start_matches('/')).await;
    let head = SeoHead::for_project(&project, row.as_ref(), &state.seo_defaults());
    render_page(&state, &head, &body).await.into_response()
}

/// GET /legal/{page}
async fn legal_page(State(state): State<AppState>, Path(page): Path<String>) -> Response {
    let Some((slug, title)) = LEGAL_PAGES.iter().find(|(slug, _)| *slug == page) else {
        return not_found(State(state)).await;
    };

    let site = escape(&state.config.site.name);
    let text = match *slug {
        "privacy-policy" => format!(
            "{} collects the details you send through the contact and proposal forms only to answer your enquiry.",
            site
        ),
        "terms-of-service" => format!(
            "All renderings and animations shown on this site remain the property of {} and its clients.",
            site
        ),
        _ => "This site uses only the cookies required to run the admin console and the analytics tools listed in our privacy policy.".to_string(),
    };

    let body = format!("<h1>{}</h1>\n<p>{}</p>", escape(title), text);
    let head = head_for(&state, &format!("/legal/{}", slug)).await;
    render_page(&state, &head, &body).await.into_response()
}

// ---- forms --------------------------------------------------------------

fn field(label: &str, name: &str, kind: &str, required: bool) -> String {
    format!(
        r#"<label>{label} <input type="{kind}" name="{name}"{required}></label>"#,
        label = label,
        kind = kind,
        name = name,
        required = if required { " required" } else { "" }
    )
}

fn banner(message: Option<(&str, &str)>) -> String {
    message
        .map(|(class, text)| format!(r#"<p class="{}" role="alert">{}</p>"#, class, escape(text)))
        .unwrap_or_default()
}

fn contact_markup(message: Option<(&str, &str)>) -> String {
    format!(
        r#"<h1>Contact</h1>
{banner}
<form method="post" action="/contact">
{name}
{email}
{phone}
{company}
<label>Message <textarea name="message" rows="6" required></textarea></label>
<button type="submit">Send message</button>
</form>"#,
        banner = banner(message),
        name = field("Name", "name", "text", true),
        email = field("Email", "email", "email", true),
        phone = field("Phone", "phone", "tel", false),
        company = field("Company", "company", "text", false),
    )
}

fn proposal_markup(message: Option<(&str, &str)>) -> String {
    let services: Vec<String> = Subcategory::ALL
        .iter()
        .map(|s| format!(r#"<option value="{0}">{0}</option>"#, escape(s.label())))
        .collect();

    format!(
        r#"<h1>Request a proposal</h1>
{banner}
<form method="post" action="/proposal">
{name}
{email}
{company}
{phone}
<label>Service <select name="service" required>
{services}
</select></label>
{budget}
{timeline}
<label>Project details <textarea name="details" rows="8" required></textarea></label>
<button type="submit">Send request</button>
</form>"#,
        banner = banner(message),
        name = field("Name", "name", "text", true),
        email = field("Email", "email", "email", true),
        company = field("Company", "company", "text", false),
        phone = field("Phone", "phone", "tel", false),
        services = services.join("\n"),
        budget = field("Budget", "budget", "text", false),
        timeline = field("Timeline", "timeline", "text", false),
    )
}

/// Status and banner for a form submission outcome
fn submission_outcome(result: Result<(), AppError>, success: &'static str) -> (StatusCode, &'static str, String) {
    match result {
        Ok(()) => (StatusCode::OK, "notice", success.to_string()),
        Err(AppError::Validation(message)) => (StatusCode::BAD_REQUEST, "error", message),
        Err(e) => {
            tracing::error!("❌ Form submission could not be delivered: {}", e);
            (
                e.status_code(),
                "error",
                "Sorry, your message could not be sent. Please try again later.".to_string(),
            )
        }
    }
}

/// GET /contact
async fn contact_page(State(state): State<AppState>) -> Html<String> {
    let head = head_for(&state, "/contact").await;
    render_page(&state, &head, &contact_markup(None)).await
}

/// POST /contact (HTML form)
async fn contact_form(State(state): State<AppState>, Form(submission): Form<ContactSubmission>) -> Response {
    let result = send_contact(&state, &submission).await;
    let (status, class, message) = submission_outcome(result, "Thank you, we will be in touch shortly.");

    let head = head_for(&state, "/contact").await;
    let body = contact_markup(Some((class, &message)));
    (status, render_page(&state, &head, &body).await).into_response()
}

/// GET /proposal
async fn proposal_page(State(state): State<AppState>) -> Html<String> {
    let head = head_for(&state, "/proposal").await;
    render_page(&state, &head, &proposal_markup(None)).await
}

/// POST /proposal (HTML form)
async fn proposal_form(State(state): State<AppState>, Form(submission): Form<ProposalSubmission>) -> Response {
    let result = send_proposal(&state, &submission).await;
    let (status, class, message) = submission_outcome(result, "Thank you, your proposal request was sent.");

    let head = head_for(&state, "/proposal").await;
    let body = proposal_markup(Some((class, &message)));
    (status, render_page(&state, &head, &body).await).into_response()
}
