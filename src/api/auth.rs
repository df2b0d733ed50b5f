/// Admin authentication endpoints
///
/// JSON endpoints for the console plus plain HTML forms for signing in and
/// redeeming a reset link. The session token travels in an HttpOnly cookie.

use crate::api::AppState;
use crate::auth::session::{Session, SESSION_COOKIE};
use crate::auth::extract::{cookie_value, LOGIN_PATH};
use crate::auth::{AdminSession, Authorization};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::html::escape;
use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    pub token: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: String,
}

/// Create admin authentication routes
pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_page).post(login_form))
        .route("/admin/forgot-password", post(forgot_form))
        .route("/admin/reset-password", get(reset_page).post(reset_form))
        .route("/admin/api/login", post(login))
        .route("/admin/api/logout", post(logout))
        .route("/admin/api/session", get(current_session))
        .route("/admin/api/password-reset", post(request_reset))
        .route("/admin/api/password-reset/confirm", post(confirm_reset))
}

/// Cookie attributes shared by the session cookie and its removal.
/// `Secure` is added whenever the site is served over https.
fn cookie_attributes(config: &Config) -> &'static str {
    if config.base_url().starts_with("https://") {
        "HttpOnly; SameSite=Lax; Path=/; Secure"
    } else {
        "HttpOnly; SameSite=Lax; Path=/"
    }
}

fn session_cookie(session: &Session, config: &Config) -> String {
    format!(
        "{}={}; {}; Max-Age={}",
        SESSION_COOKIE,
        session.token,
        cookie_attributes(config),
        config.admin.session_ttl_hours.max(1) * 3600
    )
}

fn cleared_cookie(config: &Config) -> String {
    format!("{}=; {}; Max-Age=0", SESSION_COOKIE, cookie_attributes(config))
}

/// Minimal standalone page used by the admin forms
pub fn admin_page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="robots" content="noindex, nofollow">
<title>{title}</title>
</head>
<body class="admin">
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        body = body
    ))
}

fn notice(class: &str, message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<p class="{}" role="alert">{}</p>"#, class, escape(m)))
        .unwrap_or_default()
}

const RESET_SENT: &str = "If that address belongs to an admin, a reset link is on its way.";

/// Sign-in form preceded by an optional banner
fn login_markup(banner: String, email: &str) -> Html<String> {
    admin_page(
        "Admin sign in",
        &format!(
            r#"{banner}
<form method="post" action="/admin/login">
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>
<form method="post" action="/admin/forgot-password" class="reset">
<label>Forgot your password? <input type="email" name="email" placeholder="you@example.com" required></label>
<button type="submit">Email me a reset link</button>
</form>"#,
            banner = banner,
            email = escape(email)
        ),
    )
}

/// GET /admin/login
///
/// Already authorized visitors go straight to the console.
async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match AdminSession::resolve(&headers, &state).await {
        Authorization::RedirectToLogin => login_markup(String::new(), "").into_response(),
        _ => Redirect::to("/admin").into_response(),
    }
}

/// POST /admin/login (HTML form)
async fn login_form(State(state): State<AppState>, Form(request): Form<LoginRequest>) -> Response {
    match state.auth.sign_in_with_password(&request.email, &request.password).await {
        Ok(session) => {
            tracing::info!("🔐 Admin {} signed in", session.email);
            (
                StatusCode::SEE_OTHER,
                [
                    (header::SET_COOKIE, session_cookie(&session, &state.config)),
                    (header::LOCATION, "/admin".to_string()),
                ],
            )
                .into_response()
        }
        Err(AppError::Unauthorized(message)) => (
            StatusCode::UNAUTHORIZED,
            login_markup(notice("error", Some(&message)), &request.email),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /admin/api/login
async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> AppResult<Response> {
    let session = state.auth.sign_in_with_password(&request.email, &request.password).await?;
    tracing::info!("🔐 Admin {} signed in", session.email);

    let cookie = session_cookie(&session, &state.config);
    Ok(([(header::SET_COOKIE, cookie)], Json(json!({ "session": session }))).into_response())
}

/// POST /admin/api/logout
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        state.auth.sign_out(&token).await;
    }
    ([(header::SET_COOKIE, cleared_cookie(&state.config))], Json(json!({ "success": true }))).into_response()
}

/// GET /admin/api/session
///
/// Reports the current session, or null; never redirects.
async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let session = match cookie_value(&headers, SESSION_COOKIE) {
        Some(token) => state.auth.get_session(&token).await,
        None => None,
    };
    Json(json!({ "session": session }))
}

/// POST /admin/api/password-reset
///
/// Always succeeds so the response does not reveal which addresses are admins.
async fn request_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> AppResult<Json<Value>> {
    state.auth.reset_password_for_email(&request.email).await?;
    Ok(Json(json!({
        "success": true,
        "message": RESET_SENT
    })))
}

/// POST /admin/api/password-reset/confirm
async fn confirm_reset(
    State(state): State<AppState>,
    Json(request): Json<ResetConfirmRequest>,
) -> AppResult<Json<Value>> {
    state.auth.confirm_password_reset(&request.token, &request.password).await?;
    Ok(Json(json!({ "success": true })))
}

/// POST /admin/forgot-password (HTML form)
async fn forgot_form(State(state): State<AppState>, Form(request): Form<ResetRequest>) -> Response {
    match state.auth.reset_password_for_email(&request.email).await {
        Ok(()) => login_markup(notice("notice", Some(RESET_SENT)), &request.email).into_response(),
        Err(e) => e.into_response(),
    }
}

fn reset_markup(token: &str, error: Option<&str>) -> Html<String> {
    let error = notice("error", error);

    admin_page(
        "Choose a new password",
        &format!(
            r#"{error}
<form method="post" action="/admin/reset-password">
<input type="hidden" name="token" value="{token}">
<label>New password <input type="password" name="password" minlength="8" required></label>
<button type="submit">Save password</button>
</form>"#,
            error = error,
            token = escape(token)
        ),
    )
}

/// GET /admin/reset-password?token=..
async fn reset_page(Query(query): Query<TokenQuery>) -> Response {
    if query.token.is_empty() {
        return Redirect::to(LOGIN_PATH).into_response();
    }
    reset_markup(&query.token, None).into_response()
}

/// POST /admin/reset-password (HTML form)
async fn reset_form(State(state): State<AppState>, Form(request): Form<ResetConfirmRequest>) -> Response {
    match state.auth.confirm_password_reset(&request.token, &request.password).await {
        Ok(()) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e @ (AppError::Unauthorized(_) | AppError::Validation(_))) => {
            (e.status_code(), reset_markup(&request.token, Some(&e.to_string()))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session() -> Session {
        Session {
            token: "abc123".to_string(),
            email: "owner@studio.example".to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::hours(12),
        }
    }

    fn config(base_url: &str) -> Config {
        let mut config = Config::default();
        config.site.base_url = base_url.to_string();
        config.admin.session_ttl_hours = 12;
        config
    }

    #[test]
    fn https_sites_mark_the_session_cookie_secure() {
        let config = config("https://studio.example/");
        let cookie = session_cookie(&session(), &config);
        assert!(cookie.starts_with("studio_session=abc123; HttpOnly"));
        assert!(cookie.contains("; Secure"));
        assert!(cookie.ends_with("Max-Age=43200"));
        assert!(cleared_cookie(&config).contains("; Secure"));
    }

    #[test]
    fn plain_http_sites_leave_secure_off() {
        let config = config("http://localhost:3004");
        assert!(!session_cookie(&session(), &config).contains("Secure"));
        assert!(!cleared_cookie(&config).contains("Secure"));
    }
}
