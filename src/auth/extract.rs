/// Request-scoped admin session
///
/// Handlers that take an `AdminSession` argument only run for authorized
/// requests; everything else is redirected to the login page.

use crate::api::AppState;
use crate::auth::access::{authorize, Authorization};
use crate::auth::session::{DEV_LOGIN_COOKIE, SESSION_COOKIE};
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::Redirect,
};

pub const LOGIN_PATH: &str = "/admin/login";

/// Read one cookie value from the request headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// The authorized identity behind an admin request
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Signed-in address; `None` when entering through the dev-login bypass
    pub email: Option<String>,
    pub token: Option<String>,
}

impl AdminSession {
    /// Resolve and authorize the caller
    pub async fn resolve(headers: &HeaderMap, state: &AppState) -> Authorization {
        let session = match cookie_value(headers, SESSION_COOKIE) {
            Some(token) => state.auth.get_session(&token).await,
            None => None,
        };

        let dev_login = state.config.admin.dev_login
            && cookie_value(headers, DEV_LOGIN_COOKIE).as_deref() == Some("true");

        let access = state.auth.access().snapshot();
        authorize(session.as_ref().map(|s| s.email.as_str()), &access, dev_login)
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Self::resolve(&parts.headers, state).await {
            Authorization::Allowed { email } => Ok(AdminSession {
                email: Some(email),
                token: cookie_value(&parts.headers, SESSION_COOKIE),
            }),
            Authorization::DevBypass => {
                tracing::debug!("Admin request admitted through dev login");
                Ok(AdminSession { email: None, token: None })
            }
            Authorization::RedirectToLogin => {
                tracing::debug!("Unauthorized admin request to {}, redirecting", parts.uri.path());
                Err(Redirect::to(LOGIN_PATH))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; studio_session=abc123 ; admin_dev_login=true"),
        );
        assert_eq!(cookie_value(&headers, SESSION_COOKIE).as_deref(), Some("abc123"));
        assert_eq!(cookie_value(&headers, DEV_LOGIN_COOKIE).as_deref(), Some("true"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }
}
