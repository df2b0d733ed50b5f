/// HTTP API Layer
///
/// This module provides every route the service exposes:
/// - Public JSON reads, form submissions, sitemap and robots (public)
/// - Server-rendered marketing pages (site)
/// - Admin sign-in, sign-out and password reset (auth)
/// - The content console behind the admin session (admin)

use crate::auth::AuthService;
use crate::config::Config;
use crate::content::ContentStorage;
use crate::mail::Mailer;
use crate::media::MediaStore;
use crate::seo::SeoDefaults;
use std::sync::Arc;

// Public read endpoints, forms, sitemap, robots, media
pub mod public;

// Marketing pages rendered as HTML
pub mod site;

// Admin authentication endpoints
pub mod auth;

// Admin console CRUD endpoints
pub mod admin;

// Re-export router builders
pub use admin::create_admin_routes;
pub use auth::create_auth_routes;
pub use public::create_public_routes;
pub use site::create_site_routes;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Content tables
    pub storage: ContentStorage,
    /// Sessions, allow-list and account operations
    pub auth: Arc<AuthService>,
    /// Transactional email client
    pub mailer: Mailer,
    /// Uploaded images
    pub media: MediaStore,
}

impl AppState {
    pub fn seo_defaults(&self) -> SeoDefaults {
        SeoDefaults {
            site_name: self.config.site.name.clone(),
            base_url: self.config.base_url().to_string(),
        }
    }
}
