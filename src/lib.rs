/// Studio site: portfolio website and content console for a 3D visualization studio
///
/// Serves the public marketing pages and JSON API, and the admin console that
/// manages projects, the homepage carousel, page SEO and analytics snippets.

// Core configuration and setup
pub mod config;

// Shared error type
pub mod error;

// HTML escaping helpers
pub mod html;

// Content layer - taxonomy, projects, page SEO, analytics codes, admin users
pub mod content;

// SEO head rendering and analytics snippet filtering
pub mod seo;

// Case-study documents and shortcodes
pub mod richtext;

// Sitemap and robots.txt
pub mod sitemap;

// Transactional email
pub mod mail;

// Image uploads
pub mod media;

// Admin sessions and authorization
pub mod auth;

// HTTP API layer - public pages and JSON, admin console
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use api::AppState;
pub use content::{Category, Project, Subcategory};
pub use error::{AppError, AppResult};
pub use server::{build_router, build_state, create_app, start_server};
