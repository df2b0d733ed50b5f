/// Content layer
///
/// Everything the site publishes lives here:
/// - Project classification (fixed categories and subcategories) and slugs
/// - Row types for projects, page SEO, analytics codes and admin users
/// - SQLite schema and sqlx-backed storage
/// - Carousel ordering helpers

pub mod carousel;
pub mod database;
pub mod slug;
pub mod storage;
pub mod taxonomy;
pub mod types;

pub use database::ContentDatabase;
pub use slug::{project_url, slugify};
pub use storage::ContentStorage;
pub use taxonomy::{Category, Subcategory};
pub use types::{
    AdminUser, AnalyticsCode, PageSeo, Project, ProjectCard, ProjectFilter, ProjectInput, ProjectStatus,
};
