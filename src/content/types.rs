/// Content type definitions
///
/// Rows of the content database as the site and the admin console see them.
/// Timestamps are kept as the RFC 3339 text stored in the database so they can be
/// emitted verbatim (sitemap lastmod, API payloads).

use crate::content::slug::{is_valid_slug, project_url, slugify};
use crate::content::taxonomy::{Category, Subcategory};
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Publication state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    Published,
    #[default]
    Draft,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Published => "Published",
            ProjectStatus::Draft => "Draft",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "published" => Ok(ProjectStatus::Published),
            "draft" => Ok(ProjectStatus::Draft),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// A portfolio entry (case study)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Unique across all projects
    pub slug: String,
    pub category: Category,
    pub subcategory: Subcategory,
    pub summary: String,
    pub cover_image: Option<String>,
    pub gallery: Vec<String>,
    /// Rich-text document (ProseMirror-style JSON)
    pub case_study_content: Value,
    pub show_in_carousel: bool,
    pub carousel_order: Option<i64>,
    pub status: ProjectStatus,
    #[serde(flatten)]
    pub seo: ProjectSeo,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-project search and social metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSeo {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub og_title: Option<String>,
    #[serde(default)]
    pub og_description: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub schema_json: Option<String>,
}

impl Project {
    /// Site-relative case-study URL
    pub fn url(&self) -> String {
        project_url(self.category, self.subcategory, &self.slug)
    }

    pub fn is_published(&self) -> bool {
        self.status == ProjectStatus::Published
    }
}

/// Listing view of a project, as gallery and carousel cards use it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub subcategory: Subcategory,
    pub summary: String,
    pub cover_image: Option<String>,
    pub carousel_order: Option<i64>,
    pub url: String,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            slug: project.slug.clone(),
            category: project.category,
            subcategory: project.subcategory,
            summary: project.summary.clone(),
            cover_image: project.cover_image.clone(),
            carousel_order: project.carousel_order,
            url: project.url(),
        }
    }
}

/// Admin form state for creating or updating a project, mapped 1:1 to columns
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub category: Category,
    pub subcategory: Subcategory,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub case_study_content: Option<Value>,
    #[serde(default)]
    pub show_in_carousel: bool,
    #[serde(default)]
    pub carousel_order: Option<i64>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(flatten)]
    pub seo: ProjectSeo,
}

impl ProjectInput {
    /// Validate the form and fill derived values (slug from title, empty document)
    pub fn normalized(mut self) -> AppResult<Self> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        if self.subcategory.category() != self.category {
            return Err(AppError::Validation(format!(
                "Subcategory '{}' does not belong to category '{}'",
                self.subcategory, self.category
            )));
        }

        let slug = match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(&self.title),
        };
        if !is_valid_slug(&slug) {
            return Err(AppError::Validation(format!(
                "Slug '{}' may only contain lowercase letters, digits and hyphens",
                slug
            )));
        }
        self.slug = Some(slug);

        if self.case_study_content.is_none() {
            self.case_study_content = Some(serde_json::json!({ "type": "doc", "content": [] }));
        }

        Ok(self)
    }
}

/// Listing filter for project queries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub subcategory: Option<Subcategory>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ProjectFilter {
    pub fn published() -> Self {
        Self {
            status: Some(ProjectStatus::Published),
            ..Self::default()
        }
    }
}

/// Per-route metadata record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSeo {
    pub page_slug: String,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_indexed: bool,
    #[serde(default = "default_true")]
    pub is_followed: bool,
    #[serde(default)]
    pub og_title: Option<String>,
    #[serde(default)]
    pub og_description: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub og_type: Option<String>,
    #[serde(default)]
    pub schema_json: Option<String>,
    #[serde(default)]
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

impl PageSeo {
    /// An empty row for a page slug; indexing and following default to on
    pub fn empty(page_slug: &str) -> Self {
        Self {
            page_slug: page_slug.to_string(),
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            canonical_url: None,
            is_indexed: true,
            is_followed: true,
            og_title: None,
            og_description: None,
            og_image: None,
            og_type: None,
            schema_json: None,
            updated_at: String::new(),
        }
    }
}

/// One tracking platform's raw snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsCode {
    pub platform: String,
    pub code: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub updated_at: String,
}

/// Admin allow-list entry
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> ProjectInput {
        serde_json::from_value(value).expect("valid project input")
    }

    #[test]
    fn slug_defaults_to_slugified_title() {
        let normalized = input(json!({
            "title": "  Lakeside Villa ",
            "category": "Architectural Visualization",
            "subcategory": "Exterior Renderings"
        }))
        .normalized()
        .unwrap();

        assert_eq!(normalized.title, "Lakeside Villa");
        assert_eq!(normalized.slug.as_deref(), Some("lakeside-villa"));
        assert_eq!(normalized.status, ProjectStatus::Draft);
        assert!(normalized.case_study_content.is_some());
    }

    #[test]
    fn rejects_mismatched_subcategory() {
        let err = input(json!({
            "title": "Bottle",
            "category": "Product Visualization",
            "subcategory": "Floor Plans"
        }))
        .normalized()
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_slug() {
        let err = input(json!({
            "title": "Bottle",
            "slug": "Bottle Shot",
            "category": "Product Visualization",
            "subcategory": "Packaging Design"
        }))
        .normalized()
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("published".parse::<ProjectStatus>(), Ok(ProjectStatus::Published));
        assert!("archived".parse::<ProjectStatus>().is_err());
    }
}
