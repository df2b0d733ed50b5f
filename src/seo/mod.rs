/// Search and analytics metadata
///
/// Per-page head rendering from `page_seo` rows and the analytics snippet filter.

pub mod analytics;
pub mod meta;

pub use analytics::{injectable_snippets, sanitize_snippet, SanitizedSnippet};
pub use meta::{robots_content, SeoDefaults, SeoHead};
