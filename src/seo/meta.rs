/// Page head metadata
///
/// Builds the `<head>` fragment for a page from its SEO row: title, description,
/// keywords, robots directives, canonical link, Open Graph and Twitter tags, and
/// an optional JSON-LD block.

use crate::content::types::{PageSeo, Project};
use crate::html::escape;
use crate::richtext::plain_text;
use serde::Serialize;
use serde_json::Value;

/// Longest description derived from case-study text
const DESCRIPTION_CHARS: usize = 160;

/// First `max` characters of `text`, cut at a word boundary
fn excerpt(text: &str, max: usize) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.chars().count() <= max {
        return Some(text.to_string());
    }

    // One extra char so a word ending exactly at `max` is kept
    let window: String = text.chars().take(max + 1).collect();
    let cut = match window.rfind(' ') {
        Some(space) if space > 0 => window[..space].to_string(),
        _ => text.chars().take(max).collect(),
    };
    Some(format!("{}…", cut.trim_end()))
}

/// Robots directive for a page, e.g. "noindex, follow"
pub fn robots_content(is_indexed: bool, is_followed: bool) -> String {
    format!(
        "{}, {}",
        if is_indexed { "index" } else { "noindex" },
        if is_followed { "follow" } else { "nofollow" }
    )
}

/// Site-wide fallbacks used when a page has no row or leaves fields empty
#[derive(Debug, Clone)]
pub struct SeoDefaults {
    pub site_name: String,
    pub base_url: String,
}

/// A single `<meta>` tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaTag {
    /// "name" or "property"
    pub attribute: &'static str,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    fn name(key: &str, content: impl Into<String>) -> Self {
        Self { attribute: "name", key: key.to_string(), content: content.into() }
    }

    fn property(key: &str, content: impl Into<String>) -> Self {
        Self { attribute: "property", key: key.to_string(), content: content.into() }
    }

    fn render(&self) -> String {
        format!(
            r#"<meta {}="{}" content="{}">"#,
            self.attribute,
            escape(&self.key),
            escape(&self.content)
        )
    }
}

/// Everything that goes into a page's `<head>` apart from analytics
#[derive(Debug, Clone, Serialize)]
pub struct SeoHead {
    pub title: String,
    pub robots: String,
    pub meta: Vec<MetaTag>,
    pub canonical: Option<String>,
    /// Compact JSON-LD, present only when the stored schema parsed
    pub json_ld: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a stored JSON-LD string. Malformed schema is logged and dropped.
pub fn parse_schema(raw: Option<&str>) -> Option<Value> {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if value.is_object() || value.is_array() => Some(value),
        Ok(_) => {
            tracing::warn!("Ignoring JSON-LD schema that is not an object or array");
            None
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed JSON-LD schema: {}", e);
            None
        }
    }
}

impl SeoHead {
    /// Head for a page with an optional SEO row
    pub fn from_page(path: &str, row: Option<&PageSeo>, defaults: &SeoDefaults) -> Self {
        let empty = PageSeo::empty("");
        let row = row.unwrap_or(&empty);

        let title = non_empty(&row.meta_title)
            .map(str::to_string)
            .unwrap_or_else(|| defaults.site_name.clone());
        let robots = robots_content(row.is_indexed, row.is_followed);

        let mut meta = Vec::new();
        if let Some(description) = non_empty(&row.meta_description) {
            meta.push(MetaTag::name("description", description));
        }
        if let Some(keywords) = non_empty(&row.meta_keywords) {
            meta.push(MetaTag::name("keywords", keywords));
        }
        meta.push(MetaTag::name("robots", robots.clone()));

        let canonical = non_empty(&row.canonical_url)
            .map(str::to_string)
            .or_else(|| Some(format!("{}{}", defaults.base_url.trim_end_matches('/'), path)));

        let og_title = non_empty(&row.og_title).unwrap_or(&title).to_string();
        meta.push(MetaTag::property("og:title", og_title.clone()));
        if let Some(description) = non_empty(&row.og_description).or(non_empty(&row.meta_description)) {
            meta.push(MetaTag::property("og:description", description));
            meta.push(MetaTag::name("twitter:description", description));
        }
        meta.push(MetaTag::property("og:type", non_empty(&row.og_type).unwrap_or("website")));
        meta.push(MetaTag::property("og:site_name", defaults.site_name.clone()));
        if let Some(url) = &canonical {
            meta.push(MetaTag::property("og:url", url.clone()));
        }
        if let Some(image) = non_empty(&row.og_image) {
            meta.push(MetaTag::property("og:image", image));
            meta.push(MetaTag::name("twitter:card", "summary_large_image"));
            meta.push(MetaTag::name("twitter:image", image));
        } else {
            meta.push(MetaTag::name("twitter:card", "summary"));
        }
        meta.push(MetaTag::name("twitter:title", og_title));

        let json_ld = parse_schema(row.schema_json.as_deref()).map(|v| v.to_string());

        Self { title, robots, meta, canonical, json_ld }
    }

    /// Head for a case study: project fields first, then the page row, then defaults
    pub fn for_project(project: &Project, row: Option<&PageSeo>, defaults: &SeoDefaults) -> Self {
        let mut merged = row.cloned().unwrap_or_else(|| PageSeo::empty(&project.slug));
        let seo = &project.seo;

        merged.meta_title = non_empty(&seo.meta_title)
            .map(str::to_string)
            .or(merged.meta_title)
            .or_else(|| Some(format!("{} | {}", project.title, defaults.site_name)));
        merged.meta_description = non_empty(&seo.meta_description)
            .map(str::to_string)
            .or(merged.meta_description)
            .or_else(|| Some(project.summary.clone()).filter(|s| !s.trim().is_empty()))
            .or_else(|| excerpt(&plain_text(&project.case_study_content), DESCRIPTION_CHARS));
        merged.meta_keywords = non_empty(&seo.meta_keywords).map(str::to_string).or(merged.meta_keywords);
        merged.canonical_url = non_empty(&seo.canonical_url).map(str::to_string).or(merged.canonical_url);
        merged.og_title = non_empty(&seo.og_title).map(str::to_string).or(merged.og_title);
        merged.og_description = non_empty(&seo.og_description).map(str::to_string).or(merged.og_description);
        merged.og_image = non_empty(&seo.og_image)
            .map(str::to_string)
            .or(merged.og_image)
            .or_else(|| project.cover_image.clone());
        merged.og_type = merged.og_type.or_else(|| Some("article".to_string()));
        merged.schema_json = non_empty(&seo.schema_json).map(str::to_string).or(merged.schema_json);

        Self::from_page(&project.url(), Some(&merged), defaults)
    }

    /// Render the head fragment
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("<title>{}</title>\n", escape(&self.title)));
        for tag in &self.meta {
            out.push_str(&tag.render());
            out.push('\n');
        }
        if let Some(canonical) = &self.canonical {
            out.push_str(&format!(r#"<link rel="canonical" href="{}">"#, escape(canonical)));
            out.push('\n');
        }
        if let Some(json_ld) = &self.json_ld {
            out.push_str(&format!(
                "<script type=\"application/ld+json\">{}</script>\n",
                json_ld.replace("</", "<\\/")
            ));
        }
        out
    }

    /// Content of the robots meta tag
    pub fn robots(&self) -> &str {
        &self.robots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SeoDefaults {
        SeoDefaults {
            site_name: "Studio".to_string(),
            base_url: "https://studio.example/".to_string(),
        }
    }

    #[test]
    fn robots_content_combines_both_flags() {
        assert_eq!(robots_content(true, true), "index, follow");
        assert_eq!(robots_content(false, true), "noindex, follow");
        assert_eq!(robots_content(true, false), "index, nofollow");
        assert_eq!(robots_content(false, false), "noindex, nofollow");
    }

    #[test]
    fn noindex_row_renders_exact_robots_meta() {
        let mut row = PageSeo::empty("home");
        row.is_indexed = false;
        row.is_followed = true;

        let head = SeoHead::from_page("/", Some(&row), &defaults());
        assert_eq!(head.robots(), "noindex, follow");
        assert!(head.render().contains(r#"<meta name="robots" content="noindex, follow">"#));
    }

    #[test]
    fn missing_row_falls_back_to_site_defaults() {
        let head = SeoHead::from_page("/expertise", None, &defaults());
        assert_eq!(head.title, "Studio");
        assert_eq!(head.robots(), "index, follow");
        assert_eq!(head.canonical.as_deref(), Some("https://studio.example/expertise"));
        assert!(head.json_ld.is_none());
    }

    #[test]
    fn malformed_schema_is_ignored() {
        let mut row = PageSeo::empty("home");
        row.schema_json = Some("{\"@type\": ".to_string());
        let head = SeoHead::from_page("/", Some(&row), &defaults());
        assert!(head.json_ld.is_none());
        assert!(!head.render().contains("ld+json"));
    }

    #[test]
    fn schema_cannot_close_its_script_element() {
        let mut row = PageSeo::empty("home");
        row.schema_json = Some(r#"{"@type":"Organization","name":"</script><b>"}"#.to_string());
        let rendered = SeoHead::from_page("/", Some(&row), &defaults()).render();
        assert!(rendered.contains(r#"<\/script><b>"#));
        assert_eq!(rendered.matches("</script>").count(), 1);
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut row = PageSeo::empty("home");
        row.meta_description = Some(r#"Renders "that" <pop>"#.to_string());
        let rendered = SeoHead::from_page("/", Some(&row), &defaults()).render();
        assert!(rendered.contains("Renders &quot;that&quot; &lt;pop&gt;"));
    }

    #[test]
    fn long_text_is_cut_at_a_word() {
        assert_eq!(excerpt("  ", 10), None);
        assert_eq!(excerpt("short one", 20).as_deref(), Some("short one"));
        assert_eq!(excerpt("aerial views of the harbour", 15).as_deref(), Some("aerial views of…"));
    }
}
