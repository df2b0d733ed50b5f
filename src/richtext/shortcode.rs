/// Bracket shortcodes embedded in page copy
///
/// Tokens such as `[project-gallery category="Product Visualization" limit=6]`
/// are parsed into a closed set of components with typed props. Anything that
/// does not parse stays in the copy as plain text.

use crate::content::taxonomy::{Category, Subcategory};
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Dynamic components that copy can embed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum Shortcode {
    /// `[project-gallery category=".." subcategory=".." limit=N]`
    ProjectGallery {
        category: Option<Category>,
        subcategory: Option<Subcategory>,
        limit: Option<u32>,
    },
    /// `[carousel limit=N]`
    Carousel { limit: Option<u32> },
    /// `[image-gallery project="slug"]`
    ImageGallery { project: String },
}

/// Piece of text after shortcode extraction
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Shortcode(Shortcode),
}

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[([a-z][a-z0-9-]*)((?:\s+[a-z_]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'\]]+))*)\s*\]"#)
        .expect("valid shortcode pattern")
});

static ATTRIBUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-z_]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'\]]+))"#).expect("valid attribute pattern")
});

fn parse_limit(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("limit must be a positive integer, got '{}'", value))
}

impl Shortcode {
    /// Build a component from its token name and raw attributes
    pub fn from_parts(name: &str, attrs: &HashMap<String, String>) -> Result<Self, String> {
        let allowed: &[&str] = match name {
            "project-gallery" => &["category", "subcategory", "limit"],
            "carousel" => &["limit"],
            "image-gallery" => &["project"],
            other => return Err(format!("unknown shortcode '{}'", other)),
        };
        if let Some(unknown) = attrs.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(format!("'{}' does not accept '{}'", name, unknown));
        }

        let limit = attrs.get("limit").map(|v| parse_limit(v)).transpose()?;

        match name {
            "project-gallery" => {
                let category = attrs.get("category").map(|v| v.parse::<Category>()).transpose()?;
                let subcategory = attrs
                    .get("subcategory")
                    .map(|v| v.parse::<Subcategory>())
                    .transpose()?;
                if let (Some(category), Some(subcategory)) = (category, subcategory) {
                    if subcategory.category() != category {
                        return Err(format!("'{}' is not part of '{}'", subcategory, category));
                    }
                }
                Ok(Shortcode::ProjectGallery { category, subcategory, limit })
            }
            "carousel" => Ok(Shortcode::Carousel { limit }),
            _ => {
                let project = attrs
                    .get("project")
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| "image-gallery requires a project slug".to_string())?;
                Ok(Shortcode::ImageGallery { project })
            }
        }
    }

    /// Parse a string that is exactly one token
    pub fn parse(token: &str) -> Option<Self> {
        match split(token.trim()).as_slice() {
            [Segment::Shortcode(code)] => Some(code.clone()),
            _ => None,
        }
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_string()));
    }
}

/// Split text into literal runs and recognised shortcodes
pub fn split(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for captures in TOKEN_PATTERN.captures_iter(text) {
        let Some(whole) = captures.get(0) else { continue };
        push_text(&mut segments, &text[cursor..whole.start()]);
        cursor = whole.end();

        let name = &captures[1];
        let attrs: HashMap<String, String> = ATTRIBUTE_PATTERN
            .captures_iter(captures.get(2).map_or("", |m| m.as_str()))
            .filter_map(|attr| {
                let value = attr.get(2).or_else(|| attr.get(3)).or_else(|| attr.get(4))?;
                Some((attr[1].to_string(), value.as_str().to_string()))
            })
            .collect();

        match Shortcode::from_parts(name, &attrs) {
            Ok(code) => segments.push(Segment::Shortcode(code)),
            Err(reason) => {
                tracing::warn!("Leaving shortcode {} as text: {}", whole.as_str(), reason);
                push_text(&mut segments, whole.as_str());
            }
        }
    }

    push_text(&mut segments, &text[cursor..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_props() {
        assert_eq!(
            Shortcode::parse(r#"[project-gallery category="Product Visualization" limit=6]"#),
            Some(Shortcode::ProjectGallery {
                category: Some(Category::ProductVisualization),
                subcategory: None,
                limit: Some(6),
            })
        );
        assert_eq!(
            Shortcode::parse("[image-gallery project='harbour-tower']"),
            Some(Shortcode::ImageGallery { project: "harbour-tower".to_string() })
        );
        assert_eq!(Shortcode::parse("[carousel]"), Some(Shortcode::Carousel { limit: None }));
    }

    #[test]
    fn accepts_slugs_for_taxonomy_props() {
        assert_eq!(
            Shortcode::parse("[project-gallery subcategory=virtual-tours]"),
            Some(Shortcode::ProjectGallery {
                category: None,
                subcategory: Some(Subcategory::VirtualTours),
                limit: None,
            })
        );
    }

    #[test]
    fn invalid_tokens_remain_text() {
        let segments = split("See [unknown-thing] and [carousel limit=zero] here");
        assert_eq!(
            segments,
            vec![Segment::Text("See [unknown-thing] and [carousel limit=zero] here".to_string())]
        );
    }

    #[test]
    fn mismatched_taxonomy_is_rejected() {
        assert_eq!(
            Shortcode::parse(r#"[project-gallery category="Product Visualization" subcategory="Floor Plans"]"#),
            None
        );
    }

    #[test]
    fn splits_text_around_tokens() {
        let segments = split("Before [carousel limit=3] after");
        assert_eq!(
            segments,
            vec![
                Segment::Text("Before ".to_string()),
                Segment::Shortcode(Shortcode::Carousel { limit: Some(3) }),
                Segment::Text(" after".to_string()),
            ]
        );
    }

    #[test]
    fn plain_brackets_are_untouched() {
        assert_eq!(split("[1] a footnote"), vec![Segment::Text("[1] a footnote".to_string())]);
    }
}
