/// URL slugs and project routes

use crate::content::taxonomy::{Category, Subcategory};

/// Turn a label into a URL segment.
///
/// Lowercases, collapses every whitespace run into a single `-`, then drops
/// anything outside `[a-z0-9-]`. "Interior & Exterior" becomes "interior--exterior".
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }

    out
}

/// Public case-study route for a project:
/// `/expertise/{category}/{subcategory}/projects/{slug}`
pub fn project_url(category: Category, subcategory: Subcategory, slug: &str) -> String {
    format!(
        "/expertise/{}/{}/projects/{}",
        category.slug(),
        subcategory.slug(),
        slug
    )
}

/// A slug is acceptable when slugifying it again changes nothing.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates_whitespace() {
        assert_eq!(slugify("Exterior Renderings"), "exterior-renderings");
        assert_eq!(slugify("  Villa   on\tthe Lake "), "-villa-on-the-lake-");
    }

    #[test]
    fn strips_characters_outside_the_slug_alphabet() {
        assert_eq!(slugify("3D Animations!"), "3d-animations");
        assert_eq!(slugify("Interior & Exterior"), "interior--exterior");
        assert_eq!(slugify("Café Müller"), "caf-mller");
    }

    #[test]
    fn project_url_is_derived_from_taxonomy_and_slug() {
        assert_eq!(
            project_url(
                Category::ArchitecturalVisualization,
                Subcategory::ThreeDAnimations,
                "harbour-tower"
            ),
            "/expertise/architectural-visualization/3d-animations/projects/harbour-tower"
        );
    }

    #[test]
    fn validates_slugs() {
        assert!(is_valid_slug("harbour-tower-2"));
        assert!(!is_valid_slug("Harbour Tower"));
        assert!(!is_valid_slug(""));
    }
}
