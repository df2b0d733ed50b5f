/// Sitemap and robots.txt generation
///
/// Static marketing routes are always listed; every published project adds its
/// case-study URL with `lastmod` taken verbatim from the row's `updated_at`.

use crate::content::taxonomy::Category;
use crate::content::types::Project;
use crate::html::escape;
use serde::Serialize;

/// Legal pages served under `/legal/{slug}`: (slug, title)
pub const LEGAL_PAGES: [(&str, &str); 3] = [
    ("privacy-policy", "Privacy Policy"),
    ("terms-of-service", "Terms of Service"),
    ("cookie-policy", "Cookie Policy"),
];

/// One `<url>` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Every static route with its change frequency and priority
pub fn static_routes() -> Vec<(String, &'static str, &'static str)> {
    let mut routes = vec![
        ("/".to_string(), "weekly", "1.0"),
        ("/expertise".to_string(), "weekly", "0.9"),
    ];

    for category in Category::ALL {
        routes.push((format!("/expertise/{}", category.slug()), "weekly", "0.8"));
        for subcategory in category.subcategories() {
            routes.push((
                format!("/expertise/{}/{}", category.slug(), subcategory.slug()),
                "weekly",
                "0.7",
            ));
        }
    }

    routes.push(("/contact".to_string(), "monthly", "0.6"));
    routes.push(("/proposal".to_string(), "monthly", "0.6"));
    for (slug, _) in LEGAL_PAGES {
        routes.push((format!("/legal/{}", slug), "yearly", "0.3"));
    }

    routes
}

/// Build the entry list. `today` is the lastmod used for static pages.
pub fn build_entries(base_url: &str, projects: &[Project], today: &str) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');

    let mut entries: Vec<SitemapEntry> = static_routes()
        .into_iter()
        .map(|(path, changefreq, priority)| SitemapEntry {
            loc: format!("{}{}", base, path),
            lastmod: today.to_string(),
            changefreq,
            priority,
        })
        .collect();

    entries.extend(
        projects
            .iter()
            .filter(|project| project.is_published())
            .map(|project| SitemapEntry {
                loc: format!("{}{}", base, project.url()),
                lastmod: project.updated_at.clone(),
                changefreq: "monthly",
                priority: "0.8",
            }),
    );

    entries
}

/// Render entries as a sitemap.org `urlset`
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape(&entry.loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape(&entry.lastmod)));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Static robots.txt pointing crawlers at the sitemap
pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::taxonomy::Subcategory;
    use crate::content::types::{ProjectSeo, ProjectStatus};
    use pretty_assertions::assert_eq;

    fn project(slug: &str, status: ProjectStatus, updated_at: &str) -> Project {
        Project {
            id: slug.to_string(),
            title: slug.to_string(),
            slug: slug.to_string(),
            category: Category::RealEstateMarketing,
            subcategory: Subcategory::VirtualTours,
            summary: String::new(),
            cover_image: None,
            gallery: vec![],
            case_study_content: serde_json::json!({ "type": "doc" }),
            show_in_carousel: false,
            carousel_order: None,
            status,
            seo: ProjectSeo::default(),
            created_at: updated_at.to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    #[test]
    fn project_lastmod_is_updated_at_verbatim() {
        let projects = vec![project("penthouse-tour", ProjectStatus::Published, "2024-05-01T10:20:30.123456+00:00")];
        let entries = build_entries("https://studio.example/", &projects, "2026-10-18");

        let entry = entries.last().unwrap();
        assert_eq!(
            entry.loc,
            "https://studio.example/expertise/real-estate-marketing/virtual-tours/projects/penthouse-tour"
        );
        assert_eq!(entry.lastmod, "2024-05-01T10:20:30.123456+00:00");

        let xml = render_xml(&entries);
        assert!(xml.contains("<lastmod>2024-05-01T10:20:30.123456+00:00</lastmod>"));
    }

    #[test]
    fn static_pages_appear_without_projects() {
        let entries = build_entries("https://studio.example", &[], "2026-10-18");
        assert_eq!(entries.len(), static_routes().len());
        assert_eq!(entries[0].loc, "https://studio.example/");
        assert!(entries.iter().any(|e| e.loc == "https://studio.example/legal/privacy-policy"));
        assert!(entries.iter().all(|e| e.lastmod == "2026-10-18"));
    }

    #[test]
    fn drafts_are_not_listed() {
        let projects = vec![project("secret", ProjectStatus::Draft, "2024-01-01")];
        let entries = build_entries("https://studio.example", &projects, "2026-10-18");
        assert!(entries.iter().all(|e| !e.loc.contains("secret")));
    }

    #[test]
    fn robots_points_at_sitemap() {
        assert_eq!(
            robots_txt("https://studio.example/"),
            "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api/\n\nSitemap: https://studio.example/sitemap.xml\n"
        );
    }
}
