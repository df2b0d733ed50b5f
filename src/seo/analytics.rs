/// Analytics snippet filter
///
/// Admins paste tracking snippets as raw `<script>` markup. Before injection the
/// script tags are stripped, external `src` URLs are kept, and anything that still
/// looks like markup is refused. This guards against formatting mistakes in
/// trusted admin input; it does not make untrusted markup safe.

use crate::content::types::AnalyticsCode;
use crate::html::escape;
use regex::Regex;
use serde::Serialize;
use once_cell::sync::Lazy;

static SCRIPT_OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<script\b([^>]*)>").expect("valid script tag pattern"));

static SCRIPT_CLOSE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</script\s*>").expect("valid script tag pattern"));

static SRC_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).expect("valid src pattern")
});

/// A snippet that passed the filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizedSnippet {
    pub platform: String,
    /// External scripts referenced by `src`
    pub sources: Vec<String>,
    /// Inline script body, if any
    pub inline: Option<String>,
}

impl SanitizedSnippet {
    pub fn render(&self) -> String {
        let mut out = String::new();
        for src in &self.sources {
            out.push_str(&format!("<script async src=\"{}\"></script>\n", escape(src)));
        }
        if let Some(inline) = &self.inline {
            out.push_str(&format!("<script>{}</script>\n", inline));
        }
        out
    }
}

/// Strip script tags from a stored snippet. Returns `None` when the remaining
/// code still contains `<` or `>`, or when nothing is left to inject.
pub fn sanitize_snippet(platform: &str, code: &str) -> Option<SanitizedSnippet> {
    let sources: Vec<String> = SCRIPT_OPEN_TAG
        .captures_iter(code)
        .filter_map(|open| {
            let attrs = open.get(1)?.as_str();
            let src = SRC_ATTRIBUTE.captures(attrs)?;
            src.get(1)
                .or_else(|| src.get(2))
                .or_else(|| src.get(3))
                .map(|m| m.as_str().trim().to_string())
        })
        .filter(|src| !src.is_empty())
        .collect();

    let without_open = SCRIPT_OPEN_TAG.replace_all(code, "");
    let cleaned = SCRIPT_CLOSE_TAG.replace_all(&without_open, "");
    let cleaned = cleaned.trim();

    if cleaned.contains('<') || cleaned.contains('>') {
        tracing::warn!("🚫 Analytics code for '{}' still contains markup after cleaning; not injecting", platform);
        return None;
    }

    if cleaned.is_empty() && sources.is_empty() {
        tracing::debug!("Analytics code for '{}' is empty", platform);
        return None;
    }

    Some(SanitizedSnippet {
        platform: platform.to_string(),
        sources,
        inline: (!cleaned.is_empty()).then(|| cleaned.to_string()),
    })
}

/// Filter every enabled code; disabled or rejected snippets are skipped
pub fn injectable_snippets(codes: &[AnalyticsCode]) -> Vec<SanitizedSnippet> {
    codes
        .iter()
        .filter(|code| code.enabled)
        .filter_map(|code| sanitize_snippet(&code.platform, &code.code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags_and_keeps_body() {
        let snippet = sanitize_snippet(
            "ga4",
            "<script>\n  window.dataLayer = window.dataLayer || [];\n</script>",
        )
        .unwrap();
        assert_eq!(snippet.inline.as_deref(), Some("window.dataLayer = window.dataLayer || [];"));
        assert!(snippet.sources.is_empty());
    }

    #[test]
    fn keeps_external_sources() {
        let snippet = sanitize_snippet(
            "ga4",
            r#"<script async src="https://www.googletagmanager.com/gtag/js?id=G-1"></script>
<SCRIPT>gtag('config', 'G-1');</SCRIPT>"#,
        )
        .unwrap();
        assert_eq!(snippet.sources, vec!["https://www.googletagmanager.com/gtag/js?id=G-1"]);
        assert_eq!(snippet.inline.as_deref(), Some("gtag('config', 'G-1');"));
    }

    #[test]
    fn rejects_leftover_angle_brackets() {
        assert!(sanitize_snippet("pixel", "<script>a()</script><noscript><img src=x></noscript>").is_none());
        assert!(sanitize_snippet("cmp", "<script>if (a > b) run()</script>").is_none());
        assert!(sanitize_snippet("raw", "<iframe src=x>").is_none());
    }

    #[test]
    fn rejects_empty_snippets() {
        assert!(sanitize_snippet("empty", "<script>   </script>").is_none());
    }

    #[test]
    fn disabled_codes_are_never_injected() {
        let codes = vec![
            AnalyticsCode {
                platform: "ga4".into(),
                code: "<script>track()</script>".into(),
                enabled: true,
                updated_at: String::new(),
            },
            AnalyticsCode {
                platform: "hotjar".into(),
                code: "<script>hj()</script>".into(),
                enabled: false,
                updated_at: String::new(),
            },
        ];
        let snippets = injectable_snippets(&codes);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].render(), "<script>track()</script>\n");
    }
}
