/// Rich-text document rendering
///
/// Case studies are stored as ProseMirror-style JSON:
/// `{ "type": "doc", "content": [ { "type": "paragraph", "content": [ { "type": "text", "text": "..." } ] } ] }`
/// Rendering escapes all text, drops unsafe URLs and expands shortcodes through
/// a caller-supplied resolver (components need data the renderer does not own).

use crate::html::escape;
use crate::richtext::shortcode::{split, Segment, Shortcode};
use serde_json::Value;

fn node_type(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or("")
}

fn children(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn attr<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.get("attrs").and_then(|attrs| attrs.get(key))
}

fn attr_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    attr(node, key).and_then(Value::as_str)
}

/// Links and images may only point at http(s), mailto, or site-relative targets
pub fn safe_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("mailto:")
        || (lower.starts_with('/') && !lower.starts_with("//"))
        || lower.starts_with('#');
    allowed.then_some(trimmed)
}

/// The only text of a paragraph, when it has exactly one text child
fn sole_text(node: &Value) -> Option<&str> {
    match children(node) {
        [only] if node_type(only) == "text" => only.get("text").and_then(Value::as_str),
        _ => None,
    }
}

/// Every shortcode referenced anywhere in the document, without duplicates
pub fn collect_shortcodes(doc: &Value) -> Vec<Shortcode> {
    fn walk(node: &Value, found: &mut Vec<Shortcode>) {
        if node_type(node) == "text" {
            if let Some(text) = node.get("text").and_then(Value::as_str) {
                for segment in split(text) {
                    if let Segment::Shortcode(code) = segment {
                        if !found.contains(&code) {
                            found.push(code);
                        }
                    }
                }
            }
        }
        for child in children(node) {
            walk(child, found);
        }
    }

    let mut found = Vec::new();
    walk(doc, &mut found);
    found
}

/// Renders a document, asking `resolve` for the HTML of each shortcode
pub struct DocumentRenderer<'a> {
    resolve: &'a dyn Fn(&Shortcode) -> String,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(resolve: &'a dyn Fn(&Shortcode) -> String) -> Self {
        Self { resolve }
    }

    pub fn render(&self, doc: &Value) -> String {
        let mut out = String::new();
        self.render_node(doc, &mut out);
        out
    }

    fn render_children(&self, node: &Value, out: &mut String) {
        for child in children(node) {
            self.render_node(child, out);
        }
    }

    fn wrap(&self, tag: &str, node: &Value, out: &mut String) {
        out.push_str(&format!("<{}>", tag));
        self.render_children(node, out);
        out.push_str(&format!("</{}>", tag));
    }

    fn render_node(&self, node: &Value, out: &mut String) {
        match node_type(node) {
            "doc" => self.render_children(node, out),
            "paragraph" => {
                // A paragraph holding nothing but one shortcode becomes a block component
                if let Some(code) = sole_text(node).and_then(Shortcode::parse) {
                    out.push_str(&format!(
                        "<div class=\"shortcode\">{}</div>",
                        (self.resolve)(&code)
                    ));
                } else {
                    self.wrap("p", node, out);
                }
            }
            "heading" => {
                let level = attr(node, "level").and_then(Value::as_u64).unwrap_or(2).clamp(1, 6);
                self.wrap(&format!("h{}", level), node, out);
            }
            "bulletList" => self.wrap("ul", node, out),
            "orderedList" => self.wrap("ol", node, out),
            "listItem" => self.wrap("li", node, out),
            "blockquote" => self.wrap("blockquote", node, out),
            "codeBlock" => {
                out.push_str("<pre><code>");
                for child in children(node) {
                    if let Some(text) = child.get("text").and_then(Value::as_str) {
                        out.push_str(&escape(text));
                    }
                }
                out.push_str("</code></pre>");
            }
            "hardBreak" => out.push_str("<br>"),
            "horizontalRule" => out.push_str("<hr>"),
            "image" => {
                if let Some(src) = attr_str(node, "src").and_then(safe_url) {
                    out.push_str(&format!(
                        "<img src=\"{}\" alt=\"{}\"",
                        escape(src),
                        escape(attr_str(node, "alt").unwrap_or(""))
                    ));
                    if let Some(title) = attr_str(node, "title") {
                        out.push_str(&format!(" title=\"{}\"", escape(title)));
                    }
                    out.push_str(" loading=\"lazy\">");
                }
            }
            "text" => self.render_text(node, out),
            _ => self.render_children(node, out),
        }
    }

    fn render_text(&self, node: &Value, out: &mut String) {
        let Some(text) = node.get("text").and_then(Value::as_str) else {
            return;
        };

        let mut inner = String::new();
        for segment in split(text) {
            match segment {
                Segment::Text(text) => inner.push_str(&escape(&text)),
                Segment::Shortcode(code) => inner.push_str(&format!(
                    "<span class=\"shortcode\">{}</span>",
                    (self.resolve)(&code)
                )),
            }
        }

        let marks = node.get("marks").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
        for mark in marks {
            inner = match node_type(mark) {
                "bold" | "strong" => format!("<strong>{}</strong>", inner),
                "italic" | "em" => format!("<em>{}</em>", inner),
                "underline" => format!("<u>{}</u>", inner),
                "strike" => format!("<s>{}</s>", inner),
                "code" => format!("<code>{}</code>", inner),
                "link" => match attr_str(mark, "href").and_then(safe_url) {
                    Some(href) => format!(
                        "<a href=\"{}\" rel=\"noopener noreferrer\">{}</a>",
                        escape(href),
                        inner
                    ),
                    None => inner,
                },
                _ => inner,
            };
        }

        out.push_str(&inner);
    }
}

/// Plain-text excerpt of a document, for summaries and meta descriptions
pub fn plain_text(doc: &Value) -> String {
    fn walk(node: &Value, out: &mut String) {
        if let Some(text) = node.get("text").and_then(Value::as_str) {
            out.push_str(text);
        }
        for child in children(node) {
            walk(child, out);
        }
        if matches!(node_type(node), "paragraph" | "heading" | "listItem") && !out.ends_with(' ') {
            out.push(' ');
        }
    }

    let mut out = String::new();
    walk(doc, &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn label(code: &Shortcode) -> String {
        match code {
            Shortcode::ProjectGallery { .. } => "GALLERY".to_string(),
            Shortcode::Carousel { .. } => "CAROUSEL".to_string(),
            Shortcode::ImageGallery { project } => format!("IMAGES:{}", project),
        }
    }

    fn render(doc: Value) -> String {
        DocumentRenderer::new(&label).render(&doc)
    }

    #[test]
    fn renders_blocks_and_marks() {
        let html = render(json!({
            "type": "doc",
            "content": [
                { "type": "heading", "attrs": { "level": 2 }, "content": [{ "type": "text", "text": "Brief" }] },
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "Bold", "marks": [{ "type": "bold" }] },
                    { "type": "text", "text": " & " },
                    { "type": "text", "text": "site", "marks": [{ "type": "link", "attrs": { "href": "https://studio.example" } }] }
                ]},
                { "type": "bulletList", "content": [
                    { "type": "listItem", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "one" }] }] }
                ]}
            ]
        }));

        assert_eq!(
            html,
            "<h2>Brief</h2><p><strong>Bold</strong> &amp; <a href=\"https://studio.example\" rel=\"noopener noreferrer\">site</a></p><ul><li><p>one</p></li></ul>"
        );
    }

    #[test]
    fn escapes_text_and_drops_unsafe_urls() {
        let html = render(json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [
                    { "type": "text", "text": "<script>x</script>", "marks": [{ "type": "link", "attrs": { "href": "javascript:alert(1)" } }] }
                ]},
                { "type": "image", "attrs": { "src": "javascript:alert(1)" } }
            ]
        }));

        assert_eq!(html, "<p>&lt;script&gt;x&lt;/script&gt;</p>");
    }

    #[test]
    fn standalone_shortcode_paragraph_becomes_block_component() {
        let html = render(json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": " [image-gallery project=\"villa\"] " }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "See [carousel] below" }] }
            ]
        }));

        assert_eq!(
            html,
            "<div class=\"shortcode\">IMAGES:villa</div><p>See <span class=\"shortcode\">CAROUSEL</span> below</p>"
        );
    }

    #[test]
    fn collects_each_shortcode_once() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "paragraph", "content": [{ "type": "text", "text": "[carousel] and [carousel]" }] },
                { "type": "blockquote", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "[project-gallery limit=4]" }] }
                ]}
            ]
        });

        assert_eq!(
            collect_shortcodes(&doc),
            vec![
                Shortcode::Carousel { limit: None },
                Shortcode::ProjectGallery { category: None, subcategory: None, limit: Some(4) },
            ]
        );
    }

    #[test]
    fn unknown_nodes_render_their_children() {
        let html = render(json!({
            "type": "doc",
            "content": [{ "type": "callout", "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "hi" }] }] }]
        }));
        assert_eq!(html, "<p>hi</p>");
    }

    #[test]
    fn plain_text_flattens_blocks() {
        let doc = json!({
            "type": "doc",
            "content": [
                { "type": "heading", "content": [{ "type": "text", "text": "Title" }] },
                { "type": "paragraph", "content": [{ "type": "text", "text": "Body  text" }] }
            ]
        });
        assert_eq!(plain_text(&doc), "Title Body text");
    }
}
