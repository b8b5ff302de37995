//! Structured text to HTML
//!
//! The output of a `RichTextRenderer` is inserted into pages verbatim: the
//! caller trusts it and no sanitisation happens afterwards. The default
//! `HtmlSerializer` escapes block text and builds markup for the block and
//! span types the editor produces.

use serde_json::Value;

use super::RichTextBlock;
use crate::helpers::{html_escape, image_tag, link_to, post_path};

/// Converts a sequence of structured-text blocks to trusted HTML
pub trait RichTextRenderer: Send + Sync {
    fn render(&self, blocks: &[RichTextBlock]) -> String;
}

/// Default structured-text serializer
#[derive(Debug, Clone, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl RichTextRenderer for HtmlSerializer {
    fn render(&self, blocks: &[RichTextBlock]) -> String {
        let mut html = String::new();
        // Open list tag while consecutive list items are grouped
        let mut open_list: Option<&'static str> = None;

        for block in blocks {
            let list_tag = match block.kind() {
                Some("list-item") => Some("ul"),
                Some("o-list-item") => Some("ol"),
                _ => None,
            };

            if open_list != list_tag {
                if let Some(tag) = open_list {
                    html.push_str(&format!("</{}>", tag));
                }
                if let Some(tag) = list_tag {
                    html.push_str(&format!("<{}>", tag));
                }
                open_list = list_tag;
            }

            html.push_str(&serialize_block(block));
        }

        if let Some(tag) = open_list {
            html.push_str(&format!("</{}>", tag));
        }

        html
    }
}

fn serialize_block(block: &RichTextBlock) -> String {
    let value = &block.0;
    match block.kind() {
        Some("paragraph") => format!("<p>{}</p>", serialize_text(value)),
        Some("preformatted") => format!("<pre>{}</pre>", serialize_text(value)),
        Some(kind) if is_heading(kind) => {
            let level = &kind["heading".len()..];
            format!("<h{0}>{1}</h{0}>", level, serialize_text(value))
        }
        Some("list-item") | Some("o-list-item") => {
            format!("<li>{}</li>", serialize_text(value))
        }
        Some("image") => serialize_image(value),
        Some("embed") => serialize_embed(value),
        other => {
            tracing::debug!("Skipping unsupported rich text block {:?}", other);
            String::new()
        }
    }
}

fn is_heading(kind: &str) -> bool {
    matches!(
        kind,
        "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6"
    )
}

fn serialize_image(value: &Value) -> String {
    let url = value.get("url").and_then(Value::as_str).unwrap_or_default();
    let alt = value.get("alt").and_then(Value::as_str);
    let img = image_tag(url, alt);
    let inner = match value.get("linkTo").and_then(resolve_link) {
        Some((href, new_tab)) => link_to(&href, &img, new_tab),
        None => img,
    };
    format!(r#"<p class="block-img">{}</p>"#, inner)
}

fn serialize_embed(value: &Value) -> String {
    let Some(oembed) = value.get("oembed") else {
        return String::new();
    };
    format!(
        r#"<div data-oembed="{}" data-oembed-type="{}" data-oembed-provider="{}">{}</div>"#,
        html_escape(str_field(oembed, "embed_url")),
        html_escape(str_field(oembed, "type")),
        html_escape(&str_field(oembed, "provider_name").to_lowercase()),
        str_field(oembed, "html")
    )
}

fn str_field<'a>(value: &'a Value, name: &str) -> &'a str {
    value.get(name).and_then(Value::as_str).unwrap_or_default()
}

/// Resolve link data to an href and whether it opens in a new tab
fn resolve_link(data: &Value) -> Option<(String, bool)> {
    let new_tab = data.get("target").and_then(Value::as_str) == Some("_blank");
    match data.get("link_type").and_then(Value::as_str) {
        Some("Document") => {
            let uid = data.get("uid").and_then(Value::as_str)?;
            Some((post_path(uid), false))
        }
        _ => {
            let url = data.get("url").and_then(Value::as_str)?;
            Some((url.to_string(), new_tab))
        }
    }
}

struct Span {
    start: usize,
    end: usize,
    open: String,
    close: &'static str,
}

fn parse_span(value: &Value) -> Option<Span> {
    let start = value.get("start")?.as_u64()? as usize;
    let end = value.get("end")?.as_u64()? as usize;
    if end <= start {
        return None;
    }

    let (open, close) = match value.get("type")?.as_str()? {
        "strong" => ("<strong>".to_string(), "</strong>"),
        "em" => ("<em>".to_string(), "</em>"),
        "label" => {
            let label = value
                .get("data")
                .and_then(|d| d.get("label"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            (format!(r#"<span class="{}">"#, html_escape(label)), "</span>")
        }
        "hyperlink" => {
            let (href, new_tab) = resolve_link(value.get("data")?)?;
            let open = if new_tab {
                format!(
                    r#"<a target="_blank" rel="noopener noreferrer" href="{}">"#,
                    html_escape(&href)
                )
            } else {
                format!(r#"<a href="{}">"#, html_escape(&href))
            };
            (open, "</a>")
        }
        _ => return None,
    };

    Some(Span {
        start,
        end,
        open,
        close,
    })
}

/// Serialize a text block's `text` with its `spans` applied
///
/// Span offsets count UTF-16 code units. Overlapping spans are closed and
/// reopened so the output is always well nested.
fn serialize_text(value: &Value) -> String {
    let text = value.get("text").and_then(Value::as_str).unwrap_or_default();
    let mut spans: Vec<Span> = value
        .get("spans")
        .and_then(Value::as_array)
        .map(|spans| spans.iter().filter_map(parse_span).collect())
        .unwrap_or_default();
    // Outer spans first: earlier start, then longer
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut html = String::with_capacity(text.len());
    let mut stack: Vec<usize> = Vec::new();
    let mut offset = 0;

    for c in text.chars() {
        let active: Vec<usize> = spans
            .iter()
            .enumerate()
            .filter(|(_, s)| s.start <= offset && offset < s.end)
            .map(|(i, _)| i)
            .collect();

        if active != stack {
            let common = stack
                .iter()
                .zip(active.iter())
                .take_while(|(a, b)| a == b)
                .count();
            while stack.len() > common {
                if let Some(i) = stack.pop() {
                    html.push_str(spans[i].close);
                }
            }
            for &i in &active[common..] {
                html.push_str(&spans[i].open);
                stack.push(i);
            }
        }

        match c {
            '\n' => html.push_str("<br />"),
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            _ => html.push(c),
        }
        offset += c.len_utf16();
    }

    while let Some(i) = stack.pop() {
        html.push_str(spans[i].close);
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(blocks: Value) -> String {
        let blocks: Vec<RichTextBlock> = serde_json::from_value(blocks).unwrap();
        HtmlSerializer::new().render(&blocks)
    }

    #[test]
    fn test_paragraph_and_headings() {
        let html = render(json!([
            { "type": "heading3", "text": "Título", "spans": [] },
            { "type": "paragraph", "text": "Olá mundo", "spans": [] },
            { "type": "preformatted", "text": "let x = 1;", "spans": [] }
        ]));
        assert_eq!(
            html,
            "<h3>Título</h3><p>Olá mundo</p><pre>let x = 1;</pre>"
        );
    }

    #[test]
    fn test_text_is_escaped_and_newlines_break() {
        let html = render(json!([
            { "type": "paragraph", "text": "a < b\n& c", "spans": [] }
        ]));
        assert_eq!(html, "<p>a &lt; b<br />&amp; c</p>");
    }

    #[test]
    fn test_list_items_are_grouped() {
        let html = render(json!([
            { "type": "list-item", "text": "um", "spans": [] },
            { "type": "list-item", "text": "dois", "spans": [] },
            { "type": "o-list-item", "text": "três", "spans": [] },
            { "type": "paragraph", "text": "fim", "spans": [] }
        ]));
        assert_eq!(
            html,
            "<ul><li>um</li><li>dois</li></ul><ol><li>três</li></ol><p>fim</p>"
        );
    }

    #[test]
    fn test_spans() {
        let html = render(json!([{
            "type": "paragraph",
            "text": "Leia a documentação agora",
            "spans": [
                { "start": 0, "end": 4, "type": "strong" },
                {
                    "start": 7, "end": 19, "type": "hyperlink",
                    "data": { "link_type": "Web", "url": "https://reactjs.org", "target": "_blank" }
                }
            ]
        }]));
        assert_eq!(
            html,
            "<p><strong>Leia</strong> a <a target=\"_blank\" rel=\"noopener noreferrer\" \
             href=\"https://reactjs.org\">documentação</a> agora</p>"
        );
    }

    #[test]
    fn test_overlapping_spans_stay_nested() {
        let html = render(json!([{
            "type": "paragraph",
            "text": "abcd",
            "spans": [
                { "start": 0, "end": 3, "type": "strong" },
                { "start": 1, "end": 4, "type": "em" }
            ]
        }]));
        assert_eq!(
            html,
            "<p><strong>a<em>bc</em></strong><em>d</em></p>"
        );
    }

    #[test]
    fn test_document_link_resolves_to_post() {
        let html = render(json!([{
            "type": "paragraph",
            "text": "veja",
            "spans": [{
                "start": 0, "end": 4, "type": "hyperlink",
                "data": { "link_type": "Document", "uid": "outro-post", "type": "posts" }
            }]
        }]));
        assert_eq!(html, "<p><a href=\"/post/outro-post\">veja</a></p>");
    }

    #[test]
    fn test_image_and_embed() {
        let html = render(json!([
            { "type": "image", "url": "https://images.example/a.png", "alt": "foto" },
            {
                "type": "embed",
                "oembed": {
                    "embed_url": "https://youtu.be/x",
                    "type": "video",
                    "provider_name": "YouTube",
                    "html": "<iframe src=\"https://youtube.com/embed/x\"></iframe>"
                }
            }
        ]));
        assert!(html.starts_with(
            "<p class=\"block-img\"><img src=\"https://images.example/a.png\" alt=\"foto\" /></p>"
        ));
        assert!(html.contains("data-oembed-provider=\"youtube\""));
        assert!(html.contains("<iframe src=\"https://youtube.com/embed/x\"></iframe>"));
    }

    #[test]
    fn test_unknown_block_is_skipped() {
        assert_eq!(render(json!([{ "type": "table", "text": "x" }])), "");
    }
}
