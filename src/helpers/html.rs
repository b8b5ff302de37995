//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Generate an anchor tag, opening external links in a new tab
///
/// # Examples
/// ```ignore
/// link_to("/post/hello", "Hello", false) // -> <a href="/post/hello">Hello</a>
/// ```
pub fn link_to(href: &str, inner_html: &str, new_tab: bool) -> String {
    if new_tab {
        format!(
            r#"<a target="_blank" rel="noopener noreferrer" href="{}">{}</a>"#,
            html_escape(href),
            inner_html
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, html_escape(href), inner_html)
    }
}

/// Generate an image tag
pub fn image_tag(src: &str, alt: Option<&str>) -> String {
    format!(
        r#"<img src="{}" alt="{}" />"#,
        html_escape(src),
        html_escape(alt.unwrap_or(""))
    )
}
