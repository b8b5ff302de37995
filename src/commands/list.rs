//! List posts known to the content source

use anyhow::Result;

use crate::config::SiteConfig;
use crate::helpers::{format_post_date, post_path};
use crate::paths;
use crate::Blog;

/// Print every post with its publication date and route
pub async fn run(blog: &Blog) -> Result<()> {
    let source = blog.source()?;
    let documents = paths::enumerate_documents(source.as_ref(), &blog.config).await?;

    println!("Posts ({}):", documents.len());
    for line in documents.iter().map(|doc| format_line(doc, &blog.config)) {
        println!("{}", line);
    }

    Ok(())
}

fn format_line(doc: &crate::source::Document, config: &SiteConfig) -> String {
    let date = doc
        .first_publication_date
        .map(|d| format_post_date(&d, &config.tz()))
        .unwrap_or_else(|| "unpublished".to_string());
    let title = doc
        .data
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("(untitled)");
    let route = doc
        .uid
        .as_deref()
        .map(post_path)
        .unwrap_or_else(|| format!("(no uid, id {})", doc.id));

    format!("  {} - {} [{}]", date, title, route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fixtures::post;

    #[test]
    fn test_format_line() {
        let config = SiteConfig {
            timezone: "UTC".to_string(),
            ..SiteConfig::default()
        };
        let doc = post("id-1", "hello", "Hello", 5);
        assert_eq!(
            format_line(&doc, &config),
            "  05 mar 2021 - Hello [/post/hello]"
        );

        let mut draft = doc;
        draft.uid = None;
        draft.first_publication_date = None;
        assert_eq!(
            format_line(&draft, &config),
            "  unpublished - Hello [(no uid, id id-1)]"
        );
    }
}
