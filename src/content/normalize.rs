//! Normalisation of API documents into the display model

use serde::Deserialize;
use std::collections::HashSet;

use super::{NavLink, Post, RichTextBlock, Section};
use crate::error::{BlogError, Result};
use crate::source::Document;

#[derive(Debug, Deserialize)]
struct RawPostData {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    banner: Option<RawImage>,
    #[serde(default)]
    content: Vec<RawSection>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    #[serde(default)]
    heading: Option<String>,
    #[serde(default)]
    body: Vec<serde_json::Value>,
}

/// Convert a post document into a `Post`
///
/// Body blocks are kept as-is. The last publication date is dropped unless
/// it is strictly later than the first one.
pub fn normalize_post(doc: Document) -> Result<Post> {
    let uid = doc
        .uid
        .clone()
        .ok_or_else(|| BlogError::malformed(&doc.id, "document has no uid"))?;

    let data: RawPostData = serde_json::from_value(doc.data)
        .map_err(|e| BlogError::malformed(&uid, e.to_string()))?;

    let mut seen = HashSet::new();
    let mut content = Vec::with_capacity(data.content.len());
    for raw in data.content {
        let heading = raw.heading.unwrap_or_default();
        if !seen.insert(heading.clone()) {
            return Err(BlogError::malformed(
                &uid,
                format!("duplicate section heading {:?}", heading),
            ));
        }
        content.push(Section {
            heading,
            body: raw.body.into_iter().map(RichTextBlock).collect(),
        });
    }

    let last_publication_date = match (doc.first_publication_date, doc.last_publication_date) {
        (Some(first), Some(last)) if last > first => Some(last),
        _ => None,
    };

    Ok(Post {
        uid,
        first_publication_date: doc.first_publication_date,
        last_publication_date,
        title: data.title.unwrap_or_default(),
        subtitle: data.subtitle.filter(|s| !s.is_empty()),
        author: data.author.unwrap_or_default(),
        banner: data.banner.and_then(|b| b.url).unwrap_or_default(),
        content,
    })
}

/// Reduce a neighbour document to a navigation link
pub fn nav_link(doc: &Document) -> Option<NavLink> {
    let Some(uid) = doc.uid.clone() else {
        tracing::warn!("Neighbour document {} has no uid, skipping", doc.id);
        return None;
    };
    let title = doc
        .data
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    Some(NavLink { uid, title })
}
