//! Post and navigation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One structured-text block, kept opaque until it is serialized to HTML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichTextBlock(pub serde_json::Value);

impl RichTextBlock {
    /// Block type, e.g. `paragraph` or `heading2`
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(|v| v.as_str())
    }

    /// Plain text of the block; images and embeds have none
    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(|v| v.as_str())
    }
}

/// A titled section of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique within a post
    pub heading: String,
    pub body: Vec<RichTextBlock>,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub uid: String,

    /// First publication date
    pub first_publication_date: Option<DateTime<Utc>>,

    /// Set only when the post was edited after it was first published
    pub last_publication_date: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,

    /// Banner image URL
    pub banner: String,

    /// Sections in authored order
    pub content: Vec<Section>,
}

/// Link to an adjacent post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub uid: String,
    pub title: String,
}

/// Adjacent posts by publication order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub previous: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// Everything the renderer needs for one post page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub post: Post,
    pub navigation: Navigation,
    pub preview: bool,
    pub read_time_minutes: usize,
}
