//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on; the only
//! unescaped values are section bodies, which are trusted rich-text HTML.

use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{NavLink, PostView, RichTextRenderer};
use crate::error::Result;
use crate::helpers::{
    date_xml, exit_preview_path, format_edited_note, format_post_date, full_url_for, html_escape,
    post_path,
};

/// Seconds between reloads of the loading placeholder
const LOADING_REFRESH_SECS: u64 = 1;

/// What a post route shows
#[derive(Debug, Clone)]
pub enum PageState {
    /// The page is being generated on demand
    Loading,
    Ready(Box<PostView>),
    /// The uid never resolved
    NotFound { uid: String },
    /// Generation failed upstream
    Failed,
}

/// Page renderer with the embedded site templates
#[derive(Clone)]
pub struct TemplateRenderer {
    tera: Arc<Tera>,
    config: SiteConfig,
    rich_text: Arc<dyn RichTextRenderer>,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig, rich_text: Arc<dyn RichTextRenderer>) -> Result<Self> {
        let mut tera = Tera::default();

        // Leave `/` alone in URLs
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("post.html", include_str!("site/post.html")),
            ("loading.html", include_str!("site/loading.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("error.html", include_str!("site/error.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
        ])?;

        Ok(Self {
            tera: Arc::new(tera),
            config: config.clone(),
            rich_text,
        })
    }

    /// Render the page for a route state
    pub fn render(&self, state: &PageState) -> Result<String> {
        match state {
            PageState::Loading => self.render_loading(),
            PageState::Ready(view) => self.render_post(view),
            PageState::NotFound { uid } => self.render_not_found(uid),
            PageState::Failed => self.render_template("error.html", &self.base_context()),
        }
    }

    /// Render a full post page
    pub fn render_post(&self, view: &PostView) -> Result<String> {
        let page = self.build_post_data(view);
        let path = post_path(&view.post.uid);

        let mut context = self.base_context();
        context.insert("post", &page);
        context.insert("navigation", &NavigationData::from_view(view));
        context.insert("preview", &view.preview);
        context.insert("exit_preview_href", &exit_preview_path(&path));
        context.insert("canonical_url", &full_url_for(&self.config, &path));

        self.render_template("post.html", &context)
    }

    /// Render the fallback placeholder
    pub fn render_loading(&self) -> Result<String> {
        let mut context = self.base_context();
        context.insert("refresh_secs", &LOADING_REFRESH_SECS);
        self.render_template("loading.html", &context)
    }

    /// Render the terminal not-found page
    pub fn render_not_found(&self, uid: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("uid", uid);
        self.render_template("not_found.html", &context)
    }

    fn render_template(&self, name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(name, context)?)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("config", &ConfigData::from(&self.config));
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context
    }

    fn build_post_data(&self, view: &PostView) -> PostData {
        let post = &view.post;
        let tz = self.config.tz();

        PostData {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            banner: post.banner.clone(),
            published: post
                .first_publication_date
                .map(|d| format_post_date(&d, &tz)),
            published_xml: post.first_publication_date.map(|d| date_xml(&d, &tz)),
            edited_note: post
                .last_publication_date
                .map(|d| format_edited_note(&d, &tz)),
            edited_xml: post.last_publication_date.map(|d| date_xml(&d, &tz)),
            read_time: format!("{} min", view.read_time_minutes),
            sections: post
                .content
                .iter()
                .map(|section| SectionData {
                    heading: section.heading.clone(),
                    html: self.rich_text.render(&section.body),
                })
                .collect(),
        }
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub logo: String,
    pub url: String,
}

impl From<&SiteConfig> for ConfigData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            logo: config.logo.clone(),
            url: config.url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub banner: String,
    pub published: Option<String>,
    pub published_xml: Option<String>,
    pub edited_note: Option<String>,
    pub edited_xml: Option<String>,
    pub read_time: String,
    pub sections: Vec<SectionData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    /// Trusted HTML, rendered unescaped
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub href: String,
}

impl From<&NavLink> for NavPost {
    fn from(link: &NavLink) -> Self {
        Self {
            title: link.title.clone(),
            href: post_path(&link.uid),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavigationData {
    pub previous: Option<NavPost>,
    pub next: Option<NavPost>,
}

impl NavigationData {
    fn from_view(view: &PostView) -> Self {
        Self {
            previous: view.navigation.previous.as_ref().map(NavPost::from),
            next: view.navigation.next.as_ref().map(NavPost::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{HtmlSerializer, Navigation, Post, RichTextBlock, Section};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn renderer() -> TemplateRenderer {
        let config = SiteConfig {
            timezone: "UTC".to_string(),
            ..SiteConfig::default()
        };
        TemplateRenderer::new(&config, Arc::new(HtmlSerializer::new())).unwrap()
    }

    fn view() -> PostView {
        PostView {
            post: Post {
                uid: "hello".to_string(),
                first_publication_date: Some(Utc.with_ymd_and_hms(2021, 3, 15, 12, 0, 0).unwrap()),
                last_publication_date: None,
                title: "Hello".to_string(),
                subtitle: None,
                author: "Joseph Oliveira".to_string(),
                banner: "https://images.example/hello.png".to_string(),
                content: vec![Section {
                    heading: "Intro".to_string(),
                    body: vec![RichTextBlock(json!({
                        "type": "paragraph",
                        "text": "a b c d e",
                        "spans": [{ "start": 0, "end": 1, "type": "strong" }]
                    }))],
                }],
            },
            navigation: Navigation::default(),
            preview: false,
            read_time_minutes: 1,
        }
    }

    #[test]
    fn test_render_post() {
        let html = renderer().render_post(&view()).unwrap();
        assert!(html.contains("<title>Hello | Ignite Blog</title>"));
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains(">15 mar 2021</time>"));
        assert!(html.contains("<span>Joseph Oliveira</span>"));
        assert!(html.contains("<span>1 min</span>"));
        assert!(html.contains("<h2>Intro</h2>"));
        assert!(html.contains("<p><strong>a</strong> b c d e</p>"));
        assert!(html.contains(r#"src="https://images.example/hello.png""#));
    }

    #[test]
    fn test_edited_note_only_when_edited() {
        let r = renderer();
        let unedited = r.render_post(&view()).unwrap();
        assert!(!unedited.contains("editado em"));

        let mut edited = view();
        edited.post.last_publication_date =
            Some(Utc.with_ymd_and_hms(2021, 3, 19, 15, 7, 0).unwrap());
        let html = r.render_post(&edited).unwrap();
        assert!(html.contains("* editado em 19 mar 2021, às 15:7"));
    }

    #[test]
    fn test_navigation_links() {
        let r = renderer();
        let none = r.render_post(&view()).unwrap();
        assert!(!none.contains("Post anterior"));
        assert!(!none.contains("Próximo Post"));

        let mut only_previous = view();
        only_previous.navigation.previous = Some(NavLink {
            uid: "older".to_string(),
            title: "Older".to_string(),
        });
        let html = r.render_post(&only_previous).unwrap();
        assert!(html.contains(r#"<a href="/post/older">Post anterior</a>"#));
        assert!(html.contains("<h3>Older</h3>"));
        assert!(!html.contains("Próximo Post"));

        let mut both = only_previous;
        both.navigation.next = Some(NavLink {
            uid: "newer".to_string(),
            title: "Newer".to_string(),
        });
        let html = r.render_post(&both).unwrap();
        assert!(html.contains(r#"<a href="/post/newer">Próximo Post</a>"#));
    }

    #[test]
    fn test_preview_exit_link() {
        let r = renderer();
        assert!(!r.render_post(&view()).unwrap().contains("Sair do modo Preview"));

        let mut preview = view();
        preview.preview = true;
        let html = r.render_post(&preview).unwrap();
        assert!(html.contains("Sair do modo Preview"));
        assert!(html.contains(r#"href="/api/exit-preview?currentUrl=/post/hello""#));
    }

    #[test]
    fn test_title_is_escaped_body_is_not() {
        let mut v = view();
        v.post.title = "<script>".to_string();
        let html = renderer().render_post(&v).unwrap();
        assert!(html.contains("<h1>&lt;script&gt;</h1>"));
        assert!(html.contains("<p><strong>a</strong>"));
    }

    #[test]
    fn test_fallback_states() {
        let r = renderer();
        let loading = r.render(&PageState::Loading).unwrap();
        assert!(loading.contains("Carregando..."));
        assert!(loading.contains(r#"http-equiv="refresh""#));

        let missing = r
            .render(&PageState::NotFound {
                uid: "missing".to_string(),
            })
            .unwrap();
        assert!(missing.contains("Post não encontrado"));
        assert!(missing.contains("missing"));
        assert!(!missing.contains("Carregando"));
    }
}
