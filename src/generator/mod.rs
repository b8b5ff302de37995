//! Generator module - writes pre-rendered post pages

use futures::stream::{self, StreamExt};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assembler::PostAssembler;
use crate::content::HtmlSerializer;
use crate::error::Result;
use crate::paths::{self, StaticPaths};
use crate::preview::PreviewState;
use crate::source::ContentSource;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Outcome of a full build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Uids written to disk
    pub generated: Vec<String>,
    /// Uids that failed, with the reason
    pub failed: Vec<(String, String)>,
}

/// Static site generator for post pages
#[derive(Clone)]
pub struct Generator {
    public_dir: PathBuf,
    concurrency: usize,
    config: crate::config::SiteConfig,
    source: Arc<dyn ContentSource>,
    assembler: PostAssembler,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog, source: Arc<dyn ContentSource>) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config, Arc::new(HtmlSerializer::new()))?;
        let assembler = PostAssembler::new(source.clone(), &blog.config);

        Ok(Self {
            public_dir: blog.public_dir.clone(),
            concurrency: blog.config.build.concurrency.max(1),
            config: blog.config.clone(),
            source,
            assembler,
            renderer,
        })
    }

    pub fn assembler(&self) -> &PostAssembler {
        &self.assembler
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// List the pre-render targets
    pub async fn static_paths(&self) -> Result<StaticPaths> {
        paths::enumerate(self.source.as_ref(), &self.config).await
    }

    /// Generate every enumerated post
    pub async fn generate(&self) -> Result<BuildReport> {
        fs::create_dir_all(&self.public_dir)?;

        let targets = self.static_paths().await?;

        let results: Vec<(String, Result<PathBuf>)> = stream::iter(targets.paths)
            .map(|uid| async move {
                let result = self.generate_post(&uid).await;
                (uid, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = BuildReport::default();
        for (uid, result) in results {
            match result {
                Ok(_) => report.generated.push(uid),
                Err(e) => {
                    tracing::warn!("Failed to generate {}: {}", uid, e);
                    report.failed.push((uid, e.to_string()));
                }
            }
        }
        report.generated.sort();

        Ok(report)
    }

    /// Assemble, render and write a single published post
    pub async fn generate_post(&self, uid: &str) -> Result<PathBuf> {
        let view = self.assembler.assemble(uid, &PreviewState::default()).await?;
        let html = self.renderer.render_post(&view)?;

        let output_path = output_path(&self.public_dir, uid);
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Readers only ever see a complete page: write aside, then swap in
        let staging = output_path.with_extension("html.tmp");
        tokio::fs::write(&staging, html).await?;
        tokio::fs::rename(&staging, &output_path).await?;
        tracing::debug!("Generated post: {:?}", output_path);

        Ok(output_path)
    }
}

/// Where the page for `uid` is written
pub fn output_path(public_dir: &Path, uid: &str) -> PathBuf {
    public_dir.join("post").join(uid).join("index.html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::source::fixtures::{post, source};
    use crate::source::MemorySource;

    fn blog(dir: &Path) -> Blog {
        Blog::with_config(dir, SiteConfig::default())
    }

    #[tokio::test]
    async fn test_generate_all_posts() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let generator = Generator::new(&blog, Arc::new(source())).unwrap();

        let report = generator.generate().await.unwrap();
        assert_eq!(report.generated, vec!["first", "second", "third"]);
        assert!(report.failed.is_empty());

        let html = fs::read_to_string(output_path(&blog.public_dir, "second")).unwrap();
        assert!(html.contains("<title>Second | Ignite Blog</title>"));
        assert!(html.contains("1 min"));
    }

    #[tokio::test]
    async fn test_failed_post_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut broken = post("id-2", "broken", "Broken", 2);
        broken.data["content"] = serde_json::json!([
            { "heading": "Same", "body": [] },
            { "heading": "Same", "body": [] }
        ]);
        let src = MemorySource::new(vec![post("id-1", "fine", "Fine", 1), broken]);

        let generator = Generator::new(&blog(dir.path()), Arc::new(src)).unwrap();
        let report = generator.generate().await.unwrap();

        assert_eq!(report.generated, vec!["fine"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        assert!(!output_path(&dir.path().join("public"), "broken").exists());
    }

    #[tokio::test]
    async fn test_regenerating_replaces_page_whole() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let path = output_path(&blog.public_dir, "first");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale page").unwrap();

        let generator = Generator::new(&blog, Arc::new(source())).unwrap();
        assert_eq!(generator.generate_post("first").await.unwrap(), path);

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("<title>First | Ignite Blog</title>"));
        assert!(html.trim_end().ends_with("</html>"));
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("index.html")]);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("public"), "hello"),
            PathBuf::from("public/post/hello/index.html")
        );
    }
}
