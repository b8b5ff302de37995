//! Content source - the headless CMS the posts are read from

mod document;
mod memory;
mod prismic;
mod query;

pub use document::{ApiInfo, ApiRef, Document, SearchResponse};
pub use memory::MemorySource;
pub use prismic::PrismicClient;
pub use query::{DateField, Ordering, Predicate, Query};

#[cfg(test)]
pub(crate) use memory::fixtures;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::error::{BlogError, Result};

/// Read-only access to a content repository
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Run a search and return one page of results
    async fn query(&self, query: &Query) -> Result<SearchResponse>;

    /// Fetch a single document of `doc_type` by uid, optionally at a preview ref
    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Document> {
        let query = Query::new(Predicate::uid(doc_type, uid))
            .page_size(1)
            .reference(reference);
        self.query(&query)
            .await?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| BlogError::not_found(uid))
    }

    /// Fetch a single document by internal id
    async fn get_by_id(&self, id: &str, reference: Option<&str>) -> Result<Option<Document>> {
        let query = Query::new(Predicate::id(id)).page_size(1).reference(reference);
        Ok(self.query(&query).await?.results.into_iter().next())
    }
}

/// Build the source described by the configuration
///
/// A configured fixture file wins over the HTTP endpoint.
pub fn from_config(config: &SiteConfig, base_dir: &std::path::Path) -> Result<Arc<dyn ContentSource>> {
    if let Some(fixture) = &config.api.fixture {
        let path = base_dir.join(fixture);
        tracing::info!("Reading documents from fixture {:?}", path);
        return Ok(Arc::new(MemorySource::load(&path)?));
    }

    if config.api.endpoint.is_empty() {
        return Err(BlogError::config(
            "api.endpoint is not set (or set PRISMIC_API_ENDPOINT)",
        ));
    }

    Ok(Arc::new(PrismicClient::new(&config.api)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = SiteConfig::default();
        let err = from_config(&config, std::path::Path::new(".")).err().unwrap();
        assert!(err.to_string().contains("api.endpoint"));
    }

    #[test]
    fn test_from_config_with_fixture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("posts.json"), "[]").unwrap();

        let mut config = SiteConfig::default();
        config.api.fixture = Some("posts.json".to_string());
        assert!(from_config(&config, dir.path()).is_ok());
    }
}
