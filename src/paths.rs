//! Path enumerator - lists every post uid to pre-render

use crate::config::{FallbackPolicy, SiteConfig};
use crate::error::Result;
use crate::source::{ContentSource, Document, Predicate, Query};

/// Pre-render targets plus the policy for uids not in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    pub paths: Vec<String>,
    pub fallback: FallbackPolicy,
}

/// Fields requested while enumerating
fn fetch_fields(doc_type: &str) -> Vec<String> {
    ["title", "subtitle", "author", "content"]
        .iter()
        .map(|field| format!("{}.{}", doc_type, field))
        .collect()
}

/// Walk every result page and collect post uids
pub async fn enumerate(source: &dyn ContentSource, config: &SiteConfig) -> Result<StaticPaths> {
    let mut paths = Vec::new();
    for doc in enumerate_documents(source, config).await? {
        match doc.uid {
            Some(uid) => paths.push(uid),
            None => tracing::warn!("Document {} has no uid, not pre-rendering", doc.id),
        }
    }

    tracing::info!("Found {} posts to pre-render", paths.len());

    Ok(StaticPaths {
        paths,
        fallback: config.build.fallback,
    })
}

/// Every post document, with `data` limited to the listing fields
pub async fn enumerate_documents(
    source: &dyn ContentSource,
    config: &SiteConfig,
) -> Result<Vec<Document>> {
    let doc_type = &config.api.document_type;
    let base = Query::new(Predicate::document_type(doc_type))
        .page_size(config.api.page_size.max(1))
        .fetch(fetch_fields(doc_type));

    let mut documents = Vec::new();
    let mut page = 1;

    loop {
        let response = source.query(&base.clone().page(page)).await?;
        tracing::debug!(
            "Enumerated page {}/{} ({} results)",
            response.page,
            response.total_pages,
            response.results_size
        );

        let has_next = response.has_next();
        documents.extend(response.results);

        if !has_next {
            break;
        }
        page += 1;
    }

    Ok(documents)
}
