//! In-memory content source, used for fixtures and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use super::{ContentSource, Document, Ordering, Predicate, Query, SearchResponse};
use crate::error::Result;

/// Page size the API applies when none is requested
const DEFAULT_PAGE_SIZE: usize = 20;

/// Documents held in memory and searched the way the API searches them
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<Document>,
    /// Draft documents visible only under a preview ref
    revisions: HashMap<String, Vec<Document>>,
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            revisions: HashMap::new(),
        }
    }

    /// Load a JSON array of documents
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let documents: Vec<Document> = serde_json::from_str(&content)?;
        tracing::debug!("Loaded {} documents from {:?}", documents.len(), path);
        Ok(Self::new(documents))
    }

    /// Register draft documents visible under `reference`
    pub fn with_revision(mut self, reference: &str, drafts: Vec<Document>) -> Self {
        self.revisions.insert(reference.to_string(), drafts);
        self
    }

    /// Documents visible at a ref: published ones with drafts overlaid by id
    fn snapshot(&self, reference: Option<&str>) -> Vec<Document> {
        let mut docs = self.documents.clone();
        let drafts = reference.and_then(|r| self.revisions.get(r));
        for draft in drafts.into_iter().flatten() {
            match docs.iter_mut().find(|d| d.id == draft.id) {
                Some(existing) => *existing = draft.clone(),
                None => docs.push(draft.clone()),
            }
        }
        docs
    }
}

fn matches(doc: &Document, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::At { path, value } => match path.as_str() {
            "document.type" => doc.doc_type == *value,
            "document.id" => doc.id == *value,
            other => match other.strip_prefix("my.").and_then(|p| p.split_once('.')) {
                Some((doc_type, "uid")) => {
                    doc.doc_type == doc_type && doc.uid.as_deref() == Some(value.as_str())
                }
                Some((doc_type, field)) => {
                    doc.doc_type == doc_type
                        && doc.data.get(field).and_then(|v| v.as_str()) == Some(value.as_str())
                }
                None => false,
            },
        },
    }
}

fn compare(a: &Document, b: &Document, orderings: &[Ordering]) -> std::cmp::Ordering {
    use super::DateField;

    for ordering in orderings {
        let key = |d: &Document| match ordering.field {
            DateField::FirstPublication => d.first_publication_date,
            DateField::LastPublication => d.last_publication_date,
        };
        let cmp = key(a).cmp(&key(b));
        let cmp = if ordering.descending { cmp.reverse() } else { cmp };
        if cmp != std::cmp::Ordering::Equal {
            return cmp;
        }
    }
    std::cmp::Ordering::Equal
}

/// Keep only the `data` fields named by `type.field` entries
fn restrict_fields(doc: &mut Document, fetch: &[String]) {
    if fetch.is_empty() {
        return;
    }
    if let Some(data) = doc.data.as_object_mut() {
        let prefix = format!("{}.", doc.doc_type);
        data.retain(|field, _| {
            fetch
                .iter()
                .any(|f| f.strip_prefix(&prefix) == Some(field.as_str()))
        });
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn query(&self, query: &Query) -> Result<SearchResponse> {
        let mut docs: Vec<Document> = self
            .snapshot(query.reference.as_deref())
            .into_iter()
            .filter(|d| query.predicates.iter().all(|p| matches(d, p)))
            .collect();

        docs.sort_by(|a, b| compare(a, b, &query.orderings));

        if let Some(after) = &query.after {
            if let Some(pos) = docs.iter().position(|d| &d.id == after) {
                docs.drain(..=pos);
            }
        }

        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let page = query.page.unwrap_or(1).max(1);
        let total = docs.len();
        let total_pages = total.div_ceil(page_size);

        let results: Vec<Document> = docs
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .map(|mut d| {
                restrict_fields(&mut d, &query.fetch);
                d
            })
            .collect();

        Ok(SearchResponse {
            page,
            results_per_page: page_size,
            results_size: results.len(),
            total_results_size: total,
            total_pages,
            next_page: None,
            prev_page: None,
            results,
        })
    }
}
