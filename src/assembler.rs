//! Post assembler - fetches one post and its neighbours into a `PostView`

use std::sync::Arc;

use crate::config::{NeighborPolicy, SiteConfig};
use crate::content::{nav_link, normalize_post, reading, Navigation, PostView};
use crate::error::Result;
use crate::preview::PreviewState;
use crate::source::{ContentSource, DateField, Ordering, Predicate, Query};

/// Builds post views from a content source
#[derive(Clone)]
pub struct PostAssembler {
    source: Arc<dyn ContentSource>,
    doc_type: String,
    policy: NeighborPolicy,
    words_per_minute: usize,
}

impl PostAssembler {
    pub fn new(source: Arc<dyn ContentSource>, config: &SiteConfig) -> Self {
        Self {
            source,
            doc_type: config.api.document_type.clone(),
            policy: config.navigation.policy,
            words_per_minute: config.reading.words_per_minute,
        }
    }

    /// Fetch, normalise and measure the post `uid`
    ///
    /// An unknown uid yields `BlogError::NotFound`; any fetch failure fails
    /// the whole assembly.
    pub async fn assemble(&self, uid: &str, preview: &PreviewState) -> Result<PostView> {
        let reference = preview.reference();
        let doc = self
            .source
            .get_by_uid(&self.doc_type, uid, reference)
            .await?;

        let (previous_query, next_query) = self.neighbor_queries(&doc.id, reference);
        let (previous, next) = tokio::try_join!(
            self.source.query(&previous_query),
            self.source.query(&next_query)
        )?;

        let navigation = Navigation {
            previous: previous.results.first().and_then(nav_link),
            next: next.results.first().and_then(nav_link),
        };

        let post = normalize_post(doc)?;
        let words = reading::total_word_count(&post.content);
        let read_time_minutes = reading::read_time_minutes(words, self.words_per_minute);
        tracing::debug!(
            "Assembled {} ({} words, {} min, preview={})",
            post.uid,
            words,
            read_time_minutes,
            preview.enabled
        );

        Ok(PostView {
            post,
            navigation,
            preview: preview.enabled,
            read_time_minutes,
        })
    }

    /// Single-result queries for the documents before and after `id`
    fn neighbor_queries(&self, id: &str, reference: Option<&str>) -> (Query, Query) {
        let (previous_order, next_order) = match self.policy {
            NeighborPolicy::Legacy => (
                Ordering::asc(DateField::FirstPublication),
                Ordering::desc(DateField::LastPublication),
            ),
            NeighborPolicy::Chronological => (
                Ordering::desc(DateField::FirstPublication),
                Ordering::asc(DateField::FirstPublication),
            ),
        };

        let base = Query::new(Predicate::document_type(&self.doc_type))
            .page_size(1)
            .after(id)
            .reference(reference);

        (
            base.clone().order_by(previous_order),
            base.order_by(next_order),
        )
    }
}
