//! Interactive search session over one set of extracted messages.
//!
//! Exact results are published synchronously on every query change; a semantic
//! re-rank is debounced and published when it completes. Results for a query
//! that has since been replaced are discarded, so a slow ranking call can never
//! overwrite fresher results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::config::SemanticSearchConfig;
use crate::search::debounce::Debouncer;
use crate::search::exact::{Searchable, exact_search};
use crate::search::ranking::RankingCollaborator;
use crate::search::semantic::{SearchStatus, semantic_search};

/// What the view should currently display
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot<T> {
    pub query: String,
    pub items: Vec<T>,
    pub status: SearchStatus,
    /// A semantic re-rank for `query` is scheduled or running
    pub semantic_pending: bool,
    /// Increases with every query or item change
    pub generation: u64,
}

pub struct LiveSearch<T> {
    items: Arc<Vec<T>>,
    query: String,
    ranker: Arc<dyn RankingCollaborator>,
    config: SemanticSearchConfig,
    generation: Arc<AtomicU64>,
    sender: Arc<watch::Sender<SearchSnapshot<T>>>,
    debouncer: Debouncer,
}

impl<T> LiveSearch<T>
where
    T: Searchable + Clone + Send + Sync + 'static,
{
    pub fn new(
        items: Vec<T>,
        ranker: Arc<dyn RankingCollaborator>,
        config: SemanticSearchConfig,
    ) -> Self {
        let initial = SearchSnapshot {
            query: String::new(),
            items: items.clone(),
            status: SearchStatus::Ok,
            semantic_pending: false,
            generation: 0,
        };
        let (sender, _) = watch::channel(initial);
        let debouncer = Debouncer::new(config.debounce);

        Self {
            items: Arc::new(items),
            query: String::new(),
            ranker,
            config,
            generation: Arc::new(AtomicU64::new(0)),
            sender: Arc::new(sender),
            debouncer,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot<T>> {
        self.sender.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot<T> {
        self.sender.borrow().clone()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Publish exact results for `query` now and schedule a semantic re-rank
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    /// Replace the searched items, for example after a reload, and re-run the current query
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = Arc::new(items);
        self.refresh();
    }

    /// Drop any scheduled or running semantic search, keeping the exact results
    pub fn cancel_pending(&mut self) {
        self.debouncer.cancel();
        self.sender.send_if_modified(|snapshot| {
            let was_pending = snapshot.semantic_pending;
            snapshot.semantic_pending = false;
            was_pending
        });
    }

    fn refresh(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let wants_semantic = !self.query.trim().is_empty() && !self.items.is_empty();

        self.sender.send_replace(SearchSnapshot {
            query: self.query.clone(),
            items: exact_search(&self.items, &self.query),
            status: SearchStatus::Ok,
            semantic_pending: wants_semantic,
            generation,
        });

        if !wants_semantic {
            self.debouncer.cancel();
            return;
        }

        let items = Arc::clone(&self.items);
        let query = self.query.clone();
        let ranker = Arc::clone(&self.ranker);
        let config = self.config.clone();
        let latest = Arc::clone(&self.generation);
        let sender = Arc::clone(&self.sender);

        self.debouncer.schedule(async move {
            let result = semantic_search(&items, &query, ranker.as_ref(), &config).await;

            if latest.load(Ordering::SeqCst) != generation {
                debug!("Discarding semantic results for superseded query {:?}", query);
                return;
            }

            sender.send_replace(SearchSnapshot {
                query,
                items: result.items,
                status: result.status,
                semantic_pending: false,
                generation,
            });
        });
    }
}
