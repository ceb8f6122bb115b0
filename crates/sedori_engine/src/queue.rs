//! Batch search queue.
//!
//! Items are drained head-first in batches of at most `concurrency` searches.
//! The searches of one batch run concurrently; the next batch starts only after
//! the whole batch settled and `batch_delay` elapsed. Every item gets exactly
//! one loading mark and exactly one outcome render.
//!
//! The queue lives in a single execution context: interior state is kept in
//! `RefCell`/`Cell` and `drain` futures are not `Send`.
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use sedori_core::SearchResult;
use sedori_logging::{sedori_debug, sedori_info, sedori_warn};

use crate::{ApiError, Searcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem<T> {
    pub keyword: String,
    pub target: T,
}

impl<T> QueueItem<T> {
    pub fn new(keyword: impl Into<String>, target: T) -> Self {
        Self {
            keyword: keyword.into(),
            target,
        }
    }
}

/// Receives the display transitions of queued targets.
pub trait PanelRenderer<T> {
    fn show_loading(&self, target: &T);
    fn show_outcome(&self, target: &T, outcome: Result<Vec<SearchResult>, ApiError>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSettings {
    pub concurrency: usize,
    pub batch_delay: Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            concurrency: 3,
            batch_delay: Duration::from_millis(400),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DrainSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub struct BatchSearchQueue<T, R> {
    settings: QueueSettings,
    searcher: Arc<dyn Searcher>,
    renderer: R,
    items: RefCell<VecDeque<QueueItem<T>>>,
    draining: Cell<bool>,
}

struct DrainGuard<'a>(&'a Cell<bool>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<T, R: PanelRenderer<T>> BatchSearchQueue<T, R> {
    pub fn new(settings: QueueSettings, searcher: Arc<dyn Searcher>, renderer: R) -> Self {
        let settings = QueueSettings {
            concurrency: settings.concurrency.max(1),
            ..settings
        };
        Self {
            settings,
            searcher,
            renderer,
            items: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
        }
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn enqueue(&self, item: QueueItem<T>) {
        self.items.borrow_mut().push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn is_draining(&self) -> bool {
        self.draining.get()
    }

    pub fn is_idle(&self) -> bool {
        !self.is_draining() && self.is_empty()
    }

    /// Drain the queue until it is empty.
    ///
    /// Calling this while another drain is running returns immediately with an
    /// empty summary; the running drain picks up anything enqueued meanwhile.
    pub async fn drain(&self) -> DrainSummary {
        if self.draining.replace(true) {
            sedori_debug!("Drain already in progress; {} item(s) waiting", self.len());
            return DrainSummary::default();
        }
        let _guard = DrainGuard(&self.draining);

        let mut summary = DrainSummary::default();
        loop {
            let batch = self.take_batch();
            if batch.is_empty() {
                break;
            }
            summary.batches += 1;
            sedori_debug!("Batch {}: {} search(es)", summary.batches, batch.len());

            for item in &batch {
                self.renderer.show_loading(&item.target);
            }
            let outcomes = join_all(batch.iter().map(|item| self.search_and_render(item))).await;
            for succeeded in outcomes {
                if succeeded {
                    summary.succeeded += 1;
                } else {
                    summary.failed += 1;
                }
            }

            if self.is_empty() {
                break;
            }
            tokio::time::sleep(self.settings.batch_delay).await;
        }

        sedori_info!(
            "Drained {} item(s) in {} batch(es): {} ok, {} failed",
            summary.total(),
            summary.batches,
            summary.succeeded,
            summary.failed
        );
        summary
    }

    fn take_batch(&self) -> Vec<QueueItem<T>> {
        let mut items = self.items.borrow_mut();
        let count = self.settings.concurrency.min(items.len());
        items.drain(..count).collect()
    }

    async fn search_and_render(&self, item: &QueueItem<T>) -> bool {
        let outcome = self.searcher.search(&item.keyword).await;
        let succeeded = outcome.is_ok();
        if let Err(err) = &outcome {
            sedori_warn!("Search for '{}' failed: {}", item.keyword, err);
        }
        self.renderer.show_outcome(&item.target, outcome);
        succeeded
    }
}
