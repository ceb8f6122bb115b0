//! Category-page injector session.
//!
//! Drives the pure `sedori_core::update` state machine: page mutations are fed
//! as `Msg::DomMutated`, a ticker fires `Msg::Tick`, and the resulting effects
//! scan the page or start a queue drain. Drains are polled concurrently with
//! the ticker inside the same task.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use ego_tree::NodeId;
use futures_util::future::{FutureExt, LocalBoxFuture};
use futures_util::stream::{FuturesUnordered, StreamExt};
use sedori_core::{update, Effect, InjectorState, InjectorViewModel, Msg, RenderOptions, DEFAULT_DEBOUNCE};
use sedori_logging::{sedori_debug, sedori_info, sedori_warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, MissedTickBehavior};

use crate::dom::PageDocument;
use crate::injector::CategoryInjector;
use crate::panel::{DomPanelRenderer, PanelStyle};
use crate::{BatchSearchQueue, DrainSummary, QueueSettings, Searcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub tick_interval: Duration,
    pub queue: QueueSettings,
    pub render: RenderOptions,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            tick_interval: Duration::from_millis(75),
            queue: QueueSettings::default(),
            render: RenderOptions::CATEGORY,
        }
    }
}

/// A change applied to the live page while the session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageMutation {
    /// Append markup to the end of `<body>`, like infinite scroll loading more cards.
    AppendHtml { markup: String },
}

type DrainFuture<'a> = LocalBoxFuture<'a, DrainSummary>;

pub struct InjectorSession {
    doc: Rc<RefCell<PageDocument>>,
    queue: BatchSearchQueue<NodeId, DomPanelRenderer>,
    injector: CategoryInjector,
    state: RefCell<InjectorState>,
    keywords: RefCell<Vec<String>>,
    settings: SessionSettings,
}

impl InjectorSession {
    pub fn new(doc: PageDocument, searcher: Arc<dyn Searcher>, settings: SessionSettings) -> Self {
        let doc = Rc::new(RefCell::new(doc));
        let renderer = DomPanelRenderer::new(Rc::clone(&doc), settings.render, PanelStyle::Mini);
        Self {
            queue: BatchSearchQueue::new(settings.queue, searcher, renderer),
            doc,
            injector: CategoryInjector,
            state: RefCell::new(InjectorState::with_debounce(settings.debounce)),
            keywords: RefCell::new(Vec::new()),
            settings,
        }
    }

    pub fn document(&self) -> Rc<RefCell<PageDocument>> {
        Rc::clone(&self.doc)
    }

    pub fn to_html(&self) -> String {
        self.doc.borrow().to_html()
    }

    pub fn view(&self) -> InjectorViewModel {
        self.state.borrow().view()
    }

    /// Keywords enqueued so far, in scan order.
    pub fn keywords(&self) -> Vec<String> {
        self.keywords.borrow().clone()
    }

    /// Run until the mutation channel is closed, no debounced scan is pending
    /// and every drain has finished.
    pub async fn run(&self, mut mutations: UnboundedReceiver<PageMutation>) -> InjectorViewModel {
        let mut drains: FuturesUnordered<DrainFuture<'_>> = FuturesUnordered::new();
        let mut ticker = tokio::time::interval(self.settings.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut channel_open = true;

        self.dispatch(Msg::PageLoaded, &mut drains);

        loop {
            let debounce_pending = self.state.borrow().is_debounce_pending();
            if !channel_open && drains.is_empty() && !debounce_pending {
                break;
            }

            tokio::select! {
                mutation = mutations.recv(), if channel_open => match mutation {
                    Some(mutation) => {
                        self.apply(mutation);
                        let at = Instant::now().into_std();
                        self.dispatch(Msg::DomMutated { at }, &mut drains);
                    }
                    None => {
                        sedori_debug!("Mutation channel closed");
                        channel_open = false;
                    }
                },
                Some(summary) = drains.next(), if !drains.is_empty() => {
                    self.dispatch(
                        Msg::DrainFinished {
                            succeeded: summary.succeeded,
                            failed: summary.failed,
                        },
                        &mut drains,
                    );
                }
                _ = ticker.tick() => {
                    let now = Instant::now().into_std();
                    self.dispatch(Msg::Tick { now }, &mut drains);
                }
            }

            if self.state.borrow_mut().consume_dirty() {
                let view = self.view();
                sedori_debug!(
                    "Session: {} scan(s), {} annotated, {} ok, {} failed",
                    view.scans,
                    view.annotated,
                    view.succeeded,
                    view.failed
                );
            }
        }

        let view = self.view();
        sedori_info!(
            "Session finished: {} annotated over {} scan(s), {} search(es) ok, {} failed",
            view.annotated,
            view.scans,
            view.succeeded,
            view.failed
        );
        view
    }

    fn apply(&self, mutation: PageMutation) {
        match mutation {
            PageMutation::AppendHtml { markup } => {
                let mut doc = self.doc.borrow_mut();
                let appended = doc
                    .body()
                    .and_then(|body| doc.append_child(body, &markup));
                if appended.is_none() {
                    sedori_warn!("Mutation carried no element; ignored");
                }
            }
        }
    }

    fn dispatch<'a>(&'a self, msg: Msg, drains: &mut FuturesUnordered<DrainFuture<'a>>) {
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            let state = std::mem::take(&mut *self.state.borrow_mut());
            let (state, effects) = update(state, msg);
            *self.state.borrow_mut() = state;

            for effect in effects {
                match effect {
                    Effect::ScanPage => {
                        let report = self.injector.scan(&mut self.doc.borrow_mut(), &self.queue);
                        self.keywords.borrow_mut().extend(report.keywords);
                        pending.push_back(Msg::ScanCompleted {
                            annotated: report.annotated,
                            skipped: report.skipped,
                        });
                    }
                    Effect::DrainQueue => drains.push(self.queue.drain().boxed_local()),
                }
            }
        }
    }
}
