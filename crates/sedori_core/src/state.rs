use std::time::{Duration, Instant};

use crate::debounce::Debouncer;
use crate::view_model::InjectorViewModel;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InjectorState {
    debouncer: Debouncer,
    scans: u64,
    annotated: usize,
    skipped: usize,
    succeeded: usize,
    failed: usize,
    dirty: bool,
}

impl InjectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce(window: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(window),
            ..Self::default()
        }
    }

    pub fn view(&self) -> InjectorViewModel {
        InjectorViewModel {
            scans: self.scans,
            annotated: self.annotated,
            skipped: self.skipped,
            succeeded: self.succeeded,
            failed: self.failed,
            debounce_pending: self.debouncer.is_pending(),
            dirty: self.dirty,
        }
    }

    pub fn is_debounce_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn record_mutation(&mut self, at: Instant) {
        self.debouncer.notify(at);
    }

    pub(crate) fn scan_due(&mut self, now: Instant) -> bool {
        self.debouncer.poll(now)
    }

    pub(crate) fn record_scan(&mut self, annotated: usize, skipped: usize) {
        self.scans += 1;
        self.annotated += annotated;
        self.skipped = skipped;
        self.dirty = true;
    }

    pub(crate) fn record_drain(&mut self, succeeded: usize, failed: usize) {
        self.succeeded += succeeded;
        self.failed += failed;
        if succeeded + failed > 0 {
            self.dirty = true;
        }
    }
}
