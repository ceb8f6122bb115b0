use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The page finished loading; triggers the initial scan.
    PageLoaded,
    /// The host page mutated (debounced).
    DomMutated { at: Instant },
    /// Periodic tick that fires pending debounced scans.
    Tick { now: Instant },
    /// A scan pass finished.
    ScanCompleted { annotated: usize, skipped: usize },
    /// A drain loop ran the queue to empty.
    DrainFinished { succeeded: usize, failed: usize },
}
