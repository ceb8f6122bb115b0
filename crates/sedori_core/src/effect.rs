#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Run one full scan pass over the page.
    ScanPage,
    /// Kick the search queue; a no-op if it is already draining.
    DrainQueue,
}
