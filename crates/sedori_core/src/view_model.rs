/// Display state of one result panel on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    /// Annotated but not yet picked up by the queue.
    Waiting,
    /// Search in flight.
    Loading,
    /// Search succeeded with zero results.
    Empty,
    Results(ResultPanelView),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanelView {
    /// Number of results the backend returned, before the display limit.
    pub total: usize,
    pub rows: Vec<ResultRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub auction_id: String,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub current_price: String,
    pub buy_now_price: Option<String>,
    /// Raw yen amounts behind the formatted prices.
    pub current_price_yen: Option<i64>,
    pub buy_now_price_yen: Option<i64>,
    pub remaining: String,
    pub bid_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InjectorViewModel {
    pub scans: u64,
    pub annotated: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub debounce_pending: bool,
    pub dirty: bool,
}
