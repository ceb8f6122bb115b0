//! Sedori engine: backend client, batch search queue and page injection.
mod client;
mod decode;
mod dom;
pub mod dto;
mod extract;
mod injector;
mod links;
mod output;
mod panel;
mod queue;
mod relay;
mod search;
mod session;
mod types;

pub use client::{BackendClient, ClientSettings, DEFAULT_API_BASE};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use dom::{escape_html, PageDocument};
pub use extract::{
    AuctionPage, AuctionPageExtractor, PageExtractor, ProductPage, ProductPageExtractor,
};
pub use injector::{
    AuctionAnnotation, AuctionInjector, CategoryInjector, InjectError, ProductAnnotation,
    ProductInjector, ScanReport, MONITOR_BUTTON_ID, PRODUCT_PANEL_ID, SEARCH_BUTTON_ID,
};
pub use links::{DashboardLinks, MonitorDraft, DEFAULT_DASHBOARD_URL};
pub use output::{
    ensure_output_dir, sanitize_stem, write_scan_output, AtomicFileWriter, OutputError,
    ScanOutput, ScanRecord,
};
pub use panel::{full_panel_markup, mini_panel_markup, DomPanelRenderer, PanelStyle, ProductContext};
pub use queue::{BatchSearchQueue, DrainSummary, PanelRenderer, QueueItem, QueueSettings};
pub use relay::{FetchRelay, RelayRequest, RelayResponse, RelaySearcher};
pub use search::Searcher;
pub use session::{InjectorSession, PageMutation, SessionSettings};
pub use types::{ApiError, FailureKind};
