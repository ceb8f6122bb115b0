use crate::format::{format_price, truncate_chars, PLACEHOLDER};
use crate::{PanelState, ResultPanelView, ResultRowView, SearchResult};

/// How many results a panel shows and how long titles may get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub result_limit: usize,
    pub title_limit: Option<usize>,
}

impl RenderOptions {
    /// Compact panels injected next to every card of a category page.
    pub const CATEGORY: Self = Self {
        result_limit: 5,
        title_limit: Some(50),
    };

    /// The single panel injected on a product page.
    pub const PRODUCT: Self = Self {
        result_limit: 10,
        title_limit: None,
    };
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::CATEGORY
    }
}

pub fn render_results(results: &[SearchResult], options: &RenderOptions) -> PanelState {
    if results.is_empty() {
        return PanelState::Empty;
    }
    let rows = results
        .iter()
        .take(options.result_limit)
        .map(|result| render_row(result, options))
        .collect();
    PanelState::Results(ResultPanelView {
        total: results.len(),
        rows,
    })
}

pub fn render_error(message: impl Into<String>) -> PanelState {
    PanelState::Error(message.into())
}

fn render_row(result: &SearchResult, options: &RenderOptions) -> ResultRowView {
    let title = match options.title_limit {
        Some(limit) => truncate_chars(&result.title, limit),
        None => result.title.clone(),
    };
    // A zero buy-now price means the listing has none.
    let buy_now_price_yen = result.buy_now_price.filter(|price| *price != 0);
    let buy_now_price = buy_now_price_yen.map(|price| format_price(Some(price)));
    let remaining = result
        .end_time_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(PLACEHOLDER)
        .to_string();

    ResultRowView {
        auction_id: result.auction_id.clone(),
        title,
        url: result.url.clone(),
        image_url: result.image_url.clone(),
        current_price: format_price(result.current_price),
        buy_now_price,
        current_price_yen: result.current_price,
        buy_now_price_yen,
        remaining,
        bid_count: result.bid_count.unwrap_or(0),
    }
}
