use serde::{Deserialize, Serialize};

/// One Yahoo Auctions listing as returned by the backend search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub auction_id: String,
    pub title: String,
    pub current_price: Option<i64>,
    pub buy_now_price: Option<i64>,
    pub image_url: Option<String>,
    pub end_time_text: Option<String>,
    pub bid_count: Option<u32>,
    pub url: String,
}
