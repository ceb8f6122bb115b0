//! Request and response bodies of the backend REST API.
//!
//! The backend owns these records; the client passes them through untouched.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionDetail {
    pub auction_id: String,
    pub title: String,
    pub current_price: Option<i64>,
    pub buy_now_price: Option<i64>,
    pub start_price: Option<i64>,
    pub bid_count: Option<u32>,
    pub seller_id: Option<String>,
    pub seller_name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub condition: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub shipping_info: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryResult {
    pub auction_id: String,
    pub title: String,
    pub winning_price: i64,
    pub end_date: Option<String>,
    pub bid_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub results: Vec<HistoryResult>,
    pub count: usize,
    pub median_price: Option<f64>,
    pub average_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    #[default]
    Active,
    Ended,
}

impl MonitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorStatus::Active => "active",
            MonitorStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonitorStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(MonitorStatus::Active),
            "ended" => Ok(MonitorStatus::Ended),
            other => Err(format!("unknown monitor status '{other}' (expected active or ended)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorAddRequest {
    pub asin: String,
    pub product_title: String,
    pub auction_id: String,
    pub auction_title: String,
    pub current_price: Option<i64>,
    pub buy_now_price: Option<i64>,
    pub image_url: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorItem {
    pub id: i64,
    pub product_id: i64,
    pub auction_id: i64,
    pub asin: String,
    pub product_title: String,
    pub yahoo_auction_id: String,
    pub auction_title: String,
    pub current_price: Option<i64>,
    pub buy_now_price: Option<i64>,
    pub status: String,
    pub is_monitoring: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorList {
    #[serde(default)]
    pub items: Vec<MonitorItem>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub selling_price: i64,
    pub expected_winning_price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_cost: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub selling_price: i64,
    pub expected_winning_price: i64,
    pub amazon_fee: i64,
    pub amazon_fee_rate: f64,
    pub shipping_cost: i64,
    pub other_cost: i64,
    pub profit: i64,
    pub profit_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestRequest {
    pub expected_winning_price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_profit_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    pub suggested_price: i64,
    pub expected_winning_price: Option<i64>,
    pub target_profit_rate: Option<f64>,
    pub actual_profit_rate: f64,
    pub profit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub history_prices: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_now_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningPriceEstimate {
    pub expected_winning_price: Option<i64>,
    pub data_count: usize,
    /// `history_median`, `buynow_70pct` or `none`.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmazonProduct {
    pub asin: String,
    pub title: Option<String>,
    pub price: Option<i64>,
    pub brand: Option<String>,
    pub model_number: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAmazonProduct {
    pub id: i64,
    #[serde(flatten)]
    pub product: AmazonProduct,
    pub price_updated_at: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorOffer {
    pub price: i64,
    pub condition: String,
    pub seller_name: Option<String>,
    pub shipping_cost: i64,
    pub is_fba: bool,
    pub total_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorsResponse {
    pub asin: String,
    #[serde(default)]
    pub offers: Vec<CompetitorOffer>,
    pub lowest_new_price: Option<i64>,
    pub lowest_used_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl TemplatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.body.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link_url: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationList {
    #[serde(default)]
    pub items: Vec<NotificationItem>,
    pub total: usize,
    pub unread_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub unread_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub interval_minutes: u32,
    pub next_run: Option<String>,
}

/// `{"detail": "..."}` acknowledgement returned by most mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

/// `{"message": "..."}` acknowledgement returned by monitor removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    #[serde(default)]
    pub id: Option<i64>,
}
