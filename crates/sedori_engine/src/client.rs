use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder};
use sedori_core::SearchResult;
use sedori_logging::sedori_debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::dto::{
    AmazonProduct, AuctionDetail, CompetitorsResponse, Detail, EstimateRequest, HistoryResponse,
    Message, MonitorAddRequest, MonitorItem, MonitorList, MonitorStatus, NotificationList,
    PriceSuggestion, PricingRequest, PricingResult, SchedulerStatus, StoredAmazonProduct,
    SuggestRequest, Template, TemplateDraft, TemplatePatch, UnreadCount, WinningPriceEstimate,
};
use crate::types::map_reqwest_error;
use crate::{ApiError, FailureKind};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Typed client for the backend REST API.
///
/// Every call returns the decoded JSON body; non-2xx responses become
/// [`FailureKind::HttpStatus`] errors carrying the response body text.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = parse_api_base(&settings.api_base)?;
        let http = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { http, base })
    }

    pub fn api_base(&self) -> &Url {
        &self.base
    }

    // --- Yahoo Auctions ---

    pub async fn search_yahoo(&self, keyword: &str) -> Result<Vec<SearchResult>, ApiError> {
        let url = search_url(&self.base, keyword)?;
        self.send(self.http.get(url)).await
    }

    pub async fn auction_detail(&self, auction_id: &str) -> Result<AuctionDetail, ApiError> {
        let url = endpoint(&self.base, &["yahoo", "detail", auction_id])?;
        self.send(self.http.get(url)).await
    }

    pub async fn auction_history(
        &self,
        keyword: &str,
        count: u32,
    ) -> Result<HistoryResponse, ApiError> {
        let mut url = endpoint(&self.base, &["yahoo", "history"])?;
        url.query_pairs_mut()
            .append_pair("keyword", keyword)
            .append_pair("count", &count.to_string());
        self.send(self.http.get(url)).await
    }

    // --- Monitors ---

    pub async fn add_monitor(&self, request: &MonitorAddRequest) -> Result<MonitorItem, ApiError> {
        let url = endpoint(&self.base, &["monitor", "add"])?;
        self.send(self.http.post(url).json(request)).await
    }

    pub async fn list_monitors(&self, status: MonitorStatus) -> Result<MonitorList, ApiError> {
        let mut url = endpoint(&self.base, &["monitor", "list"])?;
        url.query_pairs_mut().append_pair("status", status.as_str());
        self.send(self.http.get(url)).await
    }

    pub async fn monitor(&self, id: i64) -> Result<MonitorItem, ApiError> {
        let url = endpoint(&self.base, &["monitor", &id.to_string()])?;
        self.send(self.http.get(url)).await
    }

    pub async fn remove_monitor(&self, id: i64) -> Result<Message, ApiError> {
        let url = endpoint(&self.base, &["monitor", &id.to_string()])?;
        self.send(self.http.delete(url)).await
    }

    // --- Pricing ---

    pub async fn calculate_pricing(
        &self,
        request: &PricingRequest,
    ) -> Result<PricingResult, ApiError> {
        self.post_json(&["pricing", "calculate"], request).await
    }

    pub async fn suggest_price(&self, request: &SuggestRequest) -> Result<PriceSuggestion, ApiError> {
        self.post_json(&["pricing", "suggest"], request).await
    }

    pub async fn estimate_winning_price(
        &self,
        request: &EstimateRequest,
    ) -> Result<WinningPriceEstimate, ApiError> {
        self.post_json(&["pricing", "estimate"], request).await
    }

    // --- Amazon ---

    pub async fn amazon_product(&self, asin: &str) -> Result<AmazonProduct, ApiError> {
        let url = endpoint(&self.base, &["amazon", "product", asin])?;
        self.send(self.http.get(url)).await
    }

    pub async fn save_amazon_product(&self, asin: &str) -> Result<StoredAmazonProduct, ApiError> {
        let url = endpoint(&self.base, &["amazon", "product", asin, "save"])?;
        self.send(self.http.post(url)).await
    }

    pub async fn competitors(&self, asin: &str) -> Result<CompetitorsResponse, ApiError> {
        let url = endpoint(&self.base, &["amazon", "competitors", asin])?;
        self.send(self.http.get(url)).await
    }

    // --- Listing templates ---

    pub async fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        // Trailing slash: the collection route is registered as `/templates/`.
        let url = endpoint(&self.base, &["templates", ""])?;
        self.send(self.http.get(url)).await
    }

    pub async fn template(&self, id: i64) -> Result<Template, ApiError> {
        let url = endpoint(&self.base, &["templates", &id.to_string()])?;
        self.send(self.http.get(url)).await
    }

    pub async fn create_template(&self, draft: &TemplateDraft) -> Result<Template, ApiError> {
        self.post_json(&["templates", ""], draft).await
    }

    pub async fn update_template(
        &self,
        id: i64,
        patch: &TemplatePatch,
    ) -> Result<Template, ApiError> {
        let url = endpoint(&self.base, &["templates", &id.to_string()])?;
        self.send(self.http.put(url).json(patch)).await
    }

    pub async fn delete_template(&self, id: i64) -> Result<Detail, ApiError> {
        let url = endpoint(&self.base, &["templates", &id.to_string()])?;
        self.send(self.http.delete(url)).await
    }

    // --- Notifications ---

    pub async fn list_notifications(
        &self,
        limit: u32,
        unread_only: bool,
    ) -> Result<NotificationList, ApiError> {
        let mut url = endpoint(&self.base, &["notifications", ""])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("unread_only", if unread_only { "true" } else { "false" });
        self.send(self.http.get(url)).await
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<Detail, ApiError> {
        let url = endpoint(&self.base, &["notifications", &id.to_string(), "read"])?;
        self.send(self.http.post(url)).await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<Detail, ApiError> {
        let url = endpoint(&self.base, &["notifications", "read-all"])?;
        self.send(self.http.post(url)).await
    }

    pub async fn unread_count(&self) -> Result<UnreadCount, ApiError> {
        let url = endpoint(&self.base, &["notifications", "unread-count"])?;
        self.send(self.http.get(url)).await
    }

    // --- Scheduler ---

    pub async fn scheduler_status(&self) -> Result<SchedulerStatus, ApiError> {
        let url = endpoint(&self.base, &["scheduler", "status"])?;
        self.send(self.http.get(url)).await
    }

    pub async fn start_scheduler(&self) -> Result<Detail, ApiError> {
        self.post_empty(&["scheduler", "start"]).await
    }

    pub async fn stop_scheduler(&self) -> Result<Detail, ApiError> {
        self.post_empty(&["scheduler", "stop"]).await
    }

    pub async fn run_scheduler_now(&self) -> Result<Detail, ApiError> {
        self.post_empty(&["scheduler", "run-now"]).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = endpoint(&self.base, segments)?;
        self.send(self.http.post(url).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = endpoint(&self.base, segments)?;
        self.send(self.http.request(Method::POST, url)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let url = response.url().clone();
        sedori_debug!("{} -> {}", url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::new(FailureKind::HttpStatus(status.as_u16()), body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes).map_err(|err| {
            ApiError::new(
                FailureKind::Decode,
                format!(
                    "{err} (content-type {})",
                    content_type.as_deref().unwrap_or("unknown")
                ),
            )
        })
    }
}

pub(crate) fn parse_api_base(raw: &str) -> Result<Url, ApiError> {
    let base = Url::parse(raw.trim())
        .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))?;
    if base.cannot_be_a_base() {
        return Err(ApiError::new(
            FailureKind::InvalidUrl,
            format!("{raw}: not a hierarchical url"),
        ));
    }
    Ok(base)
}

/// Append percent-encoded path segments to the API base.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::new(FailureKind::InvalidUrl, "api base cannot be a base"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Blank keywords have nothing to search for and never reach the backend.
pub(crate) fn search_url(base: &Url, keyword: &str) -> Result<Url, ApiError> {
    if keyword.trim().is_empty() {
        return Err(ApiError::new(FailureKind::NoData, "empty search keyword"));
    }
    let mut url = endpoint(base, &["yahoo", "search"])?;
    url.query_pairs_mut().append_pair("keyword", keyword);
    Ok(url)
}
