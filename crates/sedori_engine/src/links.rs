use std::sync::LazyLock;

use url::Url;

use crate::client::parse_api_base;
use crate::ApiError;

pub const DEFAULT_DASHBOARD_URL: &str = "http://localhost:5173";

static DEFAULT_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_DASHBOARD_URL).expect("valid default dashboard url"));

/// Prefill values for the dashboard "add monitor" form. Absent fields are
/// left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorDraft {
    pub asin: Option<String>,
    pub product_title: Option<String>,
    pub auction_id: Option<String>,
    pub auction_title: Option<String>,
    pub current_price: Option<i64>,
    pub buy_now_price: Option<i64>,
    pub url: Option<String>,
}

/// Deep links into the dashboard front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLinks {
    base: Url,
}

impl Default for DashboardLinks {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.clone(),
        }
    }
}

impl DashboardLinks {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base: parse_api_base(base)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn monitor_add(&self, draft: &MonitorDraft) -> Url {
        let mut url = self.page(&["monitor", "add"]);
        let current_price = draft.current_price.map(|p| p.to_string());
        let buy_now_price = draft.buy_now_price.map(|p| p.to_string());
        let fields = [
            ("asin", draft.asin.as_deref()),
            ("product_title", draft.product_title.as_deref()),
            ("auction_id", draft.auction_id.as_deref()),
            ("auction_title", draft.auction_title.as_deref()),
            ("current_price", current_price.as_deref()),
            ("buy_now_price", buy_now_price.as_deref()),
            ("url", draft.url.as_deref()),
        ];
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in fields {
                if let Some(value) = value {
                    query.append_pair(key, value);
                }
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }

    pub fn research(&self, asin: &str) -> Url {
        let mut url = self.page(&["research"]);
        url.query_pairs_mut().append_pair("asin", asin);
        url
    }

    fn page(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn research_link_encodes_asin() {
        let links = DashboardLinks::default();
        assert_eq!(
            links.research("B0TEST0001").as_str(),
            "http://localhost:5173/research?asin=B0TEST0001"
        );
    }

    #[test]
    fn monitor_add_skips_absent_fields() {
        let links = DashboardLinks::new("http://dash.local/app/").unwrap();
        let draft = MonitorDraft {
            auction_id: Some("x123".into()),
            auction_title: Some("Sony α7 & lens".into()),
            current_price: Some(12000),
            ..MonitorDraft::default()
        };
        let url = links.monitor_add(&draft);
        assert_eq!(url.path(), "/app/monitor/add");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("auction_id".to_string(), "x123".to_string()),
                ("auction_title".to_string(), "Sony α7 & lens".to_string()),
                ("current_price".to_string(), "12000".to_string()),
            ]
        );
    }

    #[test]
    fn empty_draft_has_no_query() {
        let url = DashboardLinks::default().monitor_add(&MonitorDraft::default());
        assert_eq!(url.as_str(), "http://localhost:5173/monitor/add");
    }
}
