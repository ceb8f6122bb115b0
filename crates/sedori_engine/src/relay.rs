//! Privileged fetch relay.
//!
//! Page-context code cannot reach the plain-HTTP backend directly, so it sends
//! a `{"type": "fetch", ...}` message to a relay that performs the request and
//! answers with `{"ok": true, "data": ...}` or `{"ok": false, "error": ...}`.
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use sedori_core::SearchResult;
use sedori_logging::{sedori_debug, sedori_warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::client::{parse_api_base, search_url};
use crate::types::map_reqwest_error;
use crate::{ApiError, FailureKind, Searcher};

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RelayRequest {
    Fetch {
        url: String,
        #[serde(default = "default_method")]
        method: String,
        /// Pre-serialised JSON request body.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
}

impl RelayRequest {
    pub fn get(url: impl Into<String>) -> Self {
        RelayRequest::Fetch {
            url: url.into(),
            method: default_method(),
            body: None,
        }
    }

    pub fn post_json<B: Serialize + ?Sized>(url: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        Ok(RelayRequest::Fetch {
            url: url.into(),
            method: "POST".to_string(),
            body: Some(body),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Unwrap the payload, turning `ok: false` into a relay error.
    pub fn into_result(self) -> Result<Value, ApiError> {
        if self.ok {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            let message = self.error.unwrap_or_else(|| "Unknown error".to_string());
            Err(ApiError::new(FailureKind::Relay, message))
        }
    }
}

/// Performs relayed fetches on behalf of page-context callers.
#[derive(Debug, Clone)]
pub struct FetchRelay {
    http: reqwest::Client,
}

impl FetchRelay {
    pub fn new(request_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { http })
    }

    /// Entry point for raw messages; anything other than a fetch is rejected.
    pub async fn handle_message(&self, message: &Value) -> RelayResponse {
        match serde_json::from_value::<RelayRequest>(message.clone()) {
            Ok(request) => self.handle(&request).await,
            Err(err) => {
                let kind = message
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("<missing>");
                sedori_warn!("Rejected relay message of type {}: {}", kind, err);
                RelayResponse::failure(format!("unsupported message type: {kind}"))
            }
        }
    }

    pub async fn handle(&self, request: &RelayRequest) -> RelayResponse {
        match self.perform(request).await {
            Ok(data) => RelayResponse::success(data),
            Err(message) => RelayResponse::failure(message),
        }
    }

    async fn perform(&self, request: &RelayRequest) -> Result<Value, String> {
        let RelayRequest::Fetch { url, method, body } = request;
        let method = match method.trim() {
            "" => Method::GET,
            name => Method::from_bytes(name.to_ascii_uppercase().as_bytes())
                .map_err(|_| format!("invalid method: {name}"))?,
        };
        let url = Url::parse(url).map_err(|err| format!("invalid url {url}: {err}"))?;
        sedori_debug!("relay {} {}", method, url);

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|err| map_reqwest_error(err).message)?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(err).message)?;
        serde_json::from_slice(&bytes).map_err(|err| err.to_string())
    }
}

/// [`Searcher`] that reaches the backend through a [`FetchRelay`].
#[derive(Debug, Clone)]
pub struct RelaySearcher {
    relay: FetchRelay,
    api_base: Url,
}

impl RelaySearcher {
    pub fn new(relay: FetchRelay, api_base: &str) -> Result<Self, ApiError> {
        Ok(Self {
            relay,
            api_base: parse_api_base(api_base)?,
        })
    }
}

#[async_trait::async_trait]
impl Searcher for RelaySearcher {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, ApiError> {
        let url = search_url(&self.api_base, keyword)?;
        let data = self
            .relay
            .handle(&RelayRequest::get(url.as_str()))
            .await
            .into_result()?;
        serde_json::from_value(data).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fetch_message_defaults_to_get() {
        let request: RelayRequest =
            serde_json::from_value(json!({"type": "fetch", "url": "http://x/api"})).unwrap();
        assert_eq!(request, RelayRequest::get("http://x/api"));
    }

    #[test]
    fn post_body_is_serialised_json() {
        let request = RelayRequest::post_json("http://x/api", &json!({"asin": "B0"})).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "fetch");
        assert_eq!(value["method"], "POST");
        assert_eq!(value["body"], r#"{"asin":"B0"}"#);
    }

    #[test]
    fn failed_response_becomes_relay_error() {
        let err = RelayResponse::failure("HTTP 500").into_result().unwrap_err();
        assert_eq!(err.kind, FailureKind::Relay);
        assert_eq!(err.message, "HTTP 500");
    }
}
