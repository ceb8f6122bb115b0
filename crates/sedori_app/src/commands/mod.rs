pub mod dashboard;
pub mod page;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use sedori_engine::{BackendClient, FetchRelay, RelaySearcher, Searcher};
use serde::Serialize;

use crate::config::SedoriConfig;

/// Resolved configuration plus output mode, shared by every command.
pub struct Context {
    pub config: SedoriConfig,
    pub json: bool,
}

impl Context {
    pub fn new(config: SedoriConfig, json: bool) -> Self {
        Self { config, json }
    }

    pub fn client(&self) -> Result<BackendClient> {
        BackendClient::new(self.config.client_settings())
            .with_context(|| format!("invalid API base '{}'", self.config.api_base))
    }

    pub fn searcher(&self, relay: bool) -> Result<Arc<dyn Searcher>> {
        if relay {
            let timeout = Duration::from_millis(self.config.request_timeout_ms);
            let relay = FetchRelay::new(timeout).context("failed to build fetch relay")?;
            let searcher = RelaySearcher::new(relay, &self.config.api_base)
                .with_context(|| format!("invalid API base '{}'", self.config.api_base))?;
            Ok(Arc::new(searcher))
        } else {
            Ok(Arc::new(self.client()?))
        }
    }

    /// Prints `value` as pretty JSON, or the text produced by `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}
