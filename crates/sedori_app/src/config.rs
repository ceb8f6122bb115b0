//! `sedori.ron` configuration.
//!
//! Every field is optional; a missing default file means built-in defaults.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sedori_core::{RenderOptions, DEFAULT_DEBOUNCE};
use sedori_engine::{
    ApiError, ClientSettings, DashboardLinks, QueueSettings, SessionSettings, DEFAULT_API_BASE,
    DEFAULT_DASHBOARD_URL,
};
use sedori_logging::{sedori_debug, sedori_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "sedori.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SedoriConfig {
    pub api_base: String,
    pub dashboard_url: String,
    pub concurrency: usize,
    pub batch_delay_ms: u64,
    pub debounce_ms: u64,
    pub tick_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub category_result_limit: usize,
    pub product_result_limit: usize,
    pub output_dir: PathBuf,
}

impl Default for SedoriConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        let queue = QueueSettings::default();
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            concurrency: queue.concurrency,
            batch_delay_ms: millis(queue.batch_delay),
            debounce_ms: millis(DEFAULT_DEBOUNCE),
            tick_ms: millis(SessionSettings::default().tick_interval),
            connect_timeout_ms: millis(client.connect_timeout),
            request_timeout_ms: millis(client.request_timeout),
            category_result_limit: RenderOptions::CATEGORY.result_limit,
            product_result_limit: RenderOptions::PRODUCT.result_limit,
            output_dir: PathBuf::from("sedori-output"),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl SedoriConfig {
    /// Loads `path`, or `./sedori.ron` when no path is given.
    ///
    /// An explicitly named file must exist; the default file may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                sedori_debug!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config = Self::parse(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.clone(),
                source,
            },
            other => other,
        })?;
        sedori_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be greater than zero".into()));
        }
        if self.category_result_limit == 0 || self.product_result_limit == 0 {
            return Err(ConfigError::Invalid("result limits must be greater than zero".into()));
        }
        Ok(())
    }

    pub fn with_api_base(mut self, api_base: Option<String>) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        self
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_base: self.api_base.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn queue_settings(&self) -> QueueSettings {
        QueueSettings {
            concurrency: self.concurrency,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            tick_interval: Duration::from_millis(self.tick_ms),
            queue: self.queue_settings(),
            render: RenderOptions {
                result_limit: self.category_result_limit,
                ..RenderOptions::CATEGORY
            },
        }
    }

    pub fn product_render(&self) -> RenderOptions {
        RenderOptions {
            result_limit: self.product_result_limit,
            ..RenderOptions::PRODUCT
        }
    }

    pub fn dashboard_links(&self) -> Result<DashboardLinks, ApiError> {
        DashboardLinks::new(&self.dashboard_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_mirror_library_settings() {
        let config = SedoriConfig::default();
        assert_eq!(config.client_settings().api_base, DEFAULT_API_BASE);
        assert_eq!(config.queue_settings(), QueueSettings::default());
        assert_eq!(config.session_settings(), SessionSettings::default());
        assert_eq!(config.product_render(), RenderOptions::PRODUCT);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = SedoriConfig::parse(
            r#"(
                api_base: "http://research.local:9000/api",
                concurrency: 5,
                category_result_limit: 3,
            )"#,
        )
        .unwrap();
        assert_eq!(config.api_base, "http://research.local:9000/api");
        assert_eq!(config.queue_settings().concurrency, 5);
        assert_eq!(config.session_settings().render.result_limit, 3);
        assert_eq!(config.session_settings().render.title_limit, Some(50));
        assert_eq!(config.batch_delay_ms, 400);
    }

    #[test]
    fn zero_tick_is_rejected() {
        let err = SedoriConfig::parse("(tick_ms: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(concurrency: \"three\")").unwrap();
        match SedoriConfig::load(Some(&path)) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn named_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.ron");
        assert!(matches!(
            SedoriConfig::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn flag_overrides_file_api_base() {
        let config = SedoriConfig::default().with_api_base(Some("http://10.0.0.2/api".into()));
        assert_eq!(config.api_base, "http://10.0.0.2/api");
        let unchanged = SedoriConfig::default().with_api_base(None);
        assert_eq!(unchanged.api_base, DEFAULT_API_BASE);
    }
}
