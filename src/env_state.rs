//! # Orrery environment state
//!
//! This module defines [`crate::env_state::OrreryEnv`], the **shared environment object** handed to
//! the catalog client. It provides:
//!
//! - A persistent **HTTP client** ([`reqwest::Client`]) with a per-request timeout.
//! - The NeoWs **base URL** and **API credential**, appended to every request as the
//!   `api_key` query parameter.
//! - A wall-clock provider ([`Clock`]) used by the cache TTL check.
//!
//! ## Structure
//!
//! ```text
//! OrreryEnv
//! ├── http_client (reqwest::Client, timeout from OrreryConfig)
//! ├── base_url    (String)
//! └── api_key     (String, never logged)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use neo_orrery::env_state::{OrreryConfig, OrreryEnv};
//!
//! let env = OrreryEnv::new(&OrreryConfig::default().with_api_key("my-key"))?;
//! let reply = env.get("neo/browse").await?;
//! ```
//!
//! ## Notes
//!
//! - The environment never reads process environment variables: the composition root
//!   (the `neo_orrery` binary) builds an [`OrreryConfig`] and passes it in.
//! - A timed-out request surfaces as [`OrreryError::Http`]; the catalog client treats it
//!   as a per-candidate failure.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use camino::Utf8PathBuf;
use reqwest::Client;
use tracing::debug;

use crate::constants::{Millis, DEMO_API_KEY, FRAME_TIME_STEP, NEOWS_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::orrery_errors::OrreryError;

/// Configuration of the orrery pipeline.
///
/// # Fields
///
/// * `api_key` - NeoWs credential, sent as the `api_key` query parameter
/// * `base_url` - root of the NeoWs REST API, without trailing slash
/// * `request_timeout` - timeout applied to every browse and detail request
/// * `cache_path` - explicit location of the cached snapshot; `None` uses the user cache dir
/// * `frame_step` - animation time added per rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct OrreryConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub cache_path: Option<Utf8PathBuf>,
    pub frame_step: f64,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        OrreryConfig {
            api_key: DEMO_API_KEY.to_string(),
            base_url: NEOWS_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            cache_path: None,
            frame_step: FRAME_TIME_STEP,
        }
    }
}

impl OrreryConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }
}

/// Raw reply of one catalog request: status code and undecoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReply {
    pub status: u16,
    pub body: String,
}

impl CatalogReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        CatalogReply {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Read-only access to the remote catalog.
///
/// `path` is relative to the catalog root (`"neo/browse"`, `"neo/3542519"`). Implementations
/// add the credential themselves. A reply with a non-2xx status is **not** an error at this
/// level: status interpretation belongs to the catalog client.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<CatalogReply, OrreryError>;
}

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

/// [`Clock`] backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        // a clock set before 1970 reads as the epoch, which only makes every entry stale
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Millis)
            .unwrap_or(0)
    }
}

/// [`Clock`] returning a settable instant.
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicU64,
}

impl FixedClock {
    pub fn new(now: Millis) -> Self {
        FixedClock {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: Millis) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

/// This object is passed to the catalog client
/// to provide access to the remote NeoWs service
///
/// # Fields
///
/// * `http_client` - A reqwest client used to make HTTP requests
/// * `base_url` - The root of the NeoWs REST API
/// * `api_key` - The credential sent with every request
#[derive(Debug, Clone)]
pub struct OrreryEnv {
    pub http_client: Client,
    base_url: String,
    api_key: String,
}

impl OrreryEnv {
    /// Create a new environment from a configuration
    ///
    /// Arguments
    /// ---------
    /// * `config`: the orrery configuration (credential, base URL, timeout)
    ///
    /// Return
    /// ------
    /// * A new OrreryEnv, or an error if the TLS backend cannot be initialized
    pub fn new(config: &OrreryConfig) -> Result<Self, OrreryError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(OrreryEnv {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl CatalogTransport for OrreryEnv {
    async fn get(&self, path: &str) -> Result<CatalogReply, OrreryError> {
        let url = self.url_for(path);
        debug!(url = %url, "GET catalog resource (api_key redacted)");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(CatalogReply { status, body })
    }
}
