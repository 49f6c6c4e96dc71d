//! # Catalog client
//!
//! Resolution of the NEO catalog into a list of [`BodyRecord`]s, with a one-hour write-through
//! cache in front of the rate-limited NeoWs service.
//!
//! ## Algorithm
//!
//! 1. A cached snapshot younger than [`CACHE_TTL_MS`](crate::constants::CACHE_TTL_MS) is
//!    returned as is, without any request.
//! 2. Otherwise one `neo/browse` request lists the candidates.
//! 3. One `neo/{id}` request per candidate is issued concurrently; the client waits for every
//!    request to settle and keeps the successes, in browse order.
//! 4. The survivors are written to the cache store and returned.
//!
//! ## Degraded results
//!
//! [`CatalogClient::resolve_bodies`] never fails. Rate limiting, an unavailable or malformed
//! browse endpoint all produce an empty list, and nothing is cached in those cases. The
//! fallible path is exposed as [`CatalogClient::fetch_catalog`].
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::cache_store::{CacheEntry, CacheStore};
use crate::catalog::records::{parse_browse, BodyRecord, Candidate};
use crate::constants::HTTP_TOO_MANY_REQUESTS;
use crate::env_state::{CatalogTransport, Clock, SystemClock};
use crate::orrery_errors::OrreryError;

pub const BROWSE_PATH: &str = "neo/browse";

pub fn detail_path(id: &str) -> String {
    format!("neo/{id}")
}

pub struct CatalogClient<T, S, C = SystemClock> {
    transport: T,
    cache: S,
    clock: C,
}

impl<T, S> CatalogClient<T, S, SystemClock>
where
    T: CatalogTransport,
    S: CacheStore,
{
    pub fn new(transport: T, cache: S) -> Self {
        CatalogClient::with_clock(transport, cache, SystemClock)
    }
}

impl<T, S, C> CatalogClient<T, S, C>
where
    T: CatalogTransport,
    S: CacheStore,
    C: Clock,
{
    pub fn with_clock(transport: T, cache: S, clock: C) -> Self {
        CatalogClient {
            transport,
            cache,
            clock,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &S {
        &self.cache
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Resolve the catalog, degrading every failure to an empty list.
    ///
    /// Return
    /// ------
    /// * The fully resolved records, in browse order, or an empty list if the catalog could
    ///   not be listed
    pub async fn resolve_bodies(&self) -> Vec<BodyRecord> {
        match self.fetch_catalog().await {
            Ok(records) => records,
            Err(OrreryError::RateLimited) => {
                warn!("Rate limit exceeded on the NEO catalog, continuing without bodies");
                Vec::new()
            }
            Err(err) => {
                error!(error = %err, "Error fetching NEO data, continuing without bodies");
                Vec::new()
            }
        }
    }

    /// Resolve the catalog, surfacing browse-level failures.
    ///
    /// Detail failures never surface here: the failing candidate is dropped and logged.
    ///
    /// Return
    /// ------
    /// * The records from a valid cache entry, or freshly resolved and written through
    /// * [`OrreryError::RateLimited`] on HTTP 429 from the browse endpoint
    /// * [`OrreryError::CatalogUnavailable`] on any other non-2xx status or a network error
    /// * [`OrreryError::MalformedResponse`] if the listing has no `near_earth_objects`
    pub async fn fetch_catalog(&self) -> Result<Vec<BodyRecord>, OrreryError> {
        if let Some(records) = self.cached_records() {
            info!(count = records.len(), "Using cached NEO data");
            return Ok(records);
        }

        let candidates = self.browse().await?;
        let records = self.resolve_details(&candidates).await;

        info!(
            candidates = candidates.len(),
            resolved = records.len(),
            "Resolved NEO catalog"
        );

        let entry = CacheEntry::new(records, self.clock.now_ms());
        if let Err(err) = self.cache.write(&entry) {
            warn!(error = %err, "Unable to cache NEO data");
        }
        Ok(entry.payload)
    }

    fn cached_records(&self) -> Option<Vec<BodyRecord>> {
        let now = self.clock.now_ms();
        self.cache
            .read()
            .filter(|entry| entry.is_valid_at(now))
            .map(|entry| entry.payload)
    }

    async fn browse(&self) -> Result<Vec<Candidate>, OrreryError> {
        let reply = self
            .transport
            .get(BROWSE_PATH)
            .await
            .map_err(|err| OrreryError::CatalogUnavailable(err.to_string()))?;

        if reply.status == HTTP_TOO_MANY_REQUESTS {
            return Err(OrreryError::RateLimited);
        }
        if !reply.is_success() {
            return Err(OrreryError::CatalogUnavailable(format!(
                "HTTP error! status: {}",
                reply.status
            )));
        }

        parse_browse(&reply.body)
    }

    async fn resolve_details(&self, candidates: &[Candidate]) -> Vec<BodyRecord> {
        let pending = candidates
            .iter()
            .map(|candidate| self.resolve_one(candidate));
        join_all(pending).await.into_iter().flatten().collect()
    }

    async fn resolve_one(&self, candidate: &Candidate) -> Option<BodyRecord> {
        match self.fetch_detail(candidate).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    neo = %candidate.name,
                    error = %err,
                    "Error fetching details for NEO"
                );
                None
            }
        }
    }

    async fn fetch_detail(&self, candidate: &Candidate) -> Result<BodyRecord, OrreryError> {
        let failure = |reason: String| OrreryError::DetailResolutionFailure {
            id: candidate.id.clone(),
            reason,
        };

        let reply = self
            .transport
            .get(&detail_path(&candidate.id))
            .await
            .map_err(|err| failure(err.to_string()))?;

        if !reply.is_success() {
            return Err(failure(format!("HTTP status {}", reply.status)));
        }

        BodyRecord::from_detail(candidate, &reply.body)
    }
}
