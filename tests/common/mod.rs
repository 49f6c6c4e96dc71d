#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use approx::assert_relative_eq;
use async_trait::async_trait;
use tokio::sync::Barrier;
use neo_orrery::env_state::{CatalogReply, CatalogTransport};
use neo_orrery::registry::AnimatedBody;
use neo_orrery::{BodyRecord, OrreryError};

/// In-process catalog: canned replies per path, and a log of every request.
#[derive(Default)]
pub struct FakeCatalog {
    replies: HashMap<String, Result<CatalogReply, String>>,
    requests: Mutex<Vec<String>>,
}

impl FakeCatalog {
    /// Browse listing with one candidate per id and a successful detail for each.
    pub fn with_bodies(ids: &[&str]) -> Self {
        let mut catalog = FakeCatalog::default().browse(200, &browse_body(ids));
        for (i, id) in ids.iter().enumerate() {
            catalog = catalog.detail(id, 200, &detail_body(id, 10.0 * (i + 1) as f64));
        }
        catalog
    }

    pub fn browse(self, status: u16, body: &str) -> Self {
        self.route("neo/browse", status, body)
    }

    pub fn detail(self, id: &str, status: u16, body: &str) -> Self {
        self.route(&format!("neo/{id}"), status, body)
    }

    /// The request for `id` fails before any status is received (timeout, reset...).
    pub fn detail_network_error(mut self, id: &str) -> Self {
        self.replies
            .insert(format!("neo/{id}"), Err("operation timed out".into()));
        self
    }

    fn route(mut self, path: &str, status: u16, body: &str) -> Self {
        self.replies
            .insert(path.to_string(), Ok(CatalogReply::new(status, body)));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn browse_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|path| path.as_str() == "neo/browse")
            .count()
    }
}

#[async_trait]
impl CatalogTransport for FakeCatalog {
    async fn get(&self, path: &str) -> Result<CatalogReply, OrreryError> {
        self.requests.lock().unwrap().push(path.to_string());
        match self.replies.get(path) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(reason)) => Err(OrreryError::CatalogUnavailable(reason.clone())),
            None => Ok(CatalogReply::new(404, "")),
        }
    }
}

/// [`FakeCatalog`] whose detail replies are held back until `expected` detail requests are
/// outstanding at the same time. A client issuing details one after the other never gets past
/// the first one.
pub struct GatedCatalog {
    inner: FakeCatalog,
    gate: Barrier,
    slow: HashSet<String>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl GatedCatalog {
    pub fn new(inner: FakeCatalog, expected: usize) -> Self {
        GatedCatalog {
            inner,
            gate: Barrier::new(expected),
            slow: HashSet::new(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Once released, the detail of `id` still takes a while to answer.
    pub fn slow(mut self, id: &str) -> Self {
        self.slow.insert(format!("neo/{id}"));
        self
    }

    /// Highest number of detail requests seen in flight together.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.requests()
    }
}

#[async_trait]
impl CatalogTransport for GatedCatalog {
    async fn get(&self, path: &str) -> Result<CatalogReply, OrreryError> {
        if path == "neo/browse" {
            return self.inner.get(path).await;
        }

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(in_flight, Ordering::SeqCst);
        self.gate.wait().await;
        if self.slow.contains(path) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let reply = self.inner.get(path).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply
    }
}

pub fn browse_body(ids: &[&str]) -> String {
    let objects: Vec<_> = ids
        .iter()
        .map(|id| serde_json::json!({ "id": id, "name": format!("({id})") }))
        .collect();
    serde_json::json!({
        "links": { "next": "https://api.nasa.gov/neo/rest/v1/neo/browse?page=1&size=20" },
        "page": { "size": 20, "total_elements": ids.len(), "total_pages": 1, "number": 0 },
        "near_earth_objects": objects,
    })
    .to_string()
}

pub fn detail_body(id: &str, max_meters: f64) -> String {
    serde_json::json!({
        "id": id,
        "neo_reference_id": id,
        "name": format!("NEO {id}"),
        "absolute_magnitude_h": 21.2,
        "estimated_diameter": {
            "kilometers": {
                "estimated_diameter_min": max_meters / 2000.0,
                "estimated_diameter_max": max_meters / 1000.0
            },
            "meters": {
                "estimated_diameter_min": max_meters / 2.0,
                "estimated_diameter_max": max_meters
            }
        },
        "is_potentially_hazardous_asteroid": false
    })
    .to_string()
}

pub fn record(id: &str, max_meters: f64) -> BodyRecord {
    BodyRecord::new(id, format!("NEO {id}"), max_meters).unwrap()
}

pub fn assert_on_orbit(body: &AnimatedBody, epsilon: f64) {
    let p = body.position();
    assert_relative_eq!(
        (p.x * p.x + p.z * p.z).sqrt(),
        body.orbit_radius(),
        epsilon = epsilon
    );
}
