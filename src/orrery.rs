//! # Orrery: scene, animation clock and pointer queries
//!
//! This module defines the [`OrreryState`](crate::orrery::OrreryState) struct, the façade owned
//! by the composition root that wires together:
//!
//! 1. **Scene** — the sun ([`StaticBody`]) followed by one [`AnimatedBody`] per resolved
//!    [`BodyRecord`], in catalog order.
//! 2. **Orbital animator** — the time cursor advanced once per rendered frame.
//! 3. **Camera** — used to turn pointer coordinates into world-space rays.
//!
//! A renderer holds one `OrreryState`, calls [`tick`](crate::orrery::OrreryState::tick) from
//! its frame callback, reads positions and colors from
//! [`nodes`](crate::orrery::OrreryState::nodes), and calls
//! [`query_at_pixels`](crate::orrery::OrreryState::query_at_pixels) from its pointer-move
//! handler.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! # async fn run() -> Result<(), neo_orrery::orrery_errors::OrreryError> {
//! use neo_orrery::cache_store::FileCacheStore;
//! use neo_orrery::catalog::CatalogClient;
//! use neo_orrery::env_state::{OrreryConfig, OrreryEnv};
//! use neo_orrery::orrery::OrreryState;
//! use neo_orrery::pointer_query::Camera;
//!
//! let config = OrreryConfig::default();
//! let client = CatalogClient::new(OrreryEnv::new(&config)?, FileCacheStore::in_user_cache_dir()?);
//!
//! let mut orrery = OrreryState::load(&client, Camera::default()).await;
//! orrery.tick();
//! if let Some(body) = orrery.query_at_pixels(640.0, 360.0, 1280.0, 720.0) {
//!     println!("{}", neo_orrery::display::tooltip_text(&body));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Notes
//!
//! - An empty catalog is a valid state: the scene then only holds the sun and the legend is
//!   empty.
//! - A new snapshot replaces every body at once through
//!   [`replace_bodies`](crate::orrery::OrreryState::replace_bodies); there is no incremental
//!   add or remove.

use nalgebra::Vector2;
use tracing::info;

use crate::animator::OrbitalAnimator;
use crate::cache_store::CacheStore;
use crate::catalog::client::CatalogClient;
use crate::catalog::records::BodyRecord;
use crate::constants::FRAME_TIME_STEP;
use crate::display::Legend;
use crate::env_state::{CatalogTransport, Clock};
use crate::pointer_query::{query_at, BodyHandle, Camera, Ray};
use crate::registry::{build, AnimatedBody, SceneNode, StaticBody};

#[derive(Debug, Clone)]
pub struct OrreryState {
    nodes: Vec<SceneNode>,
    animator: OrbitalAnimator,
    camera: Camera,
    frame_step: f64,
}

impl OrreryState {
    /// Construct a new [`OrreryState`] from a resolved catalog.
    ///
    /// Arguments
    /// -----------------
    /// * `records`: The resolved bodies, in catalog order; the order fixes every animation
    ///   parameter.
    /// * `camera`: The camera used for pointer queries.
    ///
    /// Return
    /// ----------
    /// * A scene holding the sun and one animated body per record, at their seed positions.
    pub fn new(records: Vec<BodyRecord>, camera: Camera) -> Self {
        let mut orrery = OrreryState {
            nodes: Vec::with_capacity(records.len() + 1),
            animator: OrbitalAnimator::new(),
            camera,
            frame_step: FRAME_TIME_STEP,
        };
        orrery.replace_bodies(records);
        orrery
    }

    /// Resolve the catalog through `client` and build the scene from it.
    ///
    /// Never fails: a degraded catalog yields a scene with the sun only.
    pub async fn load<T, S, C>(client: &CatalogClient<T, S, C>, camera: Camera) -> Self
    where
        T: CatalogTransport,
        S: CacheStore,
        C: Clock,
    {
        let records = client.resolve_bodies().await;
        OrreryState::new(records, camera)
    }

    pub fn with_frame_step(mut self, frame_step: f64) -> Self {
        self.frame_step = frame_step;
        self
    }

    /// Swap in a new snapshot: every body is rebuilt and the animation clock restarts.
    pub fn replace_bodies(&mut self, records: Vec<BodyRecord>) {
        self.nodes.clear();
        self.nodes.push(SceneNode::Static(StaticBody::sun()));
        self.nodes
            .extend(build(records).into_iter().map(SceneNode::Animated));
        self.animator.reset();

        info!(bodies = self.body_count(), "Orrery scene built");
    }

    /// Advance the animation by one frame.
    pub fn tick(&mut self) {
        self.tick_by(self.frame_step);
    }

    /// Advance the animation by an explicit step.
    pub fn tick_by(&mut self, dt: f64) {
        let bodies = self.nodes.iter_mut().filter_map(SceneNode::as_animated_mut);
        self.animator.tick(bodies, dt);
    }

    pub fn elapsed(&self) -> f64 {
        self.animator.elapsed()
    }

    pub fn frame_step(&self) -> f64 {
        self.frame_step
    }

    /// Every scene node, sun first.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Animated bodies, in catalog order.
    pub fn bodies(&self) -> impl Iterator<Item = &AnimatedBody> {
        self.nodes.iter().filter_map(SceneNode::as_animated)
    }

    pub fn body_count(&self) -> usize {
        self.bodies().count()
    }

    pub fn get_camera(&self) -> &Camera {
        &self.camera
    }

    /// Keep the pointer rays consistent with a resized viewport.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.camera.aspect = width / height;
        }
    }

    /// Body hit first by `ray`, if any.
    pub fn query_at(&self, ray: &Ray) -> Option<BodyHandle> {
        query_at(&self.nodes, ray)
    }

    /// Body under the pointer at pixel `(x, y)` of a `width` x `height` viewport.
    pub fn query_at_pixels(&self, x: f64, y: f64, width: f64, height: f64) -> Option<BodyHandle> {
        let ndc = Camera::ndc_from_pixels(x, y, width, height);
        self.query_at_ndc(&ndc)
    }

    /// Body under the pointer given in normalized device coordinates.
    pub fn query_at_ndc(&self, ndc: &Vector2<f64>) -> Option<BodyHandle> {
        let ray = self.camera.ray_through(ndc)?;
        self.query_at(&ray)
    }

    pub fn legend(&self) -> Legend {
        Legend::from_bodies(self.bodies())
    }
}
