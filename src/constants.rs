//! # Constants for the NEO orrery
//!
//! This module centralizes the **cache policy**, the **remote catalog endpoints**, and the
//! **scene geometry** shared by the catalog client, the registry, the animator and the
//! pointer query.
//!
//! ## Overview
//!
//! - Cache time-to-live and the two logical cache keys
//! - NeoWs base URL and default credential
//! - Animation step and body/sun sphere radii
//! - Default camera parameters

// -------------------------------------------------------------------------------------------------
// Cache policy
// -------------------------------------------------------------------------------------------------

/// Validity window of a cached catalog snapshot, in milliseconds (one hour)
pub const CACHE_TTL_MS: u64 = 3_600_000;

/// Logical key of the serialized body list
pub const CACHE_PAYLOAD_KEY: &str = "neoData";

/// Logical key of the fetch timestamp (milliseconds since the Unix epoch)
pub const CACHE_TIME_KEY: &str = "neoDataTime";

/// Directory created under the user cache dir by the file store
pub const CACHE_DIR_NAME: &str = "neo_orrery_cache";

/// File name of the persisted snapshot
pub const CACHE_FILE_NAME: &str = "neo_data.json";

// -------------------------------------------------------------------------------------------------
// Remote catalog
// -------------------------------------------------------------------------------------------------

/// Base URL of the NASA NeoWs REST API
pub const NEOWS_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";

/// Shared low-quota credential accepted by api.nasa.gov
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Per-request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP status returned by the catalog when the quota is exhausted
pub const HTTP_TOO_MANY_REQUESTS: u16 = 429;

// -------------------------------------------------------------------------------------------------
// Scene
// -------------------------------------------------------------------------------------------------

/// Animation time added on every rendered frame
pub const FRAME_TIME_STEP: f64 = 0.01;

/// Radius of the sphere drawn for each body
pub const BODY_RADIUS: f64 = 0.5;

/// Radius of the sun sphere at the origin
pub const SUN_RADIUS: f64 = 1.0;

/// Sun color (0xRRGGBB)
pub const SUN_COLOR: u32 = 0xffff00;

/// Color increment between consecutive bodies
pub const COLOR_STEP: u64 = 0x111111;

/// Size of the 24-bit RGB space, colors wrap modulo this value
pub const RGB_SPACE: u64 = 0x1000000;

/// Numerical epsilon used for floating-point comparisons
pub const EPS: f64 = 1e-6;

// -------------------------------------------------------------------------------------------------
// Camera
// -------------------------------------------------------------------------------------------------

/// Vertical field of view in degrees
pub const CAMERA_FOV_DEG: f64 = 75.0;

/// Near clipping plane
pub const CAMERA_NEAR: f64 = 0.1;

/// Far clipping plane
pub const CAMERA_FAR: f64 = 1000.0;

/// Default eye position, looking at the origin
pub const CAMERA_EYE: [f64; 3] = [0.0, 10.0, 10.0];

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Wall-clock timestamp in milliseconds since the Unix epoch
pub type Millis = u64;

/// Length in meters
pub type Meter = f64;
