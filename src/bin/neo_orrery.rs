//! Headless NEO orrery driver.
//!
//! Resolves the catalog (cache first), builds the scene, runs a number of animation frames and
//! prints the legend plus what sits under the center of the viewport.

use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use itertools::Itertools;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neo_orrery::cache_store::{CacheStore, FileCacheStore};
use neo_orrery::catalog::CatalogClient;
use neo_orrery::constants::{DEMO_API_KEY, NEOWS_BASE_URL, REQUEST_TIMEOUT_SECS};
use neo_orrery::display::tooltip_text;
use neo_orrery::env_state::{OrreryConfig, OrreryEnv};
use neo_orrery::orrery::OrreryState;
use neo_orrery::pointer_query::Camera;
use neo_orrery::OrreryError;

/// Animated near-Earth object orrery, headless mode.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of animation frames to run
    #[arg(default_value = "600")]
    frames: u32,

    /// Drop the cached catalog before resolving
    #[arg(long)]
    refresh: bool,

    /// NASA API key
    #[arg(long, env = "NASA_API_KEY", default_value = DEMO_API_KEY, hide_env_values = true)]
    api_key: String,

    /// Root of the NeoWs REST API
    #[arg(long, env = "NEO_ORRERY_BASE_URL", default_value = NEOWS_BASE_URL)]
    base_url: String,

    /// Location of the cached catalog (defaults to the user cache dir)
    #[arg(long, env = "NEO_ORRERY_CACHE")]
    cache: Option<Utf8PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout: u64,

    /// Viewport width in pixels
    #[arg(long, default_value = "1280")]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value = "720")]
    height: f64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn config(&self) -> OrreryConfig {
        let config = OrreryConfig::default()
            .with_api_key(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_request_timeout(Duration::from_secs(self.timeout));
        match &self.cache {
            Some(path) => config.with_cache_path(path.clone()),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), OrreryError> {
    let args = Cli::parse();

    let filter = if args.debug {
        "debug,neo_orrery=trace"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.config();
    let cache = match &config.cache_path {
        Some(path) => FileCacheStore::new(path.clone()),
        None => FileCacheStore::in_user_cache_dir()?,
    };
    if args.refresh {
        cache.clear()?;
        info!(path = %cache.path(), "Cached catalog dropped");
    }

    let client = CatalogClient::new(OrreryEnv::new(&config)?, cache);
    let camera = Camera::default().with_aspect(args.width / args.height);
    let mut orrery = OrreryState::load(&client, camera)
        .await
        .with_frame_step(config.frame_step);

    if orrery.body_count() == 0 {
        warn!("No NEO resolved, only the sun is shown");
    } else {
        info!(
            "Bodies: {}",
            orrery.bodies().map(|body| body.name()).join(", ")
        );
    }

    for _ in 0..args.frames {
        orrery.tick();
    }
    info!(
        frames = args.frames,
        elapsed = orrery.elapsed(),
        "Animation advanced"
    );

    println!("{}", orrery.legend());

    match orrery.query_at_pixels(args.width / 2.0, args.height / 2.0, args.width, args.height) {
        Some(body) => println!("Under the pointer: {}", tooltip_text(&body)),
        None => println!("Under the pointer: nothing"),
    }

    Ok(())
}
