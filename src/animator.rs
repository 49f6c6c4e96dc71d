//! # Orbital animator
//!
//! Uniform circular motion of every animated body in the X-Z plane.
//!
//! The animator owns a single time cursor, `elapsed`, advanced by the step handed to
//! [`OrbitalAnimator::tick`]. The render loop passes the fixed
//! [`FRAME_TIME_STEP`](crate::constants::FRAME_TIME_STEP) on each frame, so the animation speed
//! follows the frame rate and not the wall clock.
//!
//! After every tick each body satisfies
//!
//! ```text
//! x = r cos(elapsed ω)      z = r sin(elapsed ω)      y = seed
//! ```
//!
//! hence `sqrt(x² + z²) == r`.
use tracing::warn;

use crate::registry::AnimatedBody;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrbitalAnimator {
    elapsed: f64,
}

impl OrbitalAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Rewind the time cursor, used when a new snapshot replaces the bodies.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance the time cursor by `dt` and move every body onto its circle.
    ///
    /// Arguments
    /// ---------
    /// * `bodies`: the bodies to move, mutated in place
    /// * `dt`: animation time to add; a negative or non-finite step is ignored so that
    ///   `elapsed` stays monotonic
    pub fn tick<'a, I>(&mut self, bodies: I, dt: f64)
    where
        I: IntoIterator<Item = &'a mut AnimatedBody>,
    {
        if dt.is_finite() && dt >= 0.0 {
            self.elapsed += dt;
        } else {
            warn!(dt, "Ignoring invalid animation step");
        }

        for body in bodies {
            body.orbit_to(self.elapsed);
        }
    }
}
