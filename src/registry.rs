//! # Body registry
//!
//! Derivation of the per-body animation parameters from a resolved catalog snapshot.
//!
//! For the record at index `i` (0-based, browse order):
//!
//! | parameter       | value                                   |
//! |-----------------|-----------------------------------------|
//! | orbit radius    | `2 i`                                   |
//! | angular speed   | `0.01 (i + 1)`                          |
//! | display color   | `(i + 1) * 0x111111 mod 0x1000000`      |
//! | seed position   | `(2 i, 2 sin i, 2 cos i)`               |
//!
//! The mapping only depends on the index, so the same snapshot always yields the same
//! scene. Colors wrap around the 24-bit RGB space: index 14 is `#ffffff`, index 15 wraps
//! to `#111110`.
//!
//! Scene members are tagged: [`SceneNode::Animated`] for catalog bodies,
//! [`SceneNode::Static`] for the sun.
use nalgebra::Vector3;

use crate::catalog::records::BodyRecord;
use crate::constants::{Meter, BODY_RADIUS, COLOR_STEP, RGB_SPACE, SUN_COLOR, SUN_RADIUS};

/// 24-bit RGB color, `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayColor(u32);

impl DisplayColor {
    /// Build a color, keeping only the low 24 bits.
    pub fn new(rgb: u32) -> Self {
        DisplayColor(rgb & 0x00ff_ffff)
    }

    /// Color of the body at `index`.
    pub fn for_index(index: usize) -> Self {
        let value = ((index as u64 + 1) * COLOR_STEP) % RGB_SPACE;
        DisplayColor(value as u32)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// CSS form, `#rrggbb`.
    pub fn hex(&self) -> String {
        format!("#{:06x}", self.0)
    }

    /// Normalized channels in `[0, 1]`.
    pub fn rgb(&self) -> [f32; 3] {
        let r = (self.0 >> 16) & 0xff;
        let g = (self.0 >> 8) & 0xff;
        let b = self.0 & 0xff;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

/// A catalog body and its animation state.
///
/// Only the orbital animator moves it; everything else reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedBody {
    record: BodyRecord,
    index: usize,
    position: Vector3<f64>,
    orbit_radius: f64,
    angular_speed: f64,
    display_color: DisplayColor,
}

impl AnimatedBody {
    pub fn from_record(index: usize, record: BodyRecord) -> Self {
        let i = index as f64;
        AnimatedBody {
            record,
            index,
            position: Vector3::new(i * 2.0, i.sin() * 2.0, i.cos() * 2.0),
            orbit_radius: i * 2.0,
            angular_speed: 0.01 * (i + 1.0),
            display_color: DisplayColor::for_index(index),
        }
    }

    pub fn record(&self) -> &BodyRecord {
        &self.record
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn max_estimated_diameter_meters(&self) -> Meter {
        self.record.max_estimated_diameter_meters
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn orbit_radius(&self) -> f64 {
        self.orbit_radius
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    pub fn display_color(&self) -> DisplayColor {
        self.display_color
    }

    pub fn radius(&self) -> f64 {
        BODY_RADIUS
    }

    /// Place the body on its circle in the X-Z plane at animation time `elapsed`.
    /// The Y seed is kept.
    pub(crate) fn orbit_to(&mut self, elapsed: f64) {
        let phase = elapsed * self.angular_speed;
        self.position.x = self.orbit_radius * phase.cos();
        self.position.z = self.orbit_radius * phase.sin();
    }
}

/// Non-animated scene member.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBody {
    pub position: Vector3<f64>,
    pub radius: f64,
    pub display_color: DisplayColor,
}

impl StaticBody {
    pub fn sun() -> Self {
        StaticBody {
            position: Vector3::zeros(),
            radius: SUN_RADIUS,
            display_color: DisplayColor::new(SUN_COLOR),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Static(StaticBody),
    Animated(AnimatedBody),
}

impl SceneNode {
    pub fn position(&self) -> &Vector3<f64> {
        match self {
            SceneNode::Static(body) => &body.position,
            SceneNode::Animated(body) => body.position(),
        }
    }

    pub fn radius(&self) -> f64 {
        match self {
            SceneNode::Static(body) => body.radius,
            SceneNode::Animated(body) => body.radius(),
        }
    }

    pub fn display_color(&self) -> DisplayColor {
        match self {
            SceneNode::Static(body) => body.display_color,
            SceneNode::Animated(body) => body.display_color(),
        }
    }

    pub fn as_animated(&self) -> Option<&AnimatedBody> {
        match self {
            SceneNode::Animated(body) => Some(body),
            SceneNode::Static(_) => None,
        }
    }

    pub fn as_animated_mut(&mut self) -> Option<&mut AnimatedBody> {
        match self {
            SceneNode::Animated(body) => Some(body),
            SceneNode::Static(_) => None,
        }
    }
}

/// Derive one [`AnimatedBody`] per record, in order.
pub fn build(records: impl IntoIterator<Item = BodyRecord>) -> Vec<AnimatedBody> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| AnimatedBody::from_record(index, record))
        .collect()
}
