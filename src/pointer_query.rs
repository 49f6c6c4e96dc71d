//! # Pointer query
//!
//! Answers "which body is under the cursor" for tooltip display.
//!
//! A pointer position is turned into a world-space [`Ray`] by the [`Camera`], then intersected
//! with the bounding sphere of every scene node. The nearest hit wins; when it is an animated
//! body its [`BodyHandle`] is returned, when it is the sun (or nothing is hit) the answer is
//! `None`.
//!
//! Nothing is cached: bodies move on every tick, so a query is always evaluated against the
//! current positions.
use nalgebra::{Isometry3, Perspective3, Point3, Unit, Vector2, Vector3};

use crate::constants::{Meter, CAMERA_EYE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, EPS};
use crate::registry::{AnimatedBody, SceneNode};

/// Half-line starting at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

impl Ray {
    /// Ray from `origin` along `direction`, `None` if the direction is (near) zero.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        Unit::try_new(direction, EPS).map(|direction| Ray { origin, direction })
    }

    /// Ray from `origin` passing through `target`.
    pub fn through(origin: Point3<f64>, target: Point3<f64>) -> Option<Self> {
        Ray::new(origin, target - origin)
    }

    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }

    /// Distance along the ray to the first intersection with a sphere.
    ///
    /// Arguments
    /// ---------
    /// * `center`: sphere center
    /// * `radius`: sphere radius
    ///
    /// Return
    /// ------
    /// * `Some(t)` with `t >= 0` for the entry point, or the exit point when the origin is
    ///   inside the sphere
    /// * `None` if the sphere is missed or lies behind the origin
    pub fn intersect_sphere(&self, center: &Vector3<f64>, radius: f64) -> Option<f64> {
        let oc = self.origin.coords - center;
        let b = self.direction.dot(&oc);
        let c = oc.norm_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let near = -b - sqrt_disc;
        let far = -b + sqrt_disc;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

/// Perspective camera used to build pointer rays.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera {
            eye: Point3::from(CAMERA_EYE),
            target: Point3::origin(),
            fov_y_deg: CAMERA_FOV_DEG,
            aspect: 16.0 / 9.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl Camera {
    /// Same camera with another width / height ratio. A non-positive or non-finite ratio is
    /// ignored.
    pub fn with_aspect(mut self, aspect: f64) -> Self {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
        self
    }

    fn projection(&self) -> Perspective3<f64> {
        Perspective3::new(self.aspect, self.fov_y_deg.to_radians(), self.near, self.far)
    }

    fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(&self.eye, &self.target, &Vector3::y())
    }

    /// Normalized device coordinates of a pixel, `x` right and `y` up in `[-1, 1]`.
    pub fn ndc_from_pixels(x: f64, y: f64, width: f64, height: f64) -> Vector2<f64> {
        Vector2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
    }

    /// Normalized device coordinates of a world point.
    pub fn project(&self, point: &Point3<f64>) -> Vector2<f64> {
        let in_view = self.view().transform_point(point);
        let clip = self.projection().project_point(&in_view);
        Vector2::new(clip.x, clip.y)
    }

    /// World-space ray from the eye through a point given in normalized device coordinates.
    pub fn ray_through(&self, ndc: &Vector2<f64>) -> Option<Ray> {
        let on_near_plane = self
            .projection()
            .unproject_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let world = self.view().inverse_transform_point(&on_near_plane);
        Ray::through(self.eye, world)
    }
}

/// Display metadata of the body under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyHandle {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub max_estimated_diameter_meters: Meter,
    pub distance: f64,
}

impl BodyHandle {
    fn new(body: &AnimatedBody, distance: f64) -> Self {
        BodyHandle {
            index: body.index(),
            id: body.record().id.clone(),
            name: body.name().to_string(),
            max_estimated_diameter_meters: body.max_estimated_diameter_meters(),
            distance,
        }
    }
}

/// Nearest body hit by `ray`.
///
/// Every node takes part in the intersection, so the sun hides the bodies behind it.
pub fn query_at(nodes: &[SceneNode], ray: &Ray) -> Option<BodyHandle> {
    let (node, distance) = nodes
        .iter()
        .filter_map(|node| {
            ray.intersect_sphere(node.position(), node.radius())
                .map(|t| (node, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    node.as_animated()
        .map(|body| BodyHandle::new(body, distance))
}
