//! Perspective camera used to build picking rays
//!
//! Only the parts of a camera that scene queries need: placement,
//! orientation and the perspective frustum. No projection matrices.

use crate::foundation::math::{utils, Vec3};
use crate::query::Ray;

/// Perspective camera
///
/// Uses a right-handed Y-up world. The camera looks from `position` towards
/// `target`; `up` is a hint used to derive the camera's own up axis.
#[derive(Debug, Clone)]
pub struct Camera {
    name: String,

    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector hint (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to the near clipping plane
    pub near: f32,

    /// Distance to the far clipping plane
    pub far: f32,
}

impl Camera {
    /// Camera at the origin looking down -Z with a 45 degree field of view
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::zeros(),
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::y(),
            fov: utils::deg_to_rad(45.0),
            aspect: 4.0 / 3.0,
            near: 100.0,
            far: 100_000.0,
        }
    }

    /// Camera name, unique within its scene
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Move the camera, keeping its viewing direction
    pub fn set_position(&mut self, position: Vec3) {
        let direction = self.target - self.position;
        self.position = position;
        self.target = position + direction;
    }

    /// Aim the camera at a world-space point
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).magnitude_squared() <= f32::EPSILON {
            log::warn!("Camera '{}' cannot look at its own position {:?}", self.name, target);
            return;
        }
        self.target = target;
    }

    /// Builder: set the perspective parameters (field of view in degrees)
    pub fn with_perspective(mut self, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        self.fov = utils::deg_to_rad(fov_degrees);
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Camera basis `(right, up, forward)`
    ///
    /// Falls back to +Z as the up hint when looking straight along it.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let mut right = forward.cross(&self.up);
        if right.magnitude_squared() <= f32::EPSILON {
            right = forward.cross(&Vec3::z());
        }
        let right = right.normalize();
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// Ray from the near plane through a viewport point
    ///
    /// `x` and `y` are in `[0, 1]` with `(0, 0)` at the top left; `(0.5, 0.5)`
    /// is the centre of the view.
    pub fn camera_to_viewport_ray(&self, x: f32, y: f32) -> Ray {
        let (right, up, forward) = self.basis();
        let tan_half_fov = (self.fov * 0.5).tan();

        let nx = 2.0 * x - 1.0;
        let ny = 1.0 - 2.0 * y;

        // Direction scaled so its forward component is 1
        let direction = forward + right * (nx * tan_half_fov * self.aspect) + up * (ny * tan_half_fov);
        let origin = self.position + direction * self.near;

        Ray::new(origin, direction.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture_camera() -> Camera {
        let mut camera = Camera::new("Camera");
        camera.set_position(Vec3::new(0.0, 0.0, 500.0));
        camera.look_at(Vec3::zeros());
        camera
    }

    #[test]
    fn test_defaults() {
        let camera = Camera::new("cam");
        assert_relative_eq!(camera.fov, std::f32::consts::FRAC_PI_4);
        assert_eq!(camera.near, 100.0);
        assert_eq!(camera.far, 100_000.0);
    }

    #[test]
    fn test_centre_ray_starts_on_near_plane() {
        let ray = fixture_camera().camera_to_viewport_ray(0.5, 0.5);
        assert_relative_eq!(ray.origin, Vec3::new(0.0, 0.0, 400.0), epsilon = 1e-4);
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_corner_rays_point_outwards() {
        let camera = fixture_camera();
        let top_left = camera.camera_to_viewport_ray(0.0, 0.0);
        assert!(top_left.direction.x < 0.0);
        assert!(top_left.direction.y > 0.0);
        assert!(top_left.direction.z < 0.0);

        let bottom_right = camera.camera_to_viewport_ray(1.0, 1.0);
        assert!(bottom_right.direction.x > 0.0);
        assert!(bottom_right.direction.y < 0.0);
    }

    #[test]
    fn test_look_at_self_is_ignored() {
        let mut camera = fixture_camera();
        camera.look_at(Vec3::new(0.0, 0.0, 500.0));
        assert_eq!(camera.target, Vec3::zeros());
    }

    #[test]
    fn test_looking_straight_down_uses_fallback_up() {
        let mut camera = Camera::new("top");
        camera.set_position(Vec3::new(0.0, 1000.0, 0.0));
        camera.look_at(Vec3::zeros());
        let ray = camera.camera_to_viewport_ray(0.5, 0.5);
        assert_relative_eq!(ray.direction, Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
        assert!(ray.is_valid());
    }
}
