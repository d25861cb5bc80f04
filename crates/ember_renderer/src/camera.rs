//! Camera for ray generation.

use crate::sampling::{gen_range, random_in_unit_disk};
use crate::Ray;
use ember_math::Vec3;
use rand::RngCore;

/// Camera generating rays from normalized viewport coordinates.
///
/// `get_ray(u, v)` takes `u, v` in `[0, 1]` with u=0 the left edge and v=0
/// the bottom edge. Each ray draws a random shutter time (motion blur) and,
/// with a non-zero defocus angle, a random lens point (depth of field).
#[derive(Clone)]
pub struct Camera {
    // Positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f64,          // Vertical field of view in degrees
    aspect_ratio: f64,  // Viewport width over height
    defocus_angle: f64, // Variation angle of rays through each pixel
    focus_dist: f64,    // Distance from camera to plane of perfect focus

    // Shutter interval for motion blur
    time0: f64,
    time1: f64,

    // Cached computed values (set by initialize())
    center: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 1.0,
            center: Vec3::ZERO,
            lower_left: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the viewport aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set the shutter interval for motion blur.
    pub fn with_shutter(mut self, time0: f64, time1: f64) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// End of the shutter interval; BVH boxes are widened up to this time.
    pub fn shutter_close(&self) -> f64 {
        self.time1
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width = viewport_height * self.aspect_ratio;

        // Camera basis vectors
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        self.horizontal = viewport_width * u;
        self.vertical = viewport_height * v;
        self.lower_left =
            self.center - self.focus_dist * w - self.horizontal / 2.0 - self.vertical / 2.0;

        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = u * defocus_radius;
        self.defocus_disk_v = v * defocus_radius;
    }

    /// Generate a ray through normalized viewport coordinates (u, v).
    pub fn get_ray(&self, u: f64, v: f64, rng: &mut dyn RngCore) -> Ray {
        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let viewport_point = self.lower_left + u * self.horizontal + v * self.vertical;
        let ray_direction = (viewport_point - ray_origin).normalize();
        let ray_time = gen_range(rng, self.time0, self.time1);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_center_ray_points_forward() {
        let mut camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect_ratio(1.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // The exact viewport center maps straight down the view axis
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_camera_uv_orientation() {
        let mut camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_aspect_ratio(1.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // u=0 is the left edge (-x), v=0 the bottom edge (-y)
        let ray = camera.get_ray(0.0, 0.0, &mut rng);
        assert!(ray.direction().x < 0.0);
        assert!(ray.direction().y < 0.0);

        let ray = camera.get_ray(1.0, 1.0, &mut rng);
        assert!(ray.direction().x > 0.0);
        assert!(ray.direction().y > 0.0);
    }

    #[test]
    fn test_camera_ray_time_in_shutter() {
        let mut camera = Camera::new().with_shutter(0.25, 0.75);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!((0.25..0.75).contains(&ray.time()));
        }
    }

    #[test]
    fn test_camera_defocus_origin_on_lens() {
        let mut camera = Camera::new()
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 2.0, 3.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);
        let defocus_radius = 3.0 * (1.0_f64).to_radians().tan();

        for _ in 0..50 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            // Origin jitters within the lens disk around the center
            assert!(ray.origin().length() <= defocus_radius + 1e-12);
            assert_eq!(ray.origin().z, 0.0);
        }
    }
}
