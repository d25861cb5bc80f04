//! Constant-density participating medium.

use crate::sampling::gen_f64;
use crate::{
    hittable::{HitRecord, Hittable},
    Color, Isotropic, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A volume of constant density bounded by another surface.
///
/// A ray entering the boundary scatters after an exponentially distributed
/// free-flight distance; if that distance exceeds the chord through the
/// volume, the ray passes through unaffected.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    phase: Isotropic,
    neg_inv_density: f64,
}

impl ConstantMedium {
    pub fn new(boundary: Box<dyn Hittable>, density: f64, albedo: Color) -> Self {
        Self {
            boundary,
            phase: Isotropic::new(albedo),
            neg_inv_density: -1.0 / density,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Entry and exit points through the boundary, unrestricted first so
        // rays starting inside the volume still find the exit.
        let mut rec1 = HitRecord::default();
        let mut rec2 = HitRecord::default();

        if !self
            .boundary
            .hit(ray, Interval::UNIVERSE, &mut rec1, rng)
        {
            return false;
        }
        if !self.boundary.hit(
            ray,
            Interval::new(rec1.t + 0.0001, f64::INFINITY),
            &mut rec2,
            rng,
        ) {
            return false;
        }

        let mut t_enter = rec1.t.max(ray_t.min);
        let t_exit = rec2.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }
        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f64(rng).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Arbitrary: scatter direction does not depend on these
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = &self.phase;

        true
    }

    fn bounding_box(&self, time1: f64) -> Aabb {
        self.boundary.bounding_box(time1)
    }
}
