//! Triangle surface.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A single triangle with vertices `p0`, `p1`, `p2`.
///
/// Surface (u, v) are the barycentric weights of `p1` and `p2`.
pub struct Triangle<M: Material> {
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    normal: Vec3,
    d: f64,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Triangle<M> {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, material: M) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize();
        let d = normal.dot(p0);

        // Aabb::new pads axis-aligned triangles to non-zero thickness
        let min = p0.min(p1).min(p2);
        let max = p0.max(p1).max(p2);
        let bbox = Aabb::from_points(min, max);

        Self {
            p0,
            p1,
            p2,
            normal,
            d,
            material,
            bbox,
        }
    }
}

impl<M: Material + 'static> Hittable for Triangle<M> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction());

        // Ray parallel to the plane
        if denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        let p = ray.at(t);

        // Inside-edge tests
        let c0 = (self.p1 - self.p0).cross(p - self.p0);
        let c1 = (self.p2 - self.p1).cross(p - self.p1);
        let c2 = (self.p0 - self.p2).cross(p - self.p2);
        if self.normal.dot(c0) < 0.0 || self.normal.dot(c1) < 0.0 || self.normal.dot(c2) < 0.0 {
            return false;
        }

        // Barycentric coordinates for (u, v)
        let v0 = self.p1 - self.p0;
        let v1 = self.p2 - self.p0;
        let v2 = p - self.p0;
        let d00 = v0.dot(v0);
        let d01 = v0.dot(v1);
        let d11 = v1.dot(v1);
        let d20 = v2.dot(v0);
        let d21 = v2.dot(v1);
        let denom_bc = d00 * d11 - d01 * d01;
        let v = (d11 * d20 - d01 * d21) / denom_bc;
        let w = (d00 * d21 - d01 * d20) / denom_bc;
        let u = 1.0 - v - w;
        if u < 0.0 || v < 0.0 || w < 0.0 {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.u = v;
        rec.v = w;
        rec.material = &self.material;
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self, _time1: f64) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_triangle() -> Triangle<Lambertian> {
        Triangle::new(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Lambertian::new(Color::splat(0.5)),
        )
    }

    #[test]
    fn test_triangle_hit_inside() {
        let tri = unit_triangle();
        let ray = Ray::new_simple(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(tri.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 1.0).abs() < 1e-9);
        assert!((rec.u - 0.25).abs() < 1e-9);
        assert!((rec.v - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_triangle_miss_in_far_corner() {
        // Inside the unit square but outside the triangle's hypotenuse
        let tri = unit_triangle();
        let ray = Ray::new_simple(Vec3::new(0.75, 0.75, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(!tri.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
    }

    #[test]
    fn test_triangle_parallel_ray_misses() {
        let tri = unit_triangle();
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.25, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let mut rec = HitRecord::default();
        let mut rng = StdRng::seed_from_u64(0);

        assert!(!tri.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
    }
}
