//! Planar quadrilateral surface.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// A parallelogram spanned by edge vectors `u` and `v` from corner `q`.
pub struct Quad<M: Material> {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    normal: Vec3,
    w: Vec3,
    d: f64,
    material: M,
    bbox: Aabb,
}

impl<M: Material> Quad<M> {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: M) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        // Basis projector for planar alpha/beta coordinates
        let w = n / n.length_squared();

        // Box over both diagonals; Aabb::new pads the flat axis
        let bbox_diag1 = Aabb::from_points(q, q + u + v);
        let bbox_diag2 = Aabb::from_points(q + u, q + v);
        let bbox = Aabb::surrounding(&bbox_diag1, &bbox_diag2);

        Self {
            q,
            u,
            v,
            normal,
            w,
            d,
            material,
            bbox,
        }
    }
}

impl<M: Material + 'static> Hittable for Quad<M> {
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

        // Planar coordinates of the hit point
        let p = ray.at(t);
        let planar_hit = p - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return false;
        }

        rec.t = t;
        rec.p = p;
        rec.u = alpha;
        rec.v = beta;
        rec.material = &self.material;
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self, _time1: f64) -> Aabb {
        self.bbox
    }
}
