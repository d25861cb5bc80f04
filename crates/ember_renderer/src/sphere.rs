//! Sphere surface, optionally moving linearly over the shutter window.

use crate::{
    hittable::{HitRecord, Hittable},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::f64::consts::PI;

/// A sphere, stationary or with a constant linear velocity for motion blur.
pub struct Sphere<M: Material> {
    center: Vec3,
    velocity: Vec3,
    radius: f64,
    material: M,
}

impl<M: Material> Sphere<M> {
    /// Create a stationary sphere.
    pub fn stationary(center: Vec3, radius: f64, material: M) -> Self {
        Self {
            center,
            velocity: Vec3::ZERO,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Create a sphere moving with constant velocity from `center` at t=0.
    pub fn moving(center: Vec3, velocity: Vec3, radius: f64, material: M) -> Self {
        Self {
            center,
            velocity,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center position at ray time t.
    fn center_at(&self, time: f64) -> Vec3 {
        self.center + time * self.velocity
    }

    /// UV coordinates for a point on the unit sphere.
    ///
    /// theta: angle down from +Y; phi: angle around Y from +X.
    fn sphere_uv(p: Vec3) -> (f64, f64) {
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl<M: Material + 'static> Hittable for Sphere<M> {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let center = self.center_at(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::sphere_uv(outward_normal);
        rec.material = &self.material;

        true
    }

    fn bounding_box(&self, time1: f64) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        let box0 = Aabb::from_points(self.center - rvec, self.center + rvec);
        if self.velocity == Vec3::ZERO {
            return box0;
        }
        let center1 = self.center_at(time1);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        Aabb::surrounding(&box0, &box1)
    }
}
