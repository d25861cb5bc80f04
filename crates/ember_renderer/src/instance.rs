//! Rigid-transform instancing of surfaces.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use ember_math::{Aabb, DAffine3, DMat3, Interval, Vec3};
use rand::RngCore;

/// A surface placed into the scene under an affine transform, optionally
/// translating linearly over the shutter window.
///
/// Rays are pulled into the instance's local space; hits are pushed back out.
/// The wrapped surface itself is shared-nothing and untouched.
pub struct Instance {
    object: Box<dyn Hittable>,
    transform: DAffine3,
    inverse: DAffine3,
    /// Inverse-transpose of the linear part, for normals.
    normal_matrix: DMat3,
    velocity: Vec3,
}

impl Instance {
    pub fn new(object: Box<dyn Hittable>, transform: DAffine3) -> Self {
        Self {
            object,
            transform,
            inverse: transform.inverse(),
            normal_matrix: transform.matrix3.inverse().transpose(),
            velocity: Vec3::ZERO,
        }
    }

    /// Instance translating with constant velocity from its t=0 placement.
    pub fn with_motion(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Transform a box by taking the bounds of its eight transformed corners.
    fn transform_aabb(bbox: &Aabb, m: &DAffine3) -> Aabb {
        let mut min = Vec3::INFINITY;
        let mut max = Vec3::NEG_INFINITY;

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { bbox.x.min } else { bbox.x.max },
                if i & 2 == 0 { bbox.y.min } else { bbox.y.max },
                if i & 4 == 0 { bbox.z.min } else { bbox.z.max },
            );
            let q = m.transform_point3(corner);
            min = min.min(q);
            max = max.max(q);
        }

        Aabb::from_points(min, max)
    }
}

impl Hittable for Instance {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let offset = ray.time() * self.velocity;
        let local_origin = self.inverse.transform_point3(ray.origin() - offset);
        let local_direction = self.inverse.transform_vector3(ray.direction());
        let local_ray = Ray::new(local_origin, local_direction, ray.time());

        if !self.object.hit(&local_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p = self.transform.transform_point3(rec.p) + offset;
        let world_normal = (self.normal_matrix * rec.normal).normalize();
        rec.set_face_normal(ray, world_normal);

        true
    }

    fn bounding_box(&self, time1: f64) -> Aabb {
        let local = self.object.bounding_box(time1);
        let box0 = Self::transform_aabb(&local, &self.transform);
        if self.velocity == Vec3::ZERO {
            return box0;
        }
        let mut m1 = self.transform;
        m1.translation += time1 * self.velocity;
        let box1 = Self::transform_aabb(&local, &m1);
        Aabb::surrounding(&box0, &box1)
    }
}
