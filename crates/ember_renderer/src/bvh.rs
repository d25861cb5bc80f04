//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Median-split binary tree over the scene's surfaces. Built once before
//! rendering starts, then read-only and shared across all render workers.

use crate::{HitRecord, Hittable, Ray};
use ember_math::{Aabb, Interval};
use rand::RngCore;

/// BVH node - a branch with two children, a leaf holding one surface, or
/// empty for a zero-surface scene.
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        object: Box<dyn Hittable>,
        bbox: Aabb,
    },
    Empty,
}

impl BvhNode {
    /// Build a BVH over the given surfaces, with boxes evaluated over the
    /// render's full `[0, time1]` shutter window.
    ///
    /// Consumes and reorders the surface list; surface content is untouched.
    pub fn new(objects: Vec<Box<dyn Hittable>>, time1: f64) -> Self {
        let n = objects.len();
        let root = Self::build(objects, time1);
        log::debug!("built BVH over {n} surfaces");
        root
    }

    /// Recursive median-split construction: union box of the range, sort by
    /// per-surface box minimum on its longest axis, split at the midpoint.
    ///
    /// O(n log^2 n) from one sort per level; acceptable for a build that
    /// happens once per static scene snapshot.
    fn build(mut objects: Vec<Box<dyn Hittable>>, time1: f64) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        if objects.len() == 1 {
            let object = objects.remove(0);
            let bbox = object.bounding_box(time1);
            return BvhNode::Leaf { object, bbox };
        }

        let bounds = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            Aabb::surrounding(&acc, &o.bounding_box(time1))
        });
        let axis = bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_min = a.bounding_box(time1).axis_interval(axis).min;
            let b_min = b.bounding_box(time1).axis_interval(axis).min;
            a_min
                .partial_cmp(&b_min)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right_objects = objects.split_off(objects.len() / 2);
        let left = Self::build(objects, time1);
        let right = Self::build(right_objects, time1);

        let bbox = Aabb::surrounding(&left.bbox(), &right.bbox());
        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }
                object.hit(ray, ray_t, rec, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                // Left first, then right with the upper bound shrunk to the
                // left hit. Deliberately not near-child-first: the order is
                // correctness-neutral and keeps traversal deterministic.
                let hit_left = left.hit(ray, ray_t, rec, rng);

                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rec, rng);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self, _time1: f64) -> Aabb {
        self.bbox()
    }
}
