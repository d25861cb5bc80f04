// Re-export glam for convenience
pub use glam::{DAffine3, DMat3, DQuat};

/// All geometry runs in f64; intersection tolerances are tighter than f32
/// can represent.
pub type Vec3 = glam::DVec3;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
