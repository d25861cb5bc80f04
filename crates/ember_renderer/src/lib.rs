//! Ember - CPU Monte Carlo path tracing core.
//!
//! Builds a read-only BVH over a scene of surfaces, then estimates per-pixel
//! radiance with stratified multi-sampling, distributing row blocks across
//! rayon workers. Output is an interleaved 8-bit RGB buffer.

mod bvh;
mod camera;
mod hittable;
mod instance;
mod material;
mod medium;
mod perlin;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod triangle;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::Instance;
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, Scatter,
};
pub use medium::ConstantMedium;
pub use perlin::Perlin;
pub use quad::Quad;
pub use renderer::{ray_color, render, render_pixel, to_rgb8, RenderConfig, RenderError};
pub use sphere::Sphere;
pub use texture::{Checker, NoiseTexture, SolidColor, Texture};
pub use triangle::Triangle;

/// Re-export math types from ember_math
pub use ember_math::{Aabb, Interval, Ray, Vec3};
