//! Core path tracing renderer.
//!
//! Recursive radiance estimation plus the stratified, row-parallel sampling
//! driver that reduces many samples per pixel into an 8-bit RGB buffer.

use crate::sampling::gen_f64;
use crate::{Camera, Color, HitRecord, Hittable, Ray};
use ember_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use thiserror::Error;

/// Rows are handed to workers in fixed blocks of this many rows; blocks map
/// to disjoint slices of the output buffer, so workers never share memory.
pub const ROW_BLOCK: u32 = 8;

/// Minimum positive ray t, so a scattered ray cannot re-hit the surface it
/// just left ("shadow acne").
const T_MIN: f64 = 0.001;

/// Errors from render configuration validation.
///
/// The geometric hot path itself never fails; misses and absorption are
/// ordinary boolean results.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("samples_per_pixel must be non-zero")]
    NoSamples,
    #[error("gamma exponent must be finite and positive, got {0}")]
    InvalidGamma(f64),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Samples per pixel; decomposed into a k*k stratified grid plus
    /// unstratified leftovers, k = floor(sqrt(samples))
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Gamma exponent, applied directly to each channel. Pass the
    /// reciprocal (e.g. 1/2.2) for standard display compression.
    pub gamma: f64,
    /// Background radiance when a ray escapes the scene
    pub background: Color,
    /// Base seed; each row block derives its own generator from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 450,
            samples_per_pixel: 100,
            max_depth: 50,
            gamma: 0.5,
            background: Color::ZERO,
            seed: 0,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(RenderError::InvalidGamma(self.gamma));
        }
        Ok(())
    }
}

/// Estimate the radiance arriving along a ray.
///
/// Recursion ends at the depth limit (hard cutoff to black), on escape
/// (background) or on absorption (emission only).
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !world.hit(ray, Interval::new(T_MIN, f64::INFINITY), &mut rec, rng) {
        return config.background;
    }

    let emitted = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(scatter) => {
            let incoming = ray_color(&scatter.ray, world, depth - 1, config, rng);
            emitted + scatter.attenuation * incoming
        }
        None => emitted,
    }
}

/// Render one pixel: stratified multi-sampling reduced to the mean radiance.
///
/// `samples_per_pixel` is split into a k*k jittered grid, k = floor(sqrt(S)),
/// plus S - k*k plain jittered leftovers.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    i: u32,
    j: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let spp = config.samples_per_pixel;
    let k = (spp as f64).sqrt().floor() as u32;

    let mut sum = Color::ZERO;
    let sample = |du: f64, dv: f64, rng: &mut dyn RngCore| {
        let u = (i as f64 + 0.5 + du) / config.width as f64;
        // v=0 is the bottom of the viewport but row 0 is the top image row
        let v = 1.0 - (j as f64 + 0.5 + dv) / config.height as f64;
        let ray = camera.get_ray(u, v, rng);
        ray_color(&ray, world, config.max_depth, config, rng)
    };

    for si in 0..k {
        for sj in 0..k {
            let du = (si as f64 + gen_f64(rng)) / k as f64 - 0.5;
            let dv = (sj as f64 + gen_f64(rng)) / k as f64 - 0.5;
            sum += sample(du, dv, &mut *rng);
        }
    }
    for _ in (k * k)..spp {
        let du = gen_f64(rng) - 0.5;
        let dv = gen_f64(rng) - 0.5;
        sum += sample(du, dv, &mut *rng);
    }

    sum / spp as f64
}

/// Convert linear radiance to display RGB: gamma exponent, clamp, quantize.
pub fn to_rgb8(color: Color, gamma: f64) -> [u8; 3] {
    let channel = |c: f64| {
        let c = if c > 0.0 { c.powf(gamma) } else { 0.0 };
        (255.999 * c.clamp(0.0, 1.0)) as u8
    };
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Render the scene into an interleaved, row-major, top-to-bottom RGB8
/// buffer of `width * height * 3` bytes.
///
/// Row blocks are spread across rayon workers; each block owns a disjoint
/// buffer slice and an independent generator seeded from `config.seed`, so
/// renders are reproducible for a fixed seed and worker count has no effect
/// on the result. `progress` is invoked once per completed row.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    progress: Option<&(dyn Fn(u32) + Sync)>,
) -> Result<Vec<u8>, RenderError> {
    config.validate()?;

    let row_bytes = config.width as usize * 3;
    let mut buffer = vec![0u8; row_bytes * config.height as usize];

    log::info!(
        "rendering {}x{} at {} spp, depth {}",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();

    buffer
        .par_chunks_mut(row_bytes * ROW_BLOCK as usize)
        .enumerate()
        .for_each(|(block_idx, block)| {
            let mut rng = StdRng::seed_from_u64(block_seed(config.seed, block_idx as u64));
            let block_start = block_idx as u32 * ROW_BLOCK;

            for (row_offset, row) in block.chunks_exact_mut(row_bytes).enumerate() {
                let j = block_start + row_offset as u32;
                for i in 0..config.width {
                    let color = render_pixel(camera, world, i, j, config, &mut rng);
                    let o = i as usize * 3;
                    row[o..o + 3].copy_from_slice(&to_rgb8(color, config.gamma));
                }
                if let Some(observer) = progress {
                    observer(j);
                }
            }
        });

    log::info!("render finished in {:.2?}", start.elapsed());
    Ok(buffer)
}

/// Derive a row block's generator seed from the base seed.
#[inline]
fn block_seed(base: u64, block_idx: u64) -> u64 {
    base.wrapping_add(block_idx.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
