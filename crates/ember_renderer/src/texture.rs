//! Textures sampled by materials at hit points.

use crate::perlin::Perlin;
use crate::Color;
use ember_math::Vec3;
use rand::RngCore;

/// A color field over surface (u, v) coordinates and world position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color;
}

/// A constant color everywhere.
#[derive(Clone)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Vec3) -> Color {
        self.albedo
    }
}

/// Spatial checker pattern.
///
/// Alternates between two textures based on the sign of a product of sines
/// of the world position, so the pattern is stable under (u, v) seams.
pub struct Checker {
    even: Box<dyn Texture>,
    odd: Box<dyn Texture>,
    scale: f64,
}

impl Checker {
    pub fn new(even: Box<dyn Texture>, odd: Box<dyn Texture>, scale: f64) -> Self {
        Self { even, odd, scale }
    }

    /// Checker between two flat colors.
    pub fn from_colors(even: Color, odd: Color, scale: f64) -> Self {
        Self::new(
            Box::new(SolidColor::new(even)),
            Box::new(SolidColor::new(odd)),
            scale,
        )
    }
}

impl Texture for Checker {
    fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        let s = (self.scale * p.x).sin() * (self.scale * p.y).sin() * (self.scale * p.z).sin();
        if s < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like texture: a sine along z phase-shifted by turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Vec3) -> Color {
        Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * self.noise.turb(p, 7)).sin())
    }
}
