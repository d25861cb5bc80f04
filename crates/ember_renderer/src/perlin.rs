//! Perlin gradient noise.

use crate::sampling::random_unit_vector;
use ember_math::Vec3;
use rand::{Rng, RngCore};

const POINT_COUNT: usize = 256;

/// Lattice gradient noise with three independent permutation tables.
///
/// Built from the caller's generator like every other sampled structure in
/// the crate; the tables are immutable afterwards, so lookups are `&self`.
pub struct Perlin {
    ranvec: [Vec3; POINT_COUNT],
    perm_x: [usize; POINT_COUNT],
    perm_y: [usize; POINT_COUNT],
    perm_z: [usize; POINT_COUNT],
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut ranvec = [Vec3::ZERO; POINT_COUNT];
        for v in &mut ranvec {
            *v = random_unit_vector(rng);
        }

        Self {
            ranvec,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut dyn RngCore) -> [usize; POINT_COUNT] {
        let mut p = [0usize; POINT_COUNT];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i;
        }
        // Fisher-Yates
        for i in (1..POINT_COUNT).rev() {
            let target = rng.gen_range(0..=i);
            p.swap(i, target);
        }
        p
    }

    /// Smoothed gradient noise at a point, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f64 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();
        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    // Masking keeps the lattice index in range for negative
                    // coordinates too
                    let idx = self.perm_x[((i + di as i64) & 255) as usize]
                        ^ self.perm_y[((j + dj as i64) & 255) as usize]
                        ^ self.perm_z[((k + dk as i64) & 255) as usize];
                    *cell = self.ranvec[idx];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Turbulence: `depth` octaves of noise at doubling frequency and
    /// halving weight, folded to a non-negative magnitude.
    pub fn turb(&self, p: Vec3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp);
            weight *= 0.5;
            temp *= 2.0;
        }

        accum.abs()
    }
}

/// Trilinear interpolation of the corner gradients with Hermite smoothing.
fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, cell) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f64, j as f64, k as f64);
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * cell.dot(weight);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_noise_deterministic_for_a_seed() {
        let mut rng_a = StdRng::seed_from_u64(31);
        let mut rng_b = StdRng::seed_from_u64(31);
        let a = Perlin::new(&mut rng_a);
        let b = Perlin::new(&mut rng_b);

        let p = Vec3::new(1.3, -2.7, 0.4);
        assert_eq!(a.noise(p), b.noise(p));
        assert_eq!(a.turb(p, 7), b.turb(p, 7));
    }

    #[test]
    fn test_noise_bounded_and_finite() {
        // Unit gradients with trilinear weights cannot exceed sqrt(3)
        let mut rng = StdRng::seed_from_u64(32);
        let perlin = Perlin::new(&mut rng);

        for i in 0..200 {
            let p = Vec3::new(i as f64 * 0.37, i as f64 * -0.11, i as f64 * 0.53);
            let n = perlin.noise(p);
            assert!(n.is_finite());
            assert!(n.abs() < 1.8);
        }
    }

    #[test]
    fn test_noise_vanishes_on_the_lattice() {
        // At integer coordinates every corner weight vector has a zero
        // component along each active axis pair, so the hermite factors
        // select exactly one corner with weight (0, 0, 0).
        let mut rng = StdRng::seed_from_u64(33);
        let perlin = Perlin::new(&mut rng);

        assert!(perlin.noise(Vec3::new(2.0, -3.0, 5.0)).abs() < 1e-12);
        assert!(perlin.noise(Vec3::ZERO).abs() < 1e-12);
    }

    #[test]
    fn test_turb_single_octave_is_folded_noise() {
        let mut rng = StdRng::seed_from_u64(34);
        let perlin = Perlin::new(&mut rng);

        let p = Vec3::new(0.6, 1.9, -4.2);
        assert_eq!(perlin.turb(p, 1), perlin.noise(p).abs());
        assert!(perlin.turb(p, 7) >= 0.0);
    }
}
