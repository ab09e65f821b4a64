//! 3D value-noise kernel for the turbulence affector (spec.md §4.8).
//!
//! Distinct from `waveform.rs`'s 1D noise table: this is a 32×32×32 lattice
//! of random unit vectors, trilinearly sampled and summed across three
//! octaves to produce the turbulence force.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const KERNEL_SIZE: usize = 32;

/// A lazily-rebuilt lattice of random unit vectors, keyed by `rand_seed`.
#[derive(Clone)]
pub struct Noise3d {
    kernel: Vec<Vec3>,
    seed: u8,
}

impl Noise3d {
    pub fn new(seed: u8) -> Self {
        Self {
            kernel: Self::build(seed),
            seed,
        }
    }

    fn build(seed: u8) -> Vec<Vec3> {
        let mut rng = SmallRng::seed_from_u64(seed as u64);
        (0..KERNEL_SIZE * KERNEL_SIZE * KERNEL_SIZE)
            .map(|_| {
                let v = Vec3::new(
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                );
                if v.length_squared() > 1e-12 {
                    v.normalize()
                } else {
                    Vec3::X
                }
            })
            .collect()
    }

    /// Regenerate the kernel only if `seed` differs from the one last used
    /// to fill it (spec.md §4.8). Regenerating mid-frame costs a one-frame
    /// stutter but is otherwise harmless (spec.md §7).
    pub fn reseed_if_needed(&mut self, seed: u8) {
        if seed != self.seed {
            log::debug!("reseeding turbulence kernel {} -> {}, one-frame stutter expected", self.seed, seed);
            self.kernel = Self::build(seed);
            self.seed = seed;
        }
    }

    fn at(&self, x: i32, y: i32, z: i32) -> Vec3 {
        let wrap = |v: i32| v.rem_euclid(KERNEL_SIZE as i32) as usize;
        let (x, y, z) = (wrap(x), wrap(y), wrap(z));
        self.kernel[(x * KERNEL_SIZE + y) * KERNEL_SIZE + z]
    }

    /// Trilinearly interpolated sample at a (possibly fractional, possibly
    /// out-of-`[0,32)`) lattice coordinate; indices wrap modulo
    /// [`KERNEL_SIZE`].
    pub fn sample(&self, p: Vec3) -> Vec3 {
        let (fx, fy, fz) = (p.x.floor(), p.y.floor(), p.z.floor());
        let (tx, ty, tz) = (p.x - fx, p.y - fy, p.z - fz);
        let (ix, iy, iz) = (fx as i32, fy as i32, fz as i32);

        let c00 = self.at(ix, iy, iz).lerp(self.at(ix + 1, iy, iz), tx);
        let c10 = self.at(ix, iy + 1, iz).lerp(self.at(ix + 1, iy + 1, iz), tx);
        let c01 = self.at(ix, iy, iz + 1).lerp(self.at(ix + 1, iy, iz + 1), tx);
        let c11 = self
            .at(ix, iy + 1, iz + 1)
            .lerp(self.at(ix + 1, iy + 1, iz + 1), tx);

        let c0 = c00.lerp(c10, ty);
        let c1 = c01.lerp(c11, ty);
        let c = c0.lerp(c1, tz);

        if c.length_squared() > 1e-12 {
            c.normalize()
        } else {
            Vec3::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_seeds_produce_bit_identical_kernels() {
        // spec.md §8 scenario 3.
        let a = Noise3d::new(42);
        let b = Noise3d::new(42);
        assert_eq!(a.kernel, b.kernel);
        let sample_a = a.sample(Vec3::new(0.25, 0.5, 0.75));
        let sample_b = b.sample(Vec3::new(0.25, 0.5, 0.75));
        assert_eq!(sample_a, sample_b);
    }

    #[test]
    fn sample_is_unit_length_or_zero() {
        let n = Noise3d::new(7);
        for p in [Vec3::new(1.2, 3.4, -5.6), Vec3::new(-0.1, 0.1, 32.5)] {
            let s = n.sample(p);
            let len = s.length();
            assert!(len < 1e-6 || (len - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn reseed_changes_kernel_only_when_seed_differs() {
        let mut n = Noise3d::new(1);
        let before = n.kernel.clone();
        n.reseed_if_needed(1);
        assert_eq!(n.kernel, before);
        n.reseed_if_needed(2);
        assert_ne!(n.kernel, before);
    }
}
