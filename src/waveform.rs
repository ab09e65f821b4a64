//! Waveform post-processor (C3).
//!
//! Applied after interpolation, scalar curves only (see spec.md §4.3).
//! `NONE` is the hot path and must stay a cheap early-out; the other four
//! modes are periodic signals in `[-1, 1]` added to or multiplied into the
//! interpolated value.

use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;

const NOISE_TABLE_LEN: usize = 8192;

/// Which periodic or noise signal to apply.
///
/// `Triangle` and `Sawtooth` are swapped relative to what their names
/// suggest — `Triangle` produces a single linear ramp per cycle (a sawtooth
/// shape) and `Sawtooth` folds that ramp into a symmetric triangle. This is
/// preserved exactly as specified for compatibility with existing data; it
/// is not a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    None,
    Sin,
    Square,
    Triangle,
    Sawtooth,
    Noise,
}

/// A lazily-built, smoothed noise table shared by all curves with the same
/// `(rand_seed, frequency)` pair.
///
/// Construction is a three-pass box blur over a uniform-random work buffer,
/// which approximates a Gaussian smoothing and keeps the table seamlessly
/// loopable (the blur window wraps modulo [`NOISE_TABLE_LEN`]).
#[derive(Clone)]
pub struct NoiseTable {
    table: Box<[f32; NOISE_TABLE_LEN]>,
}

impl NoiseTable {
    /// Build the table for a given seed and frequency. Expensive (~100k
    /// cycles per spec.md §4.4); callers should build once and cache keyed
    /// on `(seed, frequency)`.
    pub fn build(seed: u8, frequency: f32) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed as u64);
        let mut work = [0f32; NOISE_TABLE_LEN];
        for v in work.iter_mut() {
            *v = rng.gen_range(0.0..1.0);
        }

        let w = (NOISE_TABLE_LEN as f32 / (frequency.round().max(1.0))) as usize;
        let w = w.max(1);

        let mut out = [0f32; NOISE_TABLE_LEN];
        for _ in 0..3 {
            for i in 0..NOISE_TABLE_LEN {
                let mut sum = 0.0f32;
                for k in 0..w {
                    sum += work[(i + k) % NOISE_TABLE_LEN];
                }
                out[i] = sum / w as f32;
            }
            work.copy_from_slice(&out);
        }

        Self {
            table: Box::new(work),
        }
    }

    /// Sample the table at normalized time `t`, linearly interpolated and
    /// remapped from `[0,1]` to `[-1,1]`.
    pub fn sample(&self, t: f32) -> f32 {
        let pos = t * NOISE_TABLE_LEN as f32;
        let i0 = (pos.floor() as i64).rem_euclid(NOISE_TABLE_LEN as i64) as usize;
        let i1 = (i0 + 1) % NOISE_TABLE_LEN;
        let frac = pos - pos.floor();
        let avg = self.table[i0] + (self.table[i1] - self.table[i0]) * frac;
        avg * 2.0 - 1.0
    }
}

/// Evaluate the raw waveform signal (before amplitude scaling) at `t`,
/// given phase `phi = t * frequency`. Returns `0.0` for `Noise` when no
/// table has been built yet — callers route `Noise` through
/// [`NoiseTable::sample`] instead whenever a table is available.
fn raw_signal(waveform: Waveform, phi: f32, t: f32, noise: Option<&NoiseTable>) -> f32 {
    match waveform {
        Waveform::None => 0.0,
        Waveform::Sin => (std::f32::consts::TAU * phi).sin(),
        Waveform::Square => {
            let s = (std::f32::consts::TAU * phi).sin();
            if s == 0.0 {
                1.0
            } else {
                s.signum()
            }
        }
        Waveform::Triangle => (phi.fract() - 0.5) * 2.0,
        Waveform::Sawtooth => {
            let folded = phi.rem_euclid(2.0);
            let folded = if folded > 1.0 { 2.0 - folded } else { folded };
            (folded - 0.5) * 2.0
        }
        Waveform::Noise => noise.map(|n| n.sample(t)).unwrap_or(0.0),
    }
}

/// Apply the waveform to `out` (the interpolated curve value). `amplitude`
/// and `frequency` are the curve's half-float parameters already widened to
/// `f32`; `additive` selects `out += wf` vs `out *= wf`.
pub fn apply(
    out: f32,
    t: f32,
    waveform: Waveform,
    amplitude: f32,
    frequency: f32,
    additive: bool,
    noise: Option<&NoiseTable>,
) -> f32 {
    if waveform == Waveform::None {
        return out;
    }
    let phi = t * frequency;
    let mut wf = raw_signal(waveform, phi, t, noise);
    wf *= amplitude;
    if additive {
        out + wf
    } else {
        out * wf
    }
}
