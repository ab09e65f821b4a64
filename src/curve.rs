//! Keyed curve storage and the spline evaluator (C1 container + C4).
//!
//! A [`Curve`] owns its keys and evaluation configuration; [`Curve::evaluate`]
//! is the `evaluate(curve, t) -> vec4` operation from spec.md §4.4.

use std::cell::{Cell, RefCell};

use glam::{Quat, Vec4};
use half::f16;

use crate::error::BuildError;
use crate::interpolate;
use crate::key::Key;
use crate::waveform::{self, NoiseTable, Waveform};

/// One of the four interpolation modes a [`Curve`] can use between keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    Constant,
    Linear,
    Cubic,
    Bezier,
}

/// Whether a curve's `value[4]` holds a scalar (component 0 only) or a full
/// quaternion (all four components).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Quaternion,
}

/// A curve tagged as one of the fixed, keyless defaults short-circuits
/// evaluation entirely (spec.md §3, §4.4 step 1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultKind {
    NotDefault,
    Zero,
    One,
    /// Holds its constant value inline since there are no keys to read it
    /// from.
    ConstantValue(f32),
}

/// A keyed curve: its keys, interpolation/loop/value-kind configuration,
/// waveform post-processor configuration, and the last-evaluated output.
pub struct Curve {
    keys: Vec<Key>,
    interpolation: Interpolation,
    looping: bool,
    value_kind: ValueKind,
    default_kind: DefaultKind,

    waveform: Waveform,
    amplitude: f16,
    frequency: f16,
    additive: bool,
    rand_seed: u8,

    /// Lazily built on first `NOISE` evaluation, rebuilt if `rand_seed` or
    /// `frequency` have changed since (spec.md §3: "lazily allocate"). Keys
    /// and curves are otherwise immutable at runtime (spec.md §3
    /// "Lifecycles"), so this is the one piece of interior mutability
    /// `evaluate` needs to stay a `&self` method.
    noise_table: RefCell<Option<NoiseTable>>,
    noise_table_key: Cell<Option<(u8, u32)>>,

    /// Last evaluation result, full precision (spec.md §4.1).
    value: Cell<Vec4>,
}

impl Curve {
    /// Build a curve from an ordered, deduplicated key list. Rejects
    /// out-of-order/duplicate times and empty key lists — these are
    /// load-time validation failures (spec.md §3 invariants), not runtime
    /// degenerate-math fallbacks.
    pub fn new(
        keys: Vec<Key>,
        interpolation: Interpolation,
        looping: bool,
        value_kind: ValueKind,
    ) -> Result<Self, BuildError> {
        if keys.is_empty() {
            return Err(BuildError::EmptyCurve);
        }
        for pair in keys.windows(2) {
            if pair[0].t >= pair[1].t {
                return Err(BuildError::DuplicateKeyTime { time: pair[1].t });
            }
        }
        Ok(Self {
            keys,
            interpolation,
            looping,
            value_kind,
            default_kind: DefaultKind::NotDefault,
            waveform: Waveform::None,
            amplitude: f16::ZERO,
            frequency: f16::ZERO,
            additive: true,
            rand_seed: 0,
            noise_table: RefCell::new(None),
            noise_table_key: Cell::new(None),
            value: Cell::new(Vec4::ZERO),
        })
    }

    /// Build a curve that short-circuits evaluation to a fixed default and
    /// owns no keys.
    pub fn new_default(default_kind: DefaultKind, value_kind: ValueKind) -> Self {
        Self {
            keys: Vec::new(),
            interpolation: Interpolation::Constant,
            looping: false,
            value_kind,
            default_kind,
            waveform: Waveform::None,
            amplitude: f16::ZERO,
            frequency: f16::ZERO,
            additive: true,
            rand_seed: 0,
            noise_table: RefCell::new(None),
            noise_table_key: Cell::new(None),
            value: Cell::new(Vec4::ZERO),
        }
    }

    /// Attach waveform post-processing. Has no effect on quaternion curves
    /// (spec.md §4.3: "waveform × quaternion is undefined").
    pub fn with_waveform(
        mut self,
        waveform: Waveform,
        amplitude: f32,
        frequency: f32,
        additive: bool,
        rand_seed: u8,
    ) -> Self {
        self.waveform = waveform;
        self.amplitude = f16::from_f32(amplitude);
        self.frequency = f16::from_f32(frequency);
        self.additive = additive;
        self.rand_seed = rand_seed;
        self
    }

    pub fn value_kind(&self) -> ValueKind {
        self.value_kind
    }

    /// The result of the most recent [`Curve::evaluate`] call.
    pub fn value(&self) -> Vec4 {
        self.value.get()
    }

    /// `evaluate(curve, t) -> vec4` (spec.md §4.4).
    pub fn evaluate(&self, t: f32) -> Vec4 {
        let out = match self.default_kind {
            DefaultKind::Zero => Vec4::ZERO,
            DefaultKind::One => Vec4::ONE,
            DefaultKind::ConstantValue(v) => Vec4::splat(v),
            DefaultKind::NotDefault => self.evaluate_keyed(t),
        };
        self.value.set(out);
        out
    }

    fn evaluate_keyed(&self, t: f32) -> Vec4 {
        let n = self.keys.len();
        if n == 1 {
            return self.post_process(self.keys[0].value_at(), t);
        }

        let raw = match self.locate(t) {
            Segment::Hold(v) => v,
            Segment::Interp { a, b, c, d, u } => self.interpolate(a, b, c, d, u),
        };
        self.post_process(raw, t)
    }

    /// Key selection + interval normalization (spec.md §4.4 steps 2-3).
    fn locate(&self, t: f32) -> Segment {
        let n = self.keys.len();
        let first = self.keys[0].time_at();
        let last = self.keys[n - 1].time_at();

        if !self.looping {
            if t <= first {
                return Segment::Hold(self.keys[0].value_at());
            }
            if t >= last {
                return Segment::Hold(self.keys[n - 1].value_at());
            }
        }

        let b = self.segment_start_index(t, first, last);
        let c = (b + 1) % n;

        let bt = self.keys[b].time_at();
        let mut ct = self.keys[c].time_at();
        let wrapped = c <= b;
        if wrapped {
            ct += 1.0;
        }
        let mut tt = t;
        if wrapped && t < bt {
            tt += 1.0;
        }
        let interval = (ct - bt).max(1e-6);
        let u = ((tt - bt) / interval).clamp(0.0, 1.0);

        // Duplicate the nearest endpoint for the phantom neighbour on
        // non-looping curves; looping curves wrap naturally.
        let a_idx = if !self.looping && b == 0 { b } else { (b + n - 1) % n };
        let d_idx = if !self.looping && c == n - 1 { c } else { (c + 1) % n };

        Segment::Interp {
            a: self.keys[a_idx],
            b: self.keys[b],
            c: self.keys[c],
            d: self.keys[d_idx],
            u,
        }
    }

    fn segment_start_index(&self, t: f32, first: f32, last: f32) -> usize {
        let n = self.keys.len();
        if self.looping && (t < first || t >= last) {
            return n - 1;
        }
        for i in 0..n - 1 {
            if t >= self.keys[i].time_at() && t < self.keys[i + 1].time_at() {
                return i;
            }
        }
        n - 2
    }

    fn interpolate(&self, a: Key, b: Key, c: Key, d: Key, u: f32) -> Vec4 {
        match (self.interpolation, self.value_kind) {
            (Interpolation::Constant, _) => interpolate::constant(b.value_at()),
            (Interpolation::Linear, ValueKind::Scalar) => {
                interpolate::lerp_scalar(b.value_at(), c.value_at(), u)
            }
            (Interpolation::Linear, ValueKind::Quaternion) => {
                quat_vec4(interpolate::slerp_quat(to_quat(b), to_quat(c), u))
            }
            (Interpolation::Cubic, ValueKind::Scalar) => interpolate::catmull_rom_scalar(
                a.value_at(),
                b.value_at(),
                c.value_at(),
                d.value_at(),
                u,
            ),
            (Interpolation::Cubic, ValueKind::Quaternion) => quat_vec4(interpolate::squad_quat(
                to_quat(a),
                to_quat(b),
                to_quat(c),
                to_quat(d),
                u,
            )),
            (Interpolation::Bezier, ValueKind::Scalar) => {
                let (out_v, out_t) = b.tangent_at(crate::key::TangentSide::Out);
                let (in_v, in_t) = c.tangent_at(crate::key::TangentSide::In);
                let span = (c.time_at() - b.time_at()).max(1e-6);
                let out_time = out_t as f32 / 255.0 / span;
                let in_time = in_t as f32 / 255.0 / span;
                let value = interpolate::bezier_scalar(
                    b.value_at().x,
                    c.value_at().x,
                    out_v.x,
                    in_v.x,
                    out_time,
                    in_time,
                    u,
                );
                Vec4::new(value, 0.0, 0.0, 0.0)
            }
            // Bezier tangents are not defined for quaternions in the
            // source material; squad is the closest cubic behavior and is
            // used as the fallback here.
            (Interpolation::Bezier, ValueKind::Quaternion) => quat_vec4(interpolate::squad_quat(
                to_quat(a),
                to_quat(b),
                to_quat(c),
                to_quat(d),
                u,
            )),
        }
    }

    fn post_process(&self, raw: Vec4, t: f32) -> Vec4 {
        if self.value_kind == ValueKind::Quaternion || self.waveform == Waveform::None {
            return raw;
        }

        if self.waveform == Waveform::Noise {
            let freq_bits = self.frequency.to_f32().round() as u32;
            let key = (self.rand_seed, freq_bits);
            if self.noise_table_key.get() != Some(key) {
                *self.noise_table.borrow_mut() =
                    Some(NoiseTable::build(self.rand_seed, self.frequency.to_f32()));
                self.noise_table_key.set(Some(key));
            }
        }

        let out0 = waveform::apply(
            raw.x,
            t,
            self.waveform,
            self.amplitude.to_f32(),
            self.frequency.to_f32(),
            self.additive,
            self.noise_table.borrow().as_ref(),
        );
        Vec4::new(out0, raw.y, raw.z, raw.w)
    }
}

enum Segment {
    Hold(Vec4),
    Interp { a: Key, b: Key, c: Key, d: Key, u: f32 },
}

fn to_quat(key: Key) -> Quat {
    let v = key.value_at();
    Quat::from_xyzw(v.x, v.y, v.z, v.w)
}

fn quat_vec4(q: Quat) -> Vec4 {
    Vec4::new(q.x, q.y, q.z, q.w)
}
