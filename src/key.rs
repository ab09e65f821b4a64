//! Half-float key store (C1).
//!
//! A [`Key`] is a single control point of a [`crate::curve::Curve`]: an 8-bit
//! time tick, up to four half-precision value components, and half-precision
//! Bezier tangent data. This is a deliberate space/quality trade (spec.md
//! §4.1) — 16-bit storage for everything but the runtime-evaluated output,
//! which stays full `f32`.

use glam::{Vec3, Vec4};
use half::f16;

/// Number of discrete time ticks a [`Key::t`] can address.
pub const TICK_COUNT: u32 = 256;

/// Which side of a key a Bezier tangent describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TangentSide {
    /// The outgoing tangent, used when this key is the start of a segment.
    Out,
    /// The incoming tangent, used when this key is the end of a segment.
    In,
}

/// A single keyframe: time, value, and (for Bezier curves) tangent data.
///
/// `value` holds up to four half-float components; scalar curves only ever
/// populate `value[0]`, quaternion curves populate all four. `ctrl_value` is
/// laid out as `[out.x, out.y, out.z, in.x, in.y, in.z]` and `ctrl_pos` as
/// `[out, in]`; both are ignored outside [`crate::curve::Interpolation::Bezier`].
#[derive(Clone, Copy, Debug)]
pub struct Key {
    /// Tick in `[0, 255]`; normalized time is `(t + 1) / 256`.
    pub t: u8,
    /// Half-precision value components.
    pub value: [f16; 4],
    /// Half-precision outgoing/incoming value tangent offsets.
    pub ctrl_value: [f16; 6],
    /// 8-bit outgoing/incoming time tangent offsets.
    pub ctrl_pos: [u8; 2],
}

impl Key {
    /// Build a scalar key with no Bezier tangents.
    pub fn scalar(t: u8, value: f32) -> Self {
        Self {
            t,
            value: [f16::from_f32(value), f16::ZERO, f16::ZERO, f16::ZERO],
            ctrl_value: [f16::ZERO; 6],
            ctrl_pos: [0; 2],
        }
    }

    /// Build a quaternion key (xyzw) with no Bezier tangents.
    pub fn quaternion(t: u8, value: [f32; 4]) -> Self {
        Self {
            t,
            value: value.map(f16::from_f32),
            ctrl_value: [f16::ZERO; 6],
            ctrl_pos: [0; 2],
        }
    }

    /// Attach Bezier tangent data to this key.
    pub fn with_bezier_tangents(
        mut self,
        out_value: Vec3,
        out_time: u8,
        in_value: Vec3,
        in_time: u8,
    ) -> Self {
        self.ctrl_value = [
            f16::from_f32(out_value.x),
            f16::from_f32(out_value.y),
            f16::from_f32(out_value.z),
            f16::from_f32(in_value.x),
            f16::from_f32(in_value.y),
            f16::from_f32(in_value.z),
        ];
        self.ctrl_pos = [out_time, in_time];
        self
    }

    /// Normalized time of this key: `(t + 1) / 256 ∈ (0.0039, 1.0]`.
    ///
    /// No key ever maps to exactly `0.0`; this simplifies loop wraparound
    /// arithmetic (spec.md §4.1).
    #[inline]
    pub fn time_at(&self) -> f32 {
        (self.t as f32 + 1.0) / TICK_COUNT as f32
    }

    /// Full-precision value of this key.
    #[inline]
    pub fn value_at(&self) -> Vec4 {
        Vec4::new(
            self.value[0].to_f32(),
            self.value[1].to_f32(),
            self.value[2].to_f32(),
            self.value[3].to_f32(),
        )
    }

    /// Bezier tangent for the requested side: `(value offset, time offset)`.
    ///
    /// The value offset is relative to [`Key::value_at`]; the time offset is
    /// an 8-bit fraction of the tick domain (divide by 255 to normalize).
    pub fn tangent_at(&self, side: TangentSide) -> (Vec3, u8) {
        match side {
            TangentSide::Out => (
                Vec3::new(
                    self.ctrl_value[0].to_f32(),
                    self.ctrl_value[1].to_f32(),
                    self.ctrl_value[2].to_f32(),
                ),
                self.ctrl_pos[0],
            ),
            TangentSide::In => (
                Vec3::new(
                    self.ctrl_value[3].to_f32(),
                    self.ctrl_value[4].to_f32(),
                    self.ctrl_value[5].to_f32(),
                ),
                self.ctrl_pos[1],
            ),
        }
    }
}

/// Encode a normalized time `t ∈ (0, 1]` to its tick byte.
///
/// Inverse of [`Key::time_at`]: `round(t * 256) - 1`. A tool writing time
/// `0.0` must emit byte `0` (which decodes to `1/256`, not `0`) — spec.md §6.
pub fn encode_time(t: f32) -> u8 {
    let tick = (t * TICK_COUNT as f32).round() as i32 - 1;
    tick.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_round_trip() {
        for raw in [1u8, 2, 100, 128, 200, 255] {
            let key = Key::scalar(raw, 0.0);
            let t = key.time_at();
            assert_eq!(encode_time(t), raw, "round trip failed for tick {raw}");
        }
    }

    #[test]
    fn zero_time_encodes_to_byte_zero() {
        // A tool writing time 0.0 emits byte 0, which decodes to 1/256.
        assert_eq!(encode_time(0.0), 0);
        let key = Key::scalar(0, 0.0);
        assert!((key.time_at() - 1.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn value_round_trips_within_half_precision() {
        let key = Key::scalar(10, 0.5);
        assert!((key.value_at().x - 0.5).abs() < 1e-3);
    }

    #[test]
    fn quaternion_key_keeps_all_four_components() {
        let key = Key::quaternion(10, [0.0, 0.0, 0.0, 1.0]);
        let v = key.value_at();
        assert!((v.w - 1.0).abs() < 1e-3);
    }
}
