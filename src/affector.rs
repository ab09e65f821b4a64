//! Affector set (C8): drag, gravity, turbulence, vortex.
//!
//! A discriminated union with per-variant data and a common `force`
//! contract replaces the inheritance hierarchy the source uses for this
//! (spec.md §9).

use glam::{Mat4, Vec3};

use crate::noise3d::Noise3d;

/// Where an affector's force applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AreaType {
    Infinite,
    /// Unit cube centered at the origin, in the affector's local space.
    UnitBox,
}

/// Per-variant affector behavior. `AffectorPower` itself is not stored here
/// — it's a slot value (`slots::SlotIndex::AffectorPower`) read from the
/// owning object's `slot_results` each frame, the same way every other
/// animatable quantity flows through the resolver.
#[derive(Clone)]
pub enum AffectorKind {
    /// Linear (not physical/quadratic) drag.
    Drag,
    /// `directional == true` uses the affector's world position as a
    /// constant direction; `false` pulls toward it as a point source.
    Gravity { directional: bool },
    /// Fractal 3-octave 3D value noise.
    Turbulence { frequency: f32, kernel: Noise3d },
    /// Force is distance-independent: a cross product between the
    /// affector's world-space local Y axis and the direction to the
    /// particle.
    Vortex { local_y_axis_world: Vec3 },
}

/// A scene object exerting a force on particles inside its area of
/// influence (spec.md §3, §4.8).
#[derive(Clone)]
pub struct Affector {
    pub kind: AffectorKind,
    pub area_type: AreaType,
    /// Precomputed once per frame from the object's world matrix.
    pub inverse_world_matrix: Mat4,
    /// The affector's world-space origin, used both for containment and by
    /// the gravity/vortex force formulas.
    pub world_origin: Vec3,
    /// `slot_results[AffectorPower]` from the owning object, copied in by
    /// the scene driver after animation resolution each frame (spec.md §3
    /// taxonomy, slot 50). Kept out of the slot array's indexing here so
    /// `force` doesn't need a `SceneObject` reference.
    pub power: f32,
}

impl Affector {
    pub fn new(kind: AffectorKind, area_type: AreaType) -> Self {
        Self {
            kind,
            area_type,
            inverse_world_matrix: Mat4::IDENTITY,
            world_origin: Vec3::ZERO,
            power: 1.0,
        }
    }

    /// `contains(pos)` from spec.md §3: always true for `Infinite`; for
    /// `UnitBox`, true iff `pos` transformed into local space lies within
    /// the unit cube centered at the origin.
    pub fn contains(&self, world_pos: Vec3) -> bool {
        match self.area_type {
            AreaType::Infinite => true,
            AreaType::UnitBox => {
                let local = self.inverse_world_matrix.transform_point3(world_pos);
                local.x.abs() <= 0.5 && local.y.abs() <= 0.5 && local.z.abs() <= 0.5
            }
        }
    }

    /// Rebuild the turbulence kernel if `seed` has changed; a no-op for
    /// every other variant.
    pub fn reseed_turbulence_if_needed(&mut self, seed: u8) {
        if let AffectorKind::Turbulence { kernel, .. } = &mut self.kind {
            kernel.reseed_if_needed(seed);
        }
    }

    /// `force(particle) -> vec3` from spec.md §4.8, consulted once per
    /// inside-area particle per tick. Reads `self.power`, refreshed by the
    /// scene driver from `AffectorPower` before each frame's ticks.
    pub fn force(&self, particle_pos: Vec3, particle_velocity: Vec3) -> Vec3 {
        let power = self.power;
        match &self.kind {
            AffectorKind::Drag => -particle_velocity * power,
            AffectorKind::Gravity { directional: true } => {
                safe_normalize(self.world_origin) * power / 100.0
            }
            AffectorKind::Gravity { directional: false } => {
                let d = self.world_origin - particle_pos;
                let len = d.length();
                if len < 1e-6 {
                    Vec3::ZERO
                } else {
                    d * power / (len * len * len * 100.0)
                }
            }
            AffectorKind::Turbulence { frequency, kernel } => {
                let local = self.inverse_world_matrix.transform_point3(particle_pos);
                let sum = kernel.sample(local * *frequency)
                    + kernel.sample(local * (*frequency * 2.0)) * 0.5
                    + kernel.sample(local * (*frequency * 4.0)) * 0.25;
                safe_normalize(sum) * power / 100.0
            }
            AffectorKind::Vortex {
                local_y_axis_world,
            } => {
                let direction = safe_normalize(self.world_origin - particle_pos);
                local_y_axis_world.cross(direction) * power
            }
        }
    }
}

/// Normalizing a zero vector is one of spec.md §7's "degenerate math"
/// cases: fall back to a zero force rather than propagating NaN.
fn safe_normalize(v: Vec3) -> Vec3 {
    if v.length_squared() > 1e-12 {
        v.normalize()
    } else {
        Vec3::ZERO
    }
}
