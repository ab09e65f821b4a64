//! The particle record (spec.md §4.7 "Data per particle").
//!
//! Layout-stable and GPU-uploadable via `bytemuck`, the way the teacher's own
//! GPU instance structs are — even though this core never uploads a particle
//! array itself, C9's billboard path (`render_dispatch.rs`) derives its
//! vertex records from these fields every tick.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// One particle slot in an emitter's fixed-size buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Degrees.
    pub rotation: f32,
    /// Degrees per tick.
    pub rotation_speed: f32,
    /// Normalized; random at spawn.
    pub rotation_axis: Vec3,
    pub scale: f32,
    pub scale_chaos: f32,
    pub stretch_x: f32,
    pub stretch_y: f32,
    /// Per-particle random value in `[0, 1]`, exposed to shaders; distinct
    /// from the `*Chaos` spline slots that control spawn-time variation.
    pub chaos: f32,
    pub max_life: i32,
    pub life_left: i32,
    /// Reserved for shader use (spec.md §4.7).
    pub rand_seed: f32,
}

impl Particle {
    pub const ZEROED: Self = Self {
        position: Vec3::ZERO,
        velocity: Vec3::ZERO,
        rotation: 0.0,
        rotation_speed: 0.0,
        rotation_axis: Vec3::Z,
        scale: 0.0,
        scale_chaos: 0.0,
        stretch_x: 0.0,
        stretch_y: 0.0,
        chaos: 0.0,
        max_life: 0,
        life_left: 0,
        rand_seed: 0.0,
    };

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life_left > 0
    }

    /// Fraction of its life spent, in `[0, 1]`; `0` for a dead particle.
    #[inline]
    pub fn life_remaining(&self) -> f32 {
        if self.max_life <= 0 {
            0.0
        } else {
            (self.life_left as f32 / self.max_life as f32).clamp(0.0, 1.0)
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::ZEROED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_particle_is_dead() {
        assert!(!Particle::ZEROED.is_alive());
    }

    #[test]
    fn life_remaining_is_bounded() {
        let mut p = Particle::ZEROED;
        p.max_life = 250;
        p.life_left = 250;
        assert_eq!(p.life_remaining(), 1.0);
        p.life_left = 0;
        assert_eq!(p.life_remaining(), 0.0);
    }
}
