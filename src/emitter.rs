//! Particle emitter (C7): fixed-timestep ageing, spawning, shape sampling,
//! and child-source distribution.
//!
//! The simulation runs at a fixed 25 Hz independent of the caller's frame
//! rate, the way the teacher's own simulation step decouples physics from
//! render cadence; `tick` just drains whole ticks out of a time accumulator.

use glam::{Mat4, Vec3};

use crate::affector::Affector;
use crate::particle::Particle;
use crate::rng::DeterministicRng;
use crate::slots::{SlotIndex, N_SLOTS};

pub const TICKS_PER_SEC: f32 = 25.0;

/// Local-space spawn volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmitterShape {
    Box,
    Sphere,
}

/// A scene object owning a fixed-size particle buffer and running the
/// simulation loop (spec.md §4.7).
pub struct Emitter {
    pub shape: EmitterShape,
    pub buffer_size_log2: u8,
    /// `[0, 255]`, scaled to `[0, 1]` at spawn time.
    pub inner_radius: u8,
    /// Percentage of the buffer spawned by `reset`.
    pub start_count: u8,
    pub aging: bool,
    pub two_dir_rotate: bool,
    pub rand_rotate: bool,
    pub rotate_to_direction: bool,
    pub sort: bool,

    particles: Vec<Particle>,
    rng: DeterministicRng,
    ticks: f32,
    emission_fraction: f32,
    prev_trigger: f32,
    source_cursor: usize,
}

impl Emitter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        shape: EmitterShape,
        buffer_size_log2: u8,
        rand_seed: u8,
        inner_radius: u8,
        start_count: u8,
        aging: bool,
        two_dir_rotate: bool,
        rand_rotate: bool,
        rotate_to_direction: bool,
        sort: bool,
    ) -> Self {
        let capacity = 1usize << buffer_size_log2;
        Self {
            shape,
            buffer_size_log2,
            inner_radius,
            start_count,
            aging,
            two_dir_rotate,
            rand_rotate,
            rotate_to_direction,
            sort,
            particles: vec![Particle::ZEROED; capacity],
            rng: DeterministicRng::new(rand_seed),
            ticks: 0.0,
            emission_fraction: 0.0,
            prev_trigger: 0.0,
            source_cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    /// Zero the buffer, reseed the PRNG, and spawn `buffer_size * start_count
    /// / 255` initial particles so the emitter doesn't pop in empty (spec.md
    /// §4.7 "Reset operation"). Each seed particle is spread across a
    /// fraction of `[0, 1)` in place of the "advanced by one simulation step"
    /// wording, so the initial burst isn't visibly clustered at one point.
    pub fn reset(
        &mut self,
        rand_seed: u8,
        slot_results: &[f32; N_SLOTS],
        sources: &[(Mat4, Mat4)],
        target_position: Option<Vec3>,
    ) {
        for p in self.particles.iter_mut() {
            *p = Particle::ZEROED;
        }
        self.rng = DeterministicRng::new(rand_seed);
        self.ticks = 0.0;
        self.emission_fraction = 0.0;
        self.prev_trigger = 0.0;
        self.source_cursor = 0;

        let start = (self.particles.len() * self.start_count as usize) / 255;
        for i in 0..start {
            let mt = i as f32 / start.max(1) as f32;
            self.spawn_particle(mt, slot_results, sources, target_position);
        }
    }

    /// Drain whole ticks accumulated from `dt` seconds, running one full
    /// simulation step (age, affect, integrate, emit) per tick.
    pub fn tick(
        &mut self,
        dt: f32,
        slot_results: &[f32; N_SLOTS],
        sources: &[(Mat4, Mat4)],
        target_position: Option<Vec3>,
        affectors: &[Affector],
    ) {
        self.ticks += dt * TICKS_PER_SEC;
        while self.ticks >= 1.0 {
            self.ticks -= 1.0;
            self.simulate_one_tick(slot_results, sources, target_position, affectors);
        }
    }

    fn simulate_one_tick(
        &mut self,
        slot_results: &[f32; N_SLOTS],
        sources: &[(Mat4, Mat4)],
        target_position: Option<Vec3>,
        affectors: &[Affector],
    ) {
        if self.aging {
            for p in self.particles.iter_mut().filter(|p| p.is_alive()) {
                p.life_left -= 1;
            }
        }

        for p in self.particles.iter_mut().filter(|p| p.is_alive()) {
            for affector in affectors {
                if affector.contains(p.position) {
                    p.velocity += affector.force(p.position, p.velocity);
                }
            }
            p.position += p.velocity;
            p.rotation += p.rotation_speed;
        }

        let per_second = slot_results[SlotIndex::EmissionPerSecond.index()];
        self.emission_fraction += per_second / TICKS_PER_SEC;
        let spawn_count = self.emission_fraction.floor() as i32;
        if spawn_count > 0 {
            // Index-based `mt`, not `emission_fraction.fract()` — subtracting
            // whole ticks never changes the fractional part, so every spawn
            // in one tick would otherwise get the same `mt` and motion
            // interpolation (below) would collapse to a single point instead
            // of spanning the emitter's travel this tick. The first particle
            // spawned has the most of the tick left to simulate (`mt` near
            // 1, close to `world_prev`); the last has the least (`mt` near 0,
            // close to `world_cur`) — the same spread technique `reset` uses.
            let denom = (spawn_count - 1).max(1) as f32;
            for i in 0..spawn_count {
                let mt = 1.0 - i as f32 / denom;
                self.spawn_particle(mt, slot_results, sources, target_position);
            }
            self.emission_fraction -= spawn_count as f32;
        }

        let trigger = slot_results[SlotIndex::EmissionTrigger.index()];
        if self.prev_trigger < 0.5 && trigger >= 0.5 {
            self.spawn_particle(0.0, slot_results, sources, target_position);
        }
        self.prev_trigger = trigger;
    }

    fn find_spawn_slot(&mut self) -> Option<usize> {
        if let Some(idx) = self.particles.iter().position(|p| !p.is_alive()) {
            return Some(idx);
        }
        if self.aging {
            self.particles
                .iter()
                .enumerate()
                .min_by_key(|(_, p)| p.life_left)
                .map(|(i, _)| i)
        } else {
            None
        }
    }

    fn sample_shape(&mut self) -> Vec3 {
        match self.shape {
            EmitterShape::Box => Vec3::new(
                self.rng.signed_unit(),
                self.rng.signed_unit(),
                self.rng.signed_unit(),
            ),
            EmitterShape::Sphere => loop {
                let v = Vec3::new(
                    self.rng.signed_unit(),
                    self.rng.signed_unit(),
                    self.rng.signed_unit(),
                );
                if v.length_squared() < 0.25 {
                    break v;
                }
            },
        }
    }

    fn outer_boundary(&self, local: Vec3) -> Vec3 {
        match self.shape {
            EmitterShape::Box => {
                let m = local.x.abs().max(local.y.abs()).max(local.z.abs());
                if m > 1e-6 {
                    local / m * 0.5
                } else {
                    Vec3::ZERO
                }
            }
            EmitterShape::Sphere => {
                if local.length_squared() > 1e-12 {
                    local.normalize() * 0.5
                } else {
                    Vec3::ZERO
                }
            }
        }
    }

    /// `mt` is this spawn's sub-frame fraction within the current tick
    /// (spec.md §4.7 "Sub-frame advance").
    fn spawn_particle(
        &mut self,
        mt: f32,
        slot_results: &[f32; N_SLOTS],
        sources: &[(Mat4, Mat4)],
        target_position: Option<Vec3>,
    ) {
        let Some(idx) = self.find_spawn_slot() else {
            return;
        };

        let life_chaos = self.rng.unit();
        let life_secs = slot_results[SlotIndex::Life.index()]
            + life_chaos * slot_results[SlotIndex::LifeChaos.index()];
        let life_ticks = (life_secs * TICKS_PER_SEC).max(1.0) as i32;
        let max_life = if self.aging { life_ticks } else { 1 };

        let mut local = self.sample_shape();
        let outer = self.outer_boundary(local);
        let orig_len = local.length();
        let outer_len = outer.length();
        let r = if outer_len > 1e-6 {
            let inner = self.inner_radius as f32 / 255.0;
            inner + (1.0 - inner) * (orig_len / outer_len)
        } else {
            1.0
        };
        local = outer * r;

        local += Vec3::new(
            slot_results[SlotIndex::ParticleEmissionOffsetX.index()],
            slot_results[SlotIndex::ParticleEmissionOffsetY.index()],
            slot_results[SlotIndex::ParticleEmissionOffsetZ.index()],
        );

        let (cur_m, prev_m) = if sources.is_empty() {
            (Mat4::IDENTITY, Mat4::IDENTITY)
        } else {
            let entry = sources[self.source_cursor % sources.len()];
            self.source_cursor = self.source_cursor.wrapping_add(1);
            entry
        };
        let world_cur = cur_m.transform_point3(local);
        let world_prev = prev_m.transform_point3(local);
        let spawn_pos = world_prev.lerp(world_cur, 1.0 - mt);

        let rotation_axis = {
            let v = Vec3::new(
                self.rng.signed_unit(),
                self.rng.signed_unit(),
                self.rng.signed_unit(),
            );
            if v.length_squared() > 1e-12 {
                v.normalize()
            } else {
                Vec3::Z
            }
        };

        let direction = match target_position {
            Some(target) => {
                let d = target - cur_m.transform_point3(Vec3::ZERO);
                if d.length_squared() > 1e-12 {
                    d.normalize()
                } else {
                    Vec3::Z
                }
            }
            None => loop {
                let v = Vec3::new(
                    self.rng.signed_unit(),
                    self.rng.signed_unit(),
                    self.rng.signed_unit(),
                );
                if v.length_squared() > 0.0625 {
                    break v.normalize();
                }
            },
        };
        let speed = 0.01
            * (slot_results[SlotIndex::EmissionVelocity.index()]
                + self.rng.unit() * slot_results[SlotIndex::EmissionVelocityChaos.index()]);
        let velocity = direction * speed;

        let mut rotation_speed = slot_results[SlotIndex::EmissionRotation.index()]
            + self.rng.unit() * slot_results[SlotIndex::EmissionRotationChaos.index()];
        if self.two_dir_rotate && self.rng.coin_flip() {
            rotation_speed = -rotation_speed;
        }

        let scale_chaos = (1.0
            + (self.rng.unit() * 2.0 - 1.0) * slot_results[SlotIndex::ParticleScaleChaos.index()])
        .max(0.0);
        let scale = slot_results[SlotIndex::ParticleScale.index()] * scale_chaos;
        let stretch_x = slot_results[SlotIndex::ParticleStretchX.index()] * scale;
        let stretch_y = slot_results[SlotIndex::ParticleStretchY.index()] * scale;

        let rotation = if self.rand_rotate {
            self.rng.unit() * 360.0
        } else {
            rotation_speed * mt
        };

        self.particles[idx] = Particle {
            position: spawn_pos + velocity * mt,
            velocity,
            rotation,
            rotation_speed,
            rotation_axis,
            scale,
            scale_chaos,
            stretch_x,
            stretch_y,
            chaos: self.rng.unit(),
            max_life,
            life_left: max_life,
            rand_seed: self.rng.unit(),
        };
    }
}
