//! Particle render dispatch (C9).
//!
//! GPU upload, shader binding, and mesh tessellation are external
//! collaborators (spec.md §1) — this module's job stops at producing the
//! CPU-side data a renderer would upload: billboard vertex records, a baked
//! lifetime-spline texture, and per-particle stamp transforms for the mesh
//! and subscene dispatch modes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

use crate::material::{GroupingTag, MaterialSplineBatch};
use crate::particle::Particle;

/// One instance record for the billboard path (spec.md §4.9 step 2): 8
/// floats, `(position, 1, life_remaining, rotation, chaos, 0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BillboardVertex {
    pub position: Vec3,
    pub w: f32,
    pub life_remaining: f32,
    pub rotation: f32,
    pub chaos: f32,
    _reserved: f32,
}

/// Reserved grouping tag for material splines baked into the per-lifetime
/// texture (the source's `PARTICLE_LIFE_FLOAT` tag, spec.md §4.9 step 3).
/// Any other tag value is applied normally through [`MaterialSplineBatch::apply_to_parameters`].
pub const PARTICLE_LIFE_FLOAT_TAG: u64 = u64::MAX;

/// Row resolution of the baked lifetime texture.
pub const LIFETIME_TEXTURE_WIDTH: usize = 2048;

/// Build one [`BillboardVertex`] per alive particle, smoothing the 25-tick
/// simulation to render frame rate with `ticks_remainder ∈ [0, 1)` (the
/// fraction of a tick not yet consumed by the accumulator). When `sort` is
/// set, vertices are ordered back-to-front along `view_forward` using a
/// parallel `(index, depth)` key so `particles` itself is untouched.
pub fn build_billboard_vertices(
    particles: &[Particle],
    ticks_remainder: f32,
    sort: bool,
    view_forward: Vec3,
) -> Vec<BillboardVertex> {
    let mut alive: Vec<usize> = particles
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_alive())
        .map(|(i, _)| i)
        .collect();

    if sort {
        alive.sort_by(|&a, &b| {
            let depth_a = particles[a].position.dot(view_forward);
            let depth_b = particles[b].position.dot(view_forward);
            depth_b.partial_cmp(&depth_a).unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    alive
        .into_iter()
        .map(|i| {
            let p = &particles[i];
            BillboardVertex {
                position: p.position + p.velocity * ticks_remainder,
                w: 1.0,
                life_remaining: p.life_remaining(),
                rotation: p.rotation + p.rotation_speed * ticks_remainder,
                chaos: p.chaos,
                _reserved: 0.0,
            }
        })
        .collect()
}

/// Bake every `PARTICLE_LIFE_FLOAT`-tagged material record into a
/// `LIFETIME_TEXTURE_WIDTH × n_params` row-major float table, sampled
/// in-shader by `u = life_remaining`, `v = parameter row` (spec.md §4.9
/// step 3). Only each record's first component is baked — the tagged
/// parameters are scalars, not colors.
pub fn bake_lifetime_texture(batch: &MaterialSplineBatch) -> (Vec<f32>, usize) {
    let records: Vec<_> = batch
        .records()
        .iter()
        .filter(|r| r.grouping_tag == PARTICLE_LIFE_FLOAT_TAG)
        .collect();
    let n_params = records.len();
    let mut texture = vec![0.0f32; LIFETIME_TEXTURE_WIDTH * n_params];
    for (row, record) in records.iter().enumerate() {
        let Some(curve) = record.components.first() else {
            continue;
        };
        for u in 0..LIFETIME_TEXTURE_WIDTH {
            let t = u as f32 / (LIFETIME_TEXTURE_WIDTH - 1) as f32;
            texture[row * LIFETIME_TEXTURE_WIDTH + u] = curve.evaluate(t).x;
        }
    }
    (texture, n_params)
}

/// A single mesh-stamp transform for the mesh-emission dispatch mode
/// (spec.md §4.9 "Mesh mode"): orientation is either axis-angle from the
/// particle's own spin, or velocity-aligned when `rotate_to_direction`.
pub fn mesh_stamp_transform(particle: &Particle, rotate_to_direction: bool) -> Mat4 {
    let orientation = if rotate_to_direction && particle.velocity.length_squared() > 1e-12 {
        Quat::from_rotation_arc(Vec3::Z, particle.velocity.normalize())
    } else {
        Quat::from_axis_angle(particle.rotation_axis, particle.rotation.to_radians())
    };
    let scale = Vec3::new(
        particle.stretch_x.max(particle.scale),
        particle.stretch_y.max(particle.scale),
        particle.scale,
    );
    Mat4::from_scale_rotation_translation(scale, orientation, particle.position)
}

/// Evaluate the emitter's per-lifetime material spline batch at a mesh
/// particle's normalized age and write the results into `params` tagged
/// `tag` (spec.md §4.9 "Mesh mode": "evaluate the material-spline batch at
/// the same age"). Normalized age runs `0` at spawn to `1` at death, the same
/// convention `subscene_stamps` uses below — `life_remaining` runs the other
/// way, so it's inverted here.
pub fn evaluate_mesh_particle_materials(
    batch: &MaterialSplineBatch,
    particle: &Particle,
    tag: GroupingTag,
    params: &mut [glam::Vec4],
) {
    batch.calculate_values(1.0 - particle.life_remaining());
    batch.apply_to_parameters(tag, params);
}

/// One per-particle invocation request for the subscene dispatch mode
/// (spec.md §4.9 "Subscene mode"): the particle's transform becomes the
/// nested scene's root matrix, and its normalized age becomes the nested
/// scene's time. Recursing into the nested scene graph itself is the
/// caller's job — `update_scene_graph` is an external collaborator.
pub struct SubsceneStamp {
    pub root_matrix: Mat4,
    pub normalized_age: f32,
}

pub fn subscene_stamps(particles: &[Particle], rotate_to_direction: bool) -> Vec<SubsceneStamp> {
    particles
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| SubsceneStamp {
            root_matrix: mesh_stamp_transform(p, rotate_to_direction),
            normalized_age: 1.0 - p.life_remaining(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Curve, DefaultKind, ValueKind};
    use crate::material::{MaterialParamHandle, MaterialSplineRecord};

    fn alive_particle(x: f32) -> Particle {
        Particle {
            position: Vec3::new(x, 0.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            max_life: 10,
            life_left: 5,
            ..Particle::ZEROED
        }
    }

    #[test]
    fn billboard_vertices_only_include_alive_particles() {
        let particles = vec![alive_particle(0.0), Particle::ZEROED, alive_particle(1.0)];
        let verts = build_billboard_vertices(&particles, 0.0, false, Vec3::Z);
        assert_eq!(verts.len(), 2);
        assert_eq!(verts[0].w, 1.0);
    }

    #[test]
    fn billboard_sort_orders_back_to_front() {
        let particles = vec![alive_particle(0.0), alive_particle(5.0), alive_particle(-5.0)];
        let verts = build_billboard_vertices(&particles, 0.0, true, Vec3::X);
        let depths: Vec<f32> = verts.iter().map(|v| v.position.x).collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn lifetime_texture_has_expected_shape() {
        let curve = Curve::new_default(DefaultKind::ConstantValue(0.5), ValueKind::Scalar);
        let batch = MaterialSplineBatch::new(vec![MaterialSplineRecord {
            components: vec![curve],
            target: MaterialParamHandle(0),
            grouping_tag: PARTICLE_LIFE_FLOAT_TAG,
        }]);
        let (texture, n_params) = bake_lifetime_texture(&batch);
        assert_eq!(n_params, 1);
        assert_eq!(texture.len(), LIFETIME_TEXTURE_WIDTH);
        assert!(texture.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn untagged_records_are_excluded_from_the_bake() {
        let curve = Curve::new_default(DefaultKind::One, ValueKind::Scalar);
        let batch = MaterialSplineBatch::new(vec![MaterialSplineRecord {
            components: vec![curve],
            target: MaterialParamHandle(0),
            grouping_tag: 7,
        }]);
        let (_texture, n_params) = bake_lifetime_texture(&batch);
        assert_eq!(n_params, 0);
    }

    #[test]
    fn mesh_stamp_transform_places_particle_at_its_position() {
        let p = alive_particle(3.0);
        let m = mesh_stamp_transform(&p, false);
        let (_, _, translation) = m.to_scale_rotation_translation();
        assert_eq!(translation, Vec3::new(3.0, 0.0, 0.0));
    }
}
