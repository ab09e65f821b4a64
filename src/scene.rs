//! Scene driver: per-frame ordering across a flat object list.
//!
//! Scene graph traversal order and matrix composition are an external
//! caller's responsibility (spec.md §1) — `current_matrix`/`previous_matrix`
//! arrive already computed. What this module owns is the part spec.md §5
//! does put in scope: resolving every object's animation before any emitter
//! consults affector state, then running each emitter's fixed-timestep loop
//! (the "two-pass structure when affectors and emitters coexist").

use glam::Vec3;

use crate::object::{ObjectType, SceneObject};
use crate::resolver;

/// Hard cap on affectors considered per scene (spec.md §4.8).
pub const MAX_AFFECTORS: usize = 256;

/// A flat list of objects plus the minimal parent bookkeeping C7's
/// multi-source emitter rule needs (collecting a parented object's current
/// and previous matrices) — not a general scene graph.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    /// `parents[i]` is the index of `objects[i]`'s parent, if any.
    pub parents: Vec<Option<usize>>,
    /// Which clip (if any) is active on each object this frame.
    pub active_clip: Vec<Option<usize>>,
    /// The object index an emitter aims at, if it has a target (spec.md
    /// §4.7 "Velocity direction").
    pub targets: Vec<Option<usize>>,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>) -> Self {
        let n = objects.len();
        Self {
            objects,
            parents: vec![None; n],
            active_clip: vec![None; n],
            targets: vec![None; n],
        }
    }

    /// Run one frame: resolve every object's active-clip animation, refresh
    /// affector world state, then tick every emitter against the refreshed
    /// affector list (spec.md §5 ordering guarantees).
    pub fn update(&mut self, t: f32, dt: f32) {
        for i in 0..self.objects.len() {
            if let Some(clip_index) = self.active_clip[i] {
                resolver::calculate_animation(&mut self.objects[i], clip_index, t);
            }
        }

        for obj in &mut self.objects {
            if let ObjectType::Affector(affector) = &mut obj.object_type {
                affector.inverse_world_matrix = obj.current_matrix.inverse();
                affector.world_origin = obj.current_matrix.transform_point3(Vec3::ZERO);
            }
        }

        // More than `MAX_AFFECTORS` in a scene is silently truncated, not
        // reported — the tool pipeline is expected to prevent it (spec.md §7).
        let affectors: Vec<_> = self
            .objects
            .iter()
            .filter_map(|obj| match &obj.object_type {
                ObjectType::Affector(affector) => Some(affector.clone()),
                _ => None,
            })
            .take(MAX_AFFECTORS)
            .collect();

        for i in 0..self.objects.len() {
            let sources = self.collect_sources(i);
            let target_position = self.targets[i].map(|t| self.objects[t].current_matrix.transform_point3(Vec3::ZERO));
            let slot_results = self.objects[i].slot_results;
            if let ObjectType::Emitter(emitter) = &mut self.objects[i].object_type {
                emitter.tick(dt, &slot_results, &sources, target_position, &affectors);
            }
        }
    }

    /// Current/previous matrix pairs of every object parented to `owner`,
    /// plus the owner's own, in index order (spec.md §4.7 "Multi-source").
    fn collect_sources(&self, owner: usize) -> Vec<(glam::Mat4, glam::Mat4)> {
        let mut sources: Vec<(glam::Mat4, glam::Mat4)> = self
            .parents
            .iter()
            .enumerate()
            .filter(|(_, parent)| **parent == Some(owner))
            .map(|(i, _)| (self.objects[i].current_matrix, self.objects[i].previous_matrix))
            .collect();
        sources.push((
            self.objects[owner].current_matrix,
            self.objects[owner].previous_matrix,
        ));
        sources
    }
}
