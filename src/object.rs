//! Scene data model: objects, clips, and spline bindings (§3).
//!
//! `ObjectClip`s are owned by the scene and may be shared by several
//! objects; `Rc` models that shared ownership without an arena/index
//! indirection layer.

use std::rc::Rc;

use glam::{Mat4, Quat};

use crate::affector::Affector;
use crate::curve::Curve;
use crate::emitter::Emitter;
use crate::material::{MaterialParamHandle, MaterialSplineBatch};
use crate::slots::{SlotIndex, N_SLOTS};

/// What a [`ClipSplineBinding`] drives: one of the fixed slots, or the
/// material-parameter wildcard (slot 0 in the taxonomy, handled through C5
/// instead of `slot_results`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingTarget {
    Slot(SlotIndex),
    MaterialParam,
}

/// `{target_type, curve, material_param, grouping_tag}` (spec.md §3).
pub struct ClipSplineBinding {
    pub target: BindingTarget,
    pub curve: Curve,
    pub material_param: Option<MaterialParamHandle>,
    pub grouping_tag: u64,
}

/// A per-object alternative animation: an ordered set of spline bindings
/// plus a parallel material spline batch and the per-clip constants the
/// resolver copies onto the object (spec.md §3, §4.6 step 4).
pub struct ObjectClip {
    pub bindings: Vec<ClipSplineBinding>,
    pub material_spline_batch: MaterialSplineBatch,
    pub subscene_target: Option<u32>,
    pub rand_seed: u8,
    pub turbulence_frequency: f32,
}

/// What kind of scene participant this object is. Emitters and affectors
/// carry their simulation state directly, matching spec.md §3's framing of
/// both as specialized scene objects rather than attached components.
pub enum ObjectType {
    Mesh,
    Light,
    Camera,
    Emitter(Emitter),
    Affector(Affector),
    Subscene,
}

/// A node in the scene graph (spec.md §3 "Scene Object").
pub struct SceneObject {
    pub clips: Vec<Option<Rc<ObjectClip>>>,
    pub slot_results: [f32; N_SLOTS],
    pub rotation_result: Quat,
    pub current_matrix: Mat4,
    pub previous_matrix: Mat4,
    pub object_type: ObjectType,
    /// Copied from the active clip during resolution (spec.md §4.6 step 4).
    pub subscene_target: Option<u32>,
}

impl SceneObject {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            clips: Vec::new(),
            slot_results: [0.0; N_SLOTS],
            rotation_result: Quat::IDENTITY,
            current_matrix: Mat4::IDENTITY,
            previous_matrix: Mat4::IDENTITY,
            object_type,
            subscene_target: None,
        }
    }

    /// Preserve this frame's `current_matrix` as next frame's
    /// `previous_matrix`, before the caller overwrites it with the new
    /// transform (spec.md §5: "callers must snapshot before overwriting").
    pub fn snapshot_matrix(&mut self) {
        self.previous_matrix = self.current_matrix;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_object_has_zeroed_slots_and_identity_transforms() {
        let obj = SceneObject::new(ObjectType::Mesh);
        assert!(obj.slot_results.iter().all(|&v| v == 0.0));
        assert_eq!(obj.rotation_result, Quat::IDENTITY);
        assert_eq!(obj.current_matrix, Mat4::IDENTITY);
        assert_eq!(obj.previous_matrix, Mat4::IDENTITY);
    }

    #[test]
    fn snapshot_preserves_prior_matrix() {
        let mut obj = SceneObject::new(ObjectType::Mesh);
        obj.current_matrix = Mat4::from_translation(glam::Vec3::new(1.0, 0.0, 0.0));
        obj.snapshot_matrix();
        assert_eq!(obj.previous_matrix, obj.current_matrix);
        obj.current_matrix = Mat4::from_translation(glam::Vec3::new(2.0, 0.0, 0.0));
        assert_ne!(obj.previous_matrix, obj.current_matrix);
    }
}
