//! Animation resolver (C6): per-object, per-clip slot dispatch.
//!
//! `calculate_animation` is the one place that turns evaluated curves into
//! the slot array and rotation result a transform/light/camera/particle
//! consumer reads. It holds no state of its own — everything it touches
//! lives on the `SceneObject` it's given, so resolving two objects on two
//! threads needs no locking (spec.md §4.6).

use glam::Quat;

use crate::curve::ValueKind;
use crate::object::{BindingTarget, SceneObject};
use crate::slots::{SlotIndex, NON_ZERO_DEFAULTS};

/// Evaluate `object.clips[clip_index]` at time `t` and write the results
/// into `object.slot_results`, `object.rotation_result`, and the material
/// spline batch's calculated values.
pub fn calculate_animation(object: &mut SceneObject, clip_index: usize, t: f32) {
    reset_defaults(object);

    let Some(clip) = object.clips.get(clip_index).and_then(|c| c.clone()) else {
        // spec.md §7: treated as "no animation", not a fault — logged in
        // debug builds only.
        log::debug!("clip index {clip_index} out of range or unset; slots retain their defaults");
        return;
    };

    for binding in &clip.bindings {
        let value = binding.curve.evaluate(t);
        match binding.target {
            BindingTarget::Slot(SlotIndex::Rotation) => {
                object.rotation_result = Quat::from_xyzw(value.x, value.y, value.z, value.w);
                object.slot_results[SlotIndex::Rotation.index()] = value.x;
            }
            BindingTarget::Slot(slot) => {
                object.slot_results[slot.index()] = value.x;
            }
            BindingTarget::MaterialParam => {
                // Handled by the material spline batch below; this binding
                // carries no slot_results write of its own.
            }
        }
        debug_assert!(
            binding.curve.value_kind() != ValueKind::Quaternion
                || matches!(binding.target, BindingTarget::Slot(SlotIndex::Rotation)),
            "a quaternion-valued curve bound to a non-rotation slot makes no sense",
        );
    }

    clip.material_spline_batch.calculate_values(t);

    object.subscene_target = clip.subscene_target;
    if let crate::object::ObjectType::Affector(affector) = &mut object.object_type {
        affector.power = object.slot_results[SlotIndex::AffectorPower.index()];
        if let crate::affector::AffectorKind::Turbulence { frequency, kernel } =
            &mut affector.kind
        {
            *frequency = clip.turbulence_frequency;
            kernel.reseed_if_needed(clip.rand_seed);
        }
    }
}

/// Overwrite only the slots with a non-zero default (spec.md §3 taxonomy
/// table); every other slot stays at the zero it was constructed with.
fn reset_defaults(object: &mut SceneObject) {
    for &(slot, default) in NON_ZERO_DEFAULTS {
        object.slot_results[slot.index()] = default;
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::curve::{Curve, DefaultKind, Interpolation};
    use crate::key::Key;
    use crate::material::MaterialSplineBatch;
    use crate::object::{ClipSplineBinding, ObjectClip, ObjectType};

    fn clip_with(bindings: Vec<ClipSplineBinding>) -> Rc<ObjectClip> {
        Rc::new(ObjectClip {
            bindings,
            material_spline_batch: MaterialSplineBatch::default(),
            subscene_target: None,
            rand_seed: 0,
            turbulence_frequency: 0.0,
        })
    }

    #[test]
    fn reset_writes_only_nonzero_defaults() {
        let mut obj = SceneObject::new(ObjectType::Mesh);
        obj.slot_results[SlotIndex::PositionX.index()] = 99.0;
        calculate_animation(&mut obj, 0, 0.0);
        assert_eq!(obj.slot_results[SlotIndex::ScaleX.index()], 1.0);
        // Untouched by NON_ZERO_DEFAULTS and not bound by any clip: stays
        // at whatever it was before, since the resolver never loop-clears.
        assert_eq!(obj.slot_results[SlotIndex::PositionX.index()], 99.0);
    }

    #[test]
    fn scalar_binding_writes_target_slot() {
        let curve = Curve::new_default(DefaultKind::ConstantValue(7.5), crate::curve::ValueKind::Scalar);
        let binding = ClipSplineBinding {
            target: BindingTarget::Slot(SlotIndex::PositionX),
            curve,
            material_param: None,
            grouping_tag: 0,
        };
        let mut obj = SceneObject::new(ObjectType::Mesh);
        obj.clips.push(Some(clip_with(vec![binding])));
        calculate_animation(&mut obj, 0, 0.3);
        assert_eq!(obj.slot_results[SlotIndex::PositionX.index()], 7.5);
    }

    #[test]
    fn rotation_binding_writes_quat_result_and_slot_four() {
        let key = Key::quaternion(0, [0.0, 0.0, 0.0, 1.0]);
        let curve = Curve::new(
            vec![key],
            Interpolation::Constant,
            false,
            crate::curve::ValueKind::Quaternion,
        )
        .unwrap();
        let binding = ClipSplineBinding {
            target: BindingTarget::Slot(SlotIndex::Rotation),
            curve,
            material_param: None,
            grouping_tag: 0,
        };
        let mut obj = SceneObject::new(ObjectType::Mesh);
        obj.clips.push(Some(clip_with(vec![binding])));
        calculate_animation(&mut obj, 0, 0.0);
        assert_eq!(obj.rotation_result, Quat::IDENTITY);
        assert_eq!(obj.slot_results[SlotIndex::Rotation.index()], 0.0);
    }

    #[test]
    fn missing_clip_index_is_a_no_op_past_reset() {
        let mut obj = SceneObject::new(ObjectType::Mesh);
        calculate_animation(&mut obj, 3, 0.5);
        assert_eq!(obj.slot_results[SlotIndex::Life.index()], 10.0);
    }
}
