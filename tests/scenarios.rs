//! End-to-end scenarios (spec.md §8), exercised through the public API
//! rather than any single module's internals.

use std::rc::Rc;

use animcore::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn scenario_1_constant_scalar_fade() {
    init_logging();
    let curve = Curve::new(
        vec![Key::scalar(0, 0.0), Key::scalar(255, 1.0)],
        Interpolation::Linear,
        false,
        ValueKind::Scalar,
    )
    .unwrap();
    let v = curve.evaluate(0.5).x;
    assert!((v - 0.5).abs() < 0.02);
}

#[test]
fn scenario_2_sine_modulated_brightness() {
    // A Constant-interpolation curve with one real key, not the unrelated
    // `DefaultKind::ConstantValue` short-circuit tag (which bypasses waveform
    // modulation entirely, since `Curve::evaluate` returns it unconditionally).
    let curve = Curve::new(vec![Key::scalar(0, 2.0)], Interpolation::Constant, false, ValueKind::Scalar)
        .unwrap()
        .with_waveform(Waveform::Sin, 0.5, 4.0, true, 0);
    assert!((curve.evaluate(0.0).x - 2.0).abs() < 1e-4);
    assert!((curve.evaluate(1.0 / 16.0).x - 2.5).abs() < 1e-3);
    assert!((curve.evaluate(1.0 / 8.0).x - 2.0).abs() < 1e-3);
    assert!((curve.evaluate(3.0 / 16.0).x - 1.5).abs() < 1e-3);
}

#[test]
fn scenario_4_emission_accumulator() {
    let mut emitter = Emitter::new(EmitterShape::Box, 8, 1, 0, 0, true, false, false, false, false);
    let mut slots = [0.0f32; N_SLOTS];
    slots[SlotIndex::EmissionPerSecond.index()] = 100.0;
    slots[SlotIndex::Life.index()] = 10.0;

    emitter.tick(0.04, &slots, &[], None, &[]);
    assert_eq!(emitter.alive_count(), 4);

    for _ in 0..10 {
        emitter.tick(0.04, &slots, &[], None, &[]);
    }
    assert_eq!(emitter.alive_count(), 44);

    slots[SlotIndex::EmissionPerSecond.index()] = 0.0;
    for _ in 0..250 {
        emitter.tick(0.04, &slots, &[], None, &[]);
    }
    assert_eq!(emitter.alive_count(), 0);
}

#[test]
fn scenario_5_motion_interpolation_fills_gaps() {
    let mut emitter = Emitter::new(EmitterShape::Box, 8, 2, 0, 0, true, false, false, false, false);
    let mut slots = [0.0f32; N_SLOTS];
    slots[SlotIndex::EmissionPerSecond.index()] = 250.0;
    slots[SlotIndex::Life.index()] = 10.0;

    let previous = Mat4::IDENTITY;
    let current = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
    emitter.tick(0.04, &slots, &[(current, previous)], None, &[]);

    let xs: Vec<f32> = emitter
        .particles()
        .iter()
        .filter(|p| p.is_alive())
        .map(|p| p.position.x)
        .collect();
    assert!(xs.len() >= 8);
    assert!(xs.iter().any(|&x| x < 1.0));
    assert!(xs.iter().any(|&x| x > 9.0));
}

#[test]
fn scenario_6_slot_routing() {
    let curve = Curve::new_default(DefaultKind::ConstantValue(0.3), ValueKind::Scalar);
    let binding = ClipSplineBinding {
        target: BindingTarget::Slot(SlotIndex::LightDiffuseG),
        curve,
        material_param: None,
        grouping_tag: 0,
    };
    let clip = Rc::new(ObjectClip {
        bindings: vec![binding],
        material_spline_batch: MaterialSplineBatch::default(),
        subscene_target: None,
        rand_seed: 0,
        turbulence_frequency: 0.0,
    });

    let mut object = SceneObject::new(ObjectType::Light);
    object.clips.push(Some(clip));
    calculate_animation(&mut object, 0, 0.5);

    assert_eq!(object.slot_results[SlotIndex::LightDiffuseG.index()], 0.3);
    assert_eq!(object.slot_results[SlotIndex::LightDiffuseR.index()], 1.0);
    assert_eq!(object.slot_results[SlotIndex::LightDiffuseB.index()], 1.0);
    assert_eq!(object.slot_results[SlotIndex::Rotation.index()], 0.0);
    assert_eq!(object.rotation_result, Quat::IDENTITY);
}
