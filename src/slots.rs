//! Animatable slot taxonomy (§3).
//!
//! A fixed, contiguous-integer enum indexing `slot_results`, not a map —
//! the point of the fixed array is O(1) access without hashing (spec.md
//! §9's "raw array + index enum" note). Gaps in the numbering are reserved;
//! `slot_results` entries at those indices are simply never written and
//! stay at their zero initial value.

/// Exclusive upper bound on a valid slot index.
pub const N_SLOTS: usize = 57;

/// One of the ~57 fixed animatable property slots.
///
/// `MaterialParam` (0) is a special wildcard: a binding with this target
/// type writes through the material spline batch (C5), never through
/// `slot_results`. `Rotation` (4) writes its first component into
/// `slot_results[4]` to preserve the "always reflects the slot enum"
/// invariant, but the authoritative value lives in `rotation_result`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SlotIndex {
    MaterialParam = 0,
    ScaleX = 1,
    ScaleY = 2,
    ScaleZ = 3,
    Rotation = 4,
    SubsceneClipIndex = 5,
    SubsceneTimeOffset = 6,
    PositionX = 8,
    PositionY = 9,
    PositionZ = 10,
    /// Reserved, unused by any consumer; writes accepted and ignored.
    PositionW = 11,
    LightAmbientR = 12,
    LightAmbientG = 13,
    LightAmbientB = 14,
    LightDiffuseR = 16,
    LightDiffuseG = 17,
    LightDiffuseB = 18,
    LightSpecularR = 20,
    LightSpecularG = 21,
    LightSpecularB = 22,
    SpotDirectionX = 24,
    SpotDirectionY = 25,
    SpotDirectionZ = 26,
    SpotExponent = 28,
    SpotCutoff = 29,
    SpotLinearAtten = 30,
    SpotQuadraticAtten = 31,
    CameraFov = 33,
    CameraRoll = 34,
    ParticleEmissionOffsetX = 37,
    ParticleEmissionOffsetY = 38,
    ParticleEmissionOffsetZ = 39,
    EmissionPerSecond = 40,
    EmissionTrigger = 41,
    EmissionVelocity = 42,
    EmissionVelocityChaos = 43,
    Life = 44,
    LifeChaos = 45,
    EmissionRotation = 46,
    EmissionRotationChaos = 47,
    LightShadowExtentX = 48,
    LightShadowExtentY = 49,
    AffectorPower = 50,
    ParticleScale = 51,
    ParticleScaleChaos = 52,
    ParticleStretchX = 53,
    ParticleStretchY = 54,
    SubsceneRepeatCount = 55,
    SubsceneRepeatTimeOffset = 56,
}

impl SlotIndex {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The non-zero-default slots (§3 table), used for the sparse reset step in
/// the animation resolver. Everything not listed here defaults to `0.0` and
/// relies on `slot_results` having been zero-initialized at construction —
/// implementers must not loop over all of `N_SLOTS` to re-zero every frame.
pub const NON_ZERO_DEFAULTS: &[(SlotIndex, f32)] = &[
    (SlotIndex::ScaleX, 1.0),
    (SlotIndex::ScaleY, 1.0),
    (SlotIndex::ScaleZ, 1.0),
    (SlotIndex::LightDiffuseR, 1.0),
    (SlotIndex::LightDiffuseG, 1.0),
    (SlotIndex::LightDiffuseB, 1.0),
    (SlotIndex::LightSpecularR, 1.0),
    (SlotIndex::LightSpecularG, 1.0),
    (SlotIndex::LightSpecularB, 1.0),
    (SlotIndex::CameraFov, 1.0),
    (SlotIndex::EmissionPerSecond, 25.0),
    (SlotIndex::EmissionVelocity, 1.0),
    (SlotIndex::Life, 10.0),
    (SlotIndex::LightShadowExtentX, 1.0),
    (SlotIndex::LightShadowExtentY, 1.0),
    (SlotIndex::AffectorPower, 1.0),
    (SlotIndex::ParticleScale, 1.0),
    (SlotIndex::ParticleStretchX, 1.0),
    (SlotIndex::ParticleStretchY, 1.0),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_slot_indices_fit_in_bounds() {
        for &(slot, _) in NON_ZERO_DEFAULTS {
            assert!(slot.index() < N_SLOTS);
        }
    }

    #[test]
    fn defaults_match_spec_table() {
        let find = |s: SlotIndex| NON_ZERO_DEFAULTS.iter().find(|(slot, _)| *slot == s).map(|(_, v)| *v);
        assert_eq!(find(SlotIndex::ScaleX), Some(1.0));
        assert_eq!(find(SlotIndex::EmissionPerSecond), Some(25.0));
        assert_eq!(find(SlotIndex::Life), Some(10.0));
        assert_eq!(find(SlotIndex::LightAmbientR), None);
    }
}
