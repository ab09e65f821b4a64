//! # animcore
//!
//! The animation and particle core of a real-time 3D demo engine: keyframed
//! scalar/quaternion curves, a fixed taxonomy of ~57 animatable object
//! slots, and a CPU-simulated particle system driven by that same animation
//! core.
//!
//! Three tightly coupled subsystems, leaves first:
//!
//! 1. **Spline evaluation** ([`key`], [`interpolate`], [`waveform`],
//!    [`curve`]) — half-float keyframe storage, four interpolation modes
//!    across scalar and quaternion values, five waveform post-processors.
//! 2. **Per-object animation resolution** ([`slots`], [`object`],
//!    [`material`], [`resolver`]) — dispatches evaluated curves into a fixed
//!    slot array and a parallel material-parameter batch.
//! 3. **CPU particle simulation** ([`particle`], [`rng`], [`noise3d`],
//!    [`affector`], [`emitter`], [`render_dispatch`]) — fixed-timestep
//!    emitter/affector integration with three render-dispatch modes.
//!
//! [`scene`] ties the three together into the per-frame ordering spec.md §5
//! requires: resolve animation, refresh affector state, then tick emitters.
//!
//! GPU upload, shader compilation, asset import, and scene-graph traversal
//! order are deliberately out of scope — this crate produces the data those
//! external systems consume.
//!
//! ## Quick start
//!
//! ```ignore
//! use animcore::prelude::*;
//!
//! let curve = Curve::new(
//!     vec![Key::scalar(0, 0.0), Key::scalar(255, 1.0)],
//!     Interpolation::Linear,
//!     false,
//!     ValueKind::Scalar,
//! )?;
//! let value = curve.evaluate(0.5);
//! ```

pub mod affector;
pub mod curve;
pub mod emitter;
pub mod error;
pub mod interpolate;
pub mod key;
pub mod material;
pub mod noise3d;
pub mod object;
pub mod particle;
pub mod render_dispatch;
pub mod resolver;
pub mod rng;
pub mod scene;
pub mod slots;
pub mod waveform;

pub use bytemuck;
pub use error::BuildError;
pub use glam::{Mat4, Quat, Vec3, Vec4};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use animcore::prelude::*;
/// ```
pub mod prelude {
    pub use crate::affector::{Affector, AffectorKind, AreaType};
    pub use crate::curve::{Curve, DefaultKind, Interpolation, ValueKind};
    pub use crate::emitter::{Emitter, EmitterShape};
    pub use crate::key::Key;
    pub use crate::material::{GroupingTag, MaterialParamHandle, MaterialSplineBatch, MaterialSplineRecord};
    pub use crate::object::{BindingTarget, ClipSplineBinding, ObjectClip, ObjectType, SceneObject};
    pub use crate::particle::Particle;
    pub use crate::resolver::calculate_animation;
    pub use crate::scene::Scene;
    pub use crate::slots::{SlotIndex, N_SLOTS};
    pub use crate::waveform::Waveform;
    pub use crate::BuildError;
    pub use crate::{Mat4, Quat, Vec3, Vec4};
}
