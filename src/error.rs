//! Error types for `animcore`.
//!
//! The core operates on pre-validated data and fails conservatively at
//! runtime (see the module docs on `curve`, `waveform`, and `emitter` for the
//! canonical fallbacks). The only place this crate returns `Result` is at
//! construction time, where a malformed asset must be rejected before it can
//! corrupt a slot array or other fixed-size buffer.

use std::fmt;

/// Errors raised while constructing core data (curves, bindings, scenes).
///
/// These represent the "Unrecoverable (fatal)" category from the error
/// taxonomy: conditions that must never reach the per-frame evaluation path,
/// because there they would index out of bounds or silently corrupt state.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A clip spline binding's slot index is not a valid entry in the slot
    /// taxonomy.
    SlotIndexOutOfRange {
        /// The offending index.
        index: u32,
        /// `N_SLOTS`, the exclusive upper bound.
        max: u32,
    },
    /// Two keys in the same curve share a time tick.
    DuplicateKeyTime {
        /// The duplicated tick value.
        time: u8,
    },
    /// A curve was constructed with zero keys and no default-kind tag.
    EmptyCurve,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::SlotIndexOutOfRange { index, max } => write!(
                f,
                "slot index {index} is out of range (N_SLOTS = {max}); binding must be rejected at load time"
            ),
            BuildError::DuplicateKeyTime { time } => {
                write!(f, "duplicate key at tick {time} in the same curve")
            }
            BuildError::EmptyCurve => {
                write!(f, "curve has zero keys and no default-kind tag")
            }
        }
    }
}

impl std::error::Error for BuildError {}
