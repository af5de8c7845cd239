// src/mapping/mod.rs
// ============================================================================
// MAPPING - Esqueleto origen (Shadow) → esqueleto BoB
// ============================================================================

pub mod config;
pub mod shadow;
pub mod types;

// Re-exports
pub use config::{RetargetConfig, DEFAULT_TRANSLATION_SCALE};
pub use shadow::{shadow_to_bob, ROOT_JOINT};
pub use types::{Axis, AxisRemap, JointKind, JointSpec};
