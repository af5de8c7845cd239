// src/lib.rs
// ============================================================================
// TAKE2BOB - Conversor de tomas de captura de movimiento a canales BoB
// ============================================================================

pub mod bob;
pub mod builder;
pub mod error;
pub mod frame;
pub mod mapping;
pub mod quat;
pub mod retarget;
pub mod take;

// Re-exports principales
pub use bob::{render, write_channels, BobWriter};
pub use builder::{process_take, process_takes, BuildStats};
pub use error::{ConvertError, Result};
pub use frame::FrameTable;
pub use mapping::{AxisRemap, JointKind, JointSpec, RetargetConfig};
pub use quat::{Quat, QuatSeries};
pub use retarget::{retarget, Channel, ChannelSet};
pub use take::{locate_latest_take, NodeMap, TakeInfo};
