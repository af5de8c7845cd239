// src/take/mod.rs
// ============================================================================
// TAKE - Lectura de tomas de captura de movimiento
// ============================================================================
//
// Una toma es un directorio:
//   data.mStream  → muestras por frame (binario)
//   take.mTake    → canales presentes por nodo (JSON)
//
// ============================================================================

pub mod locate;
pub mod schema;
pub mod stream;

use std::path::Path;

pub use locate::{default_take_root, locate_latest_take, TAKE_ROOT_ENV};
pub use schema::{build_schema_index, ChannelTag, NodeMap, TakeMetadata};
pub use stream::{read_take_info, read_take_stream, write_take_stream, TakeInfo, TakeStream};

pub const STREAM_FILE: &str = "data.mStream";
pub const METADATA_FILE: &str = "take.mTake";

pub fn stream_path(take_dir: &Path) -> std::path::PathBuf {
    take_dir.join(STREAM_FILE)
}

pub fn metadata_path(take_dir: &Path) -> std::path::PathBuf {
    take_dir.join(METADATA_FILE)
}
