// src/bob/mod.rs
// ============================================================================
// BOB - Formato de texto de canales para el simulador BoB
// ============================================================================

pub mod writer;

pub use writer::{format_value, render, write_channels, BobWriter};

/// Nombre por defecto del archivo de salida dentro de la toma
pub const OUTPUT_FILE: &str = "data.txt";
