// src/error.rs
// ============================================================================
// ERRORS - Taxonomía de errores de conversión
// ============================================================================
//
// Io     → no se puede leer la toma o escribir el destino
// Format → stream o metadata estructuralmente inválidos
// Schema → falta un joint o un canal en el node map
// Shape  → el buffer no cuadra con stride × num_frame
//
// Todos son fatales para la toma afectada. Los casos numéricos (asin fuera
// de dominio, cuaterniones degenerados) se recortan, no se reportan.
//
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid format in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Shape error: {0}")]
    Shape(String),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Format { path: path.into(), reason: reason.into() }
    }

    /// True si el error es "no existe" (distinto de un archivo corrupto)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_format() {
        let missing = ConvertError::io(
            "take/data.mStream",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(missing.is_not_found());

        let corrupt = ConvertError::format("take/data.mStream", "truncated header");
        assert!(!corrupt.is_not_found());
        assert!(corrupt.to_string().contains("truncated header"));
    }
}
