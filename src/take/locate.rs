// src/take/locate.rs
// ============================================================================
// TAKE LOCATOR - Busca la toma más reciente
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;

use crate::error::{ConvertError, Result};
use super::STREAM_FILE;

/// Variable de entorno con el directorio raíz de tomas
pub const TAKE_ROOT_ENV: &str = "TAKE2BOB_TAKE_ROOT";

/// Directorio raíz por defecto: $TAKE2BOB_TAKE_ROOT o ~/Documents/Motion/take
pub fn default_take_root() -> PathBuf {
    if let Some(root) = std::env::var_os(TAKE_ROOT_ENV) {
        return PathBuf::from(root);
    }

    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    home.join("Documents").join("Motion").join("take")
}

/// Devuelve el subdirectorio con data.mStream modificado más recientemente
pub fn locate_latest_take(root: Option<&Path>) -> Result<PathBuf> {
    let root = root.map(Path::to_path_buf).unwrap_or_else(default_take_root);

    let entries = std::fs::read_dir(&root).map_err(|e| ConvertError::io(&root, e))?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.filter_map(|e| e.ok()) {
        let dir = entry.path();
        let stream = dir.join(STREAM_FILE);
        let modified = match std::fs::metadata(&stream).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => continue,
        };

        debug!("candidate take {}", dir.display());

        if newest.as_ref().map_or(true, |(t, _)| modified > *t) {
            newest = Some((modified, dir));
        }
    }

    newest.map(|(_, dir)| dir).ok_or_else(|| {
        ConvertError::io(
            &root,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no take directory with {} found", STREAM_FILE),
            ),
        )
    })
}
