// src/bob/writer.rs
// ============================================================================
// BOB WRITER - Serializa canales al formato de texto de BoB
// ============================================================================
//
// Por joint:
//
//   % Hips = pelvis
//   pelvis.time=[0.0 0.01]
//   pelvis.rotx=[...]
//   ...
//   <línea en blanco>
//
// Todo el texto se construye en memoria y se escribe de una vez con
// archivo temporal + rename en el mismo directorio: una conversión fallida
// nunca deja un data.txt a medias.
//
// El temporal nace con 0600; antes del rename recibe el modo que tendría un
// archivo creado normalmente (0666 menos umask), o el del data.txt que
// reemplaza.
//
// ============================================================================

use std::fmt::Write as _;
use std::fs::{self, Permissions};
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::{ConvertError, Result};
use crate::retarget::ChannelSet;

/// Representación decimal más corta que reconstruye el valor.
/// Enteros con ".0" (1.0, 0.0); no finitos como NaN / Inf / -Inf.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "Inf".to_string() } else { "-Inf".to_string() }
    } else {
        format!("{:?}", v)
    }
}

fn write_series(out: &mut String, target: &str, name: &str, values: &[f64]) {
    let _ = write!(out, "{}.{}=[", target, name);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format_value(*v));
    }
    out.push_str("]\n");
}

/// Buffer del archivo de salida
#[derive(Debug, Default)]
pub struct BobWriter {
    text: String,
}

impl BobWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Añade el bloque de un joint
    pub fn write_joint(&mut self, set: &ChannelSet) {
        let _ = writeln!(self.text, "% {} = {}", set.source, set.target);
        write_series(&mut self.text, &set.target, "time", &set.time);
        for channel in &set.channels {
            write_series(&mut self.text, &set.target, &channel.name, &channel.values);
        }
        self.text.push('\n');
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Escribe el buffer completo en `path` (temporal + rename)
    pub fn finalize(self, path: &Path) -> Result<usize> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = create_temp(dir)?;
        if let Ok(existing) = fs::metadata(path) {
            set_mode(&tmp, existing.permissions())?;
        }
        tmp.write_all(self.text.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| ConvertError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| ConvertError::io(path, e.error))?;

        Ok(self.text.len())
    }
}

/// Temporal en `dir` con el modo por defecto de un archivo nuevo
#[cfg(unix)]
fn create_temp(dir: &Path) -> Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    // open(2) aplica la umask sobre 0666
    Builder::new()
        .prefix(".data")
        .permissions(Permissions::from_mode(0o666))
        .tempfile_in(dir)
        .map_err(|e| ConvertError::io(dir, e))
}

#[cfg(not(unix))]
fn create_temp(dir: &Path) -> Result<NamedTempFile> {
    Builder::new()
        .prefix(".data")
        .tempfile_in(dir)
        .map_err(|e| ConvertError::io(dir, e))
}

fn set_mode(tmp: &NamedTempFile, perms: Permissions) -> Result<()> {
    tmp.as_file()
        .set_permissions(perms)
        .map_err(|e| ConvertError::io(tmp.path(), e))
}

/// Texto completo para una lista ordenada de joints
pub fn render(sets: &[ChannelSet]) -> String {
    let mut writer = BobWriter::new();
    for set in sets {
        writer.write_joint(set);
    }
    writer.into_string()
}

/// Escribe todos los joints en `path`; devuelve los bytes escritos
pub fn write_channels(path: &Path, sets: &[ChannelSet]) -> Result<usize> {
    let mut writer = BobWriter::new();
    for set in sets {
        writer.write_joint(set);
    }
    writer.finalize(path)
}
