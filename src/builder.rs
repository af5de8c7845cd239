// src/builder.rs
// ============================================================================
// BUILDER - Orquestador de conversión de una toma
// ============================================================================
//
// load → map → transform → write, una toma a la vez:
//
//   data.mStream  → TakeInfo, nodos, muestras
//   take.mTake    → NodeMap
//   muestras      → FrameTable
//   RetargetConfig + NodeMap + FrameTable → ChannelSets
//   ChannelSets   → data.txt (todo o nada)
//
// Varias tomas se convierten de forma independiente: un error en una no
// detiene las demás.
//
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{error, info};

use crate::bob::BobWriter;
use crate::error::Result;
use crate::frame::{stride_from_bytes, FrameTable};
use crate::mapping::RetargetConfig;
use crate::retarget::retarget;
use crate::take::{self, build_schema_index, read_take_stream};

/// Estadísticas de conversión
#[derive(Debug, Default, Clone)]
pub struct BuildStats {
    pub joints: usize,
    pub channels: usize,
    pub frames: usize,
    pub bytes_written: usize,
    pub output: PathBuf,
    pub elapsed: Duration,
}

/// Timer por etapas: delta desde la última llamada y total
struct StageTimer {
    start: Instant,
    last: Instant,
}

impl StageTimer {
    fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now }
    }

    fn elapsed(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }

    fn total(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Ruta de salida dentro de la toma
pub fn output_path(take_dir: &Path, output_name: &str) -> PathBuf {
    take_dir.join(output_name)
}

/// Convierte una toma y escribe `<take_dir>/<output_name>`
pub fn process_take(
    take_dir: &Path,
    config: &RetargetConfig,
    output_name: &str,
) -> Result<BuildStats> {
    let mut timer = StageTimer::new();
    info!("loading take from \"{}\"", take_dir.display());

    let stream = read_take_stream(&take::stream_path(take_dir))?;
    info!("read take stream: {:.4}", timer.elapsed());

    let stride = stride_from_bytes(stream.info.frame_stride)?;
    let node_map = build_schema_index(&take::metadata_path(take_dir), &stream.nodes, stride)?;
    info!("create named data base and bounds: {:.4}", timer.elapsed());

    let table = FrameTable::reshape(&stream.samples, stride, stream.info.num_frame)?;
    info!(
        "reshape {} frames × {} columns: {:.4}",
        table.num_frame(),
        table.stride(),
        timer.elapsed()
    );

    let sets = retarget(config, &node_map, &table, stream.info.h)?;
    info!("retarget {} joints: {:.4}", sets.len(), timer.elapsed());

    let mut writer = BobWriter::new();
    for set in &sets {
        writer.write_joint(set);
    }
    let output = output_path(take_dir, output_name);
    let bytes_written = writer.finalize(&output)?;
    info!("write {}: {:.4}", output.display(), timer.elapsed());

    let elapsed = timer.total();
    info!("total time: {:.4}", elapsed.as_secs_f64());

    Ok(BuildStats {
        joints: sets.len(),
        channels: sets.iter().map(|s| s.channels.len() + 1).sum(),
        frames: table.num_frame(),
        bytes_written,
        output,
        elapsed,
    })
}

/// Convierte cada toma por separado; devuelve el resultado de cada una
pub fn process_takes(
    take_dirs: &[PathBuf],
    config: &RetargetConfig,
    output_name: &str,
) -> Vec<(PathBuf, Result<BuildStats>)> {
    take_dirs
        .iter()
        .map(|dir| {
            let result = process_take(dir, config, output_name);
            if let Err(e) = &result {
                error!("take \"{}\" failed: {}", dir.display(), e);
            }
            (dir.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::mapping::shadow_to_bob;
    use crate::take::{write_take_stream, TakeInfo};
    use tempfile::TempDir;

    /// Toma sintética: 3 frames, stride 8, nodo Hips con r, c, timestamp
    fn synthetic_take(dir: &Path) {
        #[rustfmt::skip]
        let samples: Vec<f32> = vec![
            // r                c                          timestamp
            1.0,  0.0, -1.0,    1.0, 100.0, 200.0, -50.0,  0.0,
            0.0,  0.0,  0.0,    1.0,   0.0,   0.0,   0.0,  0.01,
           -1.0,  1.0,  0.0,    1.0, 300.0, -50.0, 200.0,  0.02,
        ];
        let info = TakeInfo { frame_stride: 32, num_frame: 3, h: 0.01 };
        write_take_stream(&take::stream_path(dir), &info, &["Hips".to_string()], &samples).unwrap();
        std::fs::write(
            take::metadata_path(dir),
            r#"{"channels": ["r", "c", "timestamp"]}"#,
        )
        .unwrap();
    }

    fn pelvis_only() -> RetargetConfig {
        RetargetConfig::default().with_joints(vec![shadow_to_bob()[0].clone()])
    }

    #[test]
    fn test_end_to_end_pelvis_block() {
        let dir = TempDir::new().unwrap();
        synthetic_take(dir.path());

        let stats = process_take(dir.path(), &pelvis_only(), "data.txt").unwrap();
        assert_eq!(stats.joints, 1);
        assert_eq!(stats.channels, 7);
        assert_eq!(stats.frames, 3);

        let text = std::fs::read_to_string(dir.path().join("data.txt")).unwrap();
        assert_eq!(
            text,
            "% Hips = pelvis\n\
             pelvis.time=[0.0 0.01]\n\
             pelvis.rotx=[-57.29577951308232 0.0 0.0]\n\
             pelvis.roty=[57.29577951308232 0.0 -57.29577951308232]\n\
             pelvis.rotz=[0.0 0.0 57.29577951308232]\n\
             pelvis.transx=[-0.5 0.0 2.0]\n\
             pelvis.transy=[1.0 0.0 3.0]\n\
             pelvis.transz=[2.0 0.0 -0.5]\n\
             \n"
        );
        assert_eq!(stats.bytes_written, text.len());
    }

    #[test]
    fn test_schema_error_writes_nothing() {
        let dir = TempDir::new().unwrap();
        synthetic_take(dir.path());

        // La tabla completa pide joints que la toma no tiene
        let err = process_take(dir.path(), &RetargetConfig::default(), "data.txt").unwrap_err();
        assert!(matches!(err, ConvertError::Schema(_)));
        assert!(!dir.path().join("data.txt").exists());
    }

    #[test]
    fn test_shape_error_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let info = TakeInfo { frame_stride: 32, num_frame: 3, h: 0.01 };
        let nodes = ["Hips".to_string()];
        write_take_stream(&take::stream_path(dir.path()), &info, &nodes, &[0.0; 20]).unwrap();
        std::fs::write(take::metadata_path(dir.path()), r#"{"channels": ["r", "c", "timestamp"]}"#)
            .unwrap();

        let err = process_take(dir.path(), &pelvis_only(), "data.txt").unwrap_err();
        assert!(matches!(err, ConvertError::Shape(_)));
        assert!(!dir.path().join("data.txt").exists());
    }

    #[test]
    fn test_failing_take_does_not_stop_others() {
        let good = TempDir::new().unwrap();
        synthetic_take(good.path());
        let missing = TempDir::new().unwrap();

        let dirs = vec![missing.path().to_path_buf(), good.path().to_path_buf()];
        let results = process_takes(&dirs, &pelvis_only(), "data.txt");

        assert_eq!(results.len(), 2);
        assert!(results[0].1.as_ref().unwrap_err().is_not_found());
        assert!(results[1].1.is_ok());
        assert!(good.path().join("data.txt").exists());
    }

    #[test]
    fn test_custom_output_name() {
        let dir = TempDir::new().unwrap();
        synthetic_take(dir.path());

        let stats = process_take(dir.path(), &pelvis_only(), "bob.txt").unwrap();
        assert_eq!(stats.output, dir.path().join("bob.txt"));
        assert!(stats.output.exists());
    }
}
