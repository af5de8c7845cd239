// src/retarget.rs
// ============================================================================
// RETARGET - Canales de la toma → canales BoB por joint
// ============================================================================
//
// Por cada joint de la tabla, en orden de declaración:
//
//   1. Rotación:
//        PreRotated(P) → Lq' = P · Lq · conj(P), Euler XYZ, grados
//        resto         → canal r tal cual, grados
//   2. rotx/roty/rotz ← columnas según AxisRemap (x→2, y→0, z→1)
//   3. Raíz: canal c × 0.01, transx/y/z ← columna 1 + remap
//      (la columna 0 de c es el peso del constraint)
//   4. time: t_i = i·h, i = 0..num_frame-2 (num_frame − 1 muestras)
//
// Los joints son independientes: se procesan en paralelo con rayon y se
// recogen en orden de declaración.
//
// ============================================================================

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::error::{ConvertError, Result};
use crate::frame::FrameTable;
use crate::mapping::{Axis, AxisRemap, JointKind, JointSpec, RetargetConfig};
use crate::quat::QuatSeries;
use crate::take::{ChannelTag, NodeMap};

/// Serie temporal con nombre (rotx, transz, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub values: Vec<f64>,
}

impl Channel {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }
}

/// Canales de un joint BoB
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSet {
    pub source: String,
    pub target: String,
    /// Compartido por todos los joints de la toma
    pub time: Arc<[f64]>,
    pub channels: Vec<Channel>,
}

impl ChannelSet {
    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }
}

/// Canal time: num_frame − 1 muestras
pub fn time_series(num_frame: usize, h: f64) -> Vec<f64> {
    (0..num_frame.saturating_sub(1)).map(|i| i as f64 * h).collect()
}

fn three_columns(columns: Vec<Vec<f64>>, joint: &str, tag: ChannelTag) -> Result<[Vec<f64>; 3]> {
    columns.try_into().map_err(|cols: Vec<Vec<f64>>| {
        ConvertError::Shape(format!(
            "channel '{}' of joint '{}' has {} columns, expected 3",
            tag,
            joint,
            cols.len()
        ))
    })
}

/// Rotación del joint en grados, columnas en el orden del origen
fn rotation_degrees(joint: &JointSpec, map: &NodeMap, table: &FrameTable) -> Result<[Vec<f64>; 3]> {
    match joint.kind {
        JointKind::PreRotated(pre) => {
            let range = map.get(&joint.source, ChannelTag::Lq)?;
            let local = QuatSeries::from_columns(table.columns(range)?)?;
            let corrected = local.conjugate_by(pre)?;
            Ok(corrected.to_euler_xyz().to_degrees().into_columns())
        }
        JointKind::Plain | JointKind::RootWithTranslation => {
            let range = map.get(&joint.source, ChannelTag::R)?;
            let mut cols = three_columns(table.columns(range)?, &joint.source, ChannelTag::R)?;
            for col in cols.iter_mut() {
                col.iter_mut().for_each(|v| *v = v.to_degrees());
            }
            Ok(cols)
        }
    }
}

fn translation(
    joint: &JointSpec,
    map: &NodeMap,
    table: &FrameTable,
    remap: AxisRemap,
    scale: f64,
) -> Result<Vec<Channel>> {
    let range = map.get(&joint.source, ChannelTag::C)?;
    let cols = table.columns(range)?;

    Axis::ALL
        .iter()
        .map(|&axis| {
            let col = 1 + remap.source(axis);
            let values = cols.get(col).ok_or_else(|| {
                ConvertError::Schema(format!(
                    "joint '{}': translation column {} outside channel '{}'",
                    joint.source,
                    col,
                    ChannelTag::C
                ))
            })?;
            Ok(Channel::new(
                format!("trans{}", axis.name()),
                values.iter().map(|v| v * scale).collect(),
            ))
        })
        .collect()
}

/// Retargetea un joint
pub fn retarget_joint(
    joint: &JointSpec,
    config: &RetargetConfig,
    map: &NodeMap,
    table: &FrameTable,
    time: Arc<[f64]>,
) -> Result<ChannelSet> {
    debug!("retarget {} -> {} ({})", joint.source, joint.target, joint.kind.name());

    let rot = config.remap.apply(&rotation_degrees(joint, map, table)?);
    let mut channels: Vec<Channel> = Axis::ALL
        .iter()
        .zip(rot)
        .map(|(axis, values)| Channel::new(format!("rot{}", axis.name()), values))
        .collect();

    if joint.kind.has_translation() {
        channels.extend(translation(joint, map, table, config.remap, config.translation_scale)?);
    }

    Ok(ChannelSet {
        source: joint.source.clone(),
        target: joint.target.clone(),
        time,
        channels,
    })
}

/// Retargetea todos los joints de la tabla, en orden de declaración.
/// Cualquier canal ausente aborta la toma completa.
pub fn retarget(
    config: &RetargetConfig,
    map: &NodeMap,
    table: &FrameTable,
    h: f64,
) -> Result<Vec<ChannelSet>> {
    let time: Arc<[f64]> = time_series(table.num_frame(), h).into();

    config
        .joints
        .par_iter()
        .map(|joint| retarget_joint(joint, config, map, table, Arc::clone(&time)))
        .collect()
}
