// src/take/schema.rs
// ============================================================================
// SCHEMA INDEX - Node map (joint, canal) → rango de columnas
// ============================================================================
//
// Cada frame del stream es un registro plano de f32. Cada nodo ocupa un
// bloque contiguo, en el orden de la lista de nodos, y dentro del bloque los
// canales presentes aparecen en el orden fijo de ChannelTag::ALL:
//
//   node_map[("Hips", Lq)] = (0, 4)
//   node_map[("Hips", r)]  = (4, 7)
//   node_map[("Hips", c)]  = (7, 11)
//
// El take.mTake dice QUÉ canales tiene cada nodo; el orden lo fija el formato.
//
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConvertError, Result};

/// Canal de un nodo en el registro de frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelTag {
    /// Cuaternión global (w, x, y, z)
    Gq,
    /// Cuaternión local (w, x, y, z)
    Lq,
    /// Rotación Euler local, radianes
    R,
    /// Aceleración lineal
    La,
    /// Velocidad lineal
    Lv,
    /// Traslación local
    Lt,
    /// Constraint posicional (peso, x, y, z) en cm
    C,
    /// Acelerómetro
    A,
    /// Magnetómetro
    M,
    /// Giróscopo
    G,
    Timestamp,
}

impl ChannelTag {
    /// Orden fijo de los canales dentro del bloque de un nodo
    pub const ALL: [ChannelTag; 11] = [
        Self::Gq,
        Self::Lq,
        Self::R,
        Self::La,
        Self::Lv,
        Self::Lt,
        Self::C,
        Self::A,
        Self::M,
        Self::G,
        Self::Timestamp,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Gq" => Some(Self::Gq),
            "Lq" => Some(Self::Lq),
            "r" => Some(Self::R),
            "la" => Some(Self::La),
            "lv" => Some(Self::Lv),
            "lt" => Some(Self::Lt),
            "c" => Some(Self::C),
            "a" => Some(Self::A),
            "m" => Some(Self::M),
            "g" => Some(Self::G),
            "timestamp" => Some(Self::Timestamp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gq => "Gq",
            Self::Lq => "Lq",
            Self::R => "r",
            Self::La => "la",
            Self::Lv => "lv",
            Self::Lt => "lt",
            Self::C => "c",
            Self::A => "a",
            Self::M => "m",
            Self::G => "g",
            Self::Timestamp => "timestamp",
        }
    }

    /// Número de columnas del canal
    pub fn arity(&self) -> usize {
        match self {
            Self::Gq | Self::Lq | Self::C => 4,
            Self::R | Self::La | Self::Lv | Self::Lt | Self::A | Self::M | Self::G => 3,
            Self::Timestamp => 1,
        }
    }

    fn order(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for ChannelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contenido de take.mTake
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TakeMetadata {
    /// Canales presentes en todos los nodos
    #[serde(default)]
    pub channels: Vec<String>,
    /// Override por nodo
    #[serde(default)]
    pub nodes: HashMap<String, Vec<String>>,
}

impl TakeMetadata {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        serde_json::from_str(&data)
            .map_err(|e| ConvertError::format(path, format!("invalid take metadata JSON: {}", e)))
    }

    /// Canales de un nodo en el orden del registro
    fn channels_for(&self, node: &str) -> std::result::Result<Vec<ChannelTag>, String> {
        let names = self.nodes.get(node).unwrap_or(&self.channels);

        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            let tag = ChannelTag::from_str(name)
                .ok_or_else(|| format!("unknown channel tag '{}' for node '{}'", name, node))?;
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags.sort_by_key(|t| t.order());
        Ok(tags)
    }
}

/// Mapa (joint, canal) → (inicio, fin) semiabierto dentro del frame
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    nodes: Vec<String>,
    ranges: HashMap<String, HashMap<ChannelTag, (usize, usize)>>,
    width: usize,
}

impl NodeMap {
    /// Construye el node map para la lista de nodos del stream.
    ///
    /// Falla con Schema si el layout no cabe en `stride` columnas.
    pub fn build(metadata: &TakeMetadata, node_names: &[String], stride: usize) -> Result<Self> {
        let mut ranges = HashMap::with_capacity(node_names.len());
        let mut offset = 0usize;

        for node in node_names {
            let tags = metadata.channels_for(node).map_err(ConvertError::Schema)?;

            let mut node_ranges = HashMap::with_capacity(tags.len());
            for tag in tags {
                let end = offset + tag.arity();
                node_ranges.insert(tag, (offset, end));
                offset = end;
            }
            ranges.insert(node.clone(), node_ranges);
        }

        if offset > stride {
            return Err(ConvertError::Schema(format!(
                "channel layout needs {} columns but frame stride is {}",
                offset, stride
            )));
        }

        Ok(Self {
            nodes: node_names.to_vec(),
            ranges,
            width: offset,
        })
    }

    /// Rango de columnas de un canal
    pub fn get(&self, joint: &str, tag: ChannelTag) -> Result<(usize, usize)> {
        let node = self.ranges.get(joint).ok_or_else(|| {
            ConvertError::Schema(format!("joint '{}' not present in take", joint))
        })?;

        node.get(&tag).copied().ok_or_else(|| {
            ConvertError::Schema(format!("channel '{}' not present for joint '{}'", tag, joint))
        })
    }

    pub fn contains(&self, joint: &str) -> bool {
        self.ranges.contains_key(joint)
    }

    /// Nodos en orden de registro
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Canales de un nodo, ordenados por offset
    pub fn channels(&self, joint: &str) -> Vec<(ChannelTag, (usize, usize))> {
        let mut list: Vec<_> = self
            .ranges
            .get(joint)
            .map(|m| m.iter().map(|(t, r)| (*t, *r)).collect())
            .unwrap_or_default();
        list.sort_by_key(|(_, (start, _))| *start);
        list
    }

    /// Columnas ocupadas por el layout (≤ stride)
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Lee take.mTake y construye el node map
pub fn build_schema_index(
    metadata_path: &Path,
    node_names: &[String],
    stride: usize,
) -> Result<NodeMap> {
    let metadata = TakeMetadata::load(metadata_path)?;
    NodeMap::build(&metadata, node_names, stride)
}
