// src/take/stream.rs
// ============================================================================
// TAKE STREAM - Lee data.mStream
// ============================================================================
//
// Layout (little-endian):
//
//   u64        header_len
//   [u8; N]    header JSON {"frame_stride", "num_frame", "h", "nodes"}
//   [f32; ..]  muestras, num_frame × frame_stride / 4
//
// El reader NO valida que las muestras cuadren con num_frame × stride, eso
// lo hace FrameTable::reshape (ShapeError). Aquí solo se detectan errores
// estructurales del archivo (Format).
//
// ============================================================================

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Ancho de una muestra en bytes (f32)
pub const SAMPLE_WIDTH: usize = 4;

/// Segundos por frame si el header no lo indica
pub const DEFAULT_FRAME_TIME: f64 = 0.01;

fn default_frame_time() -> f64 {
    DEFAULT_FRAME_TIME
}

/// Metadata de la toma
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeInfo {
    /// Bytes por registro de frame
    pub frame_stride: usize,
    pub num_frame: usize,
    /// Segundos por frame
    #[serde(default = "default_frame_time")]
    pub h: f64,
}

impl TakeInfo {
    pub fn new(frame_stride: usize, num_frame: usize) -> Self {
        Self { frame_stride, num_frame, h: DEFAULT_FRAME_TIME }
    }

    /// Duración cubierta por el canal time
    pub fn duration(&self) -> f64 {
        self.num_frame.saturating_sub(1) as f64 * self.h
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StreamHeader {
    #[serde(flatten)]
    info: TakeInfo,
    nodes: Vec<String>,
}

/// Contenido decodificado de un data.mStream
#[derive(Debug, Clone)]
pub struct TakeStream {
    pub info: TakeInfo,
    pub nodes: Vec<String>,
    pub samples: Vec<f32>,
}

/// Lee un data.mStream completo
pub fn read_take_stream(path: &Path) -> Result<TakeStream> {
    let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let file_len = file.metadata().map_err(|e| ConvertError::io(path, e))?.len() as usize;

    if file_len < 8 {
        return Err(ConvertError::format(path, format!("file too short ({} bytes)", file_len)));
    }

    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| ConvertError::io(path, e))?;
    decode(&mmap).map_err(|reason| ConvertError::format(path, reason))
}

fn decode(data: &[u8]) -> std::result::Result<TakeStream, String> {
    let mut cursor = Cursor::new(data);
    let header_len = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| "missing header length".to_string())? as usize;

    let header_end = 8usize
        .checked_add(header_len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| format!("header length {} exceeds file size {}", header_len, data.len()))?;

    let header: StreamHeader = serde_json::from_slice(&data[8..header_end])
        .map_err(|e| format!("invalid stream header JSON: {}", e))?;

    let payload = &data[header_end..];
    if payload.len() % SAMPLE_WIDTH != 0 {
        return Err(format!(
            "sample payload of {} bytes is not a multiple of {}",
            payload.len(),
            SAMPLE_WIDTH
        ));
    }

    let mut samples = vec![0f32; payload.len() / SAMPLE_WIDTH];
    Cursor::new(payload)
        .read_f32_into::<LittleEndian>(&mut samples)
        .map_err(|e| format!("cannot decode samples: {}", e))?;

    Ok(TakeStream {
        info: header.info,
        nodes: header.nodes,
        samples,
    })
}

/// Serializa una toma en el layout de data.mStream
pub fn encode_take_stream(
    info: &TakeInfo,
    nodes: &[String],
    samples: &[f32],
) -> io::Result<Vec<u8>> {
    let header = StreamHeader {
        info: info.clone(),
        nodes: nodes.to_vec(),
    };
    let json = serde_json::to_vec(&header)?;

    let mut buf = Vec::with_capacity(8 + json.len() + samples.len() * SAMPLE_WIDTH);
    buf.write_u64::<LittleEndian>(json.len() as u64)?;
    buf.extend_from_slice(&json);
    for &s in samples {
        buf.write_f32::<LittleEndian>(s)?;
    }
    Ok(buf)
}

/// Escribe un data.mStream (fixtures, herramientas)
pub fn write_take_stream(
    path: &Path,
    info: &TakeInfo,
    nodes: &[String],
    samples: &[f32],
) -> Result<()> {
    let bytes = encode_take_stream(info, nodes, samples).map_err(|e| ConvertError::io(path, e))?;
    let mut file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
    file.write_all(&bytes).map_err(|e| ConvertError::io(path, e))?;
    Ok(())
}

/// Lee solo el header (sin mapear muestras), para el inspector
pub fn read_take_info(path: &Path) -> Result<(TakeInfo, Vec<String>)> {
    let mut file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
    let header_len = file
        .read_u64::<LittleEndian>()
        .map_err(|_| ConvertError::format(path, "missing header length"))? as usize;

    let mut header_bytes = Vec::new();
    Read::take(&mut file, header_len as u64)
        .read_to_end(&mut header_bytes)
        .map_err(|e| ConvertError::io(path, e))?;
    if header_bytes.len() != header_len {
        return Err(ConvertError::format(path, "truncated header"));
    }

    let header: StreamHeader = serde_json::from_slice(&header_bytes)
        .map_err(|e| ConvertError::format(path, format!("invalid stream header JSON: {}", e)))?;
    Ok((header.info, header.nodes))
}
