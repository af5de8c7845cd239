// src/frame.rs
// ============================================================================
// FRAME TABLE - Buffer plano 1D visto como tabla num_frame × stride
// ============================================================================
//
//   [ax0 ay0 az0 ... axN ayN azN]  →  [[ax0 ay0 az0],
//                                       ...
//                                      [axN ayN azN]]
//
// ============================================================================

use crate::error::{ConvertError, Result};
use crate::take::stream::SAMPLE_WIDTH;

/// Columnas por frame a partir del frame_stride en bytes
pub fn stride_from_bytes(frame_stride: usize) -> Result<usize> {
    if frame_stride % SAMPLE_WIDTH != 0 {
        return Err(ConvertError::Shape(format!(
            "frame_stride {} is not a multiple of sample width {}",
            frame_stride, SAMPLE_WIDTH
        )));
    }
    Ok(frame_stride / SAMPLE_WIDTH)
}

#[derive(Debug, Clone)]
pub struct FrameTable {
    data: Vec<f64>,
    stride: usize,
    num_frame: usize,
}

impl FrameTable {
    /// Falla con Shape si len(flat) != stride × num_frame
    pub fn reshape(flat: &[f32], stride: usize, num_frame: usize) -> Result<Self> {
        let expected = stride.checked_mul(num_frame).ok_or_else(|| {
            ConvertError::Shape(format!("stride {} × num_frame {} overflows", stride, num_frame))
        })?;

        if flat.len() != expected {
            return Err(ConvertError::Shape(format!(
                "sample buffer has {} values, expected {} ({} frames × {} stride)",
                flat.len(),
                expected,
                num_frame,
                stride
            )));
        }

        Ok(Self {
            data: flat.iter().map(|&v| v as f64).collect(),
            stride,
            num_frame,
        })
    }

    pub fn num_frame(&self) -> usize {
        self.num_frame
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) entra en pánico
        self.data.chunks_exact(self.stride.max(1)).take(self.num_frame)
    }

    /// Serie temporal de una columna
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows().map(|row| row[col]).collect()
    }

    /// Columnas [start, end) como una serie por columna
    pub fn columns(&self, (start, end): (usize, usize)) -> Result<Vec<Vec<f64>>> {
        if start > end || end > self.stride {
            return Err(ConvertError::Shape(format!(
                "column range ({}, {}) outside frame stride {}",
                start, end, self.stride
            )));
        }
        Ok((start..end).map(|c| self.column(c)).collect())
    }
}
