// src/quat/mod.rs
// ============================================================================
// QUAT - Álgebra de cuaterniones por lotes (series temporales)
// ============================================================================
//
// Convención: escalar primero (w, x, y, z).
// Un QuatSeries son cuatro series paralelas indexadas por frame; todas las
// operaciones son elemento a elemento, sin estado entre frames.
//
// ============================================================================

pub mod euler;

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

pub use euler::{to_euler_xyz, EulerSeries};

/// Cuaternión individual (pre-rotaciones fijas)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Quat {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quat {
    pub const IDENTITY: Quat = Quat { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Rotación de `angle` radianes alrededor de un eje (se normaliza)
    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        let n = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        let (s, c) = (angle * 0.5).sin_cos();
        let k = if n > 0.0 { s / n } else { 0.0 };
        Self::new(c, axis[0] * k, axis[1] * k, axis[2] * k)
    }

    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn norm(self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// None si el cuaternión es (casi) cero
    pub fn normalized(self) -> Option<Self> {
        let n = self.norm();
        if n < 1e-12 || !n.is_finite() {
            return None;
        }
        Some(Self::new(self.w / n, self.x / n, self.y / n, self.z / n))
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f64; 4]> for Quat {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Quat> for [f64; 4] {
    fn from(q: Quat) -> Self {
        [q.w, q.x, q.y, q.z]
    }
}

/// Producto de Hamilton
#[inline]
fn hamilton(a: Quat, b: Quat) -> Quat {
    Quat::new(
        a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
        a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
        a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
    )
}

impl Mul for Quat {
    type Output = Quat;

    fn mul(self, rhs: Quat) -> Quat {
        hamilton(self, rhs)
    }
}

/// Cuaterniones por frame como cuatro series paralelas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuatSeries {
    pub w: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl QuatSeries {
    pub fn new(w: Vec<f64>, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        let n = w.len();
        if x.len() != n || y.len() != n || z.len() != n {
            return Err(ConvertError::Shape(format!(
                "quaternion components differ in length: w={} x={} y={} z={}",
                n,
                x.len(),
                y.len(),
                z.len()
            )));
        }
        Ok(Self { w, x, y, z })
    }

    /// Desde las 4 columnas (w, x, y, z) de un canal Lq/Gq
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let [w, x, y, z]: [Vec<f64>; 4] = columns.try_into().map_err(|cols: Vec<Vec<f64>>| {
            ConvertError::Shape(format!("quaternion needs 4 columns, got {}", cols.len()))
        })?;
        Self::new(w, x, y, z)
    }

    /// El mismo cuaternión repetido `len` veces
    pub fn splat(q: Quat, len: usize) -> Self {
        Self {
            w: vec![q.w; len],
            x: vec![q.x; len],
            y: vec![q.y; len],
            z: vec![q.z; len],
        }
    }

    pub fn len(&self) -> usize {
        self.w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    pub fn get(&self, i: usize) -> Quat {
        Quat::new(self.w[i], self.x[i], self.y[i], self.z[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = Quat> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    fn from_quats(len: usize, quats: impl Iterator<Item = Quat>) -> Self {
        let mut out = Self {
            w: Vec::with_capacity(len),
            x: Vec::with_capacity(len),
            y: Vec::with_capacity(len),
            z: Vec::with_capacity(len),
        };
        for q in quats {
            out.w.push(q.w);
            out.x.push(q.x);
            out.y.push(q.y);
            out.z.push(q.z);
        }
        out
    }

    /// self · rhs, frame a frame. El orden importa.
    pub fn multiply(&self, rhs: &QuatSeries) -> Result<QuatSeries> {
        if self.len() != rhs.len() {
            return Err(ConvertError::Shape(format!(
                "cannot multiply quaternion series of length {} and {}",
                self.len(),
                rhs.len()
            )));
        }
        Ok(Self::from_quats(
            self.len(),
            self.iter().zip(rhs.iter()).map(|(a, b)| hamilton(a, b)),
        ))
    }

    /// Niega la parte vectorial
    pub fn conjugate(&self) -> QuatSeries {
        Self {
            w: self.w.clone(),
            x: self.x.iter().map(|v| -v).collect(),
            y: self.y.iter().map(|v| -v).collect(),
            z: self.z.iter().map(|v| -v).collect(),
        }
    }

    /// P · self · conj(P): re-expresa la rotación en los ejes de P
    pub fn conjugate_by(&self, p: Quat) -> Result<QuatSeries> {
        let pre = Self::splat(p, self.len());
        pre.multiply(self)?.multiply(&pre.conjugate())
    }

    pub fn to_euler_xyz(&self) -> EulerSeries {
        to_euler_xyz(self)
    }
}
