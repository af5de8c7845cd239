// src/mapping/types.rs
// ============================================================================
// MAPPING TYPES - Joints, tipos de joint y remapeo de ejes
// ============================================================================

use std::fmt;

use crate::quat::Quat;

/// Cómo se retargetea un joint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// Rotación Euler `r` tal cual
    Plain,
    /// Cuaternión local `Lq` corregido por P · Lq · conj(P)
    PreRotated(Quat),
    /// Raíz: rotación `r` más traslación desde `c`
    RootWithTranslation,
}

impl JointKind {
    pub fn has_translation(&self) -> bool {
        matches!(self, Self::RootWithTranslation)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::PreRotated(_) => "pre_rotated",
            Self::RootWithTranslation => "root",
        }
    }
}

/// Joint origen → joint BoB
#[derive(Debug, Clone, PartialEq)]
pub struct JointSpec {
    pub source: String,
    pub target: String,
    pub kind: JointKind,
}

impl JointSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: JointKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }

    pub fn plain(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, JointKind::Plain)
    }
}

/// Eje de salida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Para cada eje de salida (x, y, z), la columna origen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRemap {
    source: [usize; 3],
}

impl AxisRemap {
    /// x→2, y→0, z→1
    pub const CORRECTED: AxisRemap = AxisRemap { source: [2, 0, 1] };

    /// x→0, y→2, z→1 (salida de versiones anteriores)
    pub const LEGACY: AxisRemap = AxisRemap { source: [0, 2, 1] };

    pub const IDENTITY: AxisRemap = AxisRemap { source: [0, 1, 2] };

    /// None si no es una permutación de {0, 1, 2}
    pub fn new(source: [usize; 3]) -> Option<Self> {
        let mut seen = [false; 3];
        for &s in &source {
            if s > 2 || seen[s] {
                return None;
            }
            seen[s] = true;
        }
        Some(Self { source })
    }

    /// `corrected`, `legacy`, `identity` o una permutación explícita `2,0,1`
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "corrected" => Some(Self::CORRECTED),
            "legacy" => Some(Self::LEGACY),
            "identity" => Some(Self::IDENTITY),
            other => {
                let cols: Vec<usize> = other
                    .split(',')
                    .map(|c| c.trim().parse().ok())
                    .collect::<Option<_>>()?;
                Self::new(cols.try_into().ok()?)
            }
        }
    }

    /// Columna origen para un eje de salida
    pub fn source(&self, axis: Axis) -> usize {
        self.source[axis.index()]
    }

    pub fn inverse(&self) -> Self {
        let mut inv = [0usize; 3];
        for (out, &src) in self.source.iter().enumerate() {
            inv[src] = out;
        }
        Self { source: inv }
    }

    /// out[axis] = cols[source(axis)]
    pub fn apply<T: Clone>(&self, cols: &[T; 3]) -> [T; 3] {
        [
            cols[self.source[0]].clone(),
            cols[self.source[1]].clone(),
            cols[self.source[2]].clone(),
        ]
    }
}

impl Default for AxisRemap {
    fn default() -> Self {
        Self::CORRECTED
    }
}

impl fmt::Display for AxisRemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x→{}, y→{}, z→{}",
            self.source[0], self.source[1], self.source[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrected_remap() {
        let cols = ["a", "b", "c"];
        assert_eq!(AxisRemap::CORRECTED.apply(&cols), ["c", "a", "b"]);
        assert_eq!(AxisRemap::CORRECTED.source(Axis::X), 2);
        assert_eq!(AxisRemap::CORRECTED.source(Axis::Y), 0);
        assert_eq!(AxisRemap::CORRECTED.source(Axis::Z), 1);
    }

    #[test]
    fn test_remap_then_inverse_is_identity() {
        let cols = [10, 20, 30];
        for remap in [AxisRemap::CORRECTED, AxisRemap::LEGACY, AxisRemap::IDENTITY] {
            let inv = remap.inverse();
            assert_eq!(inv.apply(&remap.apply(&cols)), cols);
            assert_eq!(remap.apply(&inv.apply(&cols)), cols);
        }
    }

    #[test]
    fn test_new_rejects_non_permutation() {
        assert!(AxisRemap::new([0, 0, 1]).is_none());
        assert!(AxisRemap::new([0, 1, 3]).is_none());
        assert_eq!(AxisRemap::new([2, 0, 1]), Some(AxisRemap::CORRECTED));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(AxisRemap::from_str("Legacy"), Some(AxisRemap::LEGACY));
        assert_eq!(AxisRemap::from_str("corrected"), Some(AxisRemap::CORRECTED));
        assert_eq!(AxisRemap::from_str("identity"), Some(AxisRemap::IDENTITY));
        assert_eq!(AxisRemap::from_str("0, 2, 1"), Some(AxisRemap::LEGACY));
        assert!(AxisRemap::from_str("xyz").is_none());
        assert!(AxisRemap::from_str("default").is_none());
        assert!(AxisRemap::from_str("0,1").is_none());
        assert!(AxisRemap::from_str("1,1,0").is_none());
    }

    #[test]
    fn test_joint_kind() {
        assert!(JointKind::RootWithTranslation.has_translation());
        assert!(!JointKind::Plain.has_translation());
        assert!(!JointKind::PreRotated(Quat::IDENTITY).has_translation());
        assert_eq!(JointKind::PreRotated(Quat::IDENTITY).name(), "pre_rotated");
    }
}
