// src/mapping/config.rs
// ============================================================================
// RETARGET CONFIG - Configuración inmutable del retargeting
// ============================================================================
//
// Por defecto: tabla Shadow → BoB, remap x→2 y→0 z→1, escala 0.01 (cm → m).
// Se puede sustituir con un JSON (--joints):
//
//   {
//     "remap": "corrected",
//     "translation_scale": 0.01,
//     "joints": [
//       {"source": "Hips", "target": "pelvis", "kind": "root"},
//       {"source": "LeftArm", "target": "left_shoulder",
//        "pre_rotation": [0.7071, 0.0, 0.0, 0.7071]}
//     ]
//   }
//
// ============================================================================

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::quat::Quat;
use super::shadow::shadow_to_bob;
use super::types::{AxisRemap, JointKind, JointSpec};

/// cm → m
pub const DEFAULT_TRANSLATION_SCALE: f64 = 0.01;

/// Configuración que recibe el retargeter
#[derive(Debug, Clone, PartialEq)]
pub struct RetargetConfig {
    pub joints: Vec<JointSpec>,
    pub remap: AxisRemap,
    pub translation_scale: f64,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            joints: shadow_to_bob(),
            remap: AxisRemap::CORRECTED,
            translation_scale: DEFAULT_TRANSLATION_SCALE,
        }
    }
}

impl RetargetConfig {
    pub fn with_remap(mut self, remap: AxisRemap) -> Self {
        self.remap = remap;
        self
    }

    pub fn with_joints(mut self, joints: Vec<JointSpec>) -> Self {
        self.joints = joints;
        self
    }

    /// Lee un JSON de joints
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_json(&data).map_err(|reason| ConvertError::format(path, reason))
    }

    pub fn from_json(data: &str) -> std::result::Result<Self, String> {
        let file: ConfigFile = serde_json::from_str(data)
            .map_err(|e| format!("invalid joint config JSON: {}", e))?;
        file.resolve()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    remap: Option<String>,
    #[serde(default)]
    translation_scale: Option<f64>,
    #[serde(default)]
    joints: Option<Vec<JointEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct JointEntry {
    source: String,
    target: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    pre_rotation: Option<Quat>,
}

impl JointEntry {
    fn resolve(self) -> std::result::Result<JointSpec, String> {
        let source = &self.source;
        let kind = match (self.kind.as_deref(), self.pre_rotation) {
            (Some("root"), None) => JointKind::RootWithTranslation,
            (Some("root"), Some(_)) => {
                return Err(format!("joint '{}': root joint cannot have a pre_rotation", source));
            }
            (None | Some("plain"), None) => JointKind::Plain,
            (None | Some("pre_rotated"), Some(q)) => {
                let unit = q.normalized().ok_or_else(|| {
                    format!("joint '{}': pre_rotation is a zero quaternion", source)
                })?;
                JointKind::PreRotated(unit)
            }
            (Some("pre_rotated"), None) => {
                return Err(format!("joint '{}': kind pre_rotated needs a pre_rotation", source));
            }
            (Some("plain"), Some(_)) => {
                return Err(format!("joint '{}': plain joint cannot have a pre_rotation", source));
            }
            (Some(other), _) => {
                return Err(format!("joint '{}': unknown kind '{}'", source, other));
            }
        };
        Ok(JointSpec::new(self.source, self.target, kind))
    }
}

impl ConfigFile {
    fn resolve(self) -> std::result::Result<RetargetConfig, String> {
        let mut config = RetargetConfig::default();

        if let Some(name) = self.remap {
            config.remap =
                AxisRemap::from_str(&name).ok_or_else(|| format!("unknown remap '{}'", name))?;
        }

        if let Some(scale) = self.translation_scale {
            if !scale.is_finite() {
                return Err(format!("translation_scale must be finite, got {}", scale));
            }
            config.translation_scale = scale;
        }

        if let Some(entries) = self.joints {
            if entries.is_empty() {
                return Err("joint table is empty".to_string());
            }
            let joints = entries
                .into_iter()
                .map(JointEntry::resolve)
                .collect::<std::result::Result<Vec<_>, _>>()?;

            for (i, joint) in joints.iter().enumerate() {
                if joints[..i].iter().any(|j| j.target == joint.target) {
                    return Err(format!("duplicate target joint '{}'", joint.target));
                }
            }
            config.joints = joints;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetargetConfig::default();
        assert_eq!(config.remap, AxisRemap::CORRECTED);
        assert_eq!(config.translation_scale, 0.01);
        assert_eq!(config.joints.len(), 17);
        let hips = config.joints.iter().find(|j| j.source == "Hips").unwrap();
        assert!(hips.kind.has_translation());
    }

    #[test]
    fn test_empty_json_keeps_defaults() {
        assert_eq!(RetargetConfig::from_json("{}").unwrap(), RetargetConfig::default());
    }

    #[test]
    fn test_joint_table_override() {
        let config = RetargetConfig::from_json(
            r#"{
                "remap": "legacy",
                "joints": [
                    {"source": "Hips", "target": "pelvis", "kind": "root"},
                    {"source": "LeftArm", "target": "left_shoulder",
                     "pre_rotation": [2.0, 0.0, 0.0, 0.0]},
                    {"source": "Chest", "target": "lumbar_joint"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.remap, AxisRemap::LEGACY);
        assert_eq!(config.joints.len(), 3);
        assert_eq!(config.joints[0].kind, JointKind::RootWithTranslation);
        // normalizado al cargar
        assert_eq!(config.joints[1].kind, JointKind::PreRotated(Quat::IDENTITY));
        assert_eq!(config.joints[2].kind, JointKind::Plain);
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(RetargetConfig::from_json(r#"{"joints": []}"#).is_err());
        assert!(RetargetConfig::from_json(r#"{"remap": "zyx"}"#).is_err());
        assert!(RetargetConfig::from_json(
            r#"{"joints": [{"source": "A", "target": "a", "pre_rotation": [0.0, 0.0, 0.0, 0.0]}]}"#
        )
        .is_err());
        assert!(RetargetConfig::from_json(
            r#"{"joints": [{"source": "A", "target": "a"}, {"source": "B", "target": "a"}]}"#
        )
        .is_err());
        assert!(RetargetConfig::from_json(
            r#"{"joints": [{"source": "A", "target": "a", "kind": "root",
                            "pre_rotation": [1.0, 0.0, 0.0, 0.0]}]}"#
        )
        .is_err());
    }
}
