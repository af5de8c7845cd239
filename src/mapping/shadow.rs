// src/mapping/shadow.rs
// ============================================================================
// SHADOW → BOB - Tabla de joints por defecto
// ============================================================================
//
// El orden de declaración es el orden de salida en data.txt.
// Solo la pelvis lleva traslación.
//
// ============================================================================

use super::types::{JointKind, JointSpec};

pub const ROOT_JOINT: &str = "Hips";

const SHADOW_TO_BOB: [(&str, &str); 17] = [
    ("Hips", "pelvis"),
    ("Chest", "lumbar_joint"),
    ("Head", "neck_joint"),
    ("LeftThigh", "left_hip"),
    ("LeftLeg", "left_knee"),
    ("LeftFoot", "left_ankle"),
    ("LeftShoulder", "left_sc_joint"),
    ("LeftArm", "left_shoulder"),
    ("LeftForearm", "left_elbow"),
    ("LeftHand", "left_wrist"),
    ("RightThigh", "right_hip"),
    ("RightLeg", "right_knee"),
    ("RightFoot", "right_ankle"),
    ("RightShoulder", "right_sc_joint"),
    ("RightArm", "right_shoulder"),
    ("RightForearm", "right_elbow"),
    ("RightHand", "right_wrist"),
];

/// Tabla Shadow → BoB
pub fn shadow_to_bob() -> Vec<JointSpec> {
    SHADOW_TO_BOB
        .iter()
        .map(|&(source, target)| {
            let kind = if source == ROOT_JOINT {
                JointKind::RootWithTranslation
            } else {
                JointKind::Plain
            };
            JointSpec::new(source, target, kind)
        })
        .collect()
}
