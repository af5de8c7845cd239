// src/quat/euler.rs
// ============================================================================
// EULER XYZ - Cuaternión → (rx, ry, rz) intrínseco X-Y-Z
// ============================================================================
//
// Para un cuaternión unitario (p0, p1, p2, p3):
//
//   ry = asin(clamp(2(p0·p2 + p1·p3), -1, 1))
//   rx = atan2(2(p0·p1 − p2·p3), 1 − 2(p1² + p2²))
//   rz = atan2(2(p0·p3 − p1·p2), 1 − 2(p2² + p3²))
//
// NOTA: en el polo (|ry| = 90°) rx y rz quedan acoplados. No hay rama
// especial aparte del clamp; el resultado en el polo es una aproximación.
//
// ============================================================================

use super::QuatSeries;

/// Ángulos en radianes, una serie por eje
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EulerSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl EulerSeries {
    /// Columnas en orden (x, y, z)
    pub fn into_columns(self) -> [Vec<f64>; 3] {
        [self.x, self.y, self.z]
    }

    pub fn to_degrees(self) -> Self {
        let deg = |v: Vec<f64>| v.into_iter().map(f64::to_degrees).collect();
        Self {
            x: deg(self.x),
            y: deg(self.y),
            z: deg(self.z),
        }
    }
}

#[inline]
fn euler_xyz(p0: f64, p1: f64, p2: f64, p3: f64) -> (f64, f64, f64) {
    let t2 = (2.0 * (p0 * p2 + p1 * p3)).clamp(-1.0, 1.0);
    let ry = t2.asin();
    let rx = (2.0 * (p0 * p1 - p2 * p3)).atan2(1.0 - 2.0 * (p1 * p1 + p2 * p2));
    let rz = (2.0 * (p0 * p3 - p1 * p2)).atan2(1.0 - 2.0 * (p2 * p2 + p3 * p3));
    (rx, ry, rz)
}

pub fn to_euler_xyz(q: &QuatSeries) -> EulerSeries {
    let n = q.len();
    let mut out = EulerSeries {
        x: Vec::with_capacity(n),
        y: Vec::with_capacity(n),
        z: Vec::with_capacity(n),
    };

    for i in 0..n {
        let (rx, ry, rz) = euler_xyz(q.w[i], q.x[i], q.y[i], q.z[i]);
        out.x.push(rx);
        out.y.push(ry);
        out.z.push(rz);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quat::Quat;
    use cgmath::{Matrix3, Quaternion, Rad};
    use rand::Rng;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    fn single(q: Quat) -> (f64, f64, f64) {
        let e = to_euler_xyz(&QuatSeries::splat(q, 1));
        (e.x[0], e.y[0], e.z[0])
    }

    fn random_unit(rng: &mut impl Rng) -> Quat {
        loop {
            let q = Quat::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if let Some(unit) = q.normalized() {
                if q.norm() > 0.1 {
                    return unit;
                }
            }
        }
    }

    fn to_cgmath(q: Quat) -> Quaternion<f64> {
        Quaternion::new(q.w, q.x, q.y, q.z)
    }

    fn max_diff(a: Matrix3<f64>, b: Matrix3<f64>) -> f64 {
        let a: [[f64; 3]; 3] = a.into();
        let b: [[f64; 3]; 3] = b.into();
        let mut worst = 0.0f64;
        for c in 0..3 {
            for r in 0..3 {
                worst = worst.max((a[c][r] - b[c][r]).abs());
            }
        }
        worst
    }

    #[test]
    fn test_identity() {
        assert_eq!(single(Quat::IDENTITY), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_single_axis_rotations() {
        let (rx, ry, rz) = single(Quat::from_axis_angle([1.0, 0.0, 0.0], 0.3));
        assert!((rx - 0.3).abs() < 1e-12 && ry.abs() < 1e-12 && rz.abs() < 1e-12);

        let (rx, ry, rz) = single(Quat::from_axis_angle([0.0, 1.0, 0.0], -0.7));
        assert!(rx.abs() < 1e-12 && (ry + 0.7).abs() < 1e-12 && rz.abs() < 1e-12);

        let (rx, ry, rz) = single(Quat::from_axis_angle([0.0, 0.0, 1.0], FRAC_PI_4));
        assert!(rx.abs() < 1e-12 && ry.abs() < 1e-12 && (rz - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_gimbal_pole_is_clamped() {
        // Ligeramente no unitario: t2 > 1 sin el clamp
        let s = FRAC_PI_4.sin() * 1.000001;
        let (rx, ry, rz) = single(Quat::new(s, 0.0, s, 0.0));
        assert!(!rx.is_nan() && !rz.is_nan());
        assert_eq!(ry, FRAC_PI_2);

        let (_, ry, _) = single(Quat::new(s, 0.0, -s, 0.0));
        assert_eq!(ry, -FRAC_PI_2);
    }

    #[test]
    fn test_conjugated_rotation_matches_matrix_reference() {
        let mut rng = rand::thread_rng();
        let mut checked = 0;

        while checked < 200 {
            let p = random_unit(&mut rng);
            let l = random_unit(&mut rng);

            let corrected = QuatSeries::splat(l, 1).conjugate_by(p).unwrap();
            let (rx, ry, rz) = {
                let e = corrected.to_euler_xyz();
                (e.x[0], e.y[0], e.z[0])
            };

            // Cerca del polo la descomposición no es única
            if ry.abs() > FRAC_PI_2 - 1e-3 {
                continue;
            }

            let reference = to_cgmath(p) * to_cgmath(l) * to_cgmath(p).conjugate();
            let from_quat = Matrix3::from(reference);
            let from_euler = Matrix3::from_angle_x(Rad(rx))
                * Matrix3::from_angle_y(Rad(ry))
                * Matrix3::from_angle_z(Rad(rz));

            assert!(
                max_diff(from_quat, from_euler) < 1e-9,
                "mismatch for p={:?} l={:?}",
                p,
                l
            );
            checked += 1;
        }
    }

    #[test]
    fn test_to_degrees() {
        let e = EulerSeries {
            x: vec![std::f64::consts::PI],
            y: vec![FRAC_PI_2],
            z: vec![0.0],
        }
        .to_degrees();
        assert_eq!(e.x, vec![180.0]);
        assert_eq!(e.y, vec![90.0]);
        assert_eq!(e.z, vec![0.0]);
    }
}
