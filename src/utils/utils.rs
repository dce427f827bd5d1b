//! Helper functions

use crate::kinematic_traits::Joints;

/// Checks if all elements in the array are finite
pub fn is_valid(qs: &Joints) -> bool {
    qs.iter().all(|&q| q.is_finite())
}

/// Format joint values for logging, converting radians to degrees.
pub fn format_joints(joints: &Joints) -> String {
    let mut row_str = String::new();
    for joint_idx in 0..6 {
        let computed = joints[joint_idx];
        row_str.push_str(&format!("{:5.2} ", computed.to_degrees()));
    }
    format!("[{}]", row_str.trim_end())
}

/// Allows to specify joint values in degrees (converts to radians)
#[cfg(test)]
pub fn as_radians(degrees: [i32; 6]) -> Joints {
    std::array::from_fn(|i| (degrees[i] as f64).to_radians())
}

/// Largest absolute per joint difference.
pub fn max_joint_distance(a: &Joints, b: &Joints) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// formatting for YAML output
pub(crate) fn deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    format!("deg({:.4})", x.to_degrees())
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use super::*;

    #[test]
    fn test_is_valid_with_all_finite() {
        let qs = [0.0, 1.0, -1.0, 0.5, -0.5, PI];
        assert!(is_valid(&qs));
    }

    #[test]
    fn test_is_valid_with_nan() {
        let qs = [0.0, f64::NAN, 1.0, -1.0, 0.5, -0.5];
        assert!(!is_valid(&qs));
    }

    #[test]
    fn test_format_joints_in_degrees() {
        let formatted = format_joints(&as_radians([0, 90, -45, 0, 0, 180]));
        assert_eq!(formatted, "[ 0.00 90.00 -45.00  0.00  0.00 180.00]");
    }

    #[test]
    fn test_max_joint_distance() {
        let a = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
        let b = [0.0, 0.1, -0.2, 0.3, 0.4, 0.55];
        assert!((max_joint_distance(&a, &b) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_deg_formatting() {
        assert_eq!(deg(&0.0), "0");
        assert_eq!(deg(&(PI / 2.0)), "deg(90.0000)");
    }
}
