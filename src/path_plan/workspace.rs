//! Axis aligned workspace box the planner keeps the arm in

use nalgebra::{Point3, Vector3};

use crate::kinematic_traits::{Joints, Kinematics};

/// Axis aligned box in scene units (meters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceBounds {
    pub min_corner: Vector3<f64>,
    pub max_corner: Vector3<f64>,
}

impl Default for WorkspaceBounds {
    fn default() -> Self {
        WorkspaceBounds {
            min_corner: Vector3::new(-0.7, -0.7, -0.05),
            max_corner: Vector3::new(0.7, 0.7, 0.7),
        }
    }
}

impl WorkspaceBounds {
    pub fn new(min_corner: [f64; 3], max_corner: [f64; 3]) -> Self {
        WorkspaceBounds {
            min_corner: Vector3::from(min_corner),
            max_corner: Vector3::from(max_corner),
        }
    }

    /// Checks that min corner is below max corner on every axis and all values are finite.
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| {
            self.min_corner[i].is_finite()
                && self.max_corner[i].is_finite()
                && self.min_corner[i] < self.max_corner[i]
        })
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|i| point[i] >= self.min_corner[i] && point[i] <= self.max_corner[i])
    }

    /// The tool flange must be inside the box and no joint frame may drop below its floor.
    pub fn admits(&self, kinematics: &dyn Kinematics, qs: &Joints) -> bool {
        let poses = kinematics.forward_with_joint_poses(qs);
        let floor = self.min_corner.z;
        if poses.iter().any(|p| p.translation.vector.z < floor) {
            return false;
        }
        let flange = Point3::from(poses[5].translation.vector);
        self.contains(&flange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let bounds = WorkspaceBounds::default();
        assert!(bounds.is_valid());
        assert!(bounds.contains(&Point3::new(0.3, 0.2, 0.3)));
        assert!(!bounds.contains(&Point3::new(0.3, 0.2, -0.1)));
        assert!(!bounds.contains(&Point3::new(0.71, 0.0, 0.0)));
    }

    #[test]
    fn test_inverted_bounds_invalid() {
        let bounds = WorkspaceBounds::new([0.5, -1.0, -1.0], [0.4, 1.0, 1.0]);
        assert!(!bounds.is_valid());
    }
}
