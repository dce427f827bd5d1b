use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::parameters::ur_kinematics::Parameters;

/// Forward kinematics of an arm described by standard DH parameters.
#[derive(Debug, Clone)]
pub struct URKinematics {
    parameters: Parameters,
}

impl URKinematics {
    /// Creates a new `URKinematics` instance with the given parameters.
    pub fn new(parameters: Parameters) -> Self {
        URKinematics { parameters }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Transform of the single link: Rz(theta) * Tz(d) * Tx(a) * Rx(alpha)
    fn link_transform(&self, i: usize, q: f64) -> Isometry3<f64> {
        let p = &self.parameters;
        let theta = q + p.offsets[i];
        let rz = Isometry3::from_parts(
            Translation3::new(0.0, 0.0, p.d[i]),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), theta),
        );
        let rx = Isometry3::from_parts(
            Translation3::new(p.a[i], 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), p.alpha[i]),
        );
        rz * rx
    }
}

impl Kinematics for URKinematics {
    fn forward(&self, qs: &Joints) -> Pose {
        let mut pose = Pose::identity();
        for i in 0..6 {
            pose *= self.link_transform(i, qs[i]);
        }
        pose
    }

    fn forward_with_joint_poses(&self, qs: &Joints) -> [Pose; 6] {
        let mut poses = [Pose::identity(); 6];
        let mut pose = Pose::identity();
        for i in 0..6 {
            pose *= self.link_transform(i, qs[i]);
            poses[i] = pose;
        }
        poses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_zero_pose_ur5() {
        // All joints at zero, the arm is stretched along -X, flange pointing along -Y.
        let robot = URKinematics::new(Parameters::ur5());
        let pose = robot.forward(&[0.0; 6]);
        let t = pose.translation.vector;
        assert!((t.x - (-0.425 - 0.39225)).abs() < EPSILON);
        assert!((t.y - (-0.10915 - 0.0823)).abs() < EPSILON);
        assert!((t.z - (0.089159 - 0.09465)).abs() < EPSILON);
    }

    #[test]
    fn test_base_rotation_rotates_flange() {
        let robot = URKinematics::new(Parameters::ur5());
        let at_zero = robot.forward(&[0.0; 6]).translation.vector;
        let turned = robot.forward(&[PI / 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]).translation.vector;
        // Quarter turn about the base Z axis: (x, y) -> (-y, x)
        assert!((turned.x + at_zero.y).abs() < EPSILON);
        assert!((turned.y - at_zero.x).abs() < EPSILON);
        assert!((turned.z - at_zero.z).abs() < EPSILON);
    }

    #[test]
    fn test_joint_poses_end_with_flange() {
        let robot = URKinematics::new(Parameters::ur10());
        let qs = [0.1, -1.2, 1.3, -0.4, 0.5, 0.6];
        let poses = robot.forward_with_joint_poses(&qs);
        let flange = robot.forward(&qs);
        assert!((poses[5].translation.vector - flange.translation.vector).norm() < EPSILON);
        assert!(poses[5].rotation.angle_to(&flange.rotation) < EPSILON);
        // First frame only lifts by d1
        assert!((poses[0].translation.vector.z - 0.1273).abs() < EPSILON);
    }

    #[test]
    fn test_wrist_3_rotates_in_place() {
        let robot = URKinematics::new(Parameters::ur3());
        let qs = [0.3, -1.0, 1.0, -1.5, -1.5, 0.0];
        let mut turned = qs;
        turned[5] = 1.0;
        let a = robot.forward(&qs);
        let b = robot.forward(&turned);
        assert!((a.translation.vector - b.translation.vector).norm() < EPSILON);
        assert!((a.rotation.angle_to(&b.rotation) - 1.0).abs() < 1e-9);
    }
}
