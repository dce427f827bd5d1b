extern crate nalgebra as na;

use na::Isometry3;

/// Pose is used a pose of the robot tool flange. It contains both Cartesian position and rotation quaternion
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(0.3, 0.2, 0.3);
/// let rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2);
/// let transform = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Six rotary joints of the arm, in radians.
pub type Joints = [f64; 6];

/// Forward kinematics of a six axis arm. Inverse kinematics is provided separately by
/// a [crate::planning_traits::PoseSolver], as the arm model itself does not have a
/// closed form solution here.
pub trait Kinematics: Send + Sync {
    /// Pose of the tool flange for the given joint values.
    fn forward(&self, qs: &Joints) -> Pose;

    /// Poses of all six joint frames, base to flange. The last element is the
    /// same as returned by `forward`.
    fn forward_with_joint_poses(&self, qs: &Joints) -> [Pose; 6];
}
