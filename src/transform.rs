//! Homogeneous transform from a viewpoint. Standalone geometry utility: the IK target
//! is built from a quaternion (see [Pose6::to_target]), this matrix is not consumed by the solver.

use nalgebra::{Matrix3, Matrix4};

use crate::pose_line::Pose6;

/// 4x4 homogeneous transform: rotation in the upper left 3x3 block, translation
/// in rows 0..3 of the last column, bottom row (0, 0, 0, 1).
pub type Transform4x4 = Matrix4<f64>;

/// Standard rotation matrix from roll, pitch and yaw, composed as Rz(yaw) * Ry(pitch) * Rx(roll).
pub fn rotation_from_rpy(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
    let (sr, cr) = roll.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sy, cy) = yaw.sin_cos();

    Matrix3::new(
        cy * cp, cy * sp * sr - sy * cr, cy * sp * cr + sy * sr,
        sy * cp, sy * sp * sr + cy * cr, sy * sp * cr - cy * sr,
        -sp, cp * sr, cp * cr,
    )
}

/// Builds the transform of the pose. Translation is taken as is, any unit
/// conversion must be done before (see [Pose6::scaled]).
pub fn pose_to_transform(pose: &Pose6) -> Transform4x4 {
    let rotation = rotation_from_rpy(pose.roll(), pose.pitch(), pose.yaw());
    let position = pose.position();

    let mut tf = Transform4x4::identity();
    tf.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
    tf.fixed_view_mut::<3, 1>(0, 3).copy_from(&position);
    tf
}
