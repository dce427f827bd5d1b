use std::f64::consts::FRAC_PI_2;
use std::fs::read_to_string;

use nalgebra::{Vector3, Vector4};

use crate::pose_line::{parse_pose_line, Pose6};
use crate::transform::pose_to_transform;

const SMALL: f64 = 1e-6;

fn read_viewpoints(file: &str) -> Vec<Pose6> {
    read_to_string(file)
        .expect("Failed to read path file")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_pose_line(line).expect("Malformed line"))
        .collect()
}

#[test]
fn test_viewpoints_file() {
    let viewpoints = read_viewpoints("src/tests/data/viewpoints.csv");
    assert_eq!(viewpoints.len(), 3);

    assert_eq!(viewpoints[0].values(), &[10.0, 20.0, 30.0, 0.0, 0.0, 0.0]);
    assert_eq!(viewpoints[1].values(), &[15.5, -12.25, 40.0, 0.1, -0.2, 1.5707963]);
    // Trailing comma does not add a field
    assert_eq!(viewpoints[2].values(), &[-5.0, 25.0, 35.0, 3.14159, 0.0, 0.0]);
}

#[test]
fn test_transforms_of_viewpoints() {
    for viewpoint in read_viewpoints("src/tests/data/viewpoints.csv") {
        let scaled = viewpoint.scaled(100.0);
        let transform = pose_to_transform(&scaled);

        let rotation = transform.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((rotation.determinant() - 1.0).abs() < SMALL);
        assert!((rotation.transpose() * rotation).is_identity(SMALL));
        assert_eq!(transform.fixed_view::<3, 1>(0, 3).into_owned(), scaled.position());
        assert_eq!(transform.row(3).transpose(), Vector4::new(0.0, 0.0, 0.0, 1.0));

        // Same rotation as the IK target built from the line
        let target = viewpoint.to_target(100.0, &Vector3::zeros());
        let expected = target.rotation.to_rotation_matrix();
        assert!((expected.matrix() - rotation).abs().max() < SMALL);
    }
}

#[test]
fn test_yaw_quarter_turn_maps_x_to_y() {
    let transform = pose_to_transform(&Pose6::new(0.0, 0.0, 0.0, 0.0, 0.0, FRAC_PI_2));
    let mapped = transform * Vector4::new(1.0, 0.0, 0.0, 0.0);
    assert!((mapped - Vector4::new(0.0, 1.0, 0.0, 0.0)).norm() < SMALL);
}
