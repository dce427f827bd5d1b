mod test_pose_file;
mod test_viewpoints_ur5;
