use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use crate::constraints::Constraints;
use crate::executor::SimulatedExecutor;
use crate::ik_solver::JacobianIkSolver;
use crate::kinematic_traits::{Joints, Kinematics};
use crate::kinematics_impl::URKinematics;
use crate::parameters::ur_kinematics::Parameters;
use crate::path_runner::{PathRunner, RunConfig};
use crate::planning_traits::TrajectoryExecutor;
use crate::rrt::RRTPlanner;
use crate::time_parameterization::IterativeTimeParameterization;
use crate::workspace::WorkspaceBounds;

const START: Joints = [0.0, -1.2, 1.3, -1.7, -1.57, 0.0];

/// Path file line that makes the runner aim the flange at the pose of these joints.
fn viewpoint_line(robot: &URKinematics, config: &RunConfig, qs: &Joints) -> String {
    let pose = robot.forward(qs);
    let position = (pose.translation.vector - config.position_offset) * config.scale;
    let (roll, pitch, yaw) = pose.rotation.euler_angles();
    format!(
        "{:.9},{:.9},{:.9},{:.12},{:.12},{:.12}",
        position.x, position.y, position.z, roll, pitch, yaw
    )
}

#[test]
fn test_reachable_viewpoints_executed() {
    let robot = URKinematics::new(Parameters::ur5());
    let config = RunConfig {
        ik_timeout: Duration::from_secs(1),
        workspace: WorkspaceBounds::new([-2.0, -2.0, -0.05], [2.0, 2.0, 2.0]),
        ..RunConfig::default()
    };

    let first = [0.1, -1.15, 1.25, -1.65, -1.5, 0.1];
    let second = [0.2, -1.1, 1.2, -1.6, -1.45, 0.2];
    let path = format!(
        "{}\n\n{}\n",
        viewpoint_line(&robot, &config, &first),
        viewpoint_line(&robot, &config, &second)
    );

    let shared: Arc<dyn Kinematics> = Arc::new(robot.clone());
    let solver = JacobianIkSolver::new(shared.clone(), Constraints::default()).with_seed(7);
    let planner = RRTPlanner::new(shared.clone(), Constraints::default());
    let mut runner = PathRunner::new(
        config,
        Box::new(solver),
        Box::new(planner),
        Box::new(IterativeTimeParameterization::default()),
        SimulatedExecutor::new(START),
    );

    let summary = runner.run_reader(Cursor::new(path)).unwrap();
    for outcome in &summary.outcomes {
        assert!(outcome.result.is_ok(), "Viewpoint {} failed: {:?}", outcome.entry, outcome.result);
    }
    assert_eq!(summary.executed(), 2);

    let executor = runner.into_executor();
    assert_eq!(executor.executed(), 2);
    let reached = shared.forward(&executor.current_state());
    let expected = shared.forward(&second);
    assert!((reached.translation.vector - expected.translation.vector).norm() < 1e-4);
    assert!(reached.rotation.angle_to(&expected.rotation) < 1e-3);
}
