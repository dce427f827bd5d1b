use std::sync::Arc;
use std::time::Instant;

use rand::thread_rng;
use rrt::{dual_rrt_connect, smooth_path};
use tracing::debug;

use crate::constraints::Constraints;
use crate::kinematic_traits::{Joints, Kinematics};
use crate::path_error::PathError;
use crate::planning_traits::{JointTrajectory, MotionPlanner, PlanRequest};
use crate::utils::{format_joints, is_valid, max_joint_distance};
use crate::workspace::WorkspaceBounds;

/// Defines the RRT planner that relocates the robot between the two positions in a
/// collision free way. "Collision" here means leaving the workspace box or the joint limits.
pub struct RRTPlanner {
    pub robot: Arc<dyn Kinematics>,

    pub constraints: Constraints,

    /// Step size in the joint space (value in Radians). This should be small
    /// enough to prevent robot leaving the workspace while moving
    /// in possibly less predictable way between the joints.
    pub step_size_joint_space: f64,

    /// The "max try" parameter of RRT algorithm, reasonable values
    /// are in order 1000 ... 4000
    pub max_try: usize,

    /// Number of shortcut attempts when smoothing the path, 0 disables smoothing.
    pub smoothing_tries: usize,
}

impl RRTPlanner {
    pub fn new(robot: Arc<dyn Kinematics>, constraints: Constraints) -> Self {
        RRTPlanner {
            robot,
            constraints,
            step_size_joint_space: 3_f64.to_radians(),
            max_try: 2000,
            smoothing_tries: 100,
        }
    }

    fn is_free(&self, qs: &Joints, workspace: &WorkspaceBounds) -> bool {
        is_valid(qs) && self.constraints.compliant(qs) && workspace.admits(self.robot.as_ref(), qs)
    }

    fn is_free_slice(&self, joint_angles: &[f64], workspace: &WorkspaceBounds) -> bool {
        match <Joints>::try_from(joint_angles) {
            Ok(joints) => self.is_free(&joints, workspace),
            Err(_) => false,
        }
    }

    /// Inserts intermediate waypoints so that no joint moves more than the step between two of them.
    fn densify(&self, path: &[Joints]) -> Vec<Joints> {
        let mut dense = Vec::with_capacity(path.len());
        for (i, to) in path.iter().enumerate() {
            if let Some(from) = i.checked_sub(1).map(|p| &path[p]) {
                let steps = (max_joint_distance(from, to) / self.step_size_joint_space).ceil() as usize;
                for s in 1..steps {
                    let t = s as f64 / steps as f64;
                    dense.push(crate::interpolator::interpolate_joints(from, to, t));
                }
            }
            dense.push(*to);
        }
        dense
    }

    /// Straight line in joint space, if every intermediate step is free.
    fn direct_path(&self, start: &Joints, goal: &Joints, workspace: &WorkspaceBounds) -> Option<Vec<Joints>> {
        let path = self.densify(&[*start, *goal]);
        if path.iter().all(|qs| self.is_free(qs, workspace)) {
            Some(path)
        } else {
            None
        }
    }

    fn convert_result(&self, vectors: Vec<Vec<f64>>) -> Result<Vec<Joints>, PathError> {
        vectors
            .into_iter()
            .map(|vec| {
                <Joints>::try_from(vec.as_slice()).map_err(|_| {
                    PathError::PlanningFailure("One of the inner vectors does not have 6 elements.".to_string())
                })
            })
            .collect()
    }

    /// Plans collision free relocation from 'start' into 'goal'.
    /// start and goal are included into the returned path.
    pub fn plan_rrt(&self, start: &Joints, goal: &Joints, workspace: &WorkspaceBounds)
                    -> Result<Vec<Joints>, PathError> {
        let started = Instant::now();
        if let Some(path) = self.direct_path(start, goal, workspace) {
            debug!("Direct path with {} steps", path.len());
            return Ok(path);
        }

        let random_joint_angles = || -> Vec<f64> {
            self.constraints.random_angles(&mut thread_rng()).to_vec()
        };

        let mut path = dual_rrt_connect(
            start,
            goal,
            |q: &[f64]| self.is_free_slice(q, workspace),
            random_joint_angles,
            self.step_size_joint_space,
            self.max_try,
        ).map_err(|e| PathError::PlanningFailure(format!("RRT: {}", e)))?;

        if self.smoothing_tries > 0 {
            smooth_path(
                &mut path,
                |q: &[f64]| self.is_free_slice(q, workspace),
                self.step_size_joint_space,
                self.smoothing_tries,
            );
        }
        let result = self.densify(&self.convert_result(path)?);
        debug!("RRT took {:?}, {} steps", started.elapsed(), result.len());
        Ok(result)
    }
}

impl MotionPlanner for RRTPlanner {
    fn plan(&self, request: &PlanRequest) -> Result<JointTrajectory, PathError> {
        let workspace = &request.workspace;
        if !workspace.is_valid() {
            return Err(PathError::PlanningFailure(format!("Invalid workspace bounds {:?}", workspace)));
        }
        if !self.is_free(&request.start, workspace) {
            return Err(PathError::PlanningFailure(format!(
                "Start state {} is outside the workspace or joint limits",
                format_joints(&request.start)
            )));
        }
        let goal = &request.goal.joints;
        if !self.is_free(goal, workspace) {
            return Err(PathError::PlanningFailure(format!(
                "Goal state {} is outside the workspace or joint limits",
                format_joints(goal)
            )));
        }

        let waypoints = self.plan_rrt(&request.start, goal, workspace)?;
        match waypoints.last() {
            Some(last) if request.goal.satisfied_by(last) => Ok(JointTrajectory { waypoints }),
            _ => Err(PathError::PlanningFailure("Path does not end at the goal".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics_impl::URKinematics;
    use crate::parameters::ur_kinematics::Parameters;
    use crate::planning_traits::JointGoal;

    const START: Joints = [0.0, -1.2, 1.3, -1.7, -1.57, 0.0];

    fn planner() -> RRTPlanner {
        RRTPlanner::new(Arc::new(URKinematics::new(Parameters::ur5())), Constraints::default())
    }

    fn open_workspace() -> WorkspaceBounds {
        WorkspaceBounds::new([-2.0, -2.0, -0.05], [2.0, 2.0, 2.0])
    }

    #[test]
    fn test_plan_includes_start_and_goal() {
        let planner = planner();
        let goal = [0.6, -1.0, 1.1, -1.5, -1.57, 0.4];
        let request = PlanRequest {
            start: START,
            goal: JointGoal::new(goal, 1e-3),
            workspace: open_workspace(),
        };
        let trajectory = planner.plan(&request).expect("Path expected");
        assert_eq!(trajectory.waypoints.first(), Some(&START));
        assert!(request.goal.satisfied_by(trajectory.waypoints.last().unwrap()));
        for pair in trajectory.waypoints.windows(2) {
            assert!(max_joint_distance(&pair[0], &pair[1]) <= planner.step_size_joint_space + 1e-9);
        }
    }

    #[test]
    fn test_goal_outside_workspace_fails() {
        let planner = planner();
        // Box too small to contain the flange anywhere near the start
        let workspace = WorkspaceBounds::new([-0.05, -0.05, -0.05], [0.05, 0.05, 0.05]);
        let request = PlanRequest {
            start: START,
            goal: JointGoal::new(START, 1e-3),
            workspace,
        };
        assert!(matches!(planner.plan(&request), Err(PathError::PlanningFailure(_))));
    }

    #[test]
    fn test_goal_outside_joint_limits_fails() {
        let planner = planner();
        let mut goal = START;
        goal[0] = 7.0;
        let request = PlanRequest {
            start: START,
            goal: JointGoal::new(goal, 1e-3),
            workspace: open_workspace(),
        };
        assert!(matches!(planner.plan(&request), Err(PathError::PlanningFailure(_))));
    }

    #[test]
    fn test_densify_limits_steps() {
        let planner = planner();
        let path = planner.densify(&[[0.0; 6], [0.5, 0.0, 0.0, 0.0, 0.0, -0.5]]);
        assert_eq!(path.first(), Some(&[0.0; 6]));
        assert_eq!(path.last(), Some(&[0.5, 0.0, 0.0, 0.0, 0.0, -0.5]));
        // 0.5 rad in 3 degree steps
        assert_eq!(path.len(), 11);
    }
}
