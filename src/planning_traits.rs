//! Capabilities the path runner depends on. Each can be backed by the implementations in this
//! crate or by any external motion planning framework.

use std::time::Duration;

use crate::kinematic_traits::{Joints, Pose};
use crate::path_error::PathError;
use crate::workspace::WorkspaceBounds;

/// Joint space goal with symmetric tolerance around each joint value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointGoal {
    pub joints: Joints,
    pub tolerance_below: f64,
    pub tolerance_above: f64,
}

impl JointGoal {
    pub fn new(joints: Joints, tolerance: f64) -> Self {
        JointGoal {
            joints,
            tolerance_below: tolerance,
            tolerance_above: tolerance,
        }
    }

    /// True if every joint lies within `[goal - below, goal + above]`.
    pub fn satisfied_by(&self, qs: &Joints) -> bool {
        qs.iter().zip(self.joints.iter()).all(|(q, g)| {
            *q >= g - self.tolerance_below && *q <= g + self.tolerance_above
        })
    }
}

/// Request for the motion planner: move from `start` to `goal`, staying in `workspace`.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub start: Joints,
    pub goal: JointGoal,
    pub workspace: WorkspaceBounds,
}

/// Geometric trajectory, start and goal included.
#[derive(Debug, Clone, PartialEq)]
pub struct JointTrajectory {
    pub waypoints: Vec<Joints>,
}

/// One waypoint of a time parameterized trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub positions: Joints,
    pub velocities: Joints,
    pub accelerations: Joints,
    /// Seconds since the start of the trajectory.
    pub time_from_start: f64,
}

/// Trajectory with time stamps, ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedTrajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl TimedTrajectory {
    /// Total duration in seconds, 0 for an empty trajectory.
    pub fn duration(&self) -> f64 {
        self.points.last().map(|p| p.time_from_start).unwrap_or(0.0)
    }
}

/// Inverse kinematics: joint configuration that places the tool flange at the target.
pub trait PoseSolver {
    /// Returns the solution or None if no solution was found within `attempts`,
    /// each attempt bounded by `timeout`. `seed` is the preferred starting configuration.
    fn solve(&self, target: &Pose, seed: &Joints, attempts: usize, timeout: Duration) -> Option<Joints>;
}

/// Collision aware planner in joint space.
pub trait MotionPlanner {
    fn plan(&self, request: &PlanRequest) -> Result<JointTrajectory, PathError>;
}

/// Assigns time stamps, velocities and accelerations to a geometric trajectory.
pub trait TimeParameterizer {
    fn parameterize(&self, trajectory: &JointTrajectory) -> Result<TimedTrajectory, PathError>;
}

/// Handle to the robot (real or simulated) that executes the trajectories.
pub trait TrajectoryExecutor {
    /// Current joint state of the robot.
    fn current_state(&self) -> Joints;

    /// Executes the trajectory starting from `start`, blocking until completion or failure.
    fn execute(&mut self, start: &Joints, trajectory: &TimedTrajectory) -> Result<(), PathError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_tolerance() {
        let goal = JointGoal::new([0.0, 0.1, 0.2, 0.3, 0.4, 0.5], 1e-3);
        assert!(goal.satisfied_by(&[0.0005, 0.1, 0.2, 0.3, 0.4, 0.4995]));
        assert!(!goal.satisfied_by(&[0.002, 0.1, 0.2, 0.3, 0.4, 0.5]));
    }

    #[test]
    fn test_empty_trajectory_duration() {
        let trajectory = TimedTrajectory { points: vec![] };
        assert_eq!(trajectory.duration(), 0.0);
    }
}
