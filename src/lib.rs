//! Executes a path of Cartesian viewpoints on a six axis arm with Universal Robots geometry.
//!
//! The path is a text file with one viewpoint per line, written as `x,y,z,roll,pitch,yaw`
//! (position in centimeters, angles in radians). For every viewpoint the runner
//!
//! - converts the line into a flange target (scaled to meters, shifted by the configured offset),
//! - finds the joint goal with inverse kinematics, seeded from the current robot state,
//! - plans a joint space path to the goal that keeps the arm inside the workspace box,
//! - assigns time stamps respecting the joint velocity and acceleration limits,
//! - executes the timed trajectory.
//!
//! A viewpoint that fails at any stage is logged and skipped, the run continues with the next one.
//!
//! The stages are accessed through the traits in [planning_traits] so that they can be replaced.
//! The crate ships a self contained implementation of each:
//!
//! - [ik_solver::JacobianIkSolver]: damped least squares IK with random restarts.
//! - [rrt::RRTPlanner]: dual RRT-connect in the joint space.
//! - [time_parameterization::IterativeTimeParameterization]: velocity and acceleration limited time stamps.
//! - [executor::SimulatedExecutor]: follows the trajectory on a simulated arm.
//!
//! The forward kinematics is standard Denavit-Hartenberg, see [kinematics_impl::URKinematics]
//! with UR3, UR5 and UR10 parameter sets in [parameters_robots].
//!
//! Parsing of the viewpoint lines and the roll-pitch-yaw homogeneous transform are in
//! [pose_line] and [transform].

pub mod path_error;

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;

pub mod constraints;

pub mod jacobian;

pub mod pose_line;

pub mod transform;

pub mod planning_traits;

pub mod ik_solver;

#[path = "path_plan/workspace.rs"]
pub mod workspace;

#[path = "path_plan/rrt.rs"]
pub mod rrt;

#[path = "path_plan/interpolator.rs"]
pub mod interpolator;

#[path = "path_plan/time_parameterization.rs"]
pub mod time_parameterization;

pub mod executor;

pub mod path_runner;

#[cfg(test)]
#[cfg(feature = "allow_filesystem")]
mod tests;
