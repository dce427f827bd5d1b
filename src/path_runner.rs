//! Runs a path of viewpoints: each line of the path file is converted into a tool flange
//! target, solved with inverse kinematics, planned from the current robot state, time
//! parameterized and executed. A failing entry is logged and skipped, the run continues
//! with the next one.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use nalgebra::Vector3;
use tracing::{debug, error, info, trace, warn};

use crate::kinematic_traits::Joints;
use crate::parameters_robots::ur_kinematics::UR_JOINT_NAMES;
use crate::path_error::PathError;
use crate::planning_traits::{
    JointGoal, JointTrajectory, MotionPlanner, PlanRequest, PoseSolver, TimeParameterizer,
    TimedTrajectory, TrajectoryExecutor, TrajectoryPoint,
};
use crate::pose_line::{parse_pose_line, Pose6};
use crate::transform::pose_to_transform;
use crate::utils::format_joints;
use crate::workspace::WorkspaceBounds;

/// Settings of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Positions in the path file are divided by this (path file in cm, robot in m)
    pub scale: f64,

    /// Added to the scaled position, frame calibration between the viewpoint planner and the robot base
    pub position_offset: Vector3<f64>,

    /// Number of IK attempts per viewpoint
    pub ik_attempts: usize,

    /// Time limit of a single IK attempt
    pub ik_timeout: Duration,

    /// Symmetric tolerance of the joint goal, radians
    pub goal_tolerance: f64,

    pub workspace: WorkspaceBounds,

    /// If time parameterization fails, execute the geometric path with nominal
    /// time stamps rather than skipping the entry
    pub execute_unparameterized: bool,

    /// Nominal duration between waypoints of a path executed without time parameterization
    pub nominal_step_duration: f64,

    /// Names for diagnostics, in the joint order
    pub joint_names: [String; 6],
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            scale: 100.0,
            position_offset: Vector3::new(0.2, 0.0, 0.0),
            ik_attempts: 10,
            ik_timeout: Duration::from_secs_f64(0.1),
            goal_tolerance: 1e-3,
            workspace: WorkspaceBounds::default(),
            execute_unparameterized: false,
            nominal_step_duration: 0.1,
            joint_names: UR_JOINT_NAMES.map(String::from),
        }
    }
}

/// What happened to a single non empty line of the path file.
#[derive(Debug)]
pub struct EntryOutcome {
    /// Line number in the path file, starting from 1
    pub line_number: usize,

    /// Viewpoint number, counting non empty lines from 0
    pub entry: usize,

    pub result: Result<(), PathError>,
}

/// Outcomes of all entries of the run, in the path order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<EntryOutcome>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn executed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.executed()
    }
}

/// Owns the collaborators for the duration of the run. The executor handle is
/// acquired when the runner is built and given back with [PathRunner::into_executor].
pub struct PathRunner<E: TrajectoryExecutor> {
    pub config: RunConfig,
    solver: Box<dyn PoseSolver>,
    planner: Box<dyn MotionPlanner>,
    timing: Box<dyn TimeParameterizer>,
    executor: E,
}

impl<E: TrajectoryExecutor> PathRunner<E> {
    pub fn new(
        config: RunConfig,
        solver: Box<dyn PoseSolver>,
        planner: Box<dyn MotionPlanner>,
        timing: Box<dyn TimeParameterizer>,
        executor: E,
    ) -> Self {
        PathRunner { config, solver, planner, timing, executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Releases the executor handle.
    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Opens the path file and runs all entries. Failure to open the file is fatal,
    /// nothing is executed then.
    pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<RunSummary, PathError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PathError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Path {} is open", path.display());
        self.run_reader(BufReader::new(file))
    }

    /// Runs all entries read from the reader, top to bottom. Empty lines are skipped.
    /// A line that is not valid UTF-8 fails as its own entry, only read errors stop the run.
    pub fn run_reader<R: BufRead>(&mut self, mut reader: R) -> Result<RunSummary, PathError> {
        let mut summary = RunSummary::default();
        let mut entry = 0;
        let mut line_number = 0;
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_number += 1;
            let mut bytes = buffer.as_slice();
            while let [rest @ .., b'\r' | b'\n'] = bytes {
                bytes = rest;
            }
            if bytes.trim_ascii().is_empty() {
                continue;
            }
            let result = match std::str::from_utf8(bytes) {
                Ok(line) => self.run_line(entry, line),
                Err(err) => Err(PathError::InvalidEncoding(err)),
            };
            if let Err(err) = &result {
                warn!("Viewpoint {} (line {}) skipped: {}", entry, line_number, err);
            }
            summary.outcomes.push(EntryOutcome { line_number, entry, result });
            entry += 1;
        }
        info!(
            "Path done: {} viewpoints, {} executed, {} failed",
            summary.processed(), summary.executed(), summary.failed()
        );
        Ok(summary)
    }

    fn run_line(&mut self, entry: usize, line: &str) -> Result<(), PathError> {
        let pose = parse_pose_line(line)?;
        self.run_pose(entry, &pose)
    }

    /// Processes one viewpoint: IK, planning, time parameterization, execution.
    pub fn run_pose(&mut self, entry: usize, pose: &Pose6) -> Result<(), PathError> {
        let config = &self.config;
        let target = pose.to_target(config.scale, &config.position_offset);
        trace!("Viewpoint {} transform:\n{}", entry, pose_to_transform(&pose.scaled(config.scale)));

        let current = self.executor.current_state();
        let goal = match self.solver.solve(&target, &current, config.ik_attempts, config.ik_timeout) {
            Some(goal) => goal,
            None => {
                error!("Did not find IK solution for viewpoint {}", entry);
                return Err(PathError::IkFailure { entry });
            }
        };
        info!("Successful IK for viewpoint number: {}", entry);

        let request = PlanRequest {
            start: current,
            goal: JointGoal::new(goal, config.goal_tolerance),
            workspace: config.workspace,
        };
        let trajectory = match self.planner.plan(&request) {
            Ok(trajectory) => trajectory,
            Err(err) => {
                error!("Could not compute plan successfully for viewpoint {}: {}", entry, err);
                self.log_goal(&goal);
                return Err(err);
            }
        };
        debug!("Plan with {} waypoints", trajectory.waypoints.len());

        let timed = match self.timing.parameterize(&trajectory) {
            Ok(timed) => timed,
            Err(err) if config.execute_unparameterized => {
                warn!("{}, executing with nominal time stamps", err);
                nominal_timing(&trajectory, config.nominal_step_duration)
            }
            Err(err) => {
                error!("Viewpoint {}: {}", entry, err);
                return Err(err);
            }
        };

        if let Err(err) = self.executor.execute(&current, &timed) {
            error!("Viewpoint {}: {}", entry, err);
            return Err(err);
        }
        info!("Viewpoint {} reached in {:.2} s", entry, timed.duration());
        Ok(())
    }

    fn log_goal(&self, goal: &Joints) {
        info!("Goal {}", format_joints(goal));
        for (name, value) in self.config.joint_names.iter().zip(goal.iter()) {
            info!("Joint {}: {}", name, value);
        }
    }
}

/// Evenly spaced time stamps with zero velocities, for paths that could not be parameterized.
fn nominal_timing(trajectory: &JointTrajectory, step_duration: f64) -> TimedTrajectory {
    TimedTrajectory {
        points: trajectory
            .waypoints
            .iter()
            .enumerate()
            .map(|(i, positions)| TrajectoryPoint {
                positions: *positions,
                velocities: [0.0; 6],
                accelerations: [0.0; 6],
                time_from_start: i as f64 * step_duration,
            })
            .collect(),
    }
}
