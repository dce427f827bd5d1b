//! Simulated execution of time parameterized trajectories

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::interpolator::Interpolator;
use crate::kinematic_traits::Joints;
use crate::path_error::PathError;
use crate::planning_traits::{TimedTrajectory, TrajectoryExecutor};
use crate::time_parameterization::UR_MAX_VELOCITY;
use crate::utils::{format_joints, is_valid, max_joint_distance};

/// Executor that follows the trajectory on a simulated arm. The trajectory is sampled
/// at the control period, every sample is checked against the joint velocity limits
/// and the arm state advances to the final waypoint on success.
#[derive(Debug)]
pub struct SimulatedExecutor {
    state: Joints,

    /// Control loop period, seconds
    pub control_period: f64,

    pub velocity_limits: Joints,

    /// Allowed excess over the velocity limits, 0.05 is 5 %
    pub velocity_margin: f64,

    /// Largest allowed difference between the robot state and the trajectory start, radians
    pub start_tolerance: f64,

    /// If set, the executor sleeps to follow the trajectory in real time
    pub real_time: bool,

    executed: usize,
}

impl SimulatedExecutor {
    /// Acquires the simulated arm at the given joint state.
    pub fn new(initial_state: Joints) -> Self {
        SimulatedExecutor {
            state: initial_state,
            control_period: 0.008,
            velocity_limits: [UR_MAX_VELOCITY; 6],
            velocity_margin: 0.05,
            start_tolerance: 1e-3,
            real_time: false,
            executed: 0,
        }
    }

    /// Number of trajectories executed successfully.
    pub fn executed(&self) -> usize {
        self.executed
    }

    fn check_trajectory(&self, start: &Joints, trajectory: &TimedTrajectory) -> Result<(), PathError> {
        let first = trajectory.points.first().ok_or_else(|| {
            PathError::ExecutionFailure("empty trajectory".to_string())
        })?;
        if max_joint_distance(start, &self.state) > self.start_tolerance {
            return Err(PathError::ExecutionFailure(format!(
                "start state {} deviates from the robot state {}",
                format_joints(start), format_joints(&self.state)
            )));
        }
        if max_joint_distance(&first.positions, start) > self.start_tolerance {
            return Err(PathError::ExecutionFailure(format!(
                "trajectory begins at {}, not at the start state {}",
                format_joints(&first.positions), format_joints(start)
            )));
        }
        for pair in trajectory.points.windows(2) {
            if !is_valid(&pair[1].positions) || !pair[1].time_from_start.is_finite() {
                return Err(PathError::ExecutionFailure("non finite trajectory point".to_string()));
            }
            if pair[1].time_from_start <= pair[0].time_from_start {
                return Err(PathError::ExecutionFailure(format!(
                    "time stamps do not increase at {:.4} s", pair[1].time_from_start
                )));
            }
        }
        Ok(())
    }
}

impl TrajectoryExecutor for SimulatedExecutor {
    fn current_state(&self) -> Joints {
        self.state
    }

    fn execute(&mut self, start: &Joints, trajectory: &TimedTrajectory) -> Result<(), PathError> {
        self.check_trajectory(start, trajectory)?;

        let interpolator = Interpolator::new(trajectory);
        let duration = trajectory.duration();
        let started = Instant::now();
        let mut previous = *start;
        let mut previous_time = 0.0;
        while previous_time < duration {
            let time = (previous_time + self.control_period).min(duration);
            let step = time - previous_time;
            let sample = interpolator.position_at(time).ok_or_else(|| {
                PathError::ExecutionFailure("trajectory ended unexpectedly".to_string())
            })?;
            for j in 0..6 {
                let velocity = (sample[j] - previous[j]).abs() / step;
                if velocity > self.velocity_limits[j] * (1.0 + self.velocity_margin) {
                    return Err(PathError::ExecutionFailure(format!(
                        "joint {} velocity {:.3} rad/s over the limit at {:.3} s", j, velocity, time
                    )));
                }
            }
            previous = sample;
            previous_time = time;
            if self.real_time {
                let due = Duration::from_secs_f64(time);
                if let Some(wait) = due.checked_sub(started.elapsed()) {
                    std::thread::sleep(wait);
                }
            }
        }

        if let Some(last) = trajectory.points.last() {
            self.state = last.positions;
        }
        self.executed += 1;
        debug!("Executed trajectory of {:.3} s", duration);
        info!("Robot now at {}", format_joints(&self.state));
        Ok(())
    }
}
