//! Time parameterization of geometric joint paths

use tracing::{debug, warn};

use crate::kinematic_traits::Joints;
use crate::path_error::PathError;
use crate::planning_traits::{JointTrajectory, TimeParameterizer, TimedTrajectory, TrajectoryPoint};
use crate::utils::is_valid;

/// Shortest allowed segment, seconds.
const MIN_SEGMENT_DURATION: f64 = 1e-3;

/// Default joint velocity limit of UR arms, rad/s
pub const UR_MAX_VELOCITY: f64 = 3.15;

/// Conservative default joint acceleration, rad/s^2
pub const UR_MAX_ACCELERATION: f64 = 3.0;

/// Assigns time stamps so that no joint exceeds its velocity and acceleration limit.
/// Segments start at the duration the velocity limit allows, then the segments where
/// the implied acceleration is too high are iteratively stretched.
#[derive(Debug, Clone)]
pub struct IterativeTimeParameterization {
    pub velocity_limits: Joints,
    pub acceleration_limits: Joints,

    /// Fraction (0, 1] of the velocity and acceleration limits actually used
    pub velocity_scaling: f64,

    pub max_iterations: usize,
}

impl Default for IterativeTimeParameterization {
    fn default() -> Self {
        IterativeTimeParameterization {
            velocity_limits: [UR_MAX_VELOCITY; 6],
            acceleration_limits: [UR_MAX_ACCELERATION; 6],
            velocity_scaling: 1.0,
            max_iterations: 1000,
        }
    }
}

impl IterativeTimeParameterization {
    fn scaled_limits(&self) -> Result<(Joints, Joints), PathError> {
        let s = self.velocity_scaling;
        if !(s > 0.0 && s <= 1.0) {
            return Err(PathError::TimeParameterizationFailure(format!(
                "velocity scaling must be in (0, 1], got {}", s
            )));
        }
        let valid = |limits: &Joints| limits.iter().all(|l| l.is_finite() && *l > 0.0);
        if !valid(&self.velocity_limits) || !valid(&self.acceleration_limits) {
            return Err(PathError::TimeParameterizationFailure(
                "velocity and acceleration limits must be positive".to_string(),
            ));
        }
        Ok((self.velocity_limits.map(|v| v * s), self.acceleration_limits.map(|a| a * s)))
    }

    /// First guess of segment durations: a trapezoidal speed profile along the whole path.
    /// Each segment is measured in the time its slowest joint needs at full velocity,
    /// the path speed ramps up from rest and back down with the acceleration the most
    /// demanding segment allows.
    fn initial_durations(positions: &[Joints], vmax: &Joints, amax: &Joints) -> Vec<f64> {
        let lengths: Vec<f64> = positions
            .windows(2)
            .map(|pair| {
                (0..6)
                    .map(|j| (pair[1][j] - pair[0][j]).abs() / vmax[j])
                    .fold(0.0, f64::max)
            })
            .collect();

        // Path acceleration limit (1/s): joint acceleration at full speed direction
        let alpha = positions
            .windows(2)
            .zip(lengths.iter())
            .filter(|(_, length)| **length > 0.0)
            .flat_map(|(pair, length)| {
                (0..6).filter_map(move |j| {
                    let rate = (pair[1][j] - pair[0][j]).abs() / length;
                    if rate > 0.0 { Some(amax[j] / rate) } else { None }
                })
            })
            .fold(f64::INFINITY, f64::min);

        let total: f64 = lengths.iter().sum();
        let mut travelled = 0.0;
        lengths
            .iter()
            .map(|length| {
                let middle = travelled + 0.5 * length;
                travelled += length;
                let speed = if alpha.is_finite() {
                    (2.0 * alpha * middle)
                        .sqrt()
                        .min((2.0 * alpha * (total - middle)).sqrt())
                        .min(1.0)
                } else {
                    1.0
                };
                if speed > 0.0 {
                    (length / speed).max(MIN_SEGMENT_DURATION)
                } else {
                    MIN_SEGMENT_DURATION
                }
            })
            .collect()
    }

    /// Velocities at waypoints: zero at both ends, average of the neighbouring segment
    /// slopes inside, zero where the joint changes direction.
    fn waypoint_velocities(positions: &[Joints], durations: &[f64], vmax: &Joints) -> Vec<Joints> {
        let n = positions.len();
        let mut velocities = vec![[0.0; 6]; n];
        for k in 1..n.saturating_sub(1) {
            for j in 0..6 {
                let before = (positions[k][j] - positions[k - 1][j]) / durations[k - 1];
                let after = (positions[k + 1][j] - positions[k][j]) / durations[k];
                velocities[k][j] = if before * after > 0.0 {
                    (0.5 * (before + after)).clamp(-vmax[j], vmax[j])
                } else {
                    0.0
                };
            }
        }
        velocities
    }

    /// Accelerations at the start and at the end of the segment when it is followed as the
    /// cubic that matches positions and velocities at both waypoints.
    fn segment_accelerations(from: &Joints, to: &Joints, v_from: &Joints, v_to: &Joints, d: f64) -> (Joints, Joints) {
        let at_start = std::array::from_fn(|j| {
            (6.0 * (to[j] - from[j]) - 4.0 * v_from[j] * d - 2.0 * v_to[j] * d) / (d * d)
        });
        let at_end = std::array::from_fn(|j| {
            (-6.0 * (to[j] - from[j]) + 2.0 * v_from[j] * d + 4.0 * v_to[j] * d) / (d * d)
        });
        (at_start, at_end)
    }

    /// Largest ratio of implied acceleration to its limit, per segment.
    fn acceleration_ratios(positions: &[Joints], velocities: &[Joints], durations: &[f64], amax: &Joints) -> Vec<f64> {
        durations
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let (at_start, at_end) = Self::segment_accelerations(
                    &positions[i], &positions[i + 1], &velocities[i], &velocities[i + 1], *d,
                );
                (0..6)
                    .map(|j| at_start[j].abs().max(at_end[j].abs()) / amax[j])
                    .fold(0.0, f64::max)
            })
            .collect()
    }
}

impl TimeParameterizer for IterativeTimeParameterization {
    fn parameterize(&self, trajectory: &JointTrajectory) -> Result<TimedTrajectory, PathError> {
        let positions = &trajectory.waypoints;
        if positions.is_empty() {
            return Err(PathError::TimeParameterizationFailure("empty trajectory".to_string()));
        }
        if !positions.iter().all(is_valid) {
            return Err(PathError::TimeParameterizationFailure(
                "trajectory contains non finite joint values".to_string(),
            ));
        }
        let (vmax, amax) = self.scaled_limits()?;

        let mut durations = Self::initial_durations(positions, &vmax, &amax);
        let mut velocities = Self::waypoint_velocities(positions, &durations, &vmax);
        let mut converged = false;
        for iteration in 0..self.max_iterations {
            let ratios = Self::acceleration_ratios(positions, &velocities, &durations, &amax);
            if ratios.iter().all(|r| *r <= 1.0 + 1e-9) {
                debug!("Time parameterization converged after {} iterations", iteration);
                converged = true;
                break;
            }
            for (duration, ratio) in durations.iter_mut().zip(ratios.iter()) {
                if *ratio > 1.0 {
                    *duration *= ratio.sqrt() * 1.01;
                }
            }
            velocities = Self::waypoint_velocities(positions, &durations, &vmax);
        }
        if !converged {
            warn!("Time parameterization did not converge in {} iterations", self.max_iterations);
            return Err(PathError::TimeParameterizationFailure(format!(
                "acceleration limits not met after {} iterations", self.max_iterations
            )));
        }

        let mut points = Vec::with_capacity(positions.len());
        let mut time = 0.0;
        for (k, position) in positions.iter().enumerate() {
            // Acceleration at the start of the outgoing segment, at the end of the last one
            let accelerations = match durations.get(k) {
                Some(d) => Self::segment_accelerations(
                    position, &positions[k + 1], &velocities[k], &velocities[k + 1], *d,
                ).0,
                None if k > 0 => Self::segment_accelerations(
                    &positions[k - 1], position, &velocities[k - 1], &velocities[k], durations[k - 1],
                ).1,
                None => [0.0; 6],
            };
            points.push(TrajectoryPoint {
                positions: *position,
                velocities: velocities[k],
                accelerations,
                time_from_start: time,
            });
            if let Some(d) = durations.get(k) {
                time += d;
            }
        }
        Ok(TimedTrajectory { points })
    }
}
