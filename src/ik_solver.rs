//! Numerical inverse kinematics with random restarts

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Mutex;
use tracing::{debug, trace};

use crate::constraints::Constraints;
use crate::jacobian::{pose_error, Jacobian};
use crate::kinematic_traits::{Joints, Kinematics, Pose};
use crate::planning_traits::PoseSolver;
use crate::utils::{format_joints, is_valid};

/// Damped least squares IK solver. The first attempt starts from the seed,
/// every further attempt from random joint values within the constraints.
pub struct JacobianIkSolver {
    pub robot: Arc<dyn Kinematics>,
    pub constraints: Constraints,

    /// Accepted positional error, meters
    pub position_tolerance: f64,

    /// Accepted rotational error, radians
    pub rotation_tolerance: f64,

    /// Damping factor of the least squares step
    pub damping: f64,

    /// Largest joint change in a single iteration, radians
    pub max_step: f64,

    /// Iteration limit of a single attempt, on top of the attempt timeout
    pub max_iterations: usize,

    /// Perturbation for the numerical Jacobian
    pub epsilon: f64,

    rng: Mutex<StdRng>,
}

impl JacobianIkSolver {
    pub fn new(robot: Arc<dyn Kinematics>, constraints: Constraints) -> Self {
        JacobianIkSolver {
            robot,
            constraints,
            position_tolerance: 1e-5,
            rotation_tolerance: 1e-4,
            damping: 0.01,
            max_step: 0.2,
            max_iterations: 300,
            epsilon: 1e-7,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Same solver with reproducible random restarts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn converged(&self, current: &Pose, target: &Pose) -> bool {
        let position_error = (target.translation.vector - current.translation.vector).norm();
        let rotation_error = current.rotation.angle_to(&target.rotation);
        position_error <= self.position_tolerance && rotation_error <= self.rotation_tolerance
    }

    /// Single attempt from the given start. Returns the solution once the pose
    /// error is within tolerance, None on timeout, divergence or iteration limit.
    fn attempt(&self, target: &Pose, start: &Joints, timeout: Duration) -> Option<Joints> {
        let started = Instant::now();
        let mut qs = self.constraints.clamp(start);

        for _ in 0..self.max_iterations {
            let current = self.robot.forward(&qs);
            if self.converged(&current, target) {
                return if is_valid(&qs) && self.constraints.compliant(&qs) {
                    Some(qs)
                } else {
                    None
                };
            }
            if started.elapsed() > timeout {
                trace!("IK attempt timed out");
                return None;
            }

            let error = pose_error(&current, target);
            let jacobian = Jacobian::new(self.robot.as_ref(), &qs, self.epsilon);
            let step = jacobian.damped_step(&error, self.damping)?;

            // Scale down so that no joint moves more than max_step
            let largest = step.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
            let scale = if largest > self.max_step { self.max_step / largest } else { 1.0 };
            for i in 0..6 {
                qs[i] += step[i] * scale;
            }
            if !is_valid(&qs) {
                return None;
            }
            qs = self.constraints.clamp(&qs);
        }
        None
    }
}

impl PoseSolver for JacobianIkSolver {
    fn solve(&self, target: &Pose, seed: &Joints, attempts: usize, timeout: Duration) -> Option<Joints> {
        for attempt in 0..attempts {
            let start = if attempt == 0 {
                *seed
            } else {
                match self.rng.lock() {
                    Ok(mut rng) => self.constraints.random_angles(&mut *rng),
                    Err(_) => return None,
                }
            };
            if let Some(solution) = self.attempt(target, &start, timeout) {
                debug!("IK converged on attempt {}: {}", attempt, format_joints(&solution));
                return Some(solution);
            }
        }
        debug!("IK failed after {} attempts", attempts);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics_impl::URKinematics;
    use crate::parameters::ur_kinematics::Parameters;
    use nalgebra::{Translation3, UnitQuaternion};

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn solver() -> JacobianIkSolver {
        let robot = Arc::new(URKinematics::new(Parameters::ur5()));
        JacobianIkSolver::new(robot, Constraints::default()).with_seed(42)
    }

    #[test]
    fn test_solves_pose_near_seed() {
        let solver = solver();
        let expected = [0.2, -1.4, 1.5, -1.6, -1.5, 0.3];
        let target = solver.robot.forward(&expected);
        let seed = [0.25, -1.35, 1.45, -1.55, -1.45, 0.35];

        let solution = solver.solve(&target, &seed, 10, TIMEOUT).expect("IK should converge");
        let reached = solver.robot.forward(&solution);
        assert!((reached.translation.vector - target.translation.vector).norm() < 1e-4);
        assert!(reached.rotation.angle_to(&target.rotation) < 1e-3);
        assert!(solver.constraints.compliant(&solution));
    }

    #[test]
    fn test_seed_at_solution_returns_immediately() {
        let solver = solver();
        let qs = [0.0, -1.0, 1.0, -1.5, -1.5, 0.0];
        let target = solver.robot.forward(&qs);
        let solution = solver.solve(&target, &qs, 1, TIMEOUT).unwrap();
        assert_eq!(solution, qs);
    }

    #[test]
    fn test_unreachable_pose_fails() {
        let solver = solver();
        let target = Pose::from_parts(Translation3::new(5.0, 0.0, 0.0), UnitQuaternion::identity());
        assert!(solver.solve(&target, &[0.0; 6], 3, TIMEOUT).is_none());
    }

    #[test]
    fn test_zero_attempts_fail() {
        let solver = solver();
        let qs = [0.0, -1.0, 1.0, -1.5, -1.5, 0.0];
        let target = solver.robot.forward(&qs);
        assert!(solver.solve(&target, &qs, 0, TIMEOUT).is_none());
    }
}
