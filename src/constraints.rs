use std::f64::consts::PI;
use std::ops::RangeInclusive;

use rand::Rng;

use crate::kinematic_traits::Joints;

/// Joint limits of the arm, radians. Unlike the wrapping angle ranges of some industrial
/// controllers, UR joints turn up to two full revolutions, so limits are plain intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Lower limit for each joint
    pub from: Joints,

    /// Upper limit for each joint
    pub to: Joints,
}

impl Default for Constraints {
    /// +/- 360 degrees on every joint, as UR arms ship.
    fn default() -> Self {
        Constraints::new([-2.0 * PI; 6], [2.0 * PI; 6])
    }
}

impl Constraints {
    pub fn new(from: Joints, to: Joints) -> Self {
        Constraints { from, to }
    }

    /// Limits given in degrees, converted internally to radians.
    pub fn from_degrees(ranges: [RangeInclusive<f64>; 6]) -> Self {
        let from = std::array::from_fn(|i| ranges[i].start().to_radians());
        let to = std::array::from_fn(|i| ranges[i].end().to_radians());
        Constraints { from, to }
    }

    /// Checks that the lower limit is not above the upper one and all limits are finite.
    pub fn is_valid(&self) -> bool {
        (0..6).all(|i| self.from[i].is_finite() && self.to[i].is_finite() && self.from[i] <= self.to[i])
    }

    pub fn compliant(&self, angles: &Joints) -> bool {
        (0..6).all(|i| angles[i] >= self.from[i] && angles[i] <= self.to[i])
    }

    /// Moves every joint inside its limits.
    pub fn clamp(&self, angles: &Joints) -> Joints {
        std::array::from_fn(|i| angles[i].clamp(self.from[i], self.to[i]))
    }

    /// Random joint values, uniformly distributed within the limits.
    pub fn random_angles<R: Rng + ?Sized>(&self, rng: &mut R) -> Joints {
        std::array::from_fn(|i| {
            if self.from[i] < self.to[i] {
                rng.gen_range(self.from[i]..=self.to[i])
            } else {
                self.from[i]
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_within_limits() {
        let angles = [0.1 * PI, 0.2 * PI, 0.3 * PI, 0.4 * PI, 0.5 * PI, 0.6 * PI];
        let from = [0.0, 0.15 * PI, 0.25 * PI, 0.35 * PI, 0.45 * PI, 0.55 * PI];
        let to = [0.2 * PI, 0.3 * PI, 0.4 * PI, 0.5 * PI, 0.6 * PI, 0.7 * PI];
        let limits = Constraints::new(from, to);
        assert!(limits.compliant(&angles));
    }

    #[test]
    fn test_outside_limits() {
        let angles = [0.15 * PI, 0.25 * PI, 0.55 * PI, 0.65 * PI, 0.75 * PI, 0.85 * PI];
        let from = [0.2 * PI, 0.3 * PI, 0.6 * PI, 0.7 * PI, 0.8 * PI, 0.9 * PI];
        let to = [0.3 * PI, 0.4 * PI, 0.7 * PI, 0.8 * PI, 0.9 * PI, 1.0 * PI];
        let limits = Constraints::new(from, to);
        assert!(!limits.compliant(&angles));
    }

    #[test]
    fn test_two_revolutions() {
        let limits = Constraints::default();
        assert!(limits.compliant(&[-2.0 * PI, 1.9 * PI, 0.0, -PI, PI, 2.0 * PI]));
        assert!(!limits.compliant(&[0.0, 0.0, 0.0, 0.0, 0.0, 2.1 * PI]));
    }

    #[test]
    fn test_from_degrees() {
        let limits = Constraints::from_degrees([
            -90.0..=90.0, -180.0..=0.0, -10.0..=10.0,
            -360.0..=360.0, -360.0..=360.0, -360.0..=360.0,
        ]);
        assert!(limits.is_valid());
        assert!((limits.from[1] + PI).abs() < 1e-12);
        assert!((limits.to[0] - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_and_random() {
        let limits = Constraints::new([-1.0; 6], [1.0; 6]);
        assert_eq!(limits.clamp(&[2.0, -2.0, 0.5, 0.0, 1.0, -1.0]), [1.0, -1.0, 0.5, 0.0, 1.0, -1.0]);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(limits.compliant(&limits.random_angles(&mut rng)));
        }
    }
}
