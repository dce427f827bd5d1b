use crate::kinematic_traits::Joints;
use crate::planning_traits::TimedTrajectory;

/// Linear interpolation between two joint positions, `t` is clamped to [0, 1]
pub fn interpolate_joints(start: &Joints, end: &Joints, t: f64) -> Joints {
    if t <= 0.0 {
        return *start;
    } else if t >= 1.0 {
        return *end;
    }

    let mut interpolated = [0.0; 6];
    for i in 0..6 {
        interpolated[i] = start[i] + t * (end[i] - start[i]);
    }
    interpolated
}

/// Samples a timed trajectory at arbitrary time
pub struct Interpolator<'a> {
    trajectory: &'a TimedTrajectory,
}

impl<'a> Interpolator<'a> {
    pub fn new(trajectory: &'a TimedTrajectory) -> Self {
        Interpolator { trajectory }
    }

    /// Position at `time` seconds from the start. Before the start the first point
    /// is returned, past the end the last one. None for an empty trajectory.
    pub fn position_at(&self, time: f64) -> Option<Joints> {
        let points = &self.trajectory.points;
        let first = points.first()?;
        if time <= first.time_from_start {
            return Some(first.positions);
        }

        // First point that is not earlier than `time`
        let index = points.partition_point(|p| p.time_from_start < time);
        if index >= points.len() {
            return points.last().map(|p| p.positions);
        }
        let start = &points[index - 1];
        let end = &points[index];
        let span = end.time_from_start - start.time_from_start;
        let t = if span > 0.0 { (time - start.time_from_start) / span } else { 1.0 };
        Some(interpolate_joints(&start.positions, &end.positions, t))
    }
}
