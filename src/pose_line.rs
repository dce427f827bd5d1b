//! Parsing of viewpoint lines `x,y,z,roll,pitch,yaw`

use nalgebra::{Translation3, UnitQuaternion, Vector3};

use crate::kinematic_traits::Pose;
use crate::path_error::PathError;

/// Number of fields in every viewpoint line.
pub const POSE_FIELDS: usize = 6;

/// Viewpoint as read from the path file: position x, y, z followed by roll, pitch, yaw
/// in radians. Position units are these of the file (centimeters in a normal path file).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose6([f64; POSE_FIELDS]);

impl Pose6 {
    pub fn new(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Self {
        Pose6([x, y, z, roll, pitch, yaw])
    }

    pub fn values(&self) -> &[f64; POSE_FIELDS] {
        &self.0
    }

    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.0[0], self.0[1], self.0[2])
    }

    pub fn roll(&self) -> f64 {
        self.0[3]
    }

    pub fn pitch(&self) -> f64 {
        self.0[4]
    }

    pub fn yaw(&self) -> f64 {
        self.0[5]
    }

    /// Same orientation, position divided by `scale`.
    pub fn scaled(&self, scale: f64) -> Self {
        let v = &self.0;
        Pose6([v[0] / scale, v[1] / scale, v[2] / scale, v[3], v[4], v[5]])
    }

    /// Tool flange target: position divided by `scale`, then shifted by `offset`.
    /// Orientation is the quaternion built from roll, pitch and yaw.
    pub fn to_target(&self, scale: f64, offset: &Vector3<f64>) -> Pose {
        let position = self.scaled(scale).position() + offset;
        let rotation = UnitQuaternion::from_euler_angles(self.roll(), self.pitch(), self.yaw());
        Pose::from_parts(Translation3::from(position), rotation)
    }
}

impl TryFrom<&[f64]> for Pose6 {
    type Error = PathError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let fields: [f64; POSE_FIELDS] = values.try_into().map_err(|_| PathError::MalformedLine {
            expected: POSE_FIELDS,
            found: values.len(),
        })?;
        Ok(Pose6(fields))
    }
}

/// Parses the line into six values. The line is split on ',' and the last field runs
/// to the end of the line, so a trailing comma does not start an extra field.
/// Each field is converted like C `strtod`: the longest numeric prefix is used,
/// and a field without one reads as 0.0. Lines with other than six fields are rejected.
pub fn parse_pose_line(line: &str) -> Result<Pose6, PathError> {
    let mut fields = [0.0; POSE_FIELDS];
    let mut found = 0;
    let mut start = 0;
    let last = line.char_indices().last().map(|(i, _)| i);

    for (i, c) in line.char_indices() {
        let end = if c == ',' {
            i
        } else if Some(i) == last {
            i + c.len_utf8()
        } else {
            continue;
        };
        if found < POSE_FIELDS {
            fields[found] = leading_f64(&line[start..end]);
        }
        found += 1;
        start = i + c.len_utf8();
    }

    if found != POSE_FIELDS {
        return Err(PathError::MalformedLine { expected: POSE_FIELDS, found });
    }
    Ok(Pose6(fields))
}

/// Converts the longest numeric prefix of the token, skipping leading whitespace.
/// Returns 0.0 if there is no such prefix.
pub fn leading_f64(token: &str) -> f64 {
    let s = token.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts if at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}
