//! Supports reading the run configuration from YAML file (optional)

use std::path::Path;
use std::time::Duration;

use nalgebra::Vector3;
use yaml_rust2::{Yaml, YamlLoader};

use crate::kinematic_traits::Joints;
use crate::parameters::ur_kinematics::Parameters;
use crate::path_error::PathError;
use crate::path_runner::RunConfig;
use crate::workspace::WorkspaceBounds;

/// Joint state the arm is assumed to start from unless configured: upright, wrist down.
pub const HOME: Joints = [
    0.0,
    -std::f64::consts::FRAC_PI_2,
    std::f64::consts::FRAC_PI_2,
    -std::f64::consts::FRAC_PI_2,
    -std::f64::consts::FRAC_PI_2,
    0.0,
];

/// Everything the path runner binary needs to know besides the path itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PathConfig {
    /// Robot model name, see [Parameters::by_name]
    pub robot: String,
    pub run: RunConfig,
    /// Initial joint state of the arm
    pub home: Joints,
    /// Fraction of the joint velocity and acceleration limits used for execution
    pub velocity_scaling: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        PathConfig {
            robot: "ur5".to_string(),
            run: RunConfig::default(),
            home: HOME,
            velocity_scaling: 1.0,
        }
    }
}

impl PathConfig {
    /// Read the configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// robot: ur5
    /// scale: 100.0
    /// position_offset: [0.2, 0.0, 0.0]
    /// ik_attempts: 10
    /// ik_timeout: 0.1
    /// goal_tolerance: 0.001
    /// workspace: { min: [-0.7, -0.7, -0.05], max: [0.7, 0.7, 0.7] }
    /// home: [0.0, deg(-90), deg(90), deg(-90), deg(-90), 0.0]
    /// velocity_scaling: 1.0
    /// execute_unparameterized: false
    /// ```
    /// All keys are optional, missing ones keep their defaults. Angles of `home` can be
    /// given in radians or as deg(angle).
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, PathError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, PathError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| PathError::ConfigError(e.to_string()))?;
        let mut config = PathConfig::default();
        let doc = match docs.first() {
            Some(doc) if !doc.is_null() => doc,
            _ => return Ok(config),
        };
        if doc.as_hash().is_none() {
            return Err(PathError::ConfigError("top level must be a mapping".to_string()));
        }

        if let Some(robot) = optional(doc, "robot") {
            let name = robot
                .as_str()
                .ok_or_else(|| PathError::ConfigError("robot must be a string".to_string()))?;
            if Parameters::by_name(name).is_none() {
                return Err(PathError::ConfigError(format!("unknown robot model '{}'", name)));
            }
            config.robot = name.to_string();
        }

        let run = &mut config.run;
        if let Some(value) = optional(doc, "scale") {
            run.scale = positive(value, "scale")?;
        }
        if let Some(value) = optional(doc, "position_offset") {
            let [x, y, z] = array::<3>(value, "position_offset", as_number)?;
            run.position_offset = Vector3::new(x, y, z);
        }
        if let Some(value) = optional(doc, "ik_attempts") {
            run.ik_attempts = match value.as_i64() {
                Some(n) if n > 0 => n as usize,
                _ => return Err(invalid("ik_attempts", "a positive integer")),
            };
        }
        if let Some(value) = optional(doc, "ik_timeout") {
            run.ik_timeout = Duration::try_from_secs_f64(positive(value, "ik_timeout")?)
                .map_err(|_| invalid("ik_timeout", "a positive number of seconds"))?;
        }
        if let Some(value) = optional(doc, "goal_tolerance") {
            run.goal_tolerance = positive(value, "goal_tolerance")?;
        }
        if let Some(workspace) = optional(doc, "workspace") {
            let bounds = WorkspaceBounds::new(
                array::<3>(&workspace["min"], "workspace.min", as_number)?,
                array::<3>(&workspace["max"], "workspace.max", as_number)?,
            );
            if !bounds.is_valid() {
                return Err(invalid("workspace", "min corner below max corner on every axis"));
            }
            run.workspace = bounds;
        }
        if let Some(value) = optional(doc, "execute_unparameterized") {
            run.execute_unparameterized = value
                .as_bool()
                .ok_or_else(|| invalid("execute_unparameterized", "true or false"))?;
        }

        if let Some(value) = optional(doc, "home") {
            config.home = array::<6>(value, "home", as_angle)?;
        }
        if let Some(value) = optional(doc, "velocity_scaling") {
            let scaling = positive(value, "velocity_scaling")?;
            if scaling > 1.0 {
                return Err(invalid("velocity_scaling", "in (0, 1]"));
            }
            config.velocity_scaling = scaling;
        }
        Ok(config)
    }
}

fn optional<'a>(doc: &'a Yaml, key: &str) -> Option<&'a Yaml> {
    let value = &doc[key];
    if value.is_badvalue() || value.is_null() { None } else { Some(value) }
}

fn invalid(key: &str, expected: &str) -> PathError {
    PathError::ConfigError(format!("{} must be {}", key, expected))
}

/// Integers are accepted where reals are expected.
fn as_number(value: &Yaml) -> Option<f64> {
    match value {
        Yaml::Real(_) => value.as_f64(),
        Yaml::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

/// Radians, or degrees written as deg(angle).
fn as_angle(value: &Yaml) -> Option<f64> {
    if let Some(text) = value.as_str() {
        let inner = text.trim().strip_prefix("deg(")?.strip_suffix(')')?;
        return inner.trim().parse::<f64>().ok().map(f64::to_radians);
    }
    as_number(value)
}

fn positive(value: &Yaml, key: &str) -> Result<f64, PathError> {
    match as_number(value) {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(invalid(key, "a positive number")),
    }
}

fn array<const N: usize>(value: &Yaml, key: &str, convert: fn(&Yaml) -> Option<f64>)
                         -> Result<[f64; N], PathError> {
    let items = value
        .as_vec()
        .filter(|items| items.len() == N)
        .ok_or_else(|| invalid(key, &format!("a list of {} numbers", N)))?;
    let mut result = [0.0; N];
    for (slot, item) in result.iter_mut().zip(items) {
        *slot = convert(item)
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(key, &format!("a list of {} numbers", N)))?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(PathConfig::from_yaml_str("").unwrap(), PathConfig::default());
        assert_eq!(PathConfig::from_yaml_str("# nothing\n").unwrap(), PathConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = PathConfig::from_yaml_str("robot: ur10\nik_attempts: 3\nscale: 1000\n").unwrap();
        assert_eq!(config.robot, "ur10");
        assert_eq!(config.run.ik_attempts, 3);
        assert_eq!(config.run.scale, 1000.0);
        assert_eq!(config.run.goal_tolerance, 1e-3);
        assert_eq!(config.home, HOME);
    }

    #[test]
    fn test_deg_angles() {
        let config = PathConfig::from_yaml_str("home: [0, deg(-90), deg(90), 0.5, deg(-90), 0.0]").unwrap();
        assert_eq!(config.home[0], 0.0);
        assert!((config.home[1] + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((config.home[2] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(config.home[3], 0.5);
    }

    #[test]
    fn test_rejected_values() {
        for yaml in [
            "robot: kuka",
            "scale: -1",
            "ik_timeout: 1e30",
            "ik_timeout: 0",
            "ik_attempts: 0",
            "position_offset: [0.2, 0.0]",
            "home: [0, 0, 0, 0, 0, deg(x)]",
            "velocity_scaling: 2.0",
            "execute_unparameterized: maybe",
            "workspace: { min: [1, 1, 1], max: [0, 0, 0] }",
            "- just\n- a list\n",
            "scale: [unclosed",
        ] {
            assert!(
                matches!(PathConfig::from_yaml_str(yaml), Err(PathError::ConfigError(_))),
                "accepted: {}", yaml
            );
        }
    }
}
