//! Error handling for the viewpoint path runner

use std::io;
use std::path::PathBuf;

/// Unified error reported by the parser, the collaborators and the path runner.
/// Only `FileOpen`, `Io` and `ConfigError` are fatal for a run, all others
/// are reported per path entry.
#[derive(Debug)]
pub enum PathError {
    FileOpen { path: PathBuf, source: io::Error },
    IoError(io::Error),
    MalformedLine { expected: usize, found: usize },
    InvalidEncoding(std::str::Utf8Error),
    IkFailure { entry: usize },
    PlanningFailure(String),
    TimeParameterizationFailure(String),
    ExecutionFailure(String),
    ConfigError(String),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            PathError::FileOpen { ref path, ref source } =>
                write!(f, "Could not open path {}: {}", path.display(), source),
            PathError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            PathError::MalformedLine { expected, found } =>
                write!(f, "Malformed line: expected {} fields, found {}", expected, found),
            PathError::InvalidEncoding(ref err) =>
                write!(f, "Line is not valid UTF-8: {}", err),
            PathError::IkFailure { entry } =>
                write!(f, "Did not find IK solution for viewpoint {}", entry),
            PathError::PlanningFailure(ref msg) =>
                write!(f, "Planning failed: {}", msg),
            PathError::TimeParameterizationFailure(ref msg) =>
                write!(f, "Time parameterization failed: {}", msg),
            PathError::ExecutionFailure(ref msg) =>
                write!(f, "Execution failed: {}", msg),
            PathError::ConfigError(ref msg) =>
                write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PathError::FileOpen { source, .. } => Some(source),
            PathError::IoError(err) => Some(err),
            PathError::InvalidEncoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for PathError {
    fn from(err: io::Error) -> Self {
        PathError::IoError(err)
    }
}

impl PathError {
    /// True for errors that stop the whole run rather than a single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PathError::FileOpen { .. } | PathError::IoError(_) | PathError::ConfigError(_)
        )
    }
}
