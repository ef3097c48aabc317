//! Crate-level error types.

use std::fmt;

use crate::scene::NodeId;

/// Errors produced by the rigcam crate.
#[derive(Debug)]
pub enum RigError {
    /// Generic I/O failure while reading or writing an options file.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Options parsed fine but describe an unusable rig.
    InvalidOptions(String),
    /// A node id that does not belong to the scene graph.
    UnknownNode(NodeId),
    /// The rig nodes are not parented anchor -> mount -> camera.
    Hierarchy(String),
}

impl fmt::Display for RigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOptions(msg) => {
                write!(f, "invalid rig options: {msg}")
            }
            Self::UnknownNode(id) => {
                write!(f, "node {id} is not in the scene graph")
            }
            Self::Hierarchy(msg) => write!(f, "bad rig hierarchy: {msg}"),
        }
    }
}

impl std::error::Error for RigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
