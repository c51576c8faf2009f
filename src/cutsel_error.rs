// SPDX-License-Identifier: Apache-2.0

use crate::blif::ParseError;
use crate::rebuild::RebuildDiagnostic;

/// Coarse failure classes; the driver maps each to a distinct exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Io,
    Artifact,
    Network,
    Rebuild,
    Interface,
}

#[derive(Debug)]
pub enum CutselError {
    Io {
        path: String,
        source: std::io::Error,
    },
    /// A JSON artifact (cut features or selection) is malformed or is
    /// missing a required field.
    Artifact {
        what: &'static str,
        msg: String,
    },
    /// Enumeration parameters are out of range.
    InvalidParams(String),
    /// The original network could not be read.
    Blif {
        path: String,
        error: ParseError,
    },
    /// A strict-mode rebuild hit its first per-entity anomaly.
    StrictRebuild(RebuildDiagnostic),
    /// Two networks do not share the interface needed to compare them.
    InterfaceMismatch(String),
}

impl CutselError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CutselError::Io { .. } => ErrorClass::Io,
            CutselError::Artifact { .. } | CutselError::InvalidParams(_) => ErrorClass::Artifact,
            CutselError::Blif { .. } => ErrorClass::Network,
            CutselError::StrictRebuild(_) => ErrorClass::Rebuild,
            CutselError::InterfaceMismatch(_) => ErrorClass::Interface,
        }
    }
}

impl std::fmt::Display for CutselError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutselError::Io { path, source } => write!(f, "I/O error on '{}': {}", path, source),
            CutselError::Artifact { what, msg } => write!(f, "invalid {}: {}", what, msg),
            CutselError::InvalidParams(msg) => {
                write!(f, "invalid cut enumeration parameters: {}", msg)
            }
            CutselError::Blif { path, error } => {
                write!(f, "failed to read BLIF '{}': {}", path, error)
            }
            CutselError::StrictRebuild(diag) => {
                write!(f, "strict rebuild aborted: {}", diag)
            }
            CutselError::InterfaceMismatch(msg) => write!(f, "interface mismatch: {}", msg),
        }
    }
}

impl std::error::Error for CutselError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CutselError::Io { source, .. } => Some(source),
            CutselError::Blif { error, .. } => Some(error),
            _ => None,
        }
    }
}
