//! Runtime error types for the Bare Bones interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lexical or parse errors).
//!
//! The language itself has no recoverable runtime errors: every failure here is
//! either a limit imposed by the host or an internal inconsistency, and all of
//! them halt execution.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The configured step budget ran out
    StepLimitExceeded {
        limit: u64,
        statement: &'static str,
        location: SourceLocation,
    },

    /// Snapshot history limit exceeded
    SnapshotLimitExceeded {
        current: usize,
        limit: usize,
        location: SourceLocation,
    },

    /// A condition the parser and evaluator should have ruled out
    InternalInvariant {
        message: String,
        location: SourceLocation,
    },

    /// History navigation moved past either end
    HistoryOperationFailed {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::StepLimitExceeded { location, .. }
            | RuntimeError::SnapshotLimitExceeded { location, .. }
            | RuntimeError::InternalInvariant { location, .. }
            | RuntimeError::HistoryOperationFailed { location, .. } => Some(location),
        }
    }

    /// Short name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::StepLimitExceeded { .. } => "StepLimitExceeded",
            RuntimeError::SnapshotLimitExceeded { .. } => "SnapshotLimitExceeded",
            RuntimeError::InternalInvariant { .. } => "InternalInvariant",
            RuntimeError::HistoryOperationFailed { .. } => "HistoryOperationFailed",
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::StepLimitExceeded {
                limit,
                statement,
                location,
            } => {
                write!(
                    f,
                    "Step limit of {} exceeded at '{}' statement, line {}, column {}",
                    limit, statement, location.line, location.column
                )
            }
            RuntimeError::SnapshotLimitExceeded {
                current,
                limit,
                location,
            } => {
                write!(
                    f,
                    "Snapshot memory limit exceeded at line {}, column {}: {} bytes used, limit is {}",
                    location.line, location.column, current, limit
                )
            }
            RuntimeError::InternalInvariant { message, location } => {
                write!(
                    f,
                    "Internal error at line {}, column {}: {}",
                    location.line, location.column, message
                )
            }
            RuntimeError::HistoryOperationFailed { message, .. } => {
                write!(f, "History operation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}
