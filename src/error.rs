//! Error types for the DQBF solver.
//!
//! Only conditions caused by the caller (bad configuration, foreign functions, malformed
//! input, I/O) are reported as errors. Broken internal bookkeeping is a bug and panics.

use std::fmt;
use std::io;

use crate::function::ManagerId;

#[derive(Debug)]
pub enum DqbfError {
    /// The requested universal-variable elimination heuristic does not exist.
    UnsupportedHeuristic {
        /// The name that was requested
        name: String,
    },

    /// A function built by one BDD manager was handed to a formula bound to another.
    IncompatibleManager {
        /// The manager the formula is bound to
        expected: ManagerId,
        /// The manager that built the function
        found: ManagerId,
    },

    /// Malformed DQDIMACS input.
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// IO error wrapper
    Io(io::Error),
}

impl DqbfError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        DqbfError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for DqbfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqbfError::UnsupportedHeuristic { name } => write!(
                f,
                "Heuristic {:?} for choosing the next universal variable to eliminate is not implemented. \
                 Expected one of: once, continuous.",
                name
            ),
            DqbfError::IncompatibleManager { expected, found } => write!(
                f,
                "Cannot set matrix of a formula bound to BDD manager {} with a function from manager {}.",
                expected, found
            ),
            DqbfError::Parse { line, message } => {
                write!(f, "Failed to parse DQDIMACS input at line {}: {}", line, message)
            }
            DqbfError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for DqbfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DqbfError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DqbfError {
    fn from(err: io::Error) -> Self {
        DqbfError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, DqbfError>;
