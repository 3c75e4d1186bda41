//! Execution bound for a run.

use serde::{Deserialize, Serialize};

use super::CompilationError;

/// Default iteration bound when a caller does not pick one.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Limits applied to one run.
///
/// `max_iterations` caps the number of node invocations. It is the only guard
/// against `Repeat` loops and cyclic edge tables; the engine does no static
/// cycle detection. The bound is always at least 1: [`RunLimits::new`] and
/// deserialization both reject zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct RunLimits {
    max_iterations: usize,
}

impl RunLimits {
    /// Builds limits, rejecting a zero bound.
    pub fn new(max_iterations: usize) -> Result<Self, CompilationError> {
        if max_iterations == 0 {
            return Err(CompilationError::InvalidLimit(max_iterations));
        }
        Ok(Self { max_iterations })
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl TryFrom<usize> for RunLimits {
    type Error = CompilationError;

    fn try_from(max_iterations: usize) -> Result<Self, Self::Error> {
        Self::new(max_iterations)
    }
}

impl From<RunLimits> for usize {
    fn from(limits: RunLimits) -> usize {
        limits.max_iterations
    }
}
