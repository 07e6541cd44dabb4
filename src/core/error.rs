//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Index of a simulated qubit within the global state vector.
/// Qubit `q` corresponds to bit `q` of a basis-state index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl QubitId {
    /// Bit mask selecting this qubit in a basis-state index.
    pub fn mask(self) -> usize {
        1usize << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q({})", self.0)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QsatError>;

/// Errors raised while compiling, simulating or reading out a formula.
///
/// Structural problems with the input are reported immediately and never
/// repaired. Numerical imprecision of the count estimate is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QsatError {
    /// Malformed formula: zero literal, variable out of range, duplicate
    /// literal, empty clause or a clause count mismatch.
    #[error("Formula Error: {message}")]
    Formula {
        /// Formula failure message
        message: String,
    },

    /// The requested register layout needs more qubits than the simulator
    /// is configured to hold in memory.
    #[error("Resource Exceeded: {requested} qubits requested, simulator limit is {limit}")]
    ResourceExceeded {
        /// Qubits required by the layout
        requested: usize,
        /// Configured simulator limit
        limit: usize,
    },

    /// A gate or circuit is inconsistent with the register it acts upon.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },

    /// The state lost normalization or a workspace register was left dirty.
    #[error("Incoherence Violation: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },

    /// A configuration value is out of its accepted range.
    #[error("Invalid Configuration: {message}")]
    InvalidConfig {
        /// Configuration failure message
        message: String,
    },

    /// General error encountered during the simulation process itself.
    #[error("Simulation Process Error: {message}")]
    SimulationError {
        /// SimulationError failure message
        message: String,
    },
}

impl QsatError {
    pub(crate) fn formula(message: impl Into<String>) -> Self {
        QsatError::Formula { message: message.into() }
    }

    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        QsatError::InvalidOperation { message: message.into() }
    }
}
