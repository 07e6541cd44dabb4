// src/config/mod.rs

//! Tunable parameters of a counting / solving / readout run.

use crate::core::constants::qsat_constants::{
    DEFAULT_DAMPING_FLOOR, DEFAULT_MAX_QUBITS, DEFAULT_NORM_TOLERANCE, DEFAULT_SHOTS, DEFAULT_SHOT_CHUNK_SIZE,
    MAX_SUPPORTED_QUBITS, PHASE_BITS_MARGIN,
};
use crate::core::{QsatError, Result};
use serde::{Deserialize, Serialize};

/// Configuration shared by `QuantumCounter`, `PartialDiffusionSolver` and `Readout`.
///
/// Every field has a documented default; missing fields take their default
/// when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Simulated measurement repetitions at readout.
    pub shots: usize,
    /// Width `t` of the phase-estimation register.
    /// `None` means `ceil(n / 2) + 4` for an `n`-variable formula.
    pub phase_bits: Option<usize>,
    /// Minimum frequency for an assignment to be reported.
    /// `None` means the uniform baseline `1 / 2^n`.
    pub confidence_threshold: Option<f64>,
    /// Largest state vector the simulator may allocate, in qubits.
    pub max_qubits: usize,
    /// Diffusion strength of the last damped iteration, in `(0, 1]`.
    pub damping_floor: f64,
    /// PRNG seed for measurements. `None` derives it from the measured state,
    /// which makes every run of the same formula reproducible.
    pub seed: Option<u64>,
    /// Enlarge the search space with padding variables when the estimate
    /// says at least half of all assignments are solutions.
    pub pad_dense_search_space: bool,
    /// Shots drawn by one parallel sampling task.
    pub shot_chunk_size: usize,
    /// Allowed deviation of the squared state norm from 1.
    pub norm_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            phase_bits: None,
            confidence_threshold: None,
            max_qubits: DEFAULT_MAX_QUBITS,
            damping_floor: DEFAULT_DAMPING_FLOOR,
            seed: None,
            pad_dense_search_space: true,
            shot_chunk_size: DEFAULT_SHOT_CHUNK_SIZE,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_phase_bits(mut self, phase_bits: usize) -> Self {
        self.phase_bits = Some(phase_bits);
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    pub fn with_damping_floor(mut self, floor: f64) -> Self {
        self.damping_floor = floor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_padding(mut self, enabled: bool) -> Self {
        self.pad_dense_search_space = enabled;
        self
    }

    /// Phase-register width for an `n`-variable formula.
    pub fn phase_bits_for(&self, num_variables: usize) -> usize {
        self.phase_bits.unwrap_or(num_variables.div_ceil(2) + PHASE_BITS_MARGIN)
    }

    /// Reporting threshold for a search space of `search_space` assignments.
    pub fn threshold_for(&self, search_space: usize) -> f64 {
        self.confidence_threshold.unwrap_or(1.0 / search_space as f64)
    }

    /// Checks every field against its accepted range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(QsatError::InvalidConfig { message });
        if self.shots == 0 {
            return invalid("shots must be at least 1".to_string());
        }
        if self.max_qubits == 0 || self.max_qubits > MAX_SUPPORTED_QUBITS {
            return invalid(format!("max_qubits {} is outside [1, {}]", self.max_qubits, MAX_SUPPORTED_QUBITS));
        }
        match self.phase_bits {
            Some(0) => return invalid("phase_bits must be at least 1".to_string()),
            Some(t) if t > self.max_qubits => {
                return invalid(format!("phase_bits {} exceeds max_qubits {}", t, self.max_qubits));
            }
            _ => {}
        }
        if let Some(threshold) = self.confidence_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return invalid(format!("confidence_threshold {} is outside [0, 1]", threshold));
            }
        }
        if !(self.damping_floor > 0.0 && self.damping_floor <= 1.0) {
            return invalid(format!("damping_floor {} is outside (0, 1]", self.damping_floor));
        }
        if self.shot_chunk_size == 0 {
            return invalid("shot_chunk_size must be at least 1".to_string());
        }
        if !(self.norm_tolerance > 0.0) {
            return invalid(format!("norm_tolerance {} must be positive", self.norm_tolerance));
        }
        Ok(())
    }
}
