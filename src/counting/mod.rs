// src/counting/mod.rs

//! Quantum counting: phase estimation on the Grover operator `G(1)`.
//!
//! `G(1)` rotates the uniform superposition by `θ` inside the plane spanned
//! by the solution and non-solution states, with `sin²(θ/2) = M/N`. Its
//! eigenphases `±θ` are read from a phase register of `t` qubits and turned
//! back into a solution count.

use crate::amplification::AmplificationOperator;
use crate::circuits::CircuitBuilder;
use crate::config::SolverConfig;
use crate::core::{RegisterKind, Result, PI};
use crate::formula::Formula;
use crate::operations::Gate;
use crate::oracle::compile_oracle;
use crate::simulation::engine::seed_from_state;
use crate::simulation::{sampling, Simulator};
use crate::validation::validate_state;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const PHASE_REGISTER: &str = "phase";

/// Result of one counting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountEstimate {
    /// Estimated number of satisfying assignments `M̂`, in `[0, N]`.
    pub estimate: usize,
    /// Raw phase-register reading `y`.
    pub phase_measurement: usize,
    /// Width `t` of the phase register.
    pub phase_bits: usize,
    /// `N = 2^n`.
    pub search_space: usize,
    /// Deviation of `M̂` caused by one bin of phase error, see `count_error_bound`.
    pub error_bound: f64,
}

impl CountEstimate {
    /// Estimated rotation angle `θ̂ = 2π·y / 2^t`.
    pub fn theta(&self) -> f64 {
        2.0 * PI * self.phase_measurement as f64 / (1usize << self.phase_bits) as f64
    }

    /// The error bound is at least as large as the estimate itself.
    pub fn is_uncertain(&self) -> bool {
        self.error_bound >= self.estimate.max(1) as f64
    }
}

/// How far one phase bin moves the estimate:
/// `2π·sqrt(M̂(N − M̂))/2^t + π²N/2^(2t)`.
///
/// The first term is `dM/dθ` times the bin width; it vanishes at `M̂ = 0`
/// and `M̂ = N` and peaks at `N·π/2^t` for `M̂ = N/2`.
pub fn count_error_bound(search_space: usize, estimate: usize, phase_bits: usize) -> f64 {
    let n = search_space as f64;
    let m = (estimate as f64).min(n);
    let bins = (1usize << phase_bits) as f64;
    2.0 * PI * (m * (n - m)).sqrt() / bins + PI * PI * n / (bins * bins)
}

/// `round(N · sin²(π·y / 2^t))`, clamped to `[0, N]`.
pub fn count_from_phase(phase_measurement: usize, phase_bits: usize, search_space: usize) -> usize {
    let half_theta = PI * phase_measurement as f64 / (1usize << phase_bits) as f64;
    let estimate = (search_space as f64 * half_theta.sin().powi(2)).round();
    (estimate.max(0.0) as usize).min(search_space)
}

/// Estimates the number of satisfying assignments of a formula.
#[derive(Debug, Clone, Default)]
pub struct QuantumCounter {
    config: SolverConfig,
}

impl QuantumCounter {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs phase estimation and measures the phase register once.
    ///
    /// # Errors
    /// * `InvalidConfig` if the configuration is out of range.
    /// * `ResourceExceeded` if `n + m + 1 + t` exceeds `max_qubits`; raised
    ///   before any state is allocated.
    /// * `Incoherence` if the final state fails validation.
    pub fn estimate(&self, formula: &Formula) -> Result<CountEstimate> {
        self.config.validate()?;
        let oracle = compile_oracle(formula)?;
        let phase_bits = self.config.phase_bits_for(formula.num_variables());

        let mut layout = oracle.layout().clone();
        let phase = layout.add(PHASE_REGISTER, RegisterKind::Phase, phase_bits)?;
        layout.ensure_within(self.config.max_qubits)?;
        debug!(qubits = layout.num_qubits(), phase_bits, "counting layout ready");

        let literals = oracle.literal_register().qubits();
        let operator = AmplificationOperator::new(oracle);
        let step = operator.step(1.0)?;
        let simulator = Simulator::new().with_max_qubits(self.config.max_qubits);

        let prep = CircuitBuilder::new()
            .add_ops(literals.iter().map(|q| Gate::h(*q)))
            .add_ops(phase.qubits().into_iter().map(Gate::h))
            .build()?;
        let mut state = simulator.run(&prep, layout.num_qubits())?;

        // Phase qubit k controls 2^k applications of G(1).
        for k in 0..phase_bits {
            let power = step.controlled_by(phase.qubit(k)).repeated(1usize << k);
            state = simulator.run_on(state, &power)?;
        }

        let readout = CircuitBuilder::new()
            .add_op(Gate::Fourier { qubits: phase.qubits(), inverse: true, controls: Vec::new() })
            .build()?;
        state = simulator.run_on(state, &readout)?;
        validate_state(&state, &layout, Some(self.config.norm_tolerance))?;

        let marginal = state.marginal_probabilities(&phase.qubits());
        let seed = self.config.seed.unwrap_or_else(|| seed_from_state(&state));
        let outcome = sampling::sample_shots(&marginal, phase_bits, 1, self.config.shot_chunk_size, seed)?;
        let phase_measurement = outcome.most_frequent().unwrap_or(0);

        let search_space = formula.search_space();
        let count = count_from_phase(phase_measurement, phase_bits, search_space);
        let estimate = CountEstimate {
            estimate: count,
            phase_measurement,
            phase_bits,
            search_space,
            error_bound: count_error_bound(search_space, count, phase_bits),
        };

        if estimate.is_uncertain() {
            warn!(
                estimate = estimate.estimate,
                error_bound = estimate.error_bound,
                phase_bits,
                "solution count estimate is uncertain; consider more phase bits"
            );
        }
        info!(
            estimate = estimate.estimate,
            phase_measurement,
            theta = estimate.theta(),
            search_space,
            "estimated solution count"
        );
        Ok(estimate)
    }
}
