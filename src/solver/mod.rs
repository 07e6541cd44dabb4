// src/solver/mod.rs

//! Partial-diffusion amplitude amplification driven by a solution-count estimate.
//!
//! The iteration count comes from the estimate `M̂`. Because `M̂` is only
//! known up to the counting error, iterations beyond the count that is
//! safe for the worst-case estimate use a weakened diffusion, so an
//! overestimated iteration count overshoots less.

use crate::amplification::AmplificationOperator;
use crate::circuits::CircuitBuilder;
use crate::config::SolverConfig;
use crate::core::constants::qsat_constants::MAX_PADDING_VARIABLES;
use crate::core::{QuantumState, QubitId, RegisterLayout, Result, PI};
use crate::counting::{count_error_bound, CountEstimate};
use crate::formula::Formula;
use crate::operations::Gate;
use crate::oracle::compile_oracle;
use crate::simulation::Simulator;
use crate::validation::validate_state;
use tracing::{debug, info, trace, warn};

/// Number of full Grover iterations for `estimate` solutions among `search_space`.
///
/// `floor(π/4 · sqrt(N/M̂))`, or 0 when there is nothing to amplify
/// (`M̂ = 0`) or amplification cannot help (`M̂ ≥ N/2`).
pub fn iteration_count(search_space: usize, estimate: usize) -> usize {
    if estimate == 0 || estimate >= search_space - search_space / 2 {
        return 0;
    }
    (PI / 4.0 * (search_space as f64 / estimate as f64).sqrt()).floor() as usize
}

/// Iterations that cannot overshoot even if the true count is `M̂ + ΔM`.
pub fn safe_iteration_count(search_space: usize, estimate: usize, error_bound: f64) -> usize {
    if estimate == 0 {
        return 0;
    }
    let pessimistic = estimate as f64 + error_bound.max(0.0);
    (PI / 4.0 * (search_space as f64 / pessimistic).sqrt()).floor() as usize
}

/// Diffusion strength of each amplification iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct DampingSchedule {
    weights: Vec<f64>,
}

impl DampingSchedule {
    /// `safe` iterations at full strength, then the remaining `total - safe`
    /// iterations decrease linearly down to `floor`.
    pub fn new(total: usize, safe: usize, floor: f64) -> Self {
        let safe = safe.min(total);
        let excess = total - safe;
        let damped = (1..=excess).map(|k| 1.0 - (1.0 - floor) * k as f64 / excess as f64);
        Self { weights: std::iter::repeat_n(1.0, safe).chain(damped).collect() }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterations that use the full reflection.
    pub fn full_strength_iterations(&self) -> usize {
        self.weights.iter().take_while(|w| **w == 1.0).count()
    }
}

/// Final state and bookkeeping of one solver run.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    state: QuantumState,
    layout: RegisterLayout,
    formula: Formula,
    variable_qubits: Vec<QubitId>,
    padding: usize,
    estimate: usize,
    schedule: DampingSchedule,
    presumed_unsatisfiable: bool,
}

impl SolverOutcome {
    pub fn state(&self) -> &QuantumState {
        &self.state
    }

    /// Layout of the amplified register, padding variables included.
    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// The formula as given, without padding clauses.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Qubits of the original variables; qubit `i` holds variable `i + 1`.
    pub fn variable_qubits(&self) -> &[QubitId] {
        &self.variable_qubits
    }

    /// Padding variables added to enlarge the search space.
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// The solution count the run was planned for.
    pub fn estimate(&self) -> usize {
        self.estimate
    }

    pub fn schedule(&self) -> &DampingSchedule {
        &self.schedule
    }

    pub fn iterations(&self) -> usize {
        self.schedule.len()
    }

    /// Set when the estimate was zero and amplification was skipped.
    pub fn presumed_unsatisfiable(&self) -> bool {
        self.presumed_unsatisfiable
    }
}

/// Runs damped amplitude amplification for a formula.
#[derive(Debug, Clone, Default)]
pub struct PartialDiffusionSolver {
    config: SolverConfig,
}

impl PartialDiffusionSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Amplifies with a bare solution count. The error bound is the one a
    /// counting run with this configuration would report for that count.
    ///
    /// # Errors
    /// `ResourceExceeded` if `n + m + 1` exceeds `max_qubits`, checked before
    /// the search space is sized or any state is allocated.
    pub fn run(&self, formula: &Formula, estimate: usize) -> Result<SolverOutcome> {
        self.amplify(formula, estimate, None)
    }

    /// Amplifies using the count and error bound of a counting run.
    pub fn run_with_estimate(&self, formula: &Formula, estimate: &CountEstimate) -> Result<SolverOutcome> {
        self.amplify(formula, estimate.estimate, Some(estimate.error_bound))
    }

    fn amplify(&self, formula: &Formula, estimate: usize, error_bound: Option<f64>) -> Result<SolverOutcome> {
        self.config.validate()?;
        // The unpadded layout must fit before the search space is sized.
        let base = compile_oracle(formula)?;
        base.layout().ensure_within(self.config.max_qubits)?;

        let search_space = formula.search_space();
        if estimate > search_space {
            warn!(estimate, search_space, "estimate exceeds the search space; clamping");
        }
        let estimate = estimate.min(search_space);
        let error_bound = error_bound.unwrap_or_else(|| {
            let phase_bits = self.config.phase_bits_for(formula.num_variables());
            count_error_bound(search_space, estimate, phase_bits)
        });

        let padding = if estimate > 0 && self.config.pad_dense_search_space {
            // Each padding variable adds a literal and a clause qubit.
            let headroom = (self.config.max_qubits - base.num_qubits()) / 2;
            padding_for(search_space, estimate).min(headroom)
        } else {
            0
        };
        let padded = formula.padded(padding);
        let oracle = if padding == 0 { base } else { compile_oracle(&padded)? };
        let layout = oracle.layout().clone();
        layout.ensure_within(self.config.max_qubits)?;

        let padded_space = padded.search_space();
        let total = iteration_count(padded_space, estimate);
        let safe = safe_iteration_count(padded_space, estimate, error_bound).min(total);
        let schedule = DampingSchedule::new(total, safe, self.config.damping_floor);
        let presumed_unsatisfiable = estimate == 0;

        info!(
            estimate,
            padding,
            iterations = total,
            full_strength = safe,
            presumed_unsatisfiable,
            "planned amplification"
        );

        let literals = oracle.literal_register().qubits();
        let variable_qubits = literals[..formula.num_variables()].to_vec();
        let prep = CircuitBuilder::new().add_ops(literals.iter().map(|q| Gate::h(*q))).build()?;

        let simulator = Simulator::new().with_max_qubits(self.config.max_qubits);
        let mut state = simulator.run(&prep, layout.num_qubits())?;
        let operator = AmplificationOperator::new(oracle);
        for (i, strength) in schedule.weights().iter().enumerate() {
            trace!(iteration = i + 1, strength, "applying amplification step");
            state = simulator.run_on(state, &operator.step(*strength)?)?;
        }
        validate_state(&state, &layout, Some(self.config.norm_tolerance))?;
        debug!(iterations = schedule.len(), "amplification finished");

        Ok(SolverOutcome {
            state,
            layout,
            formula: formula.clone(),
            variable_qubits,
            padding,
            estimate,
            schedule,
            presumed_unsatisfiable,
        })
    }
}

/// Padding variables needed to bring `estimate` below half the search space.
fn padding_for(search_space: usize, estimate: usize) -> usize {
    let mut padding = 0;
    while padding < MAX_PADDING_VARIABLES {
        let padded = search_space << padding;
        if estimate < padded - padded / 2 {
            break;
        }
        padding += 1;
    }
    padding
}
