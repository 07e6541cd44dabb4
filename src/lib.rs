// src/lib.rs

//! `qsat` - Quantum search for satisfying assignments of CNF formulas
//!
//! A state-vector simulation of Grover-style amplitude amplification. A
//! formula is compiled into a reversible phase oracle, the number of
//! satisfying assignments is estimated by quantum counting, and a damped
//! amplification loop planned from that estimate prepares a state that is
//! sampled for candidate assignments.

pub mod core;
pub mod formula;
pub mod operations;
pub mod circuits;
pub mod simulation;
pub mod oracle;
pub mod amplification;
pub mod counting;
pub mod solver;
pub mod readout;
pub mod validation;
pub mod config;

// Re-export the most common types for easier top-level use
pub use crate::core::{QsatError, QubitId, QuantumState, Register, RegisterKind, RegisterLayout, Result};
pub use formula::{Clause, Formula, Literal};
pub use operations::{Gate, SingleQubitGate};
pub use circuits::{Circuit, CircuitBuilder};
pub use simulation::{MeasurementOutcome, Simulator};
pub use oracle::{compile_oracle, OracleDescriptor};
pub use amplification::AmplificationOperator;
pub use counting::{CountEstimate, QuantumCounter};
pub use solver::{iteration_count, DampingSchedule, PartialDiffusionSolver, SolverOutcome};
pub use readout::{Readout, ReadoutReport, Solution};
pub use validation::{check_normalization, check_qubits_cleared, validate_state};
pub use config::SolverConfig;

/// Estimates how many assignments satisfy a formula, with default settings.
///
/// `clauses` holds DIMACS-style literals: `k` is variable `k`, `-k` its negation.
pub fn estimate_solution_count(variable_count: usize, clause_count: usize, clauses: &[Vec<i64>]) -> Result<usize> {
    estimate_solution_count_with_config(variable_count, clause_count, clauses, &SolverConfig::default())
}

/// Like `estimate_solution_count`, with explicit settings.
///
/// `config.phase_bits` sets the counting precision and `config.seed` fixes the
/// phase measurement; `config.max_qubits` must hold `n + m + 1 + t` qubits.
///
/// # Errors
/// `Formula` for malformed clauses, `InvalidConfig` for out-of-range settings,
/// `ResourceExceeded` if the counting layout does not fit.
pub fn estimate_solution_count_with_config(
    variable_count: usize,
    clause_count: usize,
    clauses: &[Vec<i64>],
    config: &SolverConfig,
) -> Result<usize> {
    let formula = Formula::new(variable_count, clause_count, clauses)?;
    Ok(QuantumCounter::new(config.clone()).estimate(&formula)?.estimate)
}

/// Amplifies and samples a formula planned for `estimated_count` solutions.
///
/// Returns the assignments observed above the confidence threshold, highest
/// confidence first. An empty list means no solution was found above
/// confidence, which is also the answer whenever `estimated_count` is 0.
///
/// ```
/// use qsat::{estimate_solution_count, solve, QsatError};
///
/// let clauses = vec![vec![1, 2], vec![-1, 2]];
/// let count = estimate_solution_count(2, 2, &clauses)?;
/// assert_eq!(count, 2);
///
/// let solutions = solve(2, 2, &clauses, count)?;
/// assert_eq!(solutions.len(), 2);
/// assert!(solutions.iter().all(|s| s.satisfies_formula && s.assignment[&2]));
/// # Ok::<(), QsatError>(())
/// ```
pub fn solve(
    variable_count: usize,
    clause_count: usize,
    clauses: &[Vec<i64>],
    estimated_count: usize,
) -> Result<Vec<Solution>> {
    solve_with_config(variable_count, clause_count, clauses, estimated_count, &SolverConfig::default())
}

/// Like `solve`, with explicit settings for amplification and readout.
///
/// The same `config` drives both stages: padding, damping and the qubit limit
/// for the amplification loop, then shots, seed and threshold for readout.
///
/// # Errors
/// `Formula` for malformed clauses, `InvalidConfig` for out-of-range settings,
/// `ResourceExceeded` if `n + m + 1` qubits do not fit, `Incoherence` if the
/// amplified state fails validation.
pub fn solve_with_config(
    variable_count: usize,
    clause_count: usize,
    clauses: &[Vec<i64>],
    estimated_count: usize,
    config: &SolverConfig,
) -> Result<Vec<Solution>> {
    let formula = Formula::new(variable_count, clause_count, clauses)?;
    let outcome = PartialDiffusionSolver::new(config.clone()).run(&formula, estimated_count)?;
    Ok(Readout::new(config.clone()).measure(&outcome)?.into_solutions())
}
