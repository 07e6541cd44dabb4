// src/readout/mod.rs

//! Measurement of the literal register and extraction of candidate assignments.

use crate::config::SolverConfig;
use crate::core::Result;
use crate::simulation::engine::seed_from_state;
use crate::simulation::{sampling, MeasurementOutcome};
use crate::solver::SolverOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// A decoded assignment observed above the confidence threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Variable index (1-based) to value.
    pub assignment: BTreeMap<usize, bool>,
    /// Observed frequency across all shots, in `[0, 1]`.
    pub confidence: f64,
    /// Whether the assignment satisfies the formula when evaluated classically.
    pub satisfies_formula: bool,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let literals: Vec<String> = self
            .assignment
            .iter()
            .map(|(var, value)| if *value { format!("{}", var) } else { format!("-{}", var) })
            .collect();
        write!(f, "[{}] confidence {:.4}", literals.join(" "), self.confidence)?;
        if !self.satisfies_formula {
            write!(f, " (does not satisfy)")?;
        }
        Ok(())
    }
}

/// Everything observed by one readout.
#[derive(Debug, Clone)]
pub struct ReadoutReport {
    solutions: Vec<Solution>,
    histogram: MeasurementOutcome,
    threshold: f64,
    presumed_unsatisfiable: bool,
}

impl ReadoutReport {
    /// Reported assignments, highest confidence first.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn into_solutions(self) -> Vec<Solution> {
        self.solutions
    }

    /// Raw shot counts over the literal register.
    pub fn histogram(&self) -> &MeasurementOutcome {
        &self.histogram
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True when nothing was reported.
    pub fn no_solution_found(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn presumed_unsatisfiable(&self) -> bool {
        self.presumed_unsatisfiable
    }
}

impl fmt::Display for ReadoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.no_solution_found() {
            return writeln!(f, "no solution found above confidence {:.4}", self.threshold);
        }
        for solution in &self.solutions {
            writeln!(f, "{}", solution)?;
        }
        Ok(())
    }
}

/// Samples a solver outcome and reports the confident assignments.
#[derive(Debug, Clone, Default)]
pub struct Readout {
    config: SolverConfig,
}

impl Readout {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Measures the original variables of `outcome` for the configured
    /// number of shots. Padding variables are traced out.
    pub fn measure(&self, outcome: &SolverOutcome) -> Result<ReadoutReport> {
        self.config.validate()?;
        let formula = outcome.formula();
        let qubits = outcome.variable_qubits();
        let threshold = self.config.threshold_for(formula.search_space());

        let marginal = outcome.state().marginal_probabilities(qubits);
        let seed = self.config.seed.unwrap_or_else(|| seed_from_state(outcome.state()));
        let histogram =
            sampling::sample_shots(&marginal, qubits.len(), self.config.shots, self.config.shot_chunk_size, seed)?;
        debug!(shots = histogram.shots(), distinct = histogram.counts().len(), "literal register sampled");

        let mut solutions: Vec<Solution> = if outcome.presumed_unsatisfiable() {
            Vec::new()
        } else {
            histogram
                .counts()
                .keys()
                .map(|value| (*value, histogram.frequency(*value)))
                .filter(|(_, confidence)| *confidence > threshold)
                .map(|(value, confidence)| Solution {
                    assignment: decode(value, qubits.len()),
                    confidence,
                    satisfies_formula: formula.evaluate(value),
                })
                .collect()
        };
        // Stable sort keeps ascending assignment order among equal confidences.
        solutions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        if solutions.is_empty() {
            info!(threshold, "no solution found above confidence");
        } else {
            info!(reported = solutions.len(), best = solutions[0].confidence, "readout complete");
        }

        Ok(ReadoutReport {
            solutions,
            histogram,
            threshold,
            presumed_unsatisfiable: outcome.presumed_unsatisfiable(),
        })
    }
}

/// Bit `i` of `value` becomes variable `i + 1`.
fn decode(value: usize, num_variables: usize) -> BTreeMap<usize, bool> {
    (0..num_variables).map(|i| (i + 1, (value >> i) & 1 == 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::solver::PartialDiffusionSolver;

    #[test]
    fn decode_maps_low_bit_to_first_variable() {
        let assignment = decode(0b10, 2);
        assert_eq!(assignment, BTreeMap::from([(1, false), (2, true)]));
    }

    #[test]
    fn certain_solutions_are_reported_and_verified() -> Result<()> {
        let formula = Formula::new(3, 2, &[vec![1], vec![2]])?;
        let config = SolverConfig::new().with_seed(5);
        let outcome = PartialDiffusionSolver::new(config.clone()).run(&formula, 2)?;
        let report = Readout::new(config).measure(&outcome)?;

        assert_eq!(report.histogram().shots(), 1024);
        assert_eq!(report.solutions().len(), 2);
        for solution in report.solutions() {
            assert!(solution.satisfies_formula);
            assert_eq!(solution.assignment[&1], true);
            assert_eq!(solution.assignment[&2], true);
        }
        let total: f64 = report.solutions().iter().map(|s| s.confidence).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(report.solutions()[0].confidence >= report.solutions()[1].confidence);
        Ok(())
    }

    #[test]
    fn presumed_unsatisfiable_outcome_reports_nothing() -> Result<()> {
        let formula = Formula::new(1, 2, &[vec![1], vec![-1]])?;
        let outcome = PartialDiffusionSolver::default().run(&formula, 0)?;
        let report = Readout::default().measure(&outcome)?;
        assert!(report.no_solution_found());
        assert!(report.presumed_unsatisfiable());
        assert!(report.to_string().starts_with("no solution found above confidence"));
        Ok(())
    }

    #[test]
    fn high_threshold_filters_everything() -> Result<()> {
        let formula = Formula::new(2, 1, &[vec![1, 2]])?;
        let outcome = PartialDiffusionSolver::new(SolverConfig::new().with_padding(false)).run(&formula, 3)?;
        let report = Readout::new(SolverConfig::new().with_confidence_threshold(0.9)).measure(&outcome)?;
        assert!(report.no_solution_found());
        assert_eq!(report.threshold(), 0.9);
        Ok(())
    }

    #[test]
    fn readout_is_reproducible_without_explicit_seed() -> Result<()> {
        let formula = Formula::new(3, 3, &[vec![1], vec![2], vec![3]])?;
        let outcome = PartialDiffusionSolver::default().run(&formula, 1)?;
        let a = Readout::default().measure(&outcome)?;
        let b = Readout::default().measure(&outcome)?;
        assert_eq!(a.histogram(), b.histogram());
        assert_eq!(a.solutions(), b.solutions());
        Ok(())
    }
}
