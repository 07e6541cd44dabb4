// tests/end_to_end.rs

// Import necessary types from the qsat crate
use qsat::{
    estimate_solution_count, estimate_solution_count_with_config, solve, solve_with_config, Formula,
    PartialDiffusionSolver, QsatError, QuantumCounter, Readout, SolverConfig,
};
use std::collections::BTreeMap;

// x1 ∨ x2, ¬x1 ∨ x2: satisfied exactly when x2 is true.
fn two_solution_clauses() -> Vec<Vec<i64>> {
    vec![vec![1, 2], vec![-1, 2]]
}

#[test]
fn test_two_variable_scenario_counts_two() -> Result<(), QsatError> {
    assert_eq!(estimate_solution_count(2, 2, &two_solution_clauses())?, 2);
    Ok(())
}

#[test]
fn test_two_variable_scenario_reports_both_solutions() -> Result<(), QsatError> {
    let solutions = solve(2, 2, &two_solution_clauses(), 2)?;
    assert_eq!(solutions.len(), 2);

    let mut assignments: Vec<BTreeMap<usize, bool>> = solutions.iter().map(|s| s.assignment.clone()).collect();
    assignments.sort();
    assert_eq!(
        assignments,
        vec![BTreeMap::from([(1, false), (2, true)]), BTreeMap::from([(1, true), (2, true)])]
    );
    for solution in &solutions {
        assert!(solution.satisfies_formula);
        assert!(solution.confidence > 0.25, "confidence {} not above baseline", solution.confidence);
    }
    Ok(())
}

#[test]
fn test_contradiction_counts_zero_and_reports_nothing() -> Result<(), QsatError> {
    // x1 ∧ ¬x1 over three variables.
    let clauses = vec![vec![1], vec![-1]];
    let count = estimate_solution_count(3, 2, &clauses)?;
    assert_eq!(count, 0);
    assert!(solve(3, 2, &clauses, count)?.is_empty());
    Ok(())
}

#[test]
fn test_contradiction_with_wrong_estimate_reports_no_satisfying_assignment() -> Result<(), QsatError> {
    let clauses = vec![vec![1], vec![-1]];
    let config = SolverConfig::new().with_seed(5);
    for estimate in [1, 3] {
        let solutions = solve_with_config(3, 2, &clauses, estimate, &config)?;
        assert!(solutions.iter().all(|s| !s.satisfies_formula), "estimate {} gave {:?}", estimate, solutions);
    }
    Ok(())
}

#[test]
fn test_unique_solution_is_most_confident() -> Result<(), QsatError> {
    let clauses = vec![vec![1], vec![-2], vec![3]];
    let config = SolverConfig::new().with_seed(17);
    let solutions = solve_with_config(3, 3, &clauses, 1, &config)?;
    let best = &solutions[0];
    assert_eq!(best.assignment, BTreeMap::from([(1, true), (2, false), (3, true)]));
    assert!(best.satisfies_formula);
    assert!(best.confidence > 0.7);
    Ok(())
}

#[test]
fn test_counting_with_config_overrides() -> Result<(), QsatError> {
    let config = SolverConfig::new().with_phase_bits(6).with_seed(9);
    assert_eq!(estimate_solution_count_with_config(2, 2, &two_solution_clauses(), &config)?, 2);
    Ok(())
}

#[test]
fn test_counting_stays_within_one_eighth_of_search_space() -> Result<(), QsatError> {
    // Default phase width; an estimate within N/8 of the truth is accurate.
    let formulas = [
        Formula::new(3, 2, &[vec![1], vec![2]])?,
        Formula::new(4, 2, &[vec![1], vec![2, 3]])?,
    ];
    let trials = 20;
    for formula in &formulas {
        let truth = formula.count_satisfying_assignments() as i64;
        let tolerance = (formula.search_space() / 8) as i64;
        let accurate = (0..trials)
            .map(|seed| QuantumCounter::new(SolverConfig::new().with_seed(seed)).estimate(formula))
            .collect::<Result<Vec<_>, _>>()?
            .iter()
            .filter(|e| (e.estimate as i64 - truth).abs() <= tolerance)
            .count();
        assert!(accurate >= 15, "{}: only {} of {} estimates were accurate", formula, accurate, trials);
    }
    Ok(())
}

#[test]
fn test_counting_then_solving_with_error_bound() -> Result<(), QsatError> {
    let formula = Formula::new(3, 2, &[vec![1, 2], vec![-3]])?;
    let config = SolverConfig::new().with_seed(3).with_phase_bits(8);
    let estimate = QuantumCounter::new(config.clone()).estimate(&formula)?;
    assert_eq!(estimate.search_space, 8);
    assert!(estimate.estimate >= 2 && estimate.estimate <= 4);

    let outcome = PartialDiffusionSolver::new(config.clone()).run_with_estimate(&formula, &estimate)?;
    let report = Readout::new(config).measure(&outcome)?;
    assert!(!report.no_solution_found());
    assert!(report.solutions().iter().all(|s| s.satisfies_formula));
    Ok(())
}

#[test]
fn test_malformed_input_is_rejected() {
    let cases: Vec<(usize, usize, Vec<Vec<i64>>)> = vec![
        (2, 1, vec![vec![1, 0]]),
        (2, 1, vec![vec![3]]),
        (2, 1, vec![vec![1, 1]]),
        (2, 1, vec![vec![]]),
        (2, 2, vec![vec![1]]),
        (0, 0, vec![]),
    ];
    for (variables, declared, clauses) in cases {
        let err = estimate_solution_count(variables, declared, &clauses).unwrap_err();
        assert!(matches!(err, QsatError::Formula { .. }), "{:?} gave {:?}", clauses, err);
        assert!(matches!(solve(variables, declared, &clauses, 1), Err(QsatError::Formula { .. })));
    }
}

#[test]
fn test_formula_too_large_for_simulator() {
    let clauses: Vec<Vec<i64>> = (1..=10).map(|v| vec![v]).collect();
    let err = estimate_solution_count(10, 10, &clauses).unwrap_err();
    // 10 literal + 10 clause + 1 ancilla + 9 phase qubits.
    assert_eq!(err, QsatError::ResourceExceeded { requested: 30, limit: 24 });
}

#[test]
fn test_word_sized_formula_is_refused_without_panicking() {
    let clauses = vec![vec![1]];
    assert_eq!(solve(64, 1, &clauses, 1), Err(QsatError::ResourceExceeded { requested: 66, limit: 24 }));
    // 64 literal + 1 clause + 1 ancilla + 36 phase qubits.
    assert_eq!(
        estimate_solution_count(64, 1, &clauses),
        Err(QsatError::ResourceExceeded { requested: 102, limit: 24 })
    );
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SolverConfig::new().with_shots(0);
    let err = solve_with_config(2, 2, &two_solution_clauses(), 2, &config).unwrap_err();
    assert!(matches!(err, QsatError::InvalidConfig { .. }));
}

#[test]
fn test_runs_are_reproducible() -> Result<(), QsatError> {
    let clauses = vec![vec![1, -2], vec![2, 3]];
    let first = solve(3, 2, &clauses, 3)?;
    let second = solve(3, 2, &clauses, 3)?;
    assert_eq!(first, second);
    Ok(())
}
