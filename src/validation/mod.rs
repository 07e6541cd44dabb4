// src/validation/mod.rs

//! Post-run checks on a `QuantumState`: normalization, and closure of the
//! workspace qubits that every compiled oracle must return to `|0>`.

use crate::core::constants::qsat_constants::DEFAULT_NORM_TOLERANCE;
use crate::core::{QsatError, QuantumState, QubitId, RegisterLayout, Result};

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `QuantumState` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `1e-9`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QsatError::Incoherence)` if normalization fails.
pub fn check_normalization(state: &QuantumState, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QsatError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// Checks that every qubit in `qubits` reads `|0>` with certainty.
///
/// The probability mass on basis states where any listed qubit is 1 must
/// not exceed `tolerance`.
pub fn check_qubits_cleared(state: &QuantumState, qubits: &[QubitId], tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let mask = qubits.iter().fold(0usize, |m, q| m | q.mask());
    if mask == 0 {
        return Ok(());
    }
    let leaked: f64 = state
        .vector()
        .iter()
        .enumerate()
        .filter(|(index, _)| index & mask != 0)
        .map(|(_, c)| c.norm_sqr())
        .sum();
    if leaked > effective_tolerance {
        let names: Vec<String> = qubits.iter().map(|q| q.to_string()).collect();
        Err(QsatError::Incoherence {
            message: format!(
                "Workspace qubits [{}] were not restored to |0>: leaked probability {:.3e}",
                names.join(","),
                leaked
            ),
        })
    } else {
        Ok(())
    }
}

/// Runs every post-run check on a state laid out by `layout`:
/// normalization, then closure of the clause-evaluation and ancilla registers.
pub fn validate_state(state: &QuantumState, layout: &RegisterLayout, norm_tolerance: Option<f64>) -> Result<()> {
    check_normalization(state, norm_tolerance)?;
    check_qubits_cleared(state, &layout.workspace_qubits(), norm_tolerance)?;
    Ok(())
}
