// src/core/state.rs

use super::error::{QsatError, QubitId, Result};
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// The amplitude vector of a simulated register of qubits.
///
/// Holds `2^num_qubits` complex amplitudes. Qubit `q` is bit `q` of the basis
/// index, so the basis state `|b_{k-1} ... b_1 b_0>` lives at index
/// `sum(b_q << q)`.
///
/// A state is owned by exactly one simulation pass. It is mutated only through
/// gate application in the engine and is kept normalized by construction (all
/// gates are unitary); `validation::check_normalization` verifies this.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct QuantumState {
    state_vector: Vec<Complex<f64>>,
    num_qubits: usize,
}

impl QuantumState {
    /// Creates the basis state `|0...0>` over `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> Result<Self> {
        let dim = 1usize.checked_shl(num_qubits as u32).filter(|d| *d > 0).ok_or_else(|| {
            QsatError::SimulationError {
                message: format!("{} qubits overflow the addressable state dimension", num_qubits),
            }
        })?;
        let mut state_vector = vec![Complex::zero(); dim];
        state_vector[0] = Complex::new(1.0, 0.0);
        Ok(Self { state_vector, num_qubits })
    }

    /// Wraps an explicit amplitude vector. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex<f64>>) -> Result<Self> {
        let dim = amplitudes.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(QsatError::SimulationError {
                message: format!("State dimension {} is not a power of two", dim),
            });
        }
        Ok(Self { num_qubits: dim.trailing_zeros() as usize, state_vector: amplitudes })
    }

    /// Provides read-only access to the internal state vector.
    pub fn vector(&self) -> &[Complex<f64>] {
        &self.state_vector
    }

    /// Provides mutable access for the simulation engine to modify the state.
    pub(crate) fn vector_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.state_vector
    }

    /// Gets the dimension (`2^num_qubits`).
    pub fn dim(&self) -> usize {
        self.state_vector.len()
    }

    /// Number of qubits represented.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Sum of squared amplitude magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.state_vector.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Probability of observing basis state `index`.
    pub fn probability(&self, index: usize) -> f64 {
        self.state_vector.get(index).map_or(0.0, |c| c.norm_sqr())
    }

    /// Marginal distribution over `qubits`, all other qubits traced out.
    ///
    /// Entry `v` of the result is the probability that `qubits[j]` reads bit
    /// `j` of `v` for every `j`.
    pub fn marginal_probabilities(&self, qubits: &[QubitId]) -> Vec<f64> {
        let mut marginal = vec![0.0; 1usize << qubits.len()];
        for (index, amplitude) in self.state_vector.iter().enumerate() {
            let p = amplitude.norm_sqr();
            if p == 0.0 {
                continue;
            }
            marginal[extract_bits(index, qubits)] += p;
        }
        marginal
    }
}

/// Gathers the bits of `index` selected by `qubits` into a compact integer,
/// `qubits[j]` becoming bit `j`.
pub fn extract_bits(index: usize, qubits: &[QubitId]) -> usize {
    qubits
        .iter()
        .enumerate()
        .fold(0, |acc, (j, q)| acc | (((index >> q.0) & 1) << j))
}

impl fmt::Display for QuantumState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.state_vector.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_state_is_normalized_basis_state() {
        let state = QuantumState::zero(3).unwrap();
        assert_eq!(state.dim(), 8);
        assert_eq!(state.num_qubits(), 3);
        assert_eq!(state.probability(0), 1.0);
        assert!((state.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn from_amplitudes_rejects_non_power_of_two() {
        let err = QuantumState::from_amplitudes(vec![Complex::zero(); 3]).unwrap_err();
        assert!(matches!(err, QsatError::SimulationError { .. }));
    }

    #[test]
    fn marginal_traces_out_other_qubits() {
        // Amplitude 0.6 on |01> (q0 = 1) and 0.8 on |10> (q1 = 1).
        let state = QuantumState::from_amplitudes(vec![
            Complex::zero(),
            Complex::new(0.6, 0.0),
            Complex::new(0.8, 0.0),
            Complex::zero(),
        ])
        .unwrap();
        let m0 = state.marginal_probabilities(&[QubitId(0)]);
        assert!((m0[1] - 0.36).abs() < 1e-12);
        assert!((m0[0] - 0.64).abs() < 1e-12);

        let reversed = state.marginal_probabilities(&[QubitId(1), QubitId(0)]);
        // qubit 1 becomes bit 0 of the compact index
        assert!((reversed[0b01] - 0.64).abs() < 1e-12);
        assert!((reversed[0b10] - 0.36).abs() < 1e-12);
    }

    #[test]
    fn extract_bits_packs_selected_qubits() {
        assert_eq!(extract_bits(0b1010, &[QubitId(1), QubitId(3)]), 0b11);
        assert_eq!(extract_bits(0b1010, &[QubitId(0), QubitId(2)]), 0);
    }
}
