// src/simulation/engine.rs
use crate::circuits::Circuit;
use crate::core::{QsatError, QuantumState, QubitId, Result};
use crate::operations::Gate;
use num_complex::Complex;
use num_traits::Zero;
use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Applies gates, one at a time and in order, to an exclusively owned state.
///
/// No gate observes a partially applied predecessor: each `apply_gate` call
/// rewrites the amplitude vector completely before returning.
#[derive(Debug)]
pub(crate) struct SimulationEngine {
    state: QuantumState,
}

impl SimulationEngine {
    /// Starts from `|0...0>` over `num_qubits` qubits.
    pub(crate) fn init(num_qubits: usize) -> Result<Self> {
        Ok(Self { state: QuantumState::zero(num_qubits)? })
    }

    /// Continues from an existing state.
    pub(crate) fn from_state(state: QuantumState) -> Self {
        Self { state }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &QuantumState {
        &self.state
    }

    pub(crate) fn into_state(self) -> QuantumState {
        self.state
    }

    pub(crate) fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    pub(crate) fn apply_circuit(&mut self, circuit: &Circuit) -> Result<()> {
        trace!(gates = circuit.len(), "applying circuit");
        for op in circuit.operations() {
            self.apply_gate(op)?;
        }
        Ok(())
    }

    /// Applies a single gate to the global state.
    pub(crate) fn apply_gate(&mut self, op: &Gate) -> Result<()> {
        self.check_qubits(op)?;
        let control_mask = mask_of(op.controls());

        match op {
            Gate::Unitary { gate, target, .. } => {
                self.apply_single_qubit_gate(*target, &gate.matrix(), control_mask);
            }
            Gate::MultiControlledX { target, .. } => {
                // Zero controls give an empty mask, which every index satisfies.
                self.apply_controlled_flip(*target, control_mask);
            }
            Gate::ControlledPhase { target, theta, .. } => {
                let mask = control_mask | target.mask();
                let phase = Complex::from_polar(1.0, *theta);
                for (index, amplitude) in self.state.vector_mut().iter_mut().enumerate() {
                    if index & mask == mask {
                        *amplitude *= phase;
                    }
                }
            }
            Gate::Fourier { qubits, inverse, .. } => {
                self.apply_fourier(qubits, *inverse, control_mask);
            }
        }
        Ok(())
    }

    /// Rejects gates that reference qubits outside the state or reuse a qubit
    /// as both control and target.
    fn check_qubits(&self, op: &Gate) -> Result<()> {
        let involved = op.involved_qubits();
        let num_qubits = self.num_qubits();
        if let Some(q) = involved.iter().find(|q| q.0 >= num_qubits) {
            return Err(QsatError::invalid_operation(format!(
                "Gate '{}' references {} outside a {}-qubit state",
                op, q, num_qubits
            )));
        }
        let unique: HashSet<&QubitId> = involved.iter().collect();
        if unique.len() != involved.len() {
            return Err(QsatError::invalid_operation(format!(
                "Gate '{}' uses a qubit more than once",
                op
            )));
        }
        Ok(())
    }

    /// Applies a 2x2 matrix to `target` on every pair of basis states that
    /// differ only at `target` and satisfy `control_mask`.
    fn apply_single_qubit_gate(&mut self, target: QubitId, matrix: &[[Complex<f64>; 2]; 2], control_mask: usize) {
        let t_mask = target.mask();
        let vector = self.state.vector_mut();
        for i0 in 0..vector.len() {
            if i0 & t_mask != 0 || i0 & control_mask != control_mask {
                continue;
            }
            let i1 = i0 | t_mask;
            let psi_0 = vector[i0]; // Amplitude for |...target=0...>
            let psi_1 = vector[i1]; // Amplitude for |...target=1...>
            vector[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            vector[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    fn apply_controlled_flip(&mut self, target: QubitId, control_mask: usize) {
        let t_mask = target.mask();
        let vector = self.state.vector_mut();
        for i0 in 0..vector.len() {
            if i0 & t_mask == 0 && i0 & control_mask == control_mask {
                vector.swap(i0, i0 | t_mask);
            }
        }
    }

    /// Dense discrete Fourier transform over the sub-register `qubits`, applied
    /// independently to every assignment of the remaining qubits.
    ///
    /// Forward: `|x> -> 2^(-t/2) Σ_k e^(2πi·xk/2^t) |k>`; the inverse uses the
    /// conjugate kernel.
    fn apply_fourier(&mut self, qubits: &[QubitId], inverse: bool, control_mask: usize) {
        let size = 1usize << qubits.len();
        let register_mask = mask_of(qubits);
        let sign = if inverse { -1.0 } else { 1.0 };
        let scale = 1.0 / (size as f64).sqrt();
        let roots: Vec<Complex<f64>> = (0..size)
            .map(|k| Complex::from_polar(scale, sign * 2.0 * PI * k as f64 / size as f64))
            .collect();
        let offsets: Vec<usize> = (0..size).map(|x| scatter_bits(x, qubits)).collect();

        let vector = self.state.vector_mut();
        let mut input = vec![Complex::zero(); size];
        for base in 0..vector.len() {
            if base & register_mask != 0 || base & control_mask != control_mask {
                continue;
            }
            for (x, offset) in offsets.iter().enumerate() {
                input[x] = vector[base | offset];
            }
            for (k, offset) in offsets.iter().enumerate() {
                let mut acc = Complex::zero();
                for (x, amplitude) in input.iter().enumerate() {
                    acc += *amplitude * roots[(x * k) % size];
                }
                vector[base | offset] = acc;
            }
        }
    }
}

/// Bit mask with the bit of every listed qubit set.
pub(crate) fn mask_of(qubits: &[QubitId]) -> usize {
    qubits.iter().fold(0, |mask, q| mask | q.mask())
}

/// Spreads the low bits of `value` onto `qubits` (`bit j` -> `qubits[j]`).
pub(crate) fn scatter_bits(value: usize, qubits: &[QubitId]) -> usize {
    qubits
        .iter()
        .enumerate()
        .fold(0, |acc, (j, q)| acc | (((value >> j) & 1) << q.0))
}

/// Deterministic PRNG seed derived from the amplitudes of a state.
/// Identical states always yield identical measurement sequences.
pub(crate) fn seed_from_state(state: &QuantumState) -> u64 {
    let mut hasher = DefaultHasher::new();
    for complex_val in state.vector() {
        complex_val.re.to_ne_bytes().hash(&mut hasher);
        complex_val.im.to_ne_bytes().hash(&mut hasher);
    }
    hasher.finish()
}
