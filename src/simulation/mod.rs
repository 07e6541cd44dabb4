// src/simulation/mod.rs

//! Executes `qsat::circuits::Circuit` on a state vector.
//! This module contains the `Simulator` entry point, the internal
//! `SimulationEngine` that applies gates, and shot sampling.

mod results;
pub(crate) mod engine;
pub(crate) mod sampling;

pub use results::MeasurementOutcome;

use crate::circuits::Circuit;
use crate::core::constants::qsat_constants::DEFAULT_MAX_QUBITS;
use crate::core::{QsatError, QuantumState, Result};
use engine::SimulationEngine;

/// Runs circuits on freshly allocated or caller-supplied states.
///
/// Each call owns its state from start to finish, so independent runs never
/// share amplitudes.
#[derive(Debug, Clone)]
pub struct Simulator {
    max_qubits: usize,
}

impl Default for Simulator {
    fn default() -> Self {
        Self { max_qubits: DEFAULT_MAX_QUBITS }
    }
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of qubits a run may allocate.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Runs `circuit` on `|0...0>` over `num_qubits` qubits and returns the final state.
    ///
    /// # Errors
    /// * `ResourceExceeded` if `num_qubits` is above the limit; nothing is allocated.
    /// * `InvalidOperation` if the circuit touches a qubit outside the register.
    pub fn run(&self, circuit: &Circuit, num_qubits: usize) -> Result<QuantumState> {
        if num_qubits > self.max_qubits {
            return Err(QsatError::ResourceExceeded { requested: num_qubits, limit: self.max_qubits });
        }
        let mut engine = SimulationEngine::init(num_qubits)?;
        engine.apply_circuit(circuit)?;
        Ok(engine.into_state())
    }

    /// Runs `circuit` on a prepared state, consuming it.
    pub fn run_on(&self, state: QuantumState, circuit: &Circuit) -> Result<QuantumState> {
        if circuit.width() > state.num_qubits() {
            return Err(QsatError::invalid_operation(format!(
                "Circuit spans {} qubits but the state holds {}",
                circuit.width(),
                state.num_qubits()
            )));
        }
        let mut engine = SimulationEngine::from_state(state);
        engine.apply_circuit(circuit)?;
        Ok(engine.into_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::QubitId;
    use crate::operations::Gate;

    #[test]
    fn empty_circuit_leaves_zero_state() -> Result<()> {
        let state = Simulator::new().run(&Circuit::new(), 2)?;
        assert_eq!(state.probability(0), 1.0);
        Ok(())
    }

    #[test]
    fn oversized_register_is_refused_before_allocation() {
        let err = Simulator::new().with_max_qubits(4).run(&Circuit::new(), 5).unwrap_err();
        assert_eq!(err, QsatError::ResourceExceeded { requested: 5, limit: 4 });
    }

    #[test]
    fn circuit_wider_than_state_is_rejected() -> Result<()> {
        let circuit = CircuitBuilder::new().add_op(Gate::x(QubitId(3))).build()?;
        let err = Simulator::new().run(&circuit, 2).unwrap_err();
        assert!(matches!(err, QsatError::InvalidOperation { .. }));
        Ok(())
    }

    #[test]
    fn circuit_followed_by_its_inverse_is_identity() -> Result<()> {
        let circuit = CircuitBuilder::new()
            .add_op(Gate::h(QubitId(0)))
            .add_op(Gate::mcx(vec![QubitId(0)], QubitId(1)))
            .add_op(Gate::Fourier { qubits: vec![QubitId(1), QubitId(2)], inverse: false, controls: vec![] })
            .build()?;
        let mut round_trip = circuit.clone();
        round_trip.append(&circuit.inverse());

        let state = Simulator::new().run(&round_trip, 3)?;
        assert!((state.probability(0) - 1.0).abs() < 1e-9);
        Ok(())
    }
}
