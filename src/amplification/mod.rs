// src/amplification/mod.rs

//! The amplitude-amplification operator `G(w) = D(w) · O`.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{QubitId, Result, PI};
use crate::oracle::OracleDescriptor;
use crate::operations::{Gate, SingleQubitGate};

/// Builds Grover iterations over the literal register of a compiled oracle.
///
/// `D(w) = -(I + (e^{iπw} - 1)|s><s|)` where `|s>` is the uniform
/// superposition over the literal register. At `w = 1` this is the exact
/// reflection `2|s><s| - I`; smaller `w` rotates less far.
#[derive(Debug, Clone)]
pub struct AmplificationOperator {
    oracle: OracleDescriptor,
}

impl AmplificationOperator {
    pub fn new(oracle: OracleDescriptor) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &OracleDescriptor {
        &self.oracle
    }

    /// The diffusion `D(strength)` alone.
    pub fn diffusion(&self, strength: f64) -> Result<Circuit> {
        let literals = self.oracle.literal_register().qubits();
        let (last, rest) = match literals.split_last() {
            Some(split) => split,
            None => return Ok(Circuit::new()),
        };

        let hadamards: Vec<Gate> = literals.iter().map(|q| Gate::h(*q)).collect();
        let flips: Vec<Gate> = literals.iter().map(|q| Gate::x(*q)).collect();
        CircuitBuilder::new()
            .compute_ops(hadamards)
            .compute_ops(flips)
            // Phase e^{iπw} on |0...0>, i.e. on |s> once the basis change is undone.
            .add_op(Gate::ControlledPhase { controls: rest.to_vec(), target: *last, theta: PI * strength })
            .commit_with_uncompute()
            .add_op(Gate::single(SingleQubitGate::GlobalPhase(PI), literals[0]))
            .build()
    }

    /// One iteration `G(strength)`: the oracle followed by the diffusion.
    pub fn step(&self, strength: f64) -> Result<Circuit> {
        let mut circuit = self.oracle.circuit().clone();
        circuit.append(&self.diffusion(strength)?);
        Ok(circuit)
    }

    /// `G(strength)` with every gate conditioned on `control`.
    pub fn controlled_step(&self, control: QubitId, strength: f64) -> Result<Circuit> {
        Ok(self.step(strength)?.controlled_by(control))
    }
}
