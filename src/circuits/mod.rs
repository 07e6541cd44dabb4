// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! gates (`qsat::operations::Gate`).
//!
//! The `CircuitBuilder` owns the compute/uncompute discipline: gates recorded
//! with `compute_op` are replayed as their inverses, in reverse order, by
//! `commit_with_uncompute`, and a circuit cannot be built while such a scope
//! is still open.

use crate::core::{QsatError, QubitId, Result};
use crate::operations::Gate;
use std::collections::BTreeSet;
use std::fmt;

/// An ordered sequence of gates. Order is significant: gates are applied
/// front to back.
#[derive(Clone, PartialEq, Default)]
pub struct Circuit {
    /// Every qubit touched by at least one gate.
    qubits: BTreeSet<QubitId>,
    operations: Vec<Gate>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a gate and registers the qubits it touches.
    pub fn add_operation(&mut self, op: Gate) {
        self.qubits.extend(op.involved_qubits());
        self.operations.push(op);
    }

    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Gate>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// Appends every gate of `other`.
    pub fn append(&mut self, other: &Circuit) {
        self.add_operations(other.operations.iter().cloned());
    }

    /// The unique set of qubits involved in this circuit.
    pub fn qubits(&self) -> &BTreeSet<QubitId> {
        &self.qubits
    }

    /// Smallest register width able to hold every touched qubit.
    pub fn width(&self) -> usize {
        self.qubits.iter().next_back().map_or(0, |q| q.0 + 1)
    }

    pub fn operations(&self) -> &[Gate] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The circuit that undoes this one: inverse gates in reverse order.
    pub fn inverse(&self) -> Circuit {
        let mut inverse = Circuit::new();
        inverse.add_operations(self.operations.iter().rev().map(Gate::inverse));
        inverse
    }

    /// The same circuit with `control` added to every gate.
    pub fn controlled_by(&self, control: QubitId) -> Circuit {
        let mut controlled = Circuit::new();
        controlled.add_operations(self.operations.iter().map(|g| g.controlled_by(control)));
        controlled
    }

    /// This circuit applied `times` times in a row.
    pub fn repeated(&self, times: usize) -> Circuit {
        let mut repeated = Circuit::new();
        for _ in 0..times {
            repeated.append(self);
        }
        repeated
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Builds circuits with method chaining and scoped uncomputation.
#[derive(Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
    /// Gates recorded since the last `commit_with_uncompute`, in application order.
    compute_scope: Vec<Gate>,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a gate that is not part of any compute scope.
    pub fn add_op(mut self, op: Gate) -> Self {
        self.circuit.add_operation(op);
        self
    }

    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Adds a gate whose effect must be undone before the circuit ends.
    pub fn compute_op(mut self, op: Gate) -> Self {
        self.compute_scope.push(op.clone());
        self.circuit.add_operation(op);
        self
    }

    pub fn compute_ops<I>(self, ops: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        ops.into_iter().fold(self, |builder, op| builder.compute_op(op))
    }

    /// Closes the open compute scope: appends the inverse of every recorded
    /// compute gate in reverse order.
    pub fn commit_with_uncompute(mut self) -> Self {
        let scope = std::mem::take(&mut self.compute_scope);
        self.circuit.add_operations(scope.iter().rev().map(Gate::inverse));
        self
    }

    /// Number of compute gates still waiting for their uncompute.
    pub fn open_scope_len(&self) -> usize {
        self.compute_scope.len()
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    ///
    /// # Errors
    /// `InvalidOperation` if a compute scope is still open, which would leave
    /// workspace qubits entangled with the result.
    pub fn build(self) -> Result<Circuit> {
        if !self.compute_scope.is_empty() {
            return Err(QsatError::invalid_operation(format!(
                "Circuit has {} computed gates that were never uncomputed",
                self.compute_scope.len()
            )));
        }
        Ok(self.circuit)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qsat::Circuit[{} operations on {} qubits]", self.operations.len(), self.qubits.len())?;
        for (t, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {:>4}: {}", t, op)?;
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::SingleQubitGate;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn uncompute_replays_inverses_in_reverse_order() -> Result<()> {
        let circuit = CircuitBuilder::new()
            .compute_op(Gate::x(q(0)))
            .compute_op(Gate::mcx(vec![q(0), q(1)], q(2)))
            .add_op(Gate::z(q(2)))
            .commit_with_uncompute()
            .build()?;

        assert_eq!(
            circuit.operations(),
            &[
                Gate::x(q(0)),
                Gate::mcx(vec![q(0), q(1)], q(2)),
                Gate::z(q(2)),
                Gate::mcx(vec![q(0), q(1)], q(2)),
                Gate::x(q(0)),
            ]
        );
        assert_eq!(circuit.width(), 3);
        Ok(())
    }

    #[test]
    fn open_compute_scope_blocks_build() {
        let builder = CircuitBuilder::new().compute_op(Gate::x(q(0)));
        assert_eq!(builder.open_scope_len(), 1);
        assert!(matches!(builder.build(), Err(QsatError::InvalidOperation { .. })));
    }

    #[test]
    fn inverse_and_control_transform_every_gate() {
        let mut circuit = Circuit::new();
        circuit.add_operation(Gate::single(SingleQubitGate::Phase(0.5), q(0)));
        circuit.add_operation(Gate::h(q(1)));

        let inverse = circuit.inverse();
        assert_eq!(inverse.operations()[0], Gate::h(q(1)));
        assert_eq!(inverse.operations()[1], Gate::single(SingleQubitGate::Phase(-0.5), q(0)));

        let controlled = circuit.controlled_by(q(4));
        assert!(controlled.operations().iter().all(|g| g.controls() == [q(4)]));
        assert_eq!(controlled.width(), 5);
        assert_eq!(circuit.repeated(3).len(), 6);
    }
}
