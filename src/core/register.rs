// src/core/register.rs

use super::error::{QsatError, QubitId, Result};
use std::fmt;

/// Purpose of a register within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterKind {
    /// One qubit per Boolean variable; holds the candidate assignment.
    Literal,
    /// One qubit per clause; holds the clause truth value while the oracle computes.
    ClauseEval,
    /// Scratch qubits that must be returned to |0> by uncomputation.
    Ancilla,
    /// Phase-estimation register of the counting stage.
    Phase,
    /// Classical readout bits. Lives in its own index space, not in the state vector.
    Classical,
}

impl RegisterKind {
    /// Whether the register occupies qubits of the state vector.
    pub fn is_quantum(self) -> bool {
        !matches!(self, RegisterKind::Classical)
    }
}

/// A named, contiguous block of indices with a declared purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Register {
    name: String,
    kind: RegisterKind,
    start: usize,
    len: usize,
}

impl Register {
    /// Register name, unique within its layout.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// First index of the block.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `i`-th qubit of the register.
    ///
    /// # Panics
    /// Panics if `i >= len`; register offsets are computed by the compiler,
    /// never taken from input.
    pub fn qubit(&self, i: usize) -> QubitId {
        assert!(i < self.len, "index {} out of register '{}' of length {}", i, self.name, self.len);
        QubitId(self.start + i)
    }

    /// All qubits of the register in ascending order.
    pub fn qubits(&self) -> Vec<QubitId> {
        (self.start..self.start + self.len).map(QubitId).collect()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:?}; {}..{}]", self.name, self.kind, self.start, self.start + self.len)
    }
}

/// Partition of the global qubit index space into registers.
///
/// Quantum registers are allocated back to back from qubit 0, so they are
/// disjoint and the total qubit count is the sum of their sizes. Classical
/// registers are allocated from a separate classical bit space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterLayout {
    registers: Vec<Register>,
    num_qubits: usize,
    num_classical_bits: usize,
}

impl RegisterLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a register of `len` indices and returns it.
    ///
    /// # Errors
    /// `InvalidOperation` if a register with the same name already exists.
    pub fn add(&mut self, name: &str, kind: RegisterKind, len: usize) -> Result<Register> {
        if self.registers.iter().any(|r| r.name == name) {
            return Err(QsatError::invalid_operation(format!("Register '{}' is already defined", name)));
        }
        let start = if kind.is_quantum() { self.num_qubits } else { self.num_classical_bits };
        let register = Register { name: name.to_string(), kind, start, len };
        if kind.is_quantum() {
            self.num_qubits += len;
        } else {
            self.num_classical_bits += len;
        }
        self.registers.push(register.clone());
        Ok(register)
    }

    /// All registers of a given kind, in allocation order.
    pub fn of_kind(&self, kind: RegisterKind) -> impl Iterator<Item = &Register> {
        self.registers.iter().filter(move |r| r.kind == kind)
    }

    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// Total number of qubits in the state vector.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_classical_bits(&self) -> usize {
        self.num_classical_bits
    }

    /// Qubits that must read |0> whenever no oracle is in flight.
    pub fn workspace_qubits(&self) -> Vec<QubitId> {
        self.of_kind(RegisterKind::ClauseEval)
            .chain(self.of_kind(RegisterKind::Ancilla))
            .flat_map(Register::qubits)
            .collect()
    }

    /// Fails with `ResourceExceeded` if the layout needs more than `max_qubits`.
    pub fn ensure_within(&self, max_qubits: usize) -> Result<()> {
        if self.num_qubits > max_qubits {
            return Err(QsatError::ResourceExceeded { requested: self.num_qubits, limit: max_qubits });
        }
        Ok(())
    }
}

impl fmt::Display for RegisterLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layout[{} qubits", self.num_qubits)?;
        for r in &self.registers {
            write!(f, ", {}", r)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantum_registers_partition_qubits() -> Result<()> {
        let mut layout = RegisterLayout::new();
        let lit = layout.add("literal", RegisterKind::Literal, 3)?;
        let clause = layout.add("clause", RegisterKind::ClauseEval, 2)?;
        let readout = layout.add("readout", RegisterKind::Classical, 3)?;
        let anc = layout.add("ancilla", RegisterKind::Ancilla, 1)?;

        assert_eq!(lit.qubits(), vec![QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(clause.start(), 3);
        assert_eq!(anc.qubit(0), QubitId(5));
        assert_eq!(readout.start(), 0);
        assert_eq!(layout.num_qubits(), 6);
        assert_eq!(layout.num_classical_bits(), 3);
        assert_eq!(layout.workspace_qubits(), vec![QubitId(3), QubitId(4), QubitId(5)]);
        assert_eq!(layout.of_kind(RegisterKind::Classical).count(), 1);
        assert_eq!(layout.of_kind(RegisterKind::Phase).count(), 0);
        Ok(())
    }

    #[test]
    fn duplicate_register_name_is_rejected() {
        let mut layout = RegisterLayout::new();
        layout.add("literal", RegisterKind::Literal, 2).unwrap();
        let err = layout.add("literal", RegisterKind::Phase, 2).unwrap_err();
        assert!(matches!(err, QsatError::InvalidOperation { .. }));
    }

    #[test]
    fn resource_limit_is_enforced() {
        let mut layout = RegisterLayout::new();
        layout.add("literal", RegisterKind::Literal, 30).unwrap();
        assert_eq!(
            layout.ensure_within(24),
            Err(QsatError::ResourceExceeded { requested: 30, limit: 24 })
        );
        assert!(layout.ensure_within(30).is_ok());
    }
}
