// src/oracle/mod.rs

//! Compiles a CNF `Formula` into a reversible phase oracle.
//!
//! The oracle flips the sign of every basis state whose literal register
//! holds a satisfying assignment and leaves all other states untouched. The
//! clause-evaluation register and the ancilla are returned to `|0>`.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{Register, RegisterKind, RegisterLayout, Result};
use crate::formula::{Clause, Formula};
use crate::operations::Gate;
use tracing::debug;

pub const LITERAL_REGISTER: &str = "literal";
pub const CLAUSE_REGISTER: &str = "clause";
pub const ANCILLA_REGISTER: &str = "ancilla";
pub const READOUT_REGISTER: &str = "readout";

/// An oracle circuit together with the layout it was compiled for.
///
/// Immutable once built. Qubits are allocated as
/// `literal[n] | clause[m] | ancilla[1]`; further registers may be appended
/// to a copy of the layout without disturbing these offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleDescriptor {
    formula: Formula,
    layout: RegisterLayout,
    literals: Register,
    clauses: Register,
    ancilla: Register,
    circuit: Circuit,
}

impl OracleDescriptor {
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// One qubit per variable; qubit `i` holds variable `i + 1`.
    pub fn literal_register(&self) -> &Register {
        &self.literals
    }

    /// One qubit per clause.
    pub fn clause_register(&self) -> &Register {
        &self.clauses
    }

    pub fn ancilla_register(&self) -> &Register {
        &self.ancilla
    }

    /// Compute, mark and uncompute gates in application order.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn num_qubits(&self) -> usize {
        self.layout.num_qubits()
    }
}

/// Compiles `formula` into an `OracleDescriptor`.
///
/// The formula was validated at construction, so compilation only fails if
/// the circuit builder detects an unbalanced compute scope.
pub fn compile_oracle(formula: &Formula) -> Result<OracleDescriptor> {
    let mut layout = RegisterLayout::new();
    let literals = layout.add(LITERAL_REGISTER, RegisterKind::Literal, formula.num_variables())?;
    let clauses = layout.add(CLAUSE_REGISTER, RegisterKind::ClauseEval, formula.num_clauses())?;
    let ancilla = layout.add(ANCILLA_REGISTER, RegisterKind::Ancilla, 1)?;
    layout.add(READOUT_REGISTER, RegisterKind::Classical, formula.num_variables())?;

    let mut builder = CircuitBuilder::new();
    for (index, clause) in formula.clauses().iter().enumerate() {
        builder = builder.compute_ops(clause_gates(clause, &literals, &clauses, index));
    }
    // With no clauses the AND over zero controls is unconditional, which
    // marks every assignment.
    let target = ancilla.qubit(0);
    let circuit = builder
        .compute_op(Gate::mcx(clauses.qubits(), target))
        .add_op(Gate::z(target))
        .commit_with_uncompute()
        .build()?;

    debug!(
        variables = formula.num_variables(),
        clauses = formula.num_clauses(),
        gates = circuit.len(),
        qubits = layout.num_qubits(),
        "compiled oracle"
    );

    Ok(OracleDescriptor { formula: formula.clone(), layout, literals, clauses, ancilla, circuit })
}

/// Gates that leave clause qubit `index` at 1 exactly when the clause holds.
///
/// De Morgan: `l1 ∨ l2 ∨ ...` is `¬(¬l1 ∧ ¬l2 ∧ ...)`. The clause qubit is set
/// to 1, positive literals are flipped so every control reads "literal is
/// false", and the AND of those controls clears the clause qubit.
fn clause_gates(clause: &Clause, literals: &Register, clauses: &Register, index: usize) -> Vec<Gate> {
    let clause_qubit = clauses.qubit(index);
    let mut gates = vec![Gate::x(clause_qubit)];
    if clause.is_tautology() {
        return gates;
    }

    let flips: Vec<Gate> = clause
        .literals()
        .iter()
        .filter(|l| l.is_positive())
        .map(|l| Gate::x(literals.qubit(l.variable() - 1)))
        .collect();
    let controls = clause.literals().iter().map(|l| literals.qubit(l.variable() - 1)).collect();

    gates.extend(flips.iter().cloned());
    gates.push(Gate::mcx(controls, clause_qubit));
    gates.extend(flips);
    gates
}
