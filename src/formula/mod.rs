// src/formula/mod.rs

//! Validated CNF formulas as handed over by a DIMACS parser.
//!
//! The crate never reads files. A caller supplies the declared variable
//! count, the declared clause count and the clause list; `Formula::new`
//! checks the DIMACS invariants and refuses to repair anything.

use crate::core::{QsatError, Result};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// A variable or its negation. Variables are 1-based as in DIMACS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    variable: usize,
    positive: bool,
}

impl Literal {
    /// Decodes a DIMACS literal. Returns `None` for `0`.
    pub fn from_dimacs(value: i64) -> Option<Self> {
        if value == 0 {
            return None;
        }
        Some(Self { variable: value.unsigned_abs() as usize, positive: value > 0 })
    }

    /// 1-based variable index.
    pub fn variable(&self) -> usize {
        self.variable
    }

    /// `false` for a negated literal.
    pub fn is_positive(&self) -> bool {
        self.positive
    }

    pub fn negated(self) -> Self {
        Self { variable: self.variable, positive: !self.positive }
    }

    /// Truth value under an assignment packed as bits (`bit i` = variable `i+1`).
    pub fn evaluate(&self, assignment: usize) -> bool {
        let value = (assignment >> (self.variable - 1)) & 1 == 1;
        value == self.positive
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.positive {
            write!(f, "x{}", self.variable)
        } else {
            write!(f, "¬x{}", self.variable)
        }
    }
}

/// A disjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// A clause holding both `x` and `¬x` is true under every assignment.
    pub fn is_tautology(&self) -> bool {
        self.literals.iter().any(|l| self.literals.contains(&l.negated()))
    }

    pub fn evaluate(&self, assignment: usize) -> bool {
        self.literals.iter().any(|l| l.evaluate(assignment))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.literals.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { " ∨ " } else { "" }, lit)?;
        }
        write!(f, ")")
    }
}

/// A CNF formula: the conjunction of its clauses over `num_variables` variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Formula {
    num_variables: usize,
    clauses: Vec<Clause>,
}

impl Formula {
    /// Builds a formula from parser output.
    ///
    /// # Errors
    /// `QsatError::Formula` if `variable_count` is zero, `clause_count` does not
    /// match the number of clauses, or a clause is empty, holds a zero literal,
    /// names a variable above `variable_count`, or repeats a literal.
    pub fn new(variable_count: usize, clause_count: usize, clauses: &[Vec<i64>]) -> Result<Self> {
        if variable_count == 0 {
            return Err(QsatError::formula("A formula needs at least one variable"));
        }
        if clause_count != clauses.len() {
            return Err(QsatError::formula(format!(
                "Declared clause count {} does not match the {} clauses supplied",
                clause_count,
                clauses.len()
            )));
        }

        let mut parsed = Vec::with_capacity(clauses.len());
        for (index, raw) in clauses.iter().enumerate() {
            if raw.is_empty() {
                return Err(QsatError::formula(format!("Clause {} is empty", index + 1)));
            }
            let mut seen = HashSet::with_capacity(raw.len());
            let mut literals = Vec::with_capacity(raw.len());
            for &value in raw {
                let literal = Literal::from_dimacs(value)
                    .ok_or_else(|| QsatError::formula(format!("Clause {} contains the zero literal", index + 1)))?;
                if literal.variable() > variable_count {
                    return Err(QsatError::formula(format!(
                        "Clause {} references variable {} but only {} are declared",
                        index + 1,
                        literal.variable(),
                        variable_count
                    )));
                }
                if !seen.insert(literal) {
                    return Err(QsatError::formula(format!(
                        "Clause {} repeats literal {}",
                        index + 1,
                        value
                    )));
                }
                literals.push(literal);
            }
            parsed.push(Clause { literals });
        }

        Ok(Self { num_variables: variable_count, clauses: parsed })
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Size of the assignment space, `2^n`.
    ///
    /// Only meaningful once the formula's layout has passed the qubit limit,
    /// which keeps `n` far below the word size.
    pub fn search_space(&self) -> usize {
        1usize << self.num_variables
    }

    /// Whether every clause holds under an assignment packed as bits
    /// (`bit i` = variable `i+1`).
    pub fn evaluate(&self, assignment: usize) -> bool {
        self.clauses.iter().all(|c| c.evaluate(assignment))
    }

    /// Evaluates a decoded assignment. Variables missing from the map read false.
    pub fn is_satisfied_by(&self, assignment: &BTreeMap<usize, bool>) -> bool {
        let packed = assignment
            .iter()
            .filter(|&(var, value)| *value && *var >= 1 && *var <= self.num_variables)
            .fold(0usize, |acc, (var, _)| acc | (1 << (var - 1)));
        self.evaluate(packed)
    }

    /// Exhaustive count of satisfying assignments.
    ///
    /// Reference value for checking the quantum estimate on small formulas;
    /// it walks all `2^n` assignments.
    pub fn count_satisfying_assignments(&self) -> usize {
        (0..self.search_space()).filter(|a| self.evaluate(*a)).count()
    }

    /// The same formula over `extra` additional variables, each forced false by
    /// a unit clause. The satisfying assignments keep their count while the
    /// search space grows by `2^extra`.
    pub fn padded(&self, extra: usize) -> Self {
        let mut clauses = self.clauses.clone();
        for k in 1..=extra {
            clauses.push(Clause {
                literals: vec![Literal { variable: self.num_variables + k, positive: false }],
            });
        }
        Self { num_variables: self.num_variables + extra, clauses }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CNF[{} vars, {} clauses]", self.num_variables, self.clauses.len())?;
        for (i, clause) in self.clauses.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { " ∧ " } else { ": " }, clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_formula_error(result: Result<Formula>, fragment: &str) {
        match result {
            Err(QsatError::Formula { message }) => {
                assert!(message.contains(fragment), "Unexpected message: {}", message)
            }
            other => panic!("Expected Formula error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_well_formed_formula() -> Result<()> {
        let formula = Formula::new(2, 2, &[vec![1, 2], vec![-1, 2]])?;
        assert_eq!(formula.num_variables(), 2);
        assert_eq!(formula.num_clauses(), 2);
        assert_eq!(formula.search_space(), 4);
        assert_eq!(formula.clauses()[1].literals()[0].to_string(), "¬x1");
        Ok(())
    }

    #[test]
    fn rejects_malformed_input() {
        expect_formula_error(Formula::new(0, 0, &[]), "at least one variable");
        expect_formula_error(Formula::new(2, 3, &[vec![1]]), "does not match");
        expect_formula_error(Formula::new(2, 1, &[vec![]]), "empty");
        expect_formula_error(Formula::new(2, 1, &[vec![1, 0]]), "zero literal");
        expect_formula_error(Formula::new(2, 1, &[vec![3]]), "variable 3");
        expect_formula_error(Formula::new(2, 1, &[vec![-2, 1, -2]]), "repeats literal -2");
    }

    #[test]
    fn evaluation_uses_bit_per_variable() -> Result<()> {
        // (x1 ∨ x2) ∧ (¬x1 ∨ x2): satisfied exactly when x2 is true.
        let formula = Formula::new(2, 2, &[vec![1, 2], vec![-1, 2]])?;
        let satisfying: Vec<usize> = (0..4).filter(|a| formula.evaluate(*a)).collect();
        assert_eq!(satisfying, vec![0b10, 0b11]);
        assert_eq!(formula.count_satisfying_assignments(), 2);

        let assignment = BTreeMap::from([(1, false), (2, true)]);
        assert!(formula.is_satisfied_by(&assignment));
        Ok(())
    }

    #[test]
    fn complementary_literals_form_a_tautology() -> Result<()> {
        let formula = Formula::new(2, 1, &[vec![1, -1]])?;
        assert!(formula.clauses()[0].is_tautology());
        assert_eq!(formula.count_satisfying_assignments(), 4);
        Ok(())
    }

    #[test]
    fn padding_preserves_solution_count() -> Result<()> {
        let formula = Formula::new(2, 2, &[vec![1, 2], vec![-1, 2]])?;
        let padded = formula.padded(2);
        assert_eq!(padded.num_variables(), 4);
        assert_eq!(padded.num_clauses(), 4);
        assert_eq!(padded.count_satisfying_assignments(), 2);
        // padding variables must stay false
        assert!(padded.evaluate(0b0010));
        assert!(!padded.evaluate(0b0110));
        Ok(())
    }
}
