// src/operations/mod.rs

//! Gate operations acting on the simulated state vector.
//!
//! `Gate` is a closed set of variants dispatched by exhaustive matching in
//! the simulation engine. Every variant carries explicit control and target
//! qubits and has an exact inverse, which is what lets the circuit builder
//! emit uncomputation automatically.

use crate::core::QubitId;
use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

/// Single-qubit unitaries used by the oracle, diffusion and counting circuits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SingleQubitGate {
    /// Equal mixing of |0> and |1>.
    Hadamard,
    /// Bit flip.
    PauliX,
    /// Phase flip of |1>.
    PauliZ,
    /// `diag(1, e^(iθ))`.
    Phase(f64),
    /// `e^(iθ)·I`. Invisible on its own, but becomes a phase on the control
    /// once the gate is controlled, so it is kept explicit.
    GlobalPhase(f64),
}

impl SingleQubitGate {
    /// The 2x2 matrix in the {|0>, |1>} basis.
    pub fn matrix(&self) -> [[Complex<f64>; 2]; 2] {
        let one = Complex::new(1.0, 0.0);
        match *self {
            SingleQubitGate::Hadamard => [
                [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(FRAC_1_SQRT_2, 0.0)],
                [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(-FRAC_1_SQRT_2, 0.0)],
            ],
            SingleQubitGate::PauliX => [[Complex::zero(), one], [one, Complex::zero()]],
            SingleQubitGate::PauliZ => [[one, Complex::zero()], [Complex::zero(), -one]],
            SingleQubitGate::Phase(theta) => [
                [one, Complex::zero()],
                [Complex::zero(), Complex::from_polar(1.0, theta)],
            ],
            SingleQubitGate::GlobalPhase(theta) => {
                let phase = Complex::from_polar(1.0, theta);
                [[phase, Complex::zero()], [Complex::zero(), phase]]
            }
        }
    }

    pub fn inverse(&self) -> Self {
        match *self {
            SingleQubitGate::Phase(theta) => SingleQubitGate::Phase(-theta),
            SingleQubitGate::GlobalPhase(theta) => SingleQubitGate::GlobalPhase(-theta),
            self_inverse => self_inverse,
        }
    }

    fn symbol(&self) -> String {
        match self {
            SingleQubitGate::Hadamard => "H".to_string(),
            SingleQubitGate::PauliX => "X".to_string(),
            SingleQubitGate::PauliZ => "Z".to_string(),
            SingleQubitGate::Phase(theta) => format!("P({:.4})", theta),
            SingleQubitGate::GlobalPhase(theta) => format!("GPhase({:.4})", theta),
        }
    }
}

/// A gate with explicit target and control qubits.
///
/// A gate applies only on basis states where every control qubit reads 1.
/// An empty control list means the gate is unconditional.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// A single-qubit unitary on `target`.
    Unitary {
        gate: SingleQubitGate,
        target: QubitId,
        controls: Vec<QubitId>,
    },
    /// Flips `target` when all `controls` are 1. Computes a logical AND of
    /// the controls into `target`.
    MultiControlledX {
        controls: Vec<QubitId>,
        target: QubitId,
    },
    /// Multiplies by `e^(iθ)` the basis states where all `controls` and
    /// `target` are 1. Symmetric in its qubits; `target` is only a label.
    ControlledPhase {
        controls: Vec<QubitId>,
        target: QubitId,
        theta: f64,
    },
    /// Quantum Fourier transform over `qubits` (`qubits[j]` carries weight
    /// `2^j`), or its inverse.
    Fourier {
        qubits: Vec<QubitId>,
        inverse: bool,
        controls: Vec<QubitId>,
    },
}

impl Gate {
    /// Unconditional single-qubit gate.
    pub fn single(gate: SingleQubitGate, target: QubitId) -> Self {
        Gate::Unitary { gate, target, controls: Vec::new() }
    }

    pub fn h(target: QubitId) -> Self {
        Self::single(SingleQubitGate::Hadamard, target)
    }

    pub fn x(target: QubitId) -> Self {
        Self::single(SingleQubitGate::PauliX, target)
    }

    pub fn z(target: QubitId) -> Self {
        Self::single(SingleQubitGate::PauliZ, target)
    }

    pub fn mcx(controls: Vec<QubitId>, target: QubitId) -> Self {
        Gate::MultiControlledX { controls, target }
    }

    /// The exact inverse. Applying `g` then `g.inverse()` is the identity.
    pub fn inverse(&self) -> Self {
        match self {
            Gate::Unitary { gate, target, controls } => Gate::Unitary {
                gate: gate.inverse(),
                target: *target,
                controls: controls.clone(),
            },
            Gate::MultiControlledX { .. } => self.clone(),
            Gate::ControlledPhase { controls, target, theta } => Gate::ControlledPhase {
                controls: controls.clone(),
                target: *target,
                theta: -theta,
            },
            Gate::Fourier { qubits, inverse, controls } => Gate::Fourier {
                qubits: qubits.clone(),
                inverse: !inverse,
                controls: controls.clone(),
            },
        }
    }

    /// The same gate with `control` added to its control list.
    pub fn controlled_by(&self, control: QubitId) -> Self {
        let mut gate = self.clone();
        match &mut gate {
            Gate::Unitary { controls, .. }
            | Gate::MultiControlledX { controls, .. }
            | Gate::ControlledPhase { controls, .. }
            | Gate::Fourier { controls, .. } => controls.push(control),
        }
        gate
    }

    /// The control qubits of the gate.
    pub fn controls(&self) -> &[QubitId] {
        match self {
            Gate::Unitary { controls, .. }
            | Gate::MultiControlledX { controls, .. }
            | Gate::ControlledPhase { controls, .. }
            | Gate::Fourier { controls, .. } => controls,
        }
    }

    /// The qubits the gate acts on, excluding controls.
    pub fn targets(&self) -> Vec<QubitId> {
        match self {
            Gate::Unitary { target, .. }
            | Gate::MultiControlledX { target, .. }
            | Gate::ControlledPhase { target, .. } => vec![*target],
            Gate::Fourier { qubits, .. } => qubits.clone(),
        }
    }

    /// Every qubit mentioned by the gate, controls first.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        let mut qubits = self.controls().to_vec();
        qubits.extend(self.targets());
        qubits
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Gate::Unitary { gate, .. } => gate.symbol(),
            Gate::MultiControlledX { .. } => "X".to_string(),
            Gate::ControlledPhase { theta, .. } => format!("P({:.4})", theta),
            Gate::Fourier { inverse: false, .. } => "QFT".to_string(),
            Gate::Fourier { inverse: true, .. } => "QFT†".to_string(),
        };
        write!(f, "{}", symbol)?;
        let targets: Vec<String> = self.targets().iter().map(|q| q.to_string()).collect();
        write!(f, " {}", targets.join(","))?;
        if !self.controls().is_empty() {
            let controls: Vec<String> = self.controls().iter().map(|q| q.to_string()).collect();
            write!(f, " ctrl[{}]", controls.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(i: usize) -> QubitId {
        QubitId(i)
    }

    #[test]
    fn inverse_negates_angles_and_flips_fourier_direction() {
        let cp = Gate::ControlledPhase { controls: vec![q(0)], target: q(1), theta: 0.3 };
        assert_eq!(cp.inverse(), Gate::ControlledPhase { controls: vec![q(0)], target: q(1), theta: -0.3 });

        let qft = Gate::Fourier { qubits: vec![q(0), q(1)], inverse: false, controls: vec![] };
        assert!(matches!(qft.inverse(), Gate::Fourier { inverse: true, .. }));

        let x = Gate::x(q(2));
        assert_eq!(x.inverse(), x);
        assert_eq!(
            Gate::single(SingleQubitGate::GlobalPhase(1.0), q(0)).inverse(),
            Gate::single(SingleQubitGate::GlobalPhase(-1.0), q(0))
        );
    }

    #[test]
    fn controlled_by_appends_control() {
        let g = Gate::mcx(vec![q(0), q(1)], q(2)).controlled_by(q(5));
        assert_eq!(g.controls(), &[q(0), q(1), q(5)]);
        assert_eq!(g.involved_qubits(), vec![q(0), q(1), q(5), q(2)]);
        assert_eq!(g.to_string(), "X q(2) ctrl[q(0),q(1),q(5)]");
    }

    #[test]
    fn matrices_are_unitary() {
        let gates = [
            SingleQubitGate::Hadamard,
            SingleQubitGate::PauliX,
            SingleQubitGate::PauliZ,
            SingleQubitGate::Phase(0.7),
            SingleQubitGate::GlobalPhase(-1.2),
        ];
        for gate in gates {
            let m = gate.matrix();
            for r in 0..2 {
                for c in 0..2 {
                    // (M M†)[r][c]
                    let entry = m[r][0] * m[c][0].conj() + m[r][1] * m[c][1].conj();
                    let expected = if r == c { 1.0 } else { 0.0 };
                    assert!((entry - Complex::new(expected, 0.0)).norm() < 1e-12, "{:?} not unitary", gate);
                }
            }
        }
    }
}
