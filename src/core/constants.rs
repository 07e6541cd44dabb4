//! Numeric defaults shared by the counting, solving and readout stages.

/// Default values for the tunable parameters of a run.
pub mod qsat_constants {
    /// Used for phase angles (`e^(iθ)`)
    pub const PI: f64 = std::f64::consts::PI;
    /// Number of simulated measurement repetitions.
    pub const DEFAULT_SHOTS: usize = 1024;
    /// Largest register the simulator agrees to hold (2^24 amplitudes, 256 MiB).
    pub const DEFAULT_MAX_QUBITS: usize = 24;
    /// Hard ceiling on `max_qubits`; keeps every `2^n` well inside a machine word.
    pub const MAX_SUPPORTED_QUBITS: usize = 40;
    /// Diffusion strength reached by the last damped iteration.
    pub const DEFAULT_DAMPING_FLOOR: f64 = 0.5;
    /// Extra phase bits on top of `ceil(n / 2)`. Four keeps `N·π/2^t` below `N/8`.
    pub const PHASE_BITS_MARGIN: usize = 4;
    /// Shots drawn by one sampling task.
    pub const DEFAULT_SHOT_CHUNK_SIZE: usize = 256;
    /// Allowed deviation of the squared norm from 1.
    pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;
    /// Most padding variables the solver adds for dense formulas.
    pub const MAX_PADDING_VARIABLES: usize = 2;
}
