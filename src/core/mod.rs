// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod register;
pub mod state;

// Re-export public types for convenient access via `qsat::core::TypeName`
pub use error::{QsatError, QubitId, Result};
pub use register::{Register, RegisterKind, RegisterLayout};
pub use state::QuantumState;

pub mod constants;
pub use constants::qsat_constants::PI;
