// src/simulation/sampling.rs

//! Repeated measurement ("shots") of a probability distribution.
//!
//! Shots are split into fixed-size chunks. Every chunk draws from its own
//! PRNG, seeded from the run seed and the chunk index, and counts into its
//! own histogram; histograms are merged once all chunks finish. The result
//! therefore does not depend on how rayon schedules the chunks.

use super::results::MeasurementOutcome;
use crate::core::{QsatError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::debug;

/// Draws `shots` independent samples from `probabilities`.
///
/// `probabilities[v]` is the weight of register value `v`; weights are
/// renormalized, so a distribution carrying rounding error is accepted.
///
/// # Errors
/// `SimulationError` if the weights do not sum to a positive finite value.
pub(crate) fn sample_shots(
    probabilities: &[f64],
    width: usize,
    shots: usize,
    chunk_size: usize,
    seed: u64,
) -> Result<MeasurementOutcome> {
    let cumulative: Vec<f64> = probabilities
        .iter()
        .scan(0.0, |acc, p| {
            *acc += p.max(0.0);
            Some(*acc)
        })
        .collect();
    let total = cumulative.last().copied().unwrap_or(0.0);
    if !total.is_finite() || total <= 0.0 {
        return Err(QsatError::SimulationError {
            message: format!("Cannot sample from a distribution of total weight {}", total),
        });
    }

    let chunk_size = chunk_size.max(1);
    let num_chunks = shots.div_ceil(chunk_size);
    debug!(shots, num_chunks, "sampling measurement outcomes");

    let outcome = (0..num_chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = StdRng::seed_from_u64(chunk_seed(seed, chunk));
            let chunk_shots = chunk_size.min(shots - chunk * chunk_size);
            let mut local = MeasurementOutcome::new(width);
            for _ in 0..chunk_shots {
                let draw = rng.random::<f64>() * total;
                local.record(select(&cumulative, draw), 1);
            }
            local
        })
        .reduce(|| MeasurementOutcome::new(width), MeasurementOutcome::merge);

    Ok(outcome)
}

/// Index of the first cumulative weight strictly above `draw`.
fn select(cumulative: &[f64], draw: f64) -> usize {
    let index = cumulative.partition_point(|c| *c <= draw);
    // `draw` can land on the total through rounding; fall back to the last
    // value that carries weight.
    if index < cumulative.len() {
        index
    } else {
        last_weighted(cumulative)
    }
}

fn last_weighted(cumulative: &[f64]) -> usize {
    let total = cumulative.last().copied().unwrap_or(0.0);
    cumulative.iter().position(|c| *c >= total).unwrap_or(0)
}

/// Decorrelates chunk seeds (SplitMix64 finalizer).
fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    let mut z = seed.wrapping_add((chunk as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_mass_is_always_observed() -> Result<()> {
        let outcome = sample_shots(&[0.0, 0.0, 1.0, 0.0], 2, 1000, 64, 7)?;
        assert_eq!(outcome.shots(), 1000);
        assert_eq!(outcome.count(2), 1000);
        Ok(())
    }

    #[test]
    fn same_seed_same_histogram_regardless_of_chunking_order() -> Result<()> {
        let probabilities = [0.1, 0.2, 0.3, 0.4];
        let a = sample_shots(&probabilities, 2, 5000, 100, 42)?;
        let b = sample_shots(&probabilities, 2, 5000, 100, 42)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn frequencies_track_probabilities() -> Result<()> {
        let probabilities = [0.5, 0.0, 0.25, 0.25];
        let outcome = sample_shots(&probabilities, 2, 20_000, 256, 3)?;
        assert_eq!(outcome.count(1), 0);
        for (value, p) in probabilities.iter().enumerate() {
            assert!((outcome.frequency(value) - p).abs() < 0.02, "value {} drifted", value);
        }
        Ok(())
    }

    #[test]
    fn zero_weight_distribution_is_rejected() {
        assert!(sample_shots(&[0.0, 0.0], 1, 10, 4, 0).is_err());
    }

    #[test]
    fn select_skips_zero_weight_tail() {
        let cumulative = [0.5, 1.0, 1.0];
        assert_eq!(select(&cumulative, 0.2), 0);
        assert_eq!(select(&cumulative, 0.5), 1);
        assert_eq!(select(&cumulative, 1.0), 1);
    }
}
