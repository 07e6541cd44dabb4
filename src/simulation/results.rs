// src/simulation/results.rs
use std::collections::BTreeMap;
use std::fmt;

/// Aggregated measurement counts over a register of `width` bits.
///
/// Keys are register values (`bit j` = `j`-th qubit of the measured register).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeasurementOutcome {
    width: usize,
    shots: usize,
    counts: BTreeMap<usize, usize>,
}

impl MeasurementOutcome {
    /// Creates an empty histogram. (Internal visibility)
    pub(crate) fn new(width: usize) -> Self {
        Self { width, shots: 0, counts: BTreeMap::new() }
    }

    /// Records `count` observations of `value`. (Internal visibility)
    pub(crate) fn record(&mut self, value: usize, count: usize) {
        if count == 0 {
            return;
        }
        *self.counts.entry(value).or_insert(0) += count;
        self.shots += count;
    }

    /// Folds another partial histogram into this one.
    pub(crate) fn merge(mut self, other: MeasurementOutcome) -> Self {
        for (value, count) in other.counts {
            self.record(value, count);
        }
        self
    }

    /// Number of measured bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of shots recorded.
    pub fn shots(&self) -> usize {
        self.shots
    }

    pub fn count(&self, value: usize) -> usize {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    /// Observed relative frequency of `value`, in `[0, 1]`.
    pub fn frequency(&self, value: usize) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.count(value) as f64 / self.shots as f64
    }

    /// All observed values with their counts, in ascending value order.
    pub fn counts(&self) -> &BTreeMap<usize, usize> {
        &self.counts
    }

    /// The most frequently observed value; ties go to the smaller value.
    pub fn most_frequent(&self) -> Option<usize> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(value, _)| *value)
    }

    /// Renders `value` as a bitstring, most significant bit first.
    pub fn bitstring(&self, value: usize) -> String {
        format!("{:0width$b}", value, width = self.width)
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement Results ({} shots):", self.shots)?;
        if self.counts.is_empty() {
            writeln!(f, "  No outcomes were recorded.")?;
        }
        for (value, count) in &self.counts {
            writeln!(f, "    |{}>: {} ({:.2}%)", self.bitstring(*value), count, 100.0 * self.frequency(*value))?;
        }
        Ok(())
    }
}
