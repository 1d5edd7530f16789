use anyhow::{Result, bail};

/// A frequency axis in Hz, ordered ascending.
///
/// One grid is built per run and shared (via `Arc`) by every eigenverb,
/// so per-frequency transmission loss vectors can always be matched
/// against it by index.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyGrid {
    values: Vec<f64>,
}

impl FrequencyGrid {
    /// Evenly spaced grid: `first`, `first + step`, ... (`count` values).
    pub fn linear(first: f64, step: f64, count: usize) -> Self {
        let values = (0..count).map(|i| first + step * i as f64).collect();
        Self { values }
    }

    /// Logarithmically spaced grid: `first`, `first * ratio`, ... (`count` values).
    pub fn log(first: f64, ratio: f64, count: usize) -> Self {
        let mut values = Vec::with_capacity(count);
        let mut f = first;
        for _ in 0..count {
            values.push(f);
            f *= ratio;
        }
        Self { values }
    }

    /// Builds a grid from explicit values.
    ///
    /// Values must be non-negative, finite and strictly ascending.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            bail!("frequency grid must not be empty");
        }
        for w in values.windows(2) {
            if w[1] <= w[0] {
                bail!("frequency grid must be strictly ascending");
            }
        }
        if values.iter().any(|f| !f.is_finite() || *f < 0.0) {
            bail!("frequency grid values must be finite and non-negative");
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }
}
