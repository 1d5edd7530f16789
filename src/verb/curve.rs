use serde::Serialize;

/// Floor applied when converting linear power to dB, so that empty
/// cells stay finite.
pub const DB_FLOOR: f64 = -300.0;

/// Reverberation level over time and frequency.
///
/// Cells accumulate scattered energy in linear power; multiple
/// contributions landing in the same (time bin, frequency) cell sum
/// linearly. Conversion to dB happens only on readout.
#[derive(Debug, Clone, Serialize)]
pub struct ReverberationCurve {
    /// Time bin width (s).
    time_resolution: f64,
    /// Linear power per cell: `cells[bin][freq]`.
    cells: Vec<Vec<f64>>,
    num_freqs: usize,
}

impl ReverberationCurve {
    /// Creates an all-zero curve covering `[0, max_time)` with the given
    /// bin width and number of frequencies.
    pub fn new(time_resolution: f64, max_time: f64, num_freqs: usize) -> Self {
        let num_bins = (max_time / time_resolution).ceil() as usize;
        Self {
            time_resolution,
            cells: vec![vec![0.0; num_freqs]; num_bins],
            num_freqs,
        }
    }

    /// Adds per-frequency linear power at the bin containing `time`.
    /// Contributions beyond the last bin are dropped.
    pub fn add_energy(&mut self, time: f64, energy: &[f64]) {
        debug_assert_eq!(energy.len(), self.num_freqs);
        if time < 0.0 {
            return;
        }
        let bin = (time / self.time_resolution) as usize;
        if let Some(cell) = self.cells.get_mut(bin) {
            for (c, e) in cell.iter_mut().zip(energy.iter()) {
                *c += e;
            }
        }
    }

    pub fn num_bins(&self) -> usize {
        self.cells.len()
    }

    pub fn num_freqs(&self) -> usize {
        self.num_freqs
    }

    pub fn time_resolution(&self) -> f64 {
        self.time_resolution
    }

    /// Linear power in one cell.
    pub fn intensity(&self, bin: usize, freq: usize) -> f64 {
        self.cells[bin][freq]
    }

    /// Linear power cells, `cells[bin][freq]`.
    pub fn cells(&self) -> &[Vec<f64>] {
        &self.cells
    }

    /// Start time of each bin (s).
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.cells.len())
            .map(|i| i as f64 * self.time_resolution)
            .collect()
    }

    /// Total linear power across all cells.
    pub fn total_energy(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Curve in dB re unit intensity, floored at [`DB_FLOOR`].
    pub fn to_db(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|cell| {
                cell.iter()
                    .map(|&p| {
                        if p > 0.0 {
                            (10.0 * p.log10()).max(DB_FLOOR)
                        } else {
                            DB_FLOOR
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// True if every cell holds a finite value.
    pub fn is_finite(&self) -> bool {
        self.cells.iter().flatten().all(|p| p.is_finite())
    }

    /// Sums another curve of identical shape into this one.
    pub fn merge(&mut self, other: &ReverberationCurve) {
        debug_assert_eq!(self.cells.len(), other.cells.len());
        debug_assert_eq!(self.num_freqs, other.num_freqs);
        for (mine, theirs) in self.cells.iter_mut().zip(other.cells.iter()) {
            for (c, e) in mine.iter_mut().zip(theirs.iter()) {
                *c += e;
            }
        }
    }
}
