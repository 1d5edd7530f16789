use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::seq::FrequencyGrid;
use crate::verb::spreading::BeamSpread;
use crate::{Point, Vector};

/// Origin id a tracer passes when it does not distinguish source from
/// receiver rays. Collisions tagged this way cannot take part in
/// bistatic pairing and are discarded.
pub const UNSPECIFIED_ORIGIN: u32 = 999;

/// Which platform a traced ray was launched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayOrigin {
    Source,
    Receiver,
}

/// Which boundary a collision was recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryField {
    /// Sea surface, hit from below.
    Surface,
    /// Sea floor, hit from above.
    Bottom,
    /// A volume scattering layer, identified by layer index.
    Volume(u16),
}

/// A Gaussian-beam footprint recorded at one ray/boundary collision.
///
/// Created once when a collision notification is accepted, then never
/// mutated; the store only hands out shared references.
#[derive(Debug, Clone)]
pub struct Eigenverb {
    /// Origin id from the collision notification.
    pub origin_id: u32,
    /// D/E (elevation) angle index in the launch fan.
    pub de: usize,
    /// AZ (azimuth) angle index in the launch fan.
    pub az: usize,
    /// Offset time to impact the boundary (s).
    pub time: f64,
    /// Grazing angle at the point of impact (rad).
    pub grazing: f64,
    /// Sound speed at the point of impact (m/s).
    pub speed: f64,
    /// Frequency axis shared by all eigenverbs of one run.
    pub frequencies: Arc<FrequencyGrid>,
    /// One-way transmission loss per grid frequency (dB).
    pub loss: Vec<f64>,
    /// Location of the impact.
    pub position: Point,
    /// Unit normal of the boundary at the impact.
    pub direction: Vector,
    /// Footprint extent from the spreading model.
    pub spread: BeamSpread,
}

impl Eigenverb {
    /// Checks the record invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.time.is_finite() || self.time < 0.0 {
            bail!("impact time must be finite and >= 0, got {}", self.time);
        }
        if !self.grazing.is_finite() || self.grazing.abs() > FRAC_PI_2 {
            bail!("grazing angle out of [-pi/2, pi/2]: {}", self.grazing);
        }
        if !(self.speed > 0.0) || !self.speed.is_finite() {
            bail!("sound speed must be positive, got {}", self.speed);
        }
        if self.loss.len() != self.frequencies.len() {
            bail!(
                "loss vector length {} does not match frequency grid length {}",
                self.loss.len(),
                self.frequencies.len()
            );
        }
        if self.loss.iter().any(|l| !l.is_finite() || *l < 0.0) {
            bail!("transmission loss must be finite and non-negative");
        }
        if !self.position.is_finite() || !self.direction.is_finite() {
            bail!("non-finite collision geometry");
        }
        if !(self.spread.time_sigma > 0.0) || !(self.spread.range_sigma > 0.0) {
            bail!("beam sigmas must be strictly positive");
        }
        Ok(())
    }

    /// Along-range footprint sigma in meters.
    pub fn length_sigma(&self) -> f64 {
        self.spread.time_sigma * self.speed
    }

    /// Radius of the footprint's spatial influence: the larger of the
    /// along-range and cross-range sigmas.
    pub fn footprint_radius(&self) -> f64 {
        self.length_sigma().max(self.spread.range_sigma)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a valid eigenverb for tests; callers tweak fields afterwards.
    pub(crate) fn sample_verb(frequencies: Arc<FrequencyGrid>) -> Eigenverb {
        let n = frequencies.len();
        Eigenverb {
            origin_id: 1,
            de: 10,
            az: 20,
            time: 2.5,
            grazing: 0.5,
            speed: 1500.0,
            frequencies,
            loss: vec![1.0; n],
            position: Point::new(100.0, 200.0, -3000.0),
            direction: Vector::new(0.0, 0.0, 1.0),
            spread: BeamSpread {
                time_sigma: 0.05,
                range_sigma: 40.0,
            },
        }
    }

    fn grid() -> Arc<FrequencyGrid> {
        Arc::new(FrequencyGrid::linear(100.0, 100.0, 4))
    }

    #[test]
    fn test_valid_record() {
        assert!(sample_verb(grid()).validate().is_ok());
    }

    #[test]
    fn test_negative_time_rejected() {
        let mut v = sample_verb(grid());
        v.time = -0.1;
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_grazing_out_of_range_rejected() {
        let mut v = sample_verb(grid());
        v.grazing = 2.0;
        assert!(v.validate().is_err());
        v.grazing = -2.0;
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_loss_length_mismatch_rejected() {
        let mut v = sample_verb(grid());
        v.loss.pop();
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_negative_loss_rejected() {
        let mut v = sample_verb(grid());
        v.loss[0] = -1.0;
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_zero_sigma_rejected() {
        let mut v = sample_verb(grid());
        v.spread.time_sigma = 0.0;
        assert!(v.validate().is_err());
    }

    #[test]
    fn test_length_sigma() {
        let v = sample_verb(grid());
        assert!((v.length_sigma() - 75.0).abs() < 1e-10);
        assert!((v.footprint_radius() - 75.0).abs() < 1e-10);
    }
}
