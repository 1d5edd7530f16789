use serde::{Deserialize, Serialize};

use crate::verb::eigenverb::BoundaryField;

/// Configuration for one reverberation engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Origin id identifying rays launched from the source.
    pub source_id: u32,
    /// Origin id identifying rays launched from the receiver.
    pub receiver_id: u32,

    /// Track collisions with the sea surface.
    pub track_surface: bool,
    /// Track collisions with the sea floor.
    pub track_bottom: bool,
    /// Number of tracked volume scattering layers (0 disables volume
    /// reverberation).
    pub volume_layers: u16,

    /// Angular spacing between adjacent D/E launch angles (rad).
    pub de_spacing: f64,
    /// Angular spacing between adjacent AZ launch angles (rad).
    pub az_spacing: f64,

    /// Width of one reverberation time bin (s).
    pub time_resolution: f64,
    /// Length of the observation window (s).
    pub max_time: f64,

    /// Smallest sigma (m) used in the Gaussian overlap integral.
    pub sigma_floor: f64,
    /// Pair acceptance distance, in units of the summed footprint radii.
    /// Pairs farther apart than `overlap_range_scale * (r_s + r_r)`
    /// contribute nothing.
    pub overlap_range_scale: f64,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            source_id: 1,
            receiver_id: 2,
            track_surface: true,
            track_bottom: true,
            volume_layers: 0,
            de_spacing: 1.0_f64.to_radians(),
            az_spacing: 1.0_f64.to_radians(),
            time_resolution: 0.1,
            max_time: 60.0,
            sigma_floor: 1e-6,
            overlap_range_scale: 3.0,
        }
    }

    /// Boundaries tracked for this run, surface first.
    pub fn tracked_boundaries(&self) -> Vec<BoundaryField> {
        let mut boundaries = Vec::new();
        if self.track_surface {
            boundaries.push(BoundaryField::Surface);
        }
        if self.track_bottom {
            boundaries.push(BoundaryField::Bottom);
        }
        for layer in 0..self.volume_layers {
            boundaries.push(BoundaryField::Volume(layer));
        }
        boundaries
    }

    pub fn tracks(&self, boundary: BoundaryField) -> bool {
        match boundary {
            BoundaryField::Surface => self.track_surface,
            BoundaryField::Bottom => self.track_bottom,
            BoundaryField::Volume(layer) => layer < self.volume_layers,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
