use std::sync::Arc;

use anyhow::{Result, bail};
use log::{debug, warn};
use rayon::prelude::*;

use crate::ocean::attenuation::AttenuationModel;
use crate::ocean::scattering::ScatteringModel;
use crate::seq::FrequencyGrid;
use crate::verb::config::EngineConfig;
use crate::verb::curve::ReverberationCurve;
use crate::verb::eigenverb::{BoundaryField, Eigenverb, RayOrigin, UNSPECIFIED_ORIGIN};
use crate::verb::grid::FootprintGrid;
use crate::verb::spreading::{RayGeometry, SpreadingModel};
use crate::verb::store::EigenverbStore;
use crate::{Point, Vector};

use std::f64::consts::{FRAC_PI_2, PI};

/// State of a single ray at the moment it strikes a boundary, as
/// reported by the wavefront tracer.
#[derive(Debug, Clone, Copy)]
pub struct Collision {
    /// Identifies the platform the ray was launched from
    /// ([`UNSPECIFIED_ORIGIN`] when the tracer does not classify rays).
    pub origin_id: u32,
    /// D/E (elevation) angle index.
    pub de: usize,
    /// AZ (azimuth) angle index.
    pub az: usize,
    /// Offset time to impact the boundary (s).
    pub time: f64,
    /// Grazing angle at the point of impact (rad).
    pub grazing: f64,
    /// Sound speed at the point of impact (m/s).
    pub speed: f64,
    /// Location at which the collision occurs.
    pub position: Point,
    /// Normalized boundary direction at the point of collision.
    pub direction: Vector,
}

impl Collision {
    pub fn new(
        de: usize,
        az: usize,
        time: f64,
        grazing: f64,
        speed: f64,
        position: Point,
        direction: Vector,
    ) -> Self {
        Self {
            origin_id: UNSPECIFIED_ORIGIN,
            de,
            az,
            time,
            grazing,
            speed,
            position,
            direction,
        }
    }

    pub fn with_origin(mut self, origin_id: u32) -> Self {
        self.origin_id = origin_id;
        self
    }
}

/// Bistatic eigenverb reverberation engine.
///
/// One engine instance is driven by one wavefront run: the tracer pushes
/// collision events in through the `notify_*` methods (notification
/// phase, `&mut self`), then the caller asks for the reverberation curve
/// once tracing is done (combination phase, `&self`). The borrow rules
/// keep the two phases from interleaving.
pub struct ReverberationEngine {
    config: EngineConfig,
    frequencies: Arc<FrequencyGrid>,
    spreading: Box<dyn SpreadingModel>,
    attenuation: Box<dyn AttenuationModel>,
    scattering: Box<dyn ScatteringModel>,
    store: EigenverbStore,
}

impl ReverberationEngine {
    pub fn new(
        config: EngineConfig,
        frequencies: Arc<FrequencyGrid>,
        spreading: Box<dyn SpreadingModel>,
        attenuation: Box<dyn AttenuationModel>,
        scattering: Box<dyn ScatteringModel>,
    ) -> Result<Self> {
        if frequencies.is_empty() {
            bail!("frequency grid must not be empty");
        }
        if !(config.time_resolution > 0.0) || !(config.max_time > 0.0) {
            bail!("time binning must be positive");
        }
        if config.source_id == config.receiver_id {
            bail!("source and receiver origin ids must differ");
        }
        if config.de_spacing <= 0.0 || config.az_spacing <= 0.0 {
            bail!("ray fan spacings must be positive");
        }
        Ok(Self {
            config,
            frequencies,
            spreading,
            attenuation,
            scattering,
            store: EigenverbStore::new(),
        })
    }

    /// Reacts to a ray colliding with the sea surface from below.
    ///
    /// Returns `true` when the collision was accepted and recorded.
    pub fn notify_upper_collision(&mut self, collision: &Collision) -> bool {
        self.notify(BoundaryField::Surface, collision)
    }

    /// Reacts to a ray colliding with the sea floor from above.
    pub fn notify_lower_collision(&mut self, collision: &Collision) -> bool {
        self.notify(BoundaryField::Bottom, collision)
    }

    /// Reacts to a ray crossing a volume scattering layer.
    pub fn notify_volume_collision(&mut self, layer: u16, collision: &Collision) -> bool {
        self.notify(BoundaryField::Volume(layer), collision)
    }

    fn notify(&mut self, boundary: BoundaryField, collision: &Collision) -> bool {
        if !self.config.tracks(boundary) {
            debug!("collision on untracked boundary {boundary:?} discarded");
            return false;
        }
        let origin = match self.classify_origin(collision.origin_id) {
            Some(origin) => origin,
            None => {
                debug!(
                    "collision with unclassified origin id {} discarded",
                    collision.origin_id
                );
                return false;
            }
        };
        if let Err(e) = validate_collision(collision) {
            debug!("malformed collision discarded: {e}");
            return false;
        }

        let distance = collision.time * collision.speed;
        let geometry = RayGeometry {
            de_spacing: self.config.de_spacing,
            az_spacing: self.config.az_spacing,
            path_length: distance,
            sound_speed: collision.speed,
        };
        let spread = match self.spreading.spreading(collision.grazing, &geometry) {
            Ok(spread) => spread,
            Err(e) => {
                warn!("spreading model failed for collision at de={}, az={}: {e}",
                    collision.de, collision.az);
                return false;
            }
        };
        let loss = match self
            .attenuation
            .attenuation(collision.position, &self.frequencies, distance)
        {
            Ok(loss) => loss,
            Err(e) => {
                warn!("attenuation model failed for collision at de={}, az={}: {e}",
                    collision.de, collision.az);
                return false;
            }
        };

        let verb = Eigenverb {
            origin_id: collision.origin_id,
            de: collision.de,
            az: collision.az,
            time: collision.time,
            grazing: collision.grazing,
            speed: collision.speed,
            frequencies: Arc::clone(&self.frequencies),
            loss,
            position: collision.position,
            direction: collision.direction,
            spread,
        };
        if let Err(e) = verb.validate() {
            warn!("eigenverb failed validation and was discarded: {e}");
            return false;
        }

        self.store.append(origin, boundary, verb);
        true
    }

    fn classify_origin(&self, origin_id: u32) -> Option<RayOrigin> {
        if origin_id == self.config.source_id {
            Some(RayOrigin::Source)
        } else if origin_id == self.config.receiver_id {
            Some(RayOrigin::Receiver)
        } else {
            None
        }
    }

    /// Pairs accumulated source and receiver eigenverbs per boundary and
    /// sums their scattered energy into a reverberation curve.
    ///
    /// The pairing runs over the full accumulated sets, so the result
    /// does not depend on the order collisions were notified in (up to
    /// floating-point tolerance). An engine that recorded nothing
    /// returns an all-zero curve of the configured shape.
    pub fn compute_reverberation(&self) -> ReverberationCurve {
        let mut curve = self.empty_curve();

        for boundary in self.config.tracked_boundaries() {
            let sources = self.store.slice(RayOrigin::Source, boundary);
            let receivers = self.store.slice(RayOrigin::Receiver, boundary);
            if sources.is_empty() || receivers.is_empty() {
                continue;
            }

            // Cell size covering the widest possible acceptance distance,
            // so a 3x3 cell search cannot miss a contributing pair.
            let max_reach = |verbs: &[Eigenverb]| {
                verbs
                    .iter()
                    .map(Eigenverb::footprint_radius)
                    .fold(0.0_f64, f64::max)
            };
            let step = self.config.overlap_range_scale * (max_reach(sources) + max_reach(receivers));
            let grid = FootprintGrid::new(receivers, step);

            let partial = sources
                .par_iter()
                .map(|s| {
                    let mut local = self.empty_curve();
                    for ri in grid.find_nearby(s.position) {
                        let r = &receivers[ri];
                        if let Some(energy) = self.pair_energy(s, r) {
                            local.add_energy(s.time + r.time, &energy);
                        }
                    }
                    local
                })
                .reduce(
                    || self.empty_curve(),
                    |mut a, b| {
                        a.merge(&b);
                        a
                    },
                );
            curve.merge(&partial);
        }

        debug_assert!(curve.is_finite());
        curve
    }

    /// Scattered energy of one source/receiver pair, per frequency, in
    /// linear power. `None` when the footprints do not overlap.
    fn pair_energy(&self, s: &Eigenverb, r: &Eigenverb) -> Option<Vec<f64>> {
        let scale = self.config.overlap_range_scale;
        let distance = s.position.horizontal_distance(&r.position);
        if distance > scale * (s.footprint_radius() + r.footprint_radius()) {
            return None;
        }

        let floor = self.config.sigma_floor;
        let sigma_x = (s.length_sigma().powi(2) + r.length_sigma().powi(2))
            .sqrt()
            .max(floor);
        let sigma_y = (s.spread.range_sigma.powi(2) + r.spread.range_sigma.powi(2))
            .sqrt()
            .max(floor);

        let dx = s.position.x - r.position.x;
        let dy = s.position.y - r.position.y;
        let overlap = (-0.5 * ((dx / sigma_x).powi(2) + (dy / sigma_y).powi(2))).exp()
            / (2.0 * PI * sigma_x * sigma_y);

        let energy = s
            .frequencies
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let two_way_db = s.loss[i] + r.loss[i];
                let transmitted = 10.0_f64.powf(-two_way_db / 10.0);
                let strength = self.scattering.strength(s.grazing, r.grazing, f);
                transmitted * strength * overlap
            })
            .collect();
        Some(energy)
    }

    fn empty_curve(&self) -> ReverberationCurve {
        ReverberationCurve::new(
            self.config.time_resolution,
            self.config.max_time,
            self.frequencies.len(),
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn frequencies(&self) -> &Arc<FrequencyGrid> {
        &self.frequencies
    }

    /// Eigenverbs accumulated so far.
    pub fn store(&self) -> &EigenverbStore {
        &self.store
    }

    /// Adopts eigenverbs accumulated by another worker's store.
    pub fn merge_store(&mut self, other: EigenverbStore) {
        self.store.merge(other);
    }

    /// Resets the engine for an independent run with the same models.
    pub fn clear(&mut self) {
        self.store.clear();
    }
}

fn validate_collision(c: &Collision) -> Result<()> {
    if !c.time.is_finite() || c.time < 0.0 {
        bail!("impact time must be finite and >= 0, got {}", c.time);
    }
    if !c.grazing.is_finite() || c.grazing.abs() > FRAC_PI_2 {
        bail!("grazing angle out of [-pi/2, pi/2]: {}", c.grazing);
    }
    if !(c.speed > 0.0) || !c.speed.is_finite() {
        bail!("sound speed must be positive, got {}", c.speed);
    }
    if !c.position.is_finite() {
        bail!("non-finite collision position");
    }
    if !c.direction.is_finite() || c.direction.normalize().is_none() {
        bail!("collision direction must be a nonzero finite vector");
    }
    Ok(())
}
