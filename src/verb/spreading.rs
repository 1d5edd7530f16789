use anyhow::{Result, bail};

/// Local ray-tube geometry at a boundary collision.
///
/// The tube cross-section is spanned by the angular spacing to the
/// neighboring rays in the launch fan (D/E and AZ), stretched by the
/// path length traveled so far.
#[derive(Debug, Clone, Copy)]
pub struct RayGeometry {
    /// Angular spacing between adjacent D/E (elevation) launch angles (rad).
    pub de_spacing: f64,
    /// Angular spacing between adjacent AZ (azimuth) launch angles (rad).
    pub az_spacing: f64,
    /// Path length from launch to the collision point (m).
    pub path_length: f64,
    /// Sound speed at the collision point (m/s).
    pub sound_speed: f64,
}

/// Gaussian beam extent at a boundary collision.
#[derive(Debug, Clone, Copy)]
pub struct BeamSpread {
    /// Standard deviation of the footprint along the propagation
    /// direction, expressed as travel time (s).
    pub time_sigma: f64,
    /// Standard deviation of the footprint across the propagation
    /// direction (m).
    pub range_sigma: f64,
}

/// Defines how a ray tube spreads into a Gaussian boundary footprint.
///
/// Implementations depend on local ray-tube geometry only; both sigmas
/// are strictly positive.
pub trait SpreadingModel: Send + Sync {
    fn spreading(&self, grazing: f64, geometry: &RayGeometry) -> Result<BeamSpread>;
}

/// Minimum grazing-angle sine used to bound the along-range stretch of
/// a footprint at near-horizontal incidence.
const MIN_SIN_GRAZING: f64 = 1e-3;

/// Minimum sigma returned by [`GaussianSpreading`], in meters (and,
/// divided by sound speed, in seconds).
const MIN_SIGMA: f64 = 1e-6;

/// Gaussian beam spreading from the ray-tube width at the collision.
///
/// The cross-range sigma is the azimuthal tube width `L * az_spacing`.
/// The along-range extent is the elevation tube width `L * de_spacing`
/// projected onto the boundary by `1 / sin(grazing)`, then converted to
/// travel time.
pub struct GaussianSpreading;

impl SpreadingModel for GaussianSpreading {
    fn spreading(&self, grazing: f64, geometry: &RayGeometry) -> Result<BeamSpread> {
        if !grazing.is_finite() {
            bail!("non-finite grazing angle");
        }
        if !geometry.path_length.is_finite() || geometry.path_length < 0.0 {
            bail!("invalid path length: {}", geometry.path_length);
        }
        if !(geometry.sound_speed > 0.0) || !geometry.sound_speed.is_finite() {
            bail!("invalid sound speed: {}", geometry.sound_speed);
        }
        if geometry.de_spacing <= 0.0 || geometry.az_spacing <= 0.0 {
            bail!("ray fan spacings must be positive");
        }

        let sin_grazing = grazing.sin().abs().max(MIN_SIN_GRAZING);
        let along_range = (geometry.path_length * geometry.de_spacing / sin_grazing).max(MIN_SIGMA);
        let cross_range = (geometry.path_length * geometry.az_spacing).max(MIN_SIGMA);

        Ok(BeamSpread {
            time_sigma: along_range / geometry.sound_speed,
            range_sigma: cross_range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn geometry(path_length: f64) -> RayGeometry {
        RayGeometry {
            de_spacing: 1.0_f64.to_radians(),
            az_spacing: 1.0_f64.to_radians(),
            path_length,
            sound_speed: 1500.0,
        }
    }

    #[test]
    fn test_sigmas_positive() {
        let model = GaussianSpreading;
        let spread = model.spreading(PI / 4.0, &geometry(3000.0)).unwrap();
        assert!(spread.time_sigma > 0.0);
        assert!(spread.range_sigma > 0.0);
    }

    #[test]
    fn test_normal_incidence() {
        // At 90 degrees grazing the footprint is just the tube width.
        let model = GaussianSpreading;
        let geom = geometry(3000.0);
        let spread = model.spreading(PI / 2.0, &geom).unwrap();
        let tube_width = 3000.0 * geom.de_spacing;
        assert!((spread.time_sigma * geom.sound_speed - tube_width).abs() < 1e-9);
        assert!((spread.range_sigma - 3000.0 * geom.az_spacing).abs() < 1e-9);
    }

    #[test]
    fn test_shallow_grazing_stretches_footprint() {
        let model = GaussianSpreading;
        let steep = model.spreading(PI / 2.0, &geometry(3000.0)).unwrap();
        let shallow = model.spreading(0.1, &geometry(3000.0)).unwrap();
        assert!(shallow.time_sigma > steep.time_sigma);
    }

    #[test]
    fn test_zero_grazing_is_clamped() {
        let model = GaussianSpreading;
        let spread = model.spreading(0.0, &geometry(3000.0)).unwrap();
        assert!(spread.time_sigma.is_finite());
        assert!(spread.time_sigma > 0.0);
    }

    #[test]
    fn test_zero_path_length_gives_floor_sigmas() {
        let model = GaussianSpreading;
        let geom = geometry(0.0);
        let spread = model.spreading(PI / 4.0, &geom).unwrap();
        assert!(spread.range_sigma > 0.0);
        assert!(spread.time_sigma > 0.0);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let model = GaussianSpreading;
        let mut geom = geometry(1000.0);
        geom.sound_speed = 0.0;
        assert!(model.spreading(PI / 4.0, &geom).is_err());
        let mut geom = geometry(1000.0);
        geom.path_length = f64::NAN;
        assert!(model.spreading(PI / 4.0, &geom).is_err());
    }
}
