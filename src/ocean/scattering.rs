/// Defines the scattering strength of a boundary.
///
/// The returned value is a linear power ratio (not dB): the fraction of
/// incident energy scattered from the incident grazing angle toward the
/// scattered grazing angle at the given frequency.
pub trait ScatteringModel: Send + Sync {
    fn strength(&self, grazing_in: f64, grazing_out: f64, frequency: f64) -> f64;
}

/// Lambert's rule for diffuse boundary scattering.
///
/// `sigma = 10^(mu/10) * sin(grazing_in) * sin(grazing_out)`,
/// frequency independent. Mackenzie's measured coefficient of -27 dB
/// is the usual choice for the sea floor.
pub struct LambertScattering {
    /// Scattering coefficient mu in dB.
    pub mu: f64,
}

impl LambertScattering {
    pub fn new(mu: f64) -> Self {
        Self { mu }
    }
}

impl Default for LambertScattering {
    fn default() -> Self {
        Self::new(-27.0)
    }
}

impl ScatteringModel for LambertScattering {
    fn strength(&self, grazing_in: f64, grazing_out: f64, _frequency: f64) -> f64 {
        let mu = 10.0_f64.powf(self.mu / 10.0);
        mu * grazing_in.sin().abs() * grazing_out.sin().abs()
    }
}

/// Unit scattering strength regardless of geometry.
///
/// Mainly useful in tests, where it makes the reverberation curve equal
/// the raw Gaussian overlap contributions.
pub struct UnitScattering;

impl ScatteringModel for UnitScattering {
    fn strength(&self, _grazing_in: f64, _grazing_out: f64, _frequency: f64) -> f64 {
        1.0
    }
}
