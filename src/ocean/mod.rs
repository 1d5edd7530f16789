pub mod attenuation;
pub mod scattering;
