pub mod geom;
pub mod ocean;
pub mod seq;
pub mod verb;

// Prelude
pub use geom::point::Point;
pub use geom::vector::Vector;
pub use ocean::attenuation::{AttenuationConstant, AttenuationModel, AttenuationThorp};
pub use ocean::scattering::{LambertScattering, ScatteringModel, UnitScattering};
pub use seq::FrequencyGrid;
pub use verb::config::EngineConfig;
pub use verb::curve::ReverberationCurve;
pub use verb::eigenverb::{BoundaryField, Eigenverb, RayOrigin, UNSPECIFIED_ORIGIN};
pub use verb::engine::{Collision, ReverberationEngine};
pub use verb::spreading::{BeamSpread, GaussianSpreading, RayGeometry, SpreadingModel};
pub use verb::store::EigenverbStore;
