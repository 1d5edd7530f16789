pub mod config;
pub mod curve;
pub mod eigenverb;
pub mod engine;
pub mod grid;
pub mod spreading;
pub mod store;
