//! Core NBAR processing modules

pub mod brdf;
pub mod cfactor;
pub mod indices;
pub mod kernels;
pub mod preprocess;
pub mod solar;
pub mod view_geometry;

// Re-export main types
pub use brdf::BrdfCorrector;
pub use cfactor::{coefficients_for, BandCoefficients};
pub use indices::{compute_index, scene_mean, VegetationIndex};
pub use kernels::KernelImages;
pub use solar::SolarGeometry;
pub use view_geometry::{Corners, ViewGeometry};
