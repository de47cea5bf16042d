//! nbar: Nadir BRDF-Adjusted Reflectance correction for Landsat
//!
//! This library normalizes Landsat surface reflectance for view-angle and
//! solar-angle anisotropy with the c-factor method of Roy et al. (2016):
//! satellite view geometry is reconstructed from the scene footprint, solar
//! position is computed per pixel from the acquisition time, Ross-Thick and
//! Li-Thin kernels model reflectance at the actual and at a fixed reference
//! geometry, and their ratio rescales each band. Cloud screening, reflectance
//! scaling and the NDVI/NIRv vegetation indices used for time-series work
//! are included alongside.

pub mod core;
pub mod io;
pub mod types;

// Re-export main types and functions for easier access
pub use types::{
    Band, BandImage, BoundingBox, Footprint, GeoTransform, NbarError, NbarResult, Reflectance,
    Scene,
};

pub use self::core::{
    coefficients_for, compute_index, scene_mean, BandCoefficients, BrdfCorrector, VegetationIndex,
};

pub use io::SceneReader;
