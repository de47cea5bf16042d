use crate::core::cfactor::{adjust_band, coefficients_for};
use crate::core::kernels::compute_kernels;
use crate::core::solar::{reference_sun_zenith, solar_position};
use crate::core::view_geometry::{compute_view_angles, find_corners};
use crate::types::{Band, NbarResult, Scene};
use rayon::prelude::*;

/// BRDF correction processor.
///
/// Normalizes the six Landsat reflectance bands of a scene to nadir-view,
/// reference-sun geometry with the c-factor method (Roy et al. 2016).
/// `correct` is a pure function of its input scene: angular and kernel fields
/// are derived, used and discarded, and auxiliary bands pass through
/// untouched.
pub struct BrdfCorrector;

impl BrdfCorrector {
    pub fn new() -> Self {
        Self
    }

    /// Correct one scene, returning a new scene with the same band set
    pub fn correct(&self, scene: &Scene) -> NbarResult<Scene> {
        log::info!(
            "BRDF correction for scene {} acquired {}",
            scene.scene_id,
            scene.acquired
        );
        let (rows, cols) = scene.shape();
        log::debug!("scene dimensions: {} x {}", rows, cols);

        let corners = find_corners(&scene.footprint)?;
        log::debug!("footprint corners: {:?}", corners);

        let (lon, lat) = scene.geo_transform.lon_lat_grids(scene.shape());

        let view = compute_view_angles(&corners, &lon, &lat);
        log::debug!("view azimuth: {:.6} rad", view.view_azimuth);

        let solar = solar_position(&scene.acquired, &lon, &lat)?;

        let sun_zenith_ref = reference_sun_zenith(scene.footprint.envelope().center_latitude());
        log::debug!("reference solar zenith: {:.6} rad", sun_zenith_ref);

        let relative_az = solar.sun_azimuth.mapv(|az| az - view.view_azimuth);
        let kernels = compute_kernels(
            &solar.sun_zenith,
            &view.view_zenith,
            &relative_az,
            sun_zenith_ref,
        );

        let mut corrected = scene.clone();
        let mut adjusted_bands = 0usize;
        for name in scene.band_names().to_vec() {
            let Some(band) = Band::from_name(&name) else {
                // No kernel weights defined: auxiliary bands pass through
                continue;
            };
            let coefficients = coefficients_for(band);
            let data = adjust_band(scene.band(&name)?, &coefficients, &kernels);
            corrected.add_band(name, data)?;
            adjusted_bands += 1;
        }

        log::info!(
            "BRDF correction completed for scene {} ({} bands adjusted)",
            scene.scene_id,
            adjusted_bands
        );
        Ok(corrected)
    }

    /// Correct independent scenes in parallel; result order matches input
    /// order
    pub fn correct_all(&self, scenes: &[Scene]) -> Vec<NbarResult<Scene>> {
        log::info!("BRDF correction for {} scenes", scenes.len());
        scenes.par_iter().map(|scene| self.correct(scene)).collect()
    }
}

impl Default for BrdfCorrector {
    fn default() -> Self {
        Self::new()
    }
}
