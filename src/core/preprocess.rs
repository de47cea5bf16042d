use crate::types::{Band, NbarResult, Scene};
use ndarray::Zip;

/// Landsat Collection-2 Level-2 quality band name
pub const QA_BAND: &str = "QA_PIXEL";

/// QA_PIXEL bit flags used for clear-pixel screening
const CLOUD_SHADOW_BIT: u32 = 1 << 3;
const CLOUD_BIT: u32 = 1 << 5;

/// Collection-2 Level-2 surface reflectance scaling
pub const REFLECTANCE_SCALE: f64 = 2.75e-05;
pub const REFLECTANCE_OFFSET: f64 = -0.2;

/// Mask cloud and cloud-shadow pixels out of every reflectance band.
///
/// Any pixel whose QA_PIXEL value has the cloud (bit 5) or cloud-shadow
/// (bit 3) flag set becomes NaN in each of the six reflectance bands. The
/// QA band itself and other auxiliary bands are left as-is. A scene without
/// a QA_PIXEL band is an error; callers opt into the screening.
pub fn mask_clear_pixels(scene: &Scene) -> NbarResult<Scene> {
    let qa = scene.band(QA_BAND)?;
    log::debug!("screening scene {} with {}", scene.scene_id, QA_BAND);

    let mut masked = scene.clone();
    let mut flagged = 0usize;
    for band in Band::ALL {
        if !scene.has_band(band.name()) {
            continue;
        }
        let mut data = scene.band(band.name())?.clone();
        Zip::from(&mut data).and(qa).for_each(|value, &qa_value| {
            // NaN QA values cast to 0 and count as clear
            let bits = qa_value as u32;
            if bits & (CLOUD_BIT | CLOUD_SHADOW_BIT) != 0 {
                *value = f64::NAN;
            }
        });
        flagged = data.iter().filter(|v| v.is_nan()).count();
        masked.add_band(band.name(), data)?;
    }
    log::debug!("{} pixels masked per band", flagged);
    Ok(masked)
}

/// Apply the Collection-2 Level-2 scale and offset to the reflectance bands,
/// converting digital numbers to surface reflectance. Auxiliary bands are
/// not rescaled.
pub fn apply_scale_offset(scene: &Scene) -> NbarResult<Scene> {
    let mut scaled = scene.clone();
    for band in Band::ALL {
        if !scene.has_band(band.name()) {
            continue;
        }
        let data = scene
            .band(band.name())?
            .mapv(|dn| dn * REFLECTANCE_SCALE + REFLECTANCE_OFFSET);
        scaled.add_band(band.name(), data)?;
    }
    Ok(scaled)
}
