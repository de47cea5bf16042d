use crate::types::{Band, BandImage, NbarResult, Scene};
use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// Vegetation indices derived from corrected reflectance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VegetationIndex {
    /// Normalized Difference Vegetation Index, (nir - red) / (nir + red)
    Ndvi,
    /// Near-Infrared Reflectance of Vegetation, NDVI * nir
    Nirv,
}

impl VegetationIndex {
    pub fn name(&self) -> &'static str {
        match self {
            VegetationIndex::Ndvi => "ndvi",
            VegetationIndex::Nirv => "nirv",
        }
    }
}

impl std::fmt::Display for VegetationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute a vegetation index from a scene's nir and red bands.
///
/// Pixels where the index is undefined (nir + red == 0, or no-data inputs)
/// come out as NaN.
pub fn compute_index(scene: &Scene, index: VegetationIndex) -> NbarResult<BandImage> {
    let nir = scene.reflectance_band(Band::Nir)?;
    let red = scene.reflectance_band(Band::Red)?;

    let mut out = BandImage::zeros(nir.dim());
    Zip::from(&mut out)
        .and(nir)
        .and(red)
        .for_each(|value, &nir, &red| {
            let ndvi = (nir - red) / (nir + red);
            let v = match index {
                VegetationIndex::Ndvi => ndvi,
                VegetationIndex::Nirv => ndvi * nir,
            };
            *value = if v.is_finite() { v } else { f64::NAN };
        });
    Ok(out)
}

/// Mean over the finite pixels of a band; `None` when no valid pixel remains.
///
/// This is the per-scene reduction used to build vegetation-index time
/// series over a region of interest.
pub fn scene_mean(band: &BandImage) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &value in band.iter() {
        if value.is_finite() {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
