use crate::core::kernels::KernelImages;
use crate::types::{Band, BandImage, Reflectance};
use ndarray::Zip;
use serde::{Deserialize, Serialize};

/// Empirical kernel weights of one band: isotropic, geometric and volumetric
/// (Roy et al. 2016, Landsat global fixed coefficients)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandCoefficients {
    pub fiso: f64,
    pub fgeo: f64,
    pub fvol: f64,
}

/// Fixed kernel weights for the six Landsat reflectance bands
pub fn coefficients_for(band: Band) -> BandCoefficients {
    match band {
        Band::Blue => BandCoefficients {
            fiso: 0.0774,
            fgeo: 0.0079,
            fvol: 0.0372,
        },
        Band::Green => BandCoefficients {
            fiso: 0.1306,
            fgeo: 0.0178,
            fvol: 0.0580,
        },
        Band::Red => BandCoefficients {
            fiso: 0.1690,
            fgeo: 0.0227,
            fvol: 0.0574,
        },
        Band::Nir => BandCoefficients {
            fiso: 0.3093,
            fgeo: 0.0330,
            fvol: 0.1535,
        },
        Band::Swir1 => BandCoefficients {
            fiso: 0.3430,
            fgeo: 0.0453,
            fvol: 0.1154,
        },
        Band::Swir2 => BandCoefficients {
            fiso: 0.2658,
            fgeo: 0.0387,
            fvol: 0.0639,
        },
    }
}

/// Modeled reflectance at one geometry. The volumetric kernel carries the
/// fixed multiplication factor of 3 from the reference formulation.
pub fn modeled_reflectance(coefficients: &BandCoefficients, kvol: f64, kgeo: f64) -> f64 {
    coefficients.fiso + coefficients.fvol * (3.0 * kvol) + coefficients.fgeo * kgeo
}

/// Per-pixel c-factor: modeled reflectance at the reference geometry over
/// modeled reflectance at the actual geometry. A zero or non-finite
/// denominator yields NaN (no-data), never an error.
pub fn c_factor(
    coefficients: &BandCoefficients,
    kvol: f64,
    kgeo: f64,
    kvol0: f64,
    kgeo0: f64,
) -> f64 {
    let brdf = modeled_reflectance(coefficients, kvol, kgeo);
    let brdf0 = modeled_reflectance(coefficients, kvol0, kgeo0);
    let c = brdf0 / brdf;
    if c.is_finite() {
        c
    } else {
        f64::NAN
    }
}

/// Multiply one band by its per-pixel c-factor. Pixels with degenerate
/// geometry or a zero modeled reflectance come out as NaN.
pub fn adjust_band(
    band: &BandImage,
    coefficients: &BandCoefficients,
    kernels: &KernelImages,
) -> BandImage {
    let mut adjusted = BandImage::zeros(band.dim());
    Zip::from(&mut adjusted)
        .and(band)
        .and(&kernels.kvol)
        .and(&kernels.kgeo)
        .and(&kernels.kvol0)
        .and(&kernels.kgeo0)
        .for_each(|out, &value, &kvol, &kgeo, &kvol0, &kgeo0| {
            let corrected: Reflectance =
                value * c_factor(coefficients, kvol, kgeo, kvol0, kgeo0);
            *out = if corrected.is_finite() {
                corrected
            } else {
                f64::NAN
            };
        });
    adjusted
}
