use crate::types::BandImage;
use ndarray::Zip;
use std::f64::consts::PI;

/// Crown relative height parameter h/b of the Li-Thin kernel
const HB_RATIO: f64 = 2.0;

/// Crown shape parameter b/r of the prime-angle transform
const BR_RATIO: f64 = 1.0;

/// The four kernel fields of the c-factor method: volumetric and geometric
/// kernels at the actual observation geometry (`kvol`, `kgeo`) and at the
/// nadir-view, reference-sun geometry (`kvol0`, `kgeo0`).
#[derive(Debug, Clone)]
pub struct KernelImages {
    pub kvol: BandImage,
    pub kgeo: BandImage,
    pub kvol0: BandImage,
    pub kgeo0: BandImage,
}

/// Cosine of the sun-view phase angle, clamped to [-1, 1].
///
/// The clamp guards the downstream `acos` against floating-point overshoot
/// and is a correctness requirement of the method, not an optimization.
pub fn cos_phase_angle(sun_zen: f64, view_zen: f64, relative_az: f64) -> f64 {
    (sun_zen.cos() * view_zen.cos() + sun_zen.sin() * view_zen.sin() * relative_az.cos())
        .clamp(-1.0, 1.0)
}

/// Ross-Thick volumetric scattering kernel (radians in, dimensionless out)
pub fn ross_thick(sun_zen: f64, view_zen: f64, relative_az: f64) -> f64 {
    let cos_phase = cos_phase_angle(sun_zen, view_zen, relative_az);
    let phase = cos_phase.acos();
    ((PI / 2.0 - phase) * cos_phase + phase.sin()) / (sun_zen.cos() + view_zen.cos()) - PI / 4.0
}

/// Prime-angle transform of the Li kernels: `atan(b/r * tan(angle))` with the
/// tangent clamped non-negative
pub fn angle_prime(angle: f64) -> f64 {
    let tan_prime = BR_RATIO * angle.tan();
    let tan_prime = if tan_prime < 0.0 { 0.0 } else { tan_prime };
    tan_prime.atan()
}

/// Li-Thin geometric-optical shadowing kernel (radians in, dimensionless out)
pub fn li_thin(sun_zen: f64, view_zen: f64, relative_az: f64) -> f64 {
    let sun_zen_prime = angle_prime(sun_zen);
    let view_zen_prime = angle_prime(view_zen);
    let cos_phase_prime = cos_phase_angle(sun_zen_prime, view_zen_prime, relative_az);

    let tan_s = sun_zen_prime.tan();
    let tan_v = view_zen_prime.tan();
    let distance = (tan_s.powi(2) + tan_v.powi(2) - 2.0 * tan_s * tan_v * relative_az.cos()).sqrt();
    let sec_sum = 1.0 / sun_zen_prime.cos() + 1.0 / view_zen_prime.cos();

    let cos_t = (HB_RATIO * (distance.powi(2) + (tan_s * tan_v * relative_az.sin()).powi(2)).sqrt()
        / sec_sum)
        .clamp(-1.0, 1.0);
    let t = cos_t.acos();

    // Sign convention of the published formulation: the shadow overlap
    // fraction never exceeds zero. An explicit branch (not `min`) so NaN
    // still propagates as no-data.
    let overlap = (1.0 / PI) * (t - t.sin() * cos_t) * sec_sum;
    let overlap = if overlap > 0.0 { 0.0 } else { overlap };

    overlap - sec_sum
        + 0.5 * (1.0 + cos_phase_prime) * (1.0 / sun_zen_prime.cos()) * (1.0 / view_zen_prime.cos())
}

/// Evaluate both kernels at the actual and the reference geometry.
///
/// The reference geometry (nadir view, reference sun zenith, zero relative
/// azimuth) is constant across the scene, so `kvol0`/`kgeo0` are uniform
/// fields.
pub fn compute_kernels(
    sun_zenith: &BandImage,
    view_zenith: &BandImage,
    relative_az: &BandImage,
    reference_sun_zenith: f64,
) -> KernelImages {
    let shape = sun_zenith.dim();

    let mut kvol = BandImage::zeros(shape);
    let mut kgeo = BandImage::zeros(shape);
    Zip::from(&mut kvol)
        .and(&mut kgeo)
        .and(sun_zenith)
        .and(view_zenith)
        .and(relative_az)
        .for_each(|vol, geo, &sz, &vz, &ra| {
            *vol = ross_thick(sz, vz, ra);
            *geo = li_thin(sz, vz, ra);
        });

    let kvol0 = BandImage::from_elem(shape, ross_thick(reference_sun_zenith, 0.0, 0.0));
    let kgeo0 = BandImage::from_elem(shape, li_thin(reference_sun_zenith, 0.0, 0.0));

    KernelImages {
        kvol,
        kgeo,
        kvol0,
        kgeo0,
    }
}
