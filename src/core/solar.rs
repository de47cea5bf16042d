use crate::types::{BandImage, NbarError, NbarResult};
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use ndarray::Zip;
use std::f64::consts::PI;

/// Per-pixel solar geometry, in radians
#[derive(Debug, Clone)]
pub struct SolarGeometry {
    pub sun_zenith: BandImage,
    pub sun_azimuth: BandImage,
}

/// Solar declination from the fraction-of-year angle `jdpr` (radians).
///
/// Fourier series of Spencer (1971); the coefficients are reproduced
/// bit-for-bit to keep parity with the published c-factor implementation.
pub fn declination(jdpr: f64) -> f64 {
    0.006918 - 0.399912 * jdpr.cos() + 0.070257 * jdpr.sin()
        - 0.006758 * (2.0 * jdpr).cos()
        + 0.000907 * (2.0 * jdpr).sin()
        - 0.002697 * (3.0 * jdpr).cos()
        + 0.001480 * (3.0 * jdpr).sin()
}

/// Equation of time in minutes: local apparent solar time minus mean solar
/// time, from the fraction-of-year angle `jdpr` (radians).
pub fn equation_of_time_minutes(jdpr: f64) -> f64 {
    (0.000075 + 0.001868 * jdpr.cos() - 0.032077 * jdpr.sin()
        - 0.014615 * (2.0 * jdpr).cos()
        - 0.040849 * (2.0 * jdpr).sin())
        * 12.0
        * 60.0
        / PI
}

/// Reference (nadir-equivalent) solar zenith in radians.
///
/// Degree-6 polynomial in the scene-center latitude expressed in radians,
/// independent of acquisition time; this is the normalization target
/// geometry of the c-factor method.
pub fn reference_sun_zenith(center_lat_deg: f64) -> f64 {
    let lat = center_lat_deg * PI / 180.0;
    let zenith_deg = 31.0076 - 0.1272 * lat + 0.01187 * lat.powi(2) + 2.40e-05 * lat.powi(3)
        - 9.48e-07 * lat.powi(4)
        - 1.95e-09 * lat.powi(5)
        + 6.15e-11 * lat.powi(6);
    zenith_deg * PI / 180.0
}

/// Solar zenith and azimuth (radians) at one point.
///
/// * `jdpr` - fraction of year scaled to [0, 2pi)
/// * `hour_gmt` - decimal UTC hour of day
/// * `lon_deg`, `lat_deg` - geographic position in degrees
///
/// The azimuth is resolved from its arcsine with the two quadrant branches of
/// the reference formulation, rotated from the south-west convention and
/// wrapped to [0, 2pi). Every inverse-trig argument is clamped to [-1, 1];
/// degenerate positions (sun exactly at zenith) propagate NaN instead of
/// erroring.
pub fn solar_angles(jdpr: f64, hour_gmt: f64, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let lat_rad = lat_deg * PI / 180.0;
    let delta = declination(jdpr);

    let mean_solar_time = hour_gmt + lon_deg / 15.0;
    let true_solar_time = mean_solar_time + equation_of_time_minutes(jdpr) / 60.0 - 12.0;
    let hour_angle = true_solar_time * 15.0 * PI / 180.0;

    let cos_sun_zen = (lat_rad.sin() * delta.sin()
        + lat_rad.cos() * delta.cos() * hour_angle.cos())
    .clamp(-1.0, 1.0);
    let sun_zenith = cos_sun_zen.acos();

    let sin_az_sw = (delta.cos() * hour_angle.sin() / sun_zenith.sin()).clamp(-1.0, 1.0);
    let cos_az_sw = (-lat_rad.cos() * delta.sin()
        + lat_rad.sin() * delta.cos() * hour_angle.cos())
        / sun_zenith.sin();

    let mut az_sw = sin_az_sw.asin();
    if cos_az_sw <= 0.0 {
        az_sw = PI - az_sw;
    } else if sin_az_sw <= 0.0 {
        az_sw += 2.0 * PI;
    }

    let mut sun_azimuth = az_sw + PI;
    if sun_azimuth > 2.0 * PI {
        sun_azimuth -= 2.0 * PI;
    }

    (sun_zenith, sun_azimuth)
}

/// Fraction of the calendar year elapsed at the given instant, in [0, 1)
pub fn fraction_of_year(t: &DateTime<Utc>) -> NbarResult<f64> {
    let start = year_start(t.year())?;
    let end = year_start(t.year() + 1)?;
    let elapsed = (*t - start).num_milliseconds() as f64;
    let total = (end - start).num_milliseconds() as f64;
    Ok(elapsed / total)
}

/// Decimal UTC hour of day (whole-second resolution)
pub fn hour_of_day(t: &DateTime<Utc>) -> f64 {
    f64::from(t.num_seconds_from_midnight()) / 3600.0
}

fn year_start(year: i32) -> NbarResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| NbarError::Processing(format!("invalid calendar year {}", year)))
}

/// Per-pixel solar geometry for a whole scene grid
pub fn solar_position(
    acquired: &DateTime<Utc>,
    lon: &BandImage,
    lat: &BandImage,
) -> NbarResult<SolarGeometry> {
    let jdpr = fraction_of_year(acquired)? * 2.0 * PI;
    let hour_gmt = hour_of_day(acquired);
    log::debug!(
        "solar position at {} (year fraction angle {:.6} rad, {:.4} h UTC)",
        acquired,
        jdpr,
        hour_gmt
    );

    let mut sun_zenith = BandImage::zeros(lon.dim());
    let mut sun_azimuth = BandImage::zeros(lon.dim());
    Zip::from(&mut sun_zenith)
        .and(&mut sun_azimuth)
        .and(lon)
        .and(lat)
        .for_each(|zen, az, &lon_deg, &lat_deg| {
            let (z, a) = solar_angles(jdpr, hour_gmt, lon_deg, lat_deg);
            *zen = z;
            *az = a;
        });

    Ok(SolarGeometry {
        sun_zenith,
        sun_azimuth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_declination_near_solstices() {
        // Year fraction 0.0 and 0.5 sit close to the winter and summer
        // solstices; the declination magnitude approaches 23.44 degrees
        let axial_tilt_rad = 23.44_f64 * PI / 180.0;
        assert_abs_diff_eq!(declination(0.0), -axial_tilt_rad, epsilon = 0.01);
        assert_abs_diff_eq!(declination(PI), axial_tilt_rad, epsilon = 0.01);
    }

    #[test]
    fn test_declination_bounded_by_axial_tilt() {
        for step in 0..=360 {
            let jdpr = f64::from(step) * 2.0 * PI / 360.0;
            assert!(declination(jdpr).abs() < 0.41);
        }
    }

    #[test]
    fn test_noon_sun_is_due_south_in_northern_summer() {
        // Mid-June, 45N, longitude 0; choose the UTC hour so that the true
        // solar time is exactly noon (hour angle zero)
        let jdpr = 0.45 * 2.0 * PI;
        let hour_gmt = 12.0 - equation_of_time_minutes(jdpr) / 60.0;
        let (zenith, azimuth) = solar_angles(jdpr, hour_gmt, 0.0, 45.0);

        let delta = declination(jdpr);
        assert_relative_eq!(zenith, 45.0 * PI / 180.0 - delta, epsilon = 1e-9);
        assert_relative_eq!(azimuth, PI, epsilon = 1e-9);
    }

    #[test]
    fn test_azimuth_wrapped_to_full_circle() {
        for hour in [0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0] {
            for lat in [-60.0, -20.0, 0.0, 20.0, 60.0] {
                let (zenith, azimuth) = solar_angles(1.3, hour, 10.0, lat);
                if zenith.is_finite() && azimuth.is_finite() {
                    assert!((0.0..=2.0 * PI).contains(&azimuth), "azimuth {}", azimuth);
                    assert!((0.0..=PI).contains(&zenith), "zenith {}", zenith);
                }
            }
        }
    }

    #[test]
    fn test_fraction_of_year() {
        let t = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(fraction_of_year(&t).unwrap(), 0.0);
        let t = Utc.with_ymd_and_hms(2021, 7, 2, 12, 0, 0).unwrap();
        assert_abs_diff_eq!(fraction_of_year(&t).unwrap(), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn test_reference_zenith_is_latitude_dependent_only() {
        let equator = reference_sun_zenith(0.0);
        assert_relative_eq!(equator, 31.0076 * PI / 180.0, epsilon = 1e-12);
        // Monotone-free sanity check: stays a plausible zenith in the tropics
        for lat in [-25.0, -10.0, 0.0, 10.0, 25.0] {
            let z = reference_sun_zenith(lat);
            assert!(z > 0.0 && z < PI / 2.0);
        }
    }
}
