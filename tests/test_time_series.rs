//! End-to-end scene processing: QA screening, reflectance scaling, BRDF
//! correction and vegetation-index reduction, the per-scene chain behind a
//! vegetation time series.

use chrono::{DateTime, TimeZone, Utc};
use nbar::core::preprocess::{apply_scale_offset, mask_clear_pixels};
use nbar::{scene_mean, Band, BandImage, BrdfCorrector, Footprint, GeoTransform, Scene,
    VegetationIndex};

fn landsat_scene(acquired: DateTime<Utc>, cloudy_pixel: bool) -> Scene {
    let footprint =
        Footprint::new(vec![(104.0, 8.0), (104.9, 8.1), (104.8, 9.0), (103.9, 8.9)]).unwrap();
    let geo_transform = GeoTransform {
        top_left_x: 104.0,
        pixel_width: 0.2,
        rotation_x: 0.0,
        top_left_y: 9.0,
        rotation_y: 0.0,
        pixel_height: -0.2,
    };
    let mut scene = Scene::new(
        format!("LE07_{}", acquired.format("%Y%m%d")),
        acquired,
        footprint,
        geo_transform,
        (3, 3),
    );

    // Digital numbers in the Collection-2 range; scaled they land near
    // typical vegetation reflectance
    for (i, band) in Band::ALL.iter().enumerate() {
        let dn = 9000.0 + 1500.0 * i as f64;
        scene
            .add_band(band.name(), BandImage::from_elem((3, 3), dn))
            .unwrap();
    }

    let mut qa = BandImage::zeros((3, 3));
    if cloudy_pixel {
        qa[[1, 1]] = (1 << 5) as f64;
    }
    scene.add_band("QA_PIXEL", qa).unwrap();
    scene
}

fn process(scene: &Scene, index: VegetationIndex) -> Option<f64> {
    let screened = mask_clear_pixels(scene).unwrap();
    let scaled = apply_scale_offset(&screened).unwrap();
    let corrected = BrdfCorrector::new().correct(&scaled).unwrap();
    let vi = nbar::compute_index(&corrected, index).unwrap();
    scene_mean(&vi)
}

#[test]
fn test_time_series_means_are_produced_per_scene() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dates = [
        Utc.with_ymd_and_hms(1999, 7, 1, 3, 20, 0).unwrap(),
        Utc.with_ymd_and_hms(2005, 7, 1, 3, 20, 0).unwrap(),
        Utc.with_ymd_and_hms(2012, 7, 1, 3, 20, 0).unwrap(),
    ];
    for date in dates {
        let scene = landsat_scene(date, false);
        let mean = process(&scene, VegetationIndex::Ndvi);
        let mean = mean.expect("clear scene must yield a mean");
        assert!((-1.0..=1.0).contains(&mean), "NDVI mean {} out of range", mean);
    }
}

#[test]
fn test_cloudy_pixels_are_excluded_from_the_mean() {
    let date = Utc.with_ymd_and_hms(2005, 7, 1, 3, 20, 0).unwrap();
    let clear = process(&landsat_scene(date, false), VegetationIndex::Ndvi).unwrap();
    let screened = process(&landsat_scene(date, true), VegetationIndex::Ndvi).unwrap();

    // The c-factor varies slightly across the scan line, so dropping one
    // pixel may move the mean a little but not materially
    assert!((clear - screened).abs() < 0.01);

    // The cloudy pixel itself is no-data after screening
    let masked = mask_clear_pixels(&landsat_scene(date, true)).unwrap();
    assert!(masked.band("red").unwrap()[[1, 1]].is_nan());
    assert!(!masked.band("red").unwrap()[[0, 0]].is_nan());
}

#[test]
fn test_nirv_tracks_ndvi() {
    let date = Utc.with_ymd_and_hms(2010, 7, 1, 3, 20, 0).unwrap();
    let scene = landsat_scene(date, false);
    let ndvi = process(&scene, VegetationIndex::Ndvi).unwrap();
    let nirv = process(&scene, VegetationIndex::Nirv).unwrap();
    // NIRv = NDVI * nir, and nir reflectance here is well below 1
    assert!(nirv.abs() < ndvi.abs());
}
