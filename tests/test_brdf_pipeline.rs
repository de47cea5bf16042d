use chrono::{TimeZone, Utc};
use nbar::{Band, BandImage, BrdfCorrector, Footprint, GeoTransform, Scene};

fn synthetic_scene() -> Scene {
    // Unit-square footprint, 2x2 grid of pixel centers inside it
    let footprint =
        Footprint::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]).unwrap();
    let geo_transform = GeoTransform {
        top_left_x: 0.0,
        pixel_width: 0.5,
        rotation_x: 0.0,
        top_left_y: 1.0,
        rotation_y: 0.0,
        pixel_height: -0.5,
    };
    let acquired = Utc.with_ymd_and_hms(2010, 6, 15, 10, 12, 30).unwrap();
    let mut scene = Scene::new("synthetic", acquired, footprint, geo_transform, (2, 2));
    for (i, band) in Band::ALL.iter().enumerate() {
        let value = 0.05 + 0.05 * i as f64;
        scene
            .add_band(band.name(), BandImage::from_elem((2, 2), value))
            .unwrap();
    }
    scene
}

#[test]
fn test_correction_is_deterministic() {
    let _ = env_logger::builder().is_test(true).try_init();
    let scene = synthetic_scene();
    let corrector = BrdfCorrector::new();

    let first = corrector.correct(&scene).unwrap();
    let second = corrector.correct(&scene).unwrap();

    for name in first.band_names() {
        let a = first.band(name).unwrap();
        let b = second.band(name).unwrap();
        for (&x, &y) in a.iter().zip(b.iter()) {
            // Bit-identical output, NaN included
            assert_eq!(x.to_bits(), y.to_bits(), "band {} differs", name);
        }
    }
}

#[test]
fn test_correction_adjusts_reflectance_bands() {
    let scene = synthetic_scene();
    let corrected = BrdfCorrector::new().correct(&scene).unwrap();

    let mut any_changed = false;
    for band in Band::ALL {
        let input = scene.band(band.name()).unwrap();
        let output = corrected.band(band.name()).unwrap();
        for (&before, &after) in input.iter().zip(output.iter()) {
            assert!(after.is_finite(), "band {} produced no-data", band);
            if (after - before).abs() > 1e-9 {
                any_changed = true;
            }
        }
    }
    assert!(any_changed, "correction left every band untouched");
}

#[test]
fn test_auxiliary_bands_pass_through_unchanged() {
    let mut scene = synthetic_scene();
    scene
        .add_band("QA_PIXEL", BandImage::from_elem((2, 2), 5440.0))
        .unwrap();
    scene
        .add_band("surface_temp", BandImage::from_elem((2, 2), 293.15))
        .unwrap();

    let corrected = BrdfCorrector::new().correct(&scene).unwrap();
    assert_eq!(corrected.band_names(), scene.band_names());
    assert_eq!(
        corrected.band("QA_PIXEL").unwrap(),
        scene.band("QA_PIXEL").unwrap()
    );
    assert_eq!(
        corrected.band("surface_temp").unwrap(),
        scene.band("surface_temp").unwrap()
    );
}

#[test]
fn test_missing_reflectance_bands_are_skipped() {
    // A scene carrying only two of the six bands still corrects cleanly
    let full = synthetic_scene();
    let mut scene = Scene::new(
        "partial",
        full.acquired,
        full.footprint.clone(),
        full.geo_transform.clone(),
        (2, 2),
    );
    scene
        .add_band("red", full.band("red").unwrap().clone())
        .unwrap();
    scene
        .add_band("nir", full.band("nir").unwrap().clone())
        .unwrap();

    let corrected = BrdfCorrector::new().correct(&scene).unwrap();
    assert_eq!(corrected.band_names(), ["red", "nir"]);
}

#[test]
fn test_batch_correction_preserves_order() {
    let scenes: Vec<Scene> = (0..4).map(|_| synthetic_scene()).collect();
    let results = BrdfCorrector::new().correct_all(&scenes);
    assert_eq!(results.len(), 4);

    let reference = BrdfCorrector::new().correct(&scenes[0]).unwrap();
    for result in &results {
        let corrected = result.as_ref().unwrap();
        assert_eq!(
            corrected.band("nir").unwrap(),
            reference.band("nir").unwrap()
        );
    }
}
