use crate::types::{BandImage, Footprint, GeoTransform, NbarError, NbarResult, Scene};
use chrono::{DateTime, Utc};
use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use ndarray::Array2;
use std::path::Path;

/// No-data value written to output rasters in place of NaN
pub const OUTPUT_NODATA: f64 = -9999.0;

/// Multi-band GeoTIFF scene reader/writer.
///
/// Scenes are expected in geographic coordinates; band order is positional
/// and supplied by the caller (Landsat stacks are exported with a fixed band
/// order). The scene footprint is taken from the raster outline.
pub struct SceneReader;

impl SceneReader {
    /// Read a stacked scene from a GeoTIFF, one named band per raster band.
    ///
    /// Dataset no-data values and non-finite samples are mapped to NaN.
    pub fn read_scene<P: AsRef<Path>>(
        path: P,
        scene_id: &str,
        acquired: DateTime<Utc>,
        band_names: &[&str],
    ) -> NbarResult<Scene> {
        log::info!("Reading scene from: {}", path.as_ref().display());

        let dataset = Dataset::open(path.as_ref())?;
        let transform = dataset.geo_transform()?;
        let (width, height) = dataset.raster_size();
        log::debug!("scene size: {}x{}", width, height);

        let band_count = dataset.raster_count();
        if band_count != band_names.len() as isize {
            return Err(NbarError::InvalidFormat(format!(
                "expected {} bands, dataset has {}",
                band_names.len(),
                band_count
            )));
        }

        let geo_transform = GeoTransform {
            top_left_x: transform[0],
            pixel_width: transform[1],
            rotation_x: transform[2],
            top_left_y: transform[3],
            rotation_y: transform[4],
            pixel_height: transform[5],
        };
        let footprint = raster_outline(&geo_transform, width, height)?;

        let mut scene = Scene::new(scene_id, acquired, footprint, geo_transform, (height, width));
        for (index, name) in band_names.iter().enumerate() {
            let rasterband = dataset.rasterband(index as isize + 1)?;
            let no_data = rasterband.no_data_value();
            let buffer = rasterband.read_as::<f64>((0, 0), (width, height), (width, height), None)?;

            let data: Vec<f64> = buffer
                .data
                .into_iter()
                .map(|v| match no_data {
                    Some(nd) if v == nd => f64::NAN,
                    _ if !v.is_finite() => f64::NAN,
                    _ => v,
                })
                .collect();
            let array = Array2::from_shape_vec((height, width), data)
                .map_err(|e| NbarError::Processing(format!("failed to reshape band data: {}", e)))?;
            scene.add_band(*name, array)?;
        }

        Ok(scene)
    }

    /// Write a scene to a GeoTIFF with bands in scene band order, NaN mapped
    /// to `OUTPUT_NODATA`
    pub fn write_scene<P: AsRef<Path>>(scene: &Scene, path: P) -> NbarResult<()> {
        log::info!("Writing scene {} to: {}", scene.scene_id, path.as_ref().display());

        let (rows, cols) = scene.shape();
        let band_names = scene.band_names();
        let driver = DriverManager::get_driver_by_name("GTiff")?;
        let mut dataset = driver.create_with_band_type::<f64, _>(
            path.as_ref(),
            cols as isize,
            rows as isize,
            band_names.len() as isize,
        )?;

        let gt = &scene.geo_transform;
        dataset.set_geo_transform(&[
            gt.top_left_x,
            gt.pixel_width,
            gt.rotation_x,
            gt.top_left_y,
            gt.rotation_y,
            gt.pixel_height,
        ])?;
        dataset.set_spatial_ref(&SpatialRef::from_epsg(4326)?)?;

        for (index, name) in band_names.iter().enumerate() {
            let band: &BandImage = scene.band(name)?;
            let data: Vec<f64> = band
                .iter()
                .map(|&v| if v.is_finite() { v } else { OUTPUT_NODATA })
                .collect();
            let mut rasterband = dataset.rasterband(index as isize + 1)?;
            rasterband.set_no_data_value(Some(OUTPUT_NODATA))?;
            rasterband.write((0, 0), (cols, rows), &Buffer::new((cols, rows), data))?;
        }

        Ok(())
    }
}

/// Footprint ring tracing the raster outline through the affine transform
fn raster_outline(gt: &GeoTransform, width: usize, height: usize) -> NbarResult<Footprint> {
    let corner = |col: f64, row: f64| {
        (
            gt.top_left_x + col * gt.pixel_width + row * gt.rotation_x,
            gt.top_left_y + col * gt.rotation_y + row * gt.pixel_height,
        )
    };
    let w = width as f64;
    let h = height as f64;
    Footprint::new(vec![
        corner(0.0, h),
        corner(w, h),
        corner(w, 0.0),
        corner(0.0, 0.0),
    ])
}
