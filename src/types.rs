use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Real-valued surface reflectance data
pub type Reflectance = f64;

/// 2D raster band (rows x cols, row 0 = top). No-data pixels carry `f64::NAN`.
pub type BandImage = Array2<Reflectance>;

/// Landsat surface-reflectance bands handled by the BRDF correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Blue,
    Green,
    Red,
    Nir,
    Swir1,
    Swir2,
}

impl Band {
    /// The six reflectance bands in canonical (wavelength) order
    pub const ALL: [Band; 6] = [
        Band::Blue,
        Band::Green,
        Band::Red,
        Band::Nir,
        Band::Swir1,
        Band::Swir2,
    ];

    /// Lowercase band name as used in scene band maps
    pub fn name(&self) -> &'static str {
        match self {
            Band::Blue => "blue",
            Band::Green => "green",
            Band::Red => "red",
            Band::Nir => "nir",
            Band::Swir1 => "swir1",
            Band::Swir2 => "swir2",
        }
    }

    /// Parse a band name, returning `None` for auxiliary bands
    pub fn from_name(name: &str) -> Option<Band> {
        match name {
            "blue" => Some(Band::Blue),
            "green" => Some(Band::Green),
            "red" => Some(Band::Red),
            "nir" => Some(Band::Nir),
            "swir1" => Some(Band::Swir1),
            "swir2" => Some(Band::Swir2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geospatial bounding box in geographic coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Latitude of the box center, in degrees
    pub fn center_latitude(&self) -> f64 {
        (self.min_lat + self.max_lat) / 2.0
    }
}

/// Ground polygon covered by one acquisition, as a ring of (lon, lat) vertices.
///
/// Only simple single-ring footprints are supported; the corner-matching
/// heuristic in the view-geometry stage is undefined for non-convex or
/// multi-part footprints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footprint {
    ring: Vec<(f64, f64)>,
}

impl Footprint {
    /// Create a footprint from a vertex ring.
    ///
    /// A trailing vertex equal to the first (closed-ring convention) is
    /// accepted and dropped. Rings with fewer than three distinct vertices
    /// are rejected.
    pub fn new(mut ring: Vec<(f64, f64)>) -> NbarResult<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(NbarError::Geometry(format!(
                "footprint ring needs at least 3 distinct vertices, got {}",
                ring.len()
            )));
        }
        if ring.iter().any(|&(lon, lat)| !lon.is_finite() || !lat.is_finite()) {
            return Err(NbarError::Geometry(
                "footprint ring contains non-finite coordinates".to_string(),
            ));
        }
        Ok(Self { ring })
    }

    /// Ring vertices, closing vertex removed
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.ring
    }

    /// Axis-aligned bounding envelope of the ring
    pub fn envelope(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
        };
        for &(lon, lat) in &self.ring {
            bbox.min_lon = bbox.min_lon.min(lon);
            bbox.max_lon = bbox.max_lon.max(lon);
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.max_lat = bbox.max_lat.max(lat);
        }
        bbox
    }
}

/// Geospatial transformation parameters (GDAL affine convention)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoTransform {
    pub top_left_x: f64,
    pub pixel_width: f64,
    pub rotation_x: f64,
    pub top_left_y: f64,
    pub rotation_y: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Geographic coordinates (lon, lat) of a pixel center
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        let c = col as f64 + 0.5;
        let r = row as f64 + 0.5;
        let lon = self.top_left_x + c * self.pixel_width + r * self.rotation_x;
        let lat = self.top_left_y + c * self.rotation_y + r * self.pixel_height;
        (lon, lat)
    }

    /// Per-pixel longitude and latitude fields for a grid of the given shape
    pub fn lon_lat_grids(&self, shape: (usize, usize)) -> (BandImage, BandImage) {
        let (rows, cols) = shape;
        let mut lon = Array2::zeros((rows, cols));
        let mut lat = Array2::zeros((rows, cols));
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = self.pixel_center(row, col);
                lon[[row, col]] = x;
                lat[[row, col]] = y;
            }
        }
        (lon, lat)
    }
}

/// One Landsat acquisition: metadata plus a named band map.
///
/// Band arrays all share one grid; `add_band` enforces the shape invariant.
/// Band insertion order is preserved so a corrected scene exposes the same
/// band set, in the same order, as its input.
#[derive(Debug, Clone)]
pub struct Scene {
    pub scene_id: String,
    pub acquired: DateTime<Utc>,
    pub footprint: Footprint,
    pub geo_transform: GeoTransform,
    shape: (usize, usize),
    bands: HashMap<String, BandImage>,
    band_order: Vec<String>,
}

impl Scene {
    pub fn new(
        scene_id: impl Into<String>,
        acquired: DateTime<Utc>,
        footprint: Footprint,
        geo_transform: GeoTransform,
        shape: (usize, usize),
    ) -> Self {
        Self {
            scene_id: scene_id.into(),
            acquired,
            footprint,
            geo_transform,
            shape,
            bands: HashMap::new(),
            band_order: Vec::new(),
        }
    }

    /// Raster shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Insert or replace a named band
    pub fn add_band(&mut self, name: impl Into<String>, data: BandImage) -> NbarResult<()> {
        if data.dim() != self.shape {
            return Err(NbarError::Processing(format!(
                "band shape {:?} does not match scene shape {:?}",
                data.dim(),
                self.shape
            )));
        }
        let name = name.into();
        if self.bands.insert(name.clone(), data).is_none() {
            self.band_order.push(name);
        }
        Ok(())
    }

    /// Look up a band by name
    pub fn band(&self, name: &str) -> NbarResult<&BandImage> {
        self.bands
            .get(name)
            .ok_or_else(|| NbarError::MissingBand(name.to_string()))
    }

    pub fn has_band(&self, name: &str) -> bool {
        self.bands.contains_key(name)
    }

    /// Band names in insertion order
    pub fn band_names(&self) -> &[String] {
        &self.band_order
    }

    /// Look up one of the six reflectance bands
    pub fn reflectance_band(&self, band: Band) -> NbarResult<&BandImage> {
        self.band(band.name())
    }
}

/// Error types for NBAR processing
#[derive(Debug, thiserror::Error)]
pub enum NbarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Missing band: {0}")]
    MissingBand(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

/// Result type for NBAR operations
pub type NbarResult<T> = Result<T, NbarError>;
