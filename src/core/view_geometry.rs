use crate::types::{BandImage, Footprint, NbarError, NbarResult};
use ndarray::Array2;
use std::f64::consts::PI;

/// Maximum satellite zenith angle at the scan edge, in degrees (Landsat)
pub const MAX_SATELLITE_ZENITH_DEG: f64 = 7.5;

/// Cap on the point-to-edge distance search
pub const MAX_DISTANCE_TO_SCENE_EDGE: f64 = 1_000_000.0;

/// Approximate footprint corners, as (lon, lat)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    pub upper_left: (f64, f64),
    pub upper_right: (f64, f64),
    pub lower_left: (f64, f64),
    pub lower_right: (f64, f64),
}

/// Per-scene viewing geometry.
///
/// The view azimuth is a single angle for the whole scene (perpendicular to
/// the along-track direction); the view zenith varies across the scan line.
/// Both are in radians.
#[derive(Debug, Clone)]
pub struct ViewGeometry {
    pub view_azimuth: f64,
    pub view_zenith: BandImage,
}

/// Approximate the four footprint corners by nearest-vertex matching against
/// the bounding envelope's extreme coordinates.
///
/// This reproduces the nearest-vertex heuristic of the published c-factor
/// implementation: lower-left matches the minimum longitude, lower-right the
/// minimum latitude, upper-right the maximum longitude and upper-left the
/// maximum latitude, each resolved to the first ring vertex with the smallest
/// coordinate difference. Non-convex or multi-part footprints are outside the
/// heuristic's domain and degrade silently.
pub fn find_corners(footprint: &Footprint) -> NbarResult<Corners> {
    let vertices = footprint.vertices();
    if vertices.is_empty() {
        return Err(NbarError::Geometry("empty footprint ring".to_string()));
    }
    let bbox = footprint.envelope();

    let nearest_by_lon = |target: f64| -> (f64, f64) {
        let mut best = vertices[0];
        let mut best_diff = f64::INFINITY;
        for &v in vertices {
            let diff = (v.0 - target).abs();
            if diff < best_diff {
                best_diff = diff;
                best = v;
            }
        }
        best
    };
    let nearest_by_lat = |target: f64| -> (f64, f64) {
        let mut best = vertices[0];
        let mut best_diff = f64::INFINITY;
        for &v in vertices {
            let diff = (v.1 - target).abs();
            if diff < best_diff {
                best_diff = diff;
                best = v;
            }
        }
        best
    };

    Ok(Corners {
        lower_left: nearest_by_lon(bbox.min_lon),
        lower_right: nearest_by_lat(bbox.min_lat),
        upper_right: nearest_by_lon(bbox.max_lon),
        upper_left: nearest_by_lat(bbox.max_lat),
    })
}

/// Reconstruct the per-pixel viewing geometry from the footprint corners.
///
/// The satellite's along-track direction joins the midpoints of the left
/// (UL-LL) and right (UR-LR) edges; the view azimuth is perpendicular to it.
/// The view zenith interpolates linearly from `-MAX_SATELLITE_ZENITH_DEG` at
/// the left edge to `+MAX_SATELLITE_ZENITH_DEG` at the right edge, weighted
/// by each pixel's relative distance to the two side edges. Degenerate
/// footprints (zero-length edges, coincident midpoints) produce NaN fields,
/// never an error.
pub fn compute_view_angles(
    corners: &Corners,
    lon: &BandImage,
    lat: &BandImage,
) -> ViewGeometry {
    let upper_center = midpoint(corners.upper_left, corners.upper_right);
    let lower_center = midpoint(corners.lower_left, corners.lower_right);
    let slope = slope_between(lower_center, upper_center);
    let slope_perp = -1.0 / slope;
    let view_azimuth = PI / 2.0 - slope_perp.atan();

    let (rows, cols) = lon.dim();
    let mut view_zenith = Array2::from_elem((rows, cols), f64::NAN);
    for row in 0..rows {
        for col in 0..cols {
            let p = (lon[[row, col]], lat[[row, col]]);
            let left = point_to_segment_distance(p, corners.upper_left, corners.lower_left)
                .min(MAX_DISTANCE_TO_SCENE_EDGE);
            let right = point_to_segment_distance(p, corners.upper_right, corners.lower_right)
                .min(MAX_DISTANCE_TO_SCENE_EDGE);
            // 0/0 at a fully degenerate footprint stays NaN
            let zenith_deg = right * (MAX_SATELLITE_ZENITH_DEG * 2.0) / (right + left)
                - MAX_SATELLITE_ZENITH_DEG;
            view_zenith[[row, col]] = zenith_deg * PI / 180.0;
        }
    }

    ViewGeometry {
        view_azimuth,
        view_zenith,
    }
}

fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

fn slope_between(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.1 - b.1) / (a.0 - b.0)
}

/// Planar distance from a point to a line segment.
///
/// Units cancel in the left/right interpolation ratio, so planar geographic
/// distance is sufficient here.
fn point_to_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (px, py) = p;
    let (ax, ay) = a;
    let (bx, by) = b;
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    let cx = ax + t * dx;
    let cy = ay + t * dy;
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}
