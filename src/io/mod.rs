//! Scene I/O

pub mod geotiff;

pub use geotiff::SceneReader;
