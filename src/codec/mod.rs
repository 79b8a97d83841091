//! Boundary around the two coordinate codecs.
//!
//! The ranking engine and the parser only ever talk to the functions in this
//! module; [`olc`] and [`grid`] hold the format implementations.

pub mod grid;
pub mod olc;

use crate::error::Result;
use crate::types::Coordinate;

pub use grid::GridRef;
pub use olc::{is_full, is_short, is_valid, CodeArea, CODE_PRECISION_EXTRA, CODE_PRECISION_NORMAL};

/// Full code for a coordinate at the given number of digits.
pub fn encode(coordinate: &Coordinate, code_length: usize) -> Result<String> {
    olc::encode(coordinate.latitude, coordinate.longitude, code_length)
}

/// Center of the cell a full code covers.
pub fn decode_center(code: &str) -> Result<Coordinate> {
    let (latitude, longitude) = olc::decode(code)?.center();
    Ok(Coordinate::new(latitude, longitude))
}

/// Shortens a full code against an anchor; too distant anchors leave it unchanged.
pub fn shorten(code: &str, anchor_lat: f64, anchor_lon: f64) -> Result<String> {
    olc::shorten(code, anchor_lat, anchor_lon)
}

/// Nearest full code matching a short code around an anchor.
pub fn recover_nearest(code: &str, anchor_lat: f64, anchor_lon: f64) -> Result<String> {
    olc::recover_nearest(code, anchor_lat, anchor_lon)
}

/// National grid reference, or [`Error::OutOfCoverage`](crate::Error::OutOfCoverage).
pub fn grid_encode(coordinate: &Coordinate) -> Result<String> {
    GridRef::from_coordinate(coordinate).map(|grid| grid.to_string())
}

/// Parses a national grid reference into eastings and northings.
pub fn grid_parse(text: &str) -> Result<GridRef> {
    GridRef::parse(text)
}

/// WGS84 position of a grid reference.
pub fn grid_to_coordinate(grid: &GridRef) -> Coordinate {
    grid.to_coordinate()
}
