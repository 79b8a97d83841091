//! Core data structures.
//!
//! - [`Coordinate`] - A captured position, immutable once built
//! - [`PlaceRecord`] - A named anchor place owned by the index
//! - [`RankedResult`] - One rendered short code and its phonetic spelling
//! - [`CompactPlace`] / [`Database`] - The packed on-disk index format

use serde::{Deserialize, Serialize};

/// A WGS84 position with optional altitude and accuracy.
///
/// # Examples
///
/// ```
/// use plusplace::Coordinate;
///
/// let here = Coordinate::new(51.525736, -0.083704);
/// assert_eq!(here.latitude, 51.525736);
/// assert!(here.accuracy.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
    /// Altitude above mean sea level in metres, when the source reports one
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Radius of uncertainty in metres, when the source reports one
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl Coordinate {
    /// Constructs a bare coordinate with no altitude or accuracy.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            accuracy: None,
        }
    }

    /// Returns a copy carrying the given altitude and accuracy.
    pub fn with_fix(self, altitude: Option<f64>, accuracy: Option<f64>) -> Self {
        Self {
            altitude,
            accuracy,
            ..self
        }
    }

    /// Squared planar distance in degrees. Only meaningful for comparisons.
    pub fn squared_distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        (latitude - self.latitude).powi(2) + (longitude - self.longitude).powi(2)
    }
}

/// Notability scores used by the gazetteer extract.
///
/// Higher is more notable; the ranking engine prefers higher values when two
/// anchors give equally short codes.
pub struct Hierarchy;

impl Hierarchy {
    /// Isolated hamlet
    pub const HAMLET: u8 = 20;
    /// Village or other small settlement
    pub const VILLAGE: u8 = 30;
    /// Named suburb inside a larger conurbation
    pub const SUBURBAN_AREA: u8 = 35;
    /// Town
    pub const TOWN: u8 = 40;
    /// City
    pub const CITY: u8 = 50;
}

/// A named place that can anchor a short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Gazetteer identifier, unique within an index
    pub id: String,
    /// Display name (e.g. "City of London", "Brodick")
    pub name: String,
    /// Country or constituent country (e.g. "England", "Scotland")
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Notability score, see [`Hierarchy`]
    pub hierarchy: u8,
}

/// One entry of a ranked listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedResult {
    /// e.g. `"G8+7GV, City of London England"` or a bare full code
    pub short_code: String,
    /// e.g. `"Golf Eight Plus Seven Golf Victor, City of London, England"`
    pub phonetic: String,
}

/// Fixed-point scale for packed coordinates (degrees × 100 000).
pub const COORD_SCALE: f64 = 100_000.0;

/// Packed place using string table indices and fixed-point coordinates.
///
/// This is the storage representation inside [`Database`]. The identifier,
/// name and country are `u32` indices into the shared string table.
#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct CompactPlace {
    /// Index into the string table for the identifier
    pub id: u32,
    /// Index into the string table for the name
    pub name: u32,
    /// Index into the string table for the country
    pub country: u32,
    /// Latitude as fixed-point integer (divide by 100,000 for degrees)
    pub lat: i32,
    /// Longitude as fixed-point integer (divide by 100,000 for degrees)
    pub lon: i32,
    /// Notability score
    pub hierarchy: u8,
}

/// The packed place index as written to disk.
///
/// # Tile Index
///
/// Every place is filed under four prefixes of its own plus code: 4, 6 and 8
/// characters (padding stripped) and 11 characters (8 digits, separator, 2
/// digits). Lookups sample the same prefixes around the query point, so a
/// place is found whenever it shares a tile with one of the samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Database {
    /// Deduplicated string table
    pub strings: Vec<String>,
    /// All places in packed form
    pub places: Vec<CompactPlace>,
    /// Tile key -> indices into `places`
    pub tiles: rustc_hash::FxHashMap<String, Vec<u32>>,
}

impl Database {
    /// Encodes the database with the standard bincode configuration.
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(bincode::encode_to_vec(self, bincode::config::standard())?)
    }

    /// Decodes a database produced by [`Database::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> crate::Result<Self> {
        let (db, _): (Database, _) =
            bincode::decode_from_slice(data, bincode::config::standard())?;
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_is_planar() {
        let here = Coordinate::new(51.0, -1.0);
        assert_eq!(here.squared_distance_to(52.0, 1.0), 5.0);
        assert_eq!(here.squared_distance_to(51.0, -1.0), 0.0);
    }
}
