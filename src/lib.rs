//! Place-anchored, speakable plus codes.
//!
//! `plusplace` turns a latitude/longitude into short [Open Location Codes]
//! anchored to nearby named places, spells them out phonetically, and reads
//! them back. A full code like `9C3XGWG8+7GV` becomes `G8+7GV, City of London
//! England`, which is easier to read over a radio or a phone line.
//!
//! # Features
//!
//! - **Ranked short codes** - Several anchors per location, ordered so that the
//!   nearest and the most notable places both surface early
//! - **Phonetic spelling** - Every code also comes out as NATO letters and digit words
//! - **Always an answer** - The full code closes every listing, even with no anchors
//! - **Parsing** - Reads full codes, anchored short codes and grid references back
//! - **Autocomplete** - Suggests anchors while a short code is being typed
//! - **Grid references** - British National Grid reference where coverage allows
//! - **Offline** - The place index is a local file; no network calls
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() {
//! for code in plusplace::short_codes(51.525736, -0.083704, 5) {
//!     println!("{code}");
//! }
//! // G8+7GV, Shoreditch England
//! // G8+7GV, City of London England
//! // ...
//! // 9C3XGWG8+7GV
//! # }
//! ```
//!
//! With an explicit index instead of the process-wide one:
//!
//! ```
//! use plusplace::{Hierarchy, Location, PlaceIndexBuilder, PlaceRecord};
//!
//! let mut builder = PlaceIndexBuilder::new();
//! builder.insert(PlaceRecord {
//!     id: "7".into(),
//!     name: "Brodick".into(),
//!     country: "Scotland".into(),
//!     latitude: 55.5760,
//!     longitude: -5.1510,
//!     hierarchy: Hierarchy::VILLAGE,
//! });
//! let index = builder.build();
//!
//! let here = Location::from_lat_lon(55.57626681325015, -5.145275200193704, &index);
//! assert_eq!(here.short_codes(5), ["G3+GV5, Brodick Scotland", "9C7PHVG3+GV5"]);
//! assert_eq!(here.os_grid_ref(), Some("NS 01823 35892"));
//!
//! let back = Location::parse("G3+GV5, Brodick", &index);
//! assert_eq!(back.plus_code(), Some("9C7PHVG3+GV5"));
//! ```
//!
//! # Architecture
//!
//! ## Place Index
//!
//! Places are filed under the 4, 6, 8 and 11 character prefixes of their own
//! plus code (the *tile keys*). On disk the index is either a JSON extract or
//! a packed binary database:
//!
//! - **String Interning**: names and countries stored once
//! - **Fixed-Point Coordinates**: 32-bit integers instead of 64-bit floats
//! - **Tile Map**: tile key to place indices
//!
//! ## Ranking Algorithm
//!
//! 1. Sample the 3×3 neighbourhood of the coordinate at four code resolutions (36 tile keys)
//! 2. Shorten the full code against every place found; drop anchors that do not shorten it
//! 3. Sort once by (code length, notability, distance) and once by (code length, distance)
//! 4. Interleave the two orders nearest first, dropping repeated renderings
//! 5. Append the full code
//!
//! Work per call is bounded by the 36 samples, so a lookup stays well under a
//! millisecond even against a national gazetteer.
//!
//! # Thread Safety
//!
//! The index is never mutated after loading, and [`PlaceIndex::global`] lives in
//! a static `OnceLock`. [`Location`] caches its derived codes in `OnceLock`s, so
//! a handle can be shared between threads and concurrent first reads are safe.
//!
//! # Configuration
//!
//! The process-wide index is read from the file named by `PLUSPLACE_INDEX`
//! (see [`Config`]). Without it every location still gets its full code.
//!
//! # Limitations
//!
//! - **Coverage**: Short codes only exist near indexed places
//! - **Grid references**: Great Britain only
//! - **Names**: A name shared by two equally notable places is not indexed
//!
//! [Open Location Codes]: https://github.com/google/open-location-code

#![warn(missing_docs)]

mod builder;
pub mod codec;
pub mod config;
mod database;
mod error;
mod location;
pub mod parser;
pub mod phonetic;
pub mod ranking;
pub mod tiles;
pub mod types;

pub use builder::PlaceIndexBuilder;
pub use config::Config;
pub use database::PlaceIndex;
pub use error::{Error, Result};
pub use location::Location;
pub use ranking::Resolution;
pub use types::{CompactPlace, Coordinate, Database, Hierarchy, PlaceRecord, RankedResult};

/// Ranked short codes for a coordinate, anchored against the process-wide index.
///
/// Returns at most `limit` entries. When fewer anchors exist the full code is
/// still the last entry, so the result is only empty for `limit == 0` or a
/// non-finite coordinate.
///
/// # Examples
///
/// ```no_run
/// # fn main() {
/// let codes = plusplace::short_codes(55.576266, -5.145275, 3);
/// println!("{}", codes[0]);
/// # }
/// ```
pub fn short_codes(latitude: f64, longitude: f64, limit: usize) -> Vec<String> {
    Location::new(Coordinate::new(latitude, longitude))
        .short_codes(limit)
        .into_iter()
        .map(String::from)
        .collect()
}

/// Phonetic renderings matching [`short_codes`] entry for entry.
pub fn phonetic_codes(latitude: f64, longitude: f64, limit: usize) -> Vec<String> {
    Location::new(Coordinate::new(latitude, longitude))
        .phonetic_codes(limit)
        .into_iter()
        .map(String::from)
        .collect()
}
