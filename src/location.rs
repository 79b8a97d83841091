//! The per-coordinate handle.
//!
//! A [`Location`] is fixed at construction. Everything derived from it (the
//! full code, the ranked short codes, the grid reference) is computed on
//! first request and cached; computing twice gives the same answer, so the
//! caches are plain `OnceLock`s and the handle can be shared across threads.

use crate::codec::{self, CODE_PRECISION_EXTRA};
use crate::database::PlaceIndex;
use crate::parser::{self, ParsedLocation};
use crate::ranking::{self, Resolution};
use crate::types::Coordinate;
use std::sync::OnceLock;
use tracing::{debug, info};

/// A position (or the reason there is none) plus its cached representations.
///
/// # Examples
///
/// ```
/// use plusplace::{Location, PlaceIndex};
///
/// let index = PlaceIndex::empty();
/// let here = Location::from_lat_lon(51.525736, -0.083704, &index);
/// assert_eq!(here.plus_code(), Some("9C3XGWG8+7GV"));
/// assert_eq!(here.short_codes(5), ["9C3XGWG8+7GV"]);
/// assert_eq!(here.os_grid_ref(), Some("TQ 33035 82498"));
/// ```
#[derive(Debug)]
pub struct Location<'a> {
    position: Option<Coordinate>,
    failure: Option<String>,
    index: &'a PlaceIndex,
    plus_code: OnceLock<Option<String>>,
    resolution: OnceLock<Option<Resolution>>,
    grid_ref: OnceLock<Option<String>>,
}

impl<'a> Location<'a> {
    fn with_position(position: Option<Coordinate>, index: &'a PlaceIndex) -> Self {
        Self {
            position,
            failure: None,
            index,
            plus_code: OnceLock::new(),
            resolution: OnceLock::new(),
            grid_ref: OnceLock::new(),
        }
    }

    /// Wraps a captured coordinate.
    pub fn from_coordinate(coordinate: Coordinate, index: &'a PlaceIndex) -> Self {
        Self::with_position(Some(coordinate), index)
    }

    /// Wraps a bare latitude/longitude pair.
    pub fn from_lat_lon(latitude: f64, longitude: f64, index: &'a PlaceIndex) -> Self {
        Self::from_coordinate(Coordinate::new(latitude, longitude), index)
    }

    /// Builds a location from user text: a full plus code, a short plus code
    /// followed by an anchor name, or a grid reference.
    ///
    /// A short code is only recovered when its anchor text matches exactly one
    /// place. Anything else yields a location without a position, which
    /// [`is_valid`](Self::is_valid) reports.
    pub fn parse(input: &str, index: &'a PlaceIndex) -> Self {
        let position = match parser::parse_location_string(input, index) {
            ParsedLocation::PlusCode(parsed) => {
                let code = match parsed.places.as_slice() {
                    [anchor] if codec::is_short(&parsed.code) => {
                        codec::recover_nearest(&parsed.code, anchor.latitude, anchor.longitude)
                            .unwrap_or_else(|err| {
                                debug!(%err, code = %parsed.code, "recovery failed");
                                parsed.code.clone()
                            })
                    }
                    _ => parsed.code.clone(),
                };
                if codec::is_full(&code) {
                    codec::decode_center(&code).ok()
                } else {
                    debug!(code = %code, anchors = parsed.places.len(), "short code left unresolved");
                    None
                }
            }
            ParsedLocation::GridRef(grid) => Some(codec::grid_to_coordinate(&grid)),
            ParsedLocation::Unresolved => None,
        };
        Self::with_position(position, index)
    }

    /// A location that could not be acquired upstream.
    ///
    /// The message is shown verbatim by [`display`](Self::display).
    pub fn failed(message: impl Into<String>, index: &'a PlaceIndex) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::with_position(None, index)
        }
    }

    /// True once a position is known.
    pub fn is_valid(&self) -> bool {
        self.position.is_some()
    }

    /// The underlying coordinate.
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.position.as_ref()
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> Option<f64> {
        self.position.map(|p| p.latitude)
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> Option<f64> {
        self.position.map(|p| p.longitude)
    }

    /// Altitude in metres, when the source reported one.
    pub fn altitude(&self) -> Option<f64> {
        self.position.and_then(|p| p.altitude)
    }

    /// Radius of uncertainty in metres, or zero when unknown.
    pub fn accuracy(&self) -> f64 {
        self.position.and_then(|p| p.accuracy).unwrap_or(0.0)
    }

    /// The upstream failure message, if any.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Eleven digit plus code.
    pub fn plus_code(&self) -> Option<&str> {
        self.plus_code
            .get_or_init(|| {
                let position = self.position?;
                codec::encode(&position, CODE_PRECISION_EXTRA).ok()
            })
            .as_deref()
    }

    /// The full ranking, computed on first use.
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution
            .get_or_init(|| {
                let position = self.position?;
                ranking::resolve(&position, self.index)
                    .map_err(|err| debug!(%err, "ranking failed"))
                    .ok()
            })
            .as_ref()
    }

    /// The best anchored short code.
    pub fn short_code(&self) -> Option<&str> {
        self.resolution().map(Resolution::short_code)
    }

    /// The best short code, spelled out.
    pub fn phonetic_code(&self) -> Option<&str> {
        self.resolution().map(Resolution::phonetic_code)
    }

    /// Up to `limit` short codes, best first, full code last; empty without a position.
    pub fn short_codes(&self, limit: usize) -> Vec<&str> {
        self.resolution()
            .map(|r| r.short_codes(limit))
            .unwrap_or_default()
    }

    /// Phonetic renderings aligned with [`short_codes`](Self::short_codes).
    pub fn phonetic_codes(&self, limit: usize) -> Vec<&str> {
        self.resolution()
            .map(|r| r.phonetic_codes(limit))
            .unwrap_or_default()
    }

    /// National grid reference; absent outside grid coverage.
    pub fn os_grid_ref(&self) -> Option<&str> {
        self.grid_ref
            .get_or_init(|| {
                let position = self.position?;
                codec::grid_encode(&position)
                    .map_err(|err| info!(%err, "no grid reference for location"))
                    .ok()
            })
            .as_deref()
    }

    /// The text to show for this location.
    ///
    /// `cursor` picks among the phonetic codes and wraps around, so a caller
    /// can offer "try another spelling" by incrementing it. Without codes the
    /// upstream failure message is returned verbatim, or an empty string.
    pub fn display(&self, cursor: usize) -> String {
        let codes = self.phonetic_codes(usize::MAX);
        if codes.is_empty() {
            return self.failure.clone().unwrap_or_default();
        }
        codes[cursor % codes.len()].to_string()
    }
}

impl Location<'static> {
    /// Wraps a coordinate, anchoring against the process-wide index.
    pub fn new(coordinate: Coordinate) -> Self {
        Self::from_coordinate(coordinate, PlaceIndex::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PlaceIndexBuilder;
    use crate::types::{Hierarchy, PlaceRecord};
    use approx::assert_abs_diff_eq;

    fn arran() -> PlaceIndex {
        let mut builder = PlaceIndexBuilder::new();
        builder.extend([
            PlaceRecord {
                id: "7".into(),
                name: "Brodick".into(),
                country: "Scotland".into(),
                latitude: 55.5760,
                longitude: -5.1510,
                hierarchy: Hierarchy::VILLAGE,
            },
            PlaceRecord {
                id: "8".into(),
                name: "Strathwhillan".into(),
                country: "Scotland".into(),
                latitude: 55.5648,
                longitude: -5.1237,
                hierarchy: Hierarchy::HAMLET,
            },
        ]);
        builder.build()
    }

    #[test]
    fn caches_are_stable() {
        let index = arran();
        let here = Location::from_lat_lon(55.57626681325015, -5.145275200193704, &index);
        let first: Vec<String> = here.short_codes(5).into_iter().map(String::from).collect();
        assert_eq!(here.short_codes(5), first);
        assert_eq!(here.short_code(), Some("G3+GV5, Brodick Scotland"));
        assert_eq!(here.phonetic_code(), Some("Golf Three Plus Golf Victor Five, Brodick, Scotland"));
    }

    #[test]
    fn display_cycles_through_spellings() {
        let index = arran();
        let here = Location::from_lat_lon(55.57626681325015, -5.145275200193704, &index);
        let all = here.phonetic_codes(usize::MAX);
        assert_eq!(all.len(), 3);
        assert_eq!(here.display(0), all[0]);
        assert_eq!(here.display(1), all[1]);
        assert_eq!(here.display(3), all[0]);
    }

    #[test]
    fn failure_renders_verbatim() {
        let index = arran();
        let lost = Location::failed("User denied access", &index);
        assert!(!lost.is_valid());
        assert!(lost.plus_code().is_none());
        assert!(lost.short_codes(5).is_empty());
        assert!(lost.os_grid_ref().is_none());
        assert_eq!(lost.display(0), "User denied access");
    }

    #[test]
    fn accuracy_defaults_to_zero() {
        let index = PlaceIndex::empty();
        let bare = Location::from_lat_lon(55.0, -5.0, &index);
        assert_eq!(bare.accuracy(), 0.0);
        assert_eq!(bare.altitude(), None);

        let fix = Coordinate::new(55.0, -5.0).with_fix(Some(12.0), Some(30.0));
        let located = Location::from_coordinate(fix, &index);
        assert_eq!(located.accuracy(), 30.0);
        assert_eq!(located.altitude(), Some(12.0));
    }

    #[test]
    fn parses_anchored_short_code() {
        let index = arran();
        let here = Location::parse("G3+GV5, Brodick", &index);
        assert!(here.is_valid());
        assert_eq!(here.plus_code(), Some("9C7PHVG3+GV5"));
    }

    #[test]
    fn parses_full_code_to_cell_center() {
        let index = PlaceIndex::empty();
        let here = Location::parse("9C7PHVG3+GV5", &index);
        let center = codec::decode_center("9C7PHVG3+GV5").unwrap();
        assert_eq!(here.coordinate(), Some(&center));
    }

    #[test]
    fn parses_grid_reference() {
        let index = PlaceIndex::empty();
        let here = Location::parse("NS 01823 35892", &index);
        assert_abs_diff_eq!(here.latitude().unwrap(), 55.576266, epsilon = 1e-4);
        assert_abs_diff_eq!(here.longitude().unwrap(), -5.145275, epsilon = 1e-4);
        assert_eq!(here.os_grid_ref(), Some("NS 01823 35892"));
    }

    #[test]
    fn bare_digits_have_no_position() {
        let index = PlaceIndex::empty();
        for text in ["12345678", "1234 567890"] {
            let here = Location::parse(text, &index);
            assert!(!here.is_valid(), "{text}");
            assert_eq!(here.os_grid_ref(), None, "{text}");
        }
    }

    #[test]
    fn ambiguous_anchor_leaves_code_unresolved() {
        let index = arran();
        // no anchor text at all
        assert!(!Location::parse("G3+GV5", &index).is_valid());
        // unknown anchor
        assert!(!Location::parse("G3+GV5, Lamlash", &index).is_valid());
        // garbage
        assert!(!Location::parse("where am I", &index).is_valid());
    }
}
