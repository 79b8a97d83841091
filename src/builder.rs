//! In-process construction of a [`PlaceIndex`].
//!
//! Places are filed under the 4, 6, 8 and 11 character prefixes of their own
//! ten digit plus code, the same keys the candidate generator samples.

use crate::codec::{self, CODE_PRECISION_NORMAL};
use crate::database::PlaceIndex;
use crate::types::{Coordinate, PlaceRecord};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Prefix lengths a place is filed under.
pub const TILE_KEY_LENGTHS: [usize; 4] = [4, 6, 8, 11];

/// Collects places and resolves name clashes before freezing them into an index.
///
/// Two rules keep every name in the index unambiguous:
///
/// - a repeated identifier is ignored;
/// - when two places share a name, the more notable one keeps it; if they are
///   equally notable, neither does.
///
/// ```
/// use plusplace::{Hierarchy, PlaceIndexBuilder, PlaceRecord};
///
/// let mut builder = PlaceIndexBuilder::new();
/// builder.insert(PlaceRecord {
///     id: "1".into(),
///     name: "Brodick".into(),
///     country: "Scotland".into(),
///     latitude: 55.5760,
///     longitude: -5.1510,
///     hierarchy: Hierarchy::VILLAGE,
/// });
/// let index = builder.build();
/// assert_eq!(index.lookup("9C7P").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct PlaceIndexBuilder {
    places: Vec<PlaceRecord>,
    ids: FxHashSet<String>,
    names: FxHashMap<String, usize>,
    blocked: FxHashSet<usize>,
}

impl PlaceIndexBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a place, applying the identifier and name rules.
    pub fn insert(&mut self, place: PlaceRecord) -> &mut Self {
        if !self.ids.insert(place.id.clone()) {
            debug!(id = %place.id, "duplicate place id ignored");
            return self;
        }

        if let Some(&other) = self.names.get(&place.name) {
            let existing = self.places[other].hierarchy;
            if existing > place.hierarchy {
                debug!(name = %place.name, "more notable namesake already indexed");
                return self;
            }
            self.blocked.insert(other);
            if existing == place.hierarchy {
                debug!(name = %place.name, "ambiguous name dropped");
                return self;
            }
        }

        self.names.insert(place.name.clone(), self.places.len());
        self.places.push(place);
        self
    }

    /// Adds every place from an iterator.
    pub fn extend(&mut self, places: impl IntoIterator<Item = PlaceRecord>) -> &mut Self {
        for place in places {
            self.insert(place);
        }
        self
    }

    /// Freezes the surviving places into an index.
    pub fn build(self) -> PlaceIndex {
        let mut tiles: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        let places: Vec<PlaceRecord> = self
            .places
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !self.blocked.contains(idx))
            .map(|(_, place)| place)
            .collect();

        for (idx, place) in places.iter().enumerate() {
            let code = match codec::encode(
                &Coordinate::new(place.latitude, place.longitude),
                CODE_PRECISION_NORMAL,
            ) {
                Ok(code) => code,
                Err(err) => {
                    debug!(id = %place.id, %err, "place cannot be encoded");
                    continue;
                }
            };
            for length in TILE_KEY_LENGTHS {
                tiles.entry(code[..length].to_string()).or_default().push(idx as u32);
            }
        }

        PlaceIndex::from_parts(places, tiles)
    }
}
