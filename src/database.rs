use crate::config::Config;
use crate::error::Result;
use crate::types::{CompactPlace, Database, PlaceRecord, COORD_SCALE};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

static INDEX: OnceLock<PlaceIndex> = OnceLock::new();

/// Read-only lookup from tile keys and names to anchor places.
///
/// Built once (from a packed database, a JSON extract, or
/// [`PlaceIndexBuilder`](crate::PlaceIndexBuilder)) and never mutated afterwards, so a
/// shared reference can be used from any number of threads.
#[derive(Debug, Default)]
pub struct PlaceIndex {
    places: Vec<PlaceRecord>,
    tiles: FxHashMap<String, Vec<u32>>,
    names: BTreeMap<String, u32>,
}

impl PlaceIndex {
    /// The process-wide index, loaded on first use from [`Config::from_env`].
    ///
    /// A missing or unreadable index is logged and replaced by an empty one:
    /// every location still gets its full code, just no anchored short codes.
    pub fn global() -> &'static Self {
        INDEX.get_or_init(|| {
            match Config::from_env().and_then(|config| Self::load(&config)) {
                Ok(index) => index,
                Err(err) => {
                    warn!(%err, "place index unavailable, continuing without anchors");
                    Self::empty()
                }
            }
        })
    }

    /// Installs `index` as the process-wide index.
    ///
    /// Hands the index back if [`PlaceIndex::global`] was already initialized.
    pub fn set_global(index: PlaceIndex) -> std::result::Result<(), PlaceIndex> {
        INDEX.set(index)
    }

    /// An index with no places.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the index named by `config`, or an empty one if none is configured.
    pub fn load(config: &Config) -> Result<Self> {
        match &config.index_path {
            Some(path) => Self::open(path),
            None => {
                info!("no place index configured");
                Ok(Self::empty())
            }
        }
    }

    /// Reads an index file; `.json` files use the JSON layout, anything else is packed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let index = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json(std::str::from_utf8(&data).map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, e)
            })?)?
        } else {
            Self::from_bytes(&data)?
        };
        info!(path = %path.display(), places = index.len(), tiles = index.tiles.len(), "loaded place index");
        Ok(index)
    }

    /// Decodes a packed [`Database`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::from_database(Database::from_bytes(data)?))
    }

    /// Unpacks a [`Database`], resolving interned strings and fixed-point coordinates.
    pub fn from_database(db: Database) -> Self {
        let string = |i: u32| db.strings.get(i as usize).cloned().unwrap_or_default();
        let places = db
            .places
            .iter()
            .map(|p| PlaceRecord {
                id: string(p.id),
                name: string(p.name),
                country: string(p.country),
                latitude: p.lat as f64 / COORD_SCALE,
                longitude: p.lon as f64 / COORD_SCALE,
                hierarchy: p.hierarchy,
            })
            .collect();
        Self::from_parts(places, db.tiles)
    }

    /// Parses the JSON extract layout.
    ///
    /// The top-level object mixes two kinds of entry: tile keys mapping to
    /// arrays of place ids, and place ids mapping to place objects with
    /// `name`, `country`, `lat`, `long` and `hierarchy`.
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: FxHashMap<String, JsonEntry> = serde_json::from_str(text)?;

        let mut places = Vec::new();
        let mut by_id: FxHashMap<String, u32> = FxHashMap::default();
        for (key, entry) in &entries {
            if let JsonEntry::Place(place) = entry {
                let id = place.id.as_ref().map(JsonId::to_string).unwrap_or_else(|| key.clone());
                by_id.insert(key.clone(), places.len() as u32);
                places.push(PlaceRecord {
                    id,
                    name: place.name.clone(),
                    country: place.country.clone(),
                    latitude: place.lat,
                    longitude: place.long,
                    hierarchy: place.hierarchy,
                });
            }
        }

        let mut tiles: FxHashMap<String, Vec<u32>> = FxHashMap::default();
        for (key, entry) in entries {
            if let JsonEntry::Tile(ids) = entry {
                let resolved: Vec<u32> = ids
                    .iter()
                    .filter_map(|id| {
                        let found = by_id.get(&id.to_string()).copied();
                        if found.is_none() {
                            debug!(tile = %key, id = %id.to_string(), "tile references unknown place");
                        }
                        found
                    })
                    .collect();
                if !resolved.is_empty() {
                    tiles.insert(key, resolved);
                }
            }
        }

        Ok(Self::from_parts(places, tiles))
    }

    pub(crate) fn from_parts(places: Vec<PlaceRecord>, tiles: FxHashMap<String, Vec<u32>>) -> Self {
        let names = places
            .iter()
            .enumerate()
            .map(|(idx, p)| (p.name.to_lowercase(), idx as u32))
            .collect();
        Self {
            places,
            tiles,
            names,
        }
    }

    /// Packs the index with string interning and fixed-point coordinates.
    pub fn to_database(&self) -> Database {
        let mut string_map: FxHashMap<String, u32> = FxHashMap::default();
        let mut strings = Vec::new();
        let mut intern = |s: &str| intern_string(s, &mut string_map, &mut strings);

        let places = self
            .places
            .iter()
            .map(|p| CompactPlace {
                id: intern(&p.id),
                name: intern(&p.name),
                country: intern(&p.country),
                lat: (p.latitude * COORD_SCALE).round() as i32,
                lon: (p.longitude * COORD_SCALE).round() as i32,
                hierarchy: p.hierarchy,
            })
            .collect();

        Database {
            strings,
            places,
            tiles: self.tiles.clone(),
        }
    }

    /// Number of places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// True when the index holds no places.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Places filed under a tile key; empty for unknown keys.
    pub fn lookup(&self, tile_key: &str) -> Vec<&PlaceRecord> {
        self.tiles
            .get(tile_key)
            .map(|ids| ids.iter().filter_map(|&i| self.places.get(i as usize)).collect())
            .unwrap_or_default()
    }

    /// Places whose name starts with `prefix`, ignoring case, in name order.
    pub fn prefix_search(&self, prefix: &str) -> Vec<&PlaceRecord> {
        let prefix = prefix.to_lowercase();
        self.names
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .filter_map(|(_, &i)| self.places.get(i as usize))
            .collect()
    }

    /// Places matching a user-typed anchor fragment.
    ///
    /// That is every [`prefix_search`](Self::prefix_search) hit, plus any place
    /// whose `"{name} {country}"` rendering equals the fragment exactly, which
    /// is how ranked short codes print their anchor.
    pub fn find_named(&self, fragment: &str) -> Vec<&PlaceRecord> {
        let needle = fragment.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut found = self.prefix_search(&needle);

        for (split, _) in needle.match_indices(' ') {
            let (name, country) = (&needle[..split], &needle[split + 1..]);
            if let Some(place) = self.names.get(name).and_then(|&i| self.places.get(i as usize)) {
                if place.country.to_lowercase() == country && !found.iter().any(|p| p.id == place.id) {
                    found.push(place);
                }
            }
        }
        found
    }
}

fn intern_string(s: &str, map: &mut FxHashMap<String, u32>, strings: &mut Vec<String>) -> u32 {
    *map.entry(s.to_string()).or_insert_with(|| {
        let idx = strings.len() as u32;
        strings.push(s.to_string());
        idx
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonId {
    Text(String),
    Number(u64),
}

impl std::fmt::Display for JsonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonId::Text(s) => f.write_str(s),
            JsonId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Deserialize)]
struct JsonPlace {
    #[serde(default)]
    id: Option<JsonId>,
    name: String,
    #[serde(default)]
    country: String,
    lat: f64,
    long: f64,
    #[serde(default)]
    hierarchy: u8,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Tile(Vec<JsonId>),
    Place(JsonPlace),
}
