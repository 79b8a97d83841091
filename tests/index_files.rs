//! Loading the place index from disk and through the environment config.
//!
//! Run with: `cargo test --test index_files`

mod common;

use common::{fixture_index, records, LONDON, LONDON_CODES};
use plusplace::{Config, Location, PlaceIndex};
use std::io::Write;

fn json_extract() -> String {
    let mut entries = serde_json::Map::new();
    let index = fixture_index();
    for place in records() {
        entries.insert(
            place.id.clone(),
            serde_json::json!({
                "id": place.id,
                "name": place.name,
                "altName": "",
                "hierarchy": place.hierarchy,
                "lat": place.latitude,
                "long": place.longitude,
                "country": place.country,
            }),
        );
    }
    for key in ["9C3X", "9C3XGW", "9C3XGV", "9C3XGWG8", "9C7P", "85GC", "85GCQ2"] {
        let ids: Vec<_> = index.lookup(key).iter().map(|p| p.id.clone()).collect();
        if !ids.is_empty() {
            entries.insert(key.to_string(), serde_json::json!(ids));
        }
    }
    serde_json::Value::Object(entries).to_string()
}

#[test]
fn packed_index_ranks_like_the_built_one() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let bytes = fixture_index().to_database().to_bytes().unwrap();
    file.write_all(&bytes).unwrap();

    let index = PlaceIndex::open(file.path()).unwrap();
    assert_eq!(index.len(), 10);
    let here = Location::from_lat_lon(LONDON.0, LONDON.1, &index);
    assert_eq!(here.short_codes(usize::MAX), LONDON_CODES);
}

#[test]
fn json_extract_is_chosen_by_extension() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(json_extract().as_bytes()).unwrap();

    let index = PlaceIndex::open(file.path()).unwrap();
    assert_eq!(index.len(), 10);
    assert_eq!(index.lookup("9C3X").len(), 6);
    assert_eq!(index.prefix_search("brod").len(), 1);
}

#[test]
fn config_names_the_index_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(json_extract().as_bytes()).unwrap();

    let config = Config {
        index_path: Some(file.path().to_path_buf()),
        ..Config::default()
    };
    assert_eq!(PlaceIndex::load(&config).unwrap().len(), 10);
    assert!(PlaceIndex::load(&Config::default()).unwrap().is_empty());
}

#[test]
fn missing_or_corrupt_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PlaceIndex::open(dir.path().join("absent.bin")).is_err());

    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(b"{ not json").unwrap();
    assert!(PlaceIndex::open(file.path()).is_err());
}
