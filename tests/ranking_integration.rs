//! End-to-end ranking against the fixture gazetteer.
//!
//! Run with: `cargo test --test ranking_integration`

mod common;

use common::{fixture_index, ARRAN, DONEGAL, LONDON, LONDON_CODES, SALT_LAKE};
use plusplace::{codec, Coordinate, Location};
use rustc_hash::FxHashSet;

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn london_interleaves_nearest_and_most_notable() {
    let index = fixture_index();
    let here = Location::from_lat_lon(LONDON.0, LONDON.1, &index);

    assert_eq!(here.plus_code(), Some("9C3XGWG8+7GV"));
    assert_eq!(here.short_codes(usize::MAX), LONDON_CODES);
    assert_eq!(here.short_codes(5), LONDON_CODES[..5]);
    assert_eq!(here.short_code(), Some("G8+7GV, Shoreditch England"));
    assert_eq!(
        here.phonetic_code(),
        Some("Golf Eight Plus Seven Golf Victor, Shoreditch, England")
    );
    assert_eq!(here.os_grid_ref(), Some("TQ 33035 82498"));
}

#[test]
fn arran_prefers_the_village() {
    let index = fixture_index();
    let here = Location::from_lat_lon(ARRAN.0, ARRAN.1, &index);
    assert_eq!(
        here.short_codes(5),
        [
            "G3+GV5, Brodick Scotland",
            "HVG3+GV5, Strathwhillan Scotland",
            "9C7PHVG3+GV5",
        ]
    );
    assert_eq!(here.os_grid_ref(), Some("NS 01823 35892"));
}

#[test]
fn salt_lake_city_has_codes_but_no_grid_reference() {
    let index = fixture_index();
    let here = Location::from_lat_lon(SALT_LAKE.0, SALT_LAKE.1, &index);
    assert_eq!(
        here.short_codes(5),
        [
            "Q2XF+C84, Salt Lake City United States",
            "Q2XF+C84, Magna United States",
            "85GCQ2XF+C84",
        ]
    );
    assert_eq!(here.os_grid_ref(), None);
}

#[test]
fn unanchored_location_falls_back_to_full_code() {
    let index = fixture_index();
    let here = Location::from_lat_lon(DONEGAL.0, DONEGAL.1, &index);
    assert_eq!(here.short_codes(5), ["9C6JRX9C+6HX"]);
    assert_eq!(
        here.phonetic_codes(5),
        ["Nine Charlie Six Juliet Romeo Xray Nine Charlie Plus Six Hotel Xray"]
    );
}

// ============================================================================
// Properties
// ============================================================================

const SAMPLE_POINTS: [(f64, f64); 4] = [LONDON, ARRAN, SALT_LAKE, DONEGAL];

#[test]
fn full_code_closes_every_listing() {
    let index = fixture_index();
    for (lat, lon) in SAMPLE_POINTS {
        let here = Location::from_lat_lon(lat, lon, &index);
        let resolution = here.resolution().unwrap();
        let last = resolution.results().last().unwrap();
        assert_eq!(Some(last.short_code.as_str()), here.plus_code());
        assert!(codec::is_full(&last.short_code));

        let area = codec::olc::decode(&last.short_code).unwrap();
        assert!(area.south - 1e-9 <= lat && lat <= area.north + 1e-9, "{lat}");
        assert!(area.west - 1e-9 <= lon && lon <= area.east + 1e-9, "{lon}");
    }
}

#[test]
fn entries_are_unique_and_aligned() {
    let index = fixture_index();
    for (lat, lon) in SAMPLE_POINTS {
        let here = Location::from_lat_lon(lat, lon, &index);
        let codes = here.short_codes(usize::MAX);
        let spoken = here.phonetic_codes(usize::MAX);
        assert_eq!(codes.len(), spoken.len());

        let unique: FxHashSet<&str> = codes.iter().copied().collect();
        assert_eq!(unique.len(), codes.len());

        for (code, words) in codes.iter().zip(&spoken) {
            let head = code.split(", ").next().unwrap();
            assert!(words.starts_with(&plusplace::phonetic::to_phonetic(head)), "{code}");
        }
    }
}

#[test]
fn shorter_limits_are_prefixes() {
    let index = fixture_index();
    let here = Location::from_lat_lon(LONDON.0, LONDON.1, &index);
    let all = here.short_codes(usize::MAX);
    for limit in 0..=all.len() + 1 {
        let some = here.short_codes(limit);
        assert_eq!(some.len(), limit.min(all.len()));
        assert_eq!(some, all[..some.len()]);
    }
}

#[test]
fn anchored_codes_are_never_longer_than_the_full_code() {
    let index = fixture_index();
    for (lat, lon) in SAMPLE_POINTS {
        let here = Location::from_lat_lon(lat, lon, &index);
        let full_len = here.plus_code().unwrap().len();
        for code in here.short_codes(usize::MAX) {
            let head = code.split(", ").next().unwrap();
            assert!(head.len() <= full_len, "{code}");
        }
    }
}

#[test]
fn every_short_code_reads_back_to_the_same_cell() {
    let index = fixture_index();
    for (lat, lon) in SAMPLE_POINTS {
        let here = Location::from_coordinate(Coordinate::new(lat, lon), &index);
        for code in here.short_codes(usize::MAX) {
            let back = Location::parse(code, &index);
            assert_eq!(back.plus_code(), here.plus_code(), "{code}");
        }
    }
}
