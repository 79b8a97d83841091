//! Shared fixture: a handful of real settlements around three test points.

#![allow(dead_code)]

use plusplace::{Hierarchy, PlaceIndex, PlaceIndexBuilder, PlaceRecord};

/// Old Street, London.
pub const LONDON: (f64, f64) = (51.52573553231748, -0.08370366791166943);
/// Outside Brodick on Arran.
pub const ARRAN: (f64, f64) = (55.57626681325015, -5.145275200193704);
/// West of Salt Lake City; no National Grid coverage.
pub const SALT_LAKE: (f64, f64) = (40.798514, -111.976673);
/// Donegal; no place in the fixture is close enough to anchor it.
pub const DONEGAL: (f64, f64) = (54.818105429866606, -7.028511272251086);

pub const PLACES: &[(&str, &str, &str, f64, f64, u8)] = &[
    ("1", "City of London", "England", 51.51279, -0.09184, Hierarchy::CITY),
    ("2", "Hoxton", "England", 51.5315, -0.0790, Hierarchy::SUBURBAN_AREA),
    ("3", "Shoreditch", "England", 51.5255, -0.0788, Hierarchy::SUBURBAN_AREA),
    ("4", "Bethnal Green", "England", 51.5270, -0.0550, Hierarchy::SUBURBAN_AREA),
    ("5", "Hackney", "England", 51.5450, -0.0553, Hierarchy::TOWN),
    ("6", "Islington", "England", 51.5362, -0.1033, Hierarchy::TOWN),
    ("7", "Brodick", "Scotland", 55.5760, -5.1510, Hierarchy::VILLAGE),
    ("8", "Strathwhillan", "Scotland", 55.5648, -5.1237, Hierarchy::HAMLET),
    ("9", "Salt Lake City", "United States", 40.7608, -111.8910, Hierarchy::CITY),
    ("10", "Magna", "United States", 40.7091, -112.1016, Hierarchy::VILLAGE),
];

pub fn records() -> Vec<PlaceRecord> {
    PLACES
        .iter()
        .map(|&(id, name, country, latitude, longitude, hierarchy)| PlaceRecord {
            id: id.into(),
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
            hierarchy,
        })
        .collect()
}

pub fn fixture_index() -> PlaceIndex {
    let mut builder = PlaceIndexBuilder::new();
    builder.extend(records());
    builder.build()
}

pub const LONDON_CODES: [&str; 7] = [
    "G8+7GV, Shoreditch England",
    "G8+7GV, City of London England",
    "G8+7GV, Hoxton England",
    "GWG8+7GV, Islington England",
    "GWG8+7GV, Bethnal Green England",
    "GWG8+7GV, Hackney England",
    "9C3XGWG8+7GV",
];
