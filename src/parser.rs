//! Reading locations typed by a person.
//!
//! Two notations are understood: plus codes (full, or short with an anchor
//! name after a comma) and National Grid references. Nothing here resolves a
//! coordinate; see [`Location::parse`](crate::Location::parse) for that.

use crate::codec::{self, GridRef};
use crate::database::PlaceIndex;
use crate::types::PlaceRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static PLUS_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([23456789CFGHJMPQRVWX]{2,8}\+[23456789CFGHJMPQRVWX]{2,3})(, )?(.*)?$")
        .unwrap()
});

static GRID_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([H-T][A-Y])? ?([0-9]{3,6}) ?([0-9]{3,6})$").unwrap());

static COMPLETABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[23456789CFGHJMPQRVWX]{2,6}\+[23456789CFGHJMPQRVWX]{3}$").unwrap()
});

/// A plus code pulled out of user text, with whatever followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPlusCode<'a> {
    /// The code as typed (case preserved)
    pub code: String,
    /// Whether the code was followed by `", "`
    pub separator: bool,
    /// Text after the code, if any
    pub place_name: Option<String>,
    /// Places matching the anchor part of `place_name`
    pub places: Vec<&'a PlaceRecord>,
}

/// What a piece of user text turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLocation<'a> {
    /// A full or short plus code
    PlusCode(ParsedPlusCode<'a>),
    /// A National Grid reference
    GridRef(GridRef),
    /// Nothing recognizable
    Unresolved,
}

/// Classifies `input` as a plus code, a grid reference, or neither.
///
/// For plus codes the anchor is the trailing text up to any further `", "`,
/// so `"G3+GV5, Brodick, Scotland"` looks up `"Brodick"`.
pub fn parse_location_string<'a>(input: &str, index: &'a PlaceIndex) -> ParsedLocation<'a> {
    if let Some(caps) = PLUS_CODE.captures(input) {
        let place_name = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .filter(|name| !name.is_empty());
        let places = place_name
            .as_deref()
            .map(|name| {
                let anchor = name.split(", ").next().unwrap_or_default();
                index.find_named(anchor)
            })
            .unwrap_or_default();
        return ParsedLocation::PlusCode(ParsedPlusCode {
            code: caps[1].to_string(),
            separator: caps.get(2).is_some(),
            place_name,
            places,
        });
    }

    // digits alone are not a grid reference without the 100 km square letters
    if GRID_REF.captures(input).is_some_and(|caps| caps.get(1).is_some()) {
        match codec::grid_parse(input) {
            Ok(grid) => return ParsedLocation::GridRef(grid),
            Err(err) => debug!(%err, "grid-shaped input rejected"),
        }
    }

    ParsedLocation::Unresolved
}

/// Completions for a partially typed short code.
///
/// A bare short code gets the separator appended, inviting an anchor name.
/// After the separator, every place whose name starts with the typed text is
/// offered as `"{code}, {name}, {country}"`.
///
/// ```
/// use plusplace::{parser, PlaceIndex};
///
/// let index = PlaceIndex::empty();
/// assert_eq!(parser::auto_complete("G8+7GV", &index), ["G8+7GV, "]);
/// assert!(parser::auto_complete("9C3XGWG8+7GV", &index).is_empty());
/// ```
pub fn auto_complete(input: &str, index: &PlaceIndex) -> Vec<String> {
    let ParsedLocation::PlusCode(parsed) = parse_location_string(input, index) else {
        return Vec::new();
    };

    if !parsed.separator {
        if COMPLETABLE.is_match(&parsed.code) {
            return vec![format!("{}, ", parsed.code)];
        }
        return Vec::new();
    }

    match parsed.place_name.as_deref() {
        Some(fragment) => index
            .prefix_search(fragment)
            .into_iter()
            .map(|place| format!("{}, {}, {}", parsed.code, place.name, place.country))
            .collect(),
        None => Vec::new(),
    }
}
