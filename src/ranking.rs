//! Shortcode ranking.
//!
//! Every place near the coordinate is a potential anchor. Anchors that let
//! the code shrink are ranked two ways (shortest code then most notable,
//! shortest code then nearest), the two orders are interleaved nearest
//! first, and the rendered codes are deduplicated keeping the earliest. The
//! full code always closes the list so there is at least one answer.

use crate::codec::{self, CODE_PRECISION_EXTRA};
use crate::database::PlaceIndex;
use crate::error::Result;
use crate::phonetic;
use crate::tiles;
use crate::types::{Coordinate, PlaceRecord, RankedResult};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use tracing::debug;

struct Candidate<'a> {
    place: &'a PlaceRecord,
    short_code: String,
    squared_distance: f64,
}

impl Candidate<'_> {
    fn by_notability(a: &&Self, b: &&Self) -> Ordering {
        a.short_code
            .len()
            .cmp(&b.short_code.len())
            .then_with(|| b.place.hierarchy.cmp(&a.place.hierarchy))
            .then_with(|| a.squared_distance.total_cmp(&b.squared_distance))
    }

    fn by_proximity(a: &&Self, b: &&Self) -> Ordering {
        a.short_code
            .len()
            .cmp(&b.short_code.len())
            .then_with(|| a.squared_distance.total_cmp(&b.squared_distance))
    }
}

/// The ranked codes for one coordinate, best first, full code last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    results: Vec<RankedResult>,
}

impl Resolution {
    /// Every ranked entry; never empty.
    pub fn results(&self) -> &[RankedResult] {
        &self.results
    }

    /// The unshortened plus code that closes the list.
    pub fn full_code(&self) -> &str {
        self.results.last().map(|r| r.short_code.as_str()).unwrap_or_default()
    }

    /// The best entry.
    pub fn short_code(&self) -> &str {
        self.results.first().map(|r| r.short_code.as_str()).unwrap_or_default()
    }

    /// The best entry, spelled out.
    pub fn phonetic_code(&self) -> &str {
        self.results.first().map(|r| r.phonetic.as_str()).unwrap_or_default()
    }

    /// Up to `limit` rendered codes.
    pub fn short_codes(&self, limit: usize) -> Vec<&str> {
        self.results.iter().take(limit).map(|r| r.short_code.as_str()).collect()
    }

    /// Up to `limit` phonetic renderings, index-aligned with [`short_codes`](Self::short_codes).
    pub fn phonetic_codes(&self, limit: usize) -> Vec<&str> {
        self.results.iter().take(limit).map(|r| r.phonetic.as_str()).collect()
    }

    /// Total number of entries, fallback included.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Never true for a listing returned by [`resolve`].
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Ranks the anchored short codes for `coordinate`.
///
/// Only fails if the coordinate cannot be encoded at all (non-finite input).
pub fn resolve(coordinate: &Coordinate, index: &PlaceIndex) -> Result<Resolution> {
    let full_code = codec::encode(coordinate, CODE_PRECISION_EXTRA)?;

    let candidates: Vec<Candidate> = tiles::tile_keys(coordinate)
        .iter()
        .flat_map(|key| index.lookup(key))
        .filter_map(|place| {
            let short_code = match codec::shorten(&full_code, place.latitude, place.longitude) {
                Ok(code) => code,
                Err(err) => {
                    debug!(%err, place = %place.name, "cannot shorten against place");
                    return None;
                }
            };
            (short_code.len() != full_code.len()).then(|| Candidate {
                place,
                squared_distance: coordinate.squared_distance_to(place.latitude, place.longitude),
                short_code,
            })
        })
        .collect();

    let mut by_notability: Vec<&Candidate> = candidates.iter().collect();
    by_notability.sort_by(Candidate::by_notability);
    let mut by_proximity: Vec<&Candidate> = candidates.iter().collect();
    by_proximity.sort_by(Candidate::by_proximity);

    let mut results = Vec::with_capacity(candidates.len() + 1);
    let mut seen = FxHashSet::default();
    for candidate in interleave(by_proximity, by_notability) {
        let short_code = format!(
            "{}, {} {}",
            candidate.short_code.trim(),
            candidate.place.name,
            candidate.place.country
        );
        if !seen.insert(short_code.clone()) {
            continue;
        }
        results.push(RankedResult {
            phonetic: phonetic::anchored(
                &candidate.short_code,
                &candidate.place.name,
                &candidate.place.country,
            ),
            short_code,
        });
    }

    debug!(
        code = %full_code,
        candidates = candidates.len(),
        ranked = results.len(),
        "resolved short codes"
    );

    results.push(RankedResult {
        phonetic: phonetic::to_phonetic(&full_code),
        short_code: full_code,
    });
    Ok(Resolution { results })
}

/// Alternates between the two orders, first from `first`, until both run dry.
fn interleave<T>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(first.len() + second.len());
    let (mut a, mut b) = (first.into_iter(), second.into_iter());
    loop {
        match (a.next(), b.next()) {
            (None, None) => break,
            (x, y) => out.extend(x.into_iter().chain(y)),
        }
    }
    out
}
