//! Tile keys to sample around a coordinate.
//!
//! A named place is filed under the prefixes of its own plus code. A query
//! point near a tile edge would miss the neighbour's places if only its own
//! tile were sampled, so each level is sampled on a 3×3 grid one cell wide.

use crate::codec;
use crate::types::Coordinate;
use tracing::trace;

/// `(code length, sample step in degrees)`: one cell at each length.
pub const SAMPLE_LEVELS: [(usize, f64); 4] = [(4, 1.0), (6, 0.05), (8, 0.0025), (10, 0.000125)];

/// Upper bound on the number of keys [`tile_keys`] returns.
pub const MAX_SAMPLES: usize = SAMPLE_LEVELS.len() * 9;

/// Strips padding and a dangling separator: `9C3XGW00+` -> `9C3XGW`.
pub fn strip_padding(code: &str) -> &str {
    match code.find('+') {
        Some(sep) if sep + 1 == code.len() => code[..sep].trim_end_matches('0'),
        _ => code,
    }
}

/// All tile keys around `coordinate`, coarsest first, duplicates included.
pub fn tile_keys(coordinate: &Coordinate) -> Vec<String> {
    let mut keys = Vec::with_capacity(MAX_SAMPLES);
    for (length, step) in SAMPLE_LEVELS {
        for dlat in [-step, 0.0, step] {
            for dlon in [-step, 0.0, step] {
                let sample = Coordinate::new(coordinate.latitude + dlat, coordinate.longitude + dlon);
                // lengths in SAMPLE_LEVELS are always encodable
                if let Ok(code) = codec::encode(&sample, length) {
                    keys.push(strip_padding(&code).to_string());
                }
            }
        }
    }
    trace!(count = keys.len(), "generated tile keys");
    keys
}
