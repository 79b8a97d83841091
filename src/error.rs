//! Error type shared by the codecs and the index loaders.
//!
//! Resolution and parsing never surface these to callers: a failed codec call
//! degrades to a missing field or an empty result. They exist so the lower
//! layers can use `?` and so the binaries can report load failures.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong below the public resolution surface.
#[derive(Debug, Error)]
pub enum Error {
    /// The string is not a valid Open Location Code for the requested operation.
    #[error("invalid plus code: {0}")]
    InvalidCode(String),

    /// An encode was requested at a code length the format cannot represent.
    #[error("invalid plus code length: {0}")]
    InvalidLength(usize),

    /// The string looked like a grid reference but could not be parsed as one.
    #[error("invalid grid reference: {0}")]
    InvalidGridRef(String),

    /// The coordinate projects outside the national grid.
    #[error("outside grid coverage (easting {easting:.0}, northing {northing:.0})")]
    OutOfCoverage {
        /// Projected easting in metres
        easting: f64,
        /// Projected northing in metres
        northing: f64,
    },

    /// Reading an index file failed.
    #[error("failed to read place index: {0}")]
    Io(#[from] std::io::Error),

    /// A packed index could not be decoded.
    #[error("failed to decode place index: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// A packed index could not be encoded.
    #[error("failed to encode place index: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// A JSON index could not be parsed.
    #[error("failed to parse place index JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment setting held a value that could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}
