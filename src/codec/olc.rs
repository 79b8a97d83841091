//! Open Location Code (plus code) primitives.
//!
//! Integer-based encoding as used by the reference implementations: the
//! coordinate is scaled to the finest grid once and digits are peeled off
//! from the least significant end, which avoids floating point drift in the
//! higher digits.

use crate::error::{Error, Result};

const SEPARATOR: char = '+';
const SEPARATOR_POSITION: usize = 8;
const PADDING: char = '0';
const ALPHABET: &[u8; 20] = b"23456789CFGHJMPQRVWX";
const ENCODING_BASE: i64 = 20;
const LATITUDE_MAX: f64 = 90.0;
const LONGITUDE_MAX: f64 = 180.0;
const MAX_DIGIT_COUNT: usize = 15;
const PAIR_CODE_LENGTH: usize = 10;
const PAIR_FIRST_PLACE_VALUE: i64 = 160_000;
const PAIR_PRECISION: i64 = 8_000;
const PAIR_RESOLUTIONS: [f64; 5] = [20.0, 1.0, 0.05, 0.0025, 0.000125];
const GRID_COLUMNS: i64 = 4;
const GRID_ROWS: i64 = 5;
const GRID_CODE_LENGTH: u32 = (MAX_DIGIT_COUNT - PAIR_CODE_LENGTH) as u32;
const GRID_LAT_FIRST_PLACE_VALUE: i64 = 625;
const GRID_LNG_FIRST_PLACE_VALUE: i64 = 256;
const FINAL_LAT_PRECISION: i64 = 25_000_000;
const FINAL_LNG_PRECISION: i64 = 8_192_000;
const MIN_TRIMMABLE_CODE_LEN: usize = 6;

/// Ten digit code, roughly 14m × 14m.
pub const CODE_PRECISION_NORMAL: usize = 10;
/// Eleven digit code, roughly 3m × 3m.
pub const CODE_PRECISION_EXTRA: usize = 11;

/// The area covered by a decoded code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeArea {
    /// Southern edge in degrees
    pub south: f64,
    /// Western edge in degrees
    pub west: f64,
    /// Northern edge in degrees
    pub north: f64,
    /// Eastern edge in degrees
    pub east: f64,
    /// Number of significant digits in the decoded code
    pub code_length: usize,
}

impl CodeArea {
    /// Center of the cell, clamped to the valid coordinate range.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + (self.north - self.south) / 2.0).min(LATITUDE_MAX),
            (self.west + (self.east - self.west) / 2.0).min(LONGITUDE_MAX),
        )
    }
}

fn digit_value(b: u8) -> Option<i64> {
    let b = b.to_ascii_uppercase();
    ALPHABET.iter().position(|&a| a == b).map(|p| p as i64)
}

fn clip_latitude(latitude: f64) -> f64 {
    latitude.clamp(-LATITUDE_MAX, LATITUDE_MAX)
}

fn normalize_longitude(longitude: f64) -> f64 {
    if (-LONGITUDE_MAX..LONGITUDE_MAX).contains(&longitude) {
        return longitude;
    }
    let wrapped = (longitude + LONGITUDE_MAX).rem_euclid(2.0 * LONGITUDE_MAX) - LONGITUDE_MAX;
    // rem_euclid can round up to the divisor
    if wrapped >= LONGITUDE_MAX {
        -LONGITUDE_MAX
    } else {
        wrapped
    }
}

fn latitude_precision(code_length: usize) -> f64 {
    if code_length <= PAIR_CODE_LENGTH {
        (ENCODING_BASE as f64).powi(code_length as i32 / -2 + 2)
    } else {
        (ENCODING_BASE as f64).powi(-3) / (GRID_ROWS as f64).powi((code_length - PAIR_CODE_LENGTH) as i32)
    }
}

/// Checks the code against the format grammar, full or short.
pub fn is_valid(code: &str) -> bool {
    let Some(sep) = code.find(SEPARATOR) else {
        return false;
    };
    if code.rfind(SEPARATOR) != Some(sep) || code.len() == 1 {
        return false;
    }
    if sep > SEPARATOR_POSITION || sep % 2 == 1 {
        return false;
    }

    if let Some(pad) = code.find(PADDING) {
        if sep < SEPARATOR_POSITION || pad == 0 {
            return false;
        }
        let run = code[pad..].bytes().take_while(|&b| b == b'0').count();
        if code[pad + run..].contains(PADDING)
            || run % 2 == 1
            || run > SEPARATOR_POSITION - 2
            || !code.ends_with(SEPARATOR)
        {
            return false;
        }
    }

    if code.len() - sep - 1 == 1 {
        return false;
    }

    code.bytes()
        .filter(|&b| b != b'+' && b != b'0')
        .all(|b| digit_value(b).is_some())
}

/// A valid code with fewer than eight digits before the separator.
pub fn is_short(code: &str) -> bool {
    is_valid(code) && code.find(SEPARATOR).is_some_and(|sep| sep < SEPARATOR_POSITION)
}

/// A valid, unshortened code whose leading digits fall on the globe.
pub fn is_full(code: &str) -> bool {
    if !is_valid(code) || is_short(code) {
        return false;
    }
    let bytes = code.as_bytes();
    let lat_ok = digit_value(bytes[0])
        .is_some_and(|v| ((v * ENCODING_BASE) as f64) < LATITUDE_MAX * 2.0);
    let lng_ok = bytes.len() < 2
        || digit_value(bytes[1])
            .is_some_and(|v| ((v * ENCODING_BASE) as f64) < LONGITUDE_MAX * 2.0);
    lat_ok && lng_ok
}

/// Encodes a position at the requested number of digits.
///
/// Lengths below 10 must be even; anything above 15 is capped.
pub fn encode(latitude: f64, longitude: f64, code_length: usize) -> Result<String> {
    if code_length < 2 || (code_length < PAIR_CODE_LENGTH && code_length % 2 == 1) {
        return Err(Error::InvalidLength(code_length));
    }
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(Error::InvalidCode(format!("{latitude}, {longitude}")));
    }
    let code_length = code_length.min(MAX_DIGIT_COUNT);

    let mut latitude = clip_latitude(latitude);
    let longitude = normalize_longitude(longitude);
    if latitude == LATITUDE_MAX {
        latitude -= latitude_precision(code_length);
    }

    let mut lat_val = (((latitude + LATITUDE_MAX) * FINAL_LAT_PRECISION as f64 * 1e6).round() / 1e6)
        .floor() as i64;
    let mut lng_val = (((longitude + LONGITUDE_MAX) * FINAL_LNG_PRECISION as f64 * 1e6).round()
        / 1e6)
        .floor() as i64;

    let mut digits = [b'2'; MAX_DIGIT_COUNT];
    if code_length > PAIR_CODE_LENGTH {
        for slot in digits[PAIR_CODE_LENGTH..].iter_mut().rev() {
            let ndx = (lat_val % GRID_ROWS) * GRID_COLUMNS + lng_val % GRID_COLUMNS;
            *slot = ALPHABET[ndx as usize];
            lat_val /= GRID_ROWS;
            lng_val /= GRID_COLUMNS;
        }
    } else {
        lat_val /= GRID_ROWS.pow(GRID_CODE_LENGTH);
        lng_val /= GRID_COLUMNS.pow(GRID_CODE_LENGTH);
    }
    for pair in (0..PAIR_CODE_LENGTH / 2).rev() {
        digits[pair * 2 + 1] = ALPHABET[(lng_val % ENCODING_BASE) as usize];
        digits[pair * 2] = ALPHABET[(lat_val % ENCODING_BASE) as usize];
        lat_val /= ENCODING_BASE;
        lng_val /= ENCODING_BASE;
    }

    let mut code = String::with_capacity(MAX_DIGIT_COUNT + 1);
    if code_length >= SEPARATOR_POSITION {
        code.extend(digits[..SEPARATOR_POSITION].iter().map(|&b| b as char));
        code.push(SEPARATOR);
        code.extend(digits[SEPARATOR_POSITION..code_length].iter().map(|&b| b as char));
    } else {
        code.extend(digits[..code_length].iter().map(|&b| b as char));
        code.extend(std::iter::repeat(PADDING).take(SEPARATOR_POSITION - code_length));
        code.push(SEPARATOR);
    }
    Ok(code)
}

/// Decodes a full code into the area it covers.
pub fn decode(code: &str) -> Result<CodeArea> {
    if !is_full(code) {
        return Err(Error::InvalidCode(code.to_string()));
    }
    let clean: Vec<i64> = code
        .bytes()
        .filter(|&b| b != b'+' && b != b'0')
        .take(MAX_DIGIT_COUNT)
        .filter_map(digit_value)
        .collect();

    let mut normal_lat = -(LATITUDE_MAX as i64) * PAIR_PRECISION;
    let mut normal_lng = -(LONGITUDE_MAX as i64) * PAIR_PRECISION;
    let mut grid_lat = 0i64;
    let mut grid_lng = 0i64;

    let digits = clean.len().min(PAIR_CODE_LENGTH);
    let mut place_value = PAIR_FIRST_PLACE_VALUE;
    for i in (0..digits).step_by(2) {
        normal_lat += clean[i] * place_value;
        normal_lng += clean.get(i + 1).copied().unwrap_or(0) * place_value;
        if i + 2 < digits {
            place_value /= ENCODING_BASE;
        }
    }
    let mut lat_precision = place_value as f64 / PAIR_PRECISION as f64;
    let mut lng_precision = place_value as f64 / PAIR_PRECISION as f64;

    if clean.len() > PAIR_CODE_LENGTH {
        let mut row_value = GRID_LAT_FIRST_PLACE_VALUE;
        let mut col_value = GRID_LNG_FIRST_PLACE_VALUE;
        let digits = clean.len().min(MAX_DIGIT_COUNT);
        for (i, &digit) in clean.iter().enumerate().take(digits).skip(PAIR_CODE_LENGTH) {
            grid_lat += (digit / GRID_COLUMNS) * row_value;
            grid_lng += (digit % GRID_COLUMNS) * col_value;
            if i + 1 < digits {
                row_value /= GRID_ROWS;
                col_value /= GRID_COLUMNS;
            }
        }
        lat_precision = row_value as f64 / FINAL_LAT_PRECISION as f64;
        lng_precision = col_value as f64 / FINAL_LNG_PRECISION as f64;
    }

    let south = normal_lat as f64 / PAIR_PRECISION as f64 + grid_lat as f64 / FINAL_LAT_PRECISION as f64;
    let west = normal_lng as f64 / PAIR_PRECISION as f64 + grid_lng as f64 / FINAL_LNG_PRECISION as f64;
    Ok(CodeArea {
        south,
        west,
        north: south + lat_precision,
        east: west + lng_precision,
        code_length: clean.len().min(MAX_DIGIT_COUNT),
    })
}

/// Removes as many leading digits as the reference point allows.
///
/// The reference must sit within 0.3 of a cell of the code center at the
/// trimmed resolution; otherwise the code comes back unchanged.
pub fn shorten(code: &str, latitude: f64, longitude: f64) -> Result<String> {
    if !is_full(code) || code.contains(PADDING) {
        return Err(Error::InvalidCode(code.to_string()));
    }
    let code = code.to_ascii_uppercase();
    let area = decode(&code)?;
    if area.code_length < MIN_TRIMMABLE_CODE_LEN {
        return Err(Error::InvalidCode(code));
    }

    let (center_lat, center_lng) = area.center();
    let range = (center_lat - clip_latitude(latitude))
        .abs()
        .max((center_lng - normalize_longitude(longitude)).abs());

    for i in (1..=PAIR_RESOLUTIONS.len() - 2).rev() {
        if range < PAIR_RESOLUTIONS[i] * 0.3 {
            return Ok(code[(i + 1) * 2..].to_string());
        }
    }
    Ok(code)
}

/// Restores the elided digits of a short code using the closest match to the reference.
pub fn recover_nearest(code: &str, latitude: f64, longitude: f64) -> Result<String> {
    if !is_short(code) {
        return if is_full(code) {
            Ok(code.to_ascii_uppercase())
        } else {
            Err(Error::InvalidCode(code.to_string()))
        };
    }
    let ref_lat = clip_latitude(latitude);
    let ref_lng = normalize_longitude(longitude);
    let code = code.to_ascii_uppercase();

    let sep = code.find(SEPARATOR).unwrap_or(SEPARATOR_POSITION);
    let padding_length = SEPARATOR_POSITION - sep;
    let resolution = (ENCODING_BASE as f64).powi(2 - (padding_length / 2) as i32);
    let half_resolution = resolution / 2.0;

    let prefix = encode(ref_lat, ref_lng, CODE_PRECISION_NORMAL)?;
    let area = decode(&format!("{}{}", &prefix[..padding_length], code))?;
    let (mut lat, mut lng) = area.center();

    if ref_lat + half_resolution < lat && lat - resolution >= -LATITUDE_MAX {
        lat -= resolution;
    } else if ref_lat - half_resolution > lat && lat + resolution <= LATITUDE_MAX {
        lat += resolution;
    }
    if ref_lng + half_resolution < lng {
        lng -= resolution;
    } else if ref_lng - half_resolution > lng {
        lng += resolution;
    }

    encode(lat, lng, area.code_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn encodes_known_positions() {
        assert_eq!(encode(51.52573553231748, -0.08370366791166943, 11).unwrap(), "9C3XGWG8+7GV");
        assert_eq!(encode(54.818105429866606, -7.028511272251086, 11).unwrap(), "9C6JRX9C+6HX");
        assert_eq!(encode(50.2, -5.0, 11).unwrap(), "9C2Q6222+222");
        assert_eq!(encode(40.798514, -111.976673, 11).unwrap(), "85GCQ2XF+C84");
    }

    #[test]
    fn pads_short_lengths() {
        assert_eq!(encode(51.525736, -0.083704, 4).unwrap(), "9C3X0000+");
        assert_eq!(encode(51.525736, -0.083704, 6).unwrap(), "9C3XGW00+");
        assert_eq!(encode(51.525736, -0.083704, 8).unwrap(), "9C3XGWG8+");
        assert_eq!(encode(51.525736, -0.083704, 10).unwrap(), "9C3XGWG8+7G");
    }

    #[test]
    fn rejects_odd_short_lengths() {
        assert!(matches!(encode(0.0, 0.0, 5), Err(Error::InvalidLength(5))));
        assert!(matches!(encode(0.0, 0.0, 1), Err(Error::InvalidLength(1))));
    }

    #[test]
    fn rejects_non_finite_positions() {
        assert!(encode(f64::NAN, 0.0, 11).is_err());
        assert!(encode(0.0, f64::INFINITY, 11).is_err());
    }

    #[test]
    fn wraps_out_of_range_longitudes() {
        assert_eq!(encode(51.525736, 359.916296, 11).unwrap(), encode(51.525736, -0.083704, 11).unwrap());
        assert_eq!(encode(0.0, 540.0, 10).unwrap(), encode(0.0, -180.0, 10).unwrap());
        assert_eq!(normalize_longitude(-900.0), -180.0);
    }

    #[test]
    fn huge_longitudes_finish() {
        assert!(encode(0.0, 1e20, 10).is_ok());
        assert!(encode(0.0, -1e300, 10).is_ok());
        assert!(recover_nearest("G8+7GV", 51.5, 1e20).is_ok());
        let range = normalize_longitude(f64::MAX);
        assert!((-180.0..180.0).contains(&range), "{range}");
    }

    #[test]
    fn decodes_to_containing_cell() {
        let area = decode("9C3XGWG8+7GV").unwrap();
        assert_eq!(area.code_length, 11);
        assert!(area.south <= 51.525736 && 51.525736 < area.north);
        assert!(area.west <= -0.083704 && -0.083704 < area.east);
        let (lat, lng) = area.center();
        assert_abs_diff_eq!(lat, 51.5257375, epsilon = 1e-6);
        assert_abs_diff_eq!(lng, -0.083703125, epsilon = 1e-6);
    }

    #[test]
    fn validates_grammar() {
        assert!(is_valid("9C3XGWG8+7GV"));
        assert!(is_valid("9C3X0000+"));
        assert!(is_valid("G8+7GV"));
        assert!(!is_valid("9C3XGWG8+7"));
        assert!(!is_valid("9C3XGWG8"));
        assert!(!is_valid("0C3X0000+"));
        assert!(!is_valid("9C3X0000+7G"));
        assert!(!is_valid("9C3XGWG8+7GA"));
        assert!(is_short("G8+7GV"));
        assert!(!is_short("9C3XGWG8+7GV"));
        assert!(is_full("9C3XGWG8+7GV"));
        assert!(!is_full("G8+7GV"));
    }

    #[test]
    fn shortens_against_nearby_reference() {
        // City of London sits within 0.015 degrees of the cell center
        assert_eq!(shorten("9C3XGWG8+7GV", 51.51279, -0.09184).unwrap(), "G8+7GV");
        // Islington is further out and only saves four digits
        assert_eq!(shorten("9C3XGWG8+7GV", 51.5362, -0.1033).unwrap(), "GWG8+7GV");
        // Salt Lake City is no help at all
        assert_eq!(shorten("9C3XGWG8+7GV", 40.7608, -111.8910).unwrap(), "9C3XGWG8+7GV");
    }

    #[test]
    fn refuses_to_shorten_padded_codes() {
        assert!(shorten("9C3X0000+", 51.5, -0.1).is_err());
        assert!(shorten("G8+7GV", 51.5, -0.1).is_err());
    }

    #[test]
    fn recovers_against_reference() {
        assert_eq!(recover_nearest("G8+7GV", 51.51279, -0.09184).unwrap(), "9C3XGWG8+7GV");
        assert_eq!(recover_nearest("g8+7gv", 51.51279, -0.09184).unwrap(), "9C3XGWG8+7GV");
        assert_eq!(recover_nearest("9c3xgwg8+7gv", 0.0, 0.0).unwrap(), "9C3XGWG8+7GV");
        assert!(recover_nearest("nonsense", 0.0, 0.0).is_err());
    }
}
