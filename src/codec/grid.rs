//! British National Grid references.
//!
//! WGS84 positions are moved onto the OSGB36 datum with a seven-parameter
//! Helmert transform and then projected with the Ordnance Survey transverse
//! Mercator series. The reverse path iterates the meridional arc to recover
//! latitude before undoing the datum shift.

use crate::error::{Error, Result};
use crate::types::Coordinate;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

struct Ellipsoid {
    a: f64,
    f: f64,
}

const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    f: 1.0 / 298.257_223_563,
};

const AIRY1830: Ellipsoid = Ellipsoid {
    a: 6_377_563.396,
    f: 1.0 / 299.324_964_6,
};

/// WGS84 -> OSGB36: translation (m), scale (ppm), rotation (arcsec).
struct Helmert {
    tx: f64,
    ty: f64,
    tz: f64,
    s: f64,
    rx: f64,
    ry: f64,
    rz: f64,
}

const TO_OSGB36: Helmert = Helmert {
    tx: -446.448,
    ty: 125.157,
    tz: -542.060,
    s: 20.4894,
    rx: -0.1502,
    ry: -0.2470,
    rz: -0.8421,
};

impl Helmert {
    fn inverse(&self) -> Helmert {
        Helmert {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            s: -self.s,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
        }
    }

    fn apply(&self, (x, y, z): (f64, f64, f64)) -> (f64, f64, f64) {
        let s1 = self.s / 1e6 + 1.0;
        let rx = (self.rx / 3600.0).to_radians();
        let ry = (self.ry / 3600.0).to_radians();
        let rz = (self.rz / 3600.0).to_radians();
        (
            self.tx + x * s1 - y * rz + z * ry,
            self.ty + x * rz + y * s1 - z * rx,
            self.tz - x * ry + y * rx + z * s1,
        )
    }
}

fn to_cartesian(latitude: f64, longitude: f64, ellipsoid: &Ellipsoid) -> (f64, f64, f64) {
    let phi = latitude.to_radians();
    let lambda = longitude.to_radians();
    let e2 = 2.0 * ellipsoid.f - ellipsoid.f * ellipsoid.f;
    let nu = ellipsoid.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
    (
        nu * phi.cos() * lambda.cos(),
        nu * phi.cos() * lambda.sin(),
        nu * (1.0 - e2) * phi.sin(),
    )
}

// Bowring's method, accurate to well under a millimetre at the surface.
fn from_cartesian((x, y, z): (f64, f64, f64), ellipsoid: &Ellipsoid) -> (f64, f64) {
    let a = ellipsoid.a;
    let b = a * (1.0 - ellipsoid.f);
    let e2 = 2.0 * ellipsoid.f - ellipsoid.f * ellipsoid.f;
    let eps2 = e2 / (1.0 - e2);
    let p = x.hypot(y);
    let r = p.hypot(z);

    let tan_beta = (b * z) / (a * p) * (1.0 + eps2 * b / r);
    let sin_beta = tan_beta / (1.0 + tan_beta * tan_beta).sqrt();
    let cos_beta = 1.0 / (1.0 + tan_beta * tan_beta).sqrt();

    let phi = (z + eps2 * b * sin_beta.powi(3)).atan2(p - e2 * a * cos_beta.powi(3));
    let lambda = y.atan2(x);
    (phi.to_degrees(), lambda.to_degrees())
}

// National Grid projection constants.
const A: f64 = 6_377_563.396;
const B: f64 = 6_356_256.909;
const F0: f64 = 0.999_601_271_7;
const PHI0_DEG: f64 = 49.0;
const LAMBDA0_DEG: f64 = -2.0;
const N0: f64 = -100_000.0;
const E0: f64 = 400_000.0;

const MAX_EASTING: f64 = 700_000.0;
const MAX_NORTHING: f64 = 1_300_000.0;
const MAX_ARC_ITERATIONS: usize = 64;

fn meridional_arc(phi: f64) -> f64 {
    let phi0 = PHI0_DEG.to_radians();
    let n = (A - B) / (A + B);
    let (n2, n3) = (n * n, n * n * n);
    let ma = (1.0 + n + 1.25 * n2 + 1.25 * n3) * (phi - phi0);
    let mb = (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * (phi - phi0).sin() * (phi + phi0).cos();
    let mc = (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3)
        * (2.0 * (phi - phi0)).sin()
        * (2.0 * (phi + phi0)).cos();
    let md = 35.0 / 24.0 * n3 * (3.0 * (phi - phi0)).sin() * (3.0 * (phi + phi0)).cos();
    B * F0 * (ma - mb + mc - md)
}

/// A position on the National Grid, in metres from the false origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRef {
    /// Metres east of the false origin
    pub easting: f64,
    /// Metres north of the false origin
    pub northing: f64,
}

impl GridRef {
    /// Projects a WGS84 coordinate onto the grid.
    ///
    /// Fails with [`Error::OutOfCoverage`] when the projected point falls
    /// outside the 700 km × 1300 km grid extent.
    pub fn from_coordinate(coordinate: &Coordinate) -> Result<Self> {
        let cartesian = to_cartesian(coordinate.latitude, coordinate.longitude, &WGS84);
        let (lat, lon) = from_cartesian(TO_OSGB36.apply(cartesian), &AIRY1830);

        let phi = lat.to_radians();
        let lambda = lon.to_radians();
        let e2 = 1.0 - (B * B) / (A * A);
        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan2 = phi.tan().powi(2);

        let nu = A * F0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let rho = A * F0 * (1.0 - e2) / (1.0 - e2 * sin_phi * sin_phi).powf(1.5);
        let eta2 = nu / rho - 1.0;

        let i = meridional_arc(phi) + N0;
        let ii = nu / 2.0 * sin_phi * cos_phi;
        let iii = nu / 24.0 * sin_phi * cos_phi.powi(3) * (5.0 - tan2 + 9.0 * eta2);
        let iiia = nu / 720.0 * sin_phi * cos_phi.powi(5) * (61.0 - 58.0 * tan2 + tan2 * tan2);
        let iv = nu * cos_phi;
        let v = nu / 6.0 * cos_phi.powi(3) * (nu / rho - tan2);
        let vi = nu / 120.0
            * cos_phi.powi(5)
            * (5.0 - 18.0 * tan2 + tan2 * tan2 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        let d = lambda - LAMBDA0_DEG.to_radians();
        let northing = i + ii * d.powi(2) + iii * d.powi(4) + iiia * d.powi(6);
        let easting = E0 + iv * d + v * d.powi(3) + vi * d.powi(5);

        // millimetre precision
        let easting = (easting * 1000.0).round() / 1000.0;
        let northing = (northing * 1000.0).round() / 1000.0;

        if !(0.0..=MAX_EASTING).contains(&easting) || !(0.0..=MAX_NORTHING).contains(&northing) {
            return Err(Error::OutOfCoverage { easting, northing });
        }
        Ok(Self { easting, northing })
    }

    /// Converts back to a WGS84 coordinate.
    pub fn to_coordinate(&self) -> Coordinate {
        let phi0 = PHI0_DEG.to_radians();
        let e2 = 1.0 - (B * B) / (A * A);

        let mut phi = phi0;
        let mut m = 0.0;
        // converges in a handful of steps; NaN never does
        for _ in 0..MAX_ARC_ITERATIONS {
            phi += (self.northing - N0 - m) / (A * F0);
            m = meridional_arc(phi);
            if (self.northing - N0 - m).abs() < 0.00001 {
                break;
            }
        }

        let sin_phi = phi.sin();
        let tan_phi = phi.tan();
        let (tan2, tan4, tan6) = (tan_phi.powi(2), tan_phi.powi(4), tan_phi.powi(6));
        let sec_phi = 1.0 / phi.cos();

        let nu = A * F0 / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let rho = A * F0 * (1.0 - e2) / (1.0 - e2 * sin_phi * sin_phi).powf(1.5);
        let eta2 = nu / rho - 1.0;

        let vii = tan_phi / (2.0 * rho * nu);
        let viii = tan_phi / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan_phi / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x = sec_phi / nu;
        let xi = sec_phi / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
        let xii = sec_phi / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia = sec_phi / (5040.0 * nu.powi(7))
            * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

        let de = self.easting - E0;
        let lat = phi - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lon = LAMBDA0_DEG.to_radians() + x * de - xi * de.powi(3) + xii * de.powi(5)
            - xiia * de.powi(7);

        let cartesian = to_cartesian(lat.to_degrees(), lon.to_degrees(), &AIRY1830);
        let (latitude, longitude) = from_cartesian(TO_OSGB36.inverse().apply(cartesian), &WGS84);
        Coordinate::new(latitude, longitude)
    }

    /// Parses `"TQ 33035 82498"`, `"TQ3303582498"` or a bare `"533035, 182498"`.
    ///
    /// Digit groups shorter than five are scaled up to metres; longer groups
    /// carry sub-metre precision.
    pub fn parse(text: &str) -> Result<Self> {
        static NUMERIC: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^(\d+(?:\.\d+)?),\s*(\d+(?:\.\d+)?)$").unwrap());
        static LETTERED: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^([HNST])([ABCDEFGHJKLMNOPQRSTUVWXYZ])\s*([0-9]+)\s*([0-9]*)$").unwrap()
        });

        let text = text.trim();
        let invalid = || Error::InvalidGridRef(text.to_string());

        if let Some(caps) = NUMERIC.captures(text) {
            let easting = caps[1].parse::<f64>().map_err(|_| invalid())?;
            let northing = caps[2].parse::<f64>().map_err(|_| invalid())?;
            return Ok(Self { easting, northing });
        }

        let upper = text.to_ascii_uppercase();
        let caps = LETTERED.captures(&upper).ok_or_else(invalid)?;

        let letter_index = |s: &str| {
            let i = s.as_bytes()[0] - b'A';
            // grid letters skip I
            i64::from(if i > 7 { i - 1 } else { i })
        };
        let l1 = letter_index(&caps[1]);
        let l2 = letter_index(&caps[2]);
        let e100km = ((l1 - 2) % 5) * 5 + (l2 % 5);
        let n100km = (19 - (l1 / 5) * 5) - (l2 / 5);

        let (e_digits, n_digits) = if caps[4].is_empty() {
            let all = &caps[3];
            if all.len() % 2 == 1 {
                return Err(invalid());
            }
            all.split_at(all.len() / 2)
        } else {
            (&caps[3], &caps[4])
        };
        if e_digits.len() != n_digits.len() || e_digits.is_empty() {
            return Err(invalid());
        }

        let scale = 10f64.powi(5 - e_digits.len() as i32);
        let easting = e_digits.parse::<f64>().map_err(|_| invalid())? * scale;
        let northing = n_digits.parse::<f64>().map_err(|_| invalid())? * scale;

        Ok(Self {
            easting: e100km as f64 * 100_000.0 + easting,
            northing: n100km as f64 * 100_000.0 + northing,
        })
    }
}

impl fmt::Display for GridRef {
    /// Two-letter 100 km square followed by five-digit easting and northing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // whole metres, after snapping to centimetres so a back-projected
        // reference keeps its digits
        let easting = ((self.easting * 100.0).round() / 100.0).floor();
        let northing = ((self.northing * 100.0).round() / 100.0).floor();
        let e100k = (easting / 100_000.0).floor() as i64;
        let n100k = (northing / 100_000.0).floor() as i64;

        let mut l1 = (19 - n100k) - (19 - n100k) % 5 + (e100k + 10) / 5;
        let mut l2 = (19 - n100k) * 5 % 25 + e100k % 5;
        if l1 > 7 {
            l1 += 1;
        }
        if l2 > 7 {
            l2 += 1;
        }

        let e = (easting % 100_000.0) as i64;
        let n = (northing % 100_000.0) as i64;
        write!(
            f,
            "{}{} {:05} {:05}",
            (b'A' + l1 as u8) as char,
            (b'A' + l2 as u8) as char,
            e,
            n
        )
    }
}
