//! Composite address parsing and great-circle ranking.
//!
//! Facility and patient addresses arrive as a single string,
//! `"<plain address>||<json {lat,lng}>"`. The coordinate half is optional
//! and frequently malformed; it is used only to rank facilities by
//! distance, so invalid coordinates degrade to absence rather than error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator between the human-readable address and the coordinate JSON.
pub const COMPOSITE_DELIMITER: &str = "||";

/// Mean Earth radius in kilometers, for the haversine formula.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Split a composite address into its plain half and optional coordinates.
///
/// Splits on the first `"||"` only; the plain half is trimmed. The second
/// half is accepted as coordinates only when it parses as JSON with numeric
/// `lat` and `lng`: anything else (missing half, bad JSON, string fields)
/// yields `None`.
#[must_use]
pub fn split_composite(address: &str) -> (String, Option<Coordinates>) {
    match address.split_once(COMPOSITE_DELIMITER) {
        Some((plain, raw)) => (plain.trim().to_string(), parse_coordinates(raw)),
        None => (address.trim().to_string(), None),
    }
}

fn parse_coordinates(raw: &str) -> Option<Coordinates> {
    let value: Value = serde_json::from_str(raw.trim()).ok()?;
    let lat = value.get("lat")?.as_f64()?;
    let lng = value.get("lng")?.as_f64()?;
    Some(Coordinates { lat, lng })
}

/// Great-circle distance between two points, in kilometers.
#[must_use]
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Round a distance to two decimal places for presentation.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Rank candidates by distance from `origin`, nearest first.
///
/// Candidates without coordinates are dropped. The sort is stable, so
/// equidistant candidates keep their encounter order. At most `limit`
/// results are returned, each with its distance rounded to two decimals.
#[must_use]
pub fn rank_nearest<T>(
    origin: Coordinates,
    candidates: Vec<(T, Option<Coordinates>)>,
    limit: usize,
) -> Vec<(T, f64)> {
    let mut ranked: Vec<(T, f64)> = candidates
        .into_iter()
        .filter_map(|(item, coords)| coords.map(|c| (item, round_km(distance_km(origin, c)))))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(limit);
    ranked
}

/// Attach a distance to every candidate, keeping the coordinate-less ones.
///
/// Used by the detailed preference views: candidates are not filtered or
/// reordered, and a missing origin or candidate coordinate yields a null
/// distance rather than an error.
#[must_use]
pub fn with_distances<T>(
    origin: Option<Coordinates>,
    candidates: Vec<(T, Option<Coordinates>)>,
) -> Vec<(T, Option<f64>)> {
    candidates
        .into_iter()
        .map(|(item, coords)| {
            let km = match (origin, coords) {
                (Some(o), Some(c)) => Some(round_km(distance_km(o, c))),
                _ => None,
            };
            (item, km)
        })
        .collect()
}
