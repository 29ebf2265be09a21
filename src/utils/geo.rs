// src/utils/geo.rs
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Where a distance figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Lookup,   // Both ZIP codes resolved
    Fallback, // At least one ZIP unknown, distance treated as zero
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub miles: f64,
    pub source: DistanceSource,
}

/// Great-circle distance between two points, in miles.
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

// ZIP centroids for the service area (NYC metro)
const ZIP_CENTROIDS: &[(&str, f64, f64)] = &[
    ("10001", 40.7506, -73.9972),
    ("10002", 40.7157, -73.9863),
    ("10003", 40.7317, -73.9891),
    ("10004", 40.6988, -74.0384),
    ("10005", 40.7060, -74.0088),
    ("10007", 40.7135, -74.0078),
    ("10009", 40.7264, -73.9818),
    ("10010", 40.7390, -73.9826),
    ("10011", 40.7418, -74.0002),
    ("10012", 40.7258, -73.9981),
    ("10013", 40.7200, -74.0049),
    ("10014", 40.7340, -74.0054),
    ("10016", 40.7459, -73.9781),
    ("10017", 40.7524, -73.9726),
    ("10018", 40.7553, -73.9932),
    ("10019", 40.7657, -73.9858),
    ("10021", 40.7693, -73.9588),
    ("10022", 40.7585, -73.9678),
    ("10023", 40.7769, -73.9827),
    ("10024", 40.7987, -73.9742),
    ("10025", 40.7985, -73.9668),
    ("10028", 40.7764, -73.9531),
    ("10036", 40.7591, -73.9897),
    ("10128", 40.7813, -73.9500),
    ("10451", 40.8203, -73.9250),
    ("10463", 40.8803, -73.9066),
    ("11101", 40.7459, -73.9400),
    ("11201", 40.6940, -73.9903),
    ("11211", 40.7127, -73.9533),
    ("11215", 40.6627, -73.9860),
    ("11217", 40.6824, -73.9790),
    ("11222", 40.7281, -73.9478),
    ("11354", 40.7686, -73.8272),
    ("11375", 40.7209, -73.8469),
    ("07030", 40.7453, -74.0279),
    ("07302", 40.7220, -74.0466),
    ("07310", 40.7309, -74.0637),
];

/// Static lookup of ZIP code centroids.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipDirectory;

impl ZipDirectory {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a user-entered ZIP to its five-digit form. ZIP+4 is accepted.
    pub fn normalize(zip: &str) -> Option<&str> {
        let zip = zip.trim();
        let five = match zip.split_once('-') {
            Some((head, tail)) if tail.len() == 4 && tail.bytes().all(|b| b.is_ascii_digit()) => head,
            Some(_) => return None,
            None => zip,
        };

        if five.len() == 5 && five.bytes().all(|b| b.is_ascii_digit()) {
            Some(five)
        } else {
            None
        }
    }

    pub fn lookup(&self, zip: &str) -> Option<Coordinates> {
        let zip = Self::normalize(zip)?;
        ZIP_CENTROIDS
            .iter()
            .find(|(code, _, _)| *code == zip)
            .map(|(_, lat, lon)| Coordinates::new(*lat, *lon))
    }

    pub fn distance_miles(&self, from_zip: &str, to_zip: &str) -> DistanceEstimate {
        match (self.lookup(from_zip), self.lookup(to_zip)) {
            (Some(from), Some(to)) => DistanceEstimate {
                miles: haversine_miles(from, to),
                source: DistanceSource::Lookup,
            },
            _ => {
                tracing::debug!("No centroid for {} or {}, using fallback distance", from_zip, to_zip);
                DistanceEstimate {
                    miles: 0.0,
                    source: DistanceSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_accepts_zip_plus_four() {
        assert_eq!(ZipDirectory::normalize(" 10001 "), Some("10001"));
        assert_eq!(ZipDirectory::normalize("10001-1234"), Some("10001"));
        assert_eq!(ZipDirectory::normalize("1000"), None);
        assert_eq!(ZipDirectory::normalize("10001-12"), None);
        assert_eq!(ZipDirectory::normalize("abcde"), None);
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let zips = ZipDirectory::new();
        assert!(zips.lookup("11201").is_some());
        assert!(zips.lookup("07030-5991").is_some());
        assert!(zips.lookup("99999").is_none());
    }

    #[test]
    fn test_haversine_known_distance() {
        // Midtown to Downtown Brooklyn, about 3.9 miles as the crow flies
        let midtown = Coordinates::new(40.7506, -73.9972);
        let brooklyn = Coordinates::new(40.6940, -73.9903);
        let miles = haversine_miles(midtown, brooklyn);
        assert!((miles - 3.92).abs() < 0.1, "unexpected distance {}", miles);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_for_same_zip() {
        let zips = ZipDirectory::new();
        let ab = zips.distance_miles("10001", "11215");
        let ba = zips.distance_miles("11215", "10001");
        assert_eq!(ab.source, DistanceSource::Lookup);
        assert!((ab.miles - ba.miles).abs() < 1e-9);
        assert!(ab.miles > 0.0);

        let same = zips.distance_miles("10001", "10001");
        assert_eq!(same.miles, 0.0);
    }

    #[test]
    fn test_unknown_zip_falls_back() {
        let estimate = ZipDirectory::new().distance_miles("10001", "94105");
        assert_eq!(estimate.source, DistanceSource::Fallback);
        assert_eq!(estimate.miles, 0.0);
    }
}
