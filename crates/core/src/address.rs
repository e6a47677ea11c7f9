//! Map points and the reverse-geocoding address fallback chain.
//!
//! The geocoder returns a loose `address` object whose populated keys vary
//! by locality. [`GeocodedParts::resolve`] collapses it into the four
//! fields the project form carries, walking an ordered list of candidate
//! keys for each field.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// City written on every project address unless the form overrides it.
pub const DEFAULT_CITY: &str = "Quezon City";

/// Where the project map opens before anything is pinned.
pub const MAP_CENTER: GeoPoint = GeoPoint {
    lat: 14.676,
    lng: 121.0437,
};

/// Zoom level of the project map on open and after a reset.
pub const MAP_DEFAULT_ZOOM: u8 = 12;

/// A geographic point as stored on project documents (`location`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::Validation(format!(
                "Latitude must be between -90 and 90, got {lat}"
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::Validation(format!(
                "Longitude must be between -180 and 180, got {lng}"
            )));
        }
        Ok(Self { lat, lng })
    }
}

/// The structured address attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolvedAddress {
    pub street: String,
    pub barangay: String,
    pub zip_code: String,
    pub city: String,
}

impl Default for ResolvedAddress {
    fn default() -> Self {
        Self {
            street: String::new(),
            barangay: String::new(),
            zip_code: String::new(),
            city: DEFAULT_CITY.to_string(),
        }
    }
}

/// The raw `address` object of a reverse-geocoding response.
///
/// Only the keys the fallback chain consults are decoded; everything else
/// in the response is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeocodedParts {
    pub road: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub city_district: Option<String>,
    pub quarter: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
}

impl GeocodedParts {
    /// Collapse the geocoder output into a [`ResolvedAddress`].
    ///
    /// | field    | candidates, in order                                                  |
    /// |----------|-----------------------------------------------------------------------|
    /// | street   | `road`, `suburb`                                                      |
    /// | barangay | `neighbourhood`, `village`, `hamlet`, `suburb`, `city_district`, `quarter` |
    /// | zip code | `postcode`                                                            |
    /// | city     | `city`, `town`, then [`DEFAULT_CITY`]                                 |
    ///
    /// Blank candidates are skipped. A field with no candidate is empty.
    pub fn resolve(&self) -> ResolvedAddress {
        ResolvedAddress {
            street: first_present(&[&self.road, &self.suburb]).unwrap_or_default(),
            barangay: first_present(&[
                &self.neighbourhood,
                &self.village,
                &self.hamlet,
                &self.suburb,
                &self.city_district,
                &self.quarter,
            ])
            .unwrap_or_default(),
            zip_code: first_present(&[&self.postcode]).unwrap_or_default(),
            city: first_present(&[&self.city, &self.town])
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
        }
    }
}

fn first_present(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(pairs: &[(&str, &str)]) -> GeocodedParts {
        let mut map = serde_json::Map::new();
        for (k, v) in pairs {
            map.insert((*k).to_string(), serde_json::Value::String((*v).to_string()));
        }
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    #[test]
    fn suburb_only_fills_street_and_barangay() {
        let resolved = parts(&[("suburb", "Diliman")]).resolve();
        assert_eq!(resolved.street, "Diliman");
        assert_eq!(resolved.barangay, "Diliman");
        assert_eq!(resolved.zip_code, "");
        assert_eq!(resolved.city, DEFAULT_CITY);
    }

    #[test]
    fn road_wins_over_suburb_for_street() {
        let resolved = parts(&[
            ("road", "Commonwealth Avenue"),
            ("suburb", "Diliman"),
            ("neighbourhood", "UP Campus"),
        ])
        .resolve();
        assert_eq!(resolved.street, "Commonwealth Avenue");
        assert_eq!(resolved.barangay, "UP Campus");
    }

    #[test]
    fn barangay_walks_the_chain_in_order() {
        let resolved = parts(&[("hamlet", "Sitio Uno"), ("quarter", "Q1")]).resolve();
        assert_eq!(resolved.barangay, "Sitio Uno");

        let resolved = parts(&[("city_district", "District 4"), ("quarter", "Q1")]).resolve();
        assert_eq!(resolved.barangay, "District 4");

        let resolved = parts(&[("quarter", "Q1")]).resolve();
        assert_eq!(resolved.barangay, "Q1");
    }

    #[test]
    fn blank_candidates_are_skipped() {
        let resolved = parts(&[("road", "  "), ("suburb", "Cubao"), ("neighbourhood", "")]).resolve();
        assert_eq!(resolved.street, "Cubao");
        assert_eq!(resolved.barangay, "Cubao");
    }

    #[test]
    fn town_used_when_city_missing() {
        let resolved = parts(&[("town", "San Mateo"), ("postcode", "1850")]).resolve();
        assert_eq!(resolved.city, "San Mateo");
        assert_eq!(resolved.zip_code, "1850");
    }

    #[test]
    fn empty_response_yields_empty_fields_and_default_city() {
        assert_eq!(GeocodedParts::default().resolve(), ResolvedAddress::default());
    }

    #[test]
    fn geo_point_rejects_out_of_range() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(14.6, 121.0).is_ok());
    }
}
