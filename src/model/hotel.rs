//! Hotel entities for the search and catalog endpoints.
//!
//! The catalog payloads are attribute bags with camelCase keys; [`Hotel`]
//! deserializes them directly. The lookup result types are assembled by
//! the hotels normalizer because their wire shape needs alias handling.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::place::Coordinates;

/// Result ordering for hotel search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelSort {
    Popularity,
    Price,
    Name,
    GuestScore,
    Stars,
}

impl HotelSort {
    /// The wire string for the `sortBy` parameter.
    pub fn as_wire(&self) -> &'static str {
        match self {
            HotelSort::Popularity => "popularity",
            HotelSort::Price => "price",
            HotelSort::Name => "name",
            HotelSort::GuestScore => "guestScore",
            HotelSort::Stars => "stars",
        }
    }
}

/// Sort direction for hotel search results, encoded as `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// The wire integer for the `sortAsc` parameter.
    pub fn as_wire(&self) -> i64 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => 0,
        }
    }
}

/// Full hotel record from the static catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hotel {
    pub id: i64,
    pub city_id: i64,
    pub stars: i64,
    pub price_from: f64,
    pub rating: f64,
    pub popularity: i64,
    pub property_type: i64,
    pub check_in: String,
    pub check_out: String,
    pub distance: f64,
    pub photo_count: i64,
    pub photos: Vec<Value>,
    pub facilities: Vec<i64>,
    pub short_facilities: Vec<String>,
    pub photos_by_room_type: Value,
    pub location: Option<Coordinates>,
    pub name: HashMap<String, String>,
    pub address: HashMap<String, String>,
    pub link: String,
    pub poi_distance: i64,
    pub pois: Vec<Value>,
}

/// Compact hotel record from the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HotelSmall {
    pub id: i64,
    pub full_name: String,
    pub location: Option<Coordinates>,
    pub label: String,
    pub location_id: i64,
    pub location_name: String,
}

/// Location record from the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HotelLocation {
    pub id: i64,
    pub city_name: String,
    pub iata: Vec<String>,
    pub location: Option<Coordinates>,
    pub full_name: String,
    pub country_code: String,
    pub country_name: String,
    pub hotels_count: i64,
    pub score: Option<f64>,
}

/// Compact location record used by coordinate lookups and the price
/// cache.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HotelLocationSmall {
    pub id: i64,
    pub name: String,
    pub country_iso: String,
    pub state: Option<String>,
    pub kind: String,
    pub geo: Option<Coordinates>,
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_wire_strings() {
        assert_eq!(HotelSort::Popularity.as_wire(), "popularity");
        assert_eq!(HotelSort::GuestScore.as_wire(), "guestScore");
        assert_eq!(HotelSort::Stars.as_wire(), "stars");
        assert_eq!(SortOrder::Ascending.as_wire(), 1);
        assert_eq!(SortOrder::Descending.as_wire(), 0);
    }

    #[test]
    fn test_hotel_deserializes_catalog_record() {
        let hotel: Hotel = serde_json::from_value(json!({
            "id": 305022,
            "cityId": 12153,
            "stars": 4,
            "priceFrom": 88.2,
            "rating": 77.0,
            "popularity": 456,
            "propertyType": 0,
            "checkIn": "14:00",
            "checkOut": "12:00",
            "distance": 2.2,
            "photoCount": 28,
            "photos": [{"url": "https://photo.example/1.jpg", "width": 800, "height": 600}],
            "facilities": [1, 2, 7],
            "shortFacilities": ["wifi", "parking"],
            "location": {"lat": 7.89, "lon": 98.39},
            "name": {"en": "Patong Bay Hotel"},
            "address": {"en": "123 Beach Road"},
            "link": "/hotels/305022",
            "poiDistance": 150,
            "pois": [],
        }))
        .unwrap();

        assert_eq!(hotel.id, 305022);
        assert_eq!(hotel.city_id, 12153);
        assert_eq!(hotel.price_from, 88.2);
        assert_eq!(hotel.short_facilities, vec!["wifi", "parking"]);
        assert_eq!(hotel.name.get("en").map(String::as_str), Some("Patong Bay Hotel"));
        assert_eq!(hotel.location.unwrap().lat, 7.89);
    }

    #[test]
    fn test_hotel_tolerates_sparse_records() {
        let hotel: Hotel = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(hotel.id, 1);
        assert_eq!(hotel.stars, 0);
        assert!(hotel.photos.is_empty());
        assert_eq!(hotel.location, None);
    }
}
