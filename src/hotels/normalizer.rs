//! Lookup response normalization.
//!
//! The lookup endpoint is loose about types: ids arrive as numbers or
//! numeric strings, scores as either, and hotel labels fall back to the
//! name field. These helpers coerce one result item into the typed lookup
//! records.

use serde_json::{Map, Value};

use crate::model::{Coordinates, Hotel, HotelLocation, HotelLocationSmall, HotelSmall};

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

fn int_of(item: &Map<String, Value>, key: &str) -> i64 {
    item.get(key).and_then(as_int).unwrap_or(0)
}

fn str_of(item: &Map<String, Value>, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn coordinates_of(value: Option<&Value>) -> Option<Coordinates> {
    let map = value?.as_object()?;
    Some(Coordinates {
        lat: map.get("lat").and_then(as_f64)?,
        lon: map.get("lon").and_then(as_f64)?,
    })
}

/// Object items of a result list.
pub(crate) fn items_of(value: Option<&Value>) -> Vec<&Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

pub(crate) fn map_hotel_small(item: &Map<String, Value>) -> HotelSmall {
    // `label` wins when the key is present, even over a better `name`.
    let label = if item.contains_key("label") {
        item.get("label").and_then(Value::as_str)
    } else {
        item.get("name").and_then(Value::as_str)
    };

    HotelSmall {
        id: int_of(item, "id"),
        full_name: str_of(item, "fullName"),
        location: coordinates_of(item.get("location")),
        label: label.unwrap_or_default().to_string(),
        location_id: int_of(item, "locationId"),
        location_name: str_of(item, "locationName"),
    }
}

pub(crate) fn map_location(item: &Map<String, Value>) -> HotelLocation {
    HotelLocation {
        id: int_of(item, "id"),
        city_name: str_of(item, "cityName"),
        iata: item
            .get("iata")
            .and_then(Value::as_array)
            .map(|codes| {
                codes
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        location: coordinates_of(item.get("location")),
        full_name: str_of(item, "fullName"),
        country_code: str_of(item, "countryCode"),
        country_name: str_of(item, "countryName"),
        hotels_count: int_of(item, "hotelsCount"),
        score: item.get("_score").and_then(as_f64),
    }
}

pub(crate) fn map_location_small(item: &Map<String, Value>) -> HotelLocationSmall {
    HotelLocationSmall {
        id: int_of(item, "id"),
        name: str_of(item, "name"),
        country_iso: str_of(item, "countryIso"),
        state: item
            .get("state")
            .and_then(Value::as_str)
            .map(str::to_string),
        kind: str_of(item, "type"),
        geo: coordinates_of(item.get("geo")),
        full_name: str_of(item, "fullName"),
    }
}

/// Location model of one price-cache entry.
///
/// Fields prefer the entry's own values and fall back to the nested
/// `location` object; the country ISO code is resolved by the caller.
pub(crate) fn cost_location(
    entry: &Map<String, Value>,
    location: &Map<String, Value>,
    country_iso: String,
) -> HotelLocationSmall {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| location.get("name").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();
    let state = entry
        .get("state")
        .and_then(Value::as_str)
        .or_else(|| location.get("state").and_then(Value::as_str))
        .map(str::to_string);
    let geo = coordinates_of(entry.get("geo")).or_else(|| coordinates_of(location.get("geo")));

    HotelLocationSmall {
        id: 0,
        name,
        country_iso,
        state,
        kind: String::new(),
        geo,
        full_name: String::new(),
    }
}

/// Hotels list of a static catalog response.
pub(crate) fn map_hotels_list(response: &Value) -> Vec<Hotel> {
    response
        .get("hotels")
        .and_then(Value::as_array)
        .map(|hotels| {
            hotels
                .iter()
                .filter_map(|h| serde_json::from_value(h.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_hotel_small_coerces_string_ids() {
        let item = object(json!({
            "id": "305022",
            "fullName": "Patong Bay Hotel, Phuket, Thailand",
            "location": {"lat": 7.89, "lon": 98.39},
            "label": "Patong Bay Hotel",
            "locationId": 30553,
            "locationName": "Phuket",
        }));

        let hotel = map_hotel_small(&item);
        assert_eq!(hotel.id, 305022);
        assert_eq!(hotel.location_id, 30553);
        assert_eq!(hotel.label, "Patong Bay Hotel");
        assert_eq!(hotel.location.unwrap().lon, 98.39);
    }

    #[test]
    fn test_hotel_small_label_falls_back_to_name() {
        let item = object(json!({"id": 1, "name": "Hilton"}));
        assert_eq!(map_hotel_small(&item).label, "Hilton");

        // A present but non-string label does not fall through.
        let item = object(json!({"id": 1, "label": null, "name": "Hilton"}));
        assert_eq!(map_hotel_small(&item).label, "");
    }

    #[test]
    fn test_location_coerces_counts_and_score() {
        let item = object(json!({
            "id": 30553,
            "cityName": "Phuket",
            "iata": ["HKT"],
            "location": {"lat": "7.89", "lon": "98.39"},
            "fullName": "Phuket, Thailand",
            "countryCode": "TH",
            "countryName": "Thailand",
            "hotelsCount": "997",
            "_score": 461195,
        }));

        let location = map_location(&item);
        assert_eq!(location.hotels_count, 997);
        assert_eq!(location.score, Some(461195.0));
        assert_eq!(location.iata, vec!["HKT"]);
        assert_eq!(location.location.unwrap().lat, 7.89);
    }

    #[test]
    fn test_location_small_reads_type_and_geo() {
        let item = object(json!({
            "id": 12153,
            "name": "Bangkok",
            "countryIso": "TH",
            "state": null,
            "type": "City",
            "geo": {"lat": 13.75, "lon": 100.52},
            "fullName": "Bangkok, Thailand",
        }));

        let location = map_location_small(&item);
        assert_eq!(location.kind, "City");
        assert_eq!(location.state, None);
        assert_eq!(location.geo.unwrap().lat, 13.75);
    }

    #[test]
    fn test_cost_location_prefers_entry_fields() {
        let entry = object(json!({
            "name": "Patong",
            "geo": {"lat": 7.89, "lon": 98.29},
            "priceAvg": 94.2,
        }));
        let location = object(json!({
            "name": "Phuket",
            "state": "Phuket Province",
            "geo": {"lat": 8.0, "lon": 98.0},
            "country": "Thailand",
        }));

        let model = cost_location(&entry, &location, "TH".to_string());
        assert_eq!(model.name, "Patong");
        assert_eq!(model.state.as_deref(), Some("Phuket Province"));
        assert_eq!(model.geo.unwrap().lat, 7.89);
        assert_eq!(model.country_iso, "TH");
    }

    #[test]
    fn test_items_of_filters_non_objects() {
        let value = json!([{"id": 1}, "junk", {"id": 2}]);
        assert_eq!(items_of(Some(&value)).len(), 2);
        assert!(items_of(None).is_empty());
    }

    #[test]
    fn test_map_hotels_list_skips_invalid_records() {
        let response = json!({
            "gen_timestamp": 1629900000,
            "hotels": [
                {"id": 305022, "cityId": 12153, "stars": 4},
                "junk",
            ],
        });

        let hotels = map_hotels_list(&response);
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].id, 305022);
    }
}
