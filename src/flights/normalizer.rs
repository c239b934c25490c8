//! Ticket record normalization.
//!
//! Price endpoints disagree on field names across versions: latest prices
//! say `value` and `depart_date`, the v2 matrices say `price` and
//! `departure_at`, and several fields arrive as strings, numbers or are
//! absent entirely. Everything funnels through [`map_ticket`], which reads
//! the aliases in a fixed order and coerces loosely typed values.
//!
//! Origin and destination codes resolve through a [`PlaceResolver`];
//! records whose places cannot be resolved are dropped and counted.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;

use crate::data::PlaceResolver;
use crate::error::{ApiError, ApiResult};
use crate::model::{Place, Ticket, TripClass};
use crate::time::parse_datetime;

/// First value among `keys` that is present and non-null.
fn first_of<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

/// Loose truthiness: `false`, `0`, `""`, `"0"`, null and empty
/// containers are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Integer coercion for fields that arrive as numbers or numeric strings.
fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(|f| f as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Build a [`Ticket`] from a wire record and its resolved places.
///
/// Price and departure date are mandatory; everything else defaults.
pub(crate) fn map_ticket(
    record: &Map<String, Value>,
    origin: Place,
    destination: Place,
    currency: &str,
) -> ApiResult<Ticket> {
    let value = first_of(record, &["price", "value"])
        .and_then(as_int)
        .ok_or(ApiError::MissingField("price"))?;

    let depart_date = first_of(record, &["departure_at", "depart_date"])
        .and_then(Value::as_str)
        .ok_or(ApiError::MissingField("departure_at"))
        .and_then(parse_datetime)?;

    let return_date = first_of(record, &["return_at", "return_date"])
        .and_then(Value::as_str)
        .map(parse_datetime)
        .transpose()?;

    let found_at = record
        .get("found_at")
        .and_then(Value::as_str)
        .map(parse_datetime)
        .transpose()?
        .unwrap_or_else(Utc::now);

    let expires = record
        .get("expires_at")
        .and_then(Value::as_str)
        .map(parse_datetime)
        .transpose()?;

    Ok(Ticket {
        origin,
        destination,
        depart_date,
        return_date,
        value,
        currency: currency.to_string(),
        distance: record.get("distance").and_then(as_int).unwrap_or(0),
        actual: record.get("actual").map(truthy).unwrap_or(false),
        found_at,
        trip_class: record
            .get("trip_class")
            .and_then(as_int)
            .map(TripClass::from_wire)
            .unwrap_or_default(),
        show_to_affiliates: record
            .get("show_to_affiliates")
            .map(truthy)
            .unwrap_or(true),
        number_of_changes: first_of(record, &["transfers", "number_of_changes"])
            .and_then(as_int)
            .unwrap_or(0),
        airline: record
            .get("airline")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        expires,
        flight_number: record.get("flight_number").and_then(as_int).unwrap_or(0),
    })
}

/// Object records inside a `data` payload, whether it is a list or a
/// code-keyed map.
pub(crate) fn collect_records(data: &Value) -> Vec<&Map<String, Value>> {
    match data {
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        Value::Object(map) => map.values().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

/// Map one record, resolving its places.
///
/// Returns `Ok(None)` when either place code is missing or unknown.
pub(crate) async fn map_one(
    resolver: &dyn PlaceResolver,
    record: &Map<String, Value>,
    currency: &str,
) -> ApiResult<Option<Ticket>> {
    let origin_code = record.get("origin").and_then(Value::as_str);
    let destination_code = record.get("destination").and_then(Value::as_str);
    let (Some(origin_code), Some(destination_code)) = (origin_code, destination_code) else {
        return Ok(None);
    };

    let Some(origin) = resolver.resolve_place(origin_code).await? else {
        return Ok(None);
    };
    let Some(destination) = resolver.resolve_place(destination_code).await? else {
        return Ok(None);
    };

    map_ticket(record, origin, destination, currency).map(Some)
}

/// Map a batch of records, dropping the ones with unresolved places.
pub(crate) async fn map_records(
    resolver: &dyn PlaceResolver,
    records: &[&Map<String, Value>],
    currency: &str,
) -> ApiResult<Vec<Ticket>> {
    let mut tickets = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        match map_one(resolver, record, currency).await? {
            Some(ticket) => tickets.push(ticket),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("dropped {} ticket records with unresolved places", dropped);
    }
    Ok(tickets)
}

/// Map the `data` section of a prices response into tickets.
pub(crate) async fn map_response(
    resolver: &dyn PlaceResolver,
    response: &Value,
    currency: &str,
) -> ApiResult<Vec<Ticket>> {
    let data = response.get("data").unwrap_or(&Value::Null);
    map_records(resolver, &collect_records(data), currency).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Airport, City, Country, CountryRecord};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct StubResolver {
        places: HashMap<String, Place>,
    }

    impl StubResolver {
        fn with_cities(codes: &[&str]) -> Self {
            let places = codes
                .iter()
                .map(|code| ((*code).to_string(), Place::City(city(code))))
                .collect();
            Self { places }
        }
    }

    #[async_trait]
    impl PlaceResolver for StubResolver {
        async fn resolve_place(&self, code: &str) -> ApiResult<Option<Place>> {
            Ok(self.places.get(code).cloned())
        }

        async fn resolve_airport(&self, code: &str) -> ApiResult<Option<Airport>> {
            Ok(self.places.get(code).and_then(|place| match place {
                Place::Airport(airport) => Some(airport.clone()),
                Place::City(_) => None,
            }))
        }

        async fn resolve_country_by_name(
            &self,
            _name: &str,
        ) -> ApiResult<Option<CountryRecord>> {
            Ok(None)
        }
    }

    fn city(code: &str) -> City {
        City {
            iata: code.to_string(),
            name: code.to_string(),
            coordinates: None,
            time_zone: String::new(),
            name_translations: HashMap::new(),
            country: Some(Country {
                iata: "RU".to_string(),
                name: "Russia".to_string(),
                currency: "RUB".to_string(),
                name_translations: HashMap::new(),
            }),
        }
    }

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_map_ticket_reads_aliases_in_order() {
        let rec = record(json!({
            "price": 1200,
            "value": 9999,
            "departure_at": "2021-06-24T10:20:00Z",
            "return_at": "2021-06-30",
            "transfers": "2",
            "airline": "SU",
            "flight_number": "1402",
            "actual": 1,
        }));

        let ticket = map_ticket(
            &rec,
            Place::City(city("MOW")),
            Place::City(city("LED")),
            "eur",
        )
        .unwrap();

        assert_eq!(ticket.value, 1200);
        assert_eq!(ticket.number_of_changes, 2);
        assert_eq!(ticket.flight_number, 1402);
        assert_eq!(ticket.airline, "SU");
        assert_eq!(ticket.currency, "eur");
        assert!(ticket.actual);
        assert!(ticket.show_to_affiliates);
        assert!(ticket.return_date.is_some());
    }

    #[test]
    fn test_map_ticket_falls_back_to_legacy_names() {
        let rec = record(json!({
            "value": 450,
            "depart_date": "2021-06-24",
            "number_of_changes": 1,
        }));

        let ticket = map_ticket(
            &rec,
            Place::City(city("MOW")),
            Place::City(city("LED")),
            "usd",
        )
        .unwrap();

        assert_eq!(ticket.value, 450);
        assert_eq!(ticket.number_of_changes, 1);
        assert_eq!(ticket.return_date, None);
        assert_eq!(ticket.trip_class, TripClass::Economy);
    }

    #[test]
    fn test_map_ticket_requires_price() {
        let rec = record(json!({"depart_date": "2021-06-24"}));
        let err = map_ticket(
            &rec,
            Place::City(city("MOW")),
            Place::City(city("LED")),
            "eur",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing mandatory field: price");
    }

    #[test]
    fn test_map_ticket_requires_departure() {
        let rec = record(json!({"price": 100}));
        let err = map_ticket(
            &rec,
            Place::City(city("MOW")),
            Place::City(city("LED")),
            "eur",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing mandatory field: departure_at");
    }

    #[test]
    fn test_truthy_matches_loose_semantics() {
        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("yes")));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!("0")));
        assert!(!truthy(&Value::Null));
    }

    #[test]
    fn test_collect_records_handles_both_shapes() {
        let list = json!([{"a": 1}, {"b": 2}]);
        assert_eq!(collect_records(&list).len(), 2);

        let keyed = json!({"LED": {"a": 1}, "CPH": {"b": 2}});
        assert_eq!(collect_records(&keyed).len(), 2);

        assert!(collect_records(&json!("nope")).is_empty());
    }

    #[tokio::test]
    async fn test_map_response_drops_unresolved_places() {
        let resolver = StubResolver::with_cities(&["MOW", "LED"]);
        let response = json!({
            "success": true,
            "data": [
                {"origin": "MOW", "destination": "LED", "price": 100, "departure_at": "2021-06-24"},
                {"origin": "MOW", "destination": "ZZZ", "price": 200, "departure_at": "2021-06-24"},
                {"origin": "MOW", "price": 300, "departure_at": "2021-06-24"},
            ],
        });

        let tickets = map_response(&resolver, &response, "eur").await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].destination.iata(), "LED");
    }

    #[tokio::test]
    async fn test_map_response_reads_keyed_data() {
        let resolver = StubResolver::with_cities(&["MOW", "LED"]);
        let response = json!({
            "data": {
                "LED": {"origin": "MOW", "destination": "LED", "price": 80, "depart_date": "2021-07-01"},
            },
        });

        let tickets = map_response(&resolver, &response, "rub").await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].value, 80);
    }

    #[tokio::test]
    async fn test_map_response_without_data_is_empty() {
        let resolver = StubResolver::with_cities(&[]);
        let tickets = map_response(&resolver, &json!({"success": true}), "eur")
            .await
            .unwrap();
        assert!(tickets.is_empty());
    }
}
