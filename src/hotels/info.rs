//! Hotel catalog endpoints.
//!
//! Covers the lookup autocomplete, the price cache, widget selections and
//! the static dictionaries (hotels per location, room and hotel types).
//! Catalog responses are served from the primary hotel host or, for the
//! widget dumps, the yasen host, both behind the same client.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::data::PlaceResolver;
use crate::endpoints::{self, hotels as paths, HOTELS_CATALOG_VERSION};
use crate::error::{ApiError, ApiResult};
use crate::hotels::normalizer::{
    cost_location, items_of, map_hotel_small, map_hotels_list, map_location, map_location_small,
};
use crate::http::HotelsClient;
use crate::model::{Hotel, HotelLocation, HotelLocationSmall, HotelSmall};

/// Languages the catalog dictionaries are published in.
const CATALOG_LANGUAGES: &[&str] = &["pt", "en", "fr", "de", "id", "it", "pl", "es", "th", "ru"];

/// What the lookup endpoint should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookFor {
    Both,
    Hotel,
    Location,
}

impl LookFor {
    pub fn as_wire(&self) -> &'static str {
        match self {
            LookFor::Both => "both",
            LookFor::Hotel => "hotel",
            LookFor::Location => "location",
        }
    }
}

/// Options for the lookup endpoint.
#[derive(Debug, Clone)]
pub struct LookupParams {
    pub look_for: LookFor,
    pub lang: String,
    pub limit: u32,
    pub convert_case: bool,
}

impl Default for LookupParams {
    fn default() -> Self {
        Self {
            look_for: LookFor::Both,
            lang: "en".to_string(),
            limit: 30,
            convert_case: true,
        }
    }
}

/// Result of a name lookup.
#[derive(Debug, Clone, Default)]
pub struct HotelLookup {
    pub hotels: Vec<HotelSmall>,
    pub locations: Vec<HotelLocation>,
}

/// Result of a coordinate lookup.
#[derive(Debug, Clone, Default)]
pub struct CoordinateLookup {
    pub hotels: Vec<HotelSmall>,
    pub locations: Vec<HotelLocationSmall>,
}

/// Filters for the price cache.
#[derive(Debug, Clone)]
pub struct CostOfLivingParams {
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub currency: String,
    pub location_id: Option<i64>,
    pub hotel_id: Option<i64>,
    pub hotel: Option<String>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub limit: u32,
    pub customer_ip: Option<String>,
}

impl CostOfLivingParams {
    pub fn new(
        location: impl Into<String>,
        check_in: impl Into<String>,
        check_out: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            check_in: check_in.into(),
            check_out: check_out.into(),
            currency: "eur".to_string(),
            location_id: None,
            hotel_id: None,
            hotel: None,
            adults: 2,
            children: 0,
            infants: 0,
            limit: 4,
            customer_ip: None,
        }
    }
}

/// One price-cache entry with its location resolved.
#[derive(Debug, Clone)]
pub struct CostOfLivingEntry {
    pub location: HotelLocationSmall,
    /// The remaining entry fields as returned by the cache.
    pub record: Map<String, Value>,
}

/// Service over the hotel catalog endpoints.
pub struct HotelsService {
    client: Arc<HotelsClient>,
    resolver: Arc<dyn PlaceResolver>,
}

impl HotelsService {
    pub fn new(client: Arc<HotelsClient>, resolver: Arc<dyn PlaceResolver>) -> Self {
        Self { client, resolver }
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Find hotels and locations matching a free-text query.
    pub async fn lookup(&self, query: &str, params: &LookupParams) -> ApiResult<HotelLookup> {
        let response = self.lookup_raw(query, params).await?;
        Ok(HotelLookup {
            hotels: items_of(response.pointer("/results/hotels"))
                .into_iter()
                .map(map_hotel_small)
                .collect(),
            locations: items_of(response.pointer("/results/locations"))
                .into_iter()
                .map(map_location)
                .collect(),
        })
    }

    /// Find hotels and locations near a coordinate pair.
    pub async fn lookup_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
        params: &LookupParams,
    ) -> ApiResult<CoordinateLookup> {
        let query = format!("{lat},{lon}");
        let response = self.lookup_raw(&query, params).await?;
        Ok(CoordinateLookup {
            hotels: items_of(response.pointer("/results/hotels"))
                .into_iter()
                .map(map_hotel_small)
                .collect(),
            locations: items_of(response.pointer("/results/locations"))
                .into_iter()
                .map(map_location_small)
                .collect(),
        })
    }

    async fn lookup_raw(&self, query: &str, params: &LookupParams) -> ApiResult<Value> {
        let options = object(json!({
            "query": query,
            "lang": params.lang,
            "lookFor": params.look_for.as_wire(),
            "limit": params.limit,
            "convertCase": params.convert_case,
        }));
        self.client
            .get(HOTELS_CATALOG_VERSION, paths::LOOKUP, options)
            .await
    }

    // =========================================================================
    // PRICE CACHE
    // =========================================================================

    /// Recently seen prices for a location.
    ///
    /// Each entry's nested `location` is lifted into a typed record whose
    /// country ISO code comes from the reference data; entries without a
    /// country name are skipped.
    pub async fn cost_of_living(
        &self,
        params: &CostOfLivingParams,
    ) -> ApiResult<Vec<CostOfLivingEntry>> {
        let response: Value = self
            .client
            .get(HOTELS_CATALOG_VERSION, paths::CACHE, cost_options(params))
            .await?;
        map_cost_entries(self.resolver.as_ref(), &response).await
    }

    // =========================================================================
    // SELECTIONS
    // =========================================================================

    /// Widget selection dump for a location or collection.
    pub async fn hotels_selection(
        &self,
        check_in: &str,
        check_out: &str,
        selection_type: &str,
        id: i64,
        currency: &str,
        language: &str,
        limit: u32,
    ) -> ApiResult<Map<String, Value>> {
        validate_language(language)?;
        let options = object(json!({
            "check_in": check_in,
            "check_out": check_out,
            "currency": currency,
            "language": language,
            "limit": limit,
            "type": selection_type,
            "id": id,
        }));
        self.client
            .get(HOTELS_CATALOG_VERSION, paths::COLLECTIONS, options)
            .await
    }

    /// Selection types available for a location.
    pub async fn hotel_collections_types(&self, id: i64) -> ApiResult<Vec<Value>> {
        let options = object(json!({ "id": id }));
        self.client
            .get(HOTELS_CATALOG_VERSION, paths::COLLECTION_TYPES, options)
            .await
    }

    // =========================================================================
    // STATIC DICTIONARIES
    // =========================================================================

    /// All hotels of one location from the static catalog.
    pub async fn hotels_list_by_location(&self, location_id: i64) -> ApiResult<Vec<Hotel>> {
        let options = object(json!({ "locationId": location_id }));
        let response: Value = self
            .client
            .get(HOTELS_CATALOG_VERSION, paths::STATIC_HOTELS, options)
            .await?;
        Ok(map_hotels_list(&response))
    }

    /// Room type id → name.
    pub async fn room_types(&self, language: &str) -> ApiResult<HashMap<String, String>> {
        validate_language(language)?;
        let options = object(json!({ "language": language }));
        self.client
            .get(HOTELS_CATALOG_VERSION, paths::ROOM_TYPES, options)
            .await
    }

    /// Hotel type id → name.
    pub async fn hotels_types(&self, language: &str) -> ApiResult<HashMap<String, String>> {
        validate_language(language)?;
        let options = object(json!({ "language": language }));
        self.client
            .get(HOTELS_CATALOG_VERSION, paths::HOTEL_TYPES, options)
            .await
    }
}

/// CDN URL of a hotel photo crop.
pub fn photo_url(hotel_id: i64, photo_id: i64, photo_size: &str, auto: bool) -> String {
    let extension = if auto { "auto" } else { "jpg" };
    format!(
        "{}/h{hotel_id}_{photo_id}/{photo_size}.{extension}",
        endpoints::PHOTO_CDN_URL
    )
}

async fn map_cost_entries(
    resolver: &dyn PlaceResolver,
    response: &Value,
) -> ApiResult<Vec<CostOfLivingEntry>> {
    let mut entries = Vec::new();
    for entry in response.as_array().into_iter().flatten() {
        let Some(entry) = entry.as_object() else {
            continue;
        };
        let Some(location) = entry.get("location").and_then(Value::as_object) else {
            continue;
        };
        let Some(country) = location.get("country").and_then(Value::as_str) else {
            continue;
        };

        let country_iso = match resolver.resolve_country_by_name(country).await? {
            Some(record) => record.code,
            None => String::new(),
        };

        let model = cost_location(entry, location, country_iso);
        let mut record = entry.clone();
        record.remove("location");
        entries.push(CostOfLivingEntry {
            location: model,
            record,
        });
    }
    Ok(entries)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn validate_language(language: &str) -> ApiResult<()> {
    if CATALOG_LANGUAGES.contains(&language) {
        return Ok(());
    }
    Err(ApiError::validation(format!(
        "{language} is not a valid language. Possible options: {}",
        CATALOG_LANGUAGES.join(", ")
    )))
}

fn cost_options(params: &CostOfLivingParams) -> Map<String, Value> {
    object(json!({
        "location": params.location,
        "checkIn": params.check_in,
        "checkOut": params.check_out,
        "adults": params.adults,
        "children": params.children,
        "infants": params.infants,
        "limit": params.limit,
        "currency": params.currency,
        "locationId": params.location_id,
        "hotelId": params.hotel_id,
        "hotel": params.hotel,
        "customerIp": params.customer_ip,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Airport, CountryRecord, Place};
    use async_trait::async_trait;

    struct StubResolver;

    #[async_trait]
    impl PlaceResolver for StubResolver {
        async fn resolve_place(&self, _code: &str) -> ApiResult<Option<Place>> {
            Ok(None)
        }

        async fn resolve_airport(&self, _code: &str) -> ApiResult<Option<Airport>> {
            Ok(None)
        }

        async fn resolve_country_by_name(
            &self,
            name: &str,
        ) -> ApiResult<Option<CountryRecord>> {
            Ok((name == "Thailand").then(|| CountryRecord {
                code: "TH".to_string(),
                name: Some("Thailand".to_string()),
                currency: Some("THB".to_string()),
                name_translations: None,
            }))
        }
    }

    #[test]
    fn test_photo_url_formats() {
        assert_eq!(
            photo_url(305022, 1, "640x480", false),
            "https://cdn.photo.hotellook.com/image_v2/crop/h305022_1/640x480.jpg"
        );
        assert_eq!(
            photo_url(305022, 2, "320x240", true),
            "https://cdn.photo.hotellook.com/image_v2/crop/h305022_2/320x240.auto"
        );
    }

    #[test]
    fn test_language_validation() {
        assert!(validate_language("th").is_ok());
        assert!(validate_language("ru").is_ok());

        let err = validate_language("xx").unwrap_err();
        assert_eq!(
            err.to_string(),
            "xx is not a valid language. Possible options: pt, en, fr, de, id, it, pl, es, th, ru"
        );
    }

    #[test]
    fn test_cost_options_drop_absent_filters() {
        let params = CostOfLivingParams::new("Phuket", "2021-12-24", "2021-12-25");
        let options = cost_options(&params);

        assert_eq!(options["location"], "Phuket");
        assert_eq!(options["adults"], 2);
        assert_eq!(options["limit"], 4);
        assert_eq!(options["locationId"], Value::Null);
        assert_eq!(options["customerIp"], Value::Null);
    }

    #[test]
    fn test_lookup_params_defaults() {
        let params = LookupParams::default();
        assert_eq!(params.look_for.as_wire(), "both");
        assert_eq!(params.lang, "en");
        assert_eq!(params.limit, 30);
        assert!(params.convert_case);
    }

    #[tokio::test]
    async fn test_map_cost_entries_resolves_countries() {
        let response = serde_json::json!([
            {
                "hotelName": "Patong Bay Hotel",
                "priceAvg": 94.2,
                "location": {
                    "name": "Phuket",
                    "country": "Thailand",
                    "geo": {"lat": 7.89, "lon": 98.39},
                },
            },
            {
                "hotelName": "No Location Inn",
                "priceAvg": 50.0,
            },
            {
                "hotelName": "Nowhere Hotel",
                "priceAvg": 10.0,
                "location": {"name": "Atlantis", "country": "Atlantis"},
            },
        ]);

        let entries = map_cost_entries(&StubResolver, &response).await.unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].location.country_iso, "TH");
        assert_eq!(entries[0].location.name, "Phuket");
        assert!(!entries[0].record.contains_key("location"));
        assert_eq!(entries[0].record["hotelName"], "Patong Bay Hotel");

        // Unknown countries keep the entry with an empty ISO code.
        assert_eq!(entries[1].location.country_iso, "");
    }
}
