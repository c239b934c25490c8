//! Hotel search sessions.
//!
//! A session starts with a signed GET against `search/start` identifying
//! the place (IATA, city id or hotel id), the dates and the party; results
//! are then fetched by the search id with a second signed GET. Both calls
//! return the raw JSON envelope.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::canonical::SignFields;
use crate::endpoints::{hotels as paths, HOTELS_SEARCH_VERSION};
use crate::error::{ApiError, ApiResult};
use crate::http::HotelsClient;
use crate::model::{HotelSort, SortOrder};
use crate::signature::{compute_signature, SignaturePolicy};

/// Locales the search endpoint accepts; anything else falls back to `en`.
const SUPPORTED_LOCALES: &[&str] = &["en", "ru", "de", "fr", "it", "pl", "th"];

/// Parameters of one hotel search.
///
/// At least one of `iata`, `city_id` or `hotel_id` must be set. Child ages
/// are only sent for as many children as `children_count` declares.
#[derive(Debug, Clone)]
pub struct HotelSearchRequest {
    pub marker: String,
    pub iata: Option<String>,
    pub city_id: Option<i64>,
    pub hotel_id: Option<i64>,
    /// Check-in date, `YYYY-MM-DD`.
    pub check_in: String,
    /// Check-out date, `YYYY-MM-DD`.
    pub check_out: String,
    pub adults_count: u32,
    pub children_count: u32,
    pub child_age1: u32,
    pub child_age2: u32,
    pub child_age3: u32,
    /// Server-side search timeout in seconds. Not part of the signature.
    pub timeout: u32,
    pub customer_ip: String,
    pub locale: String,
    pub currency: String,
    pub wait_for_results: bool,
}

impl HotelSearchRequest {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            iata: None,
            city_id: None,
            hotel_id: None,
            check_in: String::new(),
            check_out: String::new(),
            adults_count: 0,
            children_count: 0,
            child_age1: 1,
            child_age2: 1,
            child_age3: 1,
            timeout: 20,
            customer_ip: String::new(),
            locale: "en".to_string(),
            currency: "EUR".to_string(),
            wait_for_results: false,
        }
    }

    fn normalized_locale(&self) -> &str {
        if SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            &self.locale
        } else {
            "en"
        }
    }

    /// Validate the request and build its query field set.
    fn query_fields(&self) -> ApiResult<SignFields> {
        if self.iata.is_none() && self.city_id.is_none() && self.hotel_id.is_none() {
            return Err(ApiError::validation(
                "cityId, hotelId or iata should not be null",
            ));
        }
        if self.children_count > 3 {
            return Err(ApiError::validation("no more then 3 children allowed"));
        }

        let mut fields = SignFields::new();
        fields.insert("marker", self.marker.as_str());
        fields.insert("adultsCount", self.adults_count);
        fields.insert("checkIn", self.check_in.as_str());
        fields.insert("checkOut", self.check_out.as_str());
        fields.insert("childrenCount", self.children_count);
        fields.insert("currency", self.currency.as_str());
        fields.insert("customerIP", self.customer_ip.as_str());
        fields.insert("lang", self.normalized_locale());
        fields.insert("timeout", self.timeout);
        fields.insert("waitForResults", i64::from(self.wait_for_results));

        if let Some(iata) = &self.iata {
            fields.insert("iata", iata.as_str());
        }
        if let Some(city_id) = self.city_id {
            fields.insert("cityId", city_id);
        }
        if let Some(hotel_id) = self.hotel_id {
            fields.insert("hotelId", hotel_id);
        }
        if self.children_count >= 1 {
            fields.insert("childAge1", self.child_age1);
        }
        if self.children_count >= 2 {
            fields.insert("childAge2", self.child_age2);
        }
        if self.children_count == 3 {
            fields.insert("childAge3", self.child_age3);
        }

        Ok(fields)
    }
}

/// Paging and ordering for search results.
#[derive(Debug, Clone, Copy)]
pub struct SearchResultsParams {
    pub sort_by: HotelSort,
    pub sort_order: SortOrder,
    pub rooms_count: u32,
    /// 0 means no limit.
    pub limit: u32,
    pub offset: u32,
}

impl Default for SearchResultsParams {
    fn default() -> Self {
        Self {
            sort_by: HotelSort::Popularity,
            sort_order: SortOrder::Ascending,
            rooms_count: 0,
            limit: 0,
            offset: 0,
        }
    }
}

fn results_fields(marker: &str, uuid: &str, params: &SearchResultsParams) -> SignFields {
    let mut fields = SignFields::new();
    fields.insert("marker", marker);
    fields.insert("searchId", uuid);
    fields.insert("limit", params.limit);
    fields.insert("sortBy", params.sort_by.as_wire());
    fields.insert("offset", params.offset);
    fields.insert("sortAsc", params.sort_order.as_wire());
    fields.insert("roomsCount", params.rooms_count);
    fields
}

fn options_from(fields: &SignFields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.as_rendered())))
        .collect()
}

/// Service over the hotel search endpoints.
pub struct HotelSearchService {
    client: Arc<HotelsClient>,
}

impl HotelSearchService {
    pub fn new(client: Arc<HotelsClient>) -> Self {
        Self { client }
    }

    /// Start a search session. The response carries the `searchId` to
    /// poll with.
    pub async fn search(&self, request: &HotelSearchRequest) -> ApiResult<Value> {
        let fields = request.query_fields()?;
        let signature = compute_signature(
            SignaturePolicy::HotelSearch,
            self.client.token(),
            fields.clone(),
        )?;

        let mut options = options_from(&fields);
        options.insert("signature".to_string(), Value::String(signature));
        self.client
            .get(HOTELS_SEARCH_VERSION, paths::SEARCH_START, options)
            .await
    }

    /// Fetch the results of a search session.
    pub async fn search_results(
        &self,
        marker: &str,
        uuid: &str,
        params: &SearchResultsParams,
    ) -> ApiResult<Value> {
        let fields = results_fields(marker, uuid, params);
        let signature = compute_signature(
            SignaturePolicy::HotelSearch,
            self.client.token(),
            fields.clone(),
        )?;

        let mut options = options_from(&fields);
        options.insert("signature".to_string(), Value::String(signature));
        self.client
            .get(HOTELS_SEARCH_VERSION, paths::SEARCH_RESULTS, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_request() -> HotelSearchRequest {
        let mut request = HotelSearchRequest::new("344747");
        request.iata = Some("HKT".to_string());
        request.check_in = "2021-12-24".to_string();
        request.check_out = "2021-12-25".to_string();
        request.adults_count = 2;
        request.children_count = 1;
        request.child_age1 = 12;
        request.customer_ip = "94.220.248.74".to_string();
        request
    }

    #[test]
    fn test_search_signature_matches_reference() {
        let fields = reference_request().query_fields().unwrap();
        let signature =
            compute_signature(SignaturePolicy::HotelSearch, "DUMMY_TOKEN", fields).unwrap();
        assert_eq!(signature, "551c1e09882439deb70fd4ca10febca8");
    }

    #[test]
    fn test_results_signature_matches_reference() {
        let fields = results_fields("123", "863394", &SearchResultsParams::default());
        let signature =
            compute_signature(SignaturePolicy::HotelSearch, "DUMMY_TOKEN", fields).unwrap();
        assert_eq!(signature, "08d22dea3795b71dbbd50084ade2e5c4");
    }

    #[test]
    fn test_search_requires_a_place() {
        let mut request = reference_request();
        request.iata = None;
        let err = request.query_fields().unwrap_err();
        assert_eq!(err.to_string(), "cityId, hotelId or iata should not be null");

        request.city_id = Some(12209);
        assert!(request.query_fields().is_ok());
    }

    #[test]
    fn test_search_rejects_four_children() {
        let mut request = reference_request();
        request.children_count = 4;
        let err = request.query_fields().unwrap_err();
        assert_eq!(err.to_string(), "no more then 3 children allowed");

        request.children_count = 3;
        assert!(request.query_fields().is_ok());
    }

    #[test]
    fn test_child_ages_follow_children_count() {
        let mut request = reference_request();
        request.children_count = 0;
        let fields = request.query_fields().unwrap();
        assert!(!fields.contains("childAge1"));

        request.children_count = 3;
        let fields = request.query_fields().unwrap();
        assert!(fields.contains("childAge1"));
        assert!(fields.contains("childAge2"));
        assert!(fields.contains("childAge3"));
    }

    #[test]
    fn test_unknown_locale_falls_back_to_en() {
        let mut request = reference_request();
        request.locale = "xx".to_string();
        let fields = request.query_fields().unwrap();
        assert_eq!(
            fields.iter().find(|(k, _)| *k == "lang").map(|(_, v)| v.as_rendered()),
            Some("en".to_string())
        );
    }

    #[test]
    fn test_options_render_as_strings() {
        let fields = reference_request().query_fields().unwrap();
        let options = options_from(&fields);
        assert_eq!(options["adultsCount"], "2");
        assert_eq!(options["waitForResults"], "0");
        assert_eq!(options["iata"], "HKT");
    }
}
