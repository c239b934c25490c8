//! Reference data service.
//!
//! Wraps the static JSON dumps on the core host (countries, cities,
//! airports, airlines, alliances, planes, routes) plus the two standalone
//! endpoints for currency rates and IP geolocation. Entity lists resolve
//! their back-references in memory: building cities fetches the countries
//! list once, building airports fetches countries and cities once.
//! Single-entity lookups fetch and scan, nothing is cached.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::endpoints::{self, data as paths};
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::model::{Airport, AirportRecord, City, CityRecord, Country, CountryRecord, Place};

/// Locales the geolocation endpoint localizes names for.
const SUPPORTED_LOCALES: &[&str] = &["en", "ru", "de", "fr", "it", "pl", "th"];

/// Wire record of `/data/en/airlines.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_lowcost: Option<bool>,
    #[serde(default)]
    pub name_translations: Option<HashMap<String, String>>,
}

/// Wire record of `/data/en/airlines_alliances.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceRecord {
    pub name: String,
    #[serde(default)]
    pub airlines: Vec<String>,
}

/// Wire record of `/data/en/planes.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneRecord {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Wire record of `/data/en/routes.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default)]
    pub airline_iata: Option<String>,
    #[serde(default)]
    pub airline_icao: Option<String>,
    #[serde(default)]
    pub departure_airport_iata: Option<String>,
    #[serde(default)]
    pub departure_airport_icao: Option<String>,
    #[serde(default)]
    pub arrival_airport_iata: Option<String>,
    #[serde(default)]
    pub arrival_airport_icao: Option<String>,
    #[serde(default)]
    pub codeshares: Option<Vec<String>>,
    #[serde(default)]
    pub transfers: i64,
    #[serde(default)]
    pub planes: Vec<String>,
}

/// Geolocation of a user IP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

/// Place lookup used while mapping ticket records.
///
/// The mapper resolves origin and destination codes through this seam so
/// tests can supply a fixed set of places.
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Resolve a code to a city first, then an airport.
    async fn resolve_place(&self, code: &str) -> ApiResult<Option<Place>>;

    /// Resolve a code to an airport only.
    async fn resolve_airport(&self, code: &str) -> ApiResult<Option<Airport>>;

    /// Find a country record by its English name.
    async fn resolve_country_by_name(&self, name: &str) -> ApiResult<Option<CountryRecord>>;
}

/// Service over the reference data endpoints.
pub struct DataService {
    client: Arc<ApiClient>,
}

impl DataService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // =========================================================================
    // RAW LISTS
    // =========================================================================

    /// Countries as the dump publishes them.
    pub async fn countries_raw(&self) -> ApiResult<Vec<CountryRecord>> {
        self.client.fetch_json(paths::COUNTRIES).await
    }

    /// Cities as the dump publishes them.
    pub async fn cities_raw(&self) -> ApiResult<Vec<CityRecord>> {
        self.client.fetch_json(paths::CITIES).await
    }

    /// Airports as the dump publishes them.
    pub async fn airports_raw(&self) -> ApiResult<Vec<AirportRecord>> {
        self.client.fetch_json(paths::AIRPORTS).await
    }

    // =========================================================================
    // ENTITY LISTS
    // =========================================================================

    /// All countries.
    pub async fn countries(&self) -> ApiResult<Vec<Country>> {
        let records = self.countries_raw().await?;
        Ok(records.into_iter().map(Country::from_record).collect())
    }

    /// All cities with their countries resolved.
    pub async fn cities(&self) -> ApiResult<Vec<City>> {
        let countries = self.countries_raw().await?;
        let cities = self.cities_raw().await?;
        Ok(build_cities(cities, &countries))
    }

    /// All airports with their cities and countries resolved.
    pub async fn airports(&self) -> ApiResult<Vec<Airport>> {
        let countries = self.countries_raw().await?;
        let cities = self.cities_raw().await?;
        let airports = self.airports_raw().await?;
        Ok(build_airports(airports, cities, &countries))
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// Country by IATA code.
    pub async fn country(&self, code: &str) -> ApiResult<Option<Country>> {
        let records = self.countries_raw().await?;
        Ok(records
            .into_iter()
            .find(|r| r.code == code)
            .map(Country::from_record))
    }

    /// City by IATA code, with its country resolved.
    pub async fn city(&self, code: &str) -> ApiResult<Option<City>> {
        let records = self.cities_raw().await?;
        let Some(record) = records.into_iter().find(|r| r.code == code) else {
            return Ok(None);
        };
        let country = match record.country_code.as_deref() {
            Some(code) => self.country(code).await?,
            None => None,
        };
        Ok(Some(City::from_record(record, country)))
    }

    /// Airport by IATA code, with its city resolved.
    pub async fn airport(&self, code: &str) -> ApiResult<Option<Airport>> {
        let records = self.airports_raw().await?;
        let Some(record) = records.into_iter().find(|r| r.code == code) else {
            return Ok(None);
        };
        let city = match record.city_code.as_deref() {
            Some(code) => self.city(code).await?,
            None => None,
        };
        Ok(Some(Airport::from_record(record, city)))
    }

    /// Place by IATA code: city first, then airport.
    pub async fn place(&self, code: &str) -> ApiResult<Option<Place>> {
        if let Some(city) = self.city(code).await? {
            return Ok(Some(Place::City(city)));
        }
        Ok(self.airport(code).await?.map(Place::Airport))
    }

    /// Country record by its English name.
    pub async fn country_by_name(&self, name: &str) -> ApiResult<Option<CountryRecord>> {
        let records = self.countries_raw().await?;
        Ok(records
            .into_iter()
            .find(|r| r.name.as_deref() == Some(name)))
    }

    // =========================================================================
    // OTHER LISTS
    // =========================================================================

    /// All airlines.
    pub async fn airlines(&self) -> ApiResult<Vec<AirlineRecord>> {
        self.client.fetch_json(paths::AIRLINES).await
    }

    /// Airline alliances and their members.
    pub async fn airlines_alliances(&self) -> ApiResult<Vec<AllianceRecord>> {
        self.client.fetch_json(paths::AIRLINES_ALLIANCES).await
    }

    /// Aircraft types.
    pub async fn planes(&self) -> ApiResult<Vec<PlaneRecord>> {
        self.client.fetch_json(paths::PLANES).await
    }

    /// Known routes.
    pub async fn routes(&self) -> ApiResult<Vec<RouteRecord>> {
        self.client.fetch_json(paths::ROUTES).await
    }

    // =========================================================================
    // STANDALONE ENDPOINTS
    // =========================================================================

    /// Currency exchange rates against the rouble.
    pub async fn currencies(&self) -> ApiResult<HashMap<String, f64>> {
        self.client.fetch_json(endpoints::CURRENCY_RATES_URL).await
    }

    /// Locate a user by IP address.
    ///
    /// The IP is validated before any request goes out; unsupported
    /// locales fall back to English.
    pub async fn where_am_i(&self, ip: &str, locale: &str) -> ApiResult<UserLocation> {
        if ip.parse::<IpAddr>().is_err() {
            return Err(ApiError::validation(format!("{ip} is not a valid ip")));
        }
        let locale = normalize_locale(locale);
        let url = format!("{}?locale={locale}&ip={ip}", endpoints::WHEREAMI_URL);
        self.client.fetch_json(&url).await
    }
}

#[async_trait]
impl PlaceResolver for DataService {
    async fn resolve_place(&self, code: &str) -> ApiResult<Option<Place>> {
        self.place(code).await
    }

    async fn resolve_airport(&self, code: &str) -> ApiResult<Option<Airport>> {
        self.airport(code).await
    }

    async fn resolve_country_by_name(&self, name: &str) -> ApiResult<Option<CountryRecord>> {
        self.country_by_name(name).await
    }
}

fn normalize_locale(locale: &str) -> &str {
    if SUPPORTED_LOCALES.contains(&locale) {
        locale
    } else {
        "en"
    }
}

/// Map city records to entities against a fetched countries list.
fn build_cities(cities: Vec<CityRecord>, countries: &[CountryRecord]) -> Vec<City> {
    let by_code: HashMap<&str, &CountryRecord> =
        countries.iter().map(|c| (c.code.as_str(), c)).collect();

    cities
        .into_iter()
        .map(|record| {
            let country = record
                .country_code
                .as_deref()
                .and_then(|code| by_code.get(code))
                .map(|&r| Country::from_record(r.clone()));
            City::from_record(record, country)
        })
        .collect()
}

/// Map airport records to entities against fetched city and country lists.
fn build_airports(
    airports: Vec<AirportRecord>,
    cities: Vec<CityRecord>,
    countries: &[CountryRecord],
) -> Vec<Airport> {
    let cities = build_cities(cities, countries);
    let by_code: HashMap<&str, &City> = cities.iter().map(|c| (c.iata.as_str(), c)).collect();

    airports
        .into_iter()
        .map(|record| {
            let city = record
                .city_code
                .as_deref()
                .and_then(|code| by_code.get(code))
                .map(|&c| c.clone());
            Airport::from_record(record, city)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RestConfig;
    use serde_json::json;

    fn country_record(code: &str, name: &str) -> CountryRecord {
        CountryRecord {
            code: code.to_string(),
            name: Some(name.to_string()),
            currency: Some("EUR".to_string()),
            name_translations: None,
        }
    }

    fn city_record(code: &str, country: &str) -> CityRecord {
        CityRecord {
            code: code.to_string(),
            name: Some(code.to_string()),
            country_code: Some(country.to_string()),
            time_zone: None,
            coordinates: None,
            name_translations: None,
        }
    }

    fn service() -> DataService {
        let client = ApiClient::new(
            "https://api.example.com",
            "test_token",
            &RestConfig::default(),
        )
        .unwrap();
        DataService::new(Arc::new(client))
    }

    #[test]
    fn test_build_cities_resolves_countries() {
        let countries = vec![country_record("RU", "Russia")];
        let cities = build_cities(
            vec![city_record("LED", "RU"), city_record("XXX", "ZZ")],
            &countries,
        );

        assert_eq!(cities.len(), 2);
        assert_eq!(
            cities[0].country.as_ref().map(|c| c.name.as_str()),
            Some("Russia")
        );
        assert_eq!(cities[1].country, None);
    }

    #[test]
    fn test_build_airports_resolves_city_chain() {
        let countries = vec![country_record("RU", "Russia")];
        let cities = vec![city_record("LED", "RU")];
        let airports = build_airports(
            vec![AirportRecord {
                code: "LED".to_string(),
                name: Some("Pulkovo".to_string()),
                city_code: Some("LED".to_string()),
                time_zone: None,
                coordinates: None,
                name_translations: None,
            }],
            cities,
            &countries,
        );

        let city = airports[0].city.as_ref().unwrap();
        assert_eq!(city.iata, "LED");
        assert_eq!(city.country.as_ref().map(|c| c.iata.as_str()), Some("RU"));
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("ru"), "ru");
        assert_eq!(normalize_locale("th"), "th");
        assert_eq!(normalize_locale("xx"), "en");
    }

    #[test]
    fn test_airline_record_deserializes() {
        let airline: AirlineRecord = serde_json::from_value(json!({
            "id": 26,
            "code": "U2",
            "alias": null,
            "name": "easyJet",
            "is_lowcost": true,
            "name_translations": {"en": "easyJet"},
        }))
        .unwrap();
        assert_eq!(airline.code, "U2");
        assert_eq!(airline.is_lowcost, Some(true));
    }

    #[test]
    fn test_route_record_deserializes() {
        let route: RouteRecord = serde_json::from_value(json!({
            "airline_iata": "2B",
            "departure_airport_iata": "AER",
            "arrival_airport_iata": "EVN",
            "transfers": 0,
            "planes": ["CR2"],
        }))
        .unwrap();
        assert_eq!(route.departure_airport_iata.as_deref(), Some("AER"));
        assert_eq!(route.planes, vec!["CR2"]);
    }

    #[tokio::test]
    async fn test_where_am_i_rejects_invalid_ip() {
        let err = service()
            .where_am_i("not-an-ip", "en")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "not-an-ip is not a valid ip");
    }
}
