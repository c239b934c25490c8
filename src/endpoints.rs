//! Travelpayouts API endpoints.
//!
//! This module centralizes all hosts and endpoint paths for:
//! - The core API (flight prices, reference data, partner statistics)
//! - The hotel engine and the hotel catalog dump host
//! - Standalone absolute endpoints outside the core host

/// Default host for the core API.
pub const API_HOST: &str = "https://api.travelpayouts.com";

/// Default host for the hotel search and catalog API.
pub const HOTELS_HOST: &str = "https://engine.hotellook.com";

/// Host serving the hotel catalog dumps. Requests to this host are routed
/// under the `/tp` prefix instead of the versioned `/api` prefix.
pub const HOTELS_YASEN_HOST: &str = "https://yasen.hotellook.com";

/// Geo-IP lookup endpoint (absolute, outside the core host).
pub const WHEREAMI_URL: &str = "https://www.travelpayouts.com/whereami";

/// Currency exchange rates endpoint (absolute).
pub const CURRENCY_RATES_URL: &str = "https://yasen.aviasales.ru/adaptors/currency.json";

/// Hotel photo CDN. Photo URLs append `h{hotel}_{photo}/{size}.{ext}`.
pub const PHOTO_CDN_URL: &str = "https://cdn.photo.hotellook.com/image_v2/crop";

/// Endpoint paths on the core API host.
///
/// Paths embed their API version. The version is part of the endpoint
/// contract, so it is fixed per path rather than configured per client.
pub mod flights {
    // ==================== REALTIME SEARCH ====================

    /// Start a realtime flight search (signed, POST)
    pub const FLIGHT_SEARCH: &str = "/v1/flight_search";

    /// Poll realtime search results (signed)
    pub const FLIGHT_SEARCH_RESULTS: &str = "/v1/flight_search_results";

    // ==================== CACHED PRICES ====================

    /// Latest cached prices
    pub const PRICES_LATEST: &str = "/v2/prices/latest";

    /// Cheapest price per day of month
    pub const PRICES_MONTH_MATRIX: &str = "/v2/prices/month-matrix";

    /// Prices from places near the origin
    pub const PRICES_NEAREST_PLACES_MATRIX: &str = "/v2/prices/nearest-places-matrix";

    /// Price matrix around a date pair
    pub const PRICES_WEEK_MATRIX: &str = "/v2/prices/week-matrix";

    /// Calendar of cheapest prices
    pub const PRICES_CALENDAR: &str = "/v1/prices/calendar";

    /// Cheapest tickets per destination
    pub const PRICES_CHEAP: &str = "/v1/prices/cheap";

    /// Cheapest tickets without transfers
    pub const PRICES_DIRECT: &str = "/v1/prices/direct";

    /// Cheapest tickets grouped by month
    pub const PRICES_MONTHLY: &str = "/v1/prices/monthly";

    // ==================== DIRECTIONS ====================

    /// Popular directions from a city
    pub const CITY_DIRECTIONS: &str = "/v1/city-directions";

    /// Popular directions of an airline
    pub const AIRLINE_DIRECTIONS: &str = "/v1/airline-directions";
}

/// Reference data endpoints on the core API host.
///
/// These are static JSON dumps, published unversioned.
pub mod data {
    /// Countries with names and currencies
    pub const COUNTRIES: &str = "/data/en/countries.json";

    /// Cities with coordinates and time zones
    pub const CITIES: &str = "/data/en/cities.json";

    /// Airports with coordinates and city codes
    pub const AIRPORTS: &str = "/data/en/airports.json";

    /// Airlines
    pub const AIRLINES: &str = "/data/en/airlines.json";

    /// Airline alliances
    pub const AIRLINES_ALLIANCES: &str = "/data/en/airlines_alliances.json";

    /// Aircraft types
    pub const PLANES: &str = "/data/en/planes.json";

    /// Known routes
    pub const ROUTES: &str = "/data/en/routes.json";
}

/// Partner statistics endpoints on the core API host.
pub mod partner {
    /// Account balance
    pub const BALANCE: &str = "/v2/statistics/balance";

    /// Payment history
    pub const PAYMENTS: &str = "/v2/statistics/payments";

    /// Sales grouped by date, host or marker
    pub const SALES: &str = "/v2/statistics/sales";

    /// Sales broken down by date and marker
    pub const DETAILED_SALES: &str = "/v2/statistics/detailed-sales";
}

/// Endpoint paths on the hotel hosts.
///
/// These are bare operation names. The hotels client turns them into
/// `/api/{version}/{path}.json` on the engine host and `/tp/{path}.json`
/// on the dump host.
pub mod hotels {
    // ==================== REALTIME SEARCH (v1) ====================

    /// Start a realtime hotel search (signed)
    pub const SEARCH_START: &str = "search/start";

    /// Poll realtime search results (signed)
    pub const SEARCH_RESULTS: &str = "search/getResult";

    // ==================== CATALOG (v2) ====================

    /// Find hotels or locations by free-text term
    pub const LOOKUP: &str = "lookup";

    /// Cached minimum prices
    pub const CACHE: &str = "cache";

    /// Hotel list of a location
    pub const STATIC_HOTELS: &str = "static/hotels";

    /// Room type names
    pub const ROOM_TYPES: &str = "static/roomTypes";

    /// Hotel type names
    pub const HOTEL_TYPES: &str = "static/hotelTypes";

    // ==================== DUMP HOST ====================

    /// Hotel collections of a city
    pub const COLLECTIONS: &str = "public/widget_location_dump";

    /// Collection types available for a city
    pub const COLLECTION_TYPES: &str = "public/available_selections";
}

/// API version for the realtime hotel search endpoints.
pub const HOTELS_SEARCH_VERSION: &str = "v1";

/// API version for the hotel catalog endpoints.
pub const HOTELS_CATALOG_VERSION: &str = "v2";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosts() {
        assert_eq!(API_HOST, "https://api.travelpayouts.com");
        assert!(HOTELS_HOST.contains("engine.hotellook.com"));
        assert!(HOTELS_YASEN_HOST.contains("yasen.hotellook.com"));
    }

    #[test]
    fn test_flight_paths_embed_version() {
        assert!(flights::FLIGHT_SEARCH.starts_with("/v1/"));
        assert!(flights::PRICES_LATEST.starts_with("/v2/"));
        assert!(flights::PRICES_CALENDAR.starts_with("/v1/"));
        assert!(flights::PRICES_WEEK_MATRIX.starts_with("/v2/"));
    }

    #[test]
    fn test_data_paths_are_unversioned() {
        assert!(data::COUNTRIES.starts_with("/data/"));
        assert!(data::ROUTES.ends_with(".json"));
    }

    #[test]
    fn test_partner_paths() {
        assert!(partner::BALANCE.starts_with("/v2/statistics/"));
        assert!(partner::DETAILED_SALES.ends_with("detailed-sales"));
    }

    #[test]
    fn test_hotel_paths_are_bare() {
        assert!(!hotels::SEARCH_START.starts_with('/'));
        assert!(!hotels::LOOKUP.contains(".json"));
    }
}
