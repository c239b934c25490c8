//! Cached flight price endpoints.
//!
//! These wrap the aggregated price API: latest found prices, the month and
//! week matrices, nearby-airport pricing, the price calendar and the cheap,
//! direct and monthly lookups, plus the popularity endpoints. Responses are
//! mapped into [`Ticket`]s; origin and destination codes resolve through
//! the shared [`PlaceResolver`].

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::data::PlaceResolver;
use crate::endpoints::flights as paths;
use crate::error::ApiResult;
use crate::flights::normalizer::{collect_records, map_records, map_response, map_ticket};
use crate::http::ApiClient;
use crate::model::{Airport, Place, Ticket, TripClass};
use crate::time::{format_with_granularity, is_full_date, parse_date};

/// Period types the latest-prices endpoint accepts. `seasson` is how the
/// API spells it.
const PERIOD_TYPES: &[&str] = &["year", "month", "seasson", "day"];

/// Currencies the v1 price endpoints accept.
const PRICE_CURRENCIES: &[&str] = &["usd", "eur"];

/// Which date the price calendar pivots on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarType {
    DepartureDate,
    ReturnDate,
}

impl CalendarType {
    pub fn as_wire(&self) -> &'static str {
        match self {
            CalendarType::DepartureDate => "departure_date",
            CalendarType::ReturnDate => "return_date",
        }
    }
}

/// Filters for the latest-prices endpoint.
#[derive(Debug, Clone)]
pub struct LatestPricesParams {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub one_way: bool,
    pub currency: String,
    /// `year`, `month`, `seasson` or `day`; anything else becomes `year`.
    pub period_type: String,
    pub page: u32,
    pub limit: u32,
    pub show_to_affiliates: bool,
    pub sorting: String,
    pub trip_class: TripClass,
    pub trip_duration: Option<u32>,
}

impl Default for LatestPricesParams {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            one_way: false,
            currency: "eur".to_string(),
            period_type: "year".to_string(),
            page: 1,
            limit: 30,
            show_to_affiliates: true,
            sorting: "price".to_string(),
            trip_class: TripClass::Economy,
            trip_duration: None,
        }
    }
}

/// One airline direction with its popularity rating.
#[derive(Debug, Clone)]
pub struct AirlineDirection {
    pub origin: Option<Place>,
    pub destination: Option<Place>,
    pub rating: i64,
}

/// Prices for airports near the requested origin and destination.
#[derive(Debug, Clone)]
pub struct NearestPlacesMatrix {
    pub prices: Vec<Ticket>,
    pub origins: Vec<Option<Airport>>,
    pub destinations: Vec<Option<Airport>>,
}

/// Service over the cached price endpoints.
pub struct TicketsService {
    client: Arc<ApiClient>,
    resolver: Arc<dyn PlaceResolver>,
}

impl TicketsService {
    pub fn new(client: Arc<ApiClient>, resolver: Arc<dyn PlaceResolver>) -> Self {
        Self { client, resolver }
    }

    // =========================================================================
    // PRICE LISTS
    // =========================================================================

    /// Latest prices found by other users.
    pub async fn latest_prices(&self, params: &LatestPricesParams) -> ApiResult<Vec<Ticket>> {
        let response: Value = self
            .client
            .get(paths::PRICES_LATEST, latest_options(params))
            .await?;
        map_response(self.resolver.as_ref(), &response, &params.currency).await
    }

    /// Day-by-day prices for one month.
    pub async fn month_matrix(
        &self,
        origin: &str,
        destination: &str,
        month: &str,
        currency: &str,
        show_to_affiliates: bool,
    ) -> ApiResult<Vec<Ticket>> {
        let month = parse_date(month)?.format("%Y-%m-%d").to_string();
        let options = object(json!({
            "currency": currency,
            "origin": origin,
            "destination": destination,
            "show_to_affiliates": show_to_affiliates,
            "month": month,
        }));

        let response: Value = self.client.get(paths::PRICES_MONTH_MATRIX, options).await?;
        map_response(self.resolver.as_ref(), &response, currency).await
    }

    /// Prices for airports near the requested pair.
    pub async fn nearest_places_matrix(
        &self,
        depart_date: &str,
        return_date: &str,
        origin: &str,
        destination: &str,
        currency: &str,
        show_to_affiliates: bool,
    ) -> ApiResult<NearestPlacesMatrix> {
        let options = object(json!({
            "currency": currency,
            "origin": origin,
            "destination": destination,
            "show_to_affiliates": show_to_affiliates,
            "depart_date": parse_date(depart_date)?.format("%Y-%m-%d").to_string(),
            "return_date": parse_date(return_date)?.format("%Y-%m-%d").to_string(),
        }));

        let response: Value = self
            .client
            .get(paths::PRICES_NEAREST_PLACES_MATRIX, options)
            .await?;

        let empty = Value::Null;
        let prices = collect_records(response.get("prices").unwrap_or(&empty));
        Ok(NearestPlacesMatrix {
            prices: map_records(self.resolver.as_ref(), &prices, currency).await?,
            origins: self
                .airports_for(response.get("origins").unwrap_or(&empty))
                .await?,
            destinations: self
                .airports_for(response.get("destinations").unwrap_or(&empty))
                .await?,
        })
    }

    /// Prices around one week.
    pub async fn week_matrix(
        &self,
        origin: &str,
        destination: &str,
        depart_date: &str,
        return_date: &str,
        currency: &str,
        show_to_affiliates: bool,
    ) -> ApiResult<Vec<Ticket>> {
        let options = object(json!({
            "currency": currency,
            "origin": origin,
            "destination": destination,
            "show_to_affiliates": show_to_affiliates,
            "depart_date": parse_date(depart_date)?.format("%Y-%m-%d").to_string(),
            "return_date": parse_date(return_date)?.format("%Y-%m-%d").to_string(),
        }));

        let response: Value = self.client.get(paths::PRICES_WEEK_MATRIX, options).await?;
        map_response(self.resolver.as_ref(), &response, currency).await
    }

    /// Cheapest price per day of one month.
    pub async fn calendar(
        &self,
        origin: &str,
        destination: &str,
        depart_date: &str,
        return_date: Option<&str>,
        currency: &str,
        calendar_type: CalendarType,
        trip_duration: Option<u32>,
    ) -> ApiResult<Vec<Ticket>> {
        let options = calendar_options(
            origin,
            destination,
            depart_date,
            return_date,
            currency,
            calendar_type,
            trip_duration,
        )?;

        let response: Value = self.client.get(paths::PRICES_CALENDAR, options).await?;
        map_response(self.resolver.as_ref(), &response, currency).await
    }

    // =========================================================================
    // CHEAP AND DIRECT LOOKUPS
    // =========================================================================

    /// Cheapest tickets for a pair, including flights with stops.
    pub async fn cheap(
        &self,
        origin: &str,
        destination: &str,
        depart_date: Option<&str>,
        return_date: Option<&str>,
        currency: &str,
    ) -> ApiResult<Vec<Ticket>> {
        let options = cheap_options(origin, destination, depart_date, return_date, currency)?;
        let response: Value = self.client.get(paths::PRICES_CHEAP, options).await?;

        let Some(origin_place) = self.resolver.resolve_place(origin).await? else {
            return Ok(Vec::new());
        };
        let Some(destination_place) = self.resolver.resolve_place(destination).await? else {
            return Ok(Vec::new());
        };

        let empty = Value::Null;
        let bucket = response
            .get("data")
            .and_then(|data| data.get(destination))
            .unwrap_or(&empty);

        let mut tickets = Vec::new();
        for record in collect_records(bucket) {
            tickets.push(map_ticket(
                record,
                origin_place.clone(),
                destination_place.clone(),
                currency,
            )?);
        }
        Ok(tickets)
    }

    /// Cheapest direct ticket for a pair, if any gate found one.
    pub async fn direct(
        &self,
        origin: &str,
        destination: &str,
        depart_date: Option<&str>,
        return_date: Option<&str>,
        currency: &str,
    ) -> ApiResult<Option<Ticket>> {
        let options = cheap_options(origin, destination, depart_date, return_date, currency)?;
        let response: Value = self.client.get(paths::PRICES_DIRECT, options).await?;

        let first_bucket = match response.get("data") {
            Some(Value::Object(map)) => map.values().next(),
            Some(Value::Array(items)) => items.first(),
            _ => None,
        };
        let Some(record) = first_bucket.and_then(|b| collect_records(b).into_iter().next()) else {
            return Ok(None);
        };

        let Some(origin_place) = self.resolver.resolve_place(origin).await? else {
            return Ok(None);
        };
        let Some(destination_place) = self.resolver.resolve_place(destination).await? else {
            return Ok(None);
        };

        map_ticket(record, origin_place, destination_place, currency).map(Some)
    }

    /// Cheapest price for each month of the coming year.
    pub async fn monthly(
        &self,
        origin: &str,
        destination: &str,
        currency: &str,
    ) -> ApiResult<Vec<Ticket>> {
        let options = object(json!({
            "currency": normalize_currency(currency),
            "origin": origin,
            "destination": destination,
        }));

        let response: Value = self.client.get(paths::PRICES_MONTHLY, options).await?;
        map_response(self.resolver.as_ref(), &response, currency).await
    }

    // =========================================================================
    // POPULARITY
    // =========================================================================

    /// Popular destinations from a city. Prices are quoted in euros.
    pub async fn popular_routes_from_city(&self, origin: &str) -> ApiResult<Vec<Ticket>> {
        let options = object(json!({ "origin": origin }));
        let response: Value = self.client.get(paths::CITY_DIRECTIONS, options).await?;
        map_response(self.resolver.as_ref(), &response, "eur").await
    }

    /// Popular directions of one airline, rated by searches.
    pub async fn airline_directions(
        &self,
        airline_code: &str,
        limit: u32,
    ) -> ApiResult<Vec<AirlineDirection>> {
        let options = object(json!({
            "airline_code": airline_code,
            "limit": limit,
        }));
        let response: Value = self.client.get(paths::AIRLINE_DIRECTIONS, options).await?;

        let mut directions = Vec::new();
        if let Some(data) = response.get("data").and_then(Value::as_object) {
            for (direction, rating) in data {
                let Some((origin, destination)) = direction.split_once('-') else {
                    continue;
                };
                directions.push(AirlineDirection {
                    origin: self.resolver.resolve_place(origin).await?,
                    destination: self.resolver.resolve_place(destination).await?,
                    rating: rating.as_i64().unwrap_or(0),
                });
            }
        }
        Ok(directions)
    }

    async fn airports_for(&self, codes: &Value) -> ApiResult<Vec<Option<Airport>>> {
        let mut airports = Vec::new();
        for code in codes.as_array().into_iter().flatten() {
            match code.as_str() {
                Some(code) => airports.push(self.resolver.resolve_airport(code).await?),
                None => airports.push(None),
            }
        }
        Ok(airports)
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn normalize_currency(currency: &str) -> &str {
    if PRICE_CURRENCIES.contains(&currency) {
        currency
    } else {
        "eur"
    }
}

fn normalize_period(period_type: &str) -> &str {
    if PERIOD_TYPES.contains(&period_type) {
        period_type
    } else {
        "year"
    }
}

fn latest_options(params: &LatestPricesParams) -> Map<String, Value> {
    object(json!({
        "origin": params.origin.as_deref().filter(|s| !s.is_empty()),
        "destination": params.destination.as_deref().filter(|s| !s.is_empty()),
        "one_way": params.one_way,
        "currency": params.currency,
        "period_type": normalize_period(&params.period_type),
        "page": params.page,
        "limit": params.limit,
        "show_to_affiliates": params.show_to_affiliates,
        "sorting": params.sorting,
        "trip_class": params.trip_class.as_wire(),
        "trip_duration": params.trip_duration,
    }))
}

fn calendar_options(
    origin: &str,
    destination: &str,
    depart_date: &str,
    return_date: Option<&str>,
    currency: &str,
    calendar_type: CalendarType,
    trip_duration: Option<u32>,
) -> ApiResult<Map<String, Value>> {
    let depart = parse_date(depart_date)?.format("%Y-%m").to_string();
    let ret = return_date
        .map(|d| parse_date(d).map(|p| p.format("%Y-%m").to_string()))
        .transpose()?;

    Ok(object(json!({
        "currency": normalize_currency(currency),
        "origin": origin,
        "destination": destination,
        "depart_date": depart,
        "return_date": ret,
        "trip_duration": trip_duration,
        "calendar_type": calendar_type.as_wire(),
    })))
}

/// Options for the cheap and direct endpoints.
///
/// Both dates are rendered day-precise or month-precise depending on the
/// departure date alone; a month-only departure coarsens the return date
/// too.
fn cheap_options(
    origin: &str,
    destination: &str,
    depart_date: Option<&str>,
    return_date: Option<&str>,
    currency: &str,
) -> ApiResult<Map<String, Value>> {
    let depart_full = depart_date.map(is_full_date).unwrap_or(false);

    let depart = depart_date
        .map(|d| parse_date(d).map(|p| format_with_granularity(p, depart_full)))
        .transpose()?;
    let ret = return_date
        .map(|d| parse_date(d).map(|p| format_with_granularity(p, depart_full)))
        .transpose()?;

    Ok(object(json!({
        "currency": normalize_currency(currency),
        "origin": origin,
        "destination": destination,
        "depart_date": depart,
        "return_date": ret,
    })))
}
