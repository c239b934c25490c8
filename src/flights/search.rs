//! Real-time flight search.
//!
//! A search is started with a signed POST carrying the affiliate marker,
//! passenger counts and itinerary segments; results are then polled by the
//! UUID the start call returns. Both calls return the raw JSON envelope,
//! the result schema is gate-dependent and too loose to type.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::canonical::{FieldValue, SignFields};
use crate::endpoints::flights as paths;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::model::TripClass;
use crate::signature::{compute_signature, SignaturePolicy};
use crate::time::parse_date;

/// Locales the search endpoint accepts; anything else falls back to `ru`.
const SUPPORTED_LOCALES: &[&str] = &["en", "ru", "de", "fr", "it", "pl", "th"];

/// Passenger slot in a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerKind {
    Adults,
    Children,
    Infants,
}

/// Passenger counts for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Passengers {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Passengers {
    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }

    fn slot(&mut self, kind: PassengerKind) -> &mut u32 {
        match kind {
            PassengerKind::Adults => &mut self.adults,
            PassengerKind::Children => &mut self.children,
            PassengerKind::Infants => &mut self.infants,
        }
    }
}

/// One leg of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    /// Departure date, `YYYY-MM-DD`.
    pub date: String,
}

/// Parameters of a real-time search.
///
/// `marker`, `host` and `user_ip` identify the affiliate and the end user;
/// the API rejects searches without them. Locale and trip class are
/// normalized to the values the endpoint accepts before sending.
#[derive(Debug, Clone)]
pub struct FlightSearchRequest {
    pub marker: i64,
    pub host: String,
    pub user_ip: String,
    pub currency: String,
    pub locale: String,
    pub trip_class: TripClass,
    passengers: Passengers,
    segments: Vec<Segment>,
}

impl FlightSearchRequest {
    pub fn new(
        marker: i64,
        host: impl Into<String>,
        user_ip: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            marker,
            host: host.into(),
            user_ip: user_ip.into(),
            currency: currency.into(),
            locale: "en".to_string(),
            trip_class: TripClass::Economy,
            passengers: Passengers::default(),
            segments: Vec::new(),
        }
    }

    /// Append a leg. The date is reformatted to `YYYY-MM-DD`.
    pub fn add_segment(
        &mut self,
        origin: impl Into<String>,
        destination: impl Into<String>,
        date: &str,
    ) -> ApiResult<&mut Self> {
        let date = parse_date(date)?.format("%Y-%m-%d").to_string();
        self.segments.push(Segment {
            origin: origin.into(),
            destination: destination.into(),
            date,
        });
        Ok(self)
    }

    pub fn clear_segments(&mut self) -> &mut Self {
        self.segments.clear();
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn add_passenger(&mut self, kind: PassengerKind, count: u32) -> &mut Self {
        *self.passengers.slot(kind) += count;
        self
    }

    pub fn remove_passenger(&mut self, kind: PassengerKind, count: u32) -> &mut Self {
        let slot = self.passengers.slot(kind);
        *slot = slot.saturating_sub(count);
        self
    }

    pub fn clear_passengers(&mut self) -> &mut Self {
        self.passengers = Passengers::default();
        self
    }

    pub fn passengers(&self) -> Passengers {
        self.passengers
    }

    fn normalized_locale(&self) -> &str {
        if SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            &self.locale
        } else {
            "ru"
        }
    }

    /// The endpoint only knows economy and business.
    fn normalized_trip_class(&self) -> char {
        match self.trip_class.letter() {
            'C' => 'C',
            _ => 'Y',
        }
    }

    /// The request body with its signature appended.
    ///
    /// The signature covers every body field, rendered in sorted key
    /// order and joined with `:` behind the token prefix.
    pub(crate) fn signed_body(&self, token: &str) -> ApiResult<Value> {
        let locale = self.normalized_locale().to_string();
        let trip_class = self.normalized_trip_class().to_string();

        let mut fields = SignFields::new();
        fields.insert("marker", self.marker);
        fields.insert("host", self.host.as_str());
        fields.insert("user_ip", self.user_ip.as_str());
        fields.insert("locale", locale.as_str());
        fields.insert("trip_class", trip_class.as_str());
        fields.insert("currency", self.currency.as_str());
        fields.insert(
            "passengers",
            FieldValue::map([
                ("adults", self.passengers.adults),
                ("children", self.passengers.children),
                ("infants", self.passengers.infants),
            ]),
        );
        fields.insert(
            "segments",
            FieldValue::seq(self.segments.iter().map(|s| {
                [
                    ("origin", s.origin.as_str()),
                    ("destination", s.destination.as_str()),
                    ("date", s.date.as_str()),
                ]
            })),
        );

        let signature = compute_signature(SignaturePolicy::FlightSearch, token, fields)?;

        Ok(json!({
            "marker": self.marker,
            "host": self.host,
            "user_ip": self.user_ip,
            "locale": locale,
            "trip_class": trip_class,
            "passengers": self.passengers,
            "segments": self.segments,
            "currency": self.currency,
            "signature": signature,
        }))
    }
}

/// Service over the real-time search endpoints.
pub struct FlightSearchService {
    client: Arc<ApiClient>,
}

impl FlightSearchService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Start a search. Returns the raw search envelope with its UUID.
    pub async fn search(&self, request: &FlightSearchRequest) -> ApiResult<Value> {
        let body = request.signed_body(self.client.token())?;
        self.client.post_json(paths::FLIGHT_SEARCH, body).await
    }

    /// Fetch the results of a previously started search.
    pub async fn search_results(&self, uuid: &str) -> ApiResult<Value> {
        let mut options = Map::new();
        options.insert("uuid".to_string(), Value::String(uuid.to_string()));
        self.client.get(paths::FLIGHT_SEARCH_RESULTS, options).await
    }
}
