//! SDK entry point.

use std::sync::Arc;

use crate::config::TravelConfig;
use crate::data::DataService;
use crate::error::ApiResult;
use crate::flights::{FlightSearchService, TicketsService};
use crate::hotels::{HotelSearchService, HotelsService};
use crate::http::{ApiClient, HotelsClient};
use crate::partner::PartnerService;

/// Facade over the whole API surface.
///
/// Builds the two transport clients once and hands out service handles
/// that share them. Handles are cheap; grab a fresh one per call site or
/// keep one around, both work. Services over the hotel hosts can only be
/// constructed over the hotels client, so a handle can never end up on
/// the wrong transport.
///
/// ```no_run
/// # async fn run() -> travelpayouts::ApiResult<()> {
/// let travel = travelpayouts::Travel::new("TOKEN")?;
/// let airport = travel.data().airport("JFK").await?;
/// # Ok(())
/// # }
/// ```
pub struct Travel {
    client: Arc<ApiClient>,
    hotels_client: Arc<HotelsClient>,
    data: Arc<DataService>,
    marker: Option<String>,
}

impl Travel {
    /// Build a facade with default hosts and transport settings.
    pub fn new(token: impl Into<String>) -> ApiResult<Self> {
        let mut config = TravelConfig::default();
        config.auth.token = Some(token.into());
        Self::from_config(&config)
    }

    /// Build a facade from configuration. The token resolves from the
    /// inline value or the configured environment variable.
    pub fn from_config(config: &TravelConfig) -> ApiResult<Self> {
        let token = config.auth.load_token()?;
        let client = Arc::new(ApiClient::new(&config.api_host, &token, &config.rest)?);
        let hotels_client = Arc::new(HotelsClient::new(
            &config.hotels_host,
            &token,
            &config.rest,
        )?);
        let data = Arc::new(DataService::new(client.clone()));

        Ok(Self {
            client,
            hotels_client,
            data,
            marker: config.marker.clone(),
        })
    }

    /// Realtime flight search.
    pub fn flights(&self) -> FlightSearchService {
        FlightSearchService::new(self.client.clone())
    }

    /// Cached flight prices and popular directions.
    pub fn tickets(&self) -> TicketsService {
        TicketsService::new(self.client.clone(), self.data.clone())
    }

    /// Reference data: countries, cities, airports, airlines, routes.
    ///
    /// The same instance backs place resolution in the other services.
    pub fn data(&self) -> Arc<DataService> {
        self.data.clone()
    }

    /// Hotel catalog, lookup and price cache.
    pub fn hotels(&self) -> HotelsService {
        HotelsService::new(self.hotels_client.clone(), self.data.clone())
    }

    /// Realtime hotel search.
    pub fn hotel_search(&self) -> HotelSearchService {
        HotelSearchService::new(self.hotels_client.clone())
    }

    /// Affiliate statistics.
    pub fn partner(&self) -> PartnerService {
        PartnerService::new(self.client.clone())
    }

    /// Affiliate marker from configuration, for seeding search requests.
    pub fn default_marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }
}
