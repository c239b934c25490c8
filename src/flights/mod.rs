//! Flight search and cached price endpoints.

mod normalizer;
mod search;
mod tickets;

pub use search::{FlightSearchRequest, FlightSearchService, PassengerKind, Passengers, Segment};
pub use tickets::{
    AirlineDirection, CalendarType, LatestPricesParams, NearestPlacesMatrix, TicketsService,
};
