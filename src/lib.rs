//! Client SDK for the Travelpayouts travel affiliate API.
//!
//! Covers the flight price endpoints (realtime search and the cached
//! price database), the hotel engine (realtime search, lookup, catalog),
//! the reference data dumps and the affiliate statistics, all behind one
//! [`Travel`] facade.
//!
//! Signed endpoints follow the Travelpayouts request-signature scheme:
//! request fields are canonicalized by key order and digested with the
//! API token (see [`canonical`] and [`signature`]).
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> travelpayouts::ApiResult<()> {
//! let travel = travelpayouts::Travel::new("YOUR_TOKEN")?;
//!
//! let tickets = travel
//!     .tickets()
//!     .cheap("MOW", "HKT", Some("2021-12-24"), None, "eur")
//!     .await?;
//!
//! for ticket in &tickets {
//!     println!(
//!         "{} -> {}: {} {}",
//!         ticket.origin.iata(),
//!         ticket.destination.iata(),
//!         ticket.value,
//!         ticket.currency,
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Services never retry and never read environment variables on their
//! own; tokens and hosts come from [`TravelConfig`] or the facade
//! constructor.

pub mod canonical;
pub mod config;
pub mod data;
pub mod endpoints;
pub mod error;
pub mod flights;
pub mod hotels;
pub mod http;
pub mod model;
pub mod partner;
pub mod signature;
pub mod time;

mod travel;

// Re-export the entry point and ambient types
pub use config::{AuthConfig, RestConfig, TravelConfig};
pub use error::{ApiError, ApiResult, ErrorCategory};
pub use travel::Travel;

// Re-export the service handles
pub use data::DataService;
pub use flights::{FlightSearchService, TicketsService};
pub use hotels::{HotelSearchService, HotelsService};
pub use partner::PartnerService;
