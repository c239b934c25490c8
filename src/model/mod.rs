//! Entities shared across the API services.

mod hotel;
mod place;
mod ticket;

pub use hotel::{Hotel, HotelLocation, HotelLocationSmall, HotelSmall, HotelSort, SortOrder};
pub use place::{
    Airport, AirportRecord, City, CityRecord, Coordinates, Country, CountryRecord, Place,
};
pub use ticket::{SearchSite, Ticket, TripClass};
