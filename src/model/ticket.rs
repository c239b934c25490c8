//! Ticket entity produced by the price endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::place::Place;

/// Cabin class of a ticket.
///
/// The wire encodes it as `0`/`1`/`2`; search contexts use the letter
/// codes `Y`/`C`/`F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripClass {
    Economy,
    Business,
    First,
}

impl TripClass {
    /// Decode the wire integer, unknown values falling back to economy.
    pub fn from_wire(code: i64) -> Self {
        match code {
            1 => TripClass::Business,
            2 => TripClass::First,
            _ => TripClass::Economy,
        }
    }

    /// The wire integer.
    pub fn as_wire(&self) -> i64 {
        match self {
            TripClass::Economy => 0,
            TripClass::Business => 1,
            TripClass::First => 2,
        }
    }

    /// Letter code used in search URLs and search requests.
    pub fn letter(&self) -> char {
        match self {
            TripClass::Economy => 'Y',
            TripClass::Business => 'C',
            TripClass::First => 'F',
        }
    }
}

impl Default for TripClass {
    fn default() -> Self {
        TripClass::Economy
    }
}

/// Search site a ticket URL can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSite {
    Aviasales,
    Jetradar,
}

/// A priced flight offer between two places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub origin: Place,
    pub destination: Place,
    pub depart_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub value: i64,
    pub currency: String,
    pub distance: i64,
    pub actual: bool,
    pub found_at: DateTime<Utc>,
    pub trip_class: TripClass,
    pub show_to_affiliates: bool,
    pub number_of_changes: i64,
    pub airline: String,
    pub expires: Option<DateTime<Utc>>,
    pub flight_number: i64,
}

impl Ticket {
    /// Build the search URL for this ticket.
    ///
    /// Dates render as `DDMM`; the return leg is omitted for one-way
    /// tickets. Jetradar URLs prefix each place with its kind letter and
    /// append the trip-class letter.
    pub fn search_url(&self, site: SearchSite) -> String {
        let depart = self.depart_date.format("%d%m");
        let ret = self
            .return_date
            .map(|d| d.format("%d%m").to_string())
            .unwrap_or_default();

        match site {
            SearchSite::Aviasales => format!(
                "https://search.aviasales.ru/{}{}{}{}1",
                self.origin.iata().to_uppercase(),
                depart,
                self.destination.iata().to_lowercase(),
                ret,
            ),
            SearchSite::Jetradar => format!(
                "https://www.jetradar.com/searches/{}{}{}{}{}{}{}1",
                self.origin.kind_letter(),
                self.origin.iata().to_uppercase(),
                depart,
                self.destination.kind_letter(),
                self.destination.iata().to_lowercase(),
                ret,
                self.trip_class.letter(),
            ),
        }
    }
}
