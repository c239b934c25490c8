//! Geography entities built from the reference data lists.
//!
//! The raw `*Record` types mirror the wire JSON of the reference dumps.
//! The entity types carry resolved back-references: a city knows its
//! country, an airport its city. Referents that cannot be resolved stay
//! `None` rather than failing the whole list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Geographic point as the dumps publish it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Wire record of `/data/en/countries.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub name_translations: Option<HashMap<String, String>>,
}

/// Wire record of `/data/en/cities.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub name_translations: Option<HashMap<String, String>>,
}

/// Wire record of `/data/en/airports.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city_code: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub name_translations: Option<HashMap<String, String>>,
}

/// A country with its settlement currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub iata: String,
    pub name: String,
    pub currency: String,
    pub name_translations: HashMap<String, String>,
}

impl Country {
    pub fn from_record(record: CountryRecord) -> Self {
        Self {
            iata: record.code,
            name: record.name.unwrap_or_default(),
            currency: record.currency.unwrap_or_default(),
            name_translations: record.name_translations.unwrap_or_default(),
        }
    }
}

/// A city with its country resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub iata: String,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub time_zone: String,
    pub name_translations: HashMap<String, String>,
    pub country: Option<Country>,
}

impl City {
    pub fn from_record(record: CityRecord, country: Option<Country>) -> Self {
        Self {
            iata: record.code,
            name: record.name.unwrap_or_default(),
            coordinates: record.coordinates,
            time_zone: record.time_zone.unwrap_or_default(),
            name_translations: record.name_translations.unwrap_or_default(),
            country,
        }
    }
}

/// An airport with its city resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub iata: String,
    pub name: String,
    pub coordinates: Option<Coordinates>,
    pub time_zone: String,
    pub name_translations: HashMap<String, String>,
    pub city: Option<City>,
}

impl Airport {
    pub fn from_record(record: AirportRecord, city: Option<City>) -> Self {
        Self {
            iata: record.code,
            name: record.name.unwrap_or_default(),
            coordinates: record.coordinates,
            time_zone: record.time_zone.unwrap_or_default(),
            name_translations: record.name_translations.unwrap_or_default(),
            city,
        }
    }
}

/// Either end of a flight: a city or a specific airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Place {
    City(City),
    Airport(Airport),
}

impl Place {
    /// IATA code of the place.
    pub fn iata(&self) -> &str {
        match self {
            Place::City(city) => &city.iata,
            Place::Airport(airport) => &airport.iata,
        }
    }

    /// Display name of the place.
    pub fn name(&self) -> &str {
        match self {
            Place::City(city) => &city.name,
            Place::Airport(airport) => &airport.name,
        }
    }

    /// Single-letter place kind used in search URLs.
    pub fn kind_letter(&self) -> char {
        match self {
            Place::City(_) => 'C',
            Place::Airport(_) => 'A',
        }
    }
}

impl From<City> for Place {
    fn from(city: City) -> Self {
        Place::City(city)
    }
}

impl From<Airport> for Place {
    fn from(airport: Airport) -> Self {
        Place::Airport(airport)
    }
}
