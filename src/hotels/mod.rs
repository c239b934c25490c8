//! Hotel search and catalog services.

mod info;
mod normalizer;
mod search;

pub use info::{
    photo_url, CoordinateLookup, CostOfLivingEntry, CostOfLivingParams, HotelLookup, HotelsService,
    LookFor, LookupParams,
};
pub use search::{HotelSearchRequest, HotelSearchService, SearchResultsParams};
