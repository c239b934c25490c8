//! HTTP infrastructure shared by the API services.
//!
//! Two clients cover the API surface:
//!
//! - [`ApiClient`]: the core host (flight prices, reference data,
//!   partner statistics)
//! - [`HotelsClient`]: the hotel hosts with their own path layout and
//!   token-in-query convention
//!
//! Both shape caller options through the same [`shape_payload`] rules and
//! surface non-success statuses as typed errors.

mod client;
mod hotels;
mod shape;

pub use client::ApiClient;
pub use hotels::HotelsClient;
pub use shape::{query_pairs, shape_payload, MergeMode, RequestPayload};
