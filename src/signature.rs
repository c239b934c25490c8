//! Request signatures for the realtime search endpoints.
//!
//! Both the flight and hotel search APIs authenticate each request with an
//! MD5 digest (lowercase hex) over a canonical string derived from the
//! request fields. The digest input differs per endpoint family, so the
//! exact recipe is captured as a [`SignaturePolicy`].

use md5::{Digest, Md5};

use crate::canonical::SignFields;
use crate::error::{ApiError, ApiResult};

/// How the digest input string is assembled from the token and fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignaturePolicy {
    /// `md5(token + ":" + join(fields))` over every field.
    ///
    /// Used by the realtime flight search.
    FlightSearch,
    /// `md5(token + ":" + marker + ":" + join(fields))` where `marker` and
    /// `timeout` are removed from the fields before joining and the marker
    /// value is spliced in right after the token.
    ///
    /// Used by the realtime hotel search.
    HotelSearch,
    /// `md5(join(fields))` with the token inserted into the field set under
    /// the `token` key, so it sorts and joins like any other field. No
    /// prefix outside the join.
    HotelSearchTokenField,
}

/// Compute the lowercase hex MD5 signature for a request.
///
/// The field set is taken by value because the hotel policies mutate it
/// (removing `marker`/`timeout`, inserting `token`) before joining.
pub fn compute_signature(
    policy: SignaturePolicy,
    token: &str,
    mut fields: SignFields,
) -> ApiResult<String> {
    let input = match policy {
        SignaturePolicy::FlightSearch => {
            format!("{}:{}", token, fields.canonical_join())
        }
        SignaturePolicy::HotelSearch => {
            let marker = fields
                .remove("marker")
                .ok_or(ApiError::MissingField("marker"))?;
            fields.remove("timeout");
            format!(
                "{}:{}:{}",
                token,
                marker.as_rendered(),
                fields.canonical_join()
            )
        }
        SignaturePolicy::HotelSearchTokenField => {
            fields.insert("token", token);
            fields.canonical_join()
        }
    };
    Ok(hex_md5(&input))
}

fn hex_md5(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
