//! Affiliate statistics endpoints.
//!
//! Balance, payment history and sales reports for the partner account
//! behind the token. Sales reports are grouped server-side and filtered
//! by host and marker; the month parameter always snaps to the first day
//! of its month because that is the key the API groups by.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::endpoints::partner as paths;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::time;

/// Dimension the sales report is grouped by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SalesGroup {
    #[default]
    Date,
    Host,
    Marker,
}

impl SalesGroup {
    pub fn as_wire(&self) -> &'static str {
        match self {
            SalesGroup::Date => "date",
            SalesGroup::Host => "host",
            SalesGroup::Marker => "marker",
        }
    }
}

/// Service over the affiliate statistics endpoints.
pub struct PartnerService {
    client: Arc<ApiClient>,
}

impl PartnerService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Account balance and its currency.
    pub async fn balance(&self) -> ApiResult<Map<String, Value>> {
        let response: Value = self.client.get(paths::BALANCE, Map::new()).await?;
        Ok(object_at(&response, "/data"))
    }

    /// Payment history of the account.
    pub async fn payments(&self) -> ApiResult<Vec<Value>> {
        let response: Value = self.client.get(paths::PAYMENTS, Map::new()).await?;
        Ok(records_at(&response, "/data/payments"))
    }

    /// Searches, clicks and bookings with their earnings for one month.
    ///
    /// `month` accepts a full date or a bare month and normalizes to the
    /// first of that month; the current month is used when absent.
    pub async fn sales(
        &self,
        group: SalesGroup,
        month: Option<&str>,
        host: Option<&str>,
        marker: Option<&str>,
    ) -> ApiResult<Vec<Value>> {
        let options = sales_options(group.as_wire(), month, host, marker)?;
        let response: Value = self.client.get(paths::SALES, options).await?;
        Ok(records_at(&response, "/data/sales"))
    }

    /// Sales broken down by date and marker at once.
    pub async fn detailed_sales(
        &self,
        month: Option<&str>,
        host: Option<&str>,
        marker: Option<&str>,
    ) -> ApiResult<Vec<Value>> {
        let options = sales_options("date_marker", month, host, marker)?;
        let response: Value = self.client.get(paths::DETAILED_SALES, options).await?;
        Ok(records_at(&response, "/data/sales"))
    }
}

fn sales_options(
    group: &str,
    month: Option<&str>,
    host: Option<&str>,
    marker: Option<&str>,
) -> ApiResult<Map<String, Value>> {
    let month = time::month_start(month)?.format("%Y-%m-%d").to_string();
    let options = json!({
        "group_by": group,
        "month": month,
        "host_filter": host,
        "marker_filter": marker,
    });
    match options {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

fn object_at(response: &Value, pointer: &str) -> Map<String, Value> {
    match response.pointer(pointer) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// Records of a subtree the API serves as either a list or a keyed map.
fn records_at(response: &Value, pointer: &str) -> Vec<Value> {
    match response.pointer(pointer) {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(map)) => map.values().cloned().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sales_group_wire_values() {
        assert_eq!(SalesGroup::Date.as_wire(), "date");
        assert_eq!(SalesGroup::Host.as_wire(), "host");
        assert_eq!(SalesGroup::Marker.as_wire(), "marker");
        assert_eq!(SalesGroup::default(), SalesGroup::Date);
    }

    #[test]
    fn test_sales_options_snap_to_first_of_month() {
        let options = sales_options("date", Some("2021-06-15"), None, None).unwrap();
        assert_eq!(options["month"], "2021-06-01");
        assert_eq!(options["group_by"], "date");
        assert_eq!(options["host_filter"], Value::Null);
        assert_eq!(options["marker_filter"], Value::Null);
    }

    #[test]
    fn test_sales_options_accept_bare_month() {
        let options = sales_options("host", Some("2021-06"), Some("example.com"), None).unwrap();
        assert_eq!(options["month"], "2021-06-01");
        assert_eq!(options["host_filter"], "example.com");
    }

    #[test]
    fn test_sales_options_default_to_current_month() {
        let options = sales_options("date", None, None, None).unwrap();
        let month = options["month"].as_str().unwrap();
        assert!(month.ends_with("-01"), "month was {month}");
    }

    #[test]
    fn test_sales_options_reject_garbage_month() {
        assert!(sales_options("date", Some("next tuesday"), None, None).is_err());
    }

    #[test]
    fn test_records_at_accepts_both_shapes() {
        let as_list = json!({"data": {"sales": [{"key": "2021-06-01"}]}});
        let as_map = json!({"data": {"sales": {"2021-06-01": {"key": "2021-06-01"}}}});
        let missing = json!({"success": true});

        assert_eq!(records_at(&as_list, "/data/sales").len(), 1);
        assert_eq!(records_at(&as_map, "/data/sales").len(), 1);
        assert!(records_at(&missing, "/data/sales").is_empty());
    }

    #[test]
    fn test_object_at_extracts_data() {
        let response = json!({"success": true, "data": {"balance": "100.00", "currency": "usd"}});
        let data = object_at(&response, "/data");
        assert_eq!(data["balance"], "100.00");
        assert_eq!(data["currency"], "usd");
        assert!(object_at(&json!([1, 2]), "/data").is_empty());
    }
}
