use serde::{Deserialize, Serialize};

use crate::query::LogMessage;

/// Fixed page size of every fetch.
pub const PAGE_SIZE: usize = 100;

pub const DEFAULT_DATE_FROM: &str = "-7d";
pub const DEFAULT_ORDER_BY: &str = "latest";

/// Pair of optional bounds; `None` leaves that side unbounded.
///
/// Bounds are kept as the caller wrote them (`-7d`, an RFC 3339 timestamp, a
/// plain date) and only interpreted by the query service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl DateRange {
    pub fn new(date_from: Option<String>, date_to: Option<String>) -> Self {
        Self { date_from, date_to }
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            date_from: Some(DEFAULT_DATE_FROM.to_string()),
            date_to: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub limit: usize,
    pub offset: usize,
    pub order_by: String,
    pub date_range: DateRange,
    pub search_term: String,
    pub resource: String,
    pub severity_levels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogQueryResponse {
    pub results: Vec<LogMessage>,
}

impl LogQueryResponse {
    pub fn new(results: Vec<LogMessage>) -> Self {
        Self { results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_date_range() {
        let range = DateRange::default();
        assert_eq!(range.date_from.as_deref(), Some("-7d"));
        assert_eq!(range.date_to, None);
    }

    #[test]
    fn test_query_wire_shape() {
        let query = LogQuery {
            limit: PAGE_SIZE,
            offset: 200,
            order_by: "earliest".to_string(),
            date_range: DateRange::default(),
            search_term: "timeout".to_string(),
            resource: "api".to_string(),
            severity_levels: vec!["error".to_string()],
        };

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "limit": 100,
                "offset": 200,
                "orderBy": "earliest",
                "dateRange": {"date_from": "-7d", "date_to": null},
                "searchTerm": "timeout",
                "resource": "api",
                "severityLevels": ["error"]
            })
        );
    }
}
