use serde::Serialize;

use crate::query::{DEFAULT_ORDER_BY, DateRange, LogMessage, LogQuery, PAGE_SIZE};
use crate::types::FilterEpoch;

/// Lifecycle of the most recent fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded {
        received: usize,
    },
    Failed {
        error: String,
    },
}

/// Filter criteria, display options and accumulated results of one log view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogsFilterState {
    pub date_range: DateRange,
    pub order_by: String,
    pub search_term: String,
    pub resource: String,
    pub severity_levels: Vec<String>,
    pub wrap_body: bool,
    pub logs: Vec<LogMessage>,
    pub fetch_status: FetchStatus,
    #[serde(skip)]
    pub(crate) in_flight: usize,
    #[serde(skip)]
    pub(crate) epoch: FilterEpoch,
}

impl Default for LogsFilterState {
    fn default() -> Self {
        Self {
            date_range: DateRange::default(),
            order_by: DEFAULT_ORDER_BY.to_string(),
            search_term: String::new(),
            resource: String::new(),
            severity_levels: Vec::new(),
            wrap_body: true,
            logs: Vec::new(),
            fetch_status: FetchStatus::Idle,
            in_flight: 0,
            epoch: FilterEpoch::default(),
        }
    }
}

impl LogsFilterState {
    /// True while at least one fetch is awaiting its response
    pub fn logs_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn epoch(&self) -> FilterEpoch {
        self.epoch
    }

    /// Query for the next page: fixed page size, offset past what is loaded.
    pub fn next_query(&self) -> LogQuery {
        LogQuery {
            limit: PAGE_SIZE,
            offset: self.logs.len(),
            order_by: self.order_by.clone(),
            date_range: self.date_range.clone(),
            search_term: self.search_term.clone(),
            resource: self.resource.clone(),
            severity_levels: self.severity_levels.clone(),
        }
    }

    /// Whether a page issued under `epoch` at `offset` still lines up with
    /// the accumulated results.
    pub fn accepts_page(&self, epoch: FilterEpoch, offset: usize) -> bool {
        self.epoch == epoch && self.logs.len() == offset
    }
}
