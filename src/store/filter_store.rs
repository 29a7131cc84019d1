use std::sync::Arc;
use tokio::sync::RwLock;

use crate::query::{DateRange, LogQueryService, QueryServiceError};
use crate::store::{Action, LogsFilterState, reduce};

/// What a completed fetch did to the accumulated results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was appended; `total` is the new length of `logs`
    Appended { received: usize, total: usize },
    /// Filters changed, logs were reset or another page landed first
    Discarded { offset: usize },
}

/// Shared handle to one log view's filter state.
///
/// All mutation goes through [`reduce`] under a write lock, so concurrent
/// callers observe mutations in invocation order. The lock is never held
/// while a query is awaited.
#[derive(Clone)]
pub struct LogsFilterStore {
    state: Arc<RwLock<LogsFilterState>>,
    service: Arc<dyn LogQueryService>,
    reset_on_filter_change: bool,
}

impl LogsFilterStore {
    pub fn new(service: Arc<dyn LogQueryService>) -> Self {
        Self {
            state: Arc::new(RwLock::new(LogsFilterState::default())),
            service,
            reset_on_filter_change: false,
        }
    }

    /// Clear accumulated logs whenever a query-affecting filter changes value
    pub fn with_reset_on_filter_change(mut self, enabled: bool) -> Self {
        self.reset_on_filter_change = enabled;
        self
    }

    fn apply(state: &mut LogsFilterState, action: Action) {
        *state = reduce(std::mem::take(state), action);
    }

    pub async fn dispatch(&self, action: Action) {
        tracing::debug!("Dispatching {action:?}");

        let mut state = self.state.write().await;
        let epoch = state.epoch();
        let affects_query = action.affects_query();
        Self::apply(&mut state, action);

        if self.reset_on_filter_change && affects_query && state.epoch() != epoch {
            tracing::debug!("Filters changed, resetting {} loaded logs", state.logs.len());
            Self::apply(&mut state, Action::ResetLogs);
        }
    }

    pub async fn set_date_range(&self, range: DateRange) {
        self.dispatch(Action::SetDateRange(range)).await;
    }

    pub async fn set_order_by(&self, order_by: impl Into<String>) {
        self.dispatch(Action::SetOrderBy(order_by.into())).await;
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.dispatch(Action::SetSearchTerm(term.into())).await;
    }

    pub async fn set_resource(&self, resource: impl Into<String>) {
        self.dispatch(Action::SetResource(resource.into())).await;
    }

    pub async fn set_severity_levels(&self, levels: Vec<String>) {
        self.dispatch(Action::SetSeverityLevels(levels)).await;
    }

    pub async fn set_wrap_body(&self, flag: bool) {
        self.dispatch(Action::SetWrapBody(flag)).await;
    }

    /// Clear loaded logs, returning how many were dropped
    pub async fn reset_logs(&self) -> usize {
        let mut state = self.state.write().await;
        let cleared = state.logs.len();
        Self::apply(&mut state, Action::ResetLogs);
        tracing::debug!("Reset {cleared} loaded logs");
        cleared
    }

    pub async fn snapshot(&self) -> LogsFilterState {
        self.state.read().await.clone()
    }

    /// Load the next page and append it to `logs`.
    ///
    /// Errors from the query service are returned unchanged and leave `logs`
    /// as they were.
    pub async fn fetch_logs(&self) -> Result<FetchOutcome, QueryServiceError> {
        let (query, epoch) = {
            let mut state = self.state.write().await;
            let query = state.next_query();
            let epoch = state.epoch();
            Self::apply(&mut state, Action::FetchStarted);
            (query, epoch)
        };
        let offset = query.offset;

        tracing::debug!(
            "Fetching logs offset={offset} limit={} epoch={epoch}",
            query.limit
        );

        match self.service.query(query).await {
            Ok(response) => {
                let received = response.results.len();
                let mut state = self.state.write().await;
                let accepted = state.accepts_page(epoch, offset);
                Self::apply(
                    &mut state,
                    Action::FetchSucceeded {
                        epoch,
                        offset,
                        results: response.results,
                    },
                );

                if accepted {
                    let total = state.logs.len();
                    tracing::info!("Fetched {received} logs at offset {offset}, {total} loaded");
                    Ok(FetchOutcome::Appended { received, total })
                } else {
                    tracing::warn!("Discarded stale page of {received} logs at offset {offset}");
                    Ok(FetchOutcome::Discarded { offset })
                }
            }
            Err(e) => {
                tracing::error!("Log query failed at offset {offset}: {e}");
                let mut state = self.state.write().await;
                Self::apply(
                    &mut state,
                    Action::FetchFailed {
                        epoch,
                        offset,
                        error: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    /// Drop loaded logs and fetch the first page again
    pub async fn refresh_logs(&self) -> Result<FetchOutcome, QueryServiceError> {
        self.reset_logs().await;
        self.fetch_logs().await
    }
}
