use crate::query::{DateRange, LogMessage};
use crate::store::{FetchStatus, LogsFilterState};
use crate::types::FilterEpoch;

/// Every transition the filter state can go through.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetDateRange(DateRange),
    SetOrderBy(String),
    SetSearchTerm(String),
    SetResource(String),
    SetSeverityLevels(Vec<String>),
    SetWrapBody(bool),
    /// Drop accumulated results so the next fetch starts at offset 0
    ResetLogs,
    FetchStarted,
    FetchSucceeded {
        epoch: FilterEpoch,
        offset: usize,
        results: Vec<LogMessage>,
    },
    FetchFailed {
        epoch: FilterEpoch,
        offset: usize,
        error: String,
    },
}

impl Action {
    /// Whether this action changes what the next query would return
    pub fn affects_query(&self) -> bool {
        matches!(
            self,
            Action::SetDateRange(_)
                | Action::SetOrderBy(_)
                | Action::SetSearchTerm(_)
                | Action::SetResource(_)
                | Action::SetSeverityLevels(_)
        )
    }
}

fn replace_filter<T: PartialEq>(field: &mut T, value: T, epoch: &mut FilterEpoch) {
    if *field != value {
        *field = value;
        *epoch = epoch.next();
    }
}

fn finish_without_page(state: &mut LogsFilterState) {
    if state.in_flight == 0 && state.fetch_status == FetchStatus::Loading {
        state.fetch_status = FetchStatus::Idle;
    }
}

/// Apply one action, returning the next state.
pub fn reduce(mut state: LogsFilterState, action: Action) -> LogsFilterState {
    match action {
        Action::SetDateRange(range) => {
            replace_filter(&mut state.date_range, range, &mut state.epoch);
        }
        Action::SetOrderBy(order_by) => {
            replace_filter(&mut state.order_by, order_by, &mut state.epoch);
        }
        Action::SetSearchTerm(term) => {
            replace_filter(&mut state.search_term, term, &mut state.epoch);
        }
        Action::SetResource(resource) => {
            replace_filter(&mut state.resource, resource, &mut state.epoch);
        }
        Action::SetSeverityLevels(levels) => {
            replace_filter(&mut state.severity_levels, levels, &mut state.epoch);
        }
        Action::SetWrapBody(flag) => state.wrap_body = flag,
        Action::ResetLogs => {
            state.logs.clear();
            state.epoch = state.epoch.next();
        }
        Action::FetchStarted => {
            state.in_flight += 1;
            state.fetch_status = FetchStatus::Loading;
        }
        Action::FetchSucceeded {
            epoch,
            offset,
            results,
        } => {
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.accepts_page(epoch, offset) {
                let received = results.len();
                state.logs.extend(results);
                state.fetch_status = FetchStatus::Succeeded { received };
            } else {
                finish_without_page(&mut state);
            }
        }
        Action::FetchFailed {
            epoch,
            offset,
            error,
        } => {
            state.in_flight = state.in_flight.saturating_sub(1);
            // A failure for a page that was already loaded, or for old
            // filters, says nothing about the current view
            if state.accepts_page(epoch, offset) {
                state.fetch_status = FetchStatus::Failed { error };
            } else {
                finish_without_page(&mut state);
            }
        }
    }
    state
}
