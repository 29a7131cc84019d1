mod action;
mod filter_store;
mod state;

pub use action::{Action, reduce};
pub use filter_store::{FetchOutcome, LogsFilterStore};
pub use state::{FetchStatus, LogsFilterState};
