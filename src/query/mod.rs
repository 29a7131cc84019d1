mod memory;
mod message;
pub mod relative_date;
mod request;
mod service;

pub use memory::{DEFAULT_MAX_ENTRIES, InMemoryLogService, LoadReport};
pub use message::LogMessage;
pub use request::{
    DEFAULT_DATE_FROM, DEFAULT_ORDER_BY, DateRange, LogQuery, LogQueryResponse, PAGE_SIZE,
};
pub use service::{LogQueryService, QueryServiceError};
