use async_trait::async_trait;
use thiserror::Error;

use crate::query::{LogQuery, LogQueryResponse};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryServiceError {
    #[error("Unsupported order_by value: {0}")]
    InvalidOrderBy(String),

    #[error("Invalid date bound '{value}': {message}")]
    InvalidDate { value: String, message: String },

    #[error("Log query service unavailable: {0}")]
    Unavailable(String),
}

/// Port to whatever answers log queries.
#[async_trait]
pub trait LogQueryService: Send + Sync {
    /// Runs one page query.
    async fn query(&self, request: LogQuery) -> Result<LogQueryResponse, QueryServiceError>;
}
