use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content, ErrorCode},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::query::QueryServiceError;
use crate::store::{FetchOutcome, LogsFilterStore};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct FetchLogsRequest {}

pub(crate) fn describe_outcome(outcome: FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Appended { received: 0, total } => {
            format!("✅ No more logs match the current filters ({total} loaded)")
        }
        FetchOutcome::Appended { received, total } => {
            format!("✅ Loaded {received} more logs ({total} loaded)")
        }
        FetchOutcome::Discarded { offset } => format!(
            "⚠️ Page at offset {offset} was discarded because filters or loaded logs changed while it was in flight"
        ),
    }
}

pub(crate) fn query_error_to_mcp(e: QueryServiceError) -> McpError {
    let code = match &e {
        QueryServiceError::InvalidOrderBy(_) | QueryServiceError::InvalidDate { .. } => {
            ErrorCode::INVALID_PARAMS
        }
        QueryServiceError::Unavailable(_) => ErrorCode::INTERNAL_ERROR,
    };
    McpError {
        code,
        message: format!("Log query failed: {e}").into(),
        data: None,
    }
}

pub async fn fetch_logs(
    _req: FetchLogsRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("fetch_logs called");

    let outcome = store.fetch_logs().await.map_err(query_error_to_mcp)?;

    Ok(CallToolResult::success(vec![Content::text(
        describe_outcome(outcome),
    )]))
}
