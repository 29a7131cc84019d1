use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::LogsFilterStore;
use crate::tools::fetch_logs::{describe_outcome, query_error_to_mcp};

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ResetLogsRequest {
    /// Fetch the first page again after clearing
    #[serde(default)]
    pub refetch: bool,
}

pub async fn reset_logs(
    req: ResetLogsRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("reset_logs called with refetch: {}", req.refetch);

    let cleared = store.reset_logs().await;
    let mut message = format!("✅ Cleared {cleared} loaded logs");

    if req.refetch {
        let outcome = store.fetch_logs().await.map_err(query_error_to_mcp)?;
        message.push('\n');
        message.push_str(&describe_outcome(outcome));
    }

    Ok(CallToolResult::success(vec![Content::text(message)]))
}
