use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::query::DateRange;
use crate::store::LogsFilterStore;

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetDateRangeRequest {
    /// Lower bound: relative (-7d, -24h, -1m), RFC 3339, YYYY-MM-DD or null
    #[serde(default)]
    pub date_from: Option<String>,

    /// Upper bound, same forms as date_from; null for now
    #[serde(default)]
    pub date_to: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetOrderByRequest {
    /// "latest" or "earliest"
    pub order_by: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetSearchTermRequest {
    /// Regex or literal text matched against the log body; empty disables
    pub search_term: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetResourceRequest {
    /// Resource name; empty means all resources
    pub resource: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetSeverityLevelsRequest {
    /// Levels to include; empty means all levels
    pub severity_levels: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetWrapBodyRequest {
    pub wrap_body: bool,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ShowFiltersRequest {}

fn done(message: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(message)]))
}

pub async fn set_date_range(
    req: SetDateRangeRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("set_date_range called with {req:?}");

    let range = DateRange::new(req.date_from, req.date_to);
    let message = format!(
        "✅ Date range set to {} .. {}",
        range.date_from.as_deref().unwrap_or("unbounded"),
        range.date_to.as_deref().unwrap_or("now")
    );
    store.set_date_range(range).await;
    done(message)
}

pub async fn set_order_by(
    req: SetOrderByRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("set_order_by called with {req:?}");

    let message = format!("✅ Ordering set to \"{}\"", req.order_by);
    store.set_order_by(req.order_by).await;
    done(message)
}

pub async fn set_search_term(
    req: SetSearchTermRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("set_search_term called with {req:?}");

    let message = if req.search_term.is_empty() {
        "✅ Search term cleared".to_string()
    } else {
        format!("✅ Search term set to \"{}\"", req.search_term)
    };
    store.set_search_term(req.search_term).await;
    done(message)
}

pub async fn set_resource(
    req: SetResourceRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("set_resource called with {req:?}");

    let message = if req.resource.is_empty() {
        "✅ Showing all resources".to_string()
    } else {
        format!("✅ Resource set to \"{}\"", req.resource)
    };
    store.set_resource(req.resource).await;
    done(message)
}

pub async fn set_severity_levels(
    req: SetSeverityLevelsRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("set_severity_levels called with {req:?}");

    let message = if req.severity_levels.is_empty() {
        "✅ Showing all severity levels".to_string()
    } else {
        format!("✅ Severity levels set to {}", req.severity_levels.join(", "))
    };
    store.set_severity_levels(req.severity_levels).await;
    done(message)
}

pub async fn set_wrap_body(
    req: SetWrapBodyRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("set_wrap_body called with {req:?}");

    store.set_wrap_body(req.wrap_body).await;
    done(format!(
        "✅ Body wrapping {}",
        if req.wrap_body { "enabled" } else { "disabled" }
    ))
}

pub async fn show_filters(
    _req: ShowFiltersRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!("show_filters called");

    let state = store.snapshot().await;
    let view = serde_json::json!({
        "date_range": state.date_range,
        "order_by": state.order_by,
        "search_term": state.search_term,
        "resource": state.resource,
        "severity_levels": state.severity_levels,
        "wrap_body": state.wrap_body,
        "logs_loaded": state.logs.len(),
        "logs_loading": state.logs_loading(),
        "fetch": state.fetch_status,
    });

    done(
        serde_json::to_string_pretty(&view)
            .unwrap_or_else(|e| format!("Failed to serialize filters: {e}")),
    )
}
