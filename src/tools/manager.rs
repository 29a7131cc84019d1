use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, ErrorCode, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::store::LogsFilterStore;
use crate::tools::{
    fetch_logs::{FetchLogsRequest, fetch_logs},
    filters::{
        SetDateRangeRequest, SetOrderByRequest, SetResourceRequest, SetSearchTermRequest,
        SetSeverityLevelsRequest, SetWrapBodyRequest, ShowFiltersRequest, set_date_range,
        set_order_by, set_resource, set_search_term, set_severity_levels, set_wrap_body,
        show_filters,
    },
    reset_logs::{ResetLogsRequest, reset_logs},
    show_logs::{ShowLogsRequest, show_logs},
};

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

fn create_tool<T: JsonSchema>(name: &'static str, description: &'static str) -> Tool {
    Tool::new(name, description, input_schema::<T>())
}

fn parse_params<T: DeserializeOwned>(arguments: Value) -> Result<T, McpError> {
    serde_json::from_value(arguments).map_err(|e| McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: format!("Invalid parameters: {e}").into(),
        data: None,
    })
}

#[derive(Clone)]
pub struct ToolManager {
    pub store: LogsFilterStore,
}

impl ToolManager {
    pub fn new(store: LogsFilterStore) -> Self {
        Self { store }
    }

    pub fn get_all_tools(&self) -> Vec<Tool> {
        vec![
            create_tool::<SetDateRangeRequest>(
                "set_date_range",
                "Set the date range of the log query",
            ),
            create_tool::<SetOrderByRequest>("set_order_by", "Set the ordering of fetched logs"),
            create_tool::<SetSearchTermRequest>(
                "set_search_term",
                "Set the free-text search applied to log bodies",
            ),
            create_tool::<SetResourceRequest>("set_resource", "Restrict logs to one resource"),
            create_tool::<SetSeverityLevelsRequest>(
                "set_severity_levels",
                "Restrict logs to the given severity levels",
            ),
            create_tool::<SetWrapBodyRequest>(
                "set_wrap_body",
                "Toggle wrapping of long log bodies in show_logs",
            ),
            create_tool::<FetchLogsRequest>(
                "fetch_logs",
                "Load the next page of logs matching the current filters",
            ),
            create_tool::<ResetLogsRequest>(
                "reset_logs",
                "Clear loaded logs so the next fetch starts from the first page",
            ),
            create_tool::<ShowFiltersRequest>(
                "show_filters",
                "Show the current filters and fetch status",
            ),
            create_tool::<ShowLogsRequest>("show_logs", "Display the loaded logs"),
        ]
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<CallToolResult, McpError> {
        tracing::info!("Tool call: {name}");

        let store = &self.store;
        match name {
            "set_date_range" => set_date_range(parse_params(arguments)?, store).await,
            "set_order_by" => set_order_by(parse_params(arguments)?, store).await,
            "set_search_term" => set_search_term(parse_params(arguments)?, store).await,
            "set_resource" => set_resource(parse_params(arguments)?, store).await,
            "set_severity_levels" => set_severity_levels(parse_params(arguments)?, store).await,
            "set_wrap_body" => set_wrap_body(parse_params(arguments)?, store).await,
            "fetch_logs" => fetch_logs(parse_params(arguments)?, store).await,
            "reset_logs" => reset_logs(parse_params(arguments)?, store).await,
            "show_filters" => show_filters(parse_params(arguments)?, store).await,
            "show_logs" => show_logs(parse_params(arguments)?, store).await,
            _ => Err(McpError {
                code: ErrorCode::INVALID_PARAMS,
                message: format!("Unknown tool: {name}").into(),
                data: None,
            }),
        }
    }
}
