use super::logscope_server::LogScopeServer;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext};

impl ServerHandler for LogScopeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "logscope".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Log search with paginated loading. Set filters with the set_* tools, load pages with fetch_logs, read them with show_logs. Changing filters does not clear loaded logs unless the server was started with --reset-on-filter-change; use reset_logs to start over."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_manager.get_all_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        self.tool_manager.call_tool(&request.name, arguments).await
    }
}
