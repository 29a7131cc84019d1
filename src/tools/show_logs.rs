use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query::LogMessage;
use crate::store::LogsFilterStore;

/// Body length kept on a single line when wrapping is off
const UNWRAPPED_BODY_WIDTH: usize = 120;

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ShowLogsRequest {
    #[serde(default = "default_limit")]
    pub limit: usize,

    #[serde(default)]
    pub offset: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

fn default_limit() -> usize {
    20
}

// Collapse a multi-line body onto one line and cut it to a fixed width
fn unwrap_body(body: &str) -> String {
    let single_line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() > UNWRAPPED_BODY_WIDTH {
        let cut: String = single_line.chars().take(UNWRAPPED_BODY_WIDTH).collect();
        format!("{cut}…")
    } else {
        single_line
    }
}

fn render_body(body: &str, wrap_body: bool) -> String {
    if wrap_body {
        body.to_string()
    } else {
        unwrap_body(body)
    }
}

fn format_attributes(message: &LogMessage) -> String {
    message
        .attributes
        .iter()
        .map(|(k, v)| {
            let v_str = match v {
                Value::String(s) => format!("\"{s}\""),
                _ => v.to_string(),
            };
            format!("{k}: {v_str}")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_ai_output(logs: &[LogMessage], wrap_body: bool, total: usize) -> Content {
    let mut output = String::new();

    if logs.is_empty() {
        output.push_str("No log messages loaded.\n");
    } else {
        for log in logs {
            let resource = if log.resource.is_empty() {
                String::new()
            } else {
                format!(" {}:", log.resource)
            };
            output.push_str(&format!(
                "[{}] {}{resource} {}\n",
                log.level.to_uppercase(),
                log.timestamp.format("%Y-%m-%d %H:%M:%S"),
                render_body(&log.body, wrap_body)
            ));
        }
        output.push_str(&format!("\n({} of {total} loaded logs shown)\n", logs.len()));
    }

    Content::text(output)
}

fn format_text_output(logs: &[LogMessage], wrap_body: bool) -> Content {
    let mut output = String::new();

    for log in logs {
        output.push_str(&format!(
            "[{}] {} | {}\n",
            if log.uuid.is_empty() { "-" } else { log.uuid.as_str() },
            log.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            log.level,
        ));

        if !log.resource.is_empty() {
            output.push_str(&format!("Resource: {}\n", log.resource));
        }
        if !log.attributes.is_empty() {
            output.push_str(&format!("Attributes: {}\n", format_attributes(log)));
        }

        output.push_str(&format!("Body: {}\n", render_body(&log.body, wrap_body)));
        output.push_str("-".repeat(60).as_str());
        output.push('\n');
    }

    Content::text(output)
}

pub async fn show_logs(
    req: ShowLogsRequest,
    store: &LogsFilterStore,
) -> Result<CallToolResult, McpError> {
    tracing::debug!(
        "show_logs called with limit: {}, offset: {}, format: {:?}",
        req.limit,
        req.offset,
        req.format
    );

    let state = store.snapshot().await;
    let total = state.logs.len();
    let start = req.offset.min(total);
    let end = start.saturating_add(req.limit).min(total);
    let logs = &state.logs[start..end];

    let format = req.format.as_deref().unwrap_or("ai").trim();
    let content = match format {
        "json" => Content::text(
            serde_json::to_string_pretty(logs)
                .unwrap_or_else(|e| format!("Failed to serialize logs: {e}")),
        ),
        "text" => format_text_output(logs, state.wrap_body),
        // Anything unrecognized falls back to the compact format
        _ => format_ai_output(logs, state.wrap_body, total),
    };

    Ok(CallToolResult::success(vec![content]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_body_collapses_lines() {
        assert_eq!(unwrap_body("panic at\n  src/main.rs:10\n"), "panic at src/main.rs:10");
    }

    #[test]
    fn test_unwrap_body_truncates() {
        let body = "x".repeat(200);
        let rendered = unwrap_body(&body);
        assert_eq!(rendered.chars().count(), UNWRAPPED_BODY_WIDTH + 1);
        assert!(rendered.ends_with('…'));
    }

    #[test]
    fn test_render_body_keeps_wrapped_text() {
        assert_eq!(render_body("a\nb", true), "a\nb");
        assert_eq!(render_body("a\nb", false), "a b");
    }
}
