use crate::{
    cli::CliOptions,
    config::Config,
    query::InMemoryLogService,
    store::LogsFilterStore,
    tools::ToolManager,
};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct LogScopeServer {
    pub(crate) tool_manager: Arc<ToolManager>,
    pub(crate) service: InMemoryLogService,
    pub(crate) sources: Arc<Vec<PathBuf>>,
    pub(crate) watch_sources: bool,
}

impl LogScopeServer {
    pub fn new(config: &Config, cli: &CliOptions) -> Self {
        let service = InMemoryLogService::new(config.source.max_entries);
        let reset_on_filter_change =
            config.store.reset_on_filter_change || cli.reset_on_filter_change;

        if reset_on_filter_change {
            tracing::info!("Loaded logs will be cleared whenever a filter changes");
        }

        let store = LogsFilterStore::new(Arc::new(service.clone()))
            .with_reset_on_filter_change(reset_on_filter_change);

        Self {
            tool_manager: Arc::new(ToolManager::new(store)),
            service,
            sources: Arc::new(cli.sources.clone()),
            watch_sources: cli.watch_sources,
        }
    }

    pub fn store(&self) -> &LogsFilterStore {
        &self.tool_manager.store
    }

    /// Replace the in-memory log contents with a fresh read of every source.
    /// Unreadable sources are logged and skipped.
    ///
    /// All sources are parsed before the swap, so a concurrent fetch never
    /// sees an empty or half-loaded service.
    pub async fn reload_sources(&self) -> usize {
        let mut messages = Vec::new();
        for source in self.sources.iter() {
            match InMemoryLogService::read_jsonl(source).await {
                Ok((parsed, skipped)) => {
                    tracing::debug!(
                        "Read {} log messages from {} ({skipped} skipped)",
                        parsed.len(),
                        source.display()
                    );
                    messages.extend(parsed);
                }
                Err(e) => tracing::error!("Failed to read {}: {e}", source.display()),
            }
        }

        let loaded = messages.len();
        self.service.replace_all(messages).await;

        tracing::info!(
            "Loaded {loaded} log messages from {} sources",
            self.sources.len()
        );
        loaded
    }

    pub async fn initialize(&self) -> Result<()> {
        self.reload_sources().await;

        if self.watch_sources {
            tracing::info!("Source file watching enabled (-w option)");
            self.start_file_watching()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FetchOutcome;
    use std::io::Write;

    fn jsonl_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_reload_sources_skips_missing_files() {
        let file = jsonl_file(&[
            r#"{"timestamp":"2024-01-15T11:00:00Z","level":"info","body":"one"}"#,
            r#"{"timestamp":"2024-01-15T11:01:00Z","level":"info","body":"two"}"#,
        ]);
        let cli = CliOptions {
            sources: vec![file.path().to_path_buf(), PathBuf::from("/nonexistent.jsonl")],
            ..CliOptions::default()
        };
        let server = LogScopeServer::new(&Config::default(), &cli);

        assert_eq!(server.reload_sources().await, 2);
        // Reloading replaces rather than duplicates
        assert_eq!(server.reload_sources().await, 2);
        assert_eq!(server.service.count().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fetch_during_reload_sees_complete_sources() {
        let now = chrono::Utc::now().to_rfc3339();
        let lines: Vec<String> = (0..50)
            .map(|i| {
                format!(r#"{{"uuid":"{i}","timestamp":"{now}","level":"info","body":"line {i}"}}"#)
            })
            .collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = jsonl_file(&line_refs);
        let cli = CliOptions {
            sources: vec![file.path().to_path_buf()],
            ..CliOptions::default()
        };
        let server = LogScopeServer::new(&Config::default(), &cli);
        server.initialize().await.unwrap();

        let reloader = tokio::spawn({
            let server = server.clone();
            async move {
                for _ in 0..50 {
                    assert_eq!(server.reload_sources().await, 50);
                }
            }
        });

        while !reloader.is_finished() {
            let outcome = server.store().refresh_logs().await.unwrap();
            assert_eq!(outcome, FetchOutcome::Appended { received: 50, total: 50 });
        }
        reloader.await.unwrap();
        assert_eq!(server.service.count().await, 50);
    }

    #[tokio::test]
    async fn test_cli_flag_enables_reset_on_filter_change() {
        let line = format!(
            r#"{{"timestamp":"{}","level":"info","resource":"api","body":"recent"}}"#,
            chrono::Utc::now().to_rfc3339()
        );
        let file = jsonl_file(&[&line]);
        let cli = CliOptions {
            reset_on_filter_change: true,
            sources: vec![file.path().to_path_buf()],
            ..CliOptions::default()
        };
        let server = LogScopeServer::new(&Config::default(), &cli);
        server.initialize().await.unwrap();

        server.store().fetch_logs().await.unwrap();
        assert_eq!(server.store().snapshot().await.logs.len(), 1);

        server.store().set_resource("api").await;
        let state = server.store().snapshot().await;
        assert_eq!(state.resource, "api");
        assert!(state.logs.is_empty());
    }
}
