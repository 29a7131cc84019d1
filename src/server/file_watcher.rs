use super::logscope_server::LogScopeServer;
use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

const RELOAD_DEBOUNCE: Duration = Duration::from_secs(2);

// Watch the file itself, or its directory until it gets created
fn watch_target(source: &Path) -> PathBuf {
    if source.exists() {
        source.to_path_buf()
    } else {
        let parent = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        tracing::info!(
            "{} doesn't exist, watching parent directory: {}",
            source.display(),
            parent.display()
        );
        parent.to_path_buf()
    }
}

fn touches_source(event: &Event, names: &[OsString]) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event.paths.iter().any(|path| {
            path.file_name()
                .is_some_and(|name| names.iter().any(|n| n == name))
        })
}

impl LogScopeServer {
    pub(crate) fn start_file_watching(&self) -> Result<()> {
        if self.sources.is_empty() {
            tracing::warn!("No sources available for file watching");
            return Ok(());
        }

        let (tx, mut rx) = mpsc::channel::<Event>(100);

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    let _ = tx.blocking_send(event);
                }
                Err(e) => tracing::warn!("File watch error: {e}"),
            },
            Config::default(),
        )
        .context("Failed to create file watcher")?;

        let targets: HashSet<PathBuf> = self.sources.iter().map(|s| watch_target(s)).collect();
        for target in &targets {
            watcher
                .watch(target, RecursiveMode::NonRecursive)
                .with_context(|| format!("Failed to watch path {}", target.display()))?;
        }

        let names: Vec<OsString> = self
            .sources
            .iter()
            .filter_map(|s| s.file_name().map(|n| n.to_os_string()))
            .collect();

        // Spawn debounced reload handler
        let server = self.clone();
        tokio::spawn(async move {
            // The watcher stops when dropped, so the task owns it
            let _watcher = watcher;
            let mut last_event = Instant::now();
            let mut pending_reload = false;

            loop {
                tokio::select! {
                    event = rx.recv() => match event {
                        Some(event) if touches_source(&event, &names) => {
                            tracing::debug!("Source change detected: {:?}", event.kind);
                            last_event = Instant::now();
                            pending_reload = true;
                        }
                        Some(_) => {}
                        None => break,
                    },
                    _ = tokio::time::sleep(Duration::from_millis(100)) => {
                        if pending_reload && last_event.elapsed() > RELOAD_DEBOUNCE {
                            tracing::info!("Source files changed, reloading after debounce");
                            server.reload_sources().await;
                            pending_reload = false;
                        }
                    }
                }
            }

            tracing::info!("File watching ended");
        });

        tracing::info!("Watching {} source paths", targets.len());
        Ok(())
    }
}
