use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::query::relative_date::resolve_bound;
use crate::query::{LogMessage, LogQuery, LogQueryResponse, LogQueryService, QueryServiceError};

pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Outcome of loading a JSONL source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Bounded in-memory log store answering [`LogQuery`]s.
#[derive(Clone)]
pub struct InMemoryLogService {
    entries: Arc<RwLock<VecDeque<LogMessage>>>,
    max_entries: usize,
    clock: Clock,
}

impl std::fmt::Debug for InMemoryLogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLogService")
            .field("max_entries", &self.max_entries)
            .finish_non_exhaustive()
    }
}

enum SearchMatcher {
    Any,
    Pattern(Regex),
    Literal(String),
}

impl SearchMatcher {
    fn new(term: &str) -> Self {
        if term.is_empty() {
            return SearchMatcher::Any;
        }
        match Regex::new(term) {
            Ok(re) => SearchMatcher::Pattern(re),
            // Invalid regex is treated as a literal search
            Err(_) => SearchMatcher::Literal(term.to_lowercase()),
        }
    }

    fn is_match(&self, body: &str) -> bool {
        match self {
            SearchMatcher::Any => true,
            SearchMatcher::Pattern(re) => re.is_match(body),
            SearchMatcher::Literal(needle) => body.to_lowercase().contains(needle),
        }
    }
}

impl InMemoryLogService {
    pub fn new(max_entries: usize) -> Self {
        tracing::info!("In-memory log service initialized with max entries: {max_entries}");

        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            max_entries,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock used to resolve relative date bounds
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn trim_entries(&self, entries: &mut VecDeque<LogMessage>) {
        if entries.len() > self.max_entries {
            let remove_count = entries.len() - self.max_entries;
            entries.drain(..remove_count);
            tracing::debug!("Trimmed {remove_count} old log messages");
        }
    }

    pub async fn ingest(&self, message: LogMessage) {
        let mut entries = self.entries.write().await;
        entries.push_back(message);
        self.trim_entries(&mut entries);
    }

    pub async fn ingest_all(&self, messages: impl IntoIterator<Item = LogMessage>) {
        let mut entries = self.entries.write().await;
        entries.extend(messages);
        self.trim_entries(&mut entries);
    }

    /// Parse newline-delimited JSON log records. Lines that fail to parse are
    /// skipped and counted.
    pub fn parse_jsonl(text: &str) -> (Vec<LogMessage>, usize) {
        let mut messages = Vec::new();
        let mut skipped = 0;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<LogMessage>(line) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!("Skipping line {}: {e}", line_no + 1);
                }
            }
        }

        (messages, skipped)
    }

    /// Read and parse one JSONL file without touching the stored entries.
    pub async fn read_jsonl(path: impl AsRef<Path>) -> std::io::Result<(Vec<LogMessage>, usize)> {
        let text = tokio::fs::read_to_string(path).await?;
        Ok(Self::parse_jsonl(&text))
    }

    pub async fn load_jsonl(&self, path: impl AsRef<Path>) -> std::io::Result<LoadReport> {
        let path = path.as_ref();
        let (messages, skipped) = Self::read_jsonl(path).await?;
        let loaded = messages.len();

        self.ingest_all(messages).await;

        tracing::info!(
            "Loaded {loaded} log messages from {} ({skipped} skipped)",
            path.display()
        );
        Ok(LoadReport { loaded, skipped })
    }

    /// Swap the whole contents for `messages` under a single write lock, so
    /// queries see either the old set or the new one.
    pub async fn replace_all(&self, messages: Vec<LogMessage>) {
        let mut entries = self.entries.write().await;
        entries.clear();
        entries.extend(messages);
        self.trim_entries(&mut entries);
        tracing::debug!("Replaced log contents with {} messages", entries.len());
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        tracing::info!("Cleared all log messages");
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for InMemoryLogService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl LogQueryService for InMemoryLogService {
    async fn query(&self, request: LogQuery) -> Result<LogQueryResponse, QueryServiceError> {
        let newest_first = match request.order_by.as_str() {
            "latest" => true,
            "earliest" => false,
            other => return Err(QueryServiceError::InvalidOrderBy(other.to_string())),
        };

        let now = (self.clock)();
        let from = resolve_bound(request.date_range.date_from.as_deref(), now)?;
        let to = resolve_bound(request.date_range.date_to.as_deref(), now)?;
        let search = SearchMatcher::new(&request.search_term);

        let entries = self.entries.read().await;
        let mut result: Vec<&LogMessage> = entries
            .iter()
            .filter(|m| from.is_none_or(|from| m.timestamp >= from))
            .filter(|m| to.is_none_or(|to| m.timestamp < to))
            .filter(|m| m.match_resource(&request.resource))
            .filter(|m| m.match_level(&request.severity_levels))
            .filter(|m| search.is_match(&m.body))
            .collect();

        if newest_first {
            result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        } else {
            result.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        }

        let results: Vec<LogMessage> = result
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect();

        tracing::debug!(
            "Query offset={} limit={} matched {} messages",
            request.offset,
            request.limit,
            results.len()
        );

        Ok(LogQueryResponse::new(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{DateRange, PAGE_SIZE};
    use chrono::{Duration, TimeZone};
    use std::io::Write;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn query() -> LogQuery {
        LogQuery {
            limit: PAGE_SIZE,
            offset: 0,
            order_by: "latest".to_string(),
            date_range: DateRange::default(),
            search_term: String::new(),
            resource: String::new(),
            severity_levels: Vec::new(),
        }
    }

    async fn seeded() -> InMemoryLogService {
        let service = InMemoryLogService::new(100).with_clock(now);
        service
            .ingest_all([
                LogMessage::new(now() - Duration::hours(1), "info", "api", "request served")
                    .with_uuid("a"),
                LogMessage::new(now() - Duration::hours(2), "error", "api", "Connection timeout")
                    .with_uuid("b"),
                LogMessage::new(now() - Duration::days(2), "warn", "worker", "queue slow")
                    .with_uuid("c"),
                LogMessage::new(now() - Duration::days(30), "error", "worker", "old crash")
                    .with_uuid("d"),
            ])
            .await;
        service
    }

    fn uuids(response: &LogQueryResponse) -> Vec<&str> {
        response.results.iter().map(|m| m.uuid.as_str()).collect()
    }

    #[tokio::test]
    async fn test_default_query_uses_last_seven_days_newest_first() {
        let service = seeded().await;
        let response = service.query(query()).await.unwrap();
        assert_eq!(uuids(&response), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_earliest_ordering() {
        let service = seeded().await;
        let mut q = query();
        q.order_by = "earliest".to_string();
        q.date_range = DateRange::new(None, None);

        let response = service.query(q).await.unwrap();
        assert_eq!(uuids(&response), vec!["d", "c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_unknown_order_by_is_rejected() {
        let service = seeded().await;
        let mut q = query();
        q.order_by = "sideways".to_string();

        let err = service.query(q).await.unwrap_err();
        assert_eq!(err, QueryServiceError::InvalidOrderBy("sideways".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_date_is_rejected() {
        let service = seeded().await;
        let mut q = query();
        q.date_range = DateRange::new(Some("last tuesday".to_string()), None);

        assert!(matches!(
            service.query(q).await,
            Err(QueryServiceError::InvalidDate { .. })
        ));
    }

    #[tokio::test]
    async fn test_date_to_is_exclusive() {
        let service = seeded().await;
        let mut q = query();
        let bound = (now() - Duration::hours(1)).to_rfc3339();
        q.date_range = DateRange::new(None, Some(bound));

        let response = service.query(q).await.unwrap();
        assert_eq!(uuids(&response), vec!["b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_filter_by_resource_and_severity() {
        let service = seeded().await;
        let mut q = query();
        q.date_range = DateRange::new(Some("all".to_string()), None);
        q.resource = "worker".to_string();
        q.severity_levels = vec!["ERROR".to_string()];

        let response = service.query(q).await.unwrap();
        assert_eq!(uuids(&response), vec!["d"]);
    }

    #[tokio::test]
    async fn test_search_term_regex_and_literal_fallback() {
        let service = seeded().await;

        let mut q = query();
        q.search_term = r"(?i)connection\s+TIMEOUT".to_string();
        let response = service.query(q).await.unwrap();
        assert_eq!(uuids(&response), vec!["b"]);

        // Invalid regex falls back to a case-insensitive substring search
        let mut q = query();
        q.search_term = "timeout(".to_string();
        let response = service.query(q).await.unwrap();
        assert!(response.results.is_empty());

        let mut q = query();
        q.search_term = "queue".to_string();
        let response = service.query(q).await.unwrap();
        assert_eq!(uuids(&response), vec!["c"]);
    }

    #[tokio::test]
    async fn test_offset_and_limit_paginate() {
        let service = InMemoryLogService::new(1000).with_clock(now);
        service
            .ingest_all((0..250).map(|i| {
                LogMessage::new(now() - Duration::minutes(i), "info", "api", format!("line {i}"))
                    .with_uuid(i.to_string())
            }))
            .await;

        let mut q = query();
        q.offset = 200;
        let response = service.query(q).await.unwrap();
        assert_eq!(response.results.len(), 50);
        assert_eq!(response.results[0].uuid, "200");

        let mut q = query();
        q.offset = 300;
        assert!(service.query(q).await.unwrap().results.is_empty());
    }

    #[tokio::test]
    async fn test_max_entries_trims_oldest_ingested() {
        let service = InMemoryLogService::new(3).with_clock(now);
        for i in 0..5 {
            service
                .ingest(LogMessage::new(now(), "info", "api", "x").with_uuid(i.to_string()))
                .await;
        }
        assert_eq!(service.count().await, 3);

        let mut q = query();
        q.order_by = "earliest".to_string();
        let response = service.query(q).await.unwrap();
        let mut ids = uuids(&response);
        ids.sort();
        assert_eq!(ids, vec!["2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_load_jsonl_skips_bad_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"uuid":"1","timestamp":"2024-01-15T11:00:00Z","level":"info","resource":"api","body":"ok"}}"#
        )
        .unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"uuid":"2","timestamp":"2024-01-15T11:30:00Z","level":"error","body":"bad"}}"#
        )
        .unwrap();

        let service = InMemoryLogService::new(100).with_clock(now);
        let report = service.load_jsonl(file.path()).await.unwrap();
        assert_eq!(report, LoadReport { loaded: 2, skipped: 1 });
        assert_eq!(service.count().await, 2);

        service.clear().await;
        assert_eq!(service.count().await, 0);
    }

    #[tokio::test]
    async fn test_replace_all_swaps_and_trims() {
        let service = seeded().await;
        service
            .replace_all(
                (0..5)
                    .map(|i| LogMessage::new(now(), "info", "api", "x").with_uuid(format!("n{i}")))
                    .collect(),
            )
            .await;
        assert_eq!(service.count().await, 5);

        let trimmed = InMemoryLogService::new(2).with_clock(now);
        trimmed
            .replace_all(
                (0..5)
                    .map(|i| LogMessage::new(now(), "info", "api", "x").with_uuid(i.to_string()))
                    .collect(),
            )
            .await;
        let response = trimmed.query(query()).await.unwrap();
        let mut ids = uuids(&response);
        ids.sort();
        assert_eq!(ids, vec!["3", "4"]);
    }
}
