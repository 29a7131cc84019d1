use thiserror::Error;

use crate::query::DEFAULT_MAX_ENTRIES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse {var} as {expected_type}: {source}")]
    ParseError {
        var: String,
        expected_type: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Configuration for the in-memory log source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub max_entries: usize,
    pub rust_log: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            rust_log: "info".to_string(),
        }
    }
}

/// Configuration for the filter store
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub reset_on_filter_change: bool,
}

/// Configuration for transport layer
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub transport: String,
    pub bind_address: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Main configuration container
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: SourceConfig,
    pub store: StoreConfig,
    pub transport: TransportConfig,
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // LOGSCOPE_TRANSPORT
        if let Ok(transport) = std::env::var("LOGSCOPE_TRANSPORT") {
            config.transport.transport = transport;
        }

        // LOGSCOPE_BIND_ADDRESS
        if let Ok(bind_address) = std::env::var("LOGSCOPE_BIND_ADDRESS") {
            config.transport.bind_address = bind_address;
        }

        // LOGSCOPE_RESET_ON_FILTER_CHANGE
        if let Ok(reset) = std::env::var("LOGSCOPE_RESET_ON_FILTER_CHANGE") {
            config.store.reset_on_filter_change = parse_flag(&reset);
        }

        // LOGSCOPE_MAX_ENTRIES
        if let Ok(max_entries_str) = std::env::var("LOGSCOPE_MAX_ENTRIES") {
            config.source.max_entries =
                max_entries_str
                    .parse()
                    .map_err(|e| ConfigError::ParseError {
                        var: "LOGSCOPE_MAX_ENTRIES".to_string(),
                        expected_type: "usize".to_string(),
                        source: Box::new(e),
                    })?;
        }

        // RUST_LOG
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            config.source.rust_log = rust_log;
        }

        if config.source.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                var: "LOGSCOPE_MAX_ENTRIES".to_string(),
                message: "max entries must be greater than 0".to_string(),
            });
        }

        if !matches!(
            config.transport.transport.as_str(),
            "stdio" | "streamable-http" | "http"
        ) {
            return Err(ConfigError::InvalidValue {
                var: "LOGSCOPE_TRANSPORT".to_string(),
                message: format!(
                    "unknown transport '{}', use 'stdio' or 'streamable-http'",
                    config.transport.transport
                ),
            });
        }

        Ok(config)
    }
}
