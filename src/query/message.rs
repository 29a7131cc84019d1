use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured log record as returned by a query service.
///
/// Only the fields the query layer filters on are typed; everything else the
/// producer attached is kept verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    #[serde(default)]
    pub uuid: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub body: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl LogMessage {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: impl Into<String>,
        resource: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            uuid: String::new(),
            timestamp,
            level: level.into(),
            resource: resource.into(),
            body: body.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }

    pub fn match_level(&self, levels: &[String]) -> bool {
        levels.is_empty() || levels.iter().any(|l| l.eq_ignore_ascii_case(&self.level))
    }

    pub fn match_resource(&self, resource: &str) -> bool {
        resource.is_empty() || self.resource == resource
    }
}
