use crate::record::Level;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered key/value data attached to a record.
///
/// Backed by serde_json's insertion-ordered map, so iteration follows the
/// order keys were logged in.
pub type Fields = serde_json::Map<String, Value>;

/// A single log record.
///
/// Deserialization accepts `level`, `level_name`, or both; a missing half is
/// filled in from the standard [`Level`] ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLogEvent")]
pub struct LogEvent {
    /// Numeric severity (see [`Level`] for the standard values)
    pub level: u16,

    /// Level name as the logger reported it (e.g., "ERROR")
    pub level_name: String,

    pub message: String,

    pub context: Fields,

    pub extra: Fields,

    /// Logger channel the record was emitted on
    pub channel: String,

    pub datetime: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawLogEvent {
    level: Option<u16>,
    level_name: Option<String>,
    message: String,
    #[serde(default)]
    context: Fields,
    #[serde(default)]
    extra: Fields,
    #[serde(default = "default_channel")]
    channel: String,
    #[serde(default = "Utc::now")]
    datetime: DateTime<Utc>,
}

impl TryFrom<RawLogEvent> for LogEvent {
    type Error = String;

    fn try_from(raw: RawLogEvent) -> Result<Self, Self::Error> {
        let (level, level_name) = match (raw.level, raw.level_name) {
            (Some(level), Some(name)) => (level, name),
            (Some(level), None) => {
                let known = Level::from_value(level).ok_or_else(|| {
                    format!("level {} is not a standard level, level_name is required", level)
                })?;
                (level, known.to_string())
            }
            (None, Some(name)) => {
                let known = Level::from_name(&name)
                    .ok_or_else(|| format!("unknown level_name {:?}", name))?;
                (known.value(), known.to_string())
            }
            (None, None) => return Err("record needs level or level_name".to_string()),
        };

        Ok(Self {
            level,
            level_name,
            message: raw.message,
            context: raw.context,
            extra: raw.extra,
            channel: raw.channel,
            datetime: raw.datetime,
        })
    }
}

fn default_channel() -> String {
    "app".to_string()
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level: level.value(),
            level_name: level.to_string(),
            message: message.into(),
            context: Fields::new(),
            extra: Fields::new(),
            channel: default_channel(),
            datetime: Utc::now(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = datetime;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_sets_level_and_name() {
        let event = LogEvent::new(Level::Warning, "disk almost full");
        assert_eq!(event.level, 300);
        assert_eq!(event.level_name, "WARNING");
        assert!(event.context.is_empty());
        assert!(event.extra.is_empty());
        assert_eq!(event.channel, "app");
    }

    #[test]
    fn test_context_keeps_insertion_order() {
        let event = LogEvent::new(Level::Info, "hi")
            .with_context("zeta", 1)
            .with_context("alpha", 2)
            .with_context("mid", 3);
        let keys: Vec<_> = event.context.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_defaults_missing_maps() {
        let event: LogEvent = serde_json::from_value(json!({
            "level": 400,
            "level_name": "ERROR",
            "message": "boom"
        }))
        .unwrap();

        assert_eq!(event.level, 400);
        assert!(event.context.is_empty());
        assert!(event.extra.is_empty());
        assert_eq!(event.channel, "app");
    }

    #[test]
    fn test_deserialize_fills_level_from_name() {
        let event: LogEvent = serde_json::from_value(json!({
            "level_name": "warning",
            "message": "slow"
        }))
        .unwrap();

        assert_eq!(event.level, 300);
        assert_eq!(event.level_name, "WARNING");
    }

    #[test]
    fn test_deserialize_fills_name_from_level() {
        let event: LogEvent = serde_json::from_value(json!({
            "level": 550,
            "level_name": "PAGE",
            "message": "custom"
        }))
        .unwrap();
        assert_eq!((event.level, event.level_name.as_str()), (550, "PAGE"));

        let event: LogEvent =
            serde_json::from_value(json!({"level": 250, "message": "note"})).unwrap();
        assert_eq!(event.level_name, "NOTICE");
    }

    #[test]
    fn test_deserialize_rejects_unresolvable_levels() {
        let missing = serde_json::from_value::<LogEvent>(json!({"message": "x"}));
        assert!(missing.unwrap_err().to_string().contains("level or level_name"));

        let custom = serde_json::from_value::<LogEvent>(json!({"level": 550, "message": "x"}));
        assert!(custom.unwrap_err().to_string().contains("level_name is required"));

        let unknown =
            serde_json::from_value::<LogEvent>(json!({"level_name": "LOUD", "message": "x"}));
        assert!(unknown.unwrap_err().to_string().contains("LOUD"));
    }

    #[test]
    fn test_serialized_record_reads_back() {
        let event = LogEvent::new(Level::Critical, "db down").with_extra("host", "db-1");
        let json = serde_json::to_value(&event).unwrap();
        let back: LogEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_deserialize_full_record() {
        let event: LogEvent = serde_json::from_value(json!({
            "level": 200,
            "level_name": "INFO",
            "message": "user login",
            "context": {"user": "ana", "attempt": 2},
            "extra": {"host": "web-1"},
            "channel": "security",
            "datetime": "2024-05-01T12:30:00Z"
        }))
        .unwrap();

        assert_eq!(event.channel, "security");
        assert_eq!(event.context["attempt"], json!(2));
        assert_eq!(event.extra["host"], json!("web-1"));
        assert_eq!(event.datetime.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }
}
