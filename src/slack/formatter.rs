use crate::error::{Result, SlackRecordError};
use crate::record::{Fields, LogEvent};
use crate::slack::ValueStringifier;
use regex::{Captures, Regex};
use serde_json::Value;
use std::fmt::Write;
use std::sync::LazyLock;

pub const DEFAULT_LINE_FORMAT: &str =
    "[%datetime%] %channel%.%level_name%: %message% %context% %extra%";
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%([a-z_]+)(?:\.([A-Za-z0-9_-]+))?%").expect("placeholder pattern is valid")
});

/// Turns a record into the text shown in the Slack message
pub trait MessageFormatter: Send + Sync {
    fn format(&self, event: &LogEvent) -> Result<String>;
}

impl<F> MessageFormatter for F
where
    F: Fn(&LogEvent) -> Result<String> + Send + Sync,
{
    fn format(&self, event: &LogEvent) -> Result<String> {
        self(event)
    }
}

/// Uses the record's message as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

impl MessageFormatter for PassthroughFormatter {
    fn format(&self, event: &LogEvent) -> Result<String> {
        Ok(event.message.clone())
    }
}

/// Template-driven single-line formatter.
///
/// Supported placeholders: `%datetime%`, `%channel%`, `%level%`,
/// `%level_name%`, `%message%`, `%context%`, `%extra%`, and
/// `%context.<key>%` / `%extra.<key>%` for single values. Unknown
/// placeholders are left in place.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    format: String,
    date_format: String,
    stringifier: ValueStringifier,
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_FORMAT)
    }
}

impl LineFormatter {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            stringifier: ValueStringifier::new(),
        }
    }

    /// chrono `strftime` syntax; an invalid pattern fails at `format` time
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    fn render_fields(&self, fields: &Fields) -> String {
        if fields.is_empty() {
            String::new()
        } else {
            self.stringifier.stringify_value(&Value::Object(fields.clone()))
        }
    }

    fn render_key(&self, fields: &Fields, key: &str) -> String {
        fields
            .get(key)
            .map(|v| self.stringifier.stringify_value(v))
            .unwrap_or_default()
    }
}

impl MessageFormatter for LineFormatter {
    fn format(&self, event: &LogEvent) -> Result<String> {
        let mut bad_date_format = false;

        let line = PLACEHOLDER_RE.replace_all(&self.format, |caps: &Captures| {
            let key = caps.get(2).map(|m| m.as_str());
            match (&caps[1], key) {
                ("datetime", None) => {
                    let mut rendered = String::new();
                    if write!(rendered, "{}", event.datetime.format(&self.date_format)).is_err() {
                        bad_date_format = true;
                    }
                    rendered
                }
                ("channel", None) => event.channel.clone(),
                ("level", None) => event.level.to_string(),
                ("level_name", None) => event.level_name.clone(),
                ("message", None) => event.message.clone(),
                ("context", None) => self.render_fields(&event.context),
                ("extra", None) => self.render_fields(&event.extra),
                ("context", Some(key)) => self.render_key(&event.context, key),
                ("extra", Some(key)) => self.render_key(&event.extra, key),
                _ => caps[0].to_string(),
            }
        });

        if bad_date_format {
            return Err(SlackRecordError::Formatter(format!(
                "invalid date format {:?}",
                self.date_format
            )));
        }

        Ok(line.trim_end().to_string())
    }
}
