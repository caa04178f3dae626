use crate::config::SlackRecordConfig;
use crate::error::Result;
use crate::logging::{Timer, log_error};
use crate::record::{Fields, Level, LogEvent};
use crate::slack::{
    Attachment, AttachmentColor, Field, LineFormatter, MessageFormatter, Payload,
    PassthroughFormatter, ValueStringifier,
};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Builds Slack payloads from log records.
///
/// Holds only read-only state, so a single instance can be shared across
/// threads; every `build` call allocates its own payload.
#[derive(Clone)]
pub struct SlackRecord {
    config: SlackRecordConfig,
    formatter: Arc<dyn MessageFormatter>,
    /// Present exactly when context/extra collapse into short fields
    stringifier: Option<ValueStringifier>,
}

impl fmt::Debug for SlackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackRecord")
            .field("config", &self.config)
            .field("stringifier", &self.stringifier)
            .finish()
    }
}

impl SlackRecord {
    pub fn new(config: SlackRecordConfig) -> Self {
        let stringifier = config.needs_stringifier().then(ValueStringifier::new);
        let formatter: Arc<dyn MessageFormatter> = match config.line_format() {
            Some(format) => Arc::new(LineFormatter::new(format)),
            None => Arc::new(PassthroughFormatter),
        };

        tracing::debug!(
            channel = ?config.channel(),
            username = %config.username(),
            use_attachment = config.use_attachment(),
            use_short_attachment = config.use_short_attachment(),
            include_context_and_extra = config.include_context_and_extra(),
            line_format = ?config.line_format(),
            "Slack record builder configured"
        );

        Self {
            config,
            formatter,
            stringifier,
        }
    }

    /// Replace the message formatter (raw message or configured line format)
    pub fn with_formatter(mut self, formatter: impl MessageFormatter + 'static) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    pub fn config(&self) -> &SlackRecordConfig {
        &self.config
    }

    /// Severity ladder, highest threshold first
    pub fn color_for(level: u16) -> AttachmentColor {
        let color = if level >= Level::Error.value() {
            AttachmentColor::Danger
        } else if level >= Level::Warning.value() {
            AttachmentColor::Warning
        } else if level >= Level::Info.value() {
            AttachmentColor::Good
        } else {
            AttachmentColor::Default
        };

        tracing::trace!(level = level, color = color.as_str(), "Picked attachment color");
        color
    }

    /// Build the payload for one record.
    ///
    /// Fails only when the configured formatter fails.
    pub fn build(&self, event: &LogEvent) -> Result<Payload> {
        let _timer = Timer::new("build_slack_payload");

        let message = self.display_text(event)?;

        let mut payload = Payload {
            username: self.config.username().to_string(),
            text: String::new(),
            attachments: Vec::new(),
            channel: self.config.channel().map(str::to_string),
            icon_emoji: self.config.icon_emoji().map(|e| format!(":{}:", e)),
        };

        if self.config.use_attachment() {
            let attachment = self.build_attachment(event, message);
            tracing::debug!(
                level = event.level,
                color = attachment.color.as_str(),
                field_count = attachment.fields.len(),
                short = self.config.use_short_attachment(),
                "Built Slack attachment payload"
            );
            payload.attachments.push(attachment);
        } else {
            tracing::debug!(level = event.level, "Built plain Slack payload");
            payload.text = message;
        }

        Ok(payload)
    }

    fn display_text(&self, event: &LogEvent) -> Result<String> {
        self.formatter
            .format(event)
            .inspect_err(|e| log_error("format_message", e))
    }

    fn build_attachment(&self, event: &LogEvent, message: String) -> Attachment {
        let short = self.config.use_short_attachment();
        let (title, mut fields) = if short {
            (event.level_name.clone(), Vec::new())
        } else {
            (
                "Message".to_string(),
                vec![Field::new("Level", event.level_name.as_str(), true)],
            )
        };

        if self.config.include_context_and_extra() {
            let extra = self.without_excluded(&event.extra, "extra");
            let context = self.without_excluded(&event.context, "context");

            for (category, data) in [("Extra", extra), ("Context", context)] {
                if data.is_empty() {
                    continue;
                }

                match &self.stringifier {
                    Some(stringifier) => fields.push(Field::new(
                        category,
                        stringifier.stringify(&data),
                        short,
                    )),
                    None => fields.extend(data.iter().map(|(key, value)| {
                        Field::new(key.as_str(), value.clone(), short)
                    })),
                }
            }
        }

        Attachment {
            fallback: message.clone(),
            color: Self::color_for(event.level),
            title,
            text: message,
            fields,
        }
    }

    fn without_excluded<'a>(&self, fields: &'a Fields, root: &str) -> Cow<'a, Fields> {
        let paths: Vec<Vec<&str>> = self
            .config
            .exclude_fields()
            .filter_map(|path| {
                let mut segments = path.split('.');
                (segments.next() == Some(root)).then(|| segments.collect::<Vec<_>>())
            })
            .filter(|segments| !segments.is_empty())
            .collect();

        if paths.is_empty() {
            return Cow::Borrowed(fields);
        }

        let mut owned = fields.clone();
        for segments in &paths {
            remove_path(&mut owned, segments);
        }
        Cow::Owned(owned)
    }
}

fn remove_path(fields: &mut Fields, segments: &[&str]) {
    match segments {
        [] => {}
        [last] => {
            fields.shift_remove(*last);
        }
        [head, rest @ ..] => {
            if let Some(Value::Object(child)) = fields.get_mut(*head) {
                remove_path(child, rest);
            }
        }
    }
}
