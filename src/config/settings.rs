use crate::error::{Result, SlackRecordError};

const DEFAULT_USERNAME: &str = "Monolog";

/// Rendering settings for Slack payloads.
///
/// Built once and shared read-only across every `build` call. Fields are set
/// through the `with_*` builders and read back normalized through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackRecordConfig {
    channel: Option<String>,
    username: String,
    icon_emoji: Option<String>,
    use_attachment: bool,
    use_short_attachment: bool,
    include_context_and_extra: bool,
    exclude_fields: Vec<String>,
    line_format: Option<String>,
}

impl Default for SlackRecordConfig {
    fn default() -> Self {
        Self {
            channel: None,
            username: DEFAULT_USERNAME.to_string(),
            icon_emoji: None,
            use_attachment: false,
            use_short_attachment: false,
            include_context_and_extra: false,
            exclude_fields: Vec::new(),
            line_format: None,
        }
    }
}

impl SlackRecordConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Accepts `ghost` as well as `:ghost:`
    pub fn with_icon_emoji(mut self, icon_emoji: impl Into<String>) -> Self {
        self.icon_emoji = Some(icon_emoji.into());
        self
    }

    pub fn with_attachment(mut self, use_attachment: bool) -> Self {
        self.use_attachment = use_attachment;
        self
    }

    pub fn with_short_attachment(mut self, use_short_attachment: bool) -> Self {
        self.use_short_attachment = use_short_attachment;
        self
    }

    pub fn with_context_and_extra(mut self, include: bool) -> Self {
        self.include_context_and_extra = include;
        self
    }

    /// Dot paths such as `context.password` or `extra.request.headers`
    pub fn with_exclude_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Template for the default `LineFormatter`; unset means the raw message
    pub fn with_line_format(mut self, line_format: impl Into<String>) -> Self {
        self.line_format = Some(line_format.into());
        self
    }

    /// `None` when unset or empty
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref().filter(|c| !c.is_empty())
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Emoji name with surrounding colons stripped, `None` when nothing is left
    pub fn icon_emoji(&self) -> Option<&str> {
        self.icon_emoji
            .as_deref()
            .map(|e| e.trim_matches(':'))
            .filter(|e| !e.is_empty())
    }

    pub fn use_attachment(&self) -> bool {
        self.use_attachment
    }

    pub fn use_short_attachment(&self) -> bool {
        self.use_short_attachment
    }

    pub fn include_context_and_extra(&self) -> bool {
        self.include_context_and_extra
    }

    pub fn exclude_fields(&self) -> impl Iterator<Item = &str> {
        self.exclude_fields
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
    }

    pub fn line_format(&self) -> Option<&str> {
        self.line_format.as_deref().filter(|f| !f.is_empty())
    }

    /// Whether context/extra collapse into a single stringified field each
    pub fn needs_stringifier(&self) -> bool {
        self.include_context_and_extra && self.use_short_attachment
    }
}

pub fn load_settings() -> Result<SlackRecordConfig> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    settings_from_lookup(|key| std::env::var(key).ok())
}

/// Build settings from an arbitrary variable source
pub fn settings_from_lookup<F>(lookup: F) -> Result<SlackRecordConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SlackRecordConfig::new()
        .with_attachment(parse_flag(&lookup, "SLACK_USE_ATTACHMENT", true)?)
        .with_short_attachment(parse_flag(&lookup, "SLACK_USE_SHORT_ATTACHMENT", false)?)
        .with_context_and_extra(parse_flag(&lookup, "SLACK_INCLUDE_CONTEXT_AND_EXTRA", false)?);

    if let Some(channel) = lookup("SLACK_CHANNEL") {
        config = config.with_channel(channel.trim());
    }

    if let Some(username) = lookup("SLACK_USERNAME").filter(|u| !u.trim().is_empty()) {
        config = config.with_username(username.trim());
    }

    if let Some(icon) = lookup("SLACK_ICON_EMOJI") {
        config = config.with_icon_emoji(icon.trim());
    }

    if let Some(fields) = lookup("SLACK_EXCLUDE_FIELDS") {
        config = config.with_exclude_fields(fields.split(','));
    }

    if let Some(format) = lookup("SLACK_LINE_FORMAT") {
        config = config.with_line_format(format);
    }

    Ok(config)
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SlackRecordError::Config(format!(
            "Invalid {}: {:?}",
            key, other
        ))),
    }
}
