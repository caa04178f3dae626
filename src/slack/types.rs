use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sidebar color of an attachment, picked from the record's severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachmentColor {
    #[serde(rename = "danger")]
    Danger,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "#e3e4e6")]
    Default,
}

impl AttachmentColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentColor::Danger => "danger",
            AttachmentColor::Warning => "warning",
            AttachmentColor::Good => "good",
            AttachmentColor::Default => "#e3e4e6",
        }
    }
}

/// A titled value inside an attachment.
///
/// `value` is usually a string. Fields flattened from context/extra keep the
/// logged value untouched, so it may be any JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub title: String,
    pub value: Value,
    pub short: bool,
}

impl Field {
    pub fn new(title: impl Into<String>, value: impl Into<Value>, short: bool) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: AttachmentColor,
    pub title: String,
    pub text: String,
    pub fields: Vec<Field>,
}

/// Payload for a Slack incoming webhook or `chat.postMessage` form post
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub username: String,
    /// Empty whenever the message is carried by an attachment
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub channel: Option<String>,
    /// Already wrapped in colons (`:ghost:`)
    pub icon_emoji: Option<String>,
}

/// Serialized shape of a [`Payload`].
///
/// Slack's form-field API takes `attachments` as a JSON-encoded string rather
/// than a nested array, so the attachments are pre-encoded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePayload {
    pub username: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
}

impl Payload {
    /// Encode into the webhook shape.
    ///
    /// Fails only if a raw context/extra value cannot be encoded as JSON.
    pub fn to_wire(&self) -> Result<WirePayload> {
        let attachments = if self.attachments.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&self.attachments)?)
        };

        Ok(WirePayload {
            username: self.username.clone(),
            text: self.text.clone(),
            attachments,
            channel: self.channel.clone(),
            icon_emoji: self.icon_emoji.clone(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_wire()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_attachment() -> Attachment {
        Attachment {
            fallback: "boom".to_string(),
            color: AttachmentColor::Danger,
            title: "Message".to_string(),
            text: "boom".to_string(),
            fields: vec![Field::new("Level", "ERROR", true)],
        }
    }

    #[test]
    fn test_color_strings() {
        assert_eq!(AttachmentColor::Danger.as_str(), "danger");
        assert_eq!(AttachmentColor::Warning.as_str(), "warning");
        assert_eq!(AttachmentColor::Good.as_str(), "good");
        assert_eq!(AttachmentColor::Default.as_str(), "#e3e4e6");
        assert_eq!(
            serde_json::to_value(AttachmentColor::Default).unwrap(),
            json!("#e3e4e6")
        );
    }

    #[test]
    fn test_wire_encodes_attachments_as_string() {
        let payload = Payload {
            username: "Bot".to_string(),
            text: String::new(),
            attachments: vec![sample_attachment()],
            channel: Some("#ops".to_string()),
            icon_emoji: Some(":ghost:".to_string()),
        };

        let wire = serde_json::to_value(payload.to_wire().unwrap()).unwrap();
        let encoded = wire["attachments"].as_str().unwrap();
        let decoded: serde_json::Value = serde_json::from_str(encoded).unwrap();

        assert_eq!(wire["username"], json!("Bot"));
        assert_eq!(wire["text"], json!(""));
        assert_eq!(wire["channel"], json!("#ops"));
        assert_eq!(wire["icon_emoji"], json!(":ghost:"));
        assert_eq!(
            decoded,
            json!([{
                "fallback": "boom",
                "color": "danger",
                "title": "Message",
                "text": "boom",
                "fields": [{"title": "Level", "value": "ERROR", "short": true}]
            }])
        );
    }

    #[test]
    fn test_wire_omits_absent_fields() {
        let payload = Payload {
            username: "Monolog".to_string(),
            text: "plain".to_string(),
            attachments: Vec::new(),
            channel: None,
            icon_emoji: None,
        };

        let json = payload.to_json().unwrap();
        assert_eq!(json, r#"{"username":"Monolog","text":"plain"}"#);
    }
}
