//! Single-line rendering of context/extra data

use crate::record::Fields;
use serde_json::Value;

const NULL_TOKEN: &str = "NULL";
const SEPARATOR: &str = " | ";

/// Renders values the way single-line log output does, so a collapsed
/// "Context" field reads exactly like the log line it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueStringifier;

impl ValueStringifier {
    pub fn new() -> Self {
        Self
    }

    /// `key: value | key: value`, without a trailing separator
    pub fn stringify(&self, fields: &Fields) -> String {
        let mut line = String::new();
        for (key, value) in fields {
            line.push_str(key);
            line.push_str(": ");
            line.push_str(&self.stringify_value(value));
            line.push_str(SEPARATOR);
        }

        line.trim_end_matches([' ', '|']).to_string()
    }

    pub fn stringify_value(&self, value: &Value) -> String {
        let rendered = match value {
            Value::Null => NULL_TOKEN.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(_) | Value::Object(_) => value.to_string(),
        };

        replace_newlines(&rendered)
    }
}

fn replace_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(ValueStringifier::new().stringify(&Fields::new()), "");
    }

    #[test]
    fn test_scalars() {
        let line = ValueStringifier::new().stringify(&fields(json!({"a": 1, "b": "x"})));
        assert_eq!(line, "a: 1 | b: x");
    }

    #[test]
    fn test_null_bool_and_float() {
        let line = ValueStringifier::new().stringify(&fields(json!({
            "missing": null,
            "ok": true,
            "ratio": 0.25
        })));
        assert_eq!(line, "missing: NULL | ok: true | ratio: 0.25");
    }

    #[test]
    fn test_nested_values_render_as_compact_json() {
        let line = ValueStringifier::new().stringify(&fields(json!({
            "tags": ["a", "b"],
            "user": {"id": 7, "url": "http://x/y"}
        })));
        assert_eq!(
            line,
            r#"tags: ["a","b"] | user: {"id":7,"url":"http://x/y"}"#
        );
    }

    #[test]
    fn test_newlines_are_flattened() {
        let value = json!("line one\nline two\r\nline three");
        assert_eq!(
            ValueStringifier::new().stringify_value(&value),
            "line one line two line three"
        );
    }

    #[test]
    fn test_preserves_key_order() {
        let mut map = Fields::new();
        map.insert("zulu".to_string(), json!(1));
        map.insert("alpha".to_string(), json!(2));
        assert_eq!(ValueStringifier::new().stringify(&map), "zulu: 1 | alpha: 2");
    }

    #[test]
    fn test_trailing_pipes_and_spaces_are_trimmed() {
        let line = ValueStringifier::new().stringify(&fields(json!({"a": "pipe |", "b": " "})));
        assert_eq!(line, "a: pipe | | b:");
    }
}
