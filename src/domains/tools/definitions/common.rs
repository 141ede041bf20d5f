//! Common utilities shared across Prometheus tools.
//!
//! Result envelopes, argument checks, list capping and value formatting.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::domains::tools::ToolError;

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Create a success result whose single text content is the JSON payload.
pub fn success_result(payload: &Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult::success(vec![Content::text(text)])
}

/// Create an error result tagged with the tool name.
pub fn error_result(tool: &str, message: &str) -> CallToolResult {
    warn!("Tool {} failed: {}", tool, message);
    let payload = json!({ "tool": tool, "error": message });
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult::error(vec![Content::text(text)])
}

/// Serialize a tool output.
pub fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(value)?)
}

/// Reject empty or whitespace-only strings.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{field}' must not be empty"))
    } else {
        Ok(())
    }
}

/// Reject values outside `min..=max`.
pub fn require_in_range(field: &str, value: usize, min: usize, max: usize) -> Result<(), String> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("'{field}' must be between {min} and {max}, got {value}"))
    }
}

/// Keep at most `limit` items; report whether anything was cut.
pub fn cap<T>(mut items: Vec<T>, limit: usize) -> (Vec<T>, bool) {
    let truncated = items.len() > limit;
    items.truncate(limit);
    (items, truncated)
}

/// Prometheus reports "no error" as an empty string; map that to `None`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Escape a value for use inside a double-quoted PromQL label matcher.
pub fn escape_label_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Human-readable byte size using binary (1024) units.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, BYTE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_073_741_824), "1 GB");
        assert_eq!(format_bytes(5 * 1_099_511_627_776), "5 TB");
        assert_eq!(format_bytes(2048 * 1_099_511_627_776), "2048 TB");
    }

    #[test]
    fn test_cap() {
        let (items, truncated) = cap(vec![1, 2, 3], 2);
        assert_eq!(items, vec![1, 2]);
        assert!(truncated);
        let (items, truncated) = cap(vec![1, 2], 2);
        assert_eq!(items.len(), 2);
        assert!(!truncated);
    }

    #[test]
    fn test_require_checks() {
        assert!(require_non_empty("query", "up").is_ok());
        assert!(require_non_empty("query", "  ").is_err());
        assert!(require_in_range("limit", 0, 1, 10).is_err());
        assert!(require_in_range("limit", 10, 1, 10).is_ok());
    }

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_label_value("host:9100"), "host:9100");
    }

    #[test]
    fn test_error_result_is_tagged() {
        let result = error_result("list_targets", "boom");
        assert_eq!(result.is_error, Some(true));
        if let RawContent::Text(text) = &result.content[0].raw {
            let payload: Value = serde_json::from_str(&text.text).unwrap();
            assert_eq!(payload["tool"], "list_targets");
            assert_eq!(payload["error"], "boom");
        } else {
            panic!("expected text content");
        }
    }
}
