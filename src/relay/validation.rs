//! Payload validation, XP tables and the broadcast message format.
//!
//! Everything here is pure so the HTTP layer stays a thin shell.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::events::XpGrant;

pub static VALID_EVENT_TYPES: [&str; 11] = [
    "message",
    "tool_use",
    "task_complete",
    "response",
    "claude_code",
    "codex_cli",
    "gemini_cli",
    "cursor_ai",
    "copilot",
    "activity",
    "unknown",
];

pub static VALID_SOURCES: [&str; 6] = ["claude", "codex", "gemini", "cursor", "copilot", "unknown"];

pub const MAX_TYPE_CHARS: usize = 32;
pub const MAX_SOURCE_CHARS: usize = 16;
pub const MAX_TOOL_CHARS: usize = 32;

/// XP for an event type missing from [`EVENT_XP`].
pub const DEFAULT_EVENT_XP: u64 = 5;
/// XP for a `/cli/:source` ping with no dedicated entry.
pub const DEFAULT_CLI_XP: u64 = 10;

pub const EDIT_TOOL_XP: u64 = 15;
pub const BASH_TOOL_XP: u64 = 10;

pub static EVENT_XP: [(&str, u64); 9] = [
    ("message", 10),
    ("tool_use", 5),
    ("task_complete", 50),
    ("response", 5),
    ("claude_code", 15),
    ("codex_cli", 12),
    ("gemini_cli", 12),
    ("cursor_ai", 10),
    ("copilot", 8),
];

/// Display name and color for an activity source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

/// Last entry is the fallback.
pub static SOURCE_INFO: [SourceInfo; 6] = [
    SourceInfo { id: "claude", name: "CLAUDE", color: "#00ffff" },
    SourceInfo { id: "codex", name: "CODEX", color: "#00ff88" },
    SourceInfo { id: "gemini", name: "GEMINI", color: "#4488ff" },
    SourceInfo { id: "cursor", name: "CURSOR", color: "#ff88ff" },
    SourceInfo { id: "copilot", name: "COPILOT", color: "#ffaa00" },
    SourceInfo { id: "unknown", name: "CODE", color: "#ffffff" },
];

/// Rejection of an incoming request. Maps to a 4xx status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Body must be a JSON object")]
    NotAnObject,

    #[error("Invalid JSON body")]
    MalformedJson,

    #[error("Invalid event type: {0}")]
    InvalidEventType(String),

    #[error("Invalid source: {0}")]
    InvalidSource(String),

    #[error("Unknown CLI source")]
    UnknownCliSource,

    #[error("Request body too large")]
    BodyTooLarge,
}

impl ValidationError {
    pub fn status(&self) -> u16 {
        match self {
            ValidationError::BodyTooLarge => 413,
            _ => 400,
        }
    }
}

/// A sanitized `/event` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    pub event_type: String,
    pub source: String,
    pub tool: Option<String>,
}

impl ValidatedEvent {
    pub fn xp(&self) -> u64 {
        xp_for_event(&self.event_type, &self.source, self.tool.as_deref())
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str, max: usize) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(|s| truncate_chars(s, max))
}

/// Truncates then allowlist-checks `type` and `source`; missing or
/// non-string values become `"unknown"`. `data.tool` is kept only when it
/// is a string.
pub fn validate_event(body: &Value) -> Result<ValidatedEvent, ValidationError> {
    let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

    let event_type =
        string_field(obj, "type", MAX_TYPE_CHARS).unwrap_or_else(|| "unknown".to_string());
    let source =
        string_field(obj, "source", MAX_SOURCE_CHARS).unwrap_or_else(|| "unknown".to_string());

    if !VALID_EVENT_TYPES.contains(&event_type.as_str()) {
        return Err(ValidationError::InvalidEventType(event_type));
    }
    if !VALID_SOURCES.contains(&source.as_str()) {
        return Err(ValidationError::InvalidSource(source));
    }

    let tool = obj
        .get("data")
        .and_then(Value::as_object)
        .and_then(|data| string_field(data, "tool", MAX_TOOL_CHARS));

    Ok(ValidatedEvent {
        event_type,
        source,
        tool,
    })
}

/// Parses and validates a raw request body.
pub fn parse_event(body: &[u8]) -> Result<ValidatedEvent, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ValidationError::MalformedJson)?;
    validate_event(&value)
}

fn event_base_xp(event_type: &str) -> Option<u64> {
    EVENT_XP
        .iter()
        .find(|(t, _)| *t == event_type)
        .map(|(_, xp)| *xp)
}

/// XP awarded for a validated event.
///
/// Base value by type, replaced by the source's own rate when the source is
/// a known CLI, then replaced again by the tool bonus for `tool_use`. A
/// tool matching both Bash and Edit/Write gets the Bash value.
pub fn xp_for_event(event_type: &str, source: &str, tool: Option<&str>) -> u64 {
    let mut xp = event_base_xp(event_type).unwrap_or(DEFAULT_EVENT_XP);

    let source_rate = match source {
        "claude" => event_base_xp("claude_code"),
        "codex" => event_base_xp("codex_cli"),
        "gemini" => event_base_xp("gemini_cli"),
        "cursor" => event_base_xp("cursor_ai"),
        "copilot" => event_base_xp("copilot"),
        _ => None,
    };
    if let Some(rate) = source_rate {
        xp = rate;
    }

    if event_type == "tool_use" {
        if let Some(tool) = tool {
            if tool.contains("Edit") || tool.contains("Write") {
                xp = EDIT_TOOL_XP;
            }
            if tool.contains("Bash") {
                xp = BASH_TOOL_XP;
            }
        }
    }
    xp
}

/// XP for a `/cli/:source` ping: `<source>_code`, then `<source>_cli`,
/// then [`DEFAULT_CLI_XP`].
pub fn cli_xp(source: &str) -> u64 {
    event_base_xp(&format!("{}_code", source))
        .or_else(|| event_base_xp(&format!("{}_cli", source)))
        .unwrap_or(DEFAULT_CLI_XP)
}

pub fn is_known_source(source: &str) -> bool {
    SOURCE_INFO.iter().any(|s| s.id == source)
}

pub fn source_info(source: &str) -> &'static SourceInfo {
    SOURCE_INFO
        .iter()
        .find(|s| s.id == source)
        .unwrap_or(&SOURCE_INFO[SOURCE_INFO.len() - 1])
}

/// Action name for a CLI ping; anything not allowlisted becomes `"activity"`.
pub fn cli_action(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|v| v.get("action"))
        .and_then(Value::as_str)
        .map(|s| truncate_chars(s, MAX_TYPE_CHARS))
        .filter(|s| VALID_EVENT_TYPES.contains(&s.as_str()))
        .unwrap_or_else(|| "activity".to_string())
}

/// Headers attached to every relay response.
pub fn secure_headers(allowed_origin: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Access-Control-Allow-Origin", allowed_origin.to_string()),
        ("Access-Control-Allow-Methods", "POST, OPTIONS".to_string()),
        ("Access-Control-Allow-Headers", "Content-Type".to_string()),
        ("X-Content-Type-Options", "nosniff".to_string()),
        ("X-Frame-Options", "DENY".to_string()),
        ("Referrer-Policy", "no-referrer".to_string()),
        ("Content-Type", "application/json".to_string()),
    ]
}

fn default_source_name() -> String {
    "CODE".to_string()
}

fn default_source_color() -> String {
    "#ffffff".to_string()
}

/// Message pushed to every WebSocket subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpBroadcast {
    #[serde(rename = "type")]
    pub event_type: String,
    pub amount: u64,
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_source_name")]
    pub source_name: String,
    #[serde(default = "default_source_color")]
    pub source_color: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl XpBroadcast {
    pub fn new(event_type: &str, amount: u64, source: &str, timestamp: i64) -> Self {
        let info = source_info(source);
        Self {
            event_type: event_type.to_string(),
            amount,
            source: source.to_string(),
            source_name: info.name.to_string(),
            source_color: info.color.to_string(),
            timestamp,
        }
    }

    pub fn now(event_type: &str, amount: u64, source: &str) -> Self {
        Self::new(event_type, amount, source, chrono::Utc::now().timestamp_millis())
    }

    pub fn to_grant(&self) -> XpGrant {
        XpGrant {
            xp_amount: self.amount,
            source_label: self.source_name.clone(),
        }
    }
}
