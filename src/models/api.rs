//! Response envelopes shared by every backend endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::UNKNOWN_ERROR;

/// Standard `{data, message?, errors?}` wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Paginated payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
        }
    }
}

/// A user-facing message: one line, or one line per backend error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormMessage {
    Single(String),
    Many(Vec<String>),
}

impl FormMessage {
    /// Lines to render, in order.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Single(line) => vec![line.as_str()],
            Self::Many(lines) => lines.iter().map(String::as_str).collect(),
        }
    }

    /// Extract a message from an error response body.
    ///
    /// Lookup order: `data.errors`, `errors`, `message`, bare JSON string,
    /// raw text.
    pub fn from_error_body(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let text = text.trim();

        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return if text.is_empty() {
                Self::Single(UNKNOWN_ERROR.to_string())
            } else {
                Self::Single(text.to_string())
            };
        };

        if let Some(lines) = value
            .get("data")
            .and_then(|d| d.get("errors"))
            .and_then(string_list)
        {
            return Self::Many(lines);
        }
        if let Some(lines) = value.get("errors").and_then(string_list) {
            return Self::Many(lines);
        }
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            if !message.trim().is_empty() {
                return Self::Single(message.to_string());
            }
        }
        if let Some(message) = value.as_str() {
            if !message.trim().is_empty() {
                return Self::Single(message.to_string());
            }
        }

        Self::Single(UNKNOWN_ERROR.to_string())
    }
}

impl fmt::Display for FormMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    let items = value.as_array()?;
    let lines: Vec<String> = items
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    (!lines.is_empty()).then_some(lines)
}
