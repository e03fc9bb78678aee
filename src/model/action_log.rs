use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    #[serde(default)]
    pub greenhouse_code: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub action: String,
    /// Rule id or `manual`.
    #[serde(default)]
    pub reason: Option<String>,
}

impl fmt::Display for ActionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.timestamp {
            Some(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S"))?,
            None => f.write_str("-")?,
        }
        write!(f, "  {}  {}", self.action, self.reason.as_deref().unwrap_or("-"))
    }
}

/// Response of the action-log endpoint.
///
/// The backend answers either with a bare array or with a page envelope.
/// The shape is decided here, once, when the body is decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LogPage {
    Entries(Vec<ActionLogEntry>),
    Envelope {
        content: Vec<ActionLogEntry>,
        #[serde(rename = "totalPages", default)]
        total_pages: Option<u32>,
    },
}

impl LogPage {
    pub fn entries(&self) -> &[ActionLogEntry] {
        match self {
            LogPage::Entries(entries) => entries,
            LogPage::Envelope { content, .. } => content,
        }
    }

    /// Exact page count, when the backend reported one.
    pub fn total_pages(&self) -> Option<u32> {
        match self {
            LogPage::Entries(_) => None,
            LogPage::Envelope { total_pages, .. } => *total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_array() {
        let page: LogPage = serde_json::from_str(
            r#"[{"timestamp":"2024-05-01T10:00:00Z","action":"VENT_OPEN","reason":"manual"}]"#,
        )
        .unwrap();
        assert!(matches!(page, LogPage::Entries(_)));
        assert_eq!(page.entries().len(), 1);
        assert_eq!(page.total_pages(), None);
    }

    #[test]
    fn test_decode_empty_array() {
        let page: LogPage = serde_json::from_str("[]").unwrap();
        assert_eq!(page, LogPage::Entries(vec![]));
    }

    #[test]
    fn test_decode_page_envelope() {
        let page: LogPage = serde_json::from_str(
            r#"{"content":[{"action":"IRRIGATION_ON","reason":"rule-7"}],
                "totalPages":4,"totalElements":61,"number":0,"size":20}"#,
        )
        .unwrap();
        assert_eq!(page.total_pages(), Some(4));
        assert_eq!(page.entries()[0].action, "IRRIGATION_ON");
        assert_eq!(page.entries()[0].reason.as_deref(), Some("rule-7"));
    }

    #[test]
    fn test_decode_envelope_without_total() {
        let page: LogPage = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(page, LogPage::Envelope { .. }));
        assert_eq!(page.total_pages(), None);
    }

    #[test]
    fn test_entry_display() {
        let entry: ActionLogEntry = serde_json::from_str(
            r#"{"timestamp":"2024-05-01T10:00:00Z","action":"VENT_OPEN","reason":"manual"}"#,
        )
        .unwrap();
        assert_eq!(entry.to_string(), "2024-05-01 10:00:00  VENT_OPEN  manual");

        let bare = ActionLogEntry {
            greenhouse_code: None,
            timestamp: None,
            action: "LIGHT_ON".into(),
            reason: None,
        };
        assert_eq!(bare.to_string(), "-  LIGHT_ON  -");
    }
}
