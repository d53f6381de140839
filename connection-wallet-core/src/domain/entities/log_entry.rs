//! Activity log entry

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    #[default]
    Info,
    Error,
    Success,
    Tx,
    Block,
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogCategory::Info => "info",
            LogCategory::Error => "error",
            LogCategory::Success => "success",
            LogCategory::Tx => "tx",
            LogCategory::Block => "block",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub category: LogCategory,
}

impl LogEntry {
    pub fn new(text: impl Into<String>, category: LogCategory) -> Self {
        Self {
            timestamp: Utc::now(),
            text: text.into(),
            category,
        }
    }

    /// Local wall-clock time, `HH:MM:SS`
    pub fn time_label(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}
