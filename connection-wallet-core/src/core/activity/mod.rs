//! Bounded activity log
//!
//! Keeps the most recent entries (oldest evicted first) and publishes the
//! latest message as a single "current status" value. Both are exposed as
//! `watch` channels so a UI can re-render on change.

use std::collections::VecDeque;
use tokio::sync::watch;

use crate::domain::entities::{LogCategory, LogEntry};
use crate::shared::constants::{CLEARED_STATUS, INITIAL_STATUS, LOG_CAPACITY};

pub struct BoundedLog {
    capacity: usize,
    entries: watch::Sender<VecDeque<LogEntry>>,
    status: watch::Sender<String>,
}

impl BoundedLog {
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (entries, _) = watch::channel(VecDeque::with_capacity(capacity));
        let (status, _) = watch::channel(INITIAL_STATUS.to_string());
        Self {
            capacity,
            entries,
            status,
        }
    }

    /// Append an entry, evicting from the front past capacity
    pub fn append(&self, text: impl Into<String>, category: LogCategory) {
        let entry = LogEntry::new(text, category);

        match category {
            LogCategory::Error => log::error!("{}", entry.text),
            _ => log::info!("[{}] {}", category, entry.text),
        }

        let status = entry.text.clone();
        let capacity = self.capacity;
        self.entries.send_modify(|entries| {
            entries.push_back(entry);
            while entries.len() > capacity {
                entries.pop_front();
            }
        });
        self.status.send_replace(status);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.append(text, LogCategory::Info);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.append(text, LogCategory::Error);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.append(text, LogCategory::Success);
    }

    pub fn tx(&self, text: impl Into<String>) {
        self.append(text, LogCategory::Tx);
    }

    pub fn block(&self, text: impl Into<String>) {
        self.append(text, LogCategory::Block);
    }

    pub fn clear(&self) {
        self.entries.send_modify(|entries| entries.clear());
        self.status.send_replace(CLEARED_STATUS.to_string());
    }

    /// Snapshot, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<LogEntry> {
        self.entries.borrow().back().cloned()
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe_entries(&self) -> watch::Receiver<VecDeque<LogEntry>> {
        self.entries.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }
}

impl Default for BoundedLog {
    fn default() -> Self {
        Self::new()
    }
}
