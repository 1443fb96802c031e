//! Transient notices ("toasts") shown after CRUD operations

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Bounded queue; the oldest notice is dropped when full
#[derive(Debug, Clone)]
pub struct Notifications {
    notices: Vec<Notice>,
    capacity: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_capacity(5)
    }
}

impl Notifications {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notices: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        if self.notices.len() == self.capacity {
            self.notices.remove(0);
        }
        self.notices.push(Notice {
            level,
            message,
            created_at: Utc::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Remove and return everything queued so far
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oldest_notice_is_dropped() {
        let mut notifications = Notifications::with_capacity(2);
        notifications.success("one");
        notifications.error("two");
        notifications.success("three");

        let messages: Vec<_> = notifications
            .notices()
            .iter()
            .map(|n| n.message.as_str())
            .collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert_eq!(notifications.latest().map(|n| n.level), Some(NoticeLevel::Success));

        assert_eq!(notifications.drain().len(), 2);
        assert!(notifications.notices().is_empty());
    }
}
