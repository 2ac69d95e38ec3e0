//! Operator notifications
//!
//! The controller reports outcomes through a [`Notifier`] instead of
//! printing or popping dialogs itself. Each failure is reported once.

use std::sync::Mutex;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

/// Sink for operator notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices for a terminal operator and mirrors them to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => {
                tracing::debug!(target: "notice", "{}", notice.message);
                println!("✔ {}", notice.message);
            }
            NoticeLevel::Error => {
                tracing::debug!(target: "notice", "{}", notice.message);
                eprintln!("✖ {}", notice.message);
            }
        }
    }
}

/// Keeps every notice in memory, oldest first
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far
    pub fn drain(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut guard) => guard.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_log_drains_in_order() {
        let log = NoticeLog::new();
        log.notify(Notice::success("saved"));
        log.notify(Notice::error("boom"));

        let notices = log.drain();
        assert_eq!(notices, vec![Notice::success("saved"), Notice::error("boom")]);
        assert!(notices[1].is_error());
        assert!(log.drain().is_empty());
    }
}
