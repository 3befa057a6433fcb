//! Single transient user-facing message.

use std::time::{Duration, Instant};

/// How long a notice stays up before it dismisses itself.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_secs(3);

/// Identifies one `notify` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoticeHandle(u64);

/// The notice currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub handle: NoticeHandle,
    pub message: String,
    pub expires_at: Instant,
}

/// Shows at most one notice at a time; the newest always wins.
///
/// A new notice replaces the current one outright, so rapid calls never
/// queue up. Dismissals carry the handle they were scheduled for, which
/// makes a late timer from a replaced notice harmless.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    current: Option<Notice>,
    next_handle: u64,
    duration: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_NOTICE_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            current: None,
            next_handle: 0,
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Replaces the current notice with `message`.
    pub fn notify(&mut self, message: impl Into<String>) -> NoticeHandle {
        self.notify_at(message, Instant::now())
    }

    /// Like `notify`, with an explicit clock reading.
    pub fn notify_at(&mut self, message: impl Into<String>, now: Instant) -> NoticeHandle {
        self.next_handle += 1;
        let handle = NoticeHandle(self.next_handle);
        let message = message.into();
        tracing::debug!(%message, "notice shown");
        self.current = Some(Notice {
            handle,
            message,
            expires_at: now + self.duration,
        });
        handle
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Dismisses the notice if `handle` is still the one showing.
    pub fn dismiss(&mut self, handle: NoticeHandle) -> bool {
        if self.current.as_ref().is_some_and(|n| n.handle == handle) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Dismisses the current notice once its time is up.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
