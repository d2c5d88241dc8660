use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::output::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    posted_at: Instant,
    timeout: Duration,
}

impl Notice {
    fn expired(&self, now: Instant) -> bool {
        !self.timeout.is_zero() && now.duration_since(self.posted_at) >= self.timeout
    }
}

/// Transient notices reporting the outcome of list and profile operations.
/// Holds at most `max_visible` notices; pushing past the cap evicts the
/// oldest first. Timed notices expire on `sweep`; manual dismissal works
/// regardless of the timer.
pub struct NotificationCenter {
    notices: VecDeque<Notice>,
    max_visible: usize,
    default_timeout: Duration,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new(max_visible: usize, default_timeout: Duration) -> Self {
        Self {
            notices: VecDeque::new(),
            max_visible: max_visible.max(1),
            default_timeout,
            next_id: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NoticeKind) -> u64 {
        self.push_with_timeout(message, kind, self.default_timeout)
    }

    /// A zero timeout means the notice stays until dismissed.
    pub fn push_with_timeout(
        &mut self,
        message: impl Into<String>,
        kind: NoticeKind,
        timeout: Duration,
    ) -> u64 {
        while self.notices.len() >= self.max_visible {
            self.notices.pop_front();
        }
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push_back(Notice {
            id,
            message: message.into(),
            kind,
            posted_at: Instant::now(),
            timeout,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Error)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Info)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Drop every notice whose timeout has elapsed at `now`.
    pub fn sweep(&mut self, now: Instant) {
        self.notices.retain(|n| !n.expired(now));
    }

    /// Manual close; succeeds for any live notice whatever its timer says.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn clear_all(&mut self) {
        self.notices.clear();
    }

    /// Render everything currently visible and drop it. One-shot commands
    /// call this once at the end; watch mode renders per tick instead.
    pub fn flush(&mut self, output: &Output) {
        for notice in self.notices.drain(..) {
            match notice.kind {
                NoticeKind::Success => output.success(&notice.message),
                NoticeKind::Error => output.error(&notice.message),
                NoticeKind::Warning => output.warn(&notice.message),
                NoticeKind::Info => output.info(&notice.message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> NotificationCenter {
        NotificationCenter::new(3, Duration::from_millis(3000))
    }

    #[test]
    fn test_oldest_evicted_first_beyond_cap() {
        let mut c = center();
        let first = c.success("one");
        c.success("two");
        c.success("three");
        c.success("four");

        assert_eq!(c.len(), 3);
        let messages: Vec<&str> = c.visible().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three", "four"]);
        // The evicted notice can no longer be dismissed
        assert!(!c.dismiss(first));
    }

    #[test]
    fn test_sweep_expires_timed_notices_only() {
        let mut c = center();
        c.push_with_timeout("timed", NoticeKind::Info, Duration::from_millis(1));
        c.push_with_timeout("sticky", NoticeKind::Info, Duration::ZERO);

        let later = Instant::now() + Duration::from_millis(50);
        c.sweep(later);

        let messages: Vec<&str> = c.visible().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["sticky"]);
    }

    #[test]
    fn test_manual_dismiss_ignores_timer() {
        let mut c = center();
        let id = c.push_with_timeout("sticky", NoticeKind::Error, Duration::ZERO);
        assert!(c.dismiss(id));
        assert!(c.is_empty());
        assert!(!c.dismiss(id));
    }

    #[test]
    fn test_clear_all_removes_everything_immediately() {
        let mut c = center();
        c.success("a");
        c.error("b");
        c.clear_all();
        assert!(c.is_empty());
    }
}
