//! Session notices
//!
//! A session shows at most one message at a time. Setting a message replaces
//! the previous one. Transient messages carry the logical time at which they
//! expire; because the expiry belongs to the message itself, an older
//! message's expiry can never clear a newer message.
//!
//! Time is logical: the host advances the clock (in milliseconds) and the
//! notices react. No timers are involved.

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    /// Logical time at which the notice disappears; `None` means it stays
    pub expires_at: Option<u64>,
}

/// Current message plus the session's logical clock
#[derive(Debug, Default)]
pub struct Notices {
    now: u64,
    current: Option<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Moves the clock forward, dropping the current notice if it expired
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now = self.now.saturating_add(elapsed_ms);
        if self
            .current
            .as_ref()
            .and_then(|n| n.expires_at)
            .is_some_and(|at| at <= self.now)
        {
            self.current = None;
        }
    }

    /// Sets a notice that stays until replaced or cleared
    pub fn set(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.current = Some(Notice {
            text: text.into(),
            level,
            expires_at: None,
        });
    }

    /// Sets a notice that clears itself after `ttl_ms`
    pub fn set_transient(&mut self, level: NoticeLevel, text: impl Into<String>, ttl_ms: u64) {
        self.current = Some(Notice {
            text: text.into(),
            level,
            expires_at: Some(self.now.saturating_add(ttl_ms)),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set(NoticeLevel::Error, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.set(NoticeLevel::Warning, text);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|n| n.expires_at.is_none_or(|at| at > self.now))
    }

    /// Current notice text if it is an error
    pub fn error_text(&self) -> Option<&str> {
        self.current()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.text.as_str())
    }
}
