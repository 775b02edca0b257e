//! Keyboard-wedge scan buffer
//!
//! A hardware scanner in keyboard-wedge mode "types" the barcode quickly and
//! finishes with Enter. The buffer tells a scanner burst apart from a human
//! typing by the gap between keys, and gives up on the whole scan after an
//! overall timeout. Time is passed in by the caller so both limits can be
//! exercised without real timers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Longest gap between two characters of one scanner burst
pub const DEFAULT_INTER_KEY_TIMEOUT: Duration = Duration::from_millis(100);

/// How long a scan session waits for a barcode
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(30);

/// A key event as seen by the listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    /// Modifiers, arrows, function keys
    Other,
}

impl Key {
    /// Map a DOM-style key name (`"a"`, `"Enter"`, `"Backspace"`, `"Shift"`)
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// What a finished scan produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    Success { barcode: String },
    Failure { error: String },
}

/// A delivered scan result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(flatten)]
    pub outcome: ScanOutcome,
    pub at: DateTime<Utc>,
}

impl ScanResult {
    pub fn success(barcode: impl Into<String>) -> Self {
        Self {
            outcome: ScanOutcome::Success {
                barcode: barcode.into(),
            },
            at: Utc::now(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            outcome: ScanOutcome::Failure {
                error: error.into(),
            },
            at: Utc::now(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::failure(format!(
            "Scan timeout - no barcode detected within {} seconds",
            after.as_secs()
        ))
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ScanOutcome::Success { .. })
    }

    pub fn barcode(&self) -> Option<&str> {
        match &self.outcome {
            ScanOutcome::Success { barcode } => Some(barcode),
            ScanOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ScanOutcome::Failure { error } => Some(error),
            ScanOutcome::Success { .. } => None,
        }
    }
}

/// Scan session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    /// Scanning, nothing buffered yet
    Awaiting { started_at: Instant },
    Buffering {
        buffer: String,
        last_key_at: Instant,
        started_at: Instant,
    },
}

/// The buffering state machine
#[derive(Debug, Clone)]
pub struct ScanBuffer {
    state: ScanState,
    inter_key_timeout: Duration,
    scan_timeout: Duration,
}

impl Default for ScanBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_INTER_KEY_TIMEOUT, DEFAULT_SCAN_TIMEOUT)
    }
}

impl ScanBuffer {
    pub fn new(inter_key_timeout: Duration, scan_timeout: Duration) -> Self {
        Self {
            state: ScanState::Idle,
            inter_key_timeout,
            scan_timeout,
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn scan_timeout(&self) -> Duration {
        self.scan_timeout
    }

    pub fn is_scanning(&self) -> bool {
        !matches!(self.state, ScanState::Idle)
    }

    /// Characters buffered so far
    pub fn buffered(&self) -> &str {
        match &self.state {
            ScanState::Buffering { buffer, .. } => buffer,
            _ => "",
        }
    }

    /// Begin (or restart) a scan session
    pub fn start(&mut self, now: Instant) {
        self.state = ScanState::Awaiting { started_at: now };
    }

    /// Drop back to idle, discarding anything buffered
    pub fn stop(&mut self) {
        self.state = ScanState::Idle;
    }

    /// Emit a timeout failure if the session has run past the scan timeout
    pub fn poll_timeout(&mut self, now: Instant) -> Option<ScanResult> {
        let started_at = match &self.state {
            ScanState::Idle => return None,
            ScanState::Awaiting { started_at } | ScanState::Buffering { started_at, .. } => {
                *started_at
            }
        };

        if now.saturating_duration_since(started_at) >= self.scan_timeout {
            self.state = ScanState::Idle;
            Some(ScanResult::timeout(self.scan_timeout))
        } else {
            None
        }
    }

    /// Feed one key. Returns a result when the key finished the scan.
    ///
    /// Keys are ignored while idle. A gap longer than the inter-key timeout
    /// discards the whole buffer before the new character is appended. Enter
    /// on an empty buffer is ignored and scanning continues.
    pub fn key(&mut self, key: Key, now: Instant) -> Option<ScanResult> {
        if let Some(timeout) = self.poll_timeout(now) {
            return Some(timeout);
        }

        let state = std::mem::replace(&mut self.state, ScanState::Idle);
        let (next, result) = match (state, key) {
            (ScanState::Idle, _) => (ScanState::Idle, None),

            (ScanState::Awaiting { started_at }, Key::Char(c)) => (
                ScanState::Buffering {
                    buffer: c.to_string(),
                    last_key_at: now,
                    started_at,
                },
                None,
            ),

            (
                ScanState::Buffering {
                    mut buffer,
                    last_key_at,
                    started_at,
                },
                Key::Char(c),
            ) => {
                if now.saturating_duration_since(last_key_at) > self.inter_key_timeout {
                    tracing::debug!(discarded = buffer.len(), "Inter-key gap exceeded, buffer reset");
                    buffer.clear();
                }
                buffer.push(c);
                (
                    ScanState::Buffering {
                        buffer,
                        last_key_at: now,
                        started_at,
                    },
                    None,
                )
            }

            (ScanState::Buffering { buffer, .. }, Key::Enter) if !buffer.is_empty() => {
                (ScanState::Idle, Some(ScanResult::success(buffer)))
            }

            (
                ScanState::Buffering {
                    mut buffer,
                    started_at,
                    ..
                },
                Key::Backspace,
            ) => {
                buffer.pop();
                if buffer.is_empty() {
                    (ScanState::Awaiting { started_at }, None)
                } else {
                    (
                        ScanState::Buffering {
                            buffer,
                            last_key_at: now,
                            started_at,
                        },
                        None,
                    )
                }
            }

            (ScanState::Buffering { started_at, .. }, Key::Enter) => {
                (ScanState::Awaiting { started_at }, None)
            }

            (state, _) => (state, None),
        };

        self.state = next;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn feed(buf: &mut ScanBuffer, keys: &str, start: Instant, step: Duration) -> (Option<ScanResult>, Instant) {
        let mut now = start;
        let mut last = None;
        for c in keys.chars() {
            now += step;
            let key = if c == '\n' { Key::Enter } else { Key::Char(c) };
            last = buf.key(key, now);
        }
        (last, now)
    }

    #[test]
    fn test_fast_burst_then_enter() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        let (result, _) = feed(&mut buf, "123\n", t0, ms(10));
        assert_eq!(result.unwrap().barcode(), Some("123"));
        assert!(!buf.is_scanning());
    }

    #[test]
    fn test_slow_gap_discards_whole_buffer() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        assert_eq!(buf.key(Key::Char('1'), t0), None);
        let (result, _) = feed(&mut buf, "23\n", t0 + ms(150), ms(10));
        assert_eq!(result.unwrap().barcode(), Some("23"));
    }

    #[test]
    fn test_gap_of_exactly_limit_keeps_buffer() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        buf.key(Key::Char('1'), t0);
        buf.key(Key::Char('2'), t0 + ms(100));
        assert_eq!(buf.buffered(), "12");
    }

    #[test]
    fn test_keys_ignored_while_idle() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        let (result, _) = feed(&mut buf, "123\n", t0, ms(10));
        assert_eq!(result, None);
        assert_eq!(buf.state(), &ScanState::Idle);
    }

    #[test]
    fn test_stop_before_enter_suppresses_result() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        let (_, now) = feed(&mut buf, "123", t0, ms(10));
        buf.stop();
        assert_eq!(buf.key(Key::Enter, now + ms(10)), None);
    }

    #[test]
    fn test_empty_enter_is_ignored() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        assert_eq!(buf.key(Key::Enter, t0 + ms(5)), None);
        assert!(buf.is_scanning());
        let (result, _) = feed(&mut buf, "9\n", t0 + ms(5), ms(5));
        assert_eq!(result.unwrap().barcode(), Some("9"));
    }

    #[test]
    fn test_enter_emits_buffer_verbatim() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        let (result, _) = feed(&mut buf, " 0123 \n", t0, ms(5));
        assert_eq!(result.unwrap().barcode(), Some(" 0123 "));
    }

    #[test]
    fn test_backspace_trims() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        let (_, now) = feed(&mut buf, "124", t0, ms(10));
        buf.key(Key::Backspace, now + ms(10));
        assert_eq!(buf.buffered(), "12");
        let (result, _) = feed(&mut buf, "3\n", now + ms(10), ms(10));
        assert_eq!(result.unwrap().barcode(), Some("123"));
    }

    #[test]
    fn test_backspace_to_empty_returns_to_awaiting() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        buf.key(Key::Char('1'), t0);
        buf.key(Key::Backspace, t0 + ms(10));
        assert_eq!(buf.state(), &ScanState::Awaiting { started_at: t0 });
    }

    #[test]
    fn test_overall_timeout() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        assert_eq!(buf.poll_timeout(t0 + Duration::from_secs(29)), None);
        let result = buf.poll_timeout(t0 + Duration::from_secs(30)).unwrap();
        assert!(!result.is_success());
        assert!(result.error().unwrap().starts_with("Scan timeout"));
        assert!(!buf.is_scanning());
    }

    #[test]
    fn test_key_after_timeout_reports_timeout() {
        let mut buf = ScanBuffer::new(ms(100), ms(500));
        let t0 = Instant::now();
        buf.start(t0);
        let result = buf.key(Key::Char('1'), t0 + ms(600)).unwrap();
        assert!(result.error().is_some());
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut buf = ScanBuffer::default();
        let t0 = Instant::now();
        buf.start(t0);
        buf.key(Key::Char('A'), t0);
        buf.key(Key::from_name("Shift"), t0 + ms(5));
        buf.key(Key::from_name("b"), t0 + ms(10));
        assert_eq!(buf.buffered(), "Ab");
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name("Backspace"), Key::Backspace);
    }

    #[test]
    fn test_result_serializes_tagged() {
        let value = serde_json::to_value(ScanResult::success("42")).unwrap();
        assert_eq!(value["kind"], "success");
        assert_eq!(value["barcode"], "42");
    }
}
