//! Toast notifications
//!
//! A bounded queue of short-lived success and error messages. Every failed
//! backend call ends up here through [`ToastQueue::report_error`].

use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    /// Icon shown next to the message
    pub fn icon(self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✕",
            ToastLevel::Warning => "⚠",
            ToastLevel::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: Instant,
}

/// Queue settings (`[toast]` in the config file)
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_lifetime")]
    pub lifetime_ms: u64,

    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

fn default_lifetime() -> u64 {
    5000
}

fn default_max_visible() -> usize {
    5
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            lifetime_ms: default_lifetime(),
            max_visible: default_max_visible(),
        }
    }
}

#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    next_id: u64,
    lifetime: Duration,
    max_visible: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(&ToastConfig::default())
    }
}

impl ToastQueue {
    pub fn new(config: &ToastConfig) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 1,
            lifetime: Duration::from_millis(config.lifetime_ms),
            max_visible: config.max_visible.max(1),
        }
    }

    /// Add a toast, evicting the oldest when full. Returns its id.
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.toasts.len() == self.max_visible {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            id,
            level,
            message: message.into(),
            created_at: Instant::now(),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Error, message)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Warning, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Info, message)
    }

    /// Log a failed call and show the backend's message (or `fallback`)
    pub fn report_error(&mut self, err: &ApiError, fallback: &str) -> String {
        let message = err.user_message(fallback);
        tracing::error!(error = %err, status = ?err.status(), "{}", fallback);
        self.error(message.clone());
        message
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Toasts still visible at `now`; expired ones are dropped
    pub fn active(&mut self, now: Instant) -> impl Iterator<Item = &Toast> {
        let lifetime = self.lifetime;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created_at) < lifetime);
        self.toasts.iter()
    }

    /// Remove and return everything queued, oldest first
    pub fn drain(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    pub fn last(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
