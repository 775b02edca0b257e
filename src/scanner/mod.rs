//! Barcode Scanner
//!
//! Keyboard-wedge scanner support: a timestamp-driven buffering state
//! machine ([`ScanBuffer`]) and an async service ([`ScannerService`]) that
//! arms the overall timeout and publishes results to subscribers.

mod buffer;
mod service;

pub use buffer::{
    Key, ScanBuffer, ScanOutcome, ScanResult, ScanState, DEFAULT_INTER_KEY_TIMEOUT,
    DEFAULT_SCAN_TIMEOUT,
};
pub use service::{ScannerError, ScannerService};

use serde::Deserialize;
use std::time::Duration;

/// Scanner settings (`[scanner]` in the config file)
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Allow simulated scans
    #[serde(default = "default_test_mode")]
    pub test_mode: bool,

    #[serde(default = "default_scan_timeout")]
    pub scan_timeout_ms: u64,

    #[serde(default = "default_inter_key_timeout")]
    pub inter_key_timeout_ms: u64,
}

fn default_test_mode() -> bool {
    true
}

fn default_scan_timeout() -> u64 {
    30_000
}

fn default_inter_key_timeout() -> u64 {
    100
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            test_mode: default_test_mode(),
            scan_timeout_ms: default_scan_timeout(),
            inter_key_timeout_ms: default_inter_key_timeout(),
        }
    }
}

impl ScannerConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    pub fn inter_key_timeout(&self) -> Duration {
        Duration::from_millis(self.inter_key_timeout_ms)
    }
}
