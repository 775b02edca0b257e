//! Scanner service
//!
//! Wraps [`ScanBuffer`] with a real overall timer and a latest-value channel
//! that consumers subscribe to for the duration of one scan session.

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::buffer::{Key, ScanBuffer, ScanResult};
use super::ScannerConfig;

/// Errors from the scanner service
#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("Simulated scans are only available in test mode")]
    TestModeDisabled,
}

struct Inner {
    buffer: ScanBuffer,
    timeout_task: Option<JoinHandle<()>>,
    /// Bumped on every start so a stale timer cannot end a newer session
    session: u64,
}

/// Keyboard-wedge scanner listener
///
/// Clones share the same session and channel.
#[derive(Clone)]
pub struct ScannerService {
    inner: Arc<Mutex<Inner>>,
    results: Arc<watch::Sender<Option<ScanResult>>>,
    config: ScannerConfig,
}

impl ScannerService {
    pub fn new(config: ScannerConfig) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                buffer: ScanBuffer::new(config.inter_key_timeout(), config.scan_timeout()),
                timeout_task: None,
                session: 0,
            })),
            results: Arc::new(tx),
            config,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Receive scan results; the current value is `None` until a scan finishes
    pub fn subscribe(&self) -> watch::Receiver<Option<ScanResult>> {
        self.results.subscribe()
    }

    /// Latest delivered result, if any
    pub fn latest(&self) -> Option<ScanResult> {
        self.results.borrow().clone()
    }

    pub async fn is_scanning(&self) -> bool {
        self.inner.lock().await.buffer.is_scanning()
    }

    /// Start a scan session and arm the overall timeout.
    ///
    /// Starting while already scanning restarts the session.
    pub async fn start_scanning(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(task) = inner.timeout_task.take() {
            task.abort();
        }
        inner.session += 1;
        inner.buffer.start(Instant::now());
        self.results.send_replace(None);

        let session = inner.session;
        let timeout = inner.buffer.scan_timeout();
        let shared = Arc::clone(&self.inner);
        let results = Arc::clone(&self.results);
        inner.timeout_task = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut inner = shared.lock().await;
            if inner.session != session || !inner.buffer.is_scanning() {
                return;
            }
            inner.buffer.stop();
            inner.timeout_task = None;
            tracing::warn!(timeout_secs = timeout.as_secs(), "Scan timed out");
            results.send_replace(Some(ScanResult::timeout(timeout)));
        }));

        tracing::info!(session, "Scanning started");
    }

    /// Force the listener back to idle, cancel the timer and clear any result
    pub async fn stop_scanning(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(task) = inner.timeout_task.take() {
            task.abort();
        }
        inner.buffer.stop();
        self.results.send_replace(None);
        tracing::debug!(session = inner.session, "Scanning stopped");
    }

    /// Feed one key event. Returns the result if this key finished the scan.
    pub async fn handle_key(&self, key: Key) -> Option<ScanResult> {
        let mut inner = self.inner.lock().await;
        let result = inner.buffer.key(key, Instant::now())?;

        if let Some(task) = inner.timeout_task.take() {
            task.abort();
        }
        match result.barcode() {
            Some(barcode) => tracing::info!(barcode, "Barcode scanned"),
            None => tracing::warn!(error = result.error().unwrap_or_default(), "Scan failed"),
        }
        self.results.send_replace(Some(result.clone()));
        Some(result)
    }

    /// Feed a whole string as a fast burst followed by Enter.
    ///
    /// Control characters (a CRLF line's `\r`) are not keystrokes and are
    /// skipped; everything else reaches the barcode unchanged.
    pub async fn type_burst(&self, text: &str) -> Option<ScanResult> {
        for c in text.chars().filter(|c| !c.is_control()) {
            if let Some(result) = self.handle_key(Key::Char(c)).await {
                return Some(result);
            }
        }
        self.handle_key(Key::Enter).await
    }

    // ============================================
    // Test mode
    // ============================================

    /// Deliver a successful scan without key events
    pub async fn simulate_scan(&self, barcode: &str) -> Result<ScanResult, ScannerError> {
        self.deliver_simulated(ScanResult::success(barcode.trim())).await
    }

    /// Deliver a random 12-digit barcode
    pub async fn simulate_random_scan(&self) -> Result<ScanResult, ScannerError> {
        self.simulate_scan(&random_barcode()).await
    }

    /// Deliver a failure with the given message
    pub async fn simulate_error(&self, message: &str) -> Result<ScanResult, ScannerError> {
        self.deliver_simulated(ScanResult::failure(message)).await
    }

    async fn deliver_simulated(&self, result: ScanResult) -> Result<ScanResult, ScannerError> {
        if !self.config.test_mode {
            return Err(ScannerError::TestModeDisabled);
        }

        let mut inner = self.inner.lock().await;
        if let Some(task) = inner.timeout_task.take() {
            task.abort();
        }
        inner.buffer.stop();
        tracing::debug!(?result, "Simulated scan delivered");
        self.results.send_replace(Some(result.clone()));
        Ok(result)
    }
}

/// 12 random digits, UPC-A length
fn random_barcode() -> String {
    uuid::Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(12)
        .map(|b| char::from(b'0' + b % 10))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn service() -> ScannerService {
        ScannerService::new(ScannerConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_one_success() {
        let scanner = service();
        scanner.start_scanning().await;
        let rx = scanner.subscribe();

        for c in ['1', '2', '3'] {
            assert!(scanner.handle_key(Key::Char(c)).await.is_none());
            tokio::time::advance(Duration::from_millis(10)).await;
        }
        let result = scanner.handle_key(Key::Enter).await.unwrap();
        assert_eq!(result.barcode(), Some("123"));
        assert_eq!(rx.borrow().as_ref().and_then(|r| r.barcode()), Some("123"));
        assert!(!scanner.is_scanning().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_typing_resets_buffer() {
        let scanner = service();
        scanner.start_scanning().await;

        scanner.handle_key(Key::Char('1')).await;
        tokio::time::advance(Duration::from_millis(150)).await;
        let result = scanner.type_burst("23").await.unwrap();
        assert_eq!(result.barcode(), Some("23"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_skips_control_characters() {
        let scanner = service();
        scanner.start_scanning().await;

        let result = scanner.type_burst("0123-A\r").await.unwrap();
        assert_eq!(result.barcode(), Some("0123-A"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_emits_failure() {
        let scanner = service();
        scanner.start_scanning().await;
        let mut rx = scanner.subscribe();

        rx.changed().await.unwrap();
        let result = rx.borrow().clone().unwrap();
        assert!(result.error().unwrap().contains("Scan timeout"));
        assert!(!scanner.is_scanning().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_suppresses_emission() {
        let scanner = service();
        scanner.start_scanning().await;
        scanner.handle_key(Key::Char('1')).await;
        scanner.stop_scanning().await;

        assert!(scanner.handle_key(Key::Enter).await.is_none());
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(scanner.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_previous_timer() {
        let scanner = service();
        scanner.start_scanning().await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        scanner.start_scanning().await;
        tokio::time::sleep(Duration::from_secs(15)).await;

        assert!(scanner.latest().is_none());
        assert!(scanner.is_scanning().await);
    }

    #[tokio::test]
    async fn test_simulated_results() {
        let scanner = service();
        scanner.start_scanning().await;
        let result = scanner.simulate_scan(" 0123 ").await.unwrap();
        assert_eq!(result.barcode(), Some("0123"));
        assert!(!scanner.is_scanning().await);

        let result = scanner.simulate_error("Lens dirty").await.unwrap();
        assert_eq!(result.error(), Some("Lens dirty"));

        let result = scanner.simulate_random_scan().await.unwrap();
        let code = result.barcode().unwrap();
        assert_eq!(code.len(), 12);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_simulation_requires_test_mode() {
        let scanner = ScannerService::new(ScannerConfig {
            test_mode: false,
            ..Default::default()
        });
        assert!(matches!(
            scanner.simulate_scan("1").await,
            Err(ScannerError::TestModeDisabled)
        ));
        assert!(scanner.latest().is_none());
    }
}
