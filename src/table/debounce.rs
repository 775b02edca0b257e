//! Search input debouncing
//!
//! Keystrokes go in, settled search terms come out: a term is emitted only
//! after the input has been quiet for the debounce delay, and only when it
//! differs from the last emitted term.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default quiet period before a search is issued
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Sending half: feed it the search box's full text on every change
#[derive(Clone)]
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Spawn the debounce task; settled terms arrive on the returned receiver
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>, JoinHandle<()>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(delay, input_rx, output_tx));
        (Self { input: input_tx }, output_rx, handle)
    }

    /// Record the current text of the search box.
    ///
    /// Returns false once the debounce task has stopped.
    pub fn input(&self, text: impl Into<String>) -> bool {
        self.input.send(text.into()).is_ok()
    }
}

async fn run(
    delay: Duration,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<String>,
) {
    let mut pending: Option<(String, Instant)> = None;
    let mut last_emitted: Option<String> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at + delay);

        tokio::select! {
            received = input.recv() => match received {
                Some(text) => pending = Some((text.trim().to_string(), Instant::now())),
                None => break,
            },
            _ = sleep_until_opt(deadline) => {
                if let Some((term, _)) = pending.take() {
                    if last_emitted.as_deref() != Some(term.as_str()) {
                        tracing::debug!(term = %term, "Search settled");
                        if output.send(term.clone()).is_err() {
                            break;
                        }
                        last_emitted = Some(term);
                    }
                }
            }
        }
    }

    // Flush a settled term that was still waiting when the input closed
    if let Some((term, _)) = pending {
        if last_emitted.as_deref() != Some(term.as_str()) {
            let _ = output.send(term);
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_keystrokes_emits_once() {
        let (debouncer, mut rx, _handle) = SearchDebouncer::spawn(DEFAULT_SEARCH_DEBOUNCE);

        for text in ["a", "ac", "acm", "acme"] {
            debouncer.input(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("acme"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_emit_separately() {
        let (debouncer, mut rx, _handle) = SearchDebouncer::spawn(DEFAULT_SEARCH_DEBOUNCE);

        debouncer.input("van");
        tokio::time::sleep(Duration::from_millis(350)).await;
        debouncer.input("vans");
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("van"));
        assert_eq!(rx.recv().await.as_deref(), Some("vans"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_term_not_repeated() {
        let (debouncer, mut rx, _handle) = SearchDebouncer::spawn(DEFAULT_SEARCH_DEBOUNCE);

        debouncer.input("acme");
        tokio::time::sleep(Duration::from_millis(350)).await;
        debouncer.input("acme ");
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(rx.recv().await.as_deref(), Some("acme"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_term_flushed_on_close() {
        let (debouncer, mut rx, handle) = SearchDebouncer::spawn(DEFAULT_SEARCH_DEBOUNCE);
        debouncer.input("late");
        drop(debouncer);
        handle.await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("late"));
    }
}
