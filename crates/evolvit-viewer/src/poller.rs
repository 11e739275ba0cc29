//! Keeps the latest good snapshot.

use crate::client::SnapshotSource;
use evolvit_core::Snapshot;
use tracing::{debug, info, warn};

/// What a poll did to the held snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Updated,
    /// The fetch failed and the previous snapshot was kept
    Retained,
}

/// Polls a [`SnapshotSource`] and holds the last snapshot that fetched cleanly.
///
/// Fetch failures never propagate: they are logged and the previous
/// snapshot stays current, so the display shows stale state instead of
/// going blank.
pub struct StatePoller<S> {
    source: S,
    snapshot: Snapshot,
    consecutive_failures: u32,
    last_error: Option<String>,
}

impl<S: SnapshotSource> StatePoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: Snapshot::empty(),
            consecutive_failures: 0,
            last_error: None,
        }
    }

    pub async fn poll(&mut self) -> PollOutcome {
        match self.source.fetch_snapshot().await {
            Ok(snapshot) => {
                if self.consecutive_failures > 0 {
                    info!(
                        failures = self.consecutive_failures,
                        "Snapshot fetch recovered"
                    );
                }
                self.snapshot = snapshot;
                self.consecutive_failures = 0;
                self.last_error = None;
                PollOutcome::Updated
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures == 1 {
                    warn!("Snapshot fetch failed, keeping previous state: {}", e);
                } else {
                    debug!(failures = self.consecutive_failures, "Snapshot fetch failed: {}", e);
                }
                crate::record_counter!("snapshot_fetch_failures", 1);
                self.last_error = Some(e.to_string());
                PollOutcome::Retained
            }
        }
    }

    /// The last snapshot that fetched successfully (empty before the first)
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// One-line fetch status for display
    pub fn status_line(&self) -> String {
        match &self.last_error {
            None => "live".to_string(),
            Some(e) => format!("stale ({} failed fetches): {}", self.consecutive_failures, e),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use evolvit_core::{Creature, Error, FoodItem, Point, Result};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Source replaying a fixed list of fetch results
    pub(crate) struct ScriptedSource {
        results: Mutex<VecDeque<Result<Snapshot>>>,
    }

    impl ScriptedSource {
        pub(crate) fn new(results: Vec<Result<Snapshot>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
            }
        }
    }

    impl SnapshotSource for ScriptedSource {
        async fn fetch_snapshot(&self) -> Result<Snapshot> {
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Network("script exhausted".to_string())))
        }
    }

    pub(crate) fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::empty();
        snapshot
            .creatures
            .push(Creature::new(Point::new(100.0, 100.0), 0.0, 0));
        snapshot.food.push(FoodItem::new(5.0, 5.0));
        snapshot
            .sprites
            .insert(0, "body,0,0,10|spike,5,0,4|eye,-3,2,2".to_string());
        snapshot
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let poller = StatePoller::new(ScriptedSource::new(vec![]));
        assert!(poller.snapshot().is_empty());
        assert_eq!(poller.status_line(), "live");
    }

    #[tokio::test]
    async fn test_failure_retains_previous_snapshot() {
        let mut poller = StatePoller::new(ScriptedSource::new(vec![
            Ok(sample_snapshot()),
            Err(Error::Network("connection refused".to_string())),
            Err(Error::Decode("expected value".to_string())),
        ]));

        assert_eq!(poller.poll().await, PollOutcome::Updated);
        assert_eq!(poller.poll().await, PollOutcome::Retained);
        assert_eq!(poller.poll().await, PollOutcome::Retained);

        assert_eq!(poller.snapshot(), &sample_snapshot());
        assert_eq!(poller.consecutive_failures(), 2);
        assert_eq!(
            poller.status_line(),
            "stale (2 failed fetches): Decode error: expected value"
        );
    }

    #[tokio::test]
    async fn test_success_resets_failures() {
        let mut replacement = Snapshot::empty();
        replacement.food.push(FoodItem::new(1.0, 1.0));

        let mut poller = StatePoller::new(ScriptedSource::new(vec![
            Err(Error::Network("timed out".to_string())),
            Ok(replacement.clone()),
        ]));

        assert_eq!(poller.poll().await, PollOutcome::Retained);
        assert!(poller.snapshot().is_empty());

        assert_eq!(poller.poll().await, PollOutcome::Updated);
        assert_eq!(poller.snapshot(), &replacement);
        assert_eq!(poller.consecutive_failures(), 0);
        assert_eq!(poller.status_line(), "live");
    }
}
