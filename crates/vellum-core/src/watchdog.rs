// SPDX-FileCopyrightText: 2026 Vellum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stall-timeout watchdog.
//!
//! [`StallGuard`] wraps any [`CompletionProvider`] and abandons the call
//! when no forward progress happens within a bounded inactivity window.
//! Progress means a delivered fragment or the terminal result, never
//! internal bookkeeping. Cancellation is best-effort: the inner call is
//! detached rather than aborted, and the shared timed-out flag makes the
//! chunk wrapper silently discard anything it produces afterwards.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::error::VellumError;
use crate::provider::{ChunkHandler, CompletionProvider};
use crate::types::CompletionRequest;

/// Default inactivity window before a call is abandoned.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_millis(45_000);

/// Granularity of the repeating inactivity check.
pub const WATCHDOG_TICK: Duration = Duration::from_secs(1);

/// Shared per-call activity state: a last-activity timestamp and a
/// timed-out flag. Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct ActivityTracker {
    inner: Arc<TrackerState>,
}

struct TrackerState {
    last_activity: std::sync::Mutex<Instant>,
    timed_out: AtomicBool,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TrackerState {
                last_activity: std::sync::Mutex::new(Instant::now()),
                timed_out: AtomicBool::new(false),
            }),
        }
    }

    /// Records genuine forward progress.
    pub fn touch(&self) {
        if let Ok(mut last) = self.inner.last_activity.lock() {
            *last = Instant::now();
        }
    }

    /// Elapsed time since the last recorded progress.
    pub fn idle(&self) -> Duration {
        self.inner
            .last_activity
            .lock()
            .map(|last| last.elapsed())
            .unwrap_or_default()
    }

    pub fn mark_timed_out(&self) {
        self.inner.timed_out.store(true, Ordering::SeqCst);
    }

    pub fn is_timed_out(&self) -> bool {
        self.inner.timed_out.load(Ordering::SeqCst)
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Decorator applying the stall timeout to an inner adapter, uniformly for
/// streaming and non-streaming calls.
pub struct StallGuard {
    inner: Arc<dyn CompletionProvider>,
    threshold: Duration,
}

impl StallGuard {
    pub fn new(inner: Arc<dyn CompletionProvider>) -> Self {
        Self::with_threshold(inner, DEFAULT_STALL_TIMEOUT)
    }

    pub fn with_threshold(inner: Arc<dyn CompletionProvider>, threshold: Duration) -> Self {
        Self { inner, threshold }
    }
}

#[async_trait]
impl CompletionProvider for StallGuard {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn fetch(&self, request: &CompletionRequest) -> Result<String, VellumError> {
        let tracker = ActivityTracker::new();
        let inner = Arc::clone(&self.inner);
        let request = request.clone();
        let handle = tokio::spawn(async move { inner.fetch(&request).await });
        race_watchdog(handle, tracker, self.threshold).await
    }

    async fn stream(
        &self,
        request: &CompletionRequest,
        on_chunk: ChunkHandler,
    ) -> Result<(), VellumError> {
        let tracker = ActivityTracker::new();
        let on_chunk = guard_handler(on_chunk, tracker.clone());
        let inner = Arc::clone(&self.inner);
        let request = request.clone();
        let handle = tokio::spawn(async move { inner.stream(&request, on_chunk).await });
        race_watchdog(handle, tracker, self.threshold).await
    }
}

/// Wraps a chunk handler so each delivery records progress, and so chunks
/// arriving after the watchdog has fired are silently dropped.
fn guard_handler(on_chunk: ChunkHandler, tracker: ActivityTracker) -> ChunkHandler {
    Arc::new(move |fragment: String| {
        if tracker.is_timed_out() {
            return;
        }
        tracker.touch();
        on_chunk(fragment);
    })
}

/// Races the inner call against a repeating inactivity check. On timeout
/// the join handle is dropped, leaving the inner task to finish detached.
async fn race_watchdog<T>(
    mut handle: JoinHandle<Result<T, VellumError>>,
    tracker: ActivityTracker,
    threshold: Duration,
) -> Result<T, VellumError> {
    let mut ticker = tokio::time::interval(WATCHDOG_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            joined = &mut handle => {
                return match joined {
                    Ok(result) => result,
                    Err(e) => Err(VellumError::Internal(format!(
                        "completion task failed: {e}"
                    ))),
                };
            }
            _ = ticker.tick() => {
                let idle = tracker.idle();
                if idle > threshold {
                    tracker.mark_timed_out();
                    debug!(idle_ms = idle.as_millis() as u64, "stall watchdog fired");
                    return Err(VellumError::Timeout { idle });
                }
            }
        }
    }
}
