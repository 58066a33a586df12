//! Timer abstraction for the `std` connection engine.
//!
//! Mirrors the dependency-inversion shape of [`crate::net::transport::AsyncTransport`]:
//! the engine in `connection.rs` is generic over a `Scheduler` rather than calling
//! `tokio::time` directly, so tests can drive a virtual clock instead of waiting on
//! wall-clock timers for the connect/ack/heartbeat/reconnect delays.

use std::time::{Duration, Instant};

/// Monotonic clock + sleep abstraction used by the connection engine.
///
/// # Design Notes
///
/// Kept minimal, the same way [`crate::net::transport::AsyncTransport`] is kept
/// minimal: one clock read, one sleep. Implementations are expected to be cheap
/// to clone (an `Arc`-backed handle) since the engine holds one per background
/// task and tests hold another to drive it forward.
#[allow(async_fn_in_trait)]
pub trait Scheduler: Clone {
    /// Current instant on this scheduler's clock.
    fn now(&self) -> Instant;

    /// Suspend the calling task until `duration` has elapsed on this
    /// scheduler's clock.
    async fn sleep(&self, duration: Duration);
}

/// Production [`Scheduler`] backed by `tokio::time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Create a new wall-clock scheduler.
    pub const fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Advance-on-demand virtual clock for deterministic timer tests.
///
/// Grounded on the same in-memory-test-double pattern as
/// [`crate::net::mock_transport::MockTransport`]: state lives behind the trait
/// boundary the engine actually uses, so a test can assert exactly what the
/// engine does after N seconds without sleeping N real seconds.
///
/// `sleep()` parks on a [`tokio::sync::Notify`] until [`VirtualScheduler::advance`]
/// has moved the clock far enough forward; call `advance` from the test driving
/// the engine's background task.
#[derive(Clone)]
pub struct VirtualScheduler {
    base: Instant,
    elapsed: std::sync::Arc<std::sync::Mutex<Duration>>,
    notify: std::sync::Arc<tokio::sync::Notify>,
}

impl VirtualScheduler {
    /// Create a new virtual scheduler starting at elapsed time zero.
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            elapsed: std::sync::Arc::new(std::sync::Mutex::new(Duration::ZERO)),
            notify: std::sync::Arc::new(tokio::sync::Notify::new()),
        }
    }

    /// Move the virtual clock forward by `duration`, waking any task parked
    /// in [`Scheduler::sleep`] whose deadline has now passed.
    pub fn advance(&self, duration: Duration) {
        {
            let mut elapsed = self.elapsed.lock().expect("virtual clock mutex poisoned");
            *elapsed += duration;
        }
        self.notify.notify_waiters();
    }

    fn elapsed(&self) -> Duration {
        *self.elapsed.lock().expect("virtual clock mutex poisoned")
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        let deadline = self.elapsed() + duration;
        loop {
            if self.elapsed() >= deadline {
                return;
            }
            self.notify.notified().await;
        }
    }
}
