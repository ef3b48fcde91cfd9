use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Simulated round-trip delay standing in for a remote call.
///
/// Login, signup and payment requests each suspend once on this value before
/// doing their work. Tests use [`Latency::none`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency(Duration);

impl Latency {
    /// Delay used by the interactive application.
    pub const DEFAULT: Latency = Latency(Duration::from_millis(1000));

    pub fn none() -> Self {
        Self(Duration::ZERO)
    }

    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Number of calls currently suspended on a [`Latency`].
///
/// Each call holds an [`InFlightGuard`] for its duration. The guard releases
/// on drop, so a caller that abandons the future mid-wait never leaves the
/// owner reporting itself busy.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    pub fn enter(&self) -> InFlightGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(Arc::clone(&self.0))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
