use serde::Serialize;
use std::sync::Mutex;

use crate::placement::PlacementOutcome;

/// Counters for the pins produced by one placer.
pub struct PlacementMetrics {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub placed: usize,
    pub first_pins: usize,
    pub fallbacks: usize,
    pub degraded: usize,
    pub errors: usize,
}

impl PlacementMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_placement(&self, outcome: PlacementOutcome) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.placed += 1;
            match outcome {
                PlacementOutcome::FirstPin => metrics.first_pins += 1,
                PlacementOutcome::Fallback => metrics.fallbacks += 1,
                PlacementOutcome::Accepted { .. } => {}
            }
        }
    }

    pub fn record_degraded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.placed += 1;
            metrics.degraded += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for PlacementMetrics {
    fn default() -> Self {
        Self::new()
    }
}
