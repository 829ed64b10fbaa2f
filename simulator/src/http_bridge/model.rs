use pincore::telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dashboard counters served at `/summary`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SummaryModel {
    pub camera_pins: usize,
    pub animal_pins: usize,
    pub dog_pins: usize,
    pub cat_pins: usize,
    pub by_type: BTreeMap<String, usize>,
    pub placed: usize,
    pub fallbacks: usize,
    pub degraded: usize,
    pub errors: usize,
}

impl SummaryModel {
    pub fn new(camera_pins: usize, by_type: BTreeMap<String, usize>, metrics: MetricsSnapshot) -> Self {
        Self {
            camera_pins,
            animal_pins: by_type.values().sum(),
            dog_pins: by_type.get("dog").copied().unwrap_or(0),
            cat_pins: by_type.get("cat").copied().unwrap_or(0),
            by_type,
            placed: metrics.placed,
            fallbacks: metrics.fallbacks,
            degraded: metrics.degraded,
            errors: metrics.errors,
        }
    }
}
