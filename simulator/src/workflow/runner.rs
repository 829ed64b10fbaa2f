use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use pincore::model::{tally_by_animal_type, PlacementRequest};
use pincore::placement::{PinPlacer, PlacedPin};
use pincore::prelude::PlacementResult;
use pincore::repository::InMemoryStore;
use pincore::telemetry::MetricsSnapshot;
use rand::{rngs::StdRng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub type StorePlacer = PinPlacer<Arc<InMemoryStore>, Arc<InMemoryStore>>;

pub struct WorkflowResult {
    pub placed: Vec<PlacedPin>,
    pub failures: Vec<String>,
    pub metrics: MetricsSnapshot,
    pub tally: BTreeMap<String, usize>,
}

#[derive(Clone)]
pub struct Runner {
    store: Arc<InMemoryStore>,
    placer: Arc<StorePlacer>,
    timeout: Duration,
}

impl Runner {
    pub fn new(config: &WorkflowConfig) -> anyhow::Result<Self> {
        let store = Arc::new(InMemoryStore::with_cameras(
            config.cameras.clone(),
            config.stream_match,
        ));
        let placer = PinPlacer::with_rng(
            store.clone(),
            store.clone(),
            config.placement.clone(),
            StdRng::seed_from_u64(config.seed),
        )
        .context("building pin placer")?;

        Ok(Self {
            store,
            placer: Arc::new(placer),
            timeout: config.timeout(),
        })
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.placer.metrics()
    }

    pub async fn submit(&self, request: &PlacementRequest) -> PlacementResult<PlacedPin> {
        self.placer.place(request, self.timeout).await
    }

    /// Places every request in order; failed requests are reported, not fatal.
    pub async fn execute(&self, requests: &[PlacementRequest]) -> WorkflowResult {
        let mut placed = Vec::with_capacity(requests.len());
        let mut failures = Vec::new();

        for request in requests {
            match self.submit(request).await {
                Ok(pin) => placed.push(pin),
                Err(err) => failures.push(format!(
                    "{}: {}",
                    request.detection_id.as_deref().unwrap_or("-"),
                    err
                )),
            }
        }

        let tally = tally_by_animal_type(&self.store.pins().await);
        WorkflowResult {
            placed,
            failures,
            metrics: self.placer.metrics(),
            tally,
        }
    }
}
