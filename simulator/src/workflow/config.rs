use anyhow::Context;
use pincore::model::Camera;
use pincore::prelude::{PlacementConfig, StreamMatch};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::generator::profile::GeneratorConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub placement: PlacementConfig,
    pub stream_match: StreamMatch,
    /// Bound on every repository call, in milliseconds.
    pub timeout_ms: u64,
    /// Seed for the fallback placement RNG.
    pub seed: u64,
    pub cameras: Vec<Camera>,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            stream_match: StreamMatch::default(),
            timeout_ms: 1_000,
            seed: 0,
            cameras: demo_cameras(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .placement
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        for camera in &config.cameras {
            camera
                .validate()
                .with_context(|| format!("validating cameras in {}", path_ref.display()))?;
        }
        Ok(config)
    }

    pub fn from_args(detections: usize, seed: u64, timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            seed,
            generator: GeneratorConfig {
                detections,
                seed,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn demo_cameras() -> Vec<Camera> {
    vec![
        Camera {
            id: 1,
            name: Some("quiapo-market".into()),
            stream_url: Some("rtsp://10.0.0.21:554/live/cam01".into()),
            latitude: 14.5995,
            longitude: 120.9842,
            direction: 90.0,
            user_map_id: Some(1),
        },
        Camera {
            id: 2,
            name: Some("plaza-miranda".into()),
            stream_url: Some("rtsp://10.0.0.22:554/live/cam02".into()),
            latitude: 14.5989,
            longitude: 120.9836,
            direction: 315.0,
            user_map_id: Some(1),
        },
    ]
}
