use anyhow::ensure;
use pincore::model::{Camera, PlacementRequest};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const ANIMAL_TYPES: [&str; 4] = ["Dog", "Cat", "Bird", "Other"];
pub const STRAY_STATUSES: [&str; 3] = ["Stray", "Owned", "Unknown"];

/// Configuration for generating synthetic detections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub detections: usize,
    pub seed: u64,
    /// Share of detections reported without a camera reference.
    pub unlinked_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            detections: 24,
            seed: 0,
            unlinked_ratio: 0.1,
        }
    }
}

fn camera_reference(camera: &Camera) -> Option<String> {
    camera.stream_url.clone().or_else(|| camera.name.clone())
}

/// Builds detections spread across `cameras`, reproducible for a given seed.
pub fn build_requests(
    config: &GeneratorConfig,
    cameras: &[Camera],
) -> anyhow::Result<Vec<PlacementRequest>> {
    ensure!(
        (0.0..=1.0).contains(&config.unlinked_ratio),
        "unlinked ratio {} must lie in [0, 1]",
        config.unlinked_ratio
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut requests = Vec::with_capacity(config.detections);

    for index in 0..config.detections {
        let animal_type = ANIMAL_TYPES[rng.gen_range(0..ANIMAL_TYPES.len())];
        let stray_status = STRAY_STATUSES[rng.gen_range(0..STRAY_STATUSES.len())];
        let mut request = PlacementRequest::new(animal_type, stray_status)
            .with_detection_id(format!("sim:{}:{}", config.seed, index));

        let unlinked = cameras.is_empty() || rng.gen_bool(config.unlinked_ratio);
        if !unlinked {
            let camera = &cameras[rng.gen_range(0..cameras.len())];
            request.camera_ref = camera_reference(camera);
        }
        requests.push(request);
    }

    Ok(requests)
}
