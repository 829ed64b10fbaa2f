use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::model::{Camera, CameraId, MapId, Pin, PinId, PinInput};
use crate::prelude::StreamMatch;
use crate::repository::{CameraRepository, PinRepository, RepositoryError, RepositoryResult};

/// Process-local camera and pin storage.
pub struct InMemoryStore {
    cameras: RwLock<Vec<Camera>>,
    pins: RwLock<Vec<Pin>>,
    next_pin_id: AtomicU64,
    stream_match: StreamMatch,
}

impl InMemoryStore {
    pub fn new(stream_match: StreamMatch) -> Self {
        Self {
            cameras: RwLock::new(Vec::new()),
            pins: RwLock::new(Vec::new()),
            next_pin_id: AtomicU64::new(1),
            stream_match,
        }
    }

    pub fn with_cameras(cameras: Vec<Camera>, stream_match: StreamMatch) -> Self {
        Self {
            cameras: RwLock::new(cameras),
            ..Self::new(stream_match)
        }
    }

    pub async fn cameras(&self) -> Vec<Camera> {
        self.cameras.read().await.clone()
    }

    pub async fn pins(&self) -> Vec<Pin> {
        self.pins.read().await.clone()
    }

    pub async fn pins_by_map(&self, user_map_id: MapId) -> Vec<Pin> {
        self.pins
            .read()
            .await
            .iter()
            .filter(|pin| pin.user_map_id == Some(user_map_id))
            .cloned()
            .collect()
    }

    /// Removes a pin, returning whether it existed.
    pub async fn delete_pin(&self, id: PinId) -> bool {
        let mut pins = self.pins.write().await;
        let before = pins.len();
        pins.retain(|pin| pin.id != id);
        pins.len() != before
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(StreamMatch::default())
    }
}

impl CameraRepository for InMemoryStore {
    async fn find_by_stream_identifier(
        &self,
        identifier: &str,
    ) -> RepositoryResult<Option<Camera>> {
        let cameras = self.cameras.read().await;
        Ok(cameras
            .iter()
            .find(|camera| camera.matches_stream(identifier, self.stream_match))
            .cloned())
    }
}

impl PinRepository for InMemoryStore {
    async fn list_by_camera(&self, camera_id: CameraId) -> RepositoryResult<Vec<Pin>> {
        let pins = self.pins.read().await;
        Ok(pins
            .iter()
            .filter(|pin| pin.camera_pin_id == Some(camera_id))
            .cloned()
            .collect())
    }

    async fn create(&self, input: PinInput) -> RepositoryResult<Pin> {
        let mut pins = self.pins.write().await;
        if let Some(detection_id) = input.detection_id.as_deref() {
            if pins
                .iter()
                .any(|pin| pin.detection_id.as_deref() == Some(detection_id))
            {
                return Err(RepositoryError::Conflict(detection_id.to_string()));
            }
        }

        let id = self.next_pin_id.fetch_add(1, Ordering::Relaxed);
        let pin = Pin::from_input(id, input);
        debug!("stored pin {} for camera {:?}", pin.id, pin.camera_pin_id);
        pins.push(pin.clone());
        Ok(pin)
    }
}
