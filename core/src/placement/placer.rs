use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::math::geodesy::GeoPoint;
use crate::model::{Camera, Pin, PinInput, PlacementRequest};
use crate::placement::search::{Placement, PlacementSearch};
use crate::prelude::{PlacementConfig, PlacementError, PlacementResult};
use crate::repository::{CameraRepository, PinRepository, RepositoryError, RepositoryResult};
use crate::telemetry::{LogManager, MetricsSnapshot, PlacementMetrics};

/// Stored pin together with how its coordinate was chosen.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedPin {
    pub pin: Pin,
    /// `None` for pins created without a camera reference.
    pub placement: Option<Placement>,
}

/// Resolves the camera behind a detection, places a pin in its field of
/// view, and stores the pin.
///
/// Reading the camera's pins and storing the new one are separate calls, so
/// two concurrent placements for one camera may pick colliding spots.
pub struct PinPlacer<C, P, R = StdRng> {
    cameras: C,
    pins: P,
    search: PlacementSearch,
    rng: Mutex<R>,
    metrics: PlacementMetrics,
    logger: LogManager,
}

impl<C, P> PinPlacer<C, P, StdRng>
where
    C: CameraRepository,
    P: PinRepository,
{
    pub fn new(cameras: C, pins: P, config: PlacementConfig) -> PlacementResult<Self> {
        Self::with_rng(cameras, pins, config, StdRng::from_entropy())
    }
}

impl<C, P, R> PinPlacer<C, P, R>
where
    C: CameraRepository,
    P: PinRepository,
    R: Rng + Send,
{
    pub fn with_rng(cameras: C, pins: P, config: PlacementConfig, rng: R) -> PlacementResult<Self> {
        Ok(Self {
            cameras,
            pins,
            search: PlacementSearch::new(config)?,
            rng: Mutex::new(rng),
            metrics: PlacementMetrics::new(),
            logger: LogManager::new("placer"),
        })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Places and stores a pin, returning only the stored pin.
    pub async fn place_pin(&self, request: &PlacementRequest, timeout: Duration) -> PlacementResult<Pin> {
        self.place(request, timeout).await.map(|placed| placed.pin)
    }

    /// Places and stores a pin. Each repository call is bounded by `timeout`.
    pub async fn place(&self, request: &PlacementRequest, timeout: Duration) -> PlacementResult<PlacedPin> {
        let result = self.place_inner(request, timeout).await;
        if let Err(err) = &result {
            self.metrics.record_error();
            self.logger.warn(&format!(
                "placing {} pin failed: {}",
                request.animal_type, err
            ));
        }
        result
    }

    async fn place_inner(&self, request: &PlacementRequest, timeout: Duration) -> PlacementResult<PlacedPin> {
        let Some(camera_ref) = request.camera_ref() else {
            let pin = bounded(timeout, self.pins.create(pin_input(request, None, None))).await?;
            self.metrics.record_degraded();
            self.logger.record(&format!(
                "stored pin {} without camera, coordinates left empty",
                pin.id
            ));
            return Ok(PlacedPin {
                pin,
                placement: None,
            });
        };

        let camera = bounded(timeout, self.cameras.find_by_stream_identifier(camera_ref))
            .await?
            .ok_or_else(|| PlacementError::CameraNotFound(camera_ref.to_string()))?;
        camera.validate()?;

        let existing: Vec<GeoPoint> = bounded(timeout, self.pins.list_by_camera(camera.id))
            .await?
            .iter()
            .filter_map(Pin::position)
            .collect();

        let placement = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.search
                .place(camera.position(), camera.direction, &existing, &mut *rng)
        };

        let input = pin_input(request, Some(&camera), Some(placement.point));
        let pin = bounded(timeout, self.pins.create(input)).await?;

        self.metrics.record_placement(placement.outcome);
        self.logger.record(&format!(
            "stored pin {} for camera {} at {} ({:.1} m, {:.1} deg, {:?})",
            pin.id,
            camera.id,
            placement.point,
            placement.distance_m,
            placement.bearing_deg,
            placement.outcome
        ));

        Ok(PlacedPin {
            pin,
            placement: Some(placement),
        })
    }
}

fn pin_input(request: &PlacementRequest, camera: Option<&Camera>, point: Option<GeoPoint>) -> PinInput {
    PinInput {
        animal_type: request.animal_type.clone(),
        stray_status: request.stray_status.clone(),
        camera: request.camera_ref().map(str::to_string),
        camera_pin_id: camera.map(|camera| camera.id),
        user_map_id: camera.and_then(|camera| camera.user_map_id),
        latitude: point.map(|point| point.latitude),
        longitude: point.map(|point| point.longitude),
        detection_id: request.detection_id.clone(),
    }
}

async fn bounded<T, F>(timeout: Duration, call: F) -> PlacementResult<T>
where
    F: Future<Output = RepositoryResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(PlacementError::from),
        Err(_) => Err(RepositoryError::Timeout(timeout).into()),
    }
}
