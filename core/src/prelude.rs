use crate::math::geodesy::EARTH_RADIUS_M;
use crate::repository::RepositoryError;
use serde::{Deserialize, Serialize};

/// Tunables for placing pins around a camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Distance of the first pin, and the inner edge of the placement band.
    pub base_distance_m: f64,
    /// Outer edge of the placement band.
    pub max_distance_m: f64,
    /// Full field-of-view cone, centered on the camera direction.
    pub field_of_view_deg: f64,
    pub min_separation_m: f64,
    pub max_attempts: usize,
    pub earth_radius_m: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            base_distance_m: 5.0,
            max_distance_m: 25.0,
            field_of_view_deg: 60.0,
            min_separation_m: 2.0,
            max_attempts: 20,
            earth_radius_m: EARTH_RADIUS_M,
        }
    }
}

impl PlacementConfig {
    pub fn half_angle_deg(&self) -> f64 {
        self.field_of_view_deg / 2.0
    }

    pub fn validate(&self) -> PlacementResult<()> {
        let finite = [
            self.base_distance_m,
            self.max_distance_m,
            self.field_of_view_deg,
            self.min_separation_m,
            self.earth_radius_m,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(PlacementError::InvalidConfig(
                "all distances and angles must be finite".into(),
            ));
        }
        if self.base_distance_m < 0.0 {
            return Err(PlacementError::InvalidConfig(format!(
                "base distance {} must not be negative",
                self.base_distance_m
            )));
        }
        if self.max_distance_m < self.base_distance_m {
            return Err(PlacementError::InvalidConfig(format!(
                "max distance {} is below base distance {}",
                self.max_distance_m, self.base_distance_m
            )));
        }
        if !(0.0..=360.0).contains(&self.field_of_view_deg) {
            return Err(PlacementError::InvalidConfig(format!(
                "field of view {} must lie in [0, 360]",
                self.field_of_view_deg
            )));
        }
        if self.min_separation_m < 0.0 {
            return Err(PlacementError::InvalidConfig(format!(
                "min separation {} must not be negative",
                self.min_separation_m
            )));
        }
        if self.earth_radius_m <= 0.0 {
            return Err(PlacementError::InvalidConfig(format!(
                "earth radius {} must be positive",
                self.earth_radius_m
            )));
        }
        Ok(())
    }
}

/// How a camera reference is matched against camera stream URLs and names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamMatch {
    /// Legacy behavior: the first camera whose URL or name contains the
    /// reference wins.
    #[default]
    Contains,
    Prefix,
    Exact,
}

/// Common error type for pin placement.
#[derive(thiserror::Error, Debug)]
pub enum PlacementError {
    #[error("no camera matches stream identifier {0:?}")]
    CameraNotFound(String),
    #[error("repository unavailable: {0}")]
    RepositoryUnavailable(#[source] RepositoryError),
    #[error("camera {id} has an unusable position: {reason}")]
    InvalidCamera { id: u64, reason: String },
    #[error("detection {0} already has a pin")]
    DuplicateDetection(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<RepositoryError> for PlacementError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(detection_id) => {
                PlacementError::DuplicateDetection(detection_id)
            }
            other => PlacementError::RepositoryUnavailable(other),
        }
    }
}

pub type PlacementResult<T> = Result<T, PlacementError>;
