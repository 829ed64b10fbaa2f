use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::math::geodesy::GeoPoint;
use crate::model::camera::{CameraId, MapId};

pub type PinId = u64;

/// Fields of a pin before the repository assigns it an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinInput {
    pub animal_type: String,
    pub stray_status: String,
    /// Camera reference exactly as reported with the detection.
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub camera_pin_id: Option<CameraId>,
    #[serde(default)]
    pub user_map_id: Option<MapId>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_id: Option<String>,
}

/// Animal pin stored on a user map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub animal_type: String,
    pub stray_status: String,
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default)]
    pub camera_pin_id: Option<CameraId>,
    #[serde(default)]
    pub user_map_id: Option<MapId>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_id: Option<String>,
}

impl Pin {
    pub fn from_input(id: PinId, input: PinInput) -> Self {
        Self {
            id,
            animal_type: input.animal_type,
            stray_status: input.stray_status,
            camera: input.camera,
            camera_pin_id: input.camera_pin_id,
            user_map_id: input.user_map_id,
            latitude: input.latitude,
            longitude: input.longitude,
            detection_id: input.detection_id,
        }
    }

    /// Position, if the pin was placed relative to a camera.
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Pin counts keyed by lowercased animal type.
pub fn tally_by_animal_type(pins: &[Pin]) -> BTreeMap<String, usize> {
    let mut tally = BTreeMap::new();
    for pin in pins {
        *tally.entry(pin.animal_type.to_lowercase()).or_insert(0) += 1;
    }
    tally
}
