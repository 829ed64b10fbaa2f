use serde::{Deserialize, Serialize};

/// A single request to place a pin for one detected animal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub animal_type: String,
    pub stray_status: String,
    /// Stream URL or camera name the detection came from.
    #[serde(default, alias = "camera")]
    pub camera_ref: Option<String>,
    #[serde(default)]
    pub detection_id: Option<String>,
}

impl PlacementRequest {
    pub fn new(animal_type: impl Into<String>, stray_status: impl Into<String>) -> Self {
        Self {
            animal_type: animal_type.into(),
            stray_status: stray_status.into(),
            ..Default::default()
        }
    }

    pub fn with_camera(mut self, camera_ref: impl Into<String>) -> Self {
        self.camera_ref = Some(camera_ref.into());
        self
    }

    pub fn with_detection_id(mut self, detection_id: impl Into<String>) -> Self {
        self.detection_id = Some(detection_id.into());
        self
    }

    /// Trimmed camera reference; blank references count as absent.
    pub fn camera_ref(&self) -> Option<&str> {
        self.camera_ref
            .as_deref()
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
    }
}

/// Detection record as posted by the video analysis service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub external_api_id: String,
    pub external_api_type: String,
    #[serde(default)]
    pub pet_type: Option<String>,
    #[serde(default)]
    pub stable_class: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub rtsp_url: Option<String>,
    #[serde(default)]
    pub track_id: Option<String>,
    #[serde(default)]
    pub similarity_score: Option<f64>,
    #[serde(default)]
    pub is_registered: Option<bool>,
}

impl DetectionEvent {
    /// Stable id shared by every report of the same external detection.
    pub fn detection_id(&self) -> String {
        format!("{}:{}", self.external_api_type, self.external_api_id)
    }

    pub fn to_request(&self) -> PlacementRequest {
        let animal_type = [&self.stable_class, &self.pet_type]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or(self.external_api_type.as_str());

        let stray_status = match self.is_registered {
            Some(true) => "Owned",
            Some(false) => "Stray",
            None => "Unknown",
        };

        PlacementRequest {
            animal_type: animal_type.to_string(),
            stray_status: stray_status.to_string(),
            camera_ref: self.rtsp_url.clone(),
            detection_id: Some(self.detection_id()),
        }
    }
}
