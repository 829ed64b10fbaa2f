use serde::{Deserialize, Serialize};

use crate::math::geodesy::GeoPoint;
use crate::prelude::{PlacementError, PlacementResult, StreamMatch};

pub type CameraId = u64;
pub type MapId = u64;

/// CCTV camera as registered on a user map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// HLS/RTSP stream the detector reads from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Facing bearing in degrees, clockwise from north.
    pub direction: f64,
    #[serde(default)]
    pub user_map_id: Option<MapId>,
}

impl Camera {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Rejects positions the placement math cannot work with.
    pub fn validate(&self) -> PlacementResult<()> {
        let fields = [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("direction", self.direction),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(PlacementError::InvalidCamera {
                id: self.id,
                reason: format!("{name} is {value}"),
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PlacementError::InvalidCamera {
                id: self.id,
                reason: format!("latitude {} outside [-90, 90]", self.latitude),
            });
        }
        Ok(())
    }

    /// Whether `identifier` refers to this camera's stream URL or name.
    pub fn matches_stream(&self, identifier: &str, policy: StreamMatch) -> bool {
        if identifier.is_empty() {
            return false;
        }
        [self.stream_url.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .any(|candidate| match policy {
                StreamMatch::Contains => candidate.contains(identifier),
                StreamMatch::Prefix => candidate.starts_with(identifier),
                StreamMatch::Exact => candidate == identifier,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_camera() -> Camera {
        Camera {
            id: 7,
            name: Some("north-gate".into()),
            stream_url: Some("rtsp://10.0.0.4:554/stream/cam07".into()),
            latitude: 14.5995,
            longitude: 120.9842,
            direction: 90.0,
            user_map_id: Some(1),
        }
    }

    #[test]
    fn contains_matches_any_substring_of_url_or_name() {
        let camera = gate_camera();
        assert!(camera.matches_stream("cam07", StreamMatch::Contains));
        assert!(camera.matches_stream("north", StreamMatch::Contains));
        assert!(!camera.matches_stream("cam08", StreamMatch::Contains));
    }

    #[test]
    fn stricter_policies_reject_partial_references() {
        let camera = gate_camera();
        assert!(!camera.matches_stream("cam07", StreamMatch::Prefix));
        assert!(camera.matches_stream("rtsp://10.0.0.4", StreamMatch::Prefix));
        assert!(!camera.matches_stream("north", StreamMatch::Exact));
        assert!(camera.matches_stream("north-gate", StreamMatch::Exact));
    }

    #[test]
    fn validate_rejects_non_finite_and_out_of_range_positions() {
        assert!(gate_camera().validate().is_ok());

        let mut camera = gate_camera();
        camera.direction = f64::INFINITY;
        assert!(matches!(
            camera.validate(),
            Err(PlacementError::InvalidCamera { id: 7, .. })
        ));

        let mut camera = gate_camera();
        camera.latitude = 91.0;
        assert!(camera.validate().is_err());
    }

    #[test]
    fn empty_identifier_never_matches() {
        assert!(!gate_camera().matches_stream("", StreamMatch::Contains));
    }
}
