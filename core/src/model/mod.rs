pub mod camera;
pub mod detection;
pub mod pin;

pub use camera::{Camera, CameraId, MapId};
pub use detection::{DetectionEvent, PlacementRequest};
pub use pin::{tally_by_animal_type, Pin, PinId, PinInput};
