//! Pin placement core for the stray-animal monitoring platform.
//!
//! Detections reported by a CCTV camera are turned into map pins placed
//! inside the camera's field of view, spread out so that pins reported by the
//! same camera do not stack on top of each other.

pub mod math;
pub mod model;
pub mod placement;
pub mod prelude;
pub mod repository;
pub mod telemetry;

pub use placement::{PinPlacer, PlacedPin, Placement, PlacementOutcome, PlacementSearch};
pub use prelude::{PlacementConfig, PlacementError, PlacementResult, StreamMatch};
