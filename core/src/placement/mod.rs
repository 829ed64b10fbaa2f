pub mod candidate;
pub mod placer;
pub mod search;

pub use candidate::{Candidate, CandidateStrategy, SpreadStrategy};
pub use placer::{PinPlacer, PlacedPin};
pub use search::{Placement, PlacementOutcome, PlacementSearch};
