pub mod bearing;
pub mod geodesy;

pub use bearing::{angular_offset, normalize_bearing};
pub use geodesy::{GeoPoint, Geodesy, EARTH_RADIUS_M};
