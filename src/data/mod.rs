pub mod coordinate;
pub mod rides;

pub use coordinate::{format_lat_lng, parse_lat_lng, CoordinateFormat};
pub use rides::{RideList, RideRequest, RideStatus};
