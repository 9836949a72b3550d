pub mod driver;
pub mod rider;

pub use driver::{DriverMapController, DRIVER_MARKER_ID};
pub use rider::{RiderMapController, RiderState};
