//! # ridemap
//!
//! Map controllers for a ride-hailing front end, on a Leaflet-style map model.
//!
//! The rider page picks a pickup and a destination with two map clicks. The
//! driver page shows the driver's own position (from the device or a click,
//! draggable) and plots pending ride requests whose pickup or destination is a
//! `"lat, lng"` pair, then frames every marker.
//!
//! Tile images are drawn by the host; this crate owns the map model: viewport
//! and projection, markers and popups, bounds fitting and pointer input.

pub mod controllers;
pub mod core;
pub mod data;
pub mod geolocation;
pub mod input;
pub mod layers;
pub mod page;
pub mod prelude;
pub mod traits;
pub mod ui;
#[cfg(feature = "wasm")]
pub mod web;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapBuilder,
    config::{DriverMapConfig, MapConfig, RiderMapConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapOptions},
    viewport::{FitBoundsOptions, Viewport},
};

pub use controllers::{DriverMapController, RiderMapController, RiderState};

pub use data::{parse_lat_lng, RideList, RideRequest, RideStatus};

pub use geolocation::{FixedGeolocator, GeolocationError, Geolocator, UnavailableGeolocator};

pub use layers::{base::LayerTrait, marker::Marker, tile::TileLayer};

pub use input::{InputEvent, InputHandler, MapEvent};

pub use page::{MemoryPage, Page};

pub use ui::popup::Popup;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Routes `log` records to stderr, filtered by `RUST_LOG`.
/// Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
