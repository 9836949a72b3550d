//! Prelude module for common ridemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use ridemap::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{DriverMapConfig, MapConfig, RiderMapConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::{Map, MapOptions},
    viewport::{FitBoundsOptions, Viewport},
};

pub use crate::layers::{
    base::LayerTrait,
    manager::LayerManager,
    marker::Marker,
    tile::{TileLayer, TileLayerOptions},
};

pub use crate::input::{
    events::{InputEvent, MapEvent, MouseButton},
    handler::{Action, InputHandler},
};

pub use crate::controllers::{DriverMapController, RiderMapController, RiderState};

pub use crate::data::{
    format_lat_lng, parse_lat_lng, CoordinateFormat, RideList, RideRequest, RideStatus,
};

pub use crate::geolocation::{
    FixedGeolocator, GeolocationError, Geolocator, UnavailableGeolocator,
};

pub use crate::page::{MemoryPage, Page};

pub use crate::ui::popup::Popup;

pub use crate::{Error as MapError, Result};

pub use std::collections::VecDeque;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
