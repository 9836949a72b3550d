//! Configuration for the map and the two page controllers
//!
//! Every struct deserializes with `#[serde(default)]`, so a host only needs to
//! supply the values it wants to change, e.g. `{"map": {"zoom": 13}}`.

use crate::{
    core::{
        constants::{
            DEFAULT_CENTER, DEFAULT_VIEWPORT_SIZE, DEFAULT_ZOOM, DRIVER_LOCATION_PRECISION,
            FIT_BOUNDS_PADDING_RATIO, LOCATE_ZOOM,
        },
        geo::{LatLng, Point},
    },
    layers::tile::TileLayerOptions,
    MapError, Result,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    let config = serde_json::from_str(json).map_err(MapError::from)?;
    Ok(config)
}

/// Initial view and base layer of a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: f64,
    /// Container size in CSS pixels
    pub size: Point,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub dragging: bool,
    pub tile_layer: TileLayerOptions,
}

impl Default for MapConfig {
    fn default() -> Self {
        let (lat, lng) = DEFAULT_CENTER;
        let (width, height) = DEFAULT_VIEWPORT_SIZE;
        Self {
            center: LatLng::new(lat, lng),
            zoom: DEFAULT_ZOOM,
            size: Point::new(width, height),
            min_zoom: None,
            max_zoom: None,
            dragging: true,
            tile_layer: TileLayerOptions::default(),
        }
    }
}

impl MapConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}

/// Element ids and map settings for the rider booking page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderMapConfig {
    pub map: MapConfig,
    pub container_id: String,
    pub pickup_field_id: String,
    pub destination_field_id: String,
}

impl Default for RiderMapConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            container_id: "map".to_string(),
            pickup_field_id: "pickup".to_string(),
            destination_field_id: "destination".to_string(),
        }
    }
}

impl RiderMapConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}

/// Element ids, map settings and framing behavior for the driver dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverMapConfig {
    pub map: MapConfig,
    pub container_id: String,
    pub location_field_id: String,
    /// Zoom applied when the device reports its position
    pub locate_zoom: f64,
    /// Fraction of the marker span added on each side before fitting
    pub fit_padding_ratio: f64,
    /// Zoom used when every marker sits on the same point; wider fits are uncapped
    pub point_fit_zoom: f64,
    /// Decimal places written to the location field
    pub location_precision: usize,
}

impl Default for DriverMapConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            container_id: "driver-map".to_string(),
            location_field_id: "driver-current-location".to_string(),
            locate_zoom: LOCATE_ZOOM,
            fit_padding_ratio: FIT_BOUNDS_PADDING_RATIO,
            point_fit_zoom: LOCATE_ZOOM,
            location_precision: DRIVER_LOCATION_PRECISION,
        }
    }
}

impl DriverMapConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}
