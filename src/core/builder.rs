//! Map builder for fluent API configuration
//!
//! This module provides a MapBuilder that assembles a [`Map`] from a starting
//! view, interaction switches and an optional tile base layer.

use crate::{
    core::{
        config::MapConfig,
        geo::{LatLng, Point},
        map::{Map, MapOptions},
        viewport::Viewport,
    },
    layers::{base::LayerTrait, tile::{TileLayer, TileLayerOptions}},
    MapError, Result,
};

/// Id of the base tile layer added by [`MapBuilder::build`]
pub const BASE_LAYER_ID: &str = "osm";

/// Builder for creating and configuring Map instances
pub struct MapBuilder {
    center: LatLng,
    zoom: f64,
    size: Point,
    /// Map interaction options
    map_options: MapOptions,
    /// Options for the base tile layer, if any
    tile_options: Option<TileLayerOptions>,
    min_zoom: Option<f64>,
    max_zoom: Option<f64>,
}

impl MapBuilder {
    /// Create a new MapBuilder with default settings
    pub fn new() -> Self {
        let viewport = Viewport::default();
        Self {
            center: viewport.center,
            zoom: viewport.zoom,
            size: viewport.size,
            map_options: MapOptions::default(),
            tile_options: None,
            min_zoom: None,
            max_zoom: None,
        }
    }

    /// Builder preloaded from a [`MapConfig`], including its tile layer
    pub fn from_config(config: &MapConfig) -> Self {
        Self::new()
            .with_center_and_zoom(config.center, config.zoom, config.size)
            .with_zoom_limits(config.min_zoom, config.max_zoom)
            .with_dragging(config.dragging)
            .with_tile_layer(config.tile_layer.clone())
    }

    /// Set the initial center and zoom level
    pub fn with_center_and_zoom(mut self, center: LatLng, zoom: f64, size: Point) -> Self {
        self.center = center;
        self.zoom = zoom;
        self.size = size;
        self
    }

    pub fn with_size(mut self, size: Point) -> Self {
        self.size = size;
        self
    }

    /// Add a base tile layer with these options
    pub fn with_tile_layer(mut self, options: TileLayerOptions) -> Self {
        self.tile_options = Some(options);
        self
    }

    /// Set map interaction options
    pub fn with_map_options(mut self, options: MapOptions) -> Self {
        self.map_options = options;
        self
    }

    /// Enable or disable dragging
    pub fn with_dragging(mut self, enabled: bool) -> Self {
        self.map_options.dragging = enabled;
        self
    }

    /// Enable or disable scroll wheel zoom
    pub fn with_scroll_wheel_zoom(mut self, enabled: bool) -> Self {
        self.map_options.scroll_wheel_zoom = enabled;
        self
    }

    /// Enable or disable double-click zoom
    pub fn with_double_click_zoom(mut self, enabled: bool) -> Self {
        self.map_options.double_click_zoom = enabled;
        self
    }

    /// Set zoom limits
    pub fn with_zoom_limits(mut self, min_zoom: Option<f64>, max_zoom: Option<f64>) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Build the map. Without an explicit maximum, the zoom is capped at what
    /// the tile source serves.
    pub fn build(self) -> Result<Map> {
        if !self.center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                self.center.lat, self.center.lng
            ))
            .into());
        }

        let mut options = self.map_options;
        options.min_zoom = self.min_zoom.or(options.min_zoom);
        options.max_zoom = self
            .max_zoom
            .or(options.max_zoom)
            .or_else(|| self.tile_options.as_ref().map(|tiles| tiles.max_zoom as f64));

        let viewport = Viewport::new(self.center, self.zoom, self.size);
        let mut map = Map::with_options(viewport, options);

        if let Some(tile_options) = self.tile_options {
            let mut layer = TileLayer::with_options(
                BASE_LAYER_ID.to_string(),
                "OpenStreetMap".to_string(),
                tile_options,
            );
            layer.set_z_index(-1);
            map.add_layer(Box::new(layer))?;
        }

        log::debug!(
            "map built at {:?} zoom {} ({} layers)",
            map.viewport.center,
            map.viewport.zoom,
            map.list_layers().len()
        );

        Ok(map)
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let map = MapBuilder::new().build().unwrap();
        assert_eq!(map.viewport.zoom, 0.0);
        assert!(map.list_layers().is_empty());
    }

    #[test]
    fn test_from_config_adds_base_layer() {
        let map = MapBuilder::from_config(&MapConfig::default()).build().unwrap();

        assert_eq!(map.viewport.center, LatLng::new(-1.2921, 36.8219));
        assert_eq!(map.viewport.zoom, 12.0);
        assert_eq!(map.viewport.size, Point::new(800.0, 600.0));
        assert_eq!(map.list_layers(), vec![BASE_LAYER_ID.to_string()]);
        assert_eq!(map.viewport.max_zoom, 19.0);
    }

    #[test]
    fn test_tile_max_zoom_caps_view() {
        let tiles = TileLayerOptions {
            max_zoom: 16,
            ..Default::default()
        };
        let mut map = MapBuilder::new()
            .with_center_and_zoom(LatLng::new(0.0, 0.0), 10.0, Point::new(256.0, 256.0))
            .with_tile_layer(tiles)
            .build()
            .unwrap();

        map.set_view(LatLng::new(0.0, 0.0), 18.0).unwrap();
        assert_eq!(map.viewport.zoom, 16.0);
    }

    #[test]
    fn test_invalid_center_rejected() {
        let result = MapBuilder::new()
            .with_center_and_zoom(LatLng::new(0.0, 200.0), 3.0, Point::new(10.0, 10.0))
            .build();
        assert!(result.is_err());
    }
}
