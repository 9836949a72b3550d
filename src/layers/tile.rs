use crate::{
    core::{
        constants::{MAX_TILE_ZOOM, OSM_ATTRIBUTION, OSM_MAX_ZOOM, OSM_URL_TEMPLATE, TILE_SIZE},
        geo::{LatLng, TileCoord},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    Result,
};
use serde::{Deserialize, Deserializer, Serialize};

fn tile_zoom<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u8, D::Error> {
    let zoom = u8::deserialize(deserializer)?;
    Ok(zoom.min(MAX_TILE_ZOOM))
}

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// URL template for tiles (e.g., "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub url_template: String,
    /// Available subdomains for load balancing
    pub subdomains: Vec<String>,
    /// Attribution text
    pub attribution: String,
    /// Tile size in pixels
    pub tile_size: u32,
    /// Maximum zoom level for this tile source, at most [`MAX_TILE_ZOOM`]
    #[serde(deserialize_with = "tile_zoom")]
    pub max_zoom: u8,
    /// Minimum zoom level for this tile source
    #[serde(deserialize_with = "tile_zoom")]
    pub min_zoom: u8,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: OSM_URL_TEMPLATE.to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: OSM_ATTRIBUTION.to_string(),
            tile_size: TILE_SIZE,
            max_zoom: OSM_MAX_ZOOM,
            min_zoom: 0,
        }
    }
}

/// A tile-based background layer. Fetching and drawing the images is left to
/// the host; the layer owns the URL scheme and works out which tiles a view needs.
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
}

impl TileLayer {
    /// Create a new tile layer with default OpenStreetMap tiles
    pub fn new(id: String, name: String) -> Self {
        Self::with_options(id, name, TileLayerOptions::default())
    }

    /// Create a new tile layer with custom options
    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Self {
        let mut properties = LayerProperties::new(id, name, LayerType::Tile);
        properties.interactive = false;
        Self {
            properties,
            options,
        }
    }

    /// Create a tile layer for OpenStreetMap
    pub fn openstreetmap(id: String, name: String) -> Self {
        Self::new(id, name)
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn attribution(&self) -> &str {
        &self.options.attribution
    }

    /// Builds the URL of one tile, rotating through subdomains by position
    pub fn tile_url(&self, coord: TileCoord) -> String {
        let subdomain = if self.options.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x + coord.y) % self.options.subdomains.len() as u32) as usize;
            self.options.subdomains[idx].as_str()
        };

        self.options
            .url_template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    /// Get tiles that should be visible in the current viewport
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let max_zoom = self.options.max_zoom.min(MAX_TILE_ZOOM);
        let zoom = (viewport.zoom.floor() as u8).clamp(self.options.min_zoom.min(max_zoom), max_zoom);
        let tiles_per_axis = 1u32 << zoom;

        let bounds = viewport.bounds();
        let north_west = LatLng::new(bounds.north_east.lat, bounds.south_west.lng);
        let south_east = LatLng::new(bounds.south_west.lat, bounds.north_east.lng);

        let min = TileCoord::from_lat_lng(&north_west, zoom);
        let max = TileCoord::from_lat_lng(&south_east, zoom);

        let mut tiles = Vec::new();
        for x in min.x..=max.x.min(tiles_per_axis - 1) {
            for y in min.y..=max.y.min(tiles_per_axis - 1) {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }

        tiles
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(&self.options).unwrap_or(serde_json::Value::Null)
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        self.options = serde_json::from_value(options)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    #[test]
    fn test_openstreetmap_layer() {
        let layer = TileLayer::openstreetmap("osm".to_string(), "OpenStreetMap".to_string());
        assert_eq!(layer.id(), "osm");
        assert_eq!(layer.layer_type(), LayerType::Tile);
        assert_eq!(layer.tile_options().max_zoom, 19);
        assert_eq!(layer.attribution(), "© OpenStreetMap contributors");
    }

    #[test]
    fn test_tile_url() {
        let layer = TileLayer::new("osm".to_string(), "OSM".to_string());
        assert_eq!(
            layer.tile_url(TileCoord::new(2446, 2063, 12)),
            "https://a.tile.openstreetmap.org/12/2446/2063.png"
        );
        assert_eq!(
            layer.tile_url(TileCoord::new(2447, 2063, 12)),
            "https://b.tile.openstreetmap.org/12/2447/2063.png"
        );
    }

    #[test]
    fn test_tile_url_without_subdomains() {
        let options = TileLayerOptions {
            url_template: "https://tile.example.org/{z}/{x}/{y}.png".to_string(),
            subdomains: Vec::new(),
            ..Default::default()
        };
        let layer = TileLayer::with_options("custom".to_string(), "Custom".to_string(), options);
        assert_eq!(
            layer.tile_url(TileCoord::new(1, 2, 3)),
            "https://tile.example.org/3/1/2.png"
        );
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let layer = TileLayer::new("osm".to_string(), "OSM".to_string());
        let viewport = Viewport::new(LatLng::new(-1.2921, 36.8219), 12.0, Point::new(800.0, 600.0));

        let tiles = layer.visible_tiles(&viewport);
        let center_tile = TileCoord::from_lat_lng(&viewport.center, 12);

        assert!(tiles.contains(&center_tile));
        assert!(tiles.iter().all(|t| t.z == 12 && t.is_valid()));
        // 800x600 at 256px per tile spans at most 5x4 tiles
        assert!(tiles.len() <= 20);
    }

    #[test]
    fn test_options_round_trip_through_json() {
        let mut layer = TileLayer::new("osm".to_string(), "OSM".to_string());
        let mut options = layer.options();
        options["max_zoom"] = serde_json::json!(17);

        layer.set_options(options).unwrap();
        assert_eq!(layer.tile_options().max_zoom, 17);
    }

    #[test]
    fn test_oversized_zoom_is_clamped() {
        let options: TileLayerOptions =
            serde_json::from_str(r#"{"max_zoom": 40, "min_zoom": 35}"#).unwrap();
        assert_eq!(options.max_zoom, 31);
        assert_eq!(options.min_zoom, 31);

        let layer = TileLayer::with_options(
            "deep".to_string(),
            "Deep".to_string(),
            TileLayerOptions {
                max_zoom: 40,
                ..Default::default()
            },
        );
        let viewport = Viewport::new(LatLng::new(-1.2921, 36.8219), 12.0, Point::new(800.0, 600.0));
        assert!(layer.visible_tiles(&viewport).iter().all(|t| t.z == 12));
    }
}
