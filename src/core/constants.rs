//! Core constants derived from Leaflet defaults and the ride-hailing pages.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Programmatic +/- zoom step for double click and wheel zoom.
pub const DEFAULT_ZOOM_DELTA: f64 = 1.0;

/// Marker icon default size (regular PNG).
pub const MARKER_ICON_SIZE: (u32, u32) = (25, 41);

/// Anchor inside the icon (hot-spot) in pixel coords.
pub const MARKER_ICON_ANCHOR: (u32, u32) = (12, 41);

/// Default map center: Nairobi CBD.
pub const DEFAULT_CENTER: (f64, f64) = (-1.2921, 36.8219);

/// City-level zoom used when a page first loads.
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Street-level zoom applied after the device reports its position.
pub const LOCATE_ZOOM: f64 = 14.0;

/// Fraction of the marker span added around every side when framing markers.
pub const FIT_BOUNDS_PADDING_RATIO: f64 = 0.2;

/// Decimal places written for the driver's location field.
pub const DRIVER_LOCATION_PRECISION: usize = 6;

/// Default viewport size in CSS pixels.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (800.0, 600.0);

/// OpenStreetMap tile server template.
pub const OSM_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Highest zoom the OpenStreetMap tile server renders.
pub const OSM_MAX_ZOOM: u8 = 19;

/// Highest zoom whose tile count per axis still fits a `u32`.
pub const MAX_TILE_ZOOM: u8 = 31;

/// Attribution the OpenStreetMap tile usage policy requires.
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";
