use crate::core::constants::{DEFAULT_VIEWPORT_SIZE, OSM_MAX_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, LatLngBounds, Point, EARTH_RADIUS, MAX_LATITUDE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Options for [`Viewport::fit_bounds`], mirroring Leaflet's `fitBounds` options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitBoundsOptions {
    /// Pixels kept free on each side of the fitted bounds
    pub padding: f64,
    /// Upper limit for the chosen zoom, on top of the viewport's own limit
    pub max_zoom: Option<f64>,
}

impl Default for FitBoundsOptions {
    fn default() -> Self {
        Self {
            padding: 0.0,
            max_zoom: None,
        }
    }
}

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let max_zoom = OSM_MAX_ZOOM as f64;
        Self {
            center: Self::clamp_to_world(center),
            zoom: zoom.clamp(0.0, max_zoom),
            size,
            min_zoom: 0.0,
            max_zoom,
        }
    }

    /// Sets the center of the viewport with bounds checking
    pub fn set_center(&mut self, center: LatLng) {
        self.center = Self::clamp_to_world(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + LatLng::clamp_lat(lat_lng.lat).to_radians() / 2.0)
            .tan()
            .ln())
            * EARTH_RADIUS;

        let circumference = 2.0 * PI * EARTH_RADIUS;
        let pixel_x = (x + PI * EARTH_RADIUS) / circumference * scale;
        let pixel_y = (-y + PI * EARTH_RADIUS) / circumference * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let circumference = 2.0 * PI * EARTH_RADIUS;
        let x = (pixel.x / scale) * circumference - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - (pixel.y / scale) * circumference;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();

        LatLng::new(lat, lng)
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project(&self.center, None);
        self.project(lat_lng, None)
            .subtract(&origin)
            .add(&self.half_size())
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.project(&self.center, None);
        let world = pixel.subtract(&self.half_size()).add(&origin);
        self.unproject(&world, None)
    }

    /// Pans the viewport by the given pixel offset; returns the applied offset
    pub fn pan(&mut self, delta: Point) -> Point {
        let current = self.project(&self.center, None);
        let target = current.subtract(&delta);

        self.set_center(self.unproject(&target, None));

        let actual = self.project(&self.center, None);
        current.subtract(&actual)
    }

    /// Zooms the viewport to a specific level, keeping `focus_point` stationary
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);

        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus_screen) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus_screen);
                self.zoom = new_zoom;

                let new_focus_screen = self.lat_lng_to_pixel(&focus_lat_lng);
                let offset = focus_screen.subtract(&new_focus_screen);
                self.pan(offset);
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Fits the viewport to contain the given bounds.
    ///
    /// Picks the largest integer zoom at which the projected bounds fit
    /// inside the viewport minus `padding` on each side, never above
    /// `options.max_zoom`, and centers on the bounds.
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, options: &FitBoundsOptions) {
        let available = Point::new(
            (self.size.x - 2.0 * options.padding).max(0.0),
            (self.size.y - 2.0 * options.padding).max(0.0),
        );

        let upper = options
            .max_zoom
            .map_or(self.max_zoom, |cap| cap.min(self.max_zoom));

        let nw = LatLng::new(bounds.north_east.lat, bounds.south_west.lng);
        let se = LatLng::new(bounds.south_west.lat, bounds.north_east.lng);

        let mut best_zoom = self.min_zoom;
        for test_zoom in (self.min_zoom.ceil() as i32)..=(upper.floor() as i32) {
            let zoom = test_zoom as f64;
            let nw_px = self.project(&nw, Some(zoom));
            let se_px = self.project(&se, Some(zoom));

            let bounds_width = (se_px.x - nw_px.x).abs();
            let bounds_height = (se_px.y - nw_px.y).abs();

            if bounds_width <= available.x && bounds_height <= available.y {
                best_zoom = zoom;
            } else {
                break;
            }
        }

        log::debug!(
            "fit_bounds: center {:?} zoom {} (cap {})",
            bounds.center(),
            best_zoom,
            upper
        );

        self.set_center(bounds.center());
        self.set_zoom(best_zoom);
    }

    fn half_size(&self) -> Point {
        Point::new(self.size.x / 2.0, self.size.y / 2.0)
    }

    fn clamp_to_world(center: LatLng) -> LatLng {
        LatLng::new(
            center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            center.lng.clamp(-180.0, 180.0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let (width, height) = DEFAULT_VIEWPORT_SIZE;
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nairobi_viewport() -> Viewport {
        Viewport::new(
            LatLng::new(-1.2921, 36.8219),
            12.0,
            Point::new(800.0, 600.0),
        )
    }

    #[test]
    fn test_viewport_creation() {
        let viewport = nairobi_viewport();

        assert_eq!(viewport.zoom, 12.0);
        assert_eq!(viewport.center.lat, -1.2921);
        assert_eq!(viewport.size.x, 800.0);
        assert_eq!(viewport.max_zoom, 19.0);
    }

    #[test]
    fn test_center_pixel_is_center() {
        let viewport = nairobi_viewport();

        let center_pixel = viewport.lat_lng_to_pixel(&viewport.center);
        assert!((center_pixel.x - 400.0).abs() < 1e-6);
        assert!((center_pixel.y - 300.0).abs() < 1e-6);

        let back = viewport.pixel_to_lat_lng(&Point::new(400.0, 300.0));
        assert!((back.lat - viewport.center.lat).abs() < 1e-9);
        assert!((back.lng - viewport.center.lng).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_round_trip() {
        let viewport = nairobi_viewport();
        let pixel = Point::new(123.0, 456.0);
        let lat_lng = viewport.pixel_to_lat_lng(&pixel);
        let again = viewport.lat_lng_to_pixel(&lat_lng);

        assert!((again.x - pixel.x).abs() < 1e-6);
        assert!((again.y - pixel.y).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 15.0);
    }

    #[test]
    fn test_pan() {
        let mut viewport = nairobi_viewport();
        let original_center = viewport.center;

        // Dragging the map to the right reveals what lies west of the center
        viewport.pan(Point::new(100.0, 0.0));
        assert!(viewport.center.lng < original_center.lng);
        assert!((viewport.center.lat - original_center.lat).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_around_focus_point_keeps_it_fixed() {
        let mut viewport = nairobi_viewport();
        let focus = Point::new(600.0, 150.0);
        let under_cursor = viewport.pixel_to_lat_lng(&focus);

        viewport.zoom_to(13.0, Some(focus));

        let after = viewport.lat_lng_to_pixel(&under_cursor);
        assert_eq!(viewport.zoom, 13.0);
        assert!((after.x - focus.x).abs() < 1e-6);
        assert!((after.y - focus.y).abs() < 1e-6);
    }

    #[test]
    fn test_fit_bounds_picks_largest_fitting_zoom() {
        let mut viewport = nairobi_viewport();
        let bounds = LatLngBounds::from_coords(-1.32, 36.78, -1.18, 36.92);

        viewport.fit_bounds(&bounds, &FitBoundsOptions::default());

        // 0.14° is ~408px wide at zoom 12 and ~816px at zoom 13
        assert_eq!(viewport.zoom, 12.0);
        assert!((viewport.center.lat - -1.25).abs() < 1e-9);
        assert!((viewport.center.lng - 36.85).abs() < 1e-9);
    }

    #[test]
    fn test_fit_bounds_on_a_point_respects_cap() {
        let mut viewport = nairobi_viewport();
        let point = LatLng::new(-1.5, 36.9);
        let bounds = LatLngBounds::new(point, point);

        viewport.fit_bounds(
            &bounds,
            &FitBoundsOptions {
                padding: 0.0,
                max_zoom: Some(14.0),
            },
        );
        assert_eq!(viewport.zoom, 14.0);
        assert_eq!(viewport.center, point);

        viewport.fit_bounds(&bounds, &FitBoundsOptions::default());
        assert_eq!(viewport.zoom, viewport.max_zoom);
    }

    #[test]
    fn test_bounds_contains_center() {
        let viewport = nairobi_viewport();
        assert!(viewport.bounds().contains(&viewport.center));
    }
}
