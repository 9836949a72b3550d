use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
pub const EARTH_RADIUS: f64 = 6378137.0;
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate only if both components are finite and in range
    pub fn checked(lat: f64, lng: f64) -> Option<Self> {
        let candidate = Self::new(lat, lng);
        candidate.is_valid().then_some(candidate)
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Clamps latitude to the range Web Mercator can project
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Wraps longitude into [-180, 180]
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// The same place with its longitude brought back onto the primary world copy
    pub fn wrap(&self) -> LatLng {
        LatLng::new(self.lat, Self::wrap_lng(self.lng))
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest bounds covering every point, or `None` for an empty input
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::new(*first, *first);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if the bounds intersect with another bounds
    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        !(other.north_east.lat < self.south_west.lat
            || other.south_west.lat > self.north_east.lat
            || other.north_east.lng < self.south_west.lng
            || other.south_west.lng > self.north_east.lng)
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Returns bounds grown on every side by `ratio` of the current span.
    /// A ratio of 0.2 adds 20% of the height above and below, and 20% of the
    /// width left and right.
    pub fn pad(&self, ratio: f64) -> LatLngBounds {
        let height_buffer = (self.south_west.lat - self.north_east.lat).abs() * ratio;
        let width_buffer = (self.south_west.lng - self.north_east.lng).abs() * ratio;

        LatLngBounds::new(
            LatLng::new(
                self.south_west.lat - height_buffer,
                self.south_west.lng - width_buffer,
            ),
            LatLng::new(
                self.north_east.lat + height_buffer,
                self.north_east.lng + width_buffer,
            ),
        )
    }

    /// Returns the union of this bounds with another bounds
    pub fn union(&self, other: &LatLngBounds) -> LatLngBounds {
        let south = self.south_west.lat.min(other.south_west.lat);
        let west = self.south_west.lng.min(other.south_west.lng);
        let north = self.north_east.lat.max(other.north_east.lat);
        let east = self.north_east.lng.max(other.north_east.lng);

        LatLngBounds::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Bounds covering a single point have zero area
    pub fn is_point(&self) -> bool {
        self.south_west == self.north_east
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Creates a tile coordinate from a LatLng and zoom level
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Self {
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let n = 2_f64.powi(zoom as i32);

        let x = ((lat_lng.lng + 180.0) / 360.0 * n).floor() as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor() as u32;

        Self::new(x.min(n as u32 - 1), y.min(n as u32 - 1), zoom)
    }

    /// Converts tile coordinate to LatLng (northwest corner)
    pub fn to_lat_lng(&self) -> LatLng {
        let n = 2_f64.powi(self.z as i32);
        let lng = self.x as f64 / n * 360.0 - 180.0;
        let lat_rad = (PI * (1.0 - 2.0 * self.y as f64 / n)).sinh().atan();

        LatLng::new(lat_rad.to_degrees(), lng)
    }

    /// Checks if the tile is valid for the given zoom level
    pub fn is_valid(&self) -> bool {
        let max_coord = 2_u32.pow(self.z as u32);
        self.x < max_coord && self.y < max_coord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(-1.2921, 36.8219);
        assert_eq!(coord.lat, -1.2921);
        assert_eq!(coord.lng, 36.8219);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(LatLng::checked(90.0, 180.0).is_some());
        assert!(LatLng::checked(90.5, 0.0).is_none());
        assert!(LatLng::checked(0.0, -180.1).is_none());
        assert!(LatLng::checked(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(LatLng::wrap_lng(36.8), 36.8);
        assert_eq!(LatLng::wrap_lng(180.0), 180.0);
        assert!((LatLng::wrap_lng(396.8) - 36.8).abs() < 1e-9);
        assert!((LatLng::wrap_lng(-190.0) - 170.0).abs() < 1e-9);
        assert!((LatLng::wrap_lng(-540.0) - -180.0).abs() < 1e-9);
        assert!(LatLng::new(-1.3, 396.8).wrap().is_valid());
    }

    #[test]
    fn test_bounds_from_points() {
        let points = [
            LatLng::new(-1.3, 36.8),
            LatLng::new(-1.2, 36.9),
            LatLng::new(-1.25, 36.7),
        ];
        let bounds = LatLngBounds::from_points(&points).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-1.3, 36.7));
        assert_eq!(bounds.north_east, LatLng::new(-1.2, 36.9));

        assert!(LatLngBounds::from_points(&Vec::<LatLng>::new()).is_none());
    }

    #[test]
    fn test_bounds_pad() {
        let bounds = LatLngBounds::from_coords(0.0, 10.0, 10.0, 30.0);
        let padded = bounds.pad(0.2);
        assert_eq!(padded.south_west, LatLng::new(-2.0, 6.0));
        assert_eq!(padded.north_east, LatLng::new(12.0, 34.0));
        assert_eq!(padded.center(), bounds.center());
    }

    #[test]
    fn test_pad_point_bounds_stays_a_point() {
        let point = LatLng::new(-1.5, 36.9);
        let bounds = LatLngBounds::new(point, point).pad(0.2);
        assert!(bounds.is_point());
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(-2.0, 36.0, -1.0, 37.0);
        assert!(bounds.contains(&LatLng::new(-1.5, 36.5)));
        assert!(!bounds.contains(&LatLng::new(0.5, 36.5)));
    }

    #[test]
    fn test_bounds_intersect_and_union() {
        let city = LatLngBounds::from_coords(-1.4, 36.7, -1.2, 36.9);
        let east = LatLngBounds::from_coords(-1.3, 36.85, -1.1, 37.0);
        let coast = LatLngBounds::from_coords(-4.1, 39.5, -3.9, 39.8);

        assert!(city.intersects(&east));
        assert!(!city.intersects(&coast));

        let both = city.union(&east);
        assert_eq!(both.south_west, LatLng::new(-1.4, 36.7));
        assert_eq!(both.north_east, LatLng::new(-1.1, 37.0));
    }

    #[test]
    fn test_tile_coord_conversion() {
        let lat_lng = LatLng::new(-1.2921, 36.8219);
        let tile = TileCoord::from_lat_lng(&lat_lng, 12);
        assert!(tile.is_valid());

        let corner = tile.to_lat_lng();
        // North-west corner is within one tile of the point
        assert!(corner.lat >= lat_lng.lat && corner.lat - lat_lng.lat < 0.1);
        assert!(corner.lng <= lat_lng.lng && lat_lng.lng - corner.lng < 0.1);
    }
}
