//! Driver dashboard: the driver's own position plus pending ride requests
//!
//! The driver marker comes from the device position or a map click, can be
//! dragged, and every placement writes the location field. Ride requests
//! whose pickup or destination is a coordinate pair get a marker each, and
//! the view is framed around everything plotted.

use crate::{
    core::{
        builder::MapBuilder, config::DriverMapConfig, geo::LatLng, map::Map,
        viewport::FitBoundsOptions,
    },
    data::{
        coordinate::{format_lat_lng, CoordinateFormat},
        rides::RideList,
    },
    geolocation::{GeolocationError, Geolocator},
    input::{InputEvent, MapEvent},
    layers::marker::Marker,
    page::Page,
    ui::popup::Popup,
    Result,
};

pub const DRIVER_MARKER_ID: &str = "driver";
pub const DRIVER_POPUP_TEXT: &str = "Your current location";

pub struct DriverMapController<P: Page> {
    map: Map,
    page: P,
    config: DriverMapConfig,
    rides: RideList,
    /// Ids of plotted ride markers, in plotting order
    ride_markers: Vec<String>,
}

impl<P: Page> DriverMapController<P> {
    /// Builds the driver map, or returns `None` when the page has no map container.
    /// Nothing is plotted until [`start`](Self::start) or the individual steps run.
    pub fn init(page: P, rides: impl Into<RideList>, config: DriverMapConfig) -> Option<Self> {
        if !page.has_element(&config.container_id) {
            log::debug!("no #{} on this page; driver map not started", config.container_id);
            return None;
        }

        let mut map = match MapBuilder::from_config(&config.map).build() {
            Ok(map) => map,
            Err(err) => {
                log::warn!("driver map could not be built: {}", err);
                return None;
            }
        };
        map.process_events();

        Some(Self {
            map,
            page,
            config,
            rides: rides.into(),
            ride_markers: Vec::new(),
        })
    }

    /// Settles the device position, plots the rides, then frames every marker
    pub async fn start<G: Geolocator + ?Sized>(&mut self, geolocator: &G) -> Result<()> {
        let position = geolocator.current_position().await;
        self.apply_location(position);
        self.plot_rides();
        self.fit_to_markers()?;
        Ok(())
    }

    /// Applies a geolocation outcome. A position recenters the map at the
    /// locate zoom and places the driver marker; a failure is only logged.
    /// Returns whether the driver marker was placed.
    pub fn apply_location(&mut self, position: std::result::Result<LatLng, GeolocationError>) -> bool {
        match position {
            Ok(lat_lng) => {
                if let Err(err) = self.map.set_view(lat_lng, self.config.locate_zoom) {
                    log::warn!("could not center on device position: {}", err);
                    return false;
                }
                self.place_driver(lat_lng)
            }
            Err(err) => {
                log::debug!("geolocation unavailable, waiting for a click: {}", err);
                false
            }
        }
    }

    /// Applies a geolocation outcome that arrived after the rides were plotted,
    /// then frames every marker again
    pub fn settle_location(
        &mut self,
        position: std::result::Result<LatLng, GeolocationError>,
    ) -> Result<bool> {
        if !self.apply_location(position) {
            return Ok(false);
        }
        self.fit_to_markers()
    }

    /// A click always places or moves the driver marker
    pub fn on_map_click(&mut self, lat_lng: LatLng) -> bool {
        self.place_driver(lat_lng)
    }

    /// Moves the driver marker to where it was dropped and writes the field.
    /// Drops of other markers, or before the driver marker exists, are ignored.
    pub fn on_marker_drag_end(&mut self, layer_id: &str, lat_lng: LatLng) -> bool {
        if layer_id != DRIVER_MARKER_ID {
            return false;
        }
        match self.map.move_marker(DRIVER_MARKER_ID, lat_lng) {
            Ok(()) => {
                self.write_location(&lat_lng);
                true
            }
            Err(err) => {
                log::warn!("driver marker drop ignored: {}", err);
                false
            }
        }
    }

    /// Feeds raw pointer input through the map and reacts to clicks and drops
    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        self.map.handle_input(input)?;
        for event in self.map.process_events() {
            match event {
                MapEvent::Click { lat_lng, .. } => {
                    self.on_map_click(lat_lng);
                }
                MapEvent::MarkerDragEnd { layer_id, lat_lng } => {
                    self.on_marker_drag_end(&layer_id, lat_lng);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn place_driver(&mut self, lat_lng: LatLng) -> bool {
        let placed = if self.map.marker(DRIVER_MARKER_ID).is_some() {
            self.map.move_marker(DRIVER_MARKER_ID, lat_lng)
        } else {
            let marker = Marker::new(DRIVER_MARKER_ID.to_string(), lat_lng)
                .with_draggable(true)
                .with_popup(Popup::new(DRIVER_POPUP_TEXT));
            self.map
                .add_marker(marker)
                .and_then(|_| self.map.open_popup(DRIVER_MARKER_ID))
        };

        match placed {
            Ok(()) => {
                self.write_location(&lat_lng);
                true
            }
            Err(err) => {
                log::warn!("could not place driver marker: {}", err);
                false
            }
        }
    }

    fn write_location(&mut self, lat_lng: &LatLng) {
        let text = format_lat_lng(lat_lng, CoordinateFormat::Fixed(self.config.location_precision));
        if !self.page.set_field_value(&self.config.location_field_id, &text) {
            log::warn!(
                "form field #{} is missing; location not written",
                self.config.location_field_id
            );
        }
    }

    /// Adds a marker for every ride pickup and destination that parses as a
    /// coordinate pair. Free text is skipped. Returns the number of markers added.
    pub fn plot_rides(&mut self) -> usize {
        let mut added = 0;

        for (index, ride) in self.rides.iter().enumerate() {
            let stops = [
                ("pickup", "Pickup", ride.pickup.as_deref(), ride.pickup_lat_lng()),
                (
                    "destination",
                    "Destination",
                    ride.destination.as_deref(),
                    ride.destination_lat_lng(),
                ),
            ];

            for (role, title, text, lat_lng) in stops {
                let (Some(text), Some(lat_lng)) = (text, lat_lng) else {
                    if let Some(text) = text {
                        log::debug!("ride {} {} is not a coordinate pair: {:?}", index, role, text);
                    }
                    continue;
                };

                let marker_id = format!("ride-{}-{}", index, role);
                if self.map.marker(&marker_id).is_some() {
                    continue;
                }

                let marker = Marker::new(marker_id.clone(), lat_lng)
                    .with_popup(Popup::titled(title, text));
                match self.map.add_marker(marker) {
                    Ok(()) => {
                        self.ride_markers.push(marker_id);
                        added += 1;
                    }
                    Err(err) => log::warn!("could not plot {}: {}", marker_id, err),
                }
            }
        }

        log::debug!("plotted {} ride markers from {} rides", added, self.rides.len());
        added
    }

    /// Frames the driver and ride markers: their bounds grown by the padding
    /// ratio on each side, at the largest zoom that shows them all. Markers
    /// that collapse to one point are shown at the point fit zoom instead of
    /// the deepest zoom. Leaves the view alone and returns false when there
    /// are no markers.
    pub fn fit_to_markers(&mut self) -> Result<bool> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.ride_markers.len() + 1);
        if self.map.marker(DRIVER_MARKER_ID).is_some() {
            ids.push(DRIVER_MARKER_ID);
        }
        ids.extend(self.ride_markers.iter().map(String::as_str));

        let Some(bounds) = self.map.marker_bounds(ids.as_slice()) else {
            return Ok(false);
        };

        let padded = bounds.pad(self.config.fit_padding_ratio);
        let options = FitBoundsOptions {
            padding: 0.0,
            max_zoom: padded.is_point().then_some(self.config.point_fit_zoom),
        };
        self.map.fit_bounds(&padded, &options)?;
        Ok(true)
    }

    pub fn driver_location(&self) -> Option<LatLng> {
        self.map.marker(DRIVER_MARKER_ID).map(Marker::position)
    }

    pub fn ride_marker_ids(&self) -> &[String] {
        &self.ride_markers
    }

    pub fn rides(&self) -> &RideList {
        &self.rides
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn page(&self) -> &P {
        &self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::rides::RideRequest, page::MemoryPage};

    fn driver_page() -> MemoryPage {
        MemoryPage::new()
            .with_container("driver-map")
            .with_input("driver-current-location")
    }

    fn controller(rides: Vec<RideRequest>) -> DriverMapController<MemoryPage> {
        DriverMapController::init(driver_page(), rides, DriverMapConfig::default()).unwrap()
    }

    #[test]
    fn test_guard_without_container() {
        let page = MemoryPage::new().with_container("map");
        assert!(DriverMapController::init(page, RideList::default(), DriverMapConfig::default())
            .is_none());
    }

    #[test]
    fn test_click_creates_then_moves_driver() {
        let mut driver = controller(Vec::new());

        assert!(driver.on_map_click(LatLng::new(-1.3, 36.8)));
        let marker = driver.map().marker(DRIVER_MARKER_ID).unwrap();
        assert!(marker.is_draggable());
        assert!(marker.is_popup_open());
        assert_eq!(
            driver.page().value("driver-current-location"),
            Some("-1.300000, 36.800000")
        );

        assert!(driver.on_map_click(LatLng::new(-1.25, 36.85)));
        assert_eq!(driver.map().markers().len(), 1);
        assert_eq!(driver.driver_location(), Some(LatLng::new(-1.25, 36.85)));
        assert_eq!(
            driver.page().value("driver-current-location"),
            Some("-1.250000, 36.850000")
        );
    }

    #[test]
    fn test_failed_location_is_ignored() {
        let mut driver = controller(Vec::new());
        assert!(!driver.apply_location(Err(GeolocationError::PermissionDenied)));
        assert_eq!(driver.map().viewport.zoom, 12.0);
        assert!(driver.driver_location().is_none());
        assert_eq!(driver.page().value("driver-current-location"), Some(""));
    }

    #[test]
    fn test_plot_rides_parses_each_field() {
        let mut driver = controller(vec![
            RideRequest::new("-1.3,36.8", "not an address"),
            RideRequest::new("Westlands", "-1.2, 36.9"),
        ]);

        assert_eq!(driver.plot_rides(), 2);
        assert_eq!(
            driver.ride_marker_ids(),
            &["ride-0-pickup".to_string(), "ride-1-destination".to_string()]
        );

        let popup = driver.map().marker("ride-1-destination").unwrap().popup().unwrap();
        assert_eq!(popup.to_html(), "<b>Destination</b><br/>-1.2, 36.9");

        // Plotting again adds nothing
        assert_eq!(driver.plot_rides(), 0);
    }

    #[test]
    fn test_fit_without_markers_keeps_view() {
        let mut driver = controller(vec![RideRequest::new("somewhere", "elsewhere")]);
        driver.plot_rides();
        assert!(!driver.fit_to_markers().unwrap());
        assert_eq!(driver.map().viewport.center, LatLng::new(-1.2921, 36.8219));
        assert_eq!(driver.map().viewport.zoom, 12.0);
    }

    #[test]
    fn test_close_rides_fit_past_the_locate_zoom() {
        let mut driver = controller(vec![RideRequest::new("-1.2921,36.8219", "-1.2941,36.8239")]);
        driver.apply_location(Err(GeolocationError::PermissionDenied));
        driver.plot_rides();
        assert!(driver.fit_to_markers().unwrap());

        // 0.002° padded to 0.0028° spans ~522px at zoom 18 and ~1044px at 19
        assert_eq!(driver.map().viewport.zoom, 18.0);
        let view = driver.map().viewport.bounds();
        assert!(view.contains(&LatLng::new(-1.2921, 36.8219)));
        assert!(view.contains(&LatLng::new(-1.2941, 36.8239)));
    }

    #[test]
    fn test_lone_driver_fit_uses_point_zoom() {
        let mut driver = controller(Vec::new());
        driver.on_map_click(LatLng::new(-1.5, 36.9));
        assert!(driver.fit_to_markers().unwrap());
        assert_eq!(driver.map().viewport.zoom, 14.0);
        assert_eq!(driver.map().viewport.center, LatLng::new(-1.5, 36.9));
    }

    #[test]
    fn test_drag_end_on_other_marker_is_ignored() {
        let mut driver = controller(Vec::new());
        assert!(!driver.on_marker_drag_end(DRIVER_MARKER_ID, LatLng::new(1.0, 1.0)));
        assert_eq!(driver.page().value("driver-current-location"), Some(""));

        driver.on_map_click(LatLng::new(-1.3, 36.8));
        assert!(!driver.on_marker_drag_end("ride-0-pickup", LatLng::new(1.0, 1.0)));
        assert_eq!(driver.driver_location(), Some(LatLng::new(-1.3, 36.8)));
        assert_eq!(
            driver.page().value("driver-current-location"),
            Some("-1.300000, 36.800000")
        );
    }

    #[test]
    fn test_drop_moves_marker_and_field_together() {
        let mut driver = controller(Vec::new());
        driver.on_map_click(LatLng::new(-1.3, 36.8));

        assert!(driver.on_marker_drag_end(DRIVER_MARKER_ID, LatLng::new(-1.0, 36.0)));
        assert_eq!(driver.driver_location(), Some(LatLng::new(-1.0, 36.0)));
        assert_eq!(
            driver.page().value("driver-current-location"),
            Some("-1.000000, 36.000000")
        );

        driver.fit_to_markers().unwrap();
        assert_eq!(driver.map().viewport.center, LatLng::new(-1.0, 36.0));
    }

    #[test]
    fn test_late_location_refits_around_rides() {
        let mut driver = controller(vec![RideRequest::new("-1.3,36.8", "-1.28,36.82")]);
        driver.plot_rides();
        driver.fit_to_markers().unwrap();
        assert!(driver.driver_location().is_none());

        assert!(driver.settle_location(Ok(LatLng::new(-1.2, 36.9))).unwrap());

        let view = driver.map().viewport.bounds();
        for id in [DRIVER_MARKER_ID, "ride-0-pickup", "ride-0-destination"] {
            let position = driver.map().marker(id).unwrap().position();
            assert!(view.contains(&position), "{} outside the view", id);
        }
        assert_eq!(
            driver.page().value("driver-current-location"),
            Some("-1.200000, 36.900000")
        );

        assert!(!driver.settle_location(Err(GeolocationError::Timeout)).unwrap());
    }
}
