//! Rider booking page: two clicks pick the pickup and the destination

use crate::{
    core::{builder::MapBuilder, config::RiderMapConfig, geo::LatLng, map::Map},
    data::coordinate::{format_lat_lng, CoordinateFormat},
    input::{InputEvent, MapEvent},
    layers::marker::Marker,
    page::Page,
    ui::popup::Popup,
    Result,
};

pub const PICKUP_MARKER_ID: &str = "pickup";
pub const DESTINATION_MARKER_ID: &str = "destination";

/// Which points the rider has chosen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiderState {
    Empty,
    PickupSet,
    BothSet,
}

pub struct RiderMapController<P: Page> {
    map: Map,
    page: P,
    config: RiderMapConfig,
    state: RiderState,
}

impl<P: Page> RiderMapController<P> {
    /// Builds the rider map, or returns `None` when the page has no map container
    pub fn init(page: P, config: RiderMapConfig) -> Option<Self> {
        if !page.has_element(&config.container_id) {
            log::debug!("no #{} on this page; rider map not started", config.container_id);
            return None;
        }

        let mut map = match MapBuilder::from_config(&config.map).build() {
            Ok(map) => map,
            Err(err) => {
                log::warn!("rider map could not be built: {}", err);
                return None;
            }
        };
        map.process_events();

        Some(Self {
            map,
            page,
            config,
            state: RiderState::Empty,
        })
    }

    /// Handles a click at a map coordinate and returns the resulting state.
    /// Once both points are set, further clicks change nothing.
    pub fn on_map_click(&mut self, lat_lng: LatLng) -> RiderState {
        let (marker_id, label, field_id, next) = match self.state {
            RiderState::Empty => (
                PICKUP_MARKER_ID,
                "Pickup",
                &self.config.pickup_field_id,
                RiderState::PickupSet,
            ),
            RiderState::PickupSet => (
                DESTINATION_MARKER_ID,
                "Destination",
                &self.config.destination_field_id,
                RiderState::BothSet,
            ),
            RiderState::BothSet => return self.state,
        };

        let marker = Marker::new(marker_id.to_string(), lat_lng).with_popup(Popup::new(label));
        if let Err(err) = self.map.add_marker(marker) {
            log::warn!("could not place {} marker: {}", marker_id, err);
            return self.state;
        }
        if let Err(err) = self.map.open_popup(marker_id) {
            log::warn!("could not open {} popup: {}", marker_id, err);
        }

        let text = format_lat_lng(&lat_lng, CoordinateFormat::Shortest);
        if !self.page.set_field_value(field_id, &text) {
            log::warn!("form field #{} is missing; {} not written", field_id, marker_id);
        }

        self.state = next;
        log::debug!("rider {} set to {}", marker_id, text);
        self.state
    }

    /// Feeds raw pointer input through the map and reacts to resulting clicks
    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        self.map.handle_input(input)?;
        for event in self.map.process_events() {
            if let MapEvent::Click { lat_lng, .. } = event {
                self.on_map_click(lat_lng);
            }
        }
        Ok(())
    }

    pub fn state(&self) -> RiderState {
        self.state
    }

    pub fn pickup(&self) -> Option<LatLng> {
        self.map.marker(PICKUP_MARKER_ID).map(Marker::position)
    }

    pub fn destination(&self) -> Option<LatLng> {
        self.map.marker(DESTINATION_MARKER_ID).map(Marker::position)
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
