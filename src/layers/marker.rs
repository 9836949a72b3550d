use crate::{
    core::{
        constants::{MARKER_ICON_ANCHOR, MARKER_ICON_SIZE},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    ui::popup::Popup,
    MapError, Result,
};
use serde::Deserialize;

/// Partial update accepted by [`Marker::set_options`]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarkerOptions {
    position: Option<LatLng>,
    popup: Option<String>,
    draggable: Option<bool>,
}

pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    popup: Option<Popup>,
    draggable: bool,
}

impl Marker {
    pub fn new(id: String, position: LatLng) -> Self {
        let properties = LayerProperties::new(id, "Marker".to_string(), LayerType::Marker);
        Self {
            properties,
            position,
            popup: None,
            draggable: false,
        }
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup.as_ref().is_some_and(|popup| popup.visible)
    }

    /// Opens the bound popup; returns false when the marker has none
    pub fn open_popup(&mut self) -> bool {
        match self.popup.as_mut() {
            Some(popup) => {
                popup.show();
                true
            }
            None => false,
        }
    }

    pub fn close_popup(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.hide();
        }
    }

    /// Whether a container pixel falls on the marker icon.
    /// The icon hangs above its anchor, which sits on the coordinate.
    pub fn contains_pixel(&self, viewport: &Viewport, pixel: &Point) -> bool {
        let anchor = viewport.lat_lng_to_pixel(&self.position);
        let left = anchor.x - MARKER_ICON_ANCHOR.0 as f64;
        let top = anchor.y - MARKER_ICON_ANCHOR.1 as f64;

        pixel.x >= left
            && pixel.x <= left + MARKER_ICON_SIZE.0 as f64
            && pixel.y >= top
            && pixel.y <= top + MARKER_ICON_SIZE.1 as f64
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(Marker, properties);

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "position": {
                "lat": self.position.lat,
                "lng": self.position.lng
            },
            "popup": self.popup.as_ref().map(|popup| popup.to_html()),
            "draggable": self.draggable
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        let options: MarkerOptions = serde_json::from_value(options).map_err(MapError::from)?;

        if let Some(position) = options.position {
            if !position.is_valid() {
                return Err(MapError::InvalidCoordinates(format!(
                    "{}, {}",
                    position.lat, position.lng
                ))
                .into());
            }
            self.position = position;
        }
        if let Some(text) = options.popup {
            self.popup = Some(Popup::new(text));
        }
        if let Some(draggable) = options.draggable {
            self.draggable = draggable;
        }
        Ok(())
    }
}
