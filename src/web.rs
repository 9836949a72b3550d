//! Browser bindings: DOM-backed page, `navigator.geolocation`, and the
//! JS entry points for both pages

use crate::{
    controllers::{driver::DriverMapController, rider::RiderMapController, DRIVER_MARKER_ID},
    core::{
        config::{DriverMapConfig, RiderMapConfig},
        geo::{LatLng, Point},
    },
    data::rides::RideList,
    geolocation::{validate_position, GeolocationError, Geolocator},
    input::InputEvent,
    page::Page,
};
use async_trait::async_trait;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, GeolocationPosition, GeolocationPositionError, HtmlInputElement};

fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

fn setup() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// [`Page`] over a live document
pub struct DomPage {
    document: Document,
}

impl DomPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The current window's document, if there is one
    pub fn current() -> Option<Self> {
        document().map(Self::new)
    }
}

impl Page for DomPage {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn set_field_value(&mut self, id: &str, value: &str) -> bool {
        match self
            .document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        {
            Some(input) => {
                input.set_value(value);
                true
            }
            None => false,
        }
    }
}

/// Single-shot `navigator.geolocation.getCurrentPosition` with browser defaults
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserGeolocator;

fn position_error(value: JsValue) -> GeolocationError {
    match value.dyn_into::<GeolocationPositionError>() {
        Ok(err) => match err.code() {
            GeolocationPositionError::PERMISSION_DENIED => GeolocationError::PermissionDenied,
            GeolocationPositionError::TIMEOUT => GeolocationError::Timeout,
            _ => GeolocationError::PositionUnavailable(err.message()),
        },
        Err(other) => GeolocationError::PositionUnavailable(
            other.as_string().unwrap_or_else(|| "unknown error".to_string()),
        ),
    }
}

#[async_trait(?Send)]
impl Geolocator for BrowserGeolocator {
    async fn current_position(&self) -> Result<LatLng, GeolocationError> {
        let window = web_sys::window().ok_or(GeolocationError::Unsupported)?;
        let geolocation = window
            .navigator()
            .geolocation()
            .map_err(|_| GeolocationError::Unsupported)?;

        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            if let Err(err) =
                geolocation.get_current_position_with_error_callback(&resolve, Some(&reject))
            {
                let _ = reject.call1(&JsValue::NULL, &err);
            }
        });

        let value = JsFuture::from(promise).await.map_err(position_error)?;
        let position = value.dyn_into::<GeolocationPosition>().map_err(|_| {
            GeolocationError::PositionUnavailable("not a GeolocationPosition".to_string())
        })?;
        let coords = position.coords();
        validate_position(coords.latitude(), coords.longitude())
    }
}

/// Rider page handle returned to JS
#[wasm_bindgen]
pub struct WasmRiderMap {
    inner: RiderMapController<DomPage>,
}

#[wasm_bindgen]
impl WasmRiderMap {
    /// Click at a map coordinate; returns the rider state name
    pub fn click(&mut self, lat: f64, lng: f64) -> String {
        format!("{:?}", self.inner.on_map_click(LatLng::new(lat, lng)))
    }

    /// Click at a container pixel
    pub fn click_at(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.inner
            .handle_input(InputEvent::click(x, y))
            .map_err(to_js_error)
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .handle_input(InputEvent::Resize {
                size: Point::new(width, height),
            })
            .map_err(to_js_error)
    }

    pub fn state(&self) -> String {
        format!("{:?}", self.inner.state())
    }
}

/// Starts the rider map on `#map`. Returns nothing when the page has no map.
#[wasm_bindgen]
pub fn init_rider_map() -> Option<WasmRiderMap> {
    setup();
    let page = DomPage::current()?;
    RiderMapController::init(page, RiderMapConfig::default()).map(|inner| WasmRiderMap { inner })
}

/// Driver page handle returned to JS. The geolocation task shares the
/// controller, so the handle is usable while the position is still pending.
#[wasm_bindgen]
pub struct WasmDriverMap {
    inner: Rc<RefCell<DriverMapController<DomPage>>>,
}

#[wasm_bindgen]
impl WasmDriverMap {
    pub fn click(&mut self, lat: f64, lng: f64) -> bool {
        self.inner.borrow_mut().on_map_click(LatLng::new(lat, lng))
    }

    /// The driver marker was dropped at a new coordinate
    pub fn drag_end(&mut self, lat: f64, lng: f64) -> bool {
        self.inner
            .borrow_mut()
            .on_marker_drag_end(DRIVER_MARKER_ID, LatLng::new(lat, lng))
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .handle_input(InputEvent::Resize {
                size: Point::new(width, height),
            })
            .map_err(to_js_error)
    }

    pub fn center(&self) -> Vec<f64> {
        let center = self.inner.borrow().map().viewport.center;
        vec![center.lat, center.lng]
    }

    pub fn zoom(&self) -> f64 {
        self.inner.borrow().map().viewport.zoom
    }
}

fn rides_from_js(rides: &JsValue) -> RideList {
    if rides.is_undefined() || rides.is_null() {
        return RideList::default();
    }
    match js_sys::JSON::stringify(rides) {
        Ok(json) => RideList::from_json(&String::from(json)),
        Err(_) => {
            log::warn!("ride list could not be serialized; no rides plotted");
            RideList::default()
        }
    }
}

/// Starts the driver map on `#driver-map`: plots `rides` and frames them right
/// away, then places the driver and frames again once the device position
/// settles. Clicks work while the position is pending. Returns nothing when
/// the page has no driver map.
#[wasm_bindgen]
pub fn start_driver_map(rides: JsValue) -> Option<WasmDriverMap> {
    setup();
    let Some(page) = DomPage::current() else {
        web_sys::console::warn_1(&JsValue::from_str("no document; driver map not started"));
        return None;
    };

    let mut controller =
        DriverMapController::init(page, rides_from_js(&rides), DriverMapConfig::default())?;
    controller.plot_rides();
    if let Err(err) = controller.fit_to_markers() {
        log::warn!("could not frame ride markers: {}", err);
    }

    let inner = Rc::new(RefCell::new(controller));
    let pending = Rc::clone(&inner);
    spawn_local(async move {
        let position = BrowserGeolocator.current_position().await;
        if let Err(err) = pending.borrow_mut().settle_location(position) {
            log::warn!("could not frame markers after geolocation: {}", err);
        }
    });

    Some(WasmDriverMap { inner })
}
