use crate::{
    core::{
        constants::DEFAULT_ZOOM_DELTA,
        geo::{LatLng, LatLngBounds, Point},
        viewport::{FitBoundsOptions, Viewport},
    },
    input::{Action, EventManager, InputEvent, InputHandler, MapEvent, MapOperations},
    layers::{base::LayerTrait, manager::LayerManager, marker::Marker},
    MapError, Result,
};

#[derive(Debug, Clone)]
pub struct MapOptions {
    pub dragging: bool,
    pub scroll_wheel_zoom: bool,
    pub double_click_zoom: bool,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    pub zoom_delta: f64,
    /// Opening a popup closes any other open popup
    pub auto_close_popups: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            dragging: true,
            scroll_wheel_zoom: true,
            double_click_zoom: true,
            min_zoom: None,
            max_zoom: None,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            auto_close_popups: true,
        }
    }
}

pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    event_manager: EventManager,
    options: MapOptions,
    input_handler: InputHandler,
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let viewport = Viewport::new(center, zoom, size);
        Self::with_options(viewport, MapOptions::default())
    }

    pub fn with_options(viewport: Viewport, options: MapOptions) -> Self {
        let mut input_handler = InputHandler::new();
        input_handler.pan_on_drag = options.dragging;
        input_handler.zoom_on_wheel = options.scroll_wheel_zoom;
        input_handler.zoom_on_double_click = options.double_click_zoom;
        input_handler.zoom_delta = options.zoom_delta;

        let mut map = Self {
            viewport,
            layer_manager: LayerManager::new(),
            event_manager: EventManager::new(),
            options,
            input_handler,
        };

        let min = map.options.min_zoom.unwrap_or(map.viewport.min_zoom);
        let max = map.options.max_zoom.unwrap_or(map.viewport.max_zoom);
        map.viewport.set_zoom_limits(min, max);

        map
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        let old_center = self.viewport.center;
        let old_zoom = self.viewport.zoom;

        MapOperations::set_view(&mut self.viewport, center, zoom)?;
        self.emit_view_change(old_center, old_zoom);

        Ok(())
    }

    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) -> Result<()> {
        let old_zoom = self.viewport.zoom;

        MapOperations::zoom_to(&mut self.viewport, zoom, focus_point)?;

        if self.viewport.zoom != old_zoom {
            self.event_manager.emit(MapEvent::ZoomEnd {
                zoom: self.viewport.zoom,
            });
        }

        Ok(())
    }

    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, options: &FitBoundsOptions) -> Result<()> {
        let old_center = self.viewport.center;
        let old_zoom = self.viewport.zoom;

        MapOperations::fit_bounds(&mut self.viewport, bounds, options)?;
        self.emit_view_change(old_center, old_zoom);

        Ok(())
    }

    fn emit_view_change(&mut self, old_center: LatLng, old_zoom: f64) {
        if self.viewport.center != old_center || self.viewport.zoom != old_zoom {
            self.event_manager.emit(MapEvent::ViewChanged {
                center: self.viewport.center,
                zoom: self.viewport.zoom,
            });
        }
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;
        self.event_manager.emit(MapEvent::LayerAdd { layer_id });
        Ok(())
    }

    pub fn add_marker(&mut self, marker: Marker) -> Result<()> {
        if !marker.position().is_valid() {
            let position = marker.position();
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                position.lat, position.lng
            ))
            .into());
        }
        self.add_layer(Box::new(marker))
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<()> {
        if self.layer_manager.remove_layer(layer_id).is_some() {
            self.event_manager.emit(MapEvent::LayerRemove {
                layer_id: layer_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn marker(&self, layer_id: &str) -> Option<&Marker> {
        self.layer_manager.marker(layer_id)
    }

    pub fn markers(&self) -> Vec<&Marker> {
        self.layer_manager.markers()
    }

    pub fn with_marker_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut Marker) -> R,
    {
        self.layer_manager.marker_mut(layer_id).map(f)
    }

    /// Moves an existing marker
    pub fn move_marker(&mut self, layer_id: &str, position: LatLng) -> Result<()> {
        if !position.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                position.lat, position.lng
            ))
            .into());
        }
        self.with_marker_mut(layer_id, |marker| marker.set_position(position))
            .ok_or_else(|| MapError::Layer(format!("no marker '{}'", layer_id)).into())
    }

    /// Opens a marker's popup, closing the others when `auto_close_popups` is set
    pub fn open_popup(&mut self, layer_id: &str) -> Result<()> {
        let has_popup = self
            .layer_manager
            .marker(layer_id)
            .ok_or_else(|| MapError::Layer(format!("no marker '{}'", layer_id)))?
            .popup()
            .is_some();
        if !has_popup {
            return Err(MapError::Layer(format!("marker '{}' has no popup", layer_id)).into());
        }

        if self.options.auto_close_popups {
            self.layer_manager.for_each_marker_mut(|marker| marker.close_popup());
        }
        if let Some(marker) = self.layer_manager.marker_mut(layer_id) {
            marker.open_popup();
        }

        self.event_manager.emit(MapEvent::PopupOpen {
            layer_id: layer_id.to_string(),
        });
        Ok(())
    }

    /// Bounds covering the given markers; unknown ids are skipped
    pub fn marker_bounds<S: AsRef<str>>(&self, layer_ids: &[S]) -> Option<LatLngBounds> {
        let positions: Vec<LatLng> = layer_ids
            .iter()
            .filter_map(|id| self.layer_manager.marker(id.as_ref()))
            .map(|marker| marker.position())
            .collect();
        LatLngBounds::from_points(&positions)
    }

    /// Topmost visible marker whose icon covers the pixel
    fn marker_at(&self, pixel: &Point, draggable_only: bool) -> Option<String> {
        self.layer_manager
            .markers()
            .into_iter()
            .rev()
            .find(|marker| {
                marker.is_visible()
                    && (!draggable_only || marker.is_draggable())
                    && marker.contains_pixel(&self.viewport, pixel)
            })
            .map(|marker| marker.id().to_string())
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    pub fn handle_input(&mut self, input: InputEvent) -> Result<()> {
        let marker_hit = match &input {
            InputEvent::DragStart { position } => self.marker_at(position, true),
            _ => None,
        };

        let actions = self
            .input_handler
            .handle_event(input, self.viewport.zoom, marker_hit);

        for action in actions {
            match action {
                Action::Click { position } => match self.marker_at(&position, false) {
                    // Clicks on a marker open its popup and stay off the map
                    Some(layer_id) => {
                        if self
                            .layer_manager
                            .marker(&layer_id)
                            .is_some_and(|marker| marker.popup().is_some())
                        {
                            self.open_popup(&layer_id)?;
                        }
                    }
                    None => {
                        // Clicks on a repeated world copy report the primary longitude
                        let lat_lng = self.viewport.pixel_to_lat_lng(&position).wrap();
                        self.event_manager.emit(MapEvent::Click {
                            lat_lng,
                            pixel: position,
                        });
                    }
                },
                Action::Pan { delta } => {
                    MapOperations::pan(&mut self.viewport, delta)?;
                }
                Action::EndPan => {
                    self.event_manager.emit(MapEvent::MoveEnd {
                        center: self.viewport.center,
                    });
                }
                Action::Zoom { level, focus_point } => {
                    self.zoom_to(level, focus_point)?;
                }
                Action::MoveMarker { layer_id, delta } => {
                    let viewport = &self.viewport;
                    if let Some(marker) = self.layer_manager.marker_mut(&layer_id) {
                        let pixel = viewport.lat_lng_to_pixel(&marker.position()).add(&delta);
                        marker.set_position(viewport.pixel_to_lat_lng(&pixel).wrap());
                    }
                }
                Action::DropMarker { layer_id } => {
                    if let Some(marker) = self.layer_manager.marker(&layer_id) {
                        let lat_lng = marker.position();
                        self.event_manager
                            .emit(MapEvent::MarkerDragEnd { layer_id, lat_lng });
                    }
                }
                Action::Resize { size } => self.viewport.set_size(size),
            }
        }

        Ok(())
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }
    pub fn options(&self) -> &MapOptions {
        &self.options
    }
}
