use crate::{
    core::{
        constants::DEFAULT_ZOOM_DELTA,
        geo::{LatLng, LatLngBounds, Point},
        viewport::{FitBoundsOptions, Viewport},
    },
    input::events::{InputEvent, MapEvent, MouseButton},
    prelude::{HashMap, VecDeque},
    MapError, Result,
};

/// What an input event asks the map to do
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Plain click at a container pixel
    Click { position: Point },
    /// Move the view by a pixel delta
    Pan { delta: Point },
    /// Pan gesture finished
    EndPan,
    /// Zoom, optionally around a container pixel
    Zoom {
        level: f64,
        focus_point: Option<Point>,
    },
    /// Move a marker by a pixel delta
    MoveMarker { layer_id: String, delta: Point },
    /// Marker drag finished
    DropMarker { layer_id: String },
    /// Container size changed
    Resize { size: Point },
}

/// What the current drag gesture is moving
#[derive(Debug, Clone, PartialEq)]
enum DragTarget {
    Map,
    Marker(String),
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Drains the queue, running listeners for each event in order
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

/// Map operation implementations over a viewport
pub struct MapOperations;

impl MapOperations {
    /// Set the map view to a specific center and zoom
    pub fn set_view(viewport: &mut Viewport, center: LatLng, zoom: f64) -> Result<()> {
        if !center.is_valid() {
            return Err(MapError::InvalidCoordinates(format!("{}, {}", center.lat, center.lng)).into());
        }
        viewport.set_center(center);
        viewport.set_zoom(zoom);
        Ok(())
    }

    /// Pan the map by a pixel delta
    pub fn pan(viewport: &mut Viewport, delta: Point) -> Result<Point> {
        Ok(viewport.pan(delta))
    }

    /// Zoom to a specific level with optional focus point
    pub fn zoom_to(viewport: &mut Viewport, zoom: f64, focus_point: Option<Point>) -> Result<()> {
        viewport.zoom_to(zoom, focus_point);
        Ok(())
    }

    /// Fit the viewport to the given bounds
    pub fn fit_bounds(
        viewport: &mut Viewport,
        bounds: &LatLngBounds,
        options: &FitBoundsOptions,
    ) -> Result<()> {
        viewport.fit_bounds(bounds, options);
        Ok(())
    }
}

/// Input handler that turns raw pointer events into map actions
pub struct InputHandler {
    pub enabled: bool,
    pub zoom_on_wheel: bool,
    pub zoom_on_double_click: bool,
    pub pan_on_drag: bool,
    pub zoom_delta: f64,
    drag: Option<DragTarget>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            enabled: true,
            zoom_on_wheel: true,
            zoom_on_double_click: true,
            pan_on_drag: true,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            drag: None,
        }
    }

    /// Whether a drag gesture is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Translates one input event into actions.
    ///
    /// `marker_hit` names the draggable marker under the pointer, if any; it is
    /// only consulted for `DragStart`.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        current_zoom: f64,
        marker_hit: Option<String>,
    ) -> Vec<Action> {
        if !self.enabled {
            return Vec::new();
        }

        match event {
            InputEvent::Click {
                position,
                button: MouseButton::Left,
            } => vec![Action::Click { position }],
            InputEvent::Click { .. } => Vec::new(),
            InputEvent::DoubleClick { position } if self.zoom_on_double_click => {
                vec![Action::Zoom {
                    level: current_zoom + self.zoom_delta,
                    focus_point: Some(position),
                }]
            }
            InputEvent::Scroll { delta, position } if self.zoom_on_wheel && delta != 0.0 => {
                let step = if delta > 0.0 {
                    self.zoom_delta
                } else {
                    -self.zoom_delta
                };
                vec![Action::Zoom {
                    level: current_zoom + step,
                    focus_point: Some(position),
                }]
            }
            InputEvent::DragStart { .. } => {
                self.drag = match marker_hit {
                    Some(layer_id) => Some(DragTarget::Marker(layer_id)),
                    None if self.pan_on_drag => Some(DragTarget::Map),
                    None => None,
                };
                Vec::new()
            }
            InputEvent::Drag { delta } => match &self.drag {
                Some(DragTarget::Marker(layer_id)) => vec![Action::MoveMarker {
                    layer_id: layer_id.clone(),
                    delta,
                }],
                Some(DragTarget::Map) => vec![Action::Pan { delta }],
                None => Vec::new(),
            },
            InputEvent::DragEnd => match self.drag.take() {
                Some(DragTarget::Marker(layer_id)) => vec![Action::DropMarker { layer_id }],
                Some(DragTarget::Map) => vec![Action::EndPan],
                None => Vec::new(),
            },
            InputEvent::Resize { size } => vec![Action::Resize { size }],
            _ => Vec::new(),
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
