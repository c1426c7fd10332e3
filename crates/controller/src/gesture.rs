//! Pointer/zoom gesture handling for a globe.
//!
//! A gesture starts as a tentative click and is classified on each update:
//! small unscaled movement stays a click (or a spurious event when the pointer
//! did not move at all), larger movement becomes a drag, and any scale change
//! turns it into a zoom for the rest of the gesture. Drags and zooms end with
//! a debounced `MoveEnd` that the host fires through [`GestureController::poll`].

use std::time::Instant;

use foundation::View;
use foundation::math::distance2;
use globe::{Globe, Manipulator, Orientation};
use runtime::EventBus;

use crate::config::GestureConfig;
use crate::events::GlobeEvent;
use crate::store::{MOVE_ENDED, MemoryOrientationStore, OrientationStore};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperationKind {
    Click,
    Spurious,
    Drag,
    Zoom,
}

/// The gesture in progress.
#[derive(Debug)]
struct Operation {
    kind: OperationKind,
    manipulator: Manipulator,
    start_scale: f64,
}

/// Geolocation lookup failure reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeolocationError(pub String);

impl std::fmt::Display for GeolocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "geolocation failed: {}", self.0)
    }
}

impl std::error::Error for GeolocationError {}

pub struct GestureController<S: OrientationStore = MemoryOrientationStore> {
    globe: Box<dyn Globe>,
    view: View,
    config: GestureConfig,
    store: S,
    events: EventBus<GlobeEvent>,
    op: Option<Operation>,
    /// Scale the host's zoom behaviour should report next.
    zoom_scale: f64,
    move_end_due: Option<Instant>,
}

impl<S: OrientationStore> GestureController<S> {
    /// Applies the stored orientation, if any, before taking control.
    pub fn new(mut globe: Box<dyn Globe>, view: View, store: S, config: GestureConfig) -> Self {
        if let Some(orientation) = store.load() {
            globe.set_orientation(&orientation, view);
        }
        let zoom_scale = globe.projection().scale();
        Self {
            globe,
            view,
            config,
            store,
            events: EventBus::new(),
            op: None,
            zoom_scale,
            move_end_due: None,
        }
    }

    pub fn globe(&self) -> &dyn Globe {
        self.globe.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale
    }

    pub fn operation(&self) -> Option<OperationKind> {
        self.op.as_ref().map(|op| op.kind)
    }

    pub fn events(&self) -> &[GlobeEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<GlobeEvent> {
        self.events.drain()
    }

    fn is_moving(&self) -> bool {
        matches!(
            self.operation(),
            Some(OperationKind::Drag | OperationKind::Zoom)
        )
    }

    /// Pointer pressed or a zoom gesture began.
    pub fn on_gesture_start(&mut self, pointer: [f64; 2]) {
        let start_scale = self.globe.projection().scale();
        if let Some(previous) = self.op.take() {
            previous.manipulator.end(self.globe.projection_mut());
        }
        let manipulator = self.globe.manipulator(pointer, start_scale);
        self.op = Some(Operation {
            kind: OperationKind::Click,
            manipulator,
            start_scale,
        });
    }

    /// Pointer moved and/or the zoom scale changed. `pointer` is `None` for
    /// inputs without a position, such as a keyboard zoom.
    pub fn on_gesture_update(&mut self, pointer: Option<[f64; 2]>, scale: f64) {
        let [min, max] = self.globe.scale_extent();
        let scale = scale.clamp(min, max);
        let Some(op) = self.op.as_mut() else {
            return;
        };

        if matches!(op.kind, OperationKind::Click | OperationKind::Spurious) {
            let distance = pointer.map_or(0.0, |p| distance2(p, op.manipulator.start_pointer()));
            if scale == op.start_scale && distance < self.config.min_move_px {
                op.kind = if distance > 0.0 {
                    OperationKind::Click
                } else {
                    OperationKind::Spurious
                };
                return;
            }
            self.events.emit(GlobeEvent::MoveStart);
            op.kind = OperationKind::Drag;
            tracing::debug!(distance, "gesture became a drag");
        }
        if scale != op.start_scale && op.kind != OperationKind::Zoom {
            op.kind = OperationKind::Zoom;
            tracing::debug!(scale, "gesture became a zoom");
        }

        let pointer = if op.kind == OperationKind::Zoom { None } else { pointer };
        op.manipulator.move_to(self.globe.projection_mut(), pointer, scale);
        self.zoom_scale = scale;
        self.events.emit(GlobeEvent::Move);
    }

    /// Pointer released or the zoom gesture ended.
    pub fn on_gesture_end(&mut self, now: Instant) {
        let Some(op) = self.op.take() else {
            return;
        };
        let start = op.manipulator.start_pointer();
        op.manipulator.end(self.globe.projection_mut());
        match op.kind {
            OperationKind::Click => {
                let coord = self.globe.projection().invert(start);
                self.events.emit(GlobeEvent::Click { point: start, coord });
            }
            OperationKind::Drag | OperationKind::Zoom => {
                self.move_end_due = Some(now + self.config.move_end_wait());
            }
            OperationKind::Spurious => {}
        }
    }

    /// Fire the debounced move end once it is due. A move end that comes due
    /// while another drag or zoom is running is dropped; that gesture's own
    /// end schedules the next one.
    pub fn poll(&mut self, now: Instant) {
        let Some(due) = self.move_end_due else {
            return;
        };
        if now < due {
            return;
        }
        self.move_end_due = None;
        if self.is_moving() {
            return;
        }
        let orientation = self.globe.orientation();
        self.store.save(&orientation, MOVE_ENDED);
        tracing::debug!(%orientation, "move ended");
        self.events.emit(GlobeEvent::MoveEnd);
    }

    /// Persist a new orientation and apply it. Changes tagged [`MOVE_ENDED`]
    /// originate here and are only stored.
    pub fn set_orientation(&mut self, orientation: &str, source: &str) {
        self.store.save(orientation, source);
        if source == MOVE_ENDED {
            return;
        }
        self.events.emit(GlobeEvent::MoveStart);
        self.globe.set_orientation(orientation, self.view);
        self.zoom_scale = self.globe.projection().scale();
        self.events.emit(GlobeEvent::MoveEnd);
    }

    /// Centre on the host-reported location through the same path as any
    /// other orientation change, then report it as a click.
    pub fn on_geolocation(&mut self, result: Result<[f64; 2], GeolocationError>) {
        let coord = match result {
            Ok(coord) => coord,
            Err(e) => {
                tracing::warn!(error = %e, "geolocation unavailable");
                return;
            }
        };
        if let Some(rotate) = self.globe.locate(coord) {
            let scale = self.globe.projection().scale();
            let orientation = Orientation::of(rotate, scale).to_string();
            self.set_orientation(&orientation, "geolocation");
        }
        if let Some(point) = self.globe.projection().project(coord) {
            self.events.emit(GlobeEvent::Click {
                point,
                coord: Some(coord),
            });
        }
    }
}
