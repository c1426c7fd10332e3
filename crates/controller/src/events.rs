/// Notifications emitted by the gesture controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    /// A drag, zoom or reorientation began.
    MoveStart,
    /// The projection changed during a drag or zoom.
    Move,
    /// Motion settled; consumers should recompute derived state.
    MoveEnd,
    /// A click at `point`, with its geographic coordinate when the point is
    /// on the globe.
    Click {
        point: [f64; 2],
        coord: Option<[f64; 2]>,
    },
}

impl GlobeEvent {
    pub fn is_motion(&self) -> bool {
        matches!(self, GlobeEvent::MoveStart | GlobeEvent::Move | GlobeEvent::MoveEnd)
    }
}
