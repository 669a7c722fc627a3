//! Read-only status readout: zoom percentage, pan origin and a rotation dial.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::geom::Point;
use crate::observe::Observer;
use crate::transform::View;
use crate::workspace::{WorkspaceEvent, WorkspaceState};

/// The values a status bar shows for one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusReadout {
    /// Zoom factor as a rounded percentage.
    pub zoom_percent: f64,
    pub origin: Point,
    pub rotation: f64,
}

impl StatusReadout {
    #[must_use]
    pub fn from_view(view: &View) -> Self {
        Self { zoom_percent: (view.zoom * 100.0).round(), origin: view.origin, rotation: view.rotation }
    }

    /// Tip of a dial hand of `radius` centered at `(cx, cy)`, pointing up at 0°
    /// and turning clockwise with the rotation.
    #[must_use]
    pub fn indicator_endpoint(&self, cx: f64, cy: f64, radius: f64) -> Point {
        let (sin, cos) = (self.rotation - 90.0).to_radians().sin_cos();
        Point::new(cx + radius * cos, cy + radius * sin)
    }

    /// Single-line rendering, e.g. `100%  0•0  15°`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StatusReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%  {}•{}  {}°", self.zoom_percent, self.origin.x, self.origin.y, self.rotation)
    }
}

/// Keeps the latest readout of a workspace.
pub struct StatusBoard {
    view: Rc<Cell<View>>,
    _observer: Observer<WorkspaceEvent>,
}

impl StatusBoard {
    /// Start following `workspace`. The board stops when dropped.
    #[must_use]
    pub fn connect(workspace: &WorkspaceState) -> Self {
        let view = Rc::new(Cell::new(workspace.view()));
        let mirror = Rc::clone(&view);
        let mut observer = Observer::new(move |event: &WorkspaceEvent| {
            let mut v = mirror.get();
            match *event {
                WorkspaceEvent::Origin(origin) => v.origin = origin,
                WorkspaceEvent::Rotation(rotation) => v.rotation = rotation,
                WorkspaceEvent::Zoom(zoom) => v.zoom = zoom,
                WorkspaceEvent::Zooming(_) | WorkspaceEvent::Panning(_) => return Ok(()),
            }
            mirror.set(v);
            trace!(zoom = v.zoom, rotation = v.rotation, "status: updated");
            Ok(())
        });
        observer.observe(workspace.events());
        Self { view, _observer: observer }
    }

    #[must_use]
    pub fn readout(&self) -> StatusReadout {
        StatusReadout::from_view(&self.view.get())
    }
}
