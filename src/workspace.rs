//! Workspace gesture state: pan origin, rotation and zoom.
//!
//! [`WorkspaceState`] is the testable core. It turns decoded input into view
//! changes and announces each change as a [`WorkspaceEvent`]. Layers and the
//! status readout never read the state back; they mirror what the events tell
//! them.
//!
//! [`Workspace`] wraps the state in shared ownership so a project observer can
//! attach newly added layers to it, and forwards every gesture to the core.
//!
//! Gestures compose freely and each keeps its own session value:
//!
//! - **Pan**: space arms it, a pointer drag moves the origin, releasing space
//!   disarms it.
//! - **Zoom**: ctrl + wheel. The session ends once no qualifying wheel tick
//!   arrived for `zoom_settle_ms`; hosts drive that through [`WorkspaceState::tick`]
//!   or a native timer calling [`WorkspaceState::end_zoom_session`].
//! - **Rotation**: `[` and `]` in fixed steps.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::consts::{FULL_TURN_DEG, ZOOM_MAX, ZOOM_MIN};
use crate::error::{Error, Result};
use crate::geom::{Point, Rect};
use crate::input::{Cursor, Key, Modifiers, WheelDelta, WheelResponse};
use crate::observe::{Observable, Observer, SubscriptionId};
use crate::project::{Project, ProjectEvent};
use crate::surface::Surface;
use crate::transform::View;

/// A change of workspace view state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkspaceEvent {
    /// New pan origin (cartesian).
    Origin(Point),
    /// New rotation in degrees, `[0, 360)`.
    Rotation(f64),
    /// New zoom factor.
    Zoom(f64),
    /// A zoom session started (`true`) or settled (`false`).
    Zooming(bool),
    /// Panning was armed (`true`) or disarmed (`false`).
    Panning(bool),
}

/// Normalize an angle into `[0, 360)`. Non-finite input becomes `0`.
#[must_use]
pub fn normalize_rotation(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(FULL_TURN_DEG);
    if r >= FULL_TURN_DEG { 0.0 } else { r }
}

/// Clamp a zoom factor into the default `[ZOOM_MIN, ZOOM_MAX]` range.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    clamp_zoom_to(zoom, ZOOM_MIN, ZOOM_MAX)
}

/// Clamp a zoom factor into `[min, max]`. NaN becomes `min`.
///
/// An inverted or NaN range is replaced by `[ZOOM_MIN, ZOOM_MAX]`.
#[must_use]
pub fn clamp_zoom_to(zoom: f64, min: f64, max: f64) -> f64 {
    let (min, max) = if min <= max { (min, max) } else { (ZOOM_MIN, ZOOM_MAX) };
    if zoom.is_nan() { min } else { zoom.clamp(min, max) }
}

#[derive(Debug, Clone, Copy)]
struct PanDrag {
    start_screen: Point,
    start_origin: Point,
}

#[derive(Debug, Clone, Copy)]
struct ZoomSession {
    deadline_ms: f64,
    zooming_in: bool,
}

/// Pan, rotation and zoom of the workspace viewport.
pub struct WorkspaceState {
    config: EngineConfig,
    bounds: Rect,
    origin: Point,
    rotation: f64,
    zoom: f64,
    pan_armed: bool,
    drag: Option<PanDrag>,
    zoom_session: Option<ZoomSession>,
    events: Observable<WorkspaceEvent>,
}

impl WorkspaceState {
    #[must_use]
    pub fn new(bounds: Rect, config: EngineConfig) -> Self {
        Self {
            config,
            bounds,
            origin: Point::default(),
            rotation: 0.0,
            zoom: clamp_zoom_to(1.0, config.zoom_min, config.zoom_max),
            pan_armed: false,
            drag: None,
            zoom_session: None,
            events: Observable::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom
    }

    /// Space is held and pointer drags pan.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan_armed
    }

    /// A pan drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.zoom_session.is_some()
    }

    /// When the current zoom session settles if no further wheel tick arrives.
    #[must_use]
    pub fn zoom_deadline(&self) -> Option<f64> {
        self.zoom_session.map(|s| s.deadline_ms)
    }

    #[must_use]
    pub fn view(&self) -> View {
        View { bounds: self.bounds, origin: self.origin, rotation: self.rotation, zoom: self.zoom }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cursor matching the active gesture.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        if self.drag.is_some() {
            Cursor::Grabbing
        } else if self.pan_armed {
            Cursor::Grab
        } else if let Some(session) = self.zoom_session {
            if session.zooming_in { Cursor::ZoomIn } else { Cursor::ZoomOut }
        } else {
            Cursor::Default
        }
    }

    /// Publisher of [`WorkspaceEvent`]s.
    #[must_use]
    pub fn events(&self) -> &Observable<WorkspaceEvent> {
        &self.events
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&WorkspaceEvent) -> Result<()> + 'static,
    {
        self.events.subscribe(callback)
    }

    // --- Setters ---

    /// Move the pan origin.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn set_origin(&mut self, origin: Point) -> Result<()> {
        self.origin = origin;
        self.events.notify(&WorkspaceEvent::Origin(origin))
    }

    /// Set the rotation, normalized into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn set_rotation(&mut self, deg: f64) -> Result<()> {
        self.rotation = normalize_rotation(deg);
        debug!(rotation = self.rotation, "workspace: rotation set");
        self.events.notify(&WorkspaceEvent::Rotation(self.rotation))
    }

    /// Set the zoom factor outside any wheel session, clamped to the config range.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        self.zoom = clamp_zoom_to(zoom, self.config.zoom_min, self.config.zoom_max);
        debug!(zoom = self.zoom, "workspace: zoom set");
        self.events.notify(&WorkspaceEvent::Zoom(self.zoom))
    }

    // --- Rotation ---

    /// Rotate one step for `[` or `]`. Returns whether the key was handled.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn on_key_press(&mut self, key: &Key) -> Result<bool> {
        let Some(direction) = key.rotation_direction() else {
            return Ok(false);
        };
        self.set_rotation(self.rotation + direction * self.config.rotation_step_deg)?;
        Ok(true)
    }

    // --- Zoom ---

    /// Zoom on ctrl + wheel.
    ///
    /// The first qualifying tick opens a zoom session; every tick pushes the
    /// settle deadline to `now_ms + zoom_settle_ms`.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers, now_ms: f64) -> Result<WheelResponse> {
        if !modifiers.ctrl {
            return Ok(WheelResponse::Ignored);
        }
        let zoom = clamp_zoom_to(
            self.zoom - delta.dy * self.config.wheel_sensitivity,
            self.config.zoom_min,
            self.config.zoom_max,
        );
        let starting = self.zoom_session.is_none();
        self.zoom_session =
            Some(ZoomSession { deadline_ms: now_ms + self.config.zoom_settle_ms, zooming_in: delta.dy < 0.0 });
        if starting {
            debug!(zoom = self.zoom, "workspace: zoom session started");
            self.events.notify(&WorkspaceEvent::Zooming(true))?;
        }
        self.zoom = zoom;
        trace!(zoom, dy = delta.dy, "workspace: zoom tick");
        self.events.notify(&WorkspaceEvent::Zoom(zoom))?;
        Ok(WheelResponse::PreventDefault)
    }

    /// End the zoom session once its deadline has passed. Returns whether it ended.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn tick(&mut self, now_ms: f64) -> Result<bool> {
        match self.zoom_session {
            Some(session) if now_ms >= session.deadline_ms => self.end_zoom_session(),
            _ => Ok(false),
        }
    }

    /// End the zoom session now. Returns `false` if none was active.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn end_zoom_session(&mut self) -> Result<bool> {
        if self.zoom_session.take().is_none() {
            return Ok(false);
        }
        debug!(zoom = self.zoom, "workspace: zoom session settled");
        self.events.notify(&WorkspaceEvent::Zooming(false))?;
        Ok(true)
    }

    // --- Pan ---

    /// Arm panning on space. Key repeats are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn on_key_down(&mut self, key: &Key) -> Result<bool> {
        if !key.is_space() || self.pan_armed {
            return Ok(false);
        }
        self.pan_armed = true;
        debug!("workspace: pan armed");
        self.events.notify(&WorkspaceEvent::Panning(true))?;
        Ok(true)
    }

    /// Disarm panning on space release, ending any drag.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn on_key_up(&mut self, key: &Key) -> Result<bool> {
        if !key.is_space() || !self.pan_armed {
            return Ok(false);
        }
        self.pan_armed = false;
        self.drag = None;
        debug!(origin.x = self.origin.x, origin.y = self.origin.y, "workspace: pan disarmed");
        self.events.notify(&WorkspaceEvent::Panning(false))?;
        Ok(true)
    }

    /// Start a pan drag if panning is armed. Returns whether the press was consumed.
    pub fn on_pointer_down(&mut self, screen: Point) -> bool {
        if !self.pan_armed {
            return false;
        }
        self.drag = Some(PanDrag { start_screen: screen, start_origin: self.origin });
        true
    }

    /// Follow the pointer during a pan drag. Screen y grows downward, cartesian y upward.
    ///
    /// # Errors
    ///
    /// Returns the first subscriber error.
    pub fn on_pointer_move(&mut self, screen: Point) -> Result<bool> {
        let Some(drag) = self.drag else {
            return Ok(false);
        };
        let dx = screen.x - drag.start_screen.x;
        let dy = screen.y - drag.start_screen.y;
        self.origin = Point::new(drag.start_origin.x + dx, drag.start_origin.y - dy);
        trace!(x = self.origin.x, y = self.origin.y, "workspace: pan");
        self.events.notify(&WorkspaceEvent::Origin(self.origin))?;
        Ok(true)
    }

    /// End the pan drag. Panning stays armed while space is held.
    pub fn on_pointer_up(&mut self) -> bool {
        self.drag.take().is_some()
    }
}

/// Shared workspace that attaches the layers of an observed project.
pub struct Workspace<S: Surface + 'static> {
    state: Rc<RefCell<WorkspaceState>>,
    project: Option<Observer<ProjectEvent<S>>>,
}

impl<S: Surface + 'static> Workspace<S> {
    #[must_use]
    pub fn new(bounds: Rect, config: EngineConfig) -> Self {
        Self { state: Rc::new(RefCell::new(WorkspaceState::new(bounds, config))), project: None }
    }

    /// Borrow the gesture state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when called from inside a workspace notification.
    pub fn state(&self) -> Result<Ref<'_, WorkspaceState>> {
        self.state.try_borrow().map_err(|_| Error::Reentrant("workspace"))
    }

    fn state_mut(&self) -> Result<RefMut<'_, WorkspaceState>> {
        self.state.try_borrow_mut().map_err(|_| Error::Reentrant("workspace"))
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when called from inside a workspace notification.
    pub fn view(&self) -> Result<View> {
        Ok(self.state()?.view())
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when called from inside a workspace notification.
    pub fn cursor(&self) -> Result<Cursor> {
        Ok(self.state()?.cursor())
    }

    // --- Project ---

    /// Observe `project` so its layers follow this workspace.
    ///
    /// Layers already in the project are attached immediately; later
    /// additions are attached and removals detached as they are announced.
    ///
    /// # Errors
    ///
    /// Returns the first layer attach error.
    pub fn attach_project(&mut self, project: &Project<S>) -> Result<()> {
        let weak = Rc::downgrade(&self.state);
        let mut observer = Observer::new(move |event: &ProjectEvent<S>| {
            let Some(state) = weak.upgrade() else {
                return Ok(());
            };
            match event {
                ProjectEvent::LayerAdded(layer) => {
                    let state = state.try_borrow().map_err(|_| Error::Reentrant("workspace"))?;
                    layer.attach(&state)
                }
                ProjectEvent::LayerRemoved(layer) => layer.detach(),
            }
        });
        observer.observe(project.events());
        {
            let state = self.state()?;
            for layer in project.layers() {
                layer.attach(&state)?;
            }
        }
        info!(layers = project.layers().len(), "workspace: project attached");
        self.project = Some(observer);
        Ok(())
    }

    /// Stop following project layer events. Attached layers keep their subscriptions.
    pub fn detach_project(&mut self) {
        if self.project.take().is_some() {
            info!("workspace: project detached");
        }
    }

    // --- Delegated gestures ---

    /// Register a read-only observer of workspace events.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when called from inside a workspace notification.
    pub fn subscribe<F>(&self, callback: F) -> Result<SubscriptionId>
    where
        F: Fn(&WorkspaceEvent) -> Result<()> + 'static,
    {
        Ok(self.state()?.subscribe(callback))
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn on_key_press(&self, key: &Key) -> Result<bool> {
        self.state_mut()?.on_key_press(key)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn on_key_down(&self, key: &Key) -> Result<bool> {
        self.state_mut()?.on_key_down(key)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn on_key_up(&self, key: &Key) -> Result<bool> {
        self.state_mut()?.on_key_up(key)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn on_wheel(&self, delta: WheelDelta, modifiers: Modifiers, now_ms: f64) -> Result<WheelResponse> {
        self.state_mut()?.on_wheel(delta, modifiers, now_ms)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn tick(&self, now_ms: f64) -> Result<bool> {
        self.state_mut()?.tick(now_ms)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn end_zoom_session(&self) -> Result<bool> {
        self.state_mut()?.end_zoom_session()
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when called from inside a workspace notification.
    pub fn on_pointer_down(&self, screen: Point) -> Result<bool> {
        Ok(self.state_mut()?.on_pointer_down(screen))
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn on_pointer_move(&self, screen: Point) -> Result<bool> {
        self.state_mut()?.on_pointer_move(screen)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when called from inside a workspace notification.
    pub fn on_pointer_up(&self) -> Result<bool> {
        Ok(self.state_mut()?.on_pointer_up())
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn set_origin(&self, origin: Point) -> Result<()> {
        self.state_mut()?.set_origin(origin)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn set_rotation(&self, deg: f64) -> Result<()> {
        self.state_mut()?.set_rotation(deg)
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or the first subscriber error.
    pub fn set_zoom(&self, zoom: f64) -> Result<()> {
        self.state_mut()?.set_zoom(zoom)
    }
}
