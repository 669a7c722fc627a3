//! Drawing layers.
//!
//! A [`DrawingLayer`] owns one raster [`Surface`] the size of the project
//! canvas and the log of strokes drawn on it. It follows the workspace through
//! [`WorkspaceEvent`]s, mirroring the view locally:
//!
//! - origin and rotation only move or rotate the element;
//! - while a zoom session is live each zoom tick stretches a snapshot of the
//!   last exact render into a resized backing store;
//! - when the session settles (or a zoom arrives outside a session) the store
//!   is reallocated at `dpr × zoom`, cleared, and every stroke is replayed as
//!   vectors, so the result is sharp at any zoom.
//!
//! Pointer input opens a short-lived draw session. Each captured point is
//! mapped into drawing space, interpolated from the previous one, stamped with
//! the shared brush and recorded. The stroke is sealed into the log when the
//! session ends.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::brush::{Brush, SharedBrush, dab_spacing, interpolate};
use crate::color::Color;
use crate::config::EngineConfig;
use crate::consts::PIXELATED_ZOOM_THRESHOLD;
use crate::error::{Error, Result};
use crate::geom::{Point, Size};
use crate::observe::Observer;
use crate::stroke::{Stroke, StrokeLog};
use crate::surface::{ImageRendering, LayerStyle, RasterContext, Surface, backing_dimensions};
use crate::transform::View;
use crate::workspace::{WorkspaceEvent, WorkspaceState};

/// Layer identifier.
pub type LayerId = Uuid;

/// State of one pointer-down .. pointer-up gesture.
struct DrawSession {
    stroke: Stroke,
    last_point: Option<Point>,
    suspended: bool,
}

impl DrawSession {
    fn new(stroke: Stroke) -> Self {
        Self { stroke, last_point: None, suspended: false }
    }

    /// Pointer left the layer: stop marking and forget the last point so the
    /// stroke does not bridge the gap on re-entry.
    fn suspend(&mut self) {
        self.suspended = true;
        self.last_point = None;
    }

    fn resume(&mut self) {
        self.suspended = false;
        self.last_point = None;
    }
}

/// A raster layer of the project canvas.
pub struct DrawingLayer<S: Surface> {
    id: LayerId,
    canvas_size: Size,
    background: Color,
    device_pixel_ratio: f64,
    spacing_divisor: f64,
    brush: SharedBrush,
    surface: S,
    view: View,
    panning: bool,
    zooming: bool,
    live: Option<S::Snapshot>,
    strokes: StrokeLog,
    session: Option<DrawSession>,
    style: LayerStyle,
    observer: Option<Observer<WorkspaceEvent>>,
}

impl<S: Surface> DrawingLayer<S> {
    /// Create a layer and render its background at zoom 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Surface`] if the backing store cannot be sized.
    pub fn new(surface: S, canvas_size: Size, brush: SharedBrush, config: &EngineConfig) -> Result<Self> {
        let mut layer = Self {
            id: Uuid::new_v4(),
            canvas_size,
            background: config.background,
            device_pixel_ratio: config.device_pixel_ratio,
            spacing_divisor: config.dab_spacing_divisor,
            brush,
            surface,
            view: View::default(),
            panning: false,
            zooming: false,
            live: None,
            strokes: StrokeLog::new(),
            session: None,
            style: LayerStyle::default(),
            observer: None,
        };
        layer.render()?;
        Ok(layer)
    }

    // --- Queries ---

    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Sealed strokes, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &StrokeLog {
        &self.strokes
    }

    /// Current placement of the layer's element.
    #[must_use]
    pub fn style(&self) -> &LayerStyle {
        &self.style
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The workspace view as last announced to this layer.
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// A draw session is open.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    /// Subscribed to a workspace.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.observer.is_some()
    }

    /// Backing pixels per drawing unit at the mirrored zoom.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.device_pixel_ratio * self.view.zoom
    }

    // --- Workspace ---

    /// Adopt a workspace view wholesale and render it exactly.
    ///
    /// # Errors
    ///
    /// Returns render errors.
    pub fn mirror(&mut self, view: View, panning: bool, zooming: bool) -> Result<()> {
        self.view = view;
        self.panning = panning;
        self.zooming = zooming;
        self.render()?;
        if zooming {
            self.live = Some(self.surface.snapshot()?);
        }
        Ok(())
    }

    /// React to one workspace notification.
    ///
    /// # Errors
    ///
    /// Returns surface errors from resizing or replay.
    pub fn handle_workspace_event(&mut self, event: &WorkspaceEvent) -> Result<()> {
        match *event {
            WorkspaceEvent::Origin(origin) => self.view.origin = origin,
            WorkspaceEvent::Rotation(rotation) => self.view.rotation = rotation,
            WorkspaceEvent::Panning(panning) => self.panning = panning,
            WorkspaceEvent::Zooming(true) => {
                self.zooming = true;
                if self.live.is_none() {
                    self.live = Some(self.surface.snapshot()?);
                }
                debug!(layer = %self.id, "layer: live zoom");
            }
            WorkspaceEvent::Zooming(false) => {
                self.zooming = false;
                debug!(layer = %self.id, zoom = self.view.zoom, "layer: zoom settled, replaying");
                return self.render();
            }
            WorkspaceEvent::Zoom(zoom) => {
                self.view.zoom = zoom;
                return if self.zooming { self.stretch() } else { self.render() };
            }
        }
        self.refresh_style()
    }

    /// Stop following the workspace. An open draw session is sealed first.
    pub fn detach(&mut self) -> bool {
        self.seal();
        let was_attached = self.observer.take().is_some();
        if was_attached {
            info!(layer = %self.id, "layer: detached");
        }
        was_attached
    }

    /// Re-render exactly at the current zoom.
    ///
    /// # Errors
    ///
    /// Returns surface errors from resizing or replay.
    pub fn redraw(&mut self) -> Result<()> {
        self.render()
    }

    // --- Pointer capture ---

    /// Open a draw session and stamp the first dab.
    ///
    /// Ignored while the workspace pans or zooms. Returns whether a session opened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] if the brush is mutably borrowed, or a fill error.
    pub fn on_pointer_down(&mut self, screen: Point) -> Result<bool> {
        if !self.style.pointer_events {
            warn!(layer = %self.id, panning = self.panning, zooming = self.zooming, "layer: pointer down ignored");
            return Ok(false);
        }
        self.seal();
        let stroke = {
            let brush = self.brush.try_borrow().map_err(|_| Error::Reentrant("brush"))?;
            Stroke::new(brush.id(), brush.color())
        };
        self.session = Some(DrawSession::new(stroke));
        debug!(layer = %self.id, "layer: draw session opened");
        self.capture(screen)?;
        Ok(true)
    }

    /// Extend the open stroke to `screen`. Returns whether anything was drawn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] if the brush is mutably borrowed, or a fill error.
    pub fn on_pointer_move(&mut self, screen: Point) -> Result<bool> {
        let active = self.session.as_ref().is_some_and(|s| !s.suspended);
        if !active || !self.style.pointer_events {
            return Ok(false);
        }
        self.capture(screen)?;
        Ok(true)
    }

    /// Pointer left the element mid-stroke.
    pub fn on_pointer_leave(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.suspend();
        }
    }

    /// Pointer came back onto the element mid-stroke.
    pub fn on_pointer_enter(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.resume();
        }
    }

    /// Seal the open stroke. Returns whether a stroke was added to the log.
    pub fn on_pointer_up(&mut self) -> bool {
        self.seal()
    }

    // --- Internals ---

    fn seal(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        let dabs = session.stroke.len();
        let kept = self.strokes.seal(session.stroke);
        debug!(layer = %self.id, dabs, strokes = self.strokes.len(), "layer: stroke sealed");
        kept
    }

    fn capture(&mut self, screen: Point) -> Result<()> {
        let point = self.view.screen_to_drawing(screen, self.canvas_size);
        let brush = self.brush.try_borrow().map_err(|_| Error::Reentrant("brush"))?;
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let size = brush.size();
        let dabs = match session.last_point {
            // The segment's start was stamped by the previous capture.
            Some(last) => interpolate(last, point, dab_spacing(size, self.spacing_divisor)).into_iter().skip(1).collect(),
            None => vec![point],
        };
        for dab in dabs {
            brush.mark(&mut self.surface, dab)?;
            session.stroke.push(size, dab);
        }
        session.last_point = Some(point);
        Ok(())
    }

    /// Exact render: reallocate, clear, background, replay.
    fn render(&mut self) -> Result<()> {
        self.live = None;
        let scale = self.scale();
        let (width, height) = backing_dimensions(self.canvas_size, scale)?;
        self.surface.resize(width, height, scale)?;
        self.surface.clear();
        self.surface.fill_background(self.background)?;
        self.replay()?;
        self.refresh_style()
    }

    /// Live-zoom frame: reallocate and stretch the last exact render.
    fn stretch(&mut self) -> Result<()> {
        if self.live.is_none() {
            self.live = Some(self.surface.snapshot()?);
        }
        let scale = self.scale();
        let (width, height) = backing_dimensions(self.canvas_size, scale)?;
        self.surface.resize(width, height, scale)?;
        if let Some(snapshot) = &self.live {
            self.surface.draw_snapshot(snapshot)?;
        }
        trace!(layer = %self.id, zoom = self.view.zoom, width, height, "layer: stretched");
        self.refresh_style()
    }

    /// Fill every stroke as one union path, the open stroke last.
    fn replay(&mut self) -> Result<()> {
        let scale = self.surface.scale();
        let brush = self.brush.try_borrow().map_err(|_| Error::Reentrant("brush"))?;
        let open = self.session.as_ref().map(|s| &s.stroke);
        for stroke in self.strokes.iter().chain(open) {
            let path = stroke.build_path(&*brush, scale);
            self.surface.fill_path(&path, stroke.color)?;
        }
        trace!(layer = %self.id, strokes = self.strokes.len(), scale, "layer: replayed");
        Ok(())
    }

    fn refresh_style(&mut self) -> Result<()> {
        let top_left = self.view.layer_top_left(self.canvas_size);
        let size = self.canvas_size.scale(self.view.zoom);
        self.style = LayerStyle {
            left: top_left.x,
            top: top_left.y,
            width: size.width,
            height: size.height,
            rotation: self.view.rotation,
            pointer_events: !(self.panning || self.zooming),
            image_rendering: if self.view.zoom >= PIXELATED_ZOOM_THRESHOLD {
                ImageRendering::Pixelated
            } else {
                ImageRendering::Auto
            },
        };
        self.surface.apply_style(&self.style)?;
        Ok(())
    }
}

/// Shared handle to a layer, as held by the project and the host.
pub struct LayerHandle<S: Surface> {
    id: LayerId,
    inner: Rc<RefCell<DrawingLayer<S>>>,
}

impl<S: Surface> Clone for LayerHandle<S> {
    fn clone(&self) -> Self {
        Self { id: self.id, inner: Rc::clone(&self.inner) }
    }
}

impl<S: Surface> std::fmt::Debug for LayerHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerHandle").field("id", &self.id).finish()
    }
}

impl<S: Surface + 'static> LayerHandle<S> {
    #[must_use]
    pub fn new(layer: DrawingLayer<S>) -> Self {
        Self { id: layer.id(), inner: Rc::new(RefCell::new(layer)) }
    }

    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] if the layer is mutably borrowed.
    pub fn layer(&self) -> Result<Ref<'_, DrawingLayer<S>>> {
        self.inner.try_borrow().map_err(|_| Error::Reentrant("layer"))
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] if the layer is already borrowed.
    pub fn layer_mut(&self) -> Result<RefMut<'_, DrawingLayer<S>>> {
        self.inner.try_borrow_mut().map_err(|_| Error::Reentrant("layer"))
    }

    /// Mirror `workspace` and subscribe to its events, replacing any earlier subscription.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] or a render error.
    pub fn attach(&self, workspace: &WorkspaceState) -> Result<()> {
        let weak = Rc::downgrade(&self.inner);
        let mut observer = Observer::new(move |event: &WorkspaceEvent| {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            let mut layer = inner.try_borrow_mut().map_err(|_| Error::Reentrant("layer"))?;
            layer.handle_workspace_event(event)
        });
        observer.observe(workspace.events());

        let mut layer = self.layer_mut()?;
        layer.observer = Some(observer);
        layer.mirror(workspace.view(), workspace.is_panning(), workspace.is_zooming())?;
        info!(layer = %self.id, zoom = workspace.zoom_factor(), "layer: attached");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] if the layer is already borrowed.
    pub fn detach(&self) -> Result<()> {
        self.layer_mut()?.detach();
        Ok(())
    }

    /// Whether both handles point at the same layer.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
