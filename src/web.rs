//! Browser backend.
//!
//! [`CanvasSurface`] rasterizes into an `HtmlCanvasElement` through its 2D
//! context. [`ListenerGuard`] owns one DOM event listener and removes it when
//! dropped. [`SettleTimer`] drives the zoom settle window with a `gloo-timers`
//! timeout that is cancelled by replacing it. [`EaselApp`] wires all of it to a
//! host element and is the JavaScript entry point.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use tracing::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, HtmlElement,
    KeyboardEvent, MouseEvent, Path2d, WheelEvent,
};

use crate::brush::{DabPath, DabShape, RoundBrush, share};
use crate::color::Color;
use crate::config::EngineConfig;
use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::error::{Error, Result};
use crate::geom::{Point, Rect, Size};
use crate::input::{Key, Modifiers, WheelDelta, WheelResponse};
use crate::layer::{LayerHandle, LayerId};
use crate::project::Project;
use crate::status::StatusBoard;
use crate::surface::{LayerStyle, RasterContext, Surface, SurfaceError};
use crate::workspace::Workspace;

fn host_error(value: &JsValue) -> SurfaceError {
    SurfaceError::Host(format!("{value:?}"))
}

fn to_js(err: &Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ── Canvas surface ──────────────────────────────────────────────

/// A layer surface backed by a `<canvas>` element.
pub struct CanvasSurface {
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    scale: f64,
}

impl CanvasSurface {
    /// Create a detached, absolutely positioned canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::MissingContext`] if the browser has no 2D context.
    pub fn create(document: &Document) -> Result<Self, SurfaceError> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| host_error(&e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|e| host_error(&e))?;
        canvas.style().set_property("position", "absolute").map_err(|e| host_error(&e))?;
        Self::from_canvas(document, canvas)
    }

    /// Wrap an existing canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::MissingContext`] if the browser has no 2D context.
    pub fn from_canvas(document: &Document, canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| host_error(&e))?
            .ok_or(SurfaceError::MissingContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::MissingContext)?;
        Ok(Self { document: document.clone(), canvas, ctx, scale: 1.0 })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn set_css(&self, property: &str, value: &str) -> Result<(), SurfaceError> {
        self.canvas.style().set_property(property, value).map_err(|e| host_error(&e))
    }
}

impl RasterContext for CanvasSurface {
    fn scale(&self) -> f64 {
        self.scale
    }

    fn fill_path(&mut self, path: &DabPath, color: Color) -> Result<(), SurfaceError> {
        if path.is_empty() {
            return Ok(());
        }
        let shape = Path2d::new().map_err(|e| host_error(&e))?;
        for dab in path.shapes() {
            match dab {
                DabShape::Circle { center, radius } => {
                    shape.move_to(center.x + radius, center.y);
                    shape.arc(center.x, center.y, *radius, 0.0, std::f64::consts::TAU).map_err(|e| host_error(&e))?;
                }
                DabShape::Polygon(points) => {
                    let mut points = points.iter();
                    let Some(first) = points.next() else {
                        continue;
                    };
                    shape.move_to(first.x, first.y);
                    for p in points {
                        shape.line_to(p.x, p.y);
                    }
                    shape.close_path();
                }
            }
        }
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_with_path_2d(&shape);
        Ok(())
    }
}

impl Surface for CanvasSurface {
    type Snapshot = HtmlCanvasElement;

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32, scale: f64) -> Result<(), SurfaceError> {
        // Assigning the size resets contents and context state.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.scale = scale;
        Ok(())
    }

    fn clear(&mut self) {
        let (w, h) = self.backing_size();
        self.ctx.clear_rect(0.0, 0.0, f64::from(w), f64::from(h));
    }

    fn fill_background(&mut self, color: Color) -> Result<(), SurfaceError> {
        let (w, h) = self.backing_size();
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));
        Ok(())
    }

    fn snapshot(&self) -> Result<HtmlCanvasElement, SurfaceError> {
        let (w, h) = self.backing_size();
        let copy = CanvasSurface::create(&self.document)?;
        copy.canvas.set_width(w);
        copy.canvas.set_height(h);
        copy.ctx.draw_image_with_html_canvas_element(&self.canvas, 0.0, 0.0).map_err(|e| host_error(&e))?;
        Ok(copy.canvas)
    }

    fn draw_snapshot(&mut self, snapshot: &HtmlCanvasElement) -> Result<(), SurfaceError> {
        let (w, h) = self.backing_size();
        self.ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(snapshot, 0.0, 0.0, f64::from(w), f64::from(h))
            .map_err(|e| host_error(&e))
    }

    fn apply_style(&mut self, style: &LayerStyle) -> Result<(), SurfaceError> {
        self.set_css("left", &format!("{}px", style.left))?;
        self.set_css("top", &format!("{}px", style.top))?;
        self.set_css("width", &format!("{}px", style.width))?;
        self.set_css("height", &format!("{}px", style.height))?;
        self.set_css("transform", &style.transform_css())?;
        self.set_css("pointer-events", style.pointer_events_css())?;
        self.set_css("image-rendering", style.image_rendering.as_css())
    }
}

// ── DOM listeners ───────────────────────────────────────────────

/// One registered DOM listener, removed on drop.
pub struct ListenerGuard {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl ListenerGuard {
    /// # Errors
    ///
    /// Returns [`SurfaceError::Host`] if registration fails.
    pub fn attach<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, SurfaceError>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| host_error(&e))?;
        Ok(Self { target: target.clone(), event, closure })
    }

    /// Register a listener that may call `preventDefault` (wheel, touch).
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Host`] if registration fails.
    pub fn attach_active<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, SurfaceError>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| host_error(&e))?;
        Ok(Self { target: target.clone(), event, closure })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Err(e) = self.target.remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            warn!(event = self.event, error = ?e, "web: listener removal failed");
        }
    }
}

// ── Zoom settle timer ───────────────────────────────────────────

/// Single pending timeout; scheduling again cancels the previous one.
///
/// Dropping a gloo `Timeout` clears it.
#[derive(Default)]
pub struct SettleTimer {
    pending: Option<Timeout>,
}

impl SettleTimer {
    pub fn schedule<F>(&mut self, millis: u32, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.pending = Some(Timeout::new(millis, callback));
    }
}

// ── Application binding ─────────────────────────────────────────

struct LayerBinding {
    id: LayerId,
    _listeners: Vec<ListenerGuard>,
}

struct AppInner {
    document: Document,
    host: HtmlElement,
    workspace: RefCell<Workspace<CanvasSurface>>,
    project: RefCell<Project<CanvasSurface>>,
    status: StatusBoard,
    settle: RefCell<SettleTimer>,
    listeners: RefCell<Vec<ListenerGuard>>,
    layers: RefCell<Vec<LayerBinding>>,
}

/// Log a handler failure; DOM callbacks have nowhere to return it.
fn report(result: Result<()>, action: &'static str) {
    if let Err(e) = result {
        warn!(action, error = %e, "web: event handling failed");
    }
}

impl AppInner {
    /// Pointer position relative to the host's top-left corner.
    fn local_point(&self, event: &MouseEvent) -> Point {
        let rect = self.host.get_bounding_client_rect();
        Point::new(f64::from(event.client_x()) - rect.x(), f64::from(event.client_y()) - rect.y())
    }

    fn sync_cursor(&self) -> Result<()> {
        let cursor = self.workspace.try_borrow().map_err(|_| Error::Reentrant("workspace"))?.cursor()?;
        self.host.style().set_property("cursor", cursor.as_css()).map_err(|e| host_error(&e))?;
        Ok(())
    }

    fn on_key(&self, event: &Event, kind: &str) -> Result<()> {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return Ok(());
        };
        let key = Key(event.key());
        let workspace = self.workspace.try_borrow().map_err(|_| Error::Reentrant("workspace"))?;
        let handled = match kind {
            "keydown" => workspace.on_key_down(&key)?,
            "keyup" => workspace.on_key_up(&key)?,
            _ => workspace.on_key_press(&key)?,
        };
        drop(workspace);
        if handled {
            self.sync_cursor()?;
        }
        Ok(())
    }

    fn on_wheel(self: &Rc<Self>, event: &Event) -> Result<()> {
        let Some(event) = event.dyn_ref::<WheelEvent>() else {
            return Ok(());
        };
        let delta = WheelDelta { dx: event.delta_x(), dy: event.delta_y() };
        let modifiers =
            Modifiers { shift: event.shift_key(), ctrl: event.ctrl_key(), alt: event.alt_key(), meta: event.meta_key() };
        let workspace = self.workspace.try_borrow().map_err(|_| Error::Reentrant("workspace"))?;
        let response = workspace.on_wheel(delta, modifiers, js_sys::Date::now())?;
        let settle_ms = workspace.state()?.config().zoom_settle_ms;
        drop(workspace);
        if response == WheelResponse::PreventDefault {
            event.prevent_default();
            let app = Rc::downgrade(self);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let millis = settle_ms.round() as u32;
            self.settle.borrow_mut().schedule(millis, move || {
                if let Some(app) = app.upgrade() {
                    report(app.settle_zoom(), "zoom settle");
                }
            });
            self.sync_cursor()?;
        }
        Ok(())
    }

    /// Runs inside the timeout's own callback, so the fired `Timeout` is left in
    /// place until the next schedule replaces it.
    fn settle_zoom(&self) -> Result<()> {
        self.workspace.try_borrow().map_err(|_| Error::Reentrant("workspace"))?.end_zoom_session()?;
        self.sync_cursor()
    }

    fn on_pan(&self, event: &Event, kind: &str) -> Result<()> {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return Ok(());
        };
        let point = self.local_point(event);
        let workspace = self.workspace.try_borrow().map_err(|_| Error::Reentrant("workspace"))?;
        let handled = match kind {
            "mousedown" => workspace.on_pointer_down(point)?,
            "mousemove" => workspace.on_pointer_move(point)?,
            _ => workspace.on_pointer_up()?,
        };
        drop(workspace);
        if handled {
            self.sync_cursor()?;
        }
        Ok(())
    }

    fn on_layer_pointer(&self, layer: &LayerHandle<CanvasSurface>, event: &Event, kind: &str) -> Result<()> {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return Ok(());
        };
        let point = self.local_point(event);
        let mut layer = layer.layer_mut()?;
        match kind {
            "mousedown" => {
                layer.on_pointer_down(point)?;
            }
            "mousemove" => {
                layer.on_pointer_move(point)?;
            }
            "mouseenter" => layer.on_pointer_enter(),
            "mouseleave" => layer.on_pointer_leave(),
            _ => {
                layer.on_pointer_up();
            }
        }
        Ok(())
    }

    fn bind_layer(self: &Rc<Self>, layer: &LayerHandle<CanvasSurface>) -> Result<LayerBinding> {
        let canvas: EventTarget = layer.layer()?.surface().canvas().clone().into();
        let document: EventTarget = self.document.clone().into();
        let mut listeners = Vec::with_capacity(5);
        for (target, kind) in [
            (&canvas, "mousedown"),
            (&canvas, "mousemove"),
            (&canvas, "mouseenter"),
            (&canvas, "mouseleave"),
            (&document, "mouseup"),
        ] {
            let app = Rc::downgrade(self);
            let handle = layer.clone();
            listeners.push(ListenerGuard::attach(target, kind, move |event| {
                if let Some(app) = app.upgrade() {
                    report(app.on_layer_pointer(&handle, &event, kind), "layer pointer");
                }
            })?);
        }
        Ok(LayerBinding { id: layer.id(), _listeners: listeners })
    }

    /// Mount the layer's canvas in the host and wire its listeners.
    fn place_layer(self: &Rc<Self>, layer: &LayerHandle<CanvasSurface>) -> Result<()> {
        let canvas = layer.layer()?.surface().canvas().clone();
        self.host.append_child(&canvas).map_err(|e| host_error(&e))?;
        match self.bind_layer(layer) {
            Ok(binding) => {
                self.layers.borrow_mut().push(binding);
                Ok(())
            }
            Err(e) => {
                canvas.remove();
                Err(e)
            }
        }
    }

    fn bind_document(self: &Rc<Self>) -> Result<()> {
        let document: EventTarget = self.document.clone().into();
        let host: EventTarget = self.host.clone().into();
        let mut listeners = self.listeners.borrow_mut();

        for kind in ["keydown", "keyup", "keypress"] {
            let app = Rc::downgrade(self);
            listeners.push(ListenerGuard::attach(&document, kind, move |event| {
                if let Some(app) = app.upgrade() {
                    report(app.on_key(&event, kind), "key");
                }
            })?);
        }
        for kind in ["mousedown", "mousemove", "mouseup"] {
            let app = Rc::downgrade(self);
            listeners.push(ListenerGuard::attach(&document, kind, move |event| {
                if let Some(app) = app.upgrade() {
                    report(app.on_pan(&event, kind), "pan");
                }
            })?);
        }
        let app: Weak<Self> = Rc::downgrade(self);
        listeners.push(ListenerGuard::attach_active(&host, "wheel", move |event| {
            if let Some(app) = app.upgrade() {
                report(app.on_wheel(&event), "wheel");
            }
        })?);
        Ok(())
    }
}

/// JavaScript entry point: one workspace element, one project.
#[wasm_bindgen]
pub struct EaselApp {
    inner: Rc<AppInner>,
}

#[wasm_bindgen]
impl EaselApp {
    /// Mount on the element with id `host_id`. The canvas size defaults to
    /// 800×500. `config_json` may override any [`EngineConfig`] field; without
    /// it the device pixel ratio is the window's.
    ///
    /// # Errors
    ///
    /// Rejects a missing host element, an invalid config or DOM failures.
    pub fn mount(
        host_id: &str,
        canvas_width: Option<f64>,
        canvas_height: Option<f64>,
        config_json: Option<String>,
    ) -> std::result::Result<EaselApp, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
        let host = document
            .get_element_by_id(host_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{host_id}")))?
            .dyn_into::<HtmlElement>()?;

        let config = match config_json {
            Some(json) => EngineConfig::from_json(&json).map_err(|e| to_js(&Error::from(e)))?,
            None => EngineConfig { device_pixel_ratio: window.device_pixel_ratio(), ..EngineConfig::default() },
        };
        config.validate().map_err(|e| to_js(&Error::from(e)))?;
        let canvas_width = canvas_width.unwrap_or(DEFAULT_CANVAS_WIDTH);
        let canvas_height = canvas_height.unwrap_or(DEFAULT_CANVAS_HEIGHT);
        let rect = host.get_bounding_client_rect();
        let bounds = Rect::new(rect.x(), rect.y(), rect.width(), rect.height());
        let brush = share(RoundBrush::default());
        let project = Project::with_config(Size::new(canvas_width, canvas_height), brush, config);
        let mut workspace = Workspace::new(bounds, config);
        workspace.attach_project(&project).map_err(|e| to_js(&e))?;
        let status = StatusBoard::connect(&*workspace.state().map_err(|e| to_js(&e))?);

        let inner = Rc::new(AppInner {
            document,
            host,
            workspace: RefCell::new(workspace),
            project: RefCell::new(project),
            status,
            settle: RefCell::new(SettleTimer::default()),
            listeners: RefCell::new(Vec::new()),
            layers: RefCell::new(Vec::new()),
        });
        inner.bind_document().map_err(|e| to_js(&e))?;
        info!(host_id, canvas_width, canvas_height, "web: mounted");
        Ok(Self { inner })
    }

    /// Add a layer on top and return its id.
    ///
    /// # Errors
    ///
    /// Rejects when the canvas cannot be created or placed. A layer that fails
    /// placement is removed from the project again.
    #[wasm_bindgen(js_name = addLayer)]
    pub fn add_layer(&self) -> std::result::Result<String, JsValue> {
        let inner = &self.inner;
        let surface = CanvasSurface::create(&inner.document).map_err(|e| to_js(&Error::from(e)))?;
        let layer = inner.project.borrow().create_layer(surface).map_err(|e| to_js(&e))?;
        inner.project.borrow_mut().add_layer_with(layer.clone(), |layer| inner.place_layer(layer)).map_err(|e| to_js(&e))?;
        Ok(layer.id().to_string())
    }

    /// Remove a layer and its canvas.
    ///
    /// # Errors
    ///
    /// Rejects unknown ids.
    #[wasm_bindgen(js_name = removeLayer)]
    pub fn remove_layer(&self, id: &str) -> std::result::Result<(), JsValue> {
        let id: LayerId = id.parse().map_err(|_| JsValue::from_str(&format!("invalid layer id {id}")))?;
        let layer = self.inner.project.borrow_mut().remove_layer(id).map_err(|e| to_js(&e))?;
        self.inner.layers.borrow_mut().retain(|binding| binding.id != id);
        layer.layer().map_err(|e| to_js(&e))?.surface().canvas().remove();
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects malformed hex input, or a brush held by a stroke event.
    #[wasm_bindgen(js_name = setBrushColor)]
    pub fn set_brush_color(&self, hex: &str) -> std::result::Result<(), JsValue> {
        let color = Color::from_hex(hex).map_err(|e| to_js(&Error::from(e)))?;
        self.inner.project.borrow().set_brush_color(color).map_err(|e| to_js(&e))
    }

    /// # Errors
    ///
    /// Rejects while a stroke event holds the brush.
    #[wasm_bindgen(js_name = setBrushSize)]
    pub fn set_brush_size(&self, size: f64) -> std::result::Result<(), JsValue> {
        self.inner.project.borrow().set_brush_size(size).map_err(|e| to_js(&e))
    }

    #[wasm_bindgen(js_name = statusLabel)]
    #[must_use]
    pub fn status_label(&self) -> String {
        self.inner.status.readout().label()
    }

    /// The sealed strokes of a layer as JSON.
    ///
    /// # Errors
    ///
    /// Rejects unknown ids.
    #[wasm_bindgen(js_name = strokesJson)]
    pub fn strokes_json(&self, id: &str) -> std::result::Result<String, JsValue> {
        let id: LayerId = id.parse().map_err(|_| JsValue::from_str(&format!("invalid layer id {id}")))?;
        let project = self.inner.project.borrow();
        let layer = project.layer(id).ok_or_else(|| to_js(&Error::UnknownLayer(id)))?;
        let layer = layer.layer().map_err(|e| to_js(&e))?;
        serde_json::to_string(layer.strokes()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
