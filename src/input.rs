//! Input model: keys, modifier keys, wheel deltas and cursor hints.
//!
//! The host decodes DOM events into these types before handing them to the
//! workspace or a layer. Pointer positions are plain [`crate::geom::Point`]s
//! relative to the workspace viewport's top-left corner.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Only ctrl held.
    #[must_use]
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }
}

/// A keyboard key.
///
/// The inner string holds the key value as reported by the browser
/// (e.g. `" "`, `"["`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// The space bar, which arms panning while held.
    #[must_use]
    pub fn is_space(&self) -> bool {
        matches!(self.0.as_str(), " " | "Space" | "Spacebar")
    }

    /// Rotation direction for bracket keys: `-1` for `[`, `+1` for `]`.
    #[must_use]
    pub fn rotation_direction(&self) -> Option<f64> {
        match self.0.as_str() {
            "[" => Some(-1.0),
            "]" => Some(1.0),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down = zoom out).
    pub dy: f64,
}

impl WheelDelta {
    /// Vertical-only delta.
    #[must_use]
    pub fn vertical(dy: f64) -> Self {
        Self { dx: 0.0, dy }
    }
}

/// What the host must do with a wheel event after the workspace saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelResponse {
    /// The workspace consumed the event; suppress native page zoom.
    PreventDefault,
    /// Not ours; let the browser handle it.
    Ignored,
}

/// Cursor the host should show over the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Pan armed (space held).
    Grab,
    /// Pan drag in progress.
    Grabbing,
    /// Zoom session that last zoomed in.
    ZoomIn,
    /// Zoom session that last zoomed out.
    ZoomOut,
}

impl Cursor {
    /// CSS `cursor` value.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "initial",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::ZoomIn => "zoom-in",
            Self::ZoomOut => "zoom-out",
        }
    }
}
