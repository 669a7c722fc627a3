#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn modifiers_ctrl_only() {
    let m = Modifiers::ctrl();
    assert!(m.ctrl);
    assert!(!m.shift && !m.alt && !m.meta);
}

// =============================================================
// Key
// =============================================================

#[test]
fn space_variants_are_space() {
    for name in [" ", "Space", "Spacebar"] {
        assert!(Key::new(name).is_space(), "{name:?}");
    }
    assert!(!Key::new("Enter").is_space());
}

#[test]
fn brackets_rotate_in_opposite_directions() {
    assert_eq!(Key::new("[").rotation_direction(), Some(-1.0));
    assert_eq!(Key::new("]").rotation_direction(), Some(1.0));
}

#[test]
fn other_keys_do_not_rotate() {
    for name in ["{", "}", "a", " ", "BracketLeft"] {
        assert_eq!(Key::new(name).rotation_direction(), None, "{name:?}");
    }
}

#[test]
fn key_equality() {
    assert_eq!(Key::new("["), Key("[".to_owned()));
    assert_ne!(Key::new("["), Key::new("]"));
}

// =============================================================
// WheelDelta
// =============================================================

#[test]
fn wheel_delta_vertical() {
    let d = WheelDelta::vertical(-100.0);
    assert_eq!(d.dx, 0.0);
    assert_eq!(d.dy, -100.0);
}

// =============================================================
// Cursor
// =============================================================

#[test]
fn cursor_default_is_default() {
    assert_eq!(Cursor::default(), Cursor::Default);
}

#[test]
fn cursor_css_values() {
    assert_eq!(Cursor::Default.as_css(), "initial");
    assert_eq!(Cursor::Grab.as_css(), "grab");
    assert_eq!(Cursor::Grabbing.as_css(), "grabbing");
    assert_eq!(Cursor::ZoomIn.as_css(), "zoom-in");
    assert_eq!(Cursor::ZoomOut.as_css(), "zoom-out");
}
