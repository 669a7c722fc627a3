#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Hex parsing
// =============================================================

#[test]
fn parse_six_digit_hex() {
    let c = Color::from_hex("#1F1A17").unwrap();
    assert_eq!(c, Color { red: 0x1f, green: 0x1a, blue: 0x17, alpha: 255 });
}

#[test]
fn parse_without_hash() {
    assert_eq!(Color::from_hex("ff0000").unwrap(), Color::rgb(255, 0, 0));
}

#[test]
fn parse_is_case_insensitive() {
    assert_eq!(Color::from_hex("#AbCdEf").unwrap(), Color::from_hex("#abcdef").unwrap());
}

#[test]
fn parse_shorthand_expands_each_digit() {
    assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
    assert_eq!(Color::from_hex("#a1c").unwrap(), Color::rgb(0xaa, 0x11, 0xcc));
}

#[test]
fn parse_shorthand_with_alpha() {
    let c = Color::from_hex("#0008").unwrap();
    assert_eq!(c, Color { red: 0, green: 0, blue: 0, alpha: 0x88 });
}

#[test]
fn parse_eight_digit_alpha() {
    let c = Color::from_hex("#11223380").unwrap();
    assert_eq!(c.alpha, 0x80);
}

#[test]
fn parse_rejects_bad_lengths() {
    for input in ["", "#", "#12", "#12345", "#1234567", "#123456789"] {
        assert!(matches!(Color::from_hex(input), Err(ColorError::InvalidHex(_))), "{input}");
    }
}

#[test]
fn parse_rejects_non_hex_digits() {
    let err = Color::from_hex("#12345g").unwrap_err();
    assert_eq!(err, ColorError::InvalidHex("#12345g".into()));
}

#[test]
fn parse_rejects_double_hash() {
    assert!(Color::from_hex("##ffffff").is_err());
}

#[test]
fn error_message_names_input() {
    let err = Color::from_hex("nope").unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn from_str_delegates_to_hex() {
    let c: Color = "#00ff00".parse().unwrap();
    assert_eq!(c, Color::rgb(0, 255, 0));
}

// =============================================================
// Formatting
// =============================================================

#[test]
fn to_hex_lowercase_opaque() {
    assert_eq!(Color::rgb(0xAB, 0x01, 0xFF).to_hex(), "#ab01ff");
}

#[test]
fn to_hex_includes_alpha_when_translucent() {
    let c = Color { red: 1, green: 2, blue: 3, alpha: 4 };
    assert_eq!(c.to_hex(), "#01020304");
}

#[test]
fn display_matches_hex() {
    assert_eq!(Color::WHITE.to_string(), "#ffffff");
}

#[test]
fn serde_uses_hex_string() {
    let json = serde_json::to_string(&Color::rgb(255, 0, 128)).unwrap();
    assert_eq!(json, "\"#ff0080\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Color::rgb(255, 0, 128));
}

#[test]
fn serde_rejects_invalid_hex() {
    assert!(serde_json::from_str::<Color>("\"#xyz\"").is_err());
}

// =============================================================
// HSL
// =============================================================

#[test]
fn hsl_from_primaries() {
    assert_eq!(Hsl::from_rgb(Color::rgb(255, 0, 0)), Hsl::new(0.0, 100.0, 50.0));
    assert_eq!(Hsl::from_rgb(Color::rgb(0, 255, 0)), Hsl::new(120.0, 100.0, 50.0));
    assert_eq!(Hsl::from_rgb(Color::rgb(0, 0, 255)), Hsl::new(240.0, 100.0, 50.0));
}

#[test]
fn hsl_from_greys_has_no_saturation() {
    assert_eq!(Hsl::from_rgb(Color::WHITE), Hsl::new(0.0, 0.0, 100.0));
    assert_eq!(Hsl::from_rgb(Color::BLACK), Hsl::new(0.0, 0.0, 0.0));
}

#[test]
fn hsl_magenta_hue_wraps_positive() {
    assert_eq!(Hsl::from_rgb(Color::rgb(255, 0, 128)).hue, 330.0);
}

#[test]
fn hsl_from_hex() {
    assert_eq!(Hsl::from_hex("#ffffff").unwrap(), Hsl::new(0.0, 0.0, 100.0));
    assert!(Hsl::from_hex("#12").is_err());
}

#[test]
fn color_from_hsl_sextants() {
    let cases = [
        (0.0, Color::rgb(255, 0, 0)),
        (60.0, Color::rgb(255, 255, 0)),
        (120.0, Color::rgb(0, 255, 0)),
        (180.0, Color::rgb(0, 255, 255)),
        (240.0, Color::rgb(0, 0, 255)),
        (300.0, Color::rgb(255, 0, 255)),
    ];
    for (hue, expected) in cases {
        assert_eq!(Color::from_hsl(Hsl::new(hue, 100.0, 50.0)), expected, "hue {hue}");
    }
}

#[test]
fn color_from_hsl_wraps_hue() {
    let a = Color::from_hsl(Hsl::new(-60.0, 100.0, 50.0));
    let b = Color::from_hsl(Hsl::new(300.0, 100.0, 50.0));
    let c = Color::from_hsl(Hsl::new(660.0, 100.0, 50.0));
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn color_from_hsl_clamps_saturation_and_lightness() {
    assert_eq!(Color::from_hsl(Hsl::new(0.0, 250.0, 50.0)), Color::rgb(255, 0, 0));
    assert_eq!(Color::from_hsl(Hsl::new(0.0, 100.0, 140.0)), Color::WHITE);
    assert_eq!(Color::from_hsl(Hsl::new(0.0, -20.0, -5.0)), Color::BLACK);
}

#[test]
fn hsl_round_trip_through_rgb() {
    let original = Color::rgb(51, 102, 153);
    let back = Hsl::from_rgb(original).to_color();
    for (a, b) in [(original.red, back.red), (original.green, back.green), (original.blue, back.blue)] {
        assert!(a.abs_diff(b) <= 2, "{original:?} vs {back:?}");
    }
}

#[test]
fn hsl_normalize_keeps_hue() {
    assert_eq!(Hsl::new(210.0, 12.0, 80.0).normalize(), Hsl::new(210.0, 100.0, 50.0));
}

#[test]
fn hsl_display_is_css() {
    assert_eq!(Hsl::new(10.0, 20.0, 30.0).to_string(), "hsl(10, 20%, 30%)");
}
