#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn default_matches_constants() {
    let c = EngineConfig::default();
    assert_eq!(c.zoom_min, 0.3);
    assert_eq!(c.zoom_max, 8.0);
    assert_eq!(c.wheel_sensitivity, 0.001);
    assert_eq!(c.zoom_settle_ms, 200.0);
    assert_eq!(c.rotation_step_deg, 15.0);
    assert_eq!(c.dab_spacing_divisor, 5.0);
    assert_eq!(c.background, Color::WHITE);
    assert_eq!(c.device_pixel_ratio, 1.0);
}

#[test]
fn default_is_valid() {
    assert!(EngineConfig::default().validate().is_ok());
}

#[test]
fn lookup_overrides_fields() {
    let c = EngineConfig::from_lookup(lookup_from(&[
        ("EASEL_ZOOM_MAX", "4"),
        ("EASEL_DAB_SPACING_DIVISOR", " 2 "),
        ("EASEL_BACKGROUND", "#000"),
        ("EASEL_DEVICE_PIXEL_RATIO", "2.0"),
    ]));
    assert_eq!(c.zoom_max, 4.0);
    assert_eq!(c.dab_spacing_divisor, 2.0);
    assert_eq!(c.background, Color::BLACK);
    assert_eq!(c.device_pixel_ratio, 2.0);
    assert_eq!(c.zoom_min, 0.3);
}

#[test]
fn lookup_ignores_unparsable_values() {
    let c = EngineConfig::from_lookup(lookup_from(&[("EASEL_ZOOM_MIN", "tiny"), ("EASEL_BACKGROUND", "#nothex")]));
    assert_eq!(c, EngineConfig::default());
}

#[test]
fn lookup_with_inverted_zoom_range_falls_back_to_defaults() {
    let c = EngineConfig::from_lookup(lookup_from(&[("EASEL_ZOOM_MIN", "10"), ("EASEL_ROTATION_STEP_DEG", "30")]));
    assert_eq!(c, EngineConfig::default());
}

#[test]
fn lookup_with_nan_values_falls_back_to_defaults() {
    let c = EngineConfig::from_lookup(lookup_from(&[("EASEL_ZOOM_MIN", "NaN")]));
    assert_eq!(c, EngineConfig::default());

    let c = EngineConfig::from_lookup(lookup_from(&[("EASEL_DEVICE_PIXEL_RATIO", "nan")]));
    assert_eq!(c, EngineConfig::default());
    assert!(c.validate().is_ok());
}

#[test]
fn empty_lookup_is_default() {
    assert_eq!(EngineConfig::from_lookup(|_| None), EngineConfig::default());
}

#[test]
fn json_partial_fills_defaults() {
    let c = EngineConfig::from_json(r##"{ "zoom_settle_ms": 350, "background": "#fafafa" }"##).unwrap();
    assert_eq!(c.zoom_settle_ms, 350.0);
    assert_eq!(c.background, Color::rgb(0xfa, 0xfa, 0xfa));
    assert_eq!(c.rotation_step_deg, 15.0);
}

#[test]
fn json_rejects_malformed_input() {
    assert!(matches!(EngineConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
}

#[test]
fn json_rejects_bad_color() {
    assert!(matches!(EngineConfig::from_json(r#"{ "background": "red" }"#), Err(ConfigError::Json(_))));
}

#[test]
fn validate_rejects_inverted_zoom_range() {
    let c = EngineConfig { zoom_min: 5.0, zoom_max: 2.0, ..EngineConfig::default() };
    assert!(matches!(c.validate(), Err(ConfigError::InvalidZoomRange { .. })));
}

#[test]
fn validate_rejects_zero_zoom_min() {
    let c = EngineConfig { zoom_min: 0.0, ..EngineConfig::default() };
    assert!(matches!(c.validate(), Err(ConfigError::InvalidZoomRange { .. })));
}

#[test]
fn validate_rejects_non_positive_fields() {
    let c = EngineConfig { dab_spacing_divisor: 0.0, ..EngineConfig::default() };
    let err = c.validate().unwrap_err();
    assert!(err.to_string().contains("dab_spacing_divisor"));

    let c = EngineConfig { device_pixel_ratio: f64::NAN, ..EngineConfig::default() };
    assert!(matches!(c.validate(), Err(ConfigError::NonPositive { field: "device_pixel_ratio", .. })));
}

#[test]
fn json_runs_validation() {
    assert!(EngineConfig::from_json(r#"{ "wheel_sensitivity": -1 }"#).is_err());
}
