use hoverlink::config::*;
use hoverlink::HoverError;

#[test]
fn partial_yaml_fills_defaults() {
    let cfg = HoverConfig::from_yaml_str("highlight_mode: off\nvalue_precision: 3\n").unwrap();
    assert_eq!(cfg.highlight_mode, HighlightMode::Off);
    assert!(!cfg.highlight_mode.is_enabled());
    assert_eq!(cfg.value_precision, 3);
    assert_eq!(cfg.marker_radius, HoverConfig::default().marker_radius);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn json_parses_enums_in_snake_case() {
    let cfg = HoverConfig::from_json_str(
        r#"{"x_alignment": "relative_time", "logging": {"format": "json"}}"#,
    )
    .unwrap();
    assert_eq!(cfg.x_alignment, XAlignment::RelativeTime);
    assert_eq!(cfg.logging.format, LogFormat::Json);
}

#[test]
fn save_and_load_yaml_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = HoverConfig::default();
    cfg.highlight_mode = HighlightMode::Metric;
    cfg.guide_dash = [6.0, 3.0];

    for name in ["hover.yaml", "hover.yml", "hover.json"] {
        let path = dir.path().join(name);
        cfg.save_to_path(&path).unwrap();
        let loaded = HoverConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, cfg, "{name}");
    }
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hover.toml");
    let err = HoverConfig::default().save_to_path(&path).unwrap_err();
    assert!(matches!(err, HoverError::Config(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HoverConfig::load_from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, HoverError::Io(_)));
}

#[test]
fn invalid_radii_are_rejected() {
    let err = HoverConfig::from_yaml_str("marker_radius: 0.0\n").unwrap_err();
    assert!(matches!(err, HoverError::Config(_)));
    let err =
        HoverConfig::from_yaml_str("marker_radius: 4.0\nactive_marker_radius: 2.0\n").unwrap_err();
    assert!(matches!(err, HoverError::Config(_)));
}

#[test]
fn malformed_yaml_is_a_yaml_error() {
    let err = HoverConfig::from_yaml_str("highlight_mode: [").unwrap_err();
    assert!(matches!(err, HoverError::Yaml(_)));
}

#[test]
fn precision_beyond_f64_resolution_is_rejected() {
    for yaml in ["value_precision: 18\n", "value_precision: 2147483648\n"] {
        let err = HoverConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, HoverError::Config(_)), "{yaml}");
    }
    let cfg = HoverConfig::from_yaml_str("value_precision: 17\n").unwrap();
    assert_eq!(cfg.value_precision, 17);
}
