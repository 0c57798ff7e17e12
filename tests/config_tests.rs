use sap_render::batch::{DEFAULT_CAPACITY, MAX_CAPACITY};
use sap_render::config::RenderConfig;
use sap_render::error::RenderError;
use sap_render::utils::Color;

#[test]
fn empty_object_yields_defaults() {
    let config = RenderConfig::from_json("{}").unwrap();
    assert_eq!(config, RenderConfig::default());
    assert_eq!((config.width, config.height), (800, 700));
    assert_eq!(config.batch_capacity, DEFAULT_CAPACITY);
    assert!(config.vsync);
}

#[test]
fn partial_config_overrides_only_named_fields() {
    let config = RenderConfig::from_json(
        r#"{ "width": 1024, "vsync": false, "clear_color": { "r": 1, "g": 2, "b": 3, "a": 4 } }"#,
    )
    .unwrap();
    assert_eq!(config.width, 1024);
    assert_eq!(config.height, 700);
    assert!(!config.vsync);
    assert_eq!(config.clear_color, Color::rgba(1, 2, 3, 4));
    assert_eq!(config.title, "sap");
}

#[test]
fn config_round_trips_through_json() {
    let config = RenderConfig {
        title: "player".to_string(),
        batch_capacity: 256,
        ..RenderConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(RenderConfig::from_json(&json).unwrap(), config);
}

#[test]
fn malformed_json_is_a_config_error() {
    let err = RenderConfig::from_json("{ width: ").unwrap_err();
    assert!(matches!(err, RenderError::Config(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = RenderConfig::load("/definitely/not/here/sap.json").unwrap_err();
    assert!(matches!(err, RenderError::Io(_)));
}

#[test]
fn load_reads_a_file_from_disk() {
    let path = std::env::temp_dir().join(format!("sap_render_config_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "title": "from disk", "height": 480 }"#).unwrap();
    let config = RenderConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(config.title, "from disk");
    assert_eq!(config.height, 480);
}

#[test]
fn batch_capacity_beyond_index_range_is_rejected() {
    let err = RenderConfig::from_json(r#"{ "batch_capacity": 18446744073709551615 }"#).unwrap_err();
    assert!(matches!(
        err,
        RenderError::BatchCapacity {
            requested: usize::MAX,
            max: MAX_CAPACITY
        }
    ));

    let json = format!(r#"{{ "batch_capacity": {} }}"#, MAX_CAPACITY + 1);
    assert!(matches!(
        RenderConfig::from_json(&json),
        Err(RenderError::BatchCapacity { .. })
    ));
}

#[test]
fn batch_capacity_at_the_bound_is_accepted() {
    let json = format!(r#"{{ "batch_capacity": {} }}"#, MAX_CAPACITY);
    let config = RenderConfig::from_json(&json).unwrap();
    assert_eq!(config.batch_capacity, MAX_CAPACITY);
}
