use clap::Parser;

use super::*;

fn sample() -> Scene {
    let raw = r#"{
        "gridSize": 50, "showGrid": true, "snap": false, "zoom": 2,
        "pan": {"x": 10, "y": -5},
        "mapSrc": "map.png", "mapDim": {"w": 800, "h": 600},
        "tokens": [{"id": 3, "name": "Orc", "src": "orc.png", "x": 1, "y": 2, "w": 50, "h": 50}]
    }"#;
    serial::import_scene(raw, &EngineConfig::default()).unwrap()
}

#[test]
fn text_summary_lists_grid_map_and_tokens() {
    let text = summary_text(&sample());
    assert!(text.contains("grid: 50 px (lines on, snap off)"));
    assert!(text.contains("camera: zoom 2.00, pan (10.0, -5.0)"));
    assert!(text.contains("map: map.png (800 x 600)"));
    assert!(text.contains("tokens: 1"));
    assert!(text.contains("#3 Orc"));
}

#[test]
fn text_summary_without_map() {
    let text = summary_text(&Scene::new());
    assert!(text.contains("map: none"));
    assert!(text.contains("tokens: 0"));
}

#[test]
fn json_summary_reports_next_id() {
    let v = summary_json(&sample());
    assert_eq!(v["nextId"], json!(4));
    assert_eq!(v["map"]["src"], json!("map.png"));
    assert_eq!(v["tokens"][0]["name"], json!("Orc"));
}

#[test]
fn missing_config_path_uses_defaults() {
    let config = load_config(None).unwrap();
    assert_eq!(config.default_grid_size, EngineConfig::default().default_grid_size);
}

#[test]
fn unreadable_scene_reports_path() {
    let err = load_scene(Path::new("/nonexistent/scene.json"), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
    assert!(err.to_string().contains("/nonexistent/scene.json"));
}

#[test]
fn parses_subcommands() {
    let cli = Cli::try_parse_from(["tabletop", "roll", "--sides", "6", "--count", "3"]).unwrap();
    assert!(matches!(cli.command, Command::Roll { sides: 6, count: 3 }));

    let cli = Cli::try_parse_from(["tabletop", "normalize", "in.json", "--out", "out.json"]).unwrap();
    match cli.command {
        Command::Normalize { input, out } => {
            assert_eq!(input, PathBuf::from("in.json"));
            assert_eq!(out, Some(PathBuf::from("out.json")));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn roll_defaults_to_d20() {
    let cli = Cli::try_parse_from(["tabletop", "roll"]).unwrap();
    assert!(matches!(cli.command, Command::Roll { sides: 20, count: 1 }));
}
