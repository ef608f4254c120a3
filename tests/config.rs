//! Configuration system tests
//!
//! Tests for config paths, registry config, and macro/event file loading.

use std::io::Write;

use keymacro::bus::load_event_script;
use keymacro::config_paths;
use keymacro::registry::{load_macro_file, MacroFileError};
use keymacro::{Chord, Modifiers, RegistryConfig};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("keymacro"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_macros_file_is_in_config_dir() {
    if let (Some(config), Some(macros)) = (config_paths::config_dir(), config_paths::macros_file())
    {
        assert!(macros.starts_with(&config));
        assert!(macros.to_string_lossy().ends_with("macros.yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Registry Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = RegistryConfig::default();
    assert!(config.suppress_default);
    assert!(!config.suppress_propagation);
    assert!(!config.diagnostics);
}

#[test]
fn test_config_serialize_deserialize() {
    let config = RegistryConfig::default()
        .with_suppress_propagation(true)
        .with_diagnostics(true);
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed = RegistryConfig::parse(&yaml).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "suppress_default: false").unwrap();
    writeln!(file, "diagnostics: true").unwrap();

    let config = RegistryConfig::load_from(file.path());
    assert!(!config.suppress_default);
    assert!(!config.suppress_propagation);
    assert!(config.diagnostics);
}

#[test]
fn test_load_from_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = RegistryConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(config, RegistryConfig::default());
}

#[test]
fn test_load_from_invalid_file_uses_defaults() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "suppress_default: [not, a, bool]").unwrap();

    let config = RegistryConfig::load_from(file.path());
    assert_eq!(config, RegistryConfig::default());
}

// ========================================================================
// Macro File Tests
// ========================================================================

#[test]
fn test_load_macro_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "macros:\n  - id: save\n    chord: ctrl+s\n  - id: help\n    chord: f1\n    enabled: false\n"
    )
    .unwrap();

    let defs = load_macro_file(file.path()).unwrap();
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].chord, Chord::new("s", Modifiers::CTRL));
    assert_eq!(defs[1].chord, Chord::key("F1"));
    assert!(!defs[1].enabled);
}

#[test]
fn test_load_macro_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_macro_file(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(MacroFileError::IoError(_))));
}

// ========================================================================
// Event Script Tests
// ========================================================================

#[test]
fn test_load_event_script_yaml() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(file, "events:\n  - keys: ctrl+S\n    target: div\n").unwrap();

    let events = load_event_script(file.path()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].key, "S");
    assert_eq!(events[0].mods, Modifiers::CTRL);
}

#[test]
fn test_load_event_script_json() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"events": [{{"keys": "alt+x", "target": "textarea"}}, {{"keys": "escape"}}]}}"#
    )
    .unwrap();

    let events = load_event_script(file.path()).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].mods, Modifiers::ALT);
    assert_eq!(events[0].target.as_deref(), Some("textarea"));
    assert_eq!(events[1].key, "Escape");
}
