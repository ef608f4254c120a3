//! YAML configuration parsing for macro definitions
//!
//! Parses macros.yaml files into `MacroDef` entries and chord strings like
//! `"ctrl+shift+s"` into `Chord`s.

use std::path::Path;

use serde::Deserialize;

use super::types::{Chord, Modifiers};

/// Root structure of a macros YAML file
#[derive(Debug, Deserialize)]
pub struct MacroFile {
    #[serde(default)]
    pub macros: Vec<MacroDef>,
}

/// A single macro entry from YAML
///
/// Actions are code, so a definition only names the macro and its chord;
/// the host supplies the action when registering it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MacroDef {
    pub id: String,
    pub chord: Chord,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Load macro definitions from a YAML file
pub fn load_macro_file(path: &Path) -> Result<Vec<MacroDef>, MacroFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| MacroFileError::IoError(e.to_string()))?;

    parse_macro_yaml(&content)
}

/// Parse macro definitions from YAML string
pub fn parse_macro_yaml(yaml: &str) -> Result<Vec<MacroDef>, MacroFileError> {
    let file: MacroFile =
        serde_yaml::from_str(yaml).map_err(|e| MacroFileError::ParseError(e.to_string()))?;

    for def in &file.macros {
        if def.id.trim().is_empty() {
            return Err(MacroFileError::ParseError(format!(
                "Macro bound to {} has an empty id",
                def.chord
            )));
        }
    }

    Ok(file.macros)
}

/// Parse a chord string like "ctrl+shift+s" into a Chord
///
/// Modifier names are case-insensitive. A trailing `++` binds the plus key
/// itself (`"ctrl++"`).
///
/// `cmd`/`command` map to [`Modifiers::cmd`], which is fixed when the crate
/// is compiled. In a wasm32 build that is always Ctrl, so chords meant for a
/// browser on macOS should say `meta` explicitly.
pub fn parse_chord(chord_str: &str) -> Result<Chord, MacroFileError> {
    let trimmed = chord_str.trim();
    if trimmed.is_empty() {
        return Err(MacroFileError::InvalidChord("Empty chord".to_string()));
    }

    let (body, mut key_part) = if trimmed == "+" {
        ("", Some("+".to_string()))
    } else if let Some(rest) = trimmed.strip_suffix("++") {
        (rest, Some("+".to_string()))
    } else {
        (trimmed, None)
    };

    let mut mods = Modifiers::NONE;

    if !body.is_empty() {
        for part in body.split('+') {
            let part = part.trim();
            if part.is_empty() {
                return Err(MacroFileError::InvalidChord(format!(
                    "Empty segment in chord: {}",
                    chord_str
                )));
            }

            match part.to_lowercase().as_str() {
                "cmd" | "command" => mods = mods | Modifiers::cmd(),
                "ctrl" | "control" => mods = mods | Modifiers::CTRL,
                "alt" | "option" | "opt" => mods = mods | Modifiers::ALT,
                "shift" => mods = mods | Modifiers::SHIFT,
                "meta" | "super" | "win" => mods = mods | Modifiers::META,
                _ => {
                    // This should be the key itself
                    if key_part.is_some() {
                        return Err(MacroFileError::InvalidChord(format!(
                            "Multiple keys in chord: {}",
                            chord_str
                        )));
                    }
                    key_part = Some(key_name(part));
                }
            }
        }
    }

    let key = key_part.ok_or_else(|| {
        MacroFileError::InvalidChord(format!("No key found in chord: {}", chord_str))
    })?;

    Ok(Chord::new(key, mods))
}

/// Map a config key name to the browser's `KeyboardEvent.key` value
///
/// Single characters and unknown names pass through untouched; matching is
/// case-insensitive so `"pagedown"` and `"PageDown"` are equivalent anyway.
fn key_name(key: &str) -> String {
    if key.chars().count() == 1 {
        return key.to_string();
    }

    let lower = key.to_lowercase();
    let named = match lower.as_str() {
        "enter" | "return" => "Enter",
        "escape" | "esc" => "Escape",
        "tab" => "Tab",
        "backspace" | "back" => "Backspace",
        "delete" | "del" => "Delete",
        "space" | "spacebar" => " ",

        "up" | "arrowup" => "ArrowUp",
        "down" | "arrowdown" => "ArrowDown",
        "left" | "arrowleft" => "ArrowLeft",
        "right" | "arrowright" => "ArrowRight",

        "home" => "Home",
        "end" => "End",
        "pageup" | "pgup" => "PageUp",
        "pagedown" | "pgdown" | "pgdn" => "PageDown",
        "insert" | "ins" => "Insert",

        "plus" => "+",
        "minus" => "-",

        _ => {
            // Function keys F1-F24
            if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=24).contains(&n) {
                    return format!("F{}", n);
                }
            }
            return key.to_string();
        }
    };

    named.to_string()
}

/// Errors that can occur when loading macro definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroFileError {
    IoError(String),
    ParseError(String),
    InvalidChord(String),
}

impl std::fmt::Display for MacroFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MacroFileError::IoError(e) => write!(f, "IO error: {}", e),
            MacroFileError::ParseError(e) => write!(f, "Parse error: {}", e),
            MacroFileError::InvalidChord(c) => write!(f, "Invalid chord: {}", c),
        }
    }
}

impl std::error::Error for MacroFileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let chord = parse_chord("a").unwrap();
        assert_eq!(chord.key, "a");
        assert!(chord.mods.is_empty());
    }

    #[test]
    fn test_parse_with_modifiers() {
        let chord = parse_chord("ctrl+shift+s").unwrap();
        assert_eq!(chord.key, "s");
        assert_eq!(chord.mods, Modifiers::CTRL | Modifiers::SHIFT);
    }

    #[test]
    fn test_parse_modifier_names_case_insensitive() {
        let chord = parse_chord("Ctrl+ALT+Meta+x").unwrap();
        assert_eq!(
            chord.mods,
            Modifiers::CTRL | Modifiers::ALT | Modifiers::META
        );
    }

    #[test]
    fn test_parse_keeps_key_case() {
        let chord = parse_chord("ctrl+S").unwrap();
        assert_eq!(chord.key, "S");
        assert!(chord.matches("s", Modifiers::CTRL));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_chord("option+x").unwrap().mods, Modifiers::ALT);
        assert_eq!(parse_chord("super+x").unwrap().mods, Modifiers::META);
        assert_eq!(parse_chord("cmd+x").unwrap().mods, Modifiers::cmd());
    }

    #[test]
    fn test_cmd_follows_compile_target() {
        let chord = parse_chord("command+k").unwrap();
        if cfg!(target_os = "macos") {
            assert_eq!(chord.mods, Modifiers::META);
        } else {
            // Includes wasm32, whatever OS the browser runs on
            assert_eq!(chord.mods, Modifiers::CTRL);
        }
        assert!(parse_chord("meta+k").unwrap().matches("k", Modifiers::META));
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(parse_chord("esc").unwrap().key, "Escape");
        assert_eq!(parse_chord("shift+up").unwrap().key, "ArrowUp");
        assert_eq!(parse_chord("space").unwrap().key, " ");
        assert_eq!(parse_chord("f5").unwrap().key, "F5");
        assert_eq!(parse_chord("F12").unwrap().key, "F12");
        assert_eq!(parse_chord("MediaPlayPause").unwrap().key, "MediaPlayPause");
    }

    #[test]
    fn test_parse_plus_key() {
        let chord = parse_chord("ctrl++").unwrap();
        assert_eq!(chord.key, "+");
        assert_eq!(chord.mods, Modifiers::CTRL);

        let chord = parse_chord("+").unwrap();
        assert_eq!(chord.key, "+");
        assert!(chord.mods.is_empty());
    }

    #[test]
    fn test_parse_label_round_trip() {
        for label in ["Ctrl+Alt+s", "Shift+Meta+ArrowUp", "Ctrl+Space", "Ctrl++", "F1"] {
            let chord = parse_chord(label).unwrap();
            assert_eq!(chord.label(), label);
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_chord(""),
            Err(MacroFileError::InvalidChord(_))
        ));
        assert!(matches!(
            parse_chord("ctrl+shift"),
            Err(MacroFileError::InvalidChord(_))
        ));
        assert!(matches!(
            parse_chord("a+b"),
            Err(MacroFileError::InvalidChord(_))
        ));
        assert!(matches!(
            parse_chord("ctrl+"),
            Err(MacroFileError::InvalidChord(_))
        ));
    }

    #[test]
    fn test_parse_macro_yaml() {
        let yaml = r#"
macros:
  - id: save
    chord: ctrl+s
    description: Save the document
  - id: palette
    chord: { key: p, ctrl: true, shift: true }
    enabled: false
"#;
        let defs = parse_macro_yaml(yaml).unwrap();
        assert_eq!(defs.len(), 2);

        assert_eq!(defs[0].id, "save");
        assert_eq!(defs[0].chord, Chord::new("s", Modifiers::CTRL));
        assert_eq!(defs[0].description.as_deref(), Some("Save the document"));
        assert!(defs[0].enabled);

        assert_eq!(defs[1].chord.mods, Modifiers::CTRL | Modifiers::SHIFT);
        assert!(!defs[1].enabled);
    }

    #[test]
    fn test_parse_macro_yaml_rejects_bad_chord() {
        let yaml = "macros:\n  - id: broken\n    chord: ctrl+\n";
        assert!(matches!(
            parse_macro_yaml(yaml),
            Err(MacroFileError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_macro_yaml_rejects_empty_id() {
        let yaml = "macros:\n  - id: ''\n    chord: x\n";
        assert!(parse_macro_yaml(yaml).is_err());
    }

    #[test]
    fn test_empty_file_has_no_macros() {
        assert!(parse_macro_yaml("{}").unwrap().is_empty());
    }
}
