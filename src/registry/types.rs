//! Core types for the macro registry: Modifiers and Chord

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::{parse_chord, MacroFileError};

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const ALT: Modifiers = Modifiers(0b0010);
    pub const SHIFT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000); // Cmd on macOS, Win on Windows

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if alt {
            bits |= 0b0010;
        }
        if shift {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    /// Check if ctrl is held
    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    /// Check if alt/option is held
    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0010 != 0
    }

    /// Check if shift is held
    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0100 != 0
    }

    /// Check if meta (cmd/win) is held
    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// Check if no modifiers are held
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Get the platform-specific "command" modifier (Cmd on macOS, Ctrl elsewhere)
    ///
    /// Chosen by the compile target, not the runtime platform: a wasm32 build
    /// always gets Ctrl, even in a browser running on macOS.
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CTRL
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    /// Renders as `Ctrl+Alt+Shift+Meta+` (each held modifier followed by `+`)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl() {
            f.write_str("Ctrl+")?;
        }
        if self.alt() {
            f.write_str("Alt+")?;
        }
        if self.shift() {
            f.write_str("Shift+")?;
        }
        if self.meta() {
            f.write_str("Meta+")?;
        }
        Ok(())
    }
}

/// A key combination: a base key name plus an exact modifier set
///
/// The base key uses browser key names (`"s"`, `"Enter"`, `"ArrowUp"`, `" "`)
/// and is compared case-insensitively. Modifiers must match exactly: a chord
/// bound to `Ctrl+s` does not fire for `Ctrl+Shift+s`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ChordDef", into = "String")]
pub struct Chord {
    pub key: String,
    pub mods: Modifiers,
}

impl Chord {
    /// Create a new chord
    pub fn new(key: impl Into<String>, mods: Modifiers) -> Self {
        Self {
            key: key.into(),
            mods,
        }
    }

    /// Create a chord with no modifiers
    pub fn key(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Check whether a key name and modifier state trigger this chord
    pub fn matches(&self, key: &str, mods: Modifiers) -> bool {
        self.mods == mods && keys_equal(&self.key, key)
    }

    /// Human-readable label, e.g. `Ctrl+Alt+s`
    pub fn label(&self) -> String {
        self.to_string()
    }
}

/// Case-insensitive key name comparison
fn keys_equal(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(b)
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mods)?;
        if self.key == " " {
            f.write_str("Space")
        } else {
            f.write_str(&self.key)
        }
    }
}

impl FromStr for Chord {
    type Err = MacroFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_chord(s)
    }
}

impl From<Chord> for String {
    fn from(chord: Chord) -> Self {
        chord.to_string()
    }
}

/// Accepted serialized forms of a chord
#[derive(Deserialize)]
#[serde(untagged)]
enum ChordDef {
    /// `"ctrl+shift+s"`
    Label(String),
    /// `{ key: s, ctrl: true, shift: true }`
    Fields {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        alt: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        meta: bool,
    },
}

impl TryFrom<ChordDef> for Chord {
    type Error = MacroFileError;

    fn try_from(def: ChordDef) -> Result<Self, Self::Error> {
        match def {
            ChordDef::Label(label) => parse_chord(&label),
            ChordDef::Fields {
                key,
                ctrl,
                alt,
                shift,
                meta,
            } => {
                if key.is_empty() {
                    return Err(MacroFileError::InvalidChord(
                        "Chord has an empty key".to_string(),
                    ));
                }
                Ok(Chord::new(key, Modifiers::new(ctrl, alt, shift, meta)))
            }
        }
    }
}
