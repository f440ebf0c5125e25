//! Key names accepted on the command line and in config files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single key that can take part in a chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeySpec {
    /// Command on macOS, Super/Windows elsewhere.
    Meta,
    Control,
    Alt,
    Shift,
    Return,
    Space,
    Tab,
    Escape,
    Backspace,
    /// A key that produces the given character on the active layout.
    Char(char),
}

impl KeySpec {
    /// Whether this key is conventionally used as a modifier.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            KeySpec::Meta | KeySpec::Control | KeySpec::Alt | KeySpec::Shift
        )
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySpec::Meta => f.write_str("meta"),
            KeySpec::Control => f.write_str("control"),
            KeySpec::Alt => f.write_str("alt"),
            KeySpec::Shift => f.write_str("shift"),
            KeySpec::Return => f.write_str("return"),
            KeySpec::Space => f.write_str("space"),
            KeySpec::Tab => f.write_str("tab"),
            KeySpec::Escape => f.write_str("escape"),
            KeySpec::Backspace => f.write_str("backspace"),
            KeySpec::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Error returned when a key name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key: '{}'", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for KeySpec {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if !c.is_whitespace() && !c.is_control() {
                return Ok(KeySpec::Char(c));
            }
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "meta" | "cmd" | "command" | "super" | "win" | "windows" => Ok(KeySpec::Meta),
            "control" | "ctrl" => Ok(KeySpec::Control),
            "alt" | "option" => Ok(KeySpec::Alt),
            "shift" => Ok(KeySpec::Shift),
            "return" | "enter" => Ok(KeySpec::Return),
            "space" => Ok(KeySpec::Space),
            "tab" => Ok(KeySpec::Tab),
            "escape" | "esc" => Ok(KeySpec::Escape),
            "backspace" => Ok(KeySpec::Backspace),
            _ => Err(UnknownKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for KeySpec {
    type Error = UnknownKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeySpec> for String {
    fn from(key: KeySpec) -> Self {
        key.to_string()
    }
}
