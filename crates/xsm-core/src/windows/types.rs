use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// X11 window handle.
///
/// Serialized in the display server's native hexadecimal form
/// (`0x03a00007`, as printed by `wmctrl`); [`WindowId::as_u64`] gives the
/// numeric form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WindowId(u64);

impl WindowId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse `0x03a00007`, `0X3A00007` or a bare hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return None;
        }
        u64::from_str_radix(digits, 16).ok().map(Self)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn as_hex(&self) -> String {
        format!("0x{:08x}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl Serialize for WindowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for WindowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        WindowId::from_hex(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid window id '{raw}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One line of the live window list, identity and position only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWindow {
    pub id: WindowId,
    /// `-1` means the window is shown on every desktop.
    pub desktop: i32,
    pub pid: u32,
    pub geometry: Geometry,
    pub machine: String,
    /// Empty for some dialogs.
    pub title: String,
}
