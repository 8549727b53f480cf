use crate::foundation::core::Rgba8Premul;
use std::fmt;
use std::str::FromStr;

/// Straight-alpha 8-bit color as picked by the user.
///
/// Reads from a CSS hex string (`"#rgb"`, `"#rrggbb"`, `"#rrggbbaa"`) or an `[r, g, b(, a)]`
/// byte array, and always writes back as `"#rrggbbaa"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColorDef {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, `255` is opaque.
    pub a: u8,
}

impl ColorDef {
    /// Build a color from straight channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS hex color, with or without the leading `#`.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid hex color \"{s}\""));
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).unwrap_or(0);
        let byte = |i: usize| (nibble(i) << 4) | nibble(i + 1);

        match digits.len() {
            3 => Ok(Self::rgba(nibble(0) * 17, nibble(1) * 17, nibble(2) * 17, 255)),
            6 => Ok(Self::rgba(byte(0), byte(2), byte(4), 255)),
            8 => Ok(Self::rgba(byte(0), byte(2), byte(4), byte(6))),
            n => Err(format!(
                "hex color \"{s}\" has {n} digits, expected 3, 6 or 8"
            )),
        }
    }

    /// Convert to premultiplied RGBA8.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }
}

impl Default for ColorDef {
    fn default() -> Self {
        Self::rgba(0x63, 0x66, 0xf1, 0xff)
    }
}

impl FromStr for ColorDef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for ColorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl serde::Serialize for ColorDef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ColorDef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Bytes(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Bytes(v) => match v.as_slice() {
                &[r, g, b] => Ok(Self::rgba(r, g, b, 255)),
                &[r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
                _ => Err(serde::de::Error::custom(
                    "color array must be [r, g, b] or [r, g, b, a]",
                )),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
