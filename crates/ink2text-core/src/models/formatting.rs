//! User formatting preferences applied to rendered text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Ink2TextError;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Components scaled to the 0.0 - 1.0 range.
    pub fn to_unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Rgb {
    type Err = Ink2TextError;

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Ink2TextError::Config(format!("invalid color: {s}"));

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..=i], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Font family choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    /// CSS generic family.
    pub fn css_family(self) -> &'static str {
        match self {
            FontFamily::Sans => "sans-serif",
            FontFamily::Serif => "serif",
            FontFamily::Mono => "monospace",
        }
    }
}

impl FromStr for FontFamily {
    type Err = Ink2TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sans" | "sans-serif" => Ok(FontFamily::Sans),
            "serif" => Ok(FontFamily::Serif),
            "mono" | "monospace" => Ok(FontFamily::Mono),
            other => Err(Ink2TextError::Config(format!("unknown font family: {other}"))),
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::Sans => write!(f, "sans"),
            FontFamily::Serif => write!(f, "serif"),
            FontFamily::Mono => write!(f, "mono"),
        }
    }
}

/// Text styling chosen by the user.
///
/// Applies uniformly to header, table body and footer. Independent of the
/// extraction lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingPreferences {
    pub text_color: Rgb,
    pub font_family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#EC4899".parse::<Rgb>().unwrap(), Rgb::new(236, 72, 153));
        assert_eq!("ec4899".parse::<Rgb>().unwrap(), Rgb::new(236, 72, 153));
        assert_eq!("#fff".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#GGGGGG".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_color_round_trip_through_json() {
        let prefs = FormattingPreferences {
            text_color: Rgb::new(1, 2, 3),
            font_family: FontFamily::Mono,
            bold: true,
            italic: false,
        };
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains("\"#010203\""));
        assert!(json.contains("\"mono\""));
        let back: FormattingPreferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }

    #[test]
    fn test_defaults() {
        let prefs = FormattingPreferences::default();
        assert_eq!(prefs.text_color.to_hex(), "#FFFFFF");
        assert_eq!(prefs.font_family, FontFamily::Sans);
        assert!(!prefs.bold && !prefs.italic);
    }

    #[test]
    fn test_font_family_parse() {
        assert_eq!("Serif".parse::<FontFamily>().unwrap(), FontFamily::Serif);
        assert_eq!("monospace".parse::<FontFamily>().unwrap(), FontFamily::Mono);
        assert!("cursive".parse::<FontFamily>().is_err());
    }
}
