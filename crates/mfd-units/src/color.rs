//! RGBA color with palette-name, hex, and float constructors.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

/// Errors raised while resolving or constructing a [`Color`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// `from_name` could not resolve the given name in any bundled palette.
    #[error("unknown color name: {0}")]
    UnknownColor(String),
    /// A hex code was not 6 or 8 hex digits long.
    #[error("hex code must be 6 or 8 characters long: {0}")]
    InvalidHex(String),
}

type Palette = HashMap<String, (u8, u8, u8)>;

fn parse_palette(text: &str, prefix: &str) -> Palette {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, hex)) = line.split_once(',') else {
            continue;
        };
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() < 6 {
            continue;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        map.insert(format!("{prefix}{}", name.trim().to_lowercase()), (r, g, b));
    }
    map
}

fn base_colors() -> &'static Palette {
    static TABLE: OnceLock<Palette> = OnceLock::new();
    TABLE.get_or_init(|| parse_palette(include_str!("colors/base_colors.csv"), ""))
}

fn tab_colors() -> &'static Palette {
    static TABLE: OnceLock<Palette> = OnceLock::new();
    TABLE.get_or_init(|| parse_palette(include_str!("colors/tableau_colors.csv"), "tab:"))
}

fn open_colors() -> &'static Palette {
    static TABLE: OnceLock<Palette> = OnceLock::new();
    TABLE.get_or_init(|| parse_palette(include_str!("colors/open_colors.csv"), ""))
}

fn x11_colors() -> &'static Palette {
    static TABLE: OnceLock<Palette> = OnceLock::new();
    TABLE.get_or_init(|| parse_palette(include_str!("colors/x11_colors.csv"), ""))
}

fn xkcd_colors() -> &'static Palette {
    static TABLE: OnceLock<Palette> = OnceLock::new();
    TABLE.get_or_init(|| parse_palette(include_str!("colors/xkcd_colors.csv"), "xkcd:"))
}

/// An RGBA color, each channel clamped to `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    /// Build a color from four already-clamped byte channels.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Clamp a signed value into `0..=255`, mirroring the reference
    /// implementation's `max(0, min(255, int(value)))`.
    fn clamp(value: f64) -> u8 {
        value.clamp(0.0, 255.0) as u8
    }

    /// Resolve a color by name against the five bundled palettes, with
    /// `c0..cN` cycling through the Tableau palette's keys in insertion
    /// order (matplotlib color-cycle shorthand).
    pub fn from_name(name: &str, alpha: u8) -> Result<Self, ColorError> {
        let lower = name.to_lowercase();
        let rgb = base_colors()
            .get(&lower)
            .or_else(|| tab_colors().get(&lower))
            .or_else(|| open_colors().get(&lower))
            .or_else(|| x11_colors().get(&lower))
            .or_else(|| xkcd_colors().get(&lower));

        if let Some(&(r, g, b)) = rgb {
            return Ok(Self::new(r, g, b, alpha));
        }

        if let Some(digits) = lower.strip_prefix('c') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                let index: usize = digits.parse().unwrap_or(0);
                let mut keys: Vec<&String> = tab_colors().keys().collect();
                keys.sort();
                if !keys.is_empty() {
                    let key = keys[index % keys.len()];
                    let &(r, g, b) = tab_colors().get(key).unwrap();
                    return Ok(Self::new(r, g, b, alpha));
                }
            }
        }

        Err(ColorError::UnknownColor(name.to_string()))
    }

    /// Build a color from an integer RGBA tuple (each `0..=255`).
    pub fn from_rgba(r: i64, g: i64, b: i64, a: i64) -> Self {
        Self::new(
            Self::clamp(r as f64),
            Self::clamp(g as f64),
            Self::clamp(b as f64),
            Self::clamp(a as f64),
        )
    }

    /// Build a color from normalised float channels (each `0.0..=1.0`).
    pub fn from_rgba_percent(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::new(
            Self::clamp(r * 255.0),
            Self::clamp(g * 255.0),
            Self::clamp(b * 255.0),
            Self::clamp(a * 255.0),
        )
    }

    /// Build a color from a packed hex code (6 or 8 hex digits, with or
    /// without a leading `#`). An 8-digit code's trailing byte is alpha;
    /// a 6-digit code uses `alpha`.
    pub fn from_hex(hex_code: &str, alpha: u8) -> Result<Self, ColorError> {
        let hex = hex_code.trim().trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorError::InvalidHex(hex_code.to_string()));
        }
        let parse = |s: &str| -> Result<u8, ColorError> {
            u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidHex(hex_code.to_string()))
        };
        let r = parse(&hex[0..2])?;
        let g = parse(&hex[2..4])?;
        let b = parse(&hex[4..6])?;
        let a = if hex.len() == 8 { parse(&hex[6..8])? } else { alpha };
        Ok(Self::new(r, g, b, a))
    }

    /// The four channels as `(r, g, b, a)` bytes.
    pub fn to_rgba(self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// The four channels as normalised floats.
    pub fn to_float(self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_color_resolves_across_palettes() {
        assert_eq!(Color::from_name("red", 255).unwrap().to_rgba(), (255, 0, 0, 255));
        assert_eq!(Color::from_name("tab:orange", 255).unwrap().to_rgba(), (0xFF, 0x7F, 0x0E, 255));
        assert_eq!(Color::from_name("xkcd:tea", 255).unwrap().to_rgba(), (0x65, 0xAB, 0x7C, 255));
    }

    #[test]
    fn cyclic_shorthand_wraps_tableau_keys() {
        let mut keys: Vec<&String> = tab_colors().keys().collect();
        keys.sort();
        let c0 = Color::from_name("c0", 255).unwrap();
        let expected = tab_colors().get(keys[0]).unwrap();
        assert_eq!(c0.to_rgba(), (expected.0, expected.1, expected.2, 255));

        let wrapped = Color::from_name(&format!("c{}", keys.len()), 255).unwrap();
        assert_eq!(wrapped, c0);
    }

    #[test]
    fn unknown_name_errors() {
        assert!(matches!(
            Color::from_name("not-a-color", 255),
            Err(ColorError::UnknownColor(_))
        ));
    }

    #[test]
    fn hex_with_and_without_alpha() {
        let c = Color::from_hex("#336699", 128).unwrap();
        assert_eq!(c.to_rgba(), (0x33, 0x66, 0x99, 128));
        let c8 = Color::from_hex("33669980", 255).unwrap();
        assert_eq!(c8.to_rgba(), (0x33, 0x66, 0x99, 0x80));
        assert!(Color::from_hex("123", 255).is_err());
    }

    #[test]
    fn rgba_percent_clamps_out_of_range() {
        let c = Color::from_rgba_percent(1.5, -0.5, 0.5, 1.0);
        assert_eq!(c.to_rgba(), (255, 0, 127, 255));
    }

    #[test]
    fn integer_rgba_clamps_out_of_range() {
        let c = Color::from_rgba(300, -10, 128, 255);
        assert_eq!(c.to_rgba(), (255, 0, 128, 255));
    }

    #[test]
    fn display_matches_reference_format() {
        let c = Color::new(1, 2, 3, 4);
        assert_eq!(c.to_string(), "rgba(1, 2, 3, 4)");
    }
}
