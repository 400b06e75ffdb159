//! RGBA colors and CSS color strings.
//!
//! Element models store colors as CSS strings (`"#ff6384"`,
//! `"rgba(0,0,0,0.1)"`, `"steelblue"`). Transitions parse both ends, blend
//! them and write the result back as an `rgb()`/`rgba()` string.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;

/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// ```
/// use chartkit_core::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// let from_hex = Color::from_hex(0xFF8800);
/// let parsed = Color::parse("rgba(255, 136, 0, 0.5)").unwrap();
/// assert_eq!(parsed.with_alpha(1.0), from_hex);
/// assert_eq!(red.to_css_string(), "rgb(255, 0, 0)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGB components with full opacity (alpha = 1.0).
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values (0–255 mapped to 0.0–1.0).
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create a color from 8-bit RGB values with full opacity.
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, 255)
    }

    /// Create a color from a 24-bit RGB hex value (e.g. `0xFF8800`).
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self::from_rgb_u8(r, g, b)
    }

    /// Create a color from a 32-bit RGBA hex value (e.g. `0xFF880080`).
    pub fn from_hex_alpha(hex: u32) -> Self {
        let r = ((hex >> 24) & 0xFF) as u8;
        let g = ((hex >> 16) & 0xFF) as u8;
        let b = ((hex >> 8) & 0xFF) as u8;
        let a = (hex & 0xFF) as u8;
        Self::from_rgba_u8(r, g, b, a)
    }

    /// Replace the alpha channel.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse a CSS color string.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` (channels may be percentages), `transparent` and the
    /// CSS named colors.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        let lower = trimmed.to_ascii_lowercase();
        let err = || ColorParseError::new(trimmed);

        if lower == "transparent" {
            return Ok(Self::TRANSPARENT);
        }

        let args = functional_args(&lower, "rgba").or_else(|| functional_args(&lower, "rgb"));
        if let Some(args) = args {
            return parse_rgb_function(args).ok_or_else(err);
        }

        if let Some(hex) = lower.strip_prefix('#') {
            if hex.len() == 8 {
                let value = u32::from_str_radix(hex, 16).map_err(|_| err())?;
                return Ok(Self::from_hex_alpha(value));
            }
            let rgb = Srgb::<u8>::from_str(hex).map_err(|_| err())?;
            return Ok(Self::from_rgb_u8(rgb.red, rgb.green, rgb.blue));
        }

        palette::named::from_str(&lower)
            .map(|rgb| Self::from_rgb_u8(rgb.red, rgb.green, rgb.blue))
            .ok_or_else(err)
    }

    /// Linear blend towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn mix(self, other: Color, t: f32) -> Self {
        let lerp = |a: f32, b: f32| a + (b - a) * t;
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }

    /// Format as a CSS `rgb()` string, or `rgba()` when translucent.
    pub fn to_css_string(self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b) = (channel(self.r), channel(self.g), channel(self.b));
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", r, g, b)
        } else {
            // Two decimals is what CSS serializers emit for alpha.
            let a = (self.a.clamp(0.0, 1.0) * 100.0).round() / 100.0;
            format!("rgba({}, {}, {}, {})", r, g, b, a)
        }
    }

    /// Convert to an `[r, g, b, a]` array.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[f32; 4]> for Color {
    fn from(arr: [f32; 4]) -> Self {
        Self {
            r: arr[0],
            g: arr[1],
            b: arr[2],
            a: arr[3],
        }
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string())
    }
}

/// A string that is not a recognised CSS color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    input: String,
}

impl ColorParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid color: {:?}", self.input)
    }
}

impl std::error::Error for ColorParseError {}

fn functional_args<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    input
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_function(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<f32> {
        let value = match s.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
            None => s.parse::<f32>().ok()? / 255.0,
        };
        value.is_finite().then(|| value.clamp(0.0, 1.0))
    };

    let alpha = match parts.get(3) {
        Some(s) => {
            let a = match s.strip_suffix('%') {
                Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
                None => s.parse::<f32>().ok()?,
            };
            if !a.is_finite() {
                return None;
            }
            a.clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    Some(Color::rgba(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(Color::parse("#0f0").unwrap(), Color::rgb(0.0, 1.0, 0.0));
        assert_eq!(
            Color::parse("#0000ff80").unwrap(),
            Color::from_rgba_u8(0, 0, 255, 0x80)
        );
    }

    #[test]
    fn test_parse_functional() {
        let c = Color::parse("rgba(0, 0, 0, 0.1)").unwrap();
        assert_eq!(c, Color::rgba(0.0, 0.0, 0.0, 0.1));

        let c = Color::parse("RGB(100%, 0%, 50%)").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("white").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("transparent").unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::parse("not-a-color").is_err());
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("#12345").is_err());
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Color::rgb(1.0, 0.0, 0.0);
        let b = Color::rgb(0.0, 0.0, 1.0);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);

        let mid = a.mix(b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_css_string() {
        assert_eq!(Color::from_hex(0x36A2EB).to_css_string(), "rgb(54, 162, 235)");
        assert_eq!(
            Color::rgba(1.0, 1.0, 1.0, 0.5).to_css_string(),
            "rgba(255, 255, 255, 0.5)"
        );
    }
}
