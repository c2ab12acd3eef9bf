#![forbid(unsafe_code)]

//! Colors as the canvas consumes them (CSS color strings).

use core::fmt;

/// An sRGB color with a straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// CSS form: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// An HSL color; hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    #[inline]
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// CSS `hsla(h, s%, l%, a)` string.
    #[must_use]
    pub fn hsla_css(&self, alpha: f64) -> String {
        format!(
            "hsla({}, {}%, {}%, {})",
            self.hue, self.saturation, self.lightness, alpha
        )
    }
}

/// Medium gray used for the runway line and its particles.
pub const RUNWAY_GRAY: Rgba = Rgba::rgb(110, 110, 115);

/// Runway line stroke: medium gray at 30% alpha.
pub const RUNWAY_LINE: Rgba = Rgba::rgba(110, 110, 115, 0.3);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn opaque_rgb_is_hex() {
        assert_eq!(RUNWAY_GRAY.to_css(), "#6e6e73");
    }

    #[test]
    fn translucent_rgb_is_functional() {
        assert_eq!(RUNWAY_LINE.to_css(), "rgba(110, 110, 115, 0.3)");
        assert_eq!(
            Rgba::rgb(255, 255, 255).with_alpha(0.95).to_css(),
            "rgba(255, 255, 255, 0.95)"
        );
    }

    #[test]
    fn hsla_formats_percentages() {
        let c = Hsl::new(45.0, 80.0, 60.5);
        assert_eq!(c.hsla_css(0.5), "hsla(45, 80%, 60.5%, 0.5)");
        assert_eq!(c.hsla_css(0.0), "hsla(45, 80%, 60.5%, 0)");
    }
}
