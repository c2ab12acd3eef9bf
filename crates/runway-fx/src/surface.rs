#![forbid(unsafe_code)]

//! Drawing surfaces.
//!
//! Effects never talk to a canvas directly. Each frame they emit a small set
//! of [`DrawCmd`] values into a [`Surface`]; the web frontend replays them on
//! a `CanvasRenderingContext2d` and [`RecordingSurface`] captures them for
//! deterministic tests.

use crate::color::{Hsl, Rgba};
use crate::geometry::Point;

const FNV64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Radial gradient stops for an ember: `(offset, alpha)` pairs.
pub const EMBER_STOPS: [(f64, f64); 3] = [(0.0, 1.0), (0.5, 0.5), (1.0, 0.0)];

/// One drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Dashed straight stroke.
    DashedLine {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
        dash: [f64; 2],
    },
    /// Filled circle with a same-colored shadow glow.
    Dot {
        center: Point,
        radius: f64,
        color: Rgba,
        alpha: f64,
        blur: f64,
    },
    /// Circle filled with a radial gradient fading from `color` at the center
    /// to transparent at `radius` (see [`EMBER_STOPS`]), drawn with global
    /// alpha `alpha`, then filled again with a shadow of `glow_blur` pixels
    /// whose color is `color` at `glow_alpha`.
    Ember {
        center: Point,
        radius: f64,
        color: Hsl,
        alpha: f64,
        glow_blur: f64,
        glow_alpha: f64,
    },
}

impl DrawCmd {
    fn hash_into(&self, mut hash: u64) -> u64 {
        let mut put = |bytes: &[u8]| {
            for &b in bytes {
                hash ^= u64::from(b);
                hash = hash.wrapping_mul(FNV64_PRIME);
            }
        };
        match self {
            Self::DashedLine {
                from,
                to,
                color,
                width,
                dash,
            } => {
                put(&[0]);
                for v in [from.x, from.y, to.x, to.y, color.a, *width, dash[0], dash[1]] {
                    put(&v.to_bits().to_le_bytes());
                }
                put(&[color.r, color.g, color.b]);
            }
            Self::Dot {
                center,
                radius,
                color,
                alpha,
                blur,
            } => {
                put(&[1]);
                for v in [center.x, center.y, *radius, color.a, *alpha, *blur] {
                    put(&v.to_bits().to_le_bytes());
                }
                put(&[color.r, color.g, color.b]);
            }
            Self::Ember {
                center,
                radius,
                color,
                alpha,
                glow_blur,
                glow_alpha,
            } => {
                put(&[2]);
                for v in [
                    center.x,
                    center.y,
                    *radius,
                    color.hue,
                    color.saturation,
                    color.lightness,
                    *alpha,
                    *glow_blur,
                    *glow_alpha,
                ] {
                    put(&v.to_bits().to_le_bytes());
                }
            }
        }
        hash
    }
}

/// A 2D target that effects draw into.
pub trait Surface {
    /// Match the backing store to the viewport.
    fn resize(&mut self, width: f64, height: f64);

    /// Erase the whole surface.
    fn clear(&mut self);

    /// Execute one drawing operation.
    fn draw(&mut self, cmd: &DrawCmd);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn resize(&mut self, width: f64, height: f64) {
        (**self).resize(width, height);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn draw(&mut self, cmd: &DrawCmd) {
        (**self).draw(cmd);
    }
}

/// Surface that records what was drawn since the last clear.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    clears: u64,
    total_draws: u64,
    commands: Vec<DrawCmd>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Commands drawn since the most recent [`Surface::clear`].
    #[must_use]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Number of clears performed over the surface lifetime.
    #[must_use]
    pub const fn clears(&self) -> u64 {
        self.clears
    }

    /// Number of draw calls over the surface lifetime.
    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.total_draws
    }

    /// Current backing size.
    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Dots drawn since the last clear.
    pub fn dots(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Dot { .. }))
    }

    /// Embers drawn since the last clear.
    pub fn embers(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Ember { .. }))
    }

    /// Deterministic FNV-1a hash of the commands since the last clear.
    #[must_use]
    pub fn frame_hash(&self) -> u64 {
        self.commands
            .iter()
            .fold(FNV64_OFFSET_BASIS, |hash, cmd| cmd.hash_into(hash))
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.commands.clear();
    }

    fn draw(&mut self, cmd: &DrawCmd) {
        self.total_draws += 1;
        self.commands.push(cmd.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RUNWAY_GRAY;

    fn dot(x: f64) -> DrawCmd {
        DrawCmd::Dot {
            center: Point::new(x, 0.0),
            radius: 2.0,
            color: RUNWAY_GRAY,
            alpha: 1.0,
            blur: 10.0,
        }
    }

    #[test]
    fn clear_drops_frame_but_keeps_totals() {
        let mut s = RecordingSurface::new(100.0, 100.0);
        s.draw(&dot(1.0));
        s.draw(&dot(2.0));
        assert_eq!(s.commands().len(), 2);
        s.clear();
        assert!(s.commands().is_empty());
        assert_eq!(s.total_draws(), 2);
        assert_eq!(s.clears(), 1);
    }

    #[test]
    fn frame_hash_tracks_content() {
        let mut a = RecordingSurface::default();
        let mut b = RecordingSurface::default();
        a.draw(&dot(1.0));
        b.draw(&dot(1.0));
        assert_eq!(a.frame_hash(), b.frame_hash());
        b.clear();
        b.draw(&dot(1.5));
        assert_ne!(a.frame_hash(), b.frame_hash());
    }

    #[test]
    fn empty_frame_hash_is_offset_basis() {
        assert_eq!(RecordingSurface::default().frame_hash(), FNV64_OFFSET_BASIS);
    }

    #[test]
    fn resize_updates_size() {
        let mut s = RecordingSurface::new(10.0, 10.0);
        s.resize(1280.0, 720.0);
        assert_eq!(s.size(), (1280.0, 720.0));
    }

    #[test]
    fn filters_split_by_kind() {
        let mut s = RecordingSurface::default();
        s.draw(&dot(1.0));
        s.draw(&DrawCmd::Ember {
            center: Point::new(0.0, 0.0),
            radius: 3.0,
            color: Hsl::new(40.0, 80.0, 60.0),
            alpha: 0.8,
            glow_blur: 20.0,
            glow_alpha: 0.5,
        });
        assert_eq!(s.dots().count(), 1);
        assert_eq!(s.embers().count(), 1);
    }
}
