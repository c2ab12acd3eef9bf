#![forbid(unsafe_code)]

//! Golden ember ring orbiting a rounded panel.
//!
//! Embers sit at an angle on the panel perimeter (see
//! [`perimeter_point`]) and drift counter-clockwise. Each one burns down from
//! `life = 1.0` at its own decay rate. When it burns out it stays dark for
//! exactly one frame, then relights in place with a new decay and size;
//! angle, speed and color are kept for the ember's whole existence.
//!
//! # Determinism
//!
//! All randomness flows through the caller's [`RandomSource`].

use core::f64::consts::TAU;

use crate::color::Hsl;
use crate::geometry::{Bounds, perimeter_point};
use crate::rng::RandomSource;
use crate::surface::{DrawCmd, Surface};

/// Shadow blur of the glow pass.
const GLOW_BLUR: f64 = 20.0;
/// Global alpha scale of the gradient pass.
const BODY_ALPHA: f64 = 0.8;
/// Glow alpha scale.
const GLOW_ALPHA: f64 = 0.5;

/// Decay range lower bound (per frame).
pub const DECAY_MIN: f64 = 0.005;
/// Decay range width; decay is drawn from `[DECAY_MIN, DECAY_MIN + DECAY_SPREAD)`.
pub const DECAY_SPREAD: f64 = 0.01;

/// A single ember.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireParticle {
    /// Perimeter parameter in radians; decreases every frame.
    pub angle: f64,
    /// Angular step per frame, in `[0.01, 0.02)`.
    pub speed: f64,
    /// Radius, in `[3, 7)`.
    pub size: f64,
    /// Remaining life in `[0, 1]`.
    pub life: f64,
    /// Life lost per frame, in `[0.005, 0.015)`.
    pub decay: f64,
    /// Hue in degrees, `[30, 60)`.
    pub hue: f64,
    /// Saturation percent, `[70, 100)`.
    pub saturation: f64,
    /// Lightness percent, `[50, 70)`.
    pub lightness: f64,
}

impl FireParticle {
    /// Light a new ember at `angle`.
    ///
    /// Samples are drawn as speed, size, decay, hue, saturation, lightness.
    pub fn new<R: RandomSource + ?Sized>(angle: f64, rng: &mut R) -> Self {
        let speed = rng.spread(0.01, 0.01);
        let size = rng.spread(3.0, 4.0);
        let decay = rng.spread(DECAY_MIN, DECAY_SPREAD);
        let hue = rng.spread(30.0, 30.0);
        let saturation = rng.spread(70.0, 30.0);
        let lightness = rng.spread(50.0, 20.0);
        Self {
            angle,
            speed,
            size,
            life: 1.0,
            decay,
            hue,
            saturation,
            lightness,
        }
    }

    /// Whether the ember is currently burnt out (drawn as nothing).
    #[inline]
    pub fn is_dark(&self) -> bool {
        self.life <= 0.0
    }

    /// Advance one frame.
    ///
    /// The angle always drifts. A dark ember relights to `life = 1.0` with a
    /// fresh decay and size (drawn in that order); a lit ember loses `decay`,
    /// bottoming out at `0.0`.
    pub fn advance<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.angle -= self.speed;
        if self.is_dark() {
            self.life = 1.0;
            self.decay = rng.spread(DECAY_MIN, DECAY_SPREAD);
            self.size = rng.spread(3.0, 4.0);
        } else {
            self.life = (self.life - self.decay).max(0.0);
        }
    }

    /// Ember color.
    #[inline]
    pub fn color(&self) -> Hsl {
        Hsl::new(self.hue, self.saturation, self.lightness)
    }

    /// Draw command for this ember on `panel`, or `None` while dark.
    pub fn draw_cmd(&self, panel: Bounds, corner_radius: f64) -> Option<DrawCmd> {
        if self.is_dark() {
            return None;
        }
        Some(DrawCmd::Ember {
            center: perimeter_point(self.angle, panel, corner_radius),
            radius: self.size,
            color: self.color(),
            alpha: self.life * BODY_ALPHA,
            glow_blur: GLOW_BLUR,
            glow_alpha: self.life * GLOW_ALPHA,
        })
    }
}

/// The ember pool for one panel.
#[derive(Debug, Clone)]
pub struct FireRing {
    particles: Vec<FireParticle>,
    corner_radius: f64,
}

impl FireRing {
    /// Build `count` embers spread evenly around the full circle.
    pub fn new<R: RandomSource + ?Sized>(count: usize, corner_radius: f64, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|i| FireParticle::new(i as f64 / count as f64 * TAU, rng))
            .collect();
        Self {
            particles,
            corner_radius,
        }
    }

    /// Wrap an explicit pool.
    #[must_use]
    pub fn from_particles(particles: Vec<FireParticle>, corner_radius: f64) -> Self {
        Self {
            particles,
            corner_radius,
        }
    }

    #[must_use]
    pub fn particles(&self) -> &[FireParticle] {
        &self.particles
    }

    #[must_use]
    pub const fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance every ember one frame.
    pub fn update<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            p.advance(rng);
        }
    }

    /// Draw every lit ember on the outline of `panel`. Returns how many were
    /// drawn.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, panel: Bounds) -> usize {
        let mut drawn = 0;
        for cmd in self
            .particles
            .iter()
            .filter_map(|p| p.draw_cmd(panel, self.corner_radius))
        {
            surface.draw(&cmd);
            drawn += 1;
        }
        drawn
    }

    /// One frame: update, then render.
    pub fn step<R, S>(&mut self, rng: &mut R, surface: &mut S, panel: Bounds) -> usize
    where
        R: RandomSource + ?Sized,
        S: Surface + ?Sized,
    {
        self.update(rng);
        self.render(surface, panel)
    }
}
