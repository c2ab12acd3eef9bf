#![forbid(unsafe_code)]

//! Runway line: particles streaming from the cursor to the chat widget.
//!
//! A fixed pool of particles each carry a `progress` fraction along the
//! segment from the source point to the target point. Every frame each
//! particle advances by its own speed; on reaching the end it restarts at the
//! source with fresh speed, size and opacity. Nothing is ever allocated or
//! freed after construction.

use crate::color::{RUNWAY_GRAY, RUNWAY_LINE};
use crate::geometry::Point;
use crate::rng::RandomSource;
use crate::surface::{DrawCmd, Surface};

/// Shadow blur around each runway particle.
const DOT_BLUR: f64 = 10.0;
/// Stroke width of the connecting line.
const LINE_WIDTH: f64 = 1.0;
/// Dash pattern of the connecting line.
const LINE_DASH: [f64; 2] = [5.0, 5.0];

/// A single runway particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineParticle {
    /// Fraction of the way from source to target, in `[0, 1)`.
    pub progress: f64,
    /// Progress added per frame, in `[0.01, 0.02)`.
    pub speed: f64,
    /// Draw radius, in `[2, 4)`.
    pub size: f64,
    /// Base alpha, in `[0.3, 1.0)`.
    pub opacity: f64,
}

impl LineParticle {
    /// A fresh particle at the source end.
    pub fn spawn<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut p = Self {
            progress: 0.0,
            speed: 0.0,
            size: 0.0,
            opacity: 0.0,
        };
        p.reset(rng);
        p
    }

    /// Restart at the source with new speed, size and opacity (in that draw
    /// order).
    pub fn reset<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.progress = 0.0;
        self.speed = rng.spread(0.01, 0.01);
        self.size = rng.spread(2.0, 2.0);
        self.opacity = rng.spread(0.3, 0.7);
    }

    /// Advance one frame, restarting when the end is reached.
    pub fn advance<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.progress += self.speed;
        if self.progress >= 1.0 {
            self.reset(rng);
        }
    }

    /// Screen position for the current progress.
    #[inline]
    pub fn position(&self, from: Point, to: Point) -> Point {
        from.lerp(to, self.progress)
    }

    /// Draw alpha: fades to half the base opacity at the target.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.opacity * (1.0 - self.progress * 0.5)
    }
}

/// The runway particle pool.
#[derive(Debug, Clone)]
pub struct LineParticleSystem {
    particles: Vec<LineParticle>,
}

impl LineParticleSystem {
    /// Build a pool of `count` particles with progress staggered at `i / count`.
    pub fn new<R: RandomSource + ?Sized>(count: usize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|i| {
                let mut p = LineParticle::spawn(rng);
                p.progress = i as f64 / count as f64;
                p
            })
            .collect();
        Self { particles }
    }

    /// Wrap an explicit pool (tests, restored sessions).
    #[must_use]
    pub fn from_particles(particles: Vec<LineParticle>) -> Self {
        Self { particles }
    }

    #[must_use]
    pub fn particles(&self) -> &[LineParticle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance every particle one frame.
    pub fn update<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            p.advance(rng);
        }
    }

    /// Draw the dashed line, then every particle on top of it.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, from: Point, to: Point) {
        surface.draw(&DrawCmd::DashedLine {
            from,
            to,
            color: RUNWAY_LINE,
            width: LINE_WIDTH,
            dash: LINE_DASH,
        });
        for p in &self.particles {
            surface.draw(&DrawCmd::Dot {
                center: p.position(from, to),
                radius: p.size,
                color: RUNWAY_GRAY,
                alpha: p.alpha(),
                blur: DOT_BLUR,
            });
        }
    }

    /// One frame: update, then render between `from` and `to`.
    pub fn step<R, S>(&mut self, rng: &mut R, surface: &mut S, from: Point, to: Point)
    where
        R: RandomSource + ?Sized,
        S: Surface + ?Sized,
    {
        self.update(rng);
        self.render(surface, from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{SequenceSource, XorShift32};
    use crate::surface::RecordingSurface;
    use pretty_assertions::assert_eq;

    #[test]
    fn reset_draws_speed_size_opacity_in_order() {
        let mut rng = SequenceSource::new(vec![0.5, 0.25, 0.0]);
        let p = LineParticle::spawn(&mut rng);
        assert_eq!(p.progress, 0.0);
        assert_eq!(p.speed, 0.01 + 0.5 * 0.01);
        assert_eq!(p.size, 2.5);
        assert_eq!(p.opacity, 0.3);
    }

    #[test]
    fn halfway_particle_position_and_alpha() {
        let p = LineParticle {
            progress: 0.5,
            speed: 0.01,
            size: 2.0,
            opacity: 0.8,
        };
        let at = p.position(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert_eq!(at, Point::new(50.0, 50.0));
        assert_eq!(p.alpha(), 0.8 * 0.75);
    }

    #[test]
    fn reaching_the_end_resets() {
        let mut rng = SequenceSource::constant(0.0);
        let mut p = LineParticle {
            progress: 0.995,
            speed: 0.01,
            size: 3.0,
            opacity: 0.9,
        };
        p.advance(&mut rng);
        assert_eq!(p.progress, 0.0);
        assert_eq!(p.speed, 0.01);
        assert_eq!(p.size, 2.0);
        assert_eq!(p.opacity, 0.3);
    }

    #[test]
    fn pool_is_staggered() {
        let mut rng = XorShift32::new(3);
        let sys = LineParticleSystem::new(15, &mut rng);
        assert_eq!(sys.len(), 15);
        for (i, p) in sys.particles().iter().enumerate() {
            assert_eq!(p.progress, i as f64 / 15.0);
        }
    }

    #[test]
    fn progress_stays_below_one() {
        let mut rng = XorShift32::new(11);
        let mut sys = LineParticleSystem::new(15, &mut rng);
        for _ in 0..1000 {
            sys.update(&mut rng);
            for p in sys.particles() {
                assert!((0.0..1.0).contains(&p.progress));
            }
        }
    }

    #[test]
    fn render_draws_line_first_then_every_particle() {
        let mut rng = XorShift32::new(5);
        let sys = LineParticleSystem::new(4, &mut rng);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let from = Point::new(10.0, 10.0);
        let to = Point::new(700.0, 500.0);
        sys.render(&mut surface, from, to);

        let cmds = surface.commands();
        assert_eq!(cmds.len(), 5);
        assert!(matches!(cmds[0], DrawCmd::DashedLine { dash, .. } if dash == [5.0, 5.0]));
        for (cmd, p) in cmds[1..].iter().zip(sys.particles()) {
            match cmd {
                DrawCmd::Dot {
                    center,
                    radius,
                    alpha,
                    ..
                } => {
                    assert_eq!(*center, from.lerp(to, p.progress));
                    assert_eq!(*radius, p.size);
                    assert_eq!(*alpha, p.alpha());
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }
}
