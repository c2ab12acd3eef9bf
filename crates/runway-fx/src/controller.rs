#![forbid(unsafe_code)]

//! Animation controller owning all per-page effect state.
//!
//! [`LandingFx`] holds both particle pools, one random source per pool, the
//! last known pointer position, and the widget locator. The two effects never
//! share state: the runway pausing below the breakpoint does not change what
//! the ember ring draws. Hosts feed it pointer moves and
//! viewport changes, and ask it to render one frame onto each surface.
//! Several controllers can run side by side; nothing is global.

use crate::config::FxConfig;
use crate::error::FxError;
use crate::fire::FireRing;
use crate::geometry::{Point, Viewport};
use crate::line::LineParticleSystem;
use crate::locator::{WidgetLocator, WidgetTarget};
use crate::page::PageHost;
use crate::rng::{RandomSource, XorShift32};
use crate::surface::Surface;

/// Salt separating the ember stream from the runway stream of one seed.
const FIRE_SEED_SALT: u32 = 0x9E37_79B9;

/// What the runway line did on a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineFrame {
    /// Viewport at or below the breakpoint; nothing drawn.
    Suppressed,
    /// Line and particles drawn from the pointer to `target`.
    Drawn { target: Point },
}

/// What the ember ring did on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireFrame {
    /// The panel could not be found or measured; nothing drawn.
    NoPanel,
    /// `lit` embers drawn.
    Drawn { lit: usize },
}

/// Outcome of [`LandingFx::render_frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub line: LineFrame,
    pub fire: FireFrame,
}

/// Per-page effect controller.
#[derive(Debug)]
pub struct LandingFx<E, R = XorShift32> {
    config: FxConfig,
    line_rng: R,
    fire_rng: R,
    line: LineParticleSystem,
    fire: FireRing,
    pointer: Point,
    locator: WidgetLocator<E>,
    warned_panel: bool,
}

impl<E: Clone + PartialEq> LandingFx<E, XorShift32> {
    /// Build a controller seeded from `config.seed`, or `fallback_seed` when
    /// the config leaves it unset. Each effect gets its own stream.
    pub fn seeded(config: FxConfig, fallback_seed: u32) -> Result<Self, FxError> {
        let seed = config.seed.unwrap_or(fallback_seed);
        Self::with_rng(
            config,
            XorShift32::new(seed),
            XorShift32::new(seed ^ FIRE_SEED_SALT),
        )
    }
}

impl<E: Clone + PartialEq, R: RandomSource> LandingFx<E, R> {
    /// Build a controller drawing runway samples from `line_rng` and ember
    /// samples from `fire_rng`.
    pub fn with_rng(config: FxConfig, mut line_rng: R, mut fire_rng: R) -> Result<Self, FxError> {
        config.validate()?;
        let line = LineParticleSystem::new(config.line.particle_count, &mut line_rng);
        let fire = FireRing::new(
            config.fire.particle_count,
            config.fire.corner_radius,
            &mut fire_rng,
        );
        let locator = WidgetLocator::new(config.line.selectors.clone(), config.line.fallback_size);
        tracing::info!(
            line_particles = line.len(),
            fire_particles = fire.len(),
            breakpoint_px = config.line.breakpoint_px,
            "landing effects initialized"
        );
        Ok(Self {
            config,
            line_rng,
            fire_rng,
            line,
            fire,
            pointer: Point::default(),
            locator,
            warned_panel: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    #[must_use]
    pub fn line(&self) -> &LineParticleSystem {
        &self.line
    }

    #[must_use]
    pub fn fire(&self) -> &FireRing {
        &self.fire
    }

    #[must_use]
    pub fn locator(&self) -> &WidgetLocator<E> {
        &self.locator
    }

    /// Last pointer position reported by the host.
    #[must_use]
    pub const fn pointer(&self) -> Point {
        self.pointer
    }

    /// Record a pointer move (client coordinates).
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Point::new(x, y);
    }

    /// Resize both surfaces to the viewport.
    pub fn resize<L, F>(&self, viewport: Viewport, line_surface: &mut L, fire_surface: &mut F)
    where
        L: Surface + ?Sized,
        F: Surface + ?Sized,
    {
        tracing::debug!(width = viewport.width, height = viewport.height, "surfaces resized");
        line_surface.resize(viewport.width, viewport.height);
        fire_surface.resize(viewport.width, viewport.height);
    }

    /// Whether the runway line is hidden at this viewport width.
    #[must_use]
    pub fn line_suppressed(&self, viewport: Viewport) -> bool {
        viewport.width <= self.config.line.breakpoint_px
    }

    /// Clear `surface` and draw one runway frame.
    ///
    /// The breakpoint is checked against the live viewport every frame. While
    /// suppressed the particles do not advance and the widget is not looked
    /// up.
    pub fn render_line<H, S>(&mut self, host: &H, surface: &mut S) -> LineFrame
    where
        H: PageHost<Element = E> + ?Sized,
        S: Surface + ?Sized,
    {
        surface.clear();
        if self.line_suppressed(host.viewport()) {
            return LineFrame::Suppressed;
        }
        let target = self.locator.target_center(host);
        self.line.step(&mut self.line_rng, surface, self.pointer, target);
        LineFrame::Drawn { target }
    }

    /// Clear `surface` and draw one ember-ring frame around the panel.
    ///
    /// Embers keep burning while the panel is missing so they do not all
    /// relight at once when it appears.
    pub fn render_fire<H, S>(&mut self, host: &H, surface: &mut S) -> FireFrame
    where
        H: PageHost<Element = E> + ?Sized,
        S: Surface + ?Sized,
    {
        surface.clear();
        self.fire.update(&mut self.fire_rng);
        let panel = host
            .query(&self.config.fire.panel_selector)
            .and_then(|el| host.bounding_rect(&el));
        let Some(panel) = panel else {
            if !self.warned_panel {
                self.warned_panel = true;
                tracing::warn!(
                    selector = self.config.fire.panel_selector.as_str(),
                    "fire panel missing, ember ring hidden"
                );
            }
            return FireFrame::NoPanel;
        };
        FireFrame::Drawn {
            lit: self.fire.render(surface, panel),
        }
    }

    /// Render one frame of both effects.
    pub fn render_frame<H, L, F>(
        &mut self,
        host: &H,
        line_surface: &mut L,
        fire_surface: &mut F,
    ) -> FrameReport
    where
        H: PageHost<Element = E> + ?Sized,
        L: Surface + ?Sized,
        F: Surface + ?Sized,
    {
        let line = self.render_line(host, line_surface);
        let fire = self.render_fire(host, fire_surface);
        FrameReport { line, fire }
    }

    /// Re-run widget discovery. Returns whether the target changed.
    pub fn poll_widget<H>(&mut self, host: &H) -> bool
    where
        H: PageHost<Element = E> + ?Sized,
    {
        self.locator.poll(host)
    }

    /// Current widget target, if discovery has run.
    #[must_use]
    pub fn widget(&self) -> Option<&WidgetTarget<E>> {
        self.locator.cached()
    }
}
