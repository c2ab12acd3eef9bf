#![forbid(unsafe_code)]

//! Host-driven fixed-timestep frame driver.
//!
//! [`FrameDriver`] runs a [`LandingFx`] without threads, timers, or a real
//! clock. The host owns the event loop:
//!
//! 1. Call [`FrameDriver::init`] once; it renders the first frame.
//! 2. Move time with [`FrameDriver::advance_time`] or
//!    [`FrameDriver::set_time`] (for example from the
//!    `requestAnimationFrame` timestamp).
//! 3. Call [`FrameDriver::step`]; it renders one frame per elapsed fixed
//!    interval and fires the widget poll whenever its period has passed.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use runway_fx::config::FxConfig;
//! use runway_fx::driver::FrameDriver;
//! use runway_fx::page::MemoryPage;
//! use runway_fx::surface::RecordingSurface;
//!
//! let page = MemoryPage::new(1280.0, 800.0);
//! let mut line = RecordingSurface::default();
//! let mut fire = RecordingSurface::default();
//! let mut driver = FrameDriver::new(FxConfig::default().with_seed(7), 0).unwrap();
//!
//! driver.init(&page, &mut line, &mut fire);
//! driver.advance_time(Duration::from_millis(17));
//! let step = driver.step(&page, &mut line, &mut fire);
//! assert_eq!(step.frames_rendered, 1);
//! ```

use core::time::Duration;

use crate::config::FxConfig;
use crate::controller::{FrameReport, LandingFx};
use crate::error::FxError;
use crate::page::PageHost;
use crate::rng::{RandomSource, XorShift32};
use crate::surface::Surface;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// Result of a single [`FrameDriver::step`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Frames rendered during this step (0 when less than one interval passed).
    pub frames_rendered: u32,
    /// Frames owed but dropped because of the catch-up cap.
    pub frames_dropped: u64,
    /// Whether the widget poll ran during this step.
    pub polled: bool,
    /// Whether the poll replaced the widget target.
    pub widget_changed: bool,
    /// Report of the last frame rendered during this step.
    pub last_frame: Option<FrameReport>,
    /// Total frames rendered since init.
    pub frame_idx: u64,
}

/// Fixed-timestep driver around a [`LandingFx`].
#[derive(Debug)]
pub struct FrameDriver<E, R = XorShift32> {
    fx: LandingFx<E, R>,
    clock: DeterministicClock,
    frame_interval: Duration,
    poll_interval: Duration,
    max_catch_up: u32,
    last_frame: Duration,
    last_poll: Duration,
    frame_idx: u64,
    initialized: bool,
}

impl<E: Clone + PartialEq> FrameDriver<E, XorShift32> {
    /// Build a driver with a seeded controller; see [`LandingFx::seeded`].
    pub fn new(config: FxConfig, fallback_seed: u32) -> Result<Self, FxError> {
        Ok(Self::with_fx(LandingFx::seeded(config, fallback_seed)?))
    }
}

impl<E: Clone + PartialEq, R: RandomSource> FrameDriver<E, R> {
    /// Wrap an existing controller.
    #[must_use]
    pub fn with_fx(fx: LandingFx<E, R>) -> Self {
        let config = fx.config();
        let frame_interval = config.frame_interval();
        let poll_interval = config.poll_interval();
        let max_catch_up = config.max_catch_up_frames;
        Self {
            fx,
            clock: DeterministicClock::new(),
            frame_interval,
            poll_interval,
            max_catch_up,
            last_frame: Duration::ZERO,
            last_poll: Duration::ZERO,
            frame_idx: 0,
            initialized: false,
        }
    }

    /// Render the first frame at the current clock time.
    ///
    /// Must be called exactly once before [`step`](Self::step).
    pub fn init<H, L, F>(&mut self, host: &H, line_surface: &mut L, fire_surface: &mut F) -> FrameReport
    where
        H: PageHost<Element = E> + ?Sized,
        L: Surface + ?Sized,
        F: Surface + ?Sized,
    {
        assert!(!self.initialized, "FrameDriver::init() called twice");
        self.initialized = true;
        let now = self.clock.now();
        self.last_frame = now;
        self.last_poll = now;
        self.fx.resize(host.viewport(), line_surface, fire_surface);
        let report = self.fx.render_frame(host, line_surface, fire_surface);
        self.frame_idx += 1;
        report
    }

    /// Render all frames owed since the last step and run the widget poll if
    /// due.
    pub fn step<H, L, F>(&mut self, host: &H, line_surface: &mut L, fire_surface: &mut F) -> StepResult
    where
        H: PageHost<Element = E> + ?Sized,
        L: Surface + ?Sized,
        F: Surface + ?Sized,
    {
        assert!(self.initialized, "FrameDriver::step() called before init()");
        let now = self.clock.now();

        let mut polled = false;
        let mut widget_changed = false;
        if now.saturating_sub(self.last_poll) >= self.poll_interval {
            polled = true;
            widget_changed = self.fx.poll_widget(host);
            self.last_poll = now;
        }

        let interval_nanos = self.frame_interval.as_nanos().max(1);
        let owed = now.saturating_sub(self.last_frame).as_nanos() / interval_nanos;
        let owed = u64::try_from(owed).unwrap_or(u64::MAX);
        let frames = owed.min(u64::from(self.max_catch_up)) as u32;
        let frames_dropped = owed - u64::from(frames);

        let mut last_frame = None;
        for _ in 0..frames {
            let _span = tracing::debug_span!("fx_frame", frame_idx = self.frame_idx).entered();
            last_frame = Some(self.fx.render_frame(host, line_surface, fire_surface));
            self.frame_idx += 1;
        }

        if frames_dropped > 0 {
            tracing::debug!(frames_dropped, "frame catch-up clamped");
            self.last_frame = now;
        } else {
            // Keep the fractional remainder so the cadence does not drift.
            self.last_frame += self.frame_interval * frames;
        }

        StepResult {
            frames_rendered: frames,
            frames_dropped,
            polled,
            widget_changed,
            last_frame,
            frame_idx: self.frame_idx,
        }
    }

    /// Advance the clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the clock to an absolute time.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Forward a pointer move to the controller.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.fx.pointer_moved(x, y);
    }

    /// Access the controller.
    #[must_use]
    pub fn fx(&self) -> &LandingFx<E, R> {
        &self.fx
    }

    /// Mutably access the controller.
    pub fn fx_mut(&mut self) -> &mut LandingFx<E, R> {
        &mut self.fx
    }

    #[must_use]
    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    #[must_use]
    pub const fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }
}
