#![forbid(unsafe_code)]

//! `runway-fx` provides the landing-page effects as host-agnostic state
//! machines.
//!
//! - **Runway line**: a dashed line with drifting dots from the pointer to the
//!   chat widget, hidden on narrow viewports.
//! - **Fire ring**: embers orbiting the navbar outline.
//! - **Navigation**: same-page anchor scrolling, the hero call-to-action, the
//!   mobile menu toggle, and the scroll-reactive navbar background.
//!
//! Design goals:
//! - **Host-driven I/O**: the page and the drawing surface are traits
//!   ([`page::PageHost`], [`surface::Surface`]); `runway-web` binds them to the
//!   DOM and canvas.
//! - **Deterministic time**: [`driver::FrameDriver`] advances on a clock the
//!   host moves explicitly.
//! - **Injected randomness**: every sample comes from a
//!   [`rng::RandomSource`], so identical seeds and inputs give identical
//!   frames.

pub mod color;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod fire;
pub mod geometry;
pub mod line;
pub mod locator;
pub mod nav;
pub mod page;
pub mod rng;
pub mod surface;

#[cfg(feature = "tracing-json")]
pub mod logging;

pub use config::FxConfig;
pub use controller::{FireFrame, FrameReport, LandingFx, LineFrame};
pub use driver::{DeterministicClock, FrameDriver, StepResult};
pub use error::FxError;
pub use geometry::{Bounds, Point, Viewport};
pub use nav::{AnchorOutcome, Navigation};
pub use page::{MemoryPage, PageHost};
pub use rng::{RandomSource, XorShift32};
pub use surface::{DrawCmd, RecordingSurface, Surface};
