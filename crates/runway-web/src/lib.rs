#![forbid(unsafe_code)]

//! WASM frontend for `runway-fx`.
//!
//! Binds the landing-page effects to a real browser page:
//! - the runway line and ember ring draw on two `<canvas>` elements sized to
//!   the viewport,
//! - DOM queries and scrolling go through [`runway_fx::page::PageHost`],
//! - pointer, resize, scroll and click listeners feed the controller,
//! - a `requestAnimationFrame` loop drives [`runway_fx::driver::FrameDriver`].
//!
//! Option parsing and frame statistics live outside the `wasm32`-only module
//! so they build and test on every target.

use runway_fx::config::FxConfig;
use runway_fx::controller::{FireFrame, FrameReport, LineFrame};
use runway_fx::driver::FrameDriver;
use runway_fx::error::FxError;
use runway_fx::rng::RandomSource;
use core::sync::atomic::{AtomicBool, Ordering};
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::RunwayWeb;

/// Default id of the runway-line canvas.
pub const LINE_CANVAS_ID: &str = "line-canvas";
/// Default id of the ember-ring canvas.
pub const FIRE_CANVAS_ID: &str = "fire-canvas";

/// Options accepted by `new RunwayWeb(json)`.
///
/// Effect settings sit at the top level next to the canvas ids:
/// `{ "lineCanvasId": "fx", "fire": { "particleCount": 32 } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebOptions {
    pub line_canvas_id: String,
    pub fire_canvas_id: String,
    #[serde(flatten)]
    pub fx: FxConfig,
}

impl Default for WebOptions {
    fn default() -> Self {
        Self {
            line_canvas_id: LINE_CANVAS_ID.to_owned(),
            fire_canvas_id: FIRE_CANVAS_ID.to_owned(),
            fx: FxConfig::default(),
        }
    }
}

impl WebOptions {
    /// Parse optional host JSON. `None` and blank strings give the defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self, FxError> {
        let opts = match json.map(str::trim) {
            None | Some("") => Self::default(),
            Some(text) => serde_json::from_str(text)?,
        };
        opts.fx.validate()?;
        if opts.line_canvas_id.is_empty() || opts.fire_canvas_id.is_empty() {
            return Err(FxError::InvalidConfig("canvas ids must not be empty".into()));
        }
        Ok(opts)
    }
}

/// Running statistics exposed to JS through `stats()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    pub frame_idx: u64,
    pub frames_dropped: u64,
    pub line_drawn: bool,
    pub fire_lit: usize,
    pub widget_found: bool,
}

impl FrameStats {
    /// Fold in the outcome of an init or step call.
    pub fn observe<E, R>(
        &mut self,
        driver: &FrameDriver<E, R>,
        last_frame: Option<FrameReport>,
        frames_dropped: u64,
    ) where
        E: Clone + PartialEq,
        R: RandomSource,
    {
        self.frame_idx = driver.frame_idx();
        self.frames_dropped += frames_dropped;
        self.widget_found = driver.fx().widget().is_some_and(|w| !w.is_fallback());
        if let Some(report) = last_frame {
            self.line_drawn = matches!(report.line, LineFrame::Drawn { .. });
            self.fire_lit = match report.fire {
                FireFrame::Drawn { lit } => lit,
                FireFrame::NoPanel => 0,
            };
        }
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// What one animation-frame callback does.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopTurn {
    /// Render and schedule the next frame.
    Render,
    /// The runtime is busy in another callback; skip rendering but keep the
    /// loop alive.
    Skip,
    /// `destroy()` ran; let the loop end.
    Stop,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl LoopTurn {
    /// `running` is `None` when the runtime could not be borrowed.
    pub(crate) fn decide(running: Option<bool>) -> Self {
        match running {
            Some(true) => Self::Render,
            Some(false) => Self::Stop,
            None => Self::Skip,
        }
    }

    pub(crate) fn reschedules(self) -> bool {
        !matches!(self, Self::Stop)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
static LOGGING_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Run `install` the first time this is called and never again.
///
/// Returns whether this call ran it. A failed install still counts: a second
/// global subscriber would be rejected anyway.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn install_logging_once(flag: &AtomicBool, install: impl FnOnce()) -> bool {
    if flag.swap(true, Ordering::AcqRel) {
        return false;
    }
    install();
    true
}

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct RunwayWeb;

#[cfg(not(target_arch = "wasm32"))]
impl RunwayWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
