#![forbid(unsafe_code)]

//! Effect configuration.
//!
//! Every field has a default matching the production landing page, so the
//! host only passes what it wants to override:
//!
//! ```
//! use runway_fx::config::FxConfig;
//!
//! let cfg = FxConfig::from_json_str(r#"{ "fire": { "particleCount": 32 } }"#).unwrap();
//! assert_eq!(cfg.fire.particle_count, 32);
//! assert_eq!(cfg.line.particle_count, 15);
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FxError;

/// Ordered chat-widget selectors, most specific first.
pub const DEFAULT_WIDGET_SELECTORS: [&str; 8] = [
    "[data-retell-widget]",
    ".retell-widget",
    ".retell-chat-widget",
    "#retell-widget",
    "[id*=\"retell\"]",
    "[class*=\"retell\"]",
    "[class*=\"chat\"]",
    "[class*=\"widget\"]",
];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FxConfig {
    pub line: LineConfig,
    pub fire: FireConfig,
    pub nav: NavConfig,
    /// Fixed simulation step in milliseconds.
    pub frame_interval_ms: f64,
    /// Upper bound on frames simulated by a single driver step.
    pub max_catch_up_frames: u32,
    /// Seed for the particle random source; `None` lets the host choose.
    pub seed: Option<u32>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            line: LineConfig::default(),
            fire: FireConfig::default(),
            nav: NavConfig::default(),
            frame_interval_ms: 1000.0 / 60.0,
            max_catch_up_frames: 4,
            seed: None,
        }
    }
}

/// Cursor-to-widget runway line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineConfig {
    pub particle_count: usize,
    /// The line is hidden while the viewport is this wide or narrower.
    pub breakpoint_px: f64,
    pub selectors: Vec<String>,
    /// Side of the synthetic widget box anchored to the bottom-right corner.
    pub fallback_size: f64,
    pub poll_interval_ms: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            particle_count: 15,
            breakpoint_px: 768.0,
            selectors: DEFAULT_WIDGET_SELECTORS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
            fallback_size: 60.0,
            poll_interval_ms: 2000,
        }
    }
}

/// Ember ring around the navigation panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FireConfig {
    pub particle_count: usize,
    pub corner_radius: f64,
    pub panel_selector: String,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            particle_count: 20,
            corner_radius: 30.0,
            panel_selector: ".navbar".to_owned(),
        }
    }
}

/// Page navigation collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavConfig {
    pub navbar_selector: String,
    pub scroll_threshold_px: f64,
    pub scrolled_background: String,
    pub resting_background: String,
    pub cta_selector: String,
    pub cta_target_id: String,
    pub menu_button_selector: String,
    pub menu_selector: String,
    pub menu_active_class: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            navbar_selector: ".navbar".to_owned(),
            scroll_threshold_px: 50.0,
            scrolled_background: "rgba(255, 255, 255, 0.95)".to_owned(),
            resting_background: "rgba(255, 255, 255, 0.8)".to_owned(),
            cta_selector: ".hero-cta".to_owned(),
            cta_target_id: "why".to_owned(),
            menu_button_selector: ".hamburger-menu".to_owned(),
            menu_selector: ".nav-links".to_owned(),
            menu_active_class: "active".to_owned(),
        }
    }
}

impl FxConfig {
    /// Parse host options and validate them.
    pub fn from_json_str(s: &str) -> Result<Self, FxError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Builder-style seed override.
    #[must_use]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the effects cannot run with.
    pub fn validate(&self) -> Result<(), FxError> {
        if self.line.particle_count == 0 {
            return Err(invalid("line.particleCount must be > 0"));
        }
        if self.fire.particle_count == 0 {
            return Err(invalid("fire.particleCount must be > 0"));
        }
        if !self.line.breakpoint_px.is_finite() || self.line.breakpoint_px < 0.0 {
            return Err(invalid("line.breakpointPx must be a non-negative number"));
        }
        if !self.line.fallback_size.is_finite() || self.line.fallback_size < 0.0 {
            return Err(invalid("line.fallbackSize must be a non-negative number"));
        }
        if self.line.selectors.is_empty() {
            return Err(invalid("line.selectors must not be empty"));
        }
        if self.line.poll_interval_ms == 0 {
            return Err(invalid("line.pollIntervalMs must be > 0"));
        }
        if !self.fire.corner_radius.is_finite() || self.fire.corner_radius < 0.0 {
            return Err(invalid("fire.cornerRadius must be a non-negative number"));
        }
        if !self.frame_interval_ms.is_finite() || self.frame_interval_ms <= 0.0 {
            return Err(invalid("frameIntervalMs must be > 0"));
        }
        if self.max_catch_up_frames == 0 {
            return Err(invalid("maxCatchUpFrames must be > 0"));
        }
        if !self.nav.scroll_threshold_px.is_finite() {
            return Err(invalid("nav.scrollThresholdPx must be finite"));
        }
        Ok(())
    }

    /// Fixed simulation step.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(self.frame_interval_ms / 1000.0)
    }

    /// Widget re-discovery period.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.line.poll_interval_ms)
    }
}

fn invalid(msg: &str) -> FxError {
    FxError::InvalidConfig(msg.to_owned())
}
