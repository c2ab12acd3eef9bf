#![forbid(unsafe_code)]

//! Page navigation behaviors: same-page anchor scrolling, the hero
//! call-to-action, the mobile menu toggle, and the navbar background that
//! firms up once the page is scrolled.
//!
//! Every collaborator element is optional. A missing one is reported once
//! through `tracing` and the behavior that needs it becomes a no-op.

use std::cell::Cell;

use crate::config::NavConfig;
use crate::page::PageHost;

/// Which collaborators were present when the page was bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavBindings {
    pub navbar: bool,
    pub cta: bool,
    pub menu_button: bool,
    pub menu: bool,
}

impl NavBindings {
    /// The menu toggle needs both the button and the menu it opens.
    #[must_use]
    pub const fn menu_toggle(&self) -> bool {
        self.menu_button && self.menu
    }
}

/// Result of an anchor activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Not a same-page link; let the browser handle it.
    NotHandled,
    /// Same-page link, default navigation suppressed, scrolled to target.
    Scrolled,
    /// Same-page link, default navigation suppressed, no such target.
    NoTarget,
}

impl AnchorOutcome {
    /// Whether the host should call `preventDefault`.
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        !matches!(self, Self::NotHandled)
    }
}

/// Navigation behaviors bound to a page.
#[derive(Debug)]
pub struct Navigation {
    config: NavConfig,
    warned_navbar: Cell<bool>,
    warned_cta_target: Cell<bool>,
    warned_menu: Cell<bool>,
    scrolled: Option<bool>,
}

impl Navigation {
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            warned_navbar: Cell::new(false),
            warned_cta_target: Cell::new(false),
            warned_menu: Cell::new(false),
            scrolled: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Probe the page for every collaborator, logging the missing ones.
    pub fn bind<H: PageHost + ?Sized>(&self, host: &H) -> NavBindings {
        let lookup = |selector: &str, role: &str| {
            let found = host.query(selector).is_some();
            if !found {
                tracing::warn!(selector, role, "navigation element missing, behavior disabled");
            }
            found
        };
        let bindings = NavBindings {
            navbar: lookup(&self.config.navbar_selector, "navbar"),
            cta: lookup(&self.config.cta_selector, "call-to-action"),
            menu_button: lookup(&self.config.menu_button_selector, "menu button"),
            menu: lookup(&self.config.menu_selector, "menu"),
        };
        tracing::debug!(?bindings, "navigation bound");
        bindings
    }

    /// A link with `href` was activated.
    ///
    /// Only `#fragment` links are handled; the matching element is scrolled to
    /// with its top aligned to the viewport. A bare `#` suppresses navigation
    /// without scrolling.
    pub fn anchor_activated<H: PageHost + ?Sized>(&self, host: &mut H, href: &str) -> AnchorOutcome {
        let Some(fragment) = href.strip_prefix('#') else {
            return AnchorOutcome::NotHandled;
        };
        if fragment.is_empty() {
            return AnchorOutcome::NoTarget;
        }
        match host.element_by_id(fragment) {
            Some(target) => {
                host.scroll_into_view(&target);
                AnchorOutcome::Scrolled
            }
            None => {
                tracing::debug!(href, "anchor target not found");
                AnchorOutcome::NoTarget
            }
        }
    }

    /// The hero call-to-action was activated. Returns whether it scrolled.
    pub fn cta_activated<H: PageHost + ?Sized>(&self, host: &mut H) -> bool {
        match host.element_by_id(&self.config.cta_target_id) {
            Some(target) => {
                host.scroll_into_view(&target);
                true
            }
            None => {
                warn_once(&self.warned_cta_target, || {
                    tracing::warn!(
                        id = self.config.cta_target_id.as_str(),
                        "call-to-action target missing"
                    );
                });
                false
            }
        }
    }

    /// The mobile menu button was activated. Returns whether the menu is now
    /// open, or `None` if the menu is missing.
    pub fn menu_toggled<H: PageHost + ?Sized>(&self, host: &mut H) -> Option<bool> {
        let Some(menu) = host.query(&self.config.menu_selector) else {
            warn_once(&self.warned_menu, || {
                tracing::warn!(
                    selector = self.config.menu_selector.as_str(),
                    "navigation menu missing"
                );
            });
            return None;
        };
        Some(host.toggle_class(&menu, &self.config.menu_active_class))
    }

    /// The page scrolled to `scroll_y`. Updates the navbar background when the
    /// threshold is crossed; returns whether a write happened.
    pub fn scrolled<H: PageHost + ?Sized>(&mut self, host: &mut H, scroll_y: f64) -> bool {
        let past = scroll_y > self.config.scroll_threshold_px;
        if self.scrolled == Some(past) {
            return false;
        }
        let Some(navbar) = host.query(&self.config.navbar_selector) else {
            warn_once(&self.warned_navbar, || {
                tracing::warn!(
                    selector = self.config.navbar_selector.as_str(),
                    "navbar missing"
                );
            });
            return false;
        };
        let css = if past {
            &self.config.scrolled_background
        } else {
            &self.config.resting_background
        };
        host.set_background(&navbar, css);
        self.scrolled = Some(past);
        true
    }
}

fn warn_once(flag: &Cell<bool>, emit: impl FnOnce()) {
    if !flag.replace(true) {
        emit();
    }
}
