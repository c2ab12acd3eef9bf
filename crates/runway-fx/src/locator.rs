#![forbid(unsafe_code)]

//! Chat-widget discovery.
//!
//! The widget is injected by a third-party script whose markup and load
//! time are unknown, so discovery tries an ordered selector list and takes
//! the first visible match. With no match the runway points at a synthetic
//! box in the bottom-right corner of the viewport. The first answer is
//! cached; [`WidgetLocator::poll`] re-runs discovery on a timer so a widget
//! that loads late replaces the fallback.

use crate::geometry::{Bounds, Point, Viewport};
use crate::page::PageHost;

/// What the runway currently points at.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetTarget<E> {
    /// A real page element, matched by the selector at `selector_index`.
    Element { element: E, selector_index: usize },
    /// The synthetic bottom-right box.
    Fallback,
}

impl<E> WidgetTarget<E> {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// Caching widget locator.
#[derive(Debug, Clone)]
pub struct WidgetLocator<E> {
    selectors: Vec<String>,
    fallback_size: f64,
    cached: Option<WidgetTarget<E>>,
}

impl<E: Clone + PartialEq> WidgetLocator<E> {
    #[must_use]
    pub fn new(selectors: Vec<String>, fallback_size: f64) -> Self {
        Self {
            selectors,
            fallback_size,
            cached: None,
        }
    }

    /// Cached target, if discovery has run.
    #[must_use]
    pub fn cached(&self) -> Option<&WidgetTarget<E>> {
        self.cached.as_ref()
    }

    /// Run discovery without touching the cache.
    pub fn discover<H>(&self, host: &H) -> WidgetTarget<E>
    where
        H: PageHost<Element = E> + ?Sized,
    {
        self.selectors
            .iter()
            .enumerate()
            .find_map(|(selector_index, selector)| {
                host.query_visible(selector)
                    .map(|element| WidgetTarget::Element {
                        element,
                        selector_index,
                    })
            })
            .unwrap_or(WidgetTarget::Fallback)
    }

    /// Cached target, discovering it on first use.
    pub fn resolve<H>(&mut self, host: &H) -> &WidgetTarget<E>
    where
        H: PageHost<Element = E> + ?Sized,
    {
        if self.cached.is_none() {
            let found = self.discover(host);
            self.log_change(&found);
            self.cached = Some(found);
        }
        self.cached.get_or_insert(WidgetTarget::Fallback)
    }

    /// Re-run discovery and replace the cache. Returns whether the target
    /// changed.
    pub fn poll<H>(&mut self, host: &H) -> bool
    where
        H: PageHost<Element = E> + ?Sized,
    {
        let found = self.discover(host);
        if self.cached.as_ref() == Some(&found) {
            return false;
        }
        self.log_change(&found);
        self.cached = Some(found);
        true
    }

    /// Synthetic target box for a viewport.
    #[must_use]
    pub fn fallback_bounds(&self, viewport: Viewport) -> Bounds {
        Bounds::new(
            viewport.width - self.fallback_size,
            viewport.height - self.fallback_size,
            self.fallback_size,
            self.fallback_size,
        )
    }

    /// Center of the current target, resolving it if needed.
    ///
    /// An element that can no longer be measured falls back to the synthetic
    /// box for this call; the cache is left for the next poll to replace.
    pub fn target_center<H>(&mut self, host: &H) -> Point
    where
        H: PageHost<Element = E> + ?Sized,
    {
        let viewport = host.viewport();
        let fallback = self.fallback_bounds(viewport);
        let bounds = match self.resolve(host) {
            WidgetTarget::Element { element, .. } => host.bounding_rect(element),
            WidgetTarget::Fallback => None,
        };
        bounds.unwrap_or(fallback).center()
    }

    fn log_change(&self, found: &WidgetTarget<E>) {
        match found {
            WidgetTarget::Element { selector_index, .. } => {
                tracing::debug!(
                    selector = self.selectors[*selector_index].as_str(),
                    "chat widget located"
                );
            }
            WidgetTarget::Fallback => {
                tracing::debug!("chat widget not found, using fallback anchor");
            }
        }
    }
}
