#![forbid(unsafe_code)]

//! Page host abstraction.
//!
//! The effects need a handful of things from the page: the viewport size,
//! selector queries, element bounding boxes, and a few mutations for the
//! navigation behaviors. [`PageHost`] captures exactly that surface so the
//! controller can run against a real DOM (`runway-web`) or the in-memory
//! [`MemoryPage`].

use std::collections::BTreeSet;

use crate::geometry::{Bounds, Viewport};

/// Everything the effects and navigation behaviors read from or write to
/// the page.
pub trait PageHost {
    /// Opaque element handle.
    type Element: Clone + PartialEq;

    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// First element matching `selector`, visible or not.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// First element matching `selector`, if it is rendered (has a layout
    /// parent). Hidden matches yield `None` rather than falling through to
    /// later matches of the same selector.
    fn query_visible(&self, selector: &str) -> Option<Self::Element>;

    /// Element with the given `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Live bounding box; `None` once the element is gone from the page.
    fn bounding_rect(&self, element: &Self::Element) -> Option<Bounds>;

    /// Smoothly scroll until `element`'s top meets the viewport top.
    fn scroll_into_view(&mut self, element: &Self::Element);

    /// Toggle `class` on `element`; returns whether the class is now present.
    fn toggle_class(&mut self, element: &Self::Element, class: &str) -> bool;

    /// Set the inline background color of `element`.
    fn set_background(&mut self, element: &Self::Element, css: &str);
}

/// Handle into a [`MemoryPage`].
pub type MemoryElement = usize;

#[derive(Debug, Clone)]
struct MemoryNode {
    selectors: Vec<String>,
    id: Option<String>,
    bounds: Bounds,
    visible: bool,
    attached: bool,
    classes: BTreeSet<String>,
    background: Option<String>,
}

/// A scripted page for tests and headless embedders.
///
/// Elements are registered with the selectors they should answer to; queries
/// return the first registered, attached match, the way `querySelector`
/// returns the first match in document order.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    viewport: Viewport,
    nodes: Vec<MemoryNode>,
    scrolls: Vec<MemoryElement>,
}

impl MemoryPage {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ..Self::default()
        }
    }

    /// Change the viewport size.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
    }

    /// Register a visible element answering to `selectors`.
    pub fn insert(&mut self, selectors: &[&str], bounds: Bounds) -> MemoryElement {
        let id = selectors
            .iter()
            .find_map(|s| s.strip_prefix('#'))
            .filter(|rest| !rest.contains(['[', '.', ' ', ':']))
            .map(str::to_owned);
        self.nodes.push(MemoryNode {
            selectors: selectors.iter().map(|s| (*s).to_owned()).collect(),
            id,
            bounds,
            visible: true,
            attached: true,
            classes: BTreeSet::new(),
            background: None,
        });
        self.nodes.len() - 1
    }

    /// Mark an element rendered or hidden (`display: none`).
    pub fn set_visible(&mut self, el: MemoryElement, visible: bool) {
        if let Some(node) = self.nodes.get_mut(el) {
            node.visible = visible;
        }
    }

    /// Detach an element from the page.
    pub fn remove(&mut self, el: MemoryElement) {
        if let Some(node) = self.nodes.get_mut(el) {
            node.attached = false;
        }
    }

    /// Move or resize an element.
    pub fn set_bounds(&mut self, el: MemoryElement, bounds: Bounds) {
        if let Some(node) = self.nodes.get_mut(el) {
            node.bounds = bounds;
        }
    }

    /// Whether `el` currently carries `class`.
    #[must_use]
    pub fn has_class(&self, el: MemoryElement, class: &str) -> bool {
        self.nodes
            .get(el)
            .is_some_and(|node| node.classes.contains(class))
    }

    /// Inline background last written to `el`.
    #[must_use]
    pub fn background(&self, el: MemoryElement) -> Option<&str> {
        self.nodes.get(el).and_then(|node| node.background.as_deref())
    }

    /// Scroll requests issued so far, oldest first.
    #[must_use]
    pub fn scrolls(&self) -> &[MemoryElement] {
        &self.scrolls
    }

    fn first_match(&self, selector: &str) -> Option<(MemoryElement, &MemoryNode)> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, node)| node.attached && node.selectors.iter().any(|s| s == selector))
    }
}

impl PageHost for MemoryPage {
    type Element = MemoryElement;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn query(&self, selector: &str) -> Option<MemoryElement> {
        self.first_match(selector).map(|(idx, _)| idx)
    }

    fn query_visible(&self, selector: &str) -> Option<MemoryElement> {
        self.first_match(selector)
            .filter(|(_, node)| node.visible)
            .map(|(idx, _)| idx)
    }

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        self.nodes
            .iter()
            .position(|node| node.attached && node.id.as_deref() == Some(id))
    }

    fn bounding_rect(&self, el: &MemoryElement) -> Option<Bounds> {
        self.nodes
            .get(*el)
            .filter(|node| node.attached)
            .map(|node| node.bounds)
    }

    fn scroll_into_view(&mut self, el: &MemoryElement) {
        self.scrolls.push(*el);
    }

    fn toggle_class(&mut self, el: &MemoryElement, class: &str) -> bool {
        let Some(node) = self.nodes.get_mut(*el) else {
            return false;
        };
        if node.classes.remove(class) {
            false
        } else {
            node.classes.insert(class.to_owned());
            true
        }
    }

    fn set_background(&mut self, el: &MemoryElement, css: &str) {
        if let Some(node) = self.nodes.get_mut(*el) {
            node.background = Some(css.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_returns_first_attached_match() {
        let mut page = MemoryPage::new(1280.0, 800.0);
        let a = page.insert(&[".chat"], Bounds::new(0.0, 0.0, 10.0, 10.0));
        let b = page.insert(&[".chat"], Bounds::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(page.query(".chat"), Some(a));
        page.remove(a);
        assert_eq!(page.query(".chat"), Some(b));
        assert_eq!(page.bounding_rect(&a), None);
    }

    #[test]
    fn hidden_first_match_is_not_visible() {
        let mut page = MemoryPage::new(1280.0, 800.0);
        let a = page.insert(&[".chat"], Bounds::default());
        page.insert(&[".chat"], Bounds::default());
        page.set_visible(a, false);
        assert_eq!(page.query(".chat"), Some(a));
        assert_eq!(page.query_visible(".chat"), None);
    }

    #[test]
    fn id_selectors_register_ids() {
        let mut page = MemoryPage::new(1280.0, 800.0);
        let why = page.insert(&["#why", "section"], Bounds::default());
        assert_eq!(page.element_by_id("why"), Some(why));
        assert_eq!(page.element_by_id("missing"), None);
    }

    #[test]
    fn toggle_class_flips() {
        let mut page = MemoryPage::new(1280.0, 800.0);
        let menu = page.insert(&[".nav-links"], Bounds::default());
        assert!(page.toggle_class(&menu, "active"));
        assert!(page.has_class(menu, "active"));
        assert!(!page.toggle_class(&menu, "active"));
        assert!(!page.has_class(menu, "active"));
    }
}
