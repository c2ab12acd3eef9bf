#![forbid(unsafe_code)]

//! Screen-space geometry: points, element bounds, and the rounded-panel
//! perimeter mapping used by the fire ring.
//!
//! All coordinates are CSS pixels relative to the viewport origin
//! (top-left), matching what `getBoundingClientRect` reports.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

/// A point in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `self` towards `to` at fraction `t`.
    ///
    /// Computed as `a + (b - a) * t` per axis.
    #[inline]
    pub fn lerp(self, to: Point, t: f64) -> Point {
        Point {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

/// An element bounding box in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create a bounding box.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Whether the box has no drawable area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Fold any finite angle into `[0, 2π)`.
///
/// Uses `((a % 2π) + 2π) % 2π` so negative angles produced by the
/// counter-clockwise drift land on the same edge positions a browser
/// computes.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    ((angle % TAU) + TAU) % TAU
}

/// Map an angle to a point on the straight edges of a rounded panel.
///
/// The normalized angle is split into four quarter ranges assigned to the
/// top, right, bottom and left edges in that order. Inside a range the point
/// moves linearly between the two corner-inset endpoints of the edge, so the
/// corner arcs themselves are never traced: at each quarter boundary the
/// point jumps by `corner_radius` along both axes.
pub fn perimeter_point(angle: f64, rect: Bounds, corner_radius: f64) -> Point {
    let center_x = rect.left + rect.width / 2.0;
    let center_y = rect.top + rect.height / 2.0;
    let radius_x = rect.width / 2.0;
    let radius_y = rect.height / 2.0;
    let span_x = radius_x * 2.0 - corner_radius * 2.0;
    let span_y = radius_y * 2.0 - corner_radius * 2.0;

    let a = normalize_angle(angle);

    if a < FRAC_PI_2 {
        let t = a / FRAC_PI_2;
        Point::new(
            center_x - radius_x + corner_radius + span_x * t,
            center_y - radius_y,
        )
    } else if a < PI {
        let t = (a - FRAC_PI_2) / FRAC_PI_2;
        Point::new(
            center_x + radius_x,
            center_y - radius_y + corner_radius + span_y * t,
        )
    } else if a < 3.0 * PI / 2.0 {
        let t = (a - PI) / FRAC_PI_2;
        Point::new(
            center_x + radius_x - corner_radius - span_x * t,
            center_y + radius_y,
        )
    } else {
        let t = (a - 3.0 * PI / 2.0) / FRAC_PI_2;
        Point::new(
            center_x - radius_x,
            center_y + radius_y - corner_radius - span_y * t,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPS: f64 = 1e-6;
    // Nudge past a quarter boundary so rounding in the fold cannot pick the
    // previous edge.
    const NUDGE: f64 = 1e-12;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    fn panel() -> Bounds {
        Bounds::new(0.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn angle_zero_is_top_left_inset() {
        assert_eq!(perimeter_point(0.0, panel(), 30.0), Point::new(30.0, 0.0));
    }

    #[test]
    fn quarter_starts_hit_each_edge() {
        let r = panel();
        assert!(close(
            perimeter_point(FRAC_PI_2 + NUDGE, r, 30.0),
            Point::new(200.0, 30.0)
        ));
        assert!(close(
            perimeter_point(PI + NUDGE, r, 30.0),
            Point::new(170.0, 100.0)
        ));
        assert!(close(
            perimeter_point(3.0 * PI / 2.0 + NUDGE, r, 30.0),
            Point::new(0.0, 70.0)
        ));
    }

    #[test]
    fn midpoints_sit_on_edge_centers() {
        let r = panel();
        assert!(close(perimeter_point(PI / 4.0, r, 30.0), Point::new(100.0, 0.0)));
        assert!(close(
            perimeter_point(3.0 * PI / 4.0, r, 30.0),
            Point::new(200.0, 50.0)
        ));
        assert!(close(
            perimeter_point(5.0 * PI / 4.0, r, 30.0),
            Point::new(100.0, 100.0)
        ));
        assert!(close(
            perimeter_point(7.0 * PI / 4.0, r, 30.0),
            Point::new(0.0, 50.0)
        ));
    }

    #[test]
    fn negative_angles_wrap() {
        let r = panel();
        let wrapped = perimeter_point(-PI / 4.0, r, 30.0);
        let direct = perimeter_point(7.0 * PI / 4.0, r, 30.0);
        assert!(close(wrapped, direct));
    }

    #[test]
    fn offset_rect_is_translated() {
        let r = Bounds::new(40.0, 12.0, 200.0, 100.0);
        assert_eq!(perimeter_point(0.0, r, 30.0), Point::new(70.0, 12.0));
    }

    #[test]
    fn normalize_handles_multiple_turns() {
        assert!((normalize_angle(5.0 * TAU + 1.0) - 1.0).abs() < 1e-9);
        assert!((normalize_angle(-3.0 * TAU - 1.0) - (TAU - 1.0)).abs() < 1e-9);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn bounds_center_and_edges() {
        let r = Bounds::new(10.0, 20.0, 60.0, 40.0);
        assert_eq!(r.center(), Point::new(40.0, 40.0));
        assert_eq!(r.right(), 70.0);
        assert_eq!(r.bottom(), 60.0);
        assert!(!r.is_empty());
        assert!(Bounds::new(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn lerp_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 100.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 0.5), Point::new(50.0, 50.0));
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
