//! Property-based invariant tests for the particle systems and perimeter
//! geometry.
//!
//! These tests verify invariants that must hold for any seed and input:
//!
//! 1. Runway progress stays in `[0, 1)` after every update.
//! 2. Runway dots are drawn at the exact interpolation of source and target.
//! 3. Ember life stays in `[0, 1]` after every update.
//! 4. A burnt-out ember relights to exactly `1.0` with decay in `[0.005, 0.015)`.
//! 5. Ember angles only ever decrease.
//! 6. The perimeter mapping is deterministic and `2π`-periodic.
//! 7. The perimeter mapping only jumps by the corner inset at edge boundaries.
//! 8. Perimeter points stay on the panel's bounding box.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use proptest::prelude::*;
use runway_fx::fire::{DECAY_MIN, DECAY_SPREAD, FireRing};
use runway_fx::geometry::{Bounds, Point, normalize_angle, perimeter_point};
use runway_fx::line::LineParticleSystem;
use runway_fx::rng::XorShift32;
use runway_fx::surface::{DrawCmd, RecordingSurface};

// ── Helpers ─────────────────────────────────────────────────────────────

fn point_strategy() -> impl Strategy<Value = Point> {
    (-2000.0f64..4000.0, -2000.0f64..4000.0).prop_map(|(x, y)| Point::new(x, y))
}

/// Panels wide and tall enough for the corner inset.
fn panel_strategy() -> impl Strategy<Value = (Bounds, f64)> {
    (
        -500.0f64..1500.0,
        -500.0f64..1500.0,
        60.0f64..2000.0,
        60.0f64..600.0,
        0.0f64..30.0,
    )
        .prop_map(|(l, t, w, h, r)| (Bounds::new(l, t, w, h), r))
}

fn dist(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

// ── Runway line ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn line_progress_stays_in_unit_range(
        seed in any::<u32>(),
        count in 1usize..40,
        frames in 0usize..400,
    ) {
        let mut rng = XorShift32::new(seed);
        let mut line = LineParticleSystem::new(count, &mut rng);
        for _ in 0..frames {
            line.update(&mut rng);
            for p in line.particles() {
                prop_assert!((0.0..1.0).contains(&p.progress), "progress={}", p.progress);
            }
        }
    }

    #[test]
    fn line_dots_sit_on_the_interpolation(
        seed in any::<u32>(),
        frames in 0usize..200,
        from in point_strategy(),
        to in point_strategy(),
    ) {
        let mut rng = XorShift32::new(seed);
        let mut line = LineParticleSystem::new(15, &mut rng);
        let mut surface = RecordingSurface::default();
        for _ in 0..frames {
            line.update(&mut rng);
        }
        line.step(&mut rng, &mut surface, from, to);

        let dots: Vec<_> = surface.dots().collect();
        prop_assert_eq!(dots.len(), line.len());
        for (cmd, p) in dots.into_iter().zip(line.particles()) {
            let DrawCmd::Dot { center, alpha, .. } = cmd else {
                unreachable!("dots() yields only dots");
            };
            prop_assert_eq!(*center, from.lerp(to, p.progress));
            prop_assert_eq!(*alpha, p.opacity * (1.0 - p.progress * 0.5));
        }
    }
}

// ── Fire ring ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn fire_life_stays_in_unit_range(seed in any::<u32>(), frames in 0usize..600) {
        let mut rng = XorShift32::new(seed);
        let mut ring = FireRing::new(20, 30.0, &mut rng);
        for _ in 0..frames {
            ring.update(&mut rng);
            for p in ring.particles() {
                prop_assert!((0.0..=1.0).contains(&p.life), "life={}", p.life);
            }
        }
    }

    #[test]
    fn burnt_out_embers_relight_fully(seed in any::<u32>()) {
        let mut rng = XorShift32::new(seed);
        let mut ring = FireRing::new(8, 30.0, &mut rng);
        let mut relit = 0usize;
        // 200 frames at the slowest decay burn every ember out at least once.
        for _ in 0..420 {
            let before: Vec<_> = ring.particles().to_vec();
            ring.update(&mut rng);
            for (old, new) in before.iter().zip(ring.particles()) {
                if old.life <= 0.0 {
                    relit += 1;
                    prop_assert_eq!(new.life, 1.0);
                    prop_assert!(
                        (DECAY_MIN..DECAY_MIN + DECAY_SPREAD).contains(&new.decay),
                        "decay={}", new.decay
                    );
                    prop_assert_eq!(new.hue, old.hue);
                    prop_assert_eq!(new.saturation, old.saturation);
                    prop_assert_eq!(new.lightness, old.lightness);
                }
            }
        }
        prop_assert!(relit >= 8, "only {} relights", relit);
    }

    #[test]
    fn fire_angles_only_decrease(seed in any::<u32>(), frames in 1usize..200) {
        let mut rng = XorShift32::new(seed);
        let mut ring = FireRing::new(20, 30.0, &mut rng);
        for _ in 0..frames {
            let before: Vec<f64> = ring.particles().iter().map(|p| p.angle).collect();
            ring.update(&mut rng);
            for (old, new) in before.iter().zip(ring.particles()) {
                prop_assert!(new.angle < *old);
            }
        }
    }
}

// ── Perimeter mapping ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn perimeter_is_deterministic(angle in -100.0f64..100.0, (rect, r) in panel_strategy()) {
        prop_assert_eq!(perimeter_point(angle, rect, r), perimeter_point(angle, rect, r));
    }

    #[test]
    fn perimeter_is_periodic(angle in 0.001f64..6.28, (rect, r) in panel_strategy()) {
        let a = perimeter_point(angle, rect, r);
        let b = perimeter_point(angle - TAU, rect, r);
        prop_assert!(dist(a, b) < 1e-6, "{:?} vs {:?}", a, b);
    }

    #[test]
    fn perimeter_jumps_only_by_corner_inset(
        boundary in 0usize..4,
        (rect, r) in panel_strategy(),
    ) {
        let b = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2][boundary];
        let eps = 1e-9;
        let before = perimeter_point(b - eps, rect, r);
        let after = perimeter_point(b + eps, rect, r);
        let limit = r * 2f64.sqrt() + 1e-4;
        prop_assert!(
            dist(before, after) <= limit,
            "jump {} > {} at boundary {}", dist(before, after), limit, boundary
        );
    }

    #[test]
    fn perimeter_stays_on_the_box(angle in -50.0f64..50.0, (rect, r) in panel_strategy()) {
        let p = perimeter_point(angle, rect, r);
        let tol = 1e-6;
        let on_vertical = (p.x - rect.left).abs() < tol || (p.x - rect.right()).abs() < tol;
        let on_horizontal = (p.y - rect.top).abs() < tol || (p.y - rect.bottom()).abs() < tol;
        prop_assert!(on_vertical || on_horizontal, "{:?} off {:?}", p, rect);
        prop_assert!(p.x >= rect.left - tol && p.x <= rect.right() + tol);
        prop_assert!(p.y >= rect.top - tol && p.y <= rect.bottom() + tol);
    }

    #[test]
    fn normalized_angle_in_range(angle in -1.0e6f64..1.0e6) {
        let a = normalize_angle(angle);
        prop_assert!((0.0..TAU).contains(&a) || a == TAU, "a={}", a);
    }
}
