// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary-to-boundary separation between region shapes.

use kurbo::{Rect, Vec2};

use crate::config::DistanceMetric;
use crate::region::ShapeDescriptor;

/// Euclidean gap between two axis-aligned rectangles.
///
/// Zero when they touch or overlap.
#[must_use]
pub fn rect_gap(a: Rect, b: Rect) -> f64 {
    let dx = (a.x0 - b.x1).max(b.x0 - a.x1).max(0.0);
    let dy = (a.y0 - b.y1).max(b.y0 - a.y1).max(0.0);
    Vec2::new(dx, dy).hypot()
}

/// Gap between two rounded outlines.
///
/// A rounded rectangle with radius `r` is its rectangle inset by `r` swept by
/// a disc of radius `r`, so the outline gap is the inset gap minus both radii.
/// Using the smallest corner radius yields a shape that contains the real
/// outline, so the result never exceeds the true gap.
#[must_use]
pub fn outline_gap(a: &ShapeDescriptor, b: &ShapeDescriptor) -> f64 {
    let ra = a.min_radius();
    let rb = b.min_radius();
    (rect_gap(inset(a.bounds, ra), inset(b.bounds, rb)) - ra - rb).max(0.0)
}

/// Separation of `a` and `b` under `metric`.
#[must_use]
pub fn boundary_gap(metric: DistanceMetric, a: &ShapeDescriptor, b: &ShapeDescriptor) -> f64 {
    match metric {
        DistanceMetric::BoundingBox => rect_gap(a.bounds, b.bounds),
        DistanceMetric::Outline => outline_gap(a, b),
    }
}

/// Whether two rectangles share positive area. Touching edges do not count.
#[must_use]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

fn inset(rect: Rect, r: f64) -> Rect {
    Rect::new(rect.x0 + r, rect.y0 + r, rect.x1 - r, rect.y1 - r)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn horizontal_gap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(25.0, 0.0, 35.0, 10.0);
        assert!((rect_gap(a, b) - 15.0).abs() < EPS);
        assert!((rect_gap(b, a) - 15.0).abs() < EPS);
    }

    #[test]
    fn diagonal_gap_is_corner_to_corner() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(13.0, 14.0, 20.0, 20.0);
        assert!((rect_gap(a, b) - 5.0).abs() < EPS);
    }

    #[test]
    fn touching_and_overlapping_are_zero() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect_gap(a, Rect::new(10.0, 0.0, 20.0, 10.0)), 0.0);
        assert_eq!(rect_gap(a, Rect::new(5.0, 5.0, 20.0, 20.0)), 0.0);
    }

    #[test]
    fn gap_is_boundary_not_centroid() {
        // Wide neighbors: centers 110 apart, edges 10 apart.
        let a = Rect::new(0.0, 0.0, 100.0, 10.0);
        let b = Rect::new(110.0, 0.0, 210.0, 10.0);
        assert!((rect_gap(a, b) - 10.0).abs() < EPS);
    }

    #[test]
    fn outline_gap_grows_across_rounded_corners() {
        let a = ShapeDescriptor::rounded(Rect::new(0.0, 0.0, 10.0, 10.0), 5.0);
        let b = ShapeDescriptor::rounded(Rect::new(13.0, 14.0, 23.0, 24.0), 5.0);
        // Insets: (5,5)-(5,5) and (18,19)-(18,19); distance sqrt(13²+14²).
        let expected = Vec2::new(13.0, 14.0).hypot() - 10.0;
        assert!((outline_gap(&a, &b) - expected).abs() < 1e-6);
        assert!(outline_gap(&a, &b) > rect_gap(a.bounds, b.bounds));
    }

    #[test]
    fn outline_gap_matches_box_gap_along_an_axis() {
        let a = ShapeDescriptor::capsule(Rect::new(0.0, 0.0, 40.0, 20.0));
        let b = ShapeDescriptor::capsule(Rect::new(52.0, 0.0, 92.0, 20.0));
        assert!((outline_gap(&a, &b) - 12.0).abs() < EPS);
        assert!(
            (boundary_gap(DistanceMetric::BoundingBox, &a, &b) - 12.0).abs() < EPS,
            "box metric measures the same straight gap"
        );
    }

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(a, Rect::new(9.0, 9.0, 20.0, 20.0)));
        assert!(!overlaps(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(!overlaps(a, Rect::new(0.0, 10.0, 10.0, 20.0)));
    }
}
