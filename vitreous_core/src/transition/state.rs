// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, RoundedRect, RoundedRectRadii};

use crate::region::half_min_side;

/// What a region looks like at one instant of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    /// Outline.
    pub geometry: RoundedRect,
    /// Material opacity, `0.0..=1.0`.
    pub opacity: f64,
}

impl VisualState {
    /// A fully visible state.
    #[must_use]
    pub const fn visible(geometry: RoundedRect) -> Self {
        Self {
            geometry,
            opacity: 1.0,
        }
    }

    /// The invisible state `geometry` appears from and disappears into:
    /// scaled by `scale` about its center, at opacity 0.
    #[must_use]
    pub fn neutral(geometry: RoundedRect, scale: f64) -> Self {
        let rect = geometry.rect();
        let center = rect.center();
        let half_w = rect.width() * scale * 0.5;
        let half_h = rect.height() * scale * 0.5;
        let scaled = Rect::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        );
        let r = geometry.radii();
        let radii = RoundedRectRadii::new(
            r.top_left * scale,
            r.top_right * scale,
            r.bottom_right * scale,
            r.bottom_left * scale,
        );
        Self {
            geometry: RoundedRect::from_rect(scaled, radii),
            opacity: 0.0,
        }
    }

    /// Interpolates position, size, corner radii, and opacity.
    ///
    /// `w` is the eased weight of `to`.
    #[must_use]
    pub fn lerp(&self, to: &Self, w: f64) -> Self {
        let (a, b) = (self.geometry.rect(), to.geometry.rect());
        let rect = Rect::new(
            mix(a.x0, b.x0, w),
            mix(a.y0, b.y0, w),
            mix(a.x1, b.x1, w),
            mix(a.y1, b.y1, w),
        );
        let (ra, rb) = (self.geometry.radii(), to.geometry.radii());
        let cap = half_min_side(rect);
        let radii = RoundedRectRadii::new(
            mix(ra.top_left, rb.top_left, w).min(cap),
            mix(ra.top_right, rb.top_right, w).min(cap),
            mix(ra.bottom_right, rb.bottom_right, w).min(cap),
            mix(ra.bottom_left, rb.bottom_left, w).min(cap),
        );
        Self {
            geometry: RoundedRect::from_rect(rect, radii),
            opacity: mix(self.opacity, to.opacity, w),
        }
    }
}

fn mix(a: f64, b: f64, w: f64) -> f64 {
    a + (b - a) * w
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capsule(rect: Rect) -> RoundedRect {
        RoundedRect::from_rect(rect, half_min_side(rect))
    }

    #[test]
    fn lerp_endpoints() {
        let a = VisualState::visible(capsule(Rect::new(0.0, 0.0, 40.0, 20.0)));
        let b = VisualState::visible(capsule(Rect::new(100.0, 0.0, 220.0, 40.0)));
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn lerp_midpoint_interpolates_corners() {
        let a = VisualState::visible(RoundedRect::new(0.0, 0.0, 100.0, 100.0, 0.0));
        let b = VisualState::visible(RoundedRect::new(0.0, 0.0, 100.0, 100.0, 20.0));
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.geometry.radii().top_left, 10.0);
        assert_eq!(mid.geometry.rect(), Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn neutral_scales_about_center() {
        let geometry = capsule(Rect::new(0.0, 0.0, 100.0, 40.0));
        let neutral = VisualState::neutral(geometry, 0.5);
        assert_eq!(neutral.geometry.rect(), Rect::new(25.0, 10.0, 75.0, 30.0));
        assert_eq!(neutral.geometry.radii().top_left, 10.0);
        assert_eq!(neutral.opacity, 0.0);
    }

    #[test]
    fn neutral_at_unit_scale_keeps_geometry() {
        let geometry = capsule(Rect::new(3.0, 4.0, 50.0, 30.0));
        assert_eq!(VisualState::neutral(geometry, 1.0).geometry, geometry);
    }
}
