// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape descriptors and tint colors.

use kurbo::{Rect, RoundedRect, RoundedRectRadii};

/// How the corners of a region's bounding rectangle are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum CornerTreatment {
    /// Sharp corners.
    #[default]
    Square,
    /// The same radius on all four corners.
    Uniform(f64),
    /// Individual radii per corner.
    PerCorner(RoundedRectRadii),
    /// Fully rounded ends: the radius is half the shorter side, so it tracks
    /// the size during a morph.
    Capsule,
}

/// Geometry and corner treatment of an effect region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeDescriptor {
    /// Bounding rectangle in output coordinates.
    pub bounds: Rect,
    /// Corner treatment applied inside `bounds`.
    pub corners: CornerTreatment,
}

impl ShapeDescriptor {
    /// A sharp-cornered rectangle.
    #[must_use]
    pub const fn rect(bounds: Rect) -> Self {
        Self {
            bounds,
            corners: CornerTreatment::Square,
        }
    }

    /// A rectangle with uniform corner radius.
    #[must_use]
    pub const fn rounded(bounds: Rect, radius: f64) -> Self {
        Self {
            bounds,
            corners: CornerTreatment::Uniform(radius),
        }
    }

    /// A capsule filling `bounds`.
    #[must_use]
    pub const fn capsule(bounds: Rect) -> Self {
        Self {
            bounds,
            corners: CornerTreatment::Capsule,
        }
    }

    /// Returns `true` if the bounds are finite with non-negative size and all
    /// explicit radii are finite and non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let b = self.bounds;
        let finite = b.x0.is_finite() && b.y0.is_finite() && b.x1.is_finite() && b.y1.is_finite();
        let radii_ok = match self.corners {
            CornerTreatment::Square | CornerTreatment::Capsule => true,
            CornerTreatment::Uniform(r) => r.is_finite() && r >= 0.0,
            CornerTreatment::PerCorner(r) => [r.top_left, r.top_right, r.bottom_right, r.bottom_left]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0),
        };
        finite && b.x1 >= b.x0 && b.y1 >= b.y0 && radii_ok
    }

    /// Resolves the corner treatment to concrete radii, clamped to half the
    /// shorter side.
    #[must_use]
    pub fn radii(&self) -> RoundedRectRadii {
        let max = half_min_side(self.bounds);
        match self.corners {
            CornerTreatment::Square => RoundedRectRadii::from_single_radius(0.0),
            CornerTreatment::Uniform(r) => RoundedRectRadii::from_single_radius(r.min(max)),
            CornerTreatment::PerCorner(r) => RoundedRectRadii::new(
                r.top_left.min(max),
                r.top_right.min(max),
                r.bottom_right.min(max),
                r.bottom_left.min(max),
            ),
            CornerTreatment::Capsule => RoundedRectRadii::from_single_radius(max),
        }
    }

    /// The smallest resolved corner radius.
    #[must_use]
    pub fn min_radius(&self) -> f64 {
        let r = self.radii();
        r.top_left
            .min(r.top_right)
            .min(r.bottom_right)
            .min(r.bottom_left)
    }

    /// The shape as a concrete rounded rectangle.
    #[must_use]
    pub fn rounded_rect(&self) -> RoundedRect {
        RoundedRect::from_rect(self.bounds, self.radii())
    }
}

pub(crate) fn half_min_side(rect: Rect) -> f64 {
    rect.width().min(rect.height()) * 0.5
}

/// A straight-alpha RGBA tint, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tint {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Tint {
    /// Creates a tint from components.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}
