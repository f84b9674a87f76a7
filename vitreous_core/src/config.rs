// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor configuration.

use crate::time::Duration;
use crate::transition::Easing;

/// How the boundary-to-boundary separation of two regions is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DistanceMetric {
    /// Gap between the axis-aligned bounding rectangles.
    ///
    /// Cheap and conservative: rounded corners are treated as square, so
    /// diagonal neighbors merge slightly earlier than their outlines would.
    #[default]
    BoundingBox,
    /// Gap between the rounded outlines.
    ///
    /// Uses the smallest corner radius of each region, which never reports a
    /// gap larger than the true outline gap.
    Outline,
}

/// Configuration for the [`Compositor`](crate::compositor::Compositor).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorConfig {
    /// Spacing threshold for scopes that declare no override.
    pub default_spacing: f64,
    /// Metric used for pairwise adjacency.
    pub distance_metric: DistanceMetric,
    /// Duration of morph, appear, and disappear transitions.
    pub transition_duration: Duration,
    /// Easing applied to transition progress.
    pub easing: Easing,
    /// Scale of the neutral state that appearing regions grow from and
    /// disappearing regions shrink to (0.0–1.0).
    pub appear_scale: f64,
    /// Per-pass wall-time budget; passes that exceed it are flagged, never
    /// interrupted. `None` disables the check.
    pub pass_budget: Option<Duration>,
    /// EMA smoothing factor for pass cost (0.0–1.0).
    /// Smaller values = more smoothing.
    pub ema_alpha: f32,
}

impl CompositorConfig {
    /// Defaults for typical toolbars, tab bars, and floating controls.
    ///
    /// Ticks are assumed to be nanoseconds.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            default_spacing: 20.0,
            distance_metric: DistanceMetric::BoundingBox,
            transition_duration: Duration::from_millis(350),
            easing: Easing::EaseInOut,
            appear_scale: 0.8,
            pass_budget: Some(Duration::from_millis(2)),
            ema_alpha: 0.2,
        }
    }

    /// Tighter spacing and quicker transitions for dense control clusters,
    /// measured along rounded outlines.
    #[must_use]
    pub const fn dense() -> Self {
        Self {
            default_spacing: 8.0,
            distance_metric: DistanceMetric::Outline,
            transition_duration: Duration::from_millis(250),
            easing: Easing::EaseInOut,
            appear_scale: 0.9,
            pass_budget: Some(Duration::from_millis(2)),
            ema_alpha: 0.2,
        }
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::standard()
    }
}
