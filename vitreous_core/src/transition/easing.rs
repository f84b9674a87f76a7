// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Easing curve mapping raw progress to interpolation weight.
///
/// All curves are cubic, fixed at `0 → 0` and `1 → 1`, and never overshoot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Accelerating.
    EaseIn,
    /// Decelerating.
    EaseOut,
    /// Accelerating, then decelerating.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Applies the curve to `t`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = 2.0 - 2.0 * t;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}
