// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessibility policy.
//!
//! The policy is a process-wide pair of user preferences sampled by the caller
//! and passed in with every tick. It is applied first in a pass, before
//! grouping, so that every later phase sees effective variants:
//!
//! - **Reduce transparency** replaces every translucent variant with
//!   [`EffectiveVariant::Opaque`]. Geometry, clipping, and grouping are
//!   unaffected; only blending is suppressed.
//! - **Reduce motion** collapses every transition to its terminal state
//!   (see [`TransitionPlanner`](crate::transition::TransitionPlanner)).

use crate::region::{EffectVariant, EffectiveVariant, RegionRegistry};

/// The accessibility preferences in effect for a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AccessibilityPolicy {
    /// Replace translucent materials with opaque-equivalent rendering.
    pub reduce_transparency: bool,
    /// Skip animation; every transition completes immediately.
    pub reduce_motion: bool,
}

impl AccessibilityPolicy {
    /// The variant a region declared as `declared` renders with under this
    /// policy.
    #[must_use]
    pub const fn effective_variant(self, declared: EffectVariant) -> EffectiveVariant {
        match declared {
            EffectVariant::Disabled => EffectiveVariant::Disabled,
            EffectVariant::Standard | EffectVariant::HighTransparency
                if self.reduce_transparency =>
            {
                EffectiveVariant::Opaque
            }
            EffectVariant::Standard => EffectiveVariant::Standard,
            EffectVariant::HighTransparency => EffectiveVariant::HighTransparency,
        }
    }
}

/// A change of policy between two passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicyChange {
    /// The policy applied by the previous successful pass.
    pub previous: AccessibilityPolicy,
    /// The policy applied now.
    pub current: AccessibilityPolicy,
}

/// Result of [`PolicyEngine::evaluate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// Set when the policy differs from the last committed one.
    pub change: Option<PolicyChange>,
    /// Number of regions whose effective variant was forced to opaque.
    pub forced_opaque: u32,
}

/// Applies an [`AccessibilityPolicy`] to a registry and remembers the policy
/// of the last successful pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyEngine {
    current: AccessibilityPolicy,
}

impl PolicyEngine {
    /// Creates an engine with both preferences off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The policy applied by the last committed pass.
    #[must_use]
    pub const fn current(&self) -> AccessibilityPolicy {
        self.current
    }

    /// Writes effective variants for every region in `registry`.
    ///
    /// Does not update [`current`](Self::current); call
    /// [`commit`](Self::commit) once the pass succeeds.
    pub fn evaluate(
        &self,
        policy: AccessibilityPolicy,
        registry: &mut RegionRegistry,
    ) -> PolicyOutcome {
        let mut forced_opaque = 0_u32;
        for idx in registry.indices() {
            let effective = policy.effective_variant(registry.variant(idx));
            if effective == EffectiveVariant::Opaque {
                forced_opaque += 1;
            }
            registry.set_effective_variant(idx, effective);
        }
        let change = (policy != self.current).then_some(PolicyChange {
            previous: self.current,
            current: policy,
        });
        PolicyOutcome {
            change,
            forced_opaque,
        }
    }

    /// Records `policy` as the one in effect.
    pub fn commit(&mut self, policy: AccessibilityPolicy) {
        self.current = policy;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::region::{Namespace, RegionDeclaration, RegionId, RegionIdx, ShapeDescriptor};

    const REDUCE_TRANSPARENCY: AccessibilityPolicy = AccessibilityPolicy {
        reduce_transparency: true,
        reduce_motion: false,
    };

    fn registry_with(variants: &[EffectVariant]) -> RegionRegistry {
        let decls: alloc::vec::Vec<_> = (0_u64..)
            .zip(variants)
            .map(|(i, v)| {
                let x = i as f64 * 100.0;
                RegionDeclaration::new(
                    Namespace(0),
                    RegionId(i),
                    ShapeDescriptor::rect(Rect::new(x, 0.0, x + 10.0, 10.0)),
                )
                .with_variant(*v)
            })
            .collect();
        let mut registry = RegionRegistry::new();
        registry.load(&decls).unwrap();
        registry
    }

    #[test]
    fn reduce_transparency_forces_opaque() {
        let mut registry = registry_with(&[
            EffectVariant::Standard,
            EffectVariant::HighTransparency,
            EffectVariant::Disabled,
        ]);
        let engine = PolicyEngine::new();
        let outcome = engine.evaluate(REDUCE_TRANSPARENCY, &mut registry);

        assert_eq!(outcome.forced_opaque, 2);
        assert_eq!(
            registry.effective_variant(RegionIdx(0)),
            EffectiveVariant::Opaque
        );
        assert_eq!(
            registry.effective_variant(RegionIdx(1)),
            EffectiveVariant::Opaque
        );
        assert_eq!(
            registry.effective_variant(RegionIdx(2)),
            EffectiveVariant::Disabled
        );
    }

    #[test]
    fn geometry_is_untouched() {
        let mut registry = registry_with(&[EffectVariant::Standard]);
        let before = *registry.shape(RegionIdx(0));
        PolicyEngine::new().evaluate(REDUCE_TRANSPARENCY, &mut registry);
        assert_eq!(*registry.shape(RegionIdx(0)), before);
    }

    #[test]
    fn change_is_reported_until_committed() {
        let mut registry = registry_with(&[EffectVariant::Standard]);
        let mut engine = PolicyEngine::new();

        let outcome = engine.evaluate(REDUCE_TRANSPARENCY, &mut registry);
        assert_eq!(
            outcome.change,
            Some(PolicyChange {
                previous: AccessibilityPolicy::default(),
                current: REDUCE_TRANSPARENCY,
            })
        );
        // Still reported: nothing was committed.
        assert!(engine.evaluate(REDUCE_TRANSPARENCY, &mut registry).change.is_some());

        engine.commit(REDUCE_TRANSPARENCY);
        assert_eq!(engine.current(), REDUCE_TRANSPARENCY);
        assert!(engine.evaluate(REDUCE_TRANSPARENCY, &mut registry).change.is_none());
    }

    #[test]
    fn policy_off_keeps_declared_variants() {
        let mut registry = registry_with(&[EffectVariant::HighTransparency]);
        let outcome = PolicyEngine::new().evaluate(AccessibilityPolicy::default(), &mut registry);
        assert_eq!(outcome.forced_opaque, 0);
        assert_eq!(
            registry.effective_variant(RegionIdx(0)),
            EffectiveVariant::HighTransparency
        );
    }
}
