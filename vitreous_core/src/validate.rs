// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Variant reconciliation within groups.
//!
//! A group blends into one surface, so it renders with one variant. When
//! members disagree, the earliest-declared member wins and the rest are
//! reported in a [`VariantMismatch`]. The outcome depends only on declaration
//! order, so identical input always resolves identically.

use alloc::vec::Vec;

use crate::group::{GroupId, Grouping};
use crate::region::{EffectiveVariant, RegionId, RegionRegistry};

/// Non-fatal diagnostic: members of one group declared different variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantMismatch {
    /// The affected group.
    pub group: GroupId,
    /// The variant the whole group renders with.
    pub resolved: EffectiveVariant,
    /// The earliest-declared member, whose variant won.
    pub winner: RegionId,
    /// Members whose own variant was overridden, in declaration order.
    pub losers: Vec<RegionId>,
}

/// Sets every group's variant to its earliest member's effective variant.
///
/// Returns one diagnostic per group with disagreeing members, in group order.
pub fn resolve_variants(grouping: &mut Grouping, registry: &RegionRegistry) -> Vec<VariantMismatch> {
    let mut mismatches = Vec::new();
    for group in grouping.groups_mut() {
        let Some((&first, rest)) = group.members.split_first() else {
            continue;
        };
        let resolved = registry.effective_variant(first);
        group.variant = resolved;

        let losers: Vec<RegionId> = rest
            .iter()
            .filter(|&&m| registry.effective_variant(m) != resolved)
            .map(|&m| registry.region_id(m))
            .collect();
        if !losers.is_empty() {
            mismatches.push(VariantMismatch {
                group: group.id,
                resolved,
                winner: registry.region_id(first),
                losers,
            });
        }
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Rect;

    use super::*;
    use crate::config::DistanceMetric;
    use crate::group::ProximityGrouper;
    use crate::policy::{AccessibilityPolicy, PolicyEngine};
    use crate::region::{EffectVariant, Namespace, RegionDeclaration, ShapeDescriptor};

    fn row(variants: &[EffectVariant]) -> RegionRegistry {
        let decls: Vec<_> = (0_u64..)
            .zip(variants)
            .map(|(i, v)| {
                let x = i as f64 * 45.0;
                RegionDeclaration::new(
                    Namespace(0),
                    RegionId(i + 1),
                    ShapeDescriptor::capsule(Rect::new(x, 0.0, x + 40.0, 20.0)),
                )
                .with_variant(*v)
            })
            .collect();
        let mut registry = RegionRegistry::new();
        registry.load(&decls).unwrap();
        registry
    }

    fn resolve(registry: &RegionRegistry) -> (Grouping, Vec<VariantMismatch>) {
        let mut grouping = ProximityGrouper::new(DistanceMetric::BoundingBox, 10.0)
            .group(registry)
            .unwrap();
        let mismatches = resolve_variants(&mut grouping, registry);
        (grouping, mismatches)
    }

    #[test]
    fn earliest_member_wins() {
        use EffectVariant::{HighTransparency as B, Standard as A};
        let registry = row(&[A, B, A]);
        let (grouping, mismatches) = resolve(&registry);

        assert_eq!(grouping.groups()[0].variant, EffectiveVariant::Standard);
        assert_eq!(
            mismatches,
            vec![VariantMismatch {
                group: GroupId(0),
                resolved: EffectiveVariant::Standard,
                winner: RegionId(1),
                losers: vec![RegionId(2)],
            }]
        );
    }

    #[test]
    fn resolution_is_reproducible() {
        use EffectVariant::{HighTransparency as B, Standard as A};
        let registry = row(&[A, B, A]);
        assert_eq!(resolve(&registry), resolve(&registry));
    }

    #[test]
    fn uniform_group_reports_nothing() {
        let registry = row(&[EffectVariant::HighTransparency; 3]);
        let (grouping, mismatches) = resolve(&registry);
        assert!(mismatches.is_empty());
        assert_eq!(
            grouping.groups()[0].variant,
            EffectiveVariant::HighTransparency
        );
    }

    #[test]
    fn reduce_transparency_makes_groups_agree() {
        let mut registry = row(&[EffectVariant::Standard, EffectVariant::HighTransparency]);
        PolicyEngine::new().evaluate(
            AccessibilityPolicy {
                reduce_transparency: true,
                reduce_motion: false,
            },
            &mut registry,
        );
        let (grouping, mismatches) = resolve(&registry);
        assert!(mismatches.is_empty());
        assert_eq!(grouping.groups()[0].variant, EffectiveVariant::Opaque);
    }
}
