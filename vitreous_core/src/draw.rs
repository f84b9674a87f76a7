// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw list: the ordered output of one compositor pass.

use alloc::vec::Vec;

use kurbo::RoundedRect;

use crate::group::{GroupId, Grouping};
use crate::region::{EffectiveVariant, IdentityKey, RegionId, RegionRegistry, Tint};
use crate::transition::{PlannedTransitions, TransitionKind, TransitionPlan};

/// A variant cross-fade in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossfade {
    /// The variant fading out.
    pub from: EffectiveVariant,
    /// Weight of the resolved variant, `0.0..=1.0`.
    pub weight: f64,
}

/// One region to rasterize.
///
/// Commands are produced in back-to-front order.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    /// Caller id of the region.
    pub region: RegionId,
    /// Identity key of the region.
    pub key: IdentityKey,
    /// Group the region blends with, or `None` for a departing region.
    pub group: Option<GroupId>,
    /// Resolved variant.
    pub variant: EffectiveVariant,
    /// Set while the variant is cross-fading.
    pub crossfade: Option<Crossfade>,
    /// Interpolated outline.
    pub geometry: RoundedRect,
    /// Interpolated material opacity.
    pub opacity: f64,
    /// Tint.
    pub tint: Option<Tint>,
    /// Whether the rasterizer should blend this shape with its group
    /// siblings. Always `false` for singletons and non-translucent variants.
    pub blend: bool,
    /// Whether the region takes input. Departing regions never do.
    pub interactive: bool,
    /// Stacking order.
    pub z_order: i32,
    /// Kind of the driving transition.
    pub transition: TransitionKind,
    /// Raw progress of the driving transition.
    pub progress: f64,
}

/// Ordered draw commands for one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    /// The pass that produced this list.
    pub pass_index: u64,
    /// Commands in back-to-front order.
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the list has no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the command for `key`, if drawn.
    #[must_use]
    pub fn find(&self, key: IdentityKey) -> Option<&DrawCommand> {
        self.commands.iter().find(|c| c.key == key)
    }

    /// Builds the list for a pass.
    ///
    /// Live regions come first in declaration order, then departing regions
    /// in key order; a stable sort by z-order then puts them back-to-front,
    /// leaving departing regions above live ones of equal z.
    #[must_use]
    pub fn build(
        pass_index: u64,
        registry: &RegionRegistry,
        grouping: &Grouping,
        planned: &PlannedTransitions,
    ) -> Self {
        let mut commands = Vec::with_capacity(planned.len());

        for idx in registry.indices() {
            let key = registry.key(idx);
            let Some(plan) = planned.get(key) else {
                continue;
            };
            let group = grouping.group(grouping.group_of(idx));
            let mut cmd = command(plan, group.variant);
            cmd.group = Some(group.id);
            cmd.blend = group.blend && group.variant.is_translucent();
            cmd.interactive = registry.interactive(idx);
            commands.push((false, cmd));
        }

        for plan in planned.iter().filter(|p| p.kind.is_exit()) {
            if registry.find(plan.key).is_none() {
                commands.push((true, command(plan, plan.to_variant)));
            }
        }

        commands.sort_by_key(|(departing, cmd)| (cmd.z_order, *departing));
        Self {
            pass_index,
            commands: commands.into_iter().map(|(_, cmd)| cmd).collect(),
        }
    }
}

fn command(plan: &TransitionPlan, variant: EffectiveVariant) -> DrawCommand {
    let state = plan.current();
    DrawCommand {
        region: plan.key.region,
        key: plan.key,
        group: None,
        variant,
        crossfade: plan
            .variant_mix()
            .map(|(from, weight)| Crossfade { from, weight }),
        geometry: state.geometry,
        opacity: state.opacity,
        tint: plan.tint,
        blend: false,
        interactive: false,
        z_order: plan.z_order,
        transition: plan.kind,
        progress: plan.progress(),
    }
}
