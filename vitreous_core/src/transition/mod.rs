// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition planning.
//!
//! Every tracked identity has exactly one [`TransitionPlan`]: a source and
//! target [`VisualState`], a start time, and a duration. Progress is derived
//! from the tick time and never decreases for the lifetime of a plan.
//!
//! Each tick the [`TransitionPlanner`] compares the new targets with the
//! active plans:
//!
//! - Unchanged target → the plan keeps running.
//! - Changed target → the plan is replaced *in place*. The replacement starts
//!   from the current interpolated state of the old plan, so a region that is
//!   retargeted mid-flight never snaps. Replacing an unfinished plan is
//!   reported as a [`Supersession`].
//! - Departed identity → an exit plan toward the neutral state. Exit plans
//!   outlive the identity in the snapshot and are retired when they complete.
//!
//! Like the rest of a pass, planning is split into a pure
//! [`plan`](TransitionPlanner::plan) and a [`commit`](TransitionPlanner::commit).

mod easing;
mod state;

pub use easing::Easing;
pub use state::VisualState;

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::config::CompositorConfig;
use crate::group::Grouping;
use crate::identity::{IdentityDiff, IdentityTracker, TrackedRegion};
use crate::region::{EffectiveVariant, IdentityKey, RegionIdx, RegionRegistry, Tint, TransitionStyle};
use crate::time::{Duration, HostTime};

/// How a plan moves between its states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    /// Matched-geometry morph of a persisting identity.
    Morph,
    /// Scale and fade in from the neutral state.
    Appear,
    /// Scale and fade out into the neutral state.
    Disappear,
    /// No interpolation; complete immediately.
    Instant,
    /// Fade in place at the target geometry.
    Materialize,
    /// Fade out in place.
    Dematerialize,
}

impl TransitionKind {
    /// Whether the plan belongs to an identity that has left the tick.
    #[must_use]
    pub const fn is_exit(self) -> bool {
        matches!(self, Self::Disappear | Self::Dematerialize)
    }

    /// Whether the plan animates opacity.
    #[must_use]
    pub const fn is_fade(self) -> bool {
        matches!(
            self,
            Self::Appear | Self::Disappear | Self::Materialize | Self::Dematerialize
        )
    }
}

/// The active interpolation of one identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionPlan {
    /// The identity this plan animates.
    pub key: IdentityKey,
    /// Interpolation kind.
    pub kind: TransitionKind,
    /// State at `t = 0`.
    pub from: VisualState,
    /// State at `t = 1`.
    pub to: VisualState,
    /// Variant being cross-faded away from, if the variant changed.
    pub from_variant: Option<EffectiveVariant>,
    /// Variant at `t = 1`.
    pub to_variant: EffectiveVariant,
    /// Tick time at which the plan started.
    pub start: HostTime,
    /// Plan length.
    pub duration: Duration,
    /// Curve applied to progress.
    pub easing: Easing,
    /// Stacking order to draw with.
    pub z_order: i32,
    /// Tint to draw with.
    pub tint: Option<Tint>,
    progress: f64,
}

impl TransitionPlan {
    /// A plan that is already complete at `to`.
    #[must_use]
    pub fn settled(
        key: IdentityKey,
        kind: TransitionKind,
        to: VisualState,
        to_variant: EffectiveVariant,
        now: HostTime,
    ) -> Self {
        Self {
            key,
            kind,
            from: to,
            to,
            from_variant: None,
            to_variant,
            start: now,
            duration: Duration::ZERO,
            easing: Easing::Linear,
            z_order: 0,
            tint: None,
            progress: 1.0,
        }
    }

    /// Raw progress `t` in `0.0..=1.0`.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress after easing.
    #[must_use]
    pub fn eased(&self) -> f64 {
        self.easing.apply(self.progress)
    }

    /// Whether `t` has reached 1.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// The interpolated state at the current progress.
    #[must_use]
    pub fn current(&self) -> VisualState {
        if self.is_complete() {
            self.to
        } else {
            self.from.lerp(&self.to, self.eased())
        }
    }

    /// The variant being faded out and the weight of the new one, while a
    /// variant cross-fade is running.
    #[must_use]
    pub fn variant_mix(&self) -> Option<(EffectiveVariant, f64)> {
        match self.from_variant {
            Some(from) if !self.is_complete() => Some((from, self.eased())),
            _ => None,
        }
    }

    /// Moves progress to `now`. Progress never decreases.
    pub fn advance(&mut self, now: HostTime) {
        let raw = if self.duration.ticks() == 0 {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(self.start).ticks();
            let t = elapsed as f64 / self.duration.ticks() as f64;
            t.min(1.0)
        };
        self.progress = self.progress.max(raw);
    }

    /// Jumps to the terminal state.
    pub fn complete(&mut self) {
        self.progress = 1.0;
    }
}

/// An unfinished plan replaced because its target changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Supersession {
    /// The identity.
    pub key: IdentityKey,
    /// Kind of the replaced plan.
    pub previous: TransitionKind,
    /// Kind of the new plan.
    pub replacement: TransitionKind,
    /// Progress the replaced plan had reached.
    pub progress: f64,
}

/// Animation settings for one planning step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanSettings {
    /// Length of non-instant plans.
    pub duration: Duration,
    /// Curve for new plans.
    pub easing: Easing,
    /// Scale of the neutral state used by `Appear`/`Disappear`.
    pub appear_scale: f64,
    /// Collapse every plan to its terminal state.
    pub reduce_motion: bool,
}

impl PlanSettings {
    /// Settings taken from `config`.
    #[must_use]
    pub const fn from_config(config: &CompositorConfig, reduce_motion: bool) -> Self {
        Self {
            duration: config.transition_duration,
            easing: config.easing,
            appear_scale: config.appear_scale,
            reduce_motion,
        }
    }
}

/// Inputs of [`TransitionPlanner::plan`].
#[derive(Clone, Copy, Debug)]
pub struct PlanContext<'a> {
    /// Tick time.
    pub now: HostTime,
    /// This tick's regions.
    pub registry: &'a RegionRegistry,
    /// This tick's resolved groups.
    pub grouping: &'a Grouping,
    /// Tracker holding the previous snapshot.
    pub tracker: &'a IdentityTracker,
    /// This tick's identity diff.
    pub diff: &'a IdentityDiff,
    /// Animation settings.
    pub settings: PlanSettings,
}

/// Output of [`TransitionPlanner::plan`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlannedTransitions {
    plans: BTreeMap<IdentityKey, TransitionPlan>,
    /// Unfinished plans that were replaced, in key order.
    pub superseded: Vec<Supersession>,
}

impl PlannedTransitions {
    /// Returns the plan for `key`.
    #[must_use]
    pub fn get(&self, key: IdentityKey) -> Option<&TransitionPlan> {
        self.plans.get(&key)
    }

    /// Iterates over plans in key order.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionPlan> {
        self.plans.values()
    }

    /// Number of plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether there are no plans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Owns the active plans and derives the next tick's plans.
#[derive(Clone, Debug, Default)]
pub struct TransitionPlanner {
    plans: BTreeMap<IdentityKey, TransitionPlan>,
}

impl TransitionPlanner {
    /// Creates a planner with no active plans.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active plan for `key`.
    #[must_use]
    pub fn get(&self, key: IdentityKey) -> Option<&TransitionPlan> {
        self.plans.get(&key)
    }

    /// Number of active plans, exit plans included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether there are no active plans.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Whether any active plan is still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.plans.values().any(|p| !p.is_complete())
    }

    /// Derives the plans for this tick without modifying the planner.
    #[must_use]
    pub fn plan(&self, ctx: &PlanContext<'_>) -> PlannedTransitions {
        let mut out = PlannedTransitions::default();

        for idx in ctx.registry.indices() {
            let plan = self.plan_live(ctx, idx, &mut out.superseded);
            out.plans.insert(plan.key, plan);
        }

        for &key in &ctx.diff.disappearing {
            let Some(tracked) = ctx.tracker.get(key) else {
                continue;
            };
            if let Some(plan) = self.plan_exit(ctx, key, tracked, &mut out.superseded) {
                out.plans.insert(key, plan);
            }
        }

        // Exit plans of identities that already left the snapshot keep
        // running until they finish.
        for (key, plan) in &self.plans {
            if out.plans.contains_key(key) || !plan.kind.is_exit() {
                continue;
            }
            let mut plan = *plan;
            plan.advance(ctx.now);
            if ctx.settings.reduce_motion {
                plan.complete();
            }
            if !plan.is_complete() {
                out.plans.insert(*key, plan);
            }
        }

        out.superseded.sort_by_key(|s| s.key);
        out
    }

    /// Installs planned transitions as the active set.
    pub fn commit(&mut self, planned: PlannedTransitions) {
        self.plans = planned.plans;
    }

    fn plan_live(
        &self,
        ctx: &PlanContext<'_>,
        idx: RegionIdx,
        superseded: &mut Vec<Supersession>,
    ) -> TransitionPlan {
        let registry = ctx.registry;
        let settings = ctx.settings;
        let key = registry.key(idx);
        let to = VisualState::visible(registry.shape(idx).rounded_rect());
        let to_variant = ctx.grouping.group(ctx.grouping.group_of(idx)).variant;
        let previous = ctx.tracker.get(key);

        let mut existing = self.plans.get(&key).copied();
        if let Some(plan) = &mut existing {
            plan.advance(ctx.now);
        }

        let unchanged = existing
            .is_some_and(|p| !p.kind.is_exit() && p.to == to && p.to_variant == to_variant);

        let mut plan = match existing {
            // A completed plan stays as it finished, kind included.
            Some(p) if unchanged => p,
            _ => {
                let plan = new_live_plan(ctx, idx, to, to_variant, existing, previous);
                if let Some(old) = existing.filter(|p| !p.is_complete()) {
                    superseded.push(Supersession {
                        key,
                        previous: old.kind,
                        replacement: plan.kind,
                        progress: old.progress,
                    });
                }
                plan
            }
        };

        plan.z_order = registry.z_order(idx);
        plan.tint = registry.tint(idx);
        if settings.reduce_motion {
            plan.complete();
        }
        plan
    }

    fn plan_exit(
        &self,
        ctx: &PlanContext<'_>,
        key: IdentityKey,
        tracked: &TrackedRegion,
        superseded: &mut Vec<Supersession>,
    ) -> Option<TransitionPlan> {
        let settings = ctx.settings;
        let mut existing = self.plans.get(&key).copied();
        if let Some(plan) = &mut existing {
            plan.advance(ctx.now);
        }

        let kind = match tracked.transition {
            TransitionStyle::Instant => None,
            TransitionStyle::Materialize => Some(TransitionKind::Dematerialize),
            TransitionStyle::Morph => Some(TransitionKind::Disappear),
        };

        if let Some(old) = existing.filter(|p| !p.is_complete()) {
            superseded.push(Supersession {
                key,
                previous: old.kind,
                replacement: kind.unwrap_or(TransitionKind::Instant),
                progress: old.progress,
            });
        }

        let kind = kind?;
        let from = existing.map_or(VisualState::visible(tracked.geometry), |p| p.current());
        let scale = if kind == TransitionKind::Dematerialize {
            1.0
        } else {
            settings.appear_scale
        };
        let mut plan = TransitionPlan {
            key,
            kind,
            from,
            to: VisualState::neutral(tracked.geometry, scale),
            from_variant: None,
            to_variant: tracked.variant,
            start: ctx.now,
            duration: settings.duration,
            easing: settings.easing,
            z_order: tracked.z_order,
            tint: tracked.tint,
            progress: 0.0,
        };
        plan.advance(ctx.now);
        if settings.reduce_motion {
            plan.complete();
        }
        (!plan.is_complete()).then_some(plan)
    }
}

/// Builds the replacement plan for a live identity whose target changed.
fn new_live_plan(
    ctx: &PlanContext<'_>,
    idx: RegionIdx,
    to: VisualState,
    to_variant: EffectiveVariant,
    existing: Option<TransitionPlan>,
    previous: Option<&TrackedRegion>,
) -> TransitionPlan {
    let settings = ctx.settings;
    let key = ctx.registry.key(idx);
    let in_flight = existing.filter(|p| !p.is_complete());

    // Where the region visibly is right now.
    let start_state = existing
        .map(|p| p.current())
        .or_else(|| previous.map(|t| VisualState::visible(t.geometry)));
    let start_variant = existing
        .map(|p| p.to_variant)
        .or_else(|| previous.map(|t| t.variant));

    let (kind, from) = match (ctx.registry.transition(idx), start_state) {
        (TransitionStyle::Instant, _) => (TransitionKind::Instant, to),
        (TransitionStyle::Materialize, Some(start)) if start.geometry == to.geometry => {
            (TransitionKind::Morph, start)
        }
        (TransitionStyle::Materialize, _) => {
            let opacity = in_flight
                .filter(|p| p.kind.is_fade())
                .map_or(0.0, |p| p.current().opacity);
            (
                TransitionKind::Materialize,
                VisualState {
                    geometry: to.geometry,
                    opacity,
                },
            )
        }
        (TransitionStyle::Morph, Some(start)) if previous.is_some() => {
            (TransitionKind::Morph, start)
        }
        (TransitionStyle::Morph, Some(start)) => {
            // Returning while an exit plan still runs: appear from where it is.
            (TransitionKind::Appear, start)
        }
        (TransitionStyle::Morph, None) => (
            TransitionKind::Appear,
            VisualState::neutral(to.geometry, settings.appear_scale),
        ),
    };

    let from_variant = start_variant.filter(|v| *v != to_variant && kind != TransitionKind::Instant);
    if from == to && from_variant.is_none() {
        return TransitionPlan::settled(key, kind, to, to_variant, ctx.now);
    }

    let duration = if kind == TransitionKind::Instant {
        Duration::ZERO
    } else {
        settings.duration
    };
    let mut plan = TransitionPlan {
        key,
        kind,
        from,
        to,
        from_variant,
        to_variant,
        start: ctx.now,
        duration,
        easing: settings.easing,
        z_order: 0,
        tint: None,
        progress: 0.0,
    };
    plan.advance(ctx.now);
    plan
}
