// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tick compositor pass.
//!
//! A [`Compositor`] runs one synchronous pass per render tick, strictly in
//! this order:
//!
//! 1. **Policy**: load the declarations and apply the accessibility policy.
//! 2. **Group**: partition regions by proximity within their scopes.
//! 3. **Validate**: resolve one variant per group.
//! 4. **Diff**: classify identities against the snapshot.
//! 5. **Plan**: derive or advance one transition per identity.
//! 6. **Emit**: build the back-to-front [`DrawList`].
//!
//! Passes are all-or-nothing. Every fallible step happens before any
//! retained state changes, so a [`TickError`] leaves the previous draw list,
//! snapshot, and transitions exactly as they were.
//!
//! # Retained input
//!
//! Input is submitted into a single pending slot with
//! [`submit`](Compositor::submit); a newer submission replaces an unconsumed
//! one. A tick with nothing pending re-runs the last successfully applied
//! input so running transitions keep advancing.

use alloc::vec::Vec;

use crate::config::CompositorConfig;
use crate::draw::DrawList;
use crate::error::TickError;
use crate::group::{Grouping, ProximityGrouper};
use crate::identity::IdentityTracker;
use crate::policy::{AccessibilityPolicy, PolicyEngine};
use crate::region::{RegionDeclaration, RegionRegistry};
use crate::time::{Clock, HostTime};
use crate::trace::{
    InputDiscardedEvent, PassBeginEvent, PassSummary, PassSummaryBuilder, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, PlanSupersededEvent, PolicyChangedEvent, Tracer,
};
use crate::transition::{PlanContext, PlanSettings, Supersession, TransitionPlanner};
use crate::validate::{VariantMismatch, resolve_variants};

/// Everything the caller declares for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickInput {
    /// Region declarations in declaration order.
    pub regions: Vec<RegionDeclaration>,
    /// Accessibility preferences in effect.
    pub policy: AccessibilityPolicy,
}

impl TickInput {
    /// Creates an input from declarations and policy.
    #[must_use]
    pub fn new(regions: Vec<RegionDeclaration>, policy: AccessibilityPolicy) -> Self {
        Self { regions, policy }
    }
}

/// Result of a successful pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Pass counter.
    pub pass_index: u64,
    /// `true` if the pass consumed newly submitted input.
    pub fresh_input: bool,
    /// Variant conflicts resolved this pass.
    pub diagnostics: Vec<VariantMismatch>,
    /// Unfinished transitions replaced this pass.
    pub superseded: Vec<Supersession>,
    /// Timing and counts.
    pub summary: PassSummary,
}

/// Exponential moving average.
#[derive(Clone, Copy, Debug)]
struct Ema {
    value: f32,
    alpha: f32,
    initialized: bool,
}

impl Ema {
    const fn new(alpha: f32) -> Self {
        Self {
            value: 0.0,
            alpha,
            initialized: false,
        }
    }

    fn update(&mut self, sample: f32) {
        if self.initialized {
            self.value = self.alpha * sample + (1.0 - self.alpha) * self.value;
        } else {
            self.value = sample;
            self.initialized = true;
        }
    }

    const fn get(&self) -> f32 {
        self.value
    }
}

/// Orchestrates policy, grouping, validation, identity tracking, and
/// transition planning once per tick.
///
/// `C` is the wall clock used for phase timing; it never influences the
/// draw list.
#[derive(Debug)]
pub struct Compositor<C> {
    config: CompositorConfig,
    clock: C,
    // Committed state.
    registry: RegionRegistry,
    grouping: Grouping,
    policy: PolicyEngine,
    tracker: IdentityTracker,
    planner: TransitionPlanner,
    draw_list: DrawList,
    // Pass machinery.
    scratch: RegionRegistry,
    grouper: ProximityGrouper,
    pending: Option<TickInput>,
    applied: Option<TickInput>,
    discarded: u32,
    pass_index: u64,
    cost_ema: Ema,
}

impl<C: Clock> Compositor<C> {
    /// Creates a compositor with no regions.
    #[must_use]
    pub fn new(config: CompositorConfig, clock: C) -> Self {
        Self {
            grouper: ProximityGrouper::new(config.distance_metric, config.default_spacing),
            cost_ema: Ema::new(config.ema_alpha),
            config,
            clock,
            registry: RegionRegistry::new(),
            grouping: Grouping::default(),
            policy: PolicyEngine::new(),
            tracker: IdentityTracker::new(),
            planner: TransitionPlanner::new(),
            draw_list: DrawList::new(),
            scratch: RegionRegistry::new(),
            pending: None,
            applied: None,
            discarded: 0,
            pass_index: 0,
        }
    }

    /// Stores `input` for the next tick.
    ///
    /// Returns `true` if an unconsumed earlier input was discarded.
    pub fn submit(&mut self, input: TickInput) -> bool {
        let displaced = self.pending.replace(input).is_some();
        if displaced {
            self.discarded = self.discarded.saturating_add(1);
        }
        displaced
    }

    /// Whether an input is waiting for the next tick.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs one pass at tick time `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`TickError`] if the input is misconfigured. The previous
    /// draw list stays authoritative and a rejected fresh input is not
    /// retained.
    pub fn tick(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> Result<TickReport, TickError> {
        let pass_index = self.pass_index;
        self.pass_index += 1;

        if self.discarded > 0 {
            tracer.input_discarded(&InputDiscardedEvent {
                pass_index,
                count: self.discarded,
            });
            self.discarded = 0;
        }

        let (input, fresh_input) = match self.pending.take() {
            Some(input) => (input, true),
            None => (self.applied.take().unwrap_or_default(), false),
        };

        let result = self.run_pass(pass_index, now, &input, fresh_input, tracer);
        match &result {
            Ok(_) => self.applied = Some(input),
            Err(e) => {
                tracer.pass_aborted(pass_index, e);
                if !fresh_input {
                    self.applied = Some(input);
                }
            }
        }
        result
    }

    fn run_pass(
        &mut self,
        pass_index: u64,
        now: HostTime,
        input: &TickInput,
        fresh_input: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<TickReport, TickError> {
        let started = self.clock.now();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the registry caps regions below u32::MAX"
        )]
        let region_count = input.regions.len() as u32;
        tracer.pass_begin(&PassBeginEvent {
            pass_index,
            now,
            region_count,
            fresh_input,
        });
        let mut summary = PassSummaryBuilder::new(pass_index, now, started);
        let phases = PhaseClock {
            clock: &self.clock,
            pass_index,
        };

        phases.begin(PhaseKind::Policy, &mut summary, tracer);
        self.scratch.load(&input.regions)?;
        let policy = self.policy.evaluate(input.policy, &mut self.scratch);
        phases.end(PhaseKind::Policy, &mut summary, tracer);

        phases.begin(PhaseKind::Group, &mut summary, tracer);
        let mut grouping = self.grouper.group(&self.scratch)?;
        phases.end(PhaseKind::Group, &mut summary, tracer);

        // Nothing below can fail.

        phases.begin(PhaseKind::Validate, &mut summary, tracer);
        let diagnostics = resolve_variants(&mut grouping, &self.scratch);
        for mismatch in &diagnostics {
            tracer.variant_mismatch(pass_index, mismatch);
        }
        phases.end(PhaseKind::Validate, &mut summary, tracer);

        phases.begin(PhaseKind::Diff, &mut summary, tracer);
        let diff = self.tracker.diff(&self.scratch, &grouping);
        phases.end(PhaseKind::Diff, &mut summary, tracer);

        phases.begin(PhaseKind::Plan, &mut summary, tracer);
        let mut planned = self.planner.plan(&PlanContext {
            now,
            registry: &self.scratch,
            grouping: &grouping,
            tracker: &self.tracker,
            diff: &diff,
            settings: PlanSettings::from_config(&self.config, input.policy.reduce_motion),
        });
        let superseded = core::mem::take(&mut planned.superseded);
        for s in &superseded {
            tracer.plan_superseded(&PlanSupersededEvent::new(pass_index, s));
        }
        phases.end(PhaseKind::Plan, &mut summary, tracer);

        phases.begin(PhaseKind::Emit, &mut summary, tracer);
        let draw_list = DrawList::build(pass_index, &self.scratch, &grouping, &planned);
        phases.end(PhaseKind::Emit, &mut summary, tracer);

        #[cfg(feature = "trace-rich")]
        if tracer.wants_rich() {
            let events: Vec<crate::trace::DrawCommandEvent> =
                draw_list.commands.iter().map(Into::into).collect();
            tracer.draw_commands(pass_index, &events);
        }

        // Commit.
        if let Some(change) = policy.change {
            tracer.policy_changed(&PolicyChangedEvent {
                pass_index,
                previous: change.previous,
                current: change.current,
                forced_opaque: policy.forced_opaque,
            });
        }
        core::mem::swap(&mut self.registry, &mut self.scratch);
        self.policy.commit(input.policy);
        self.tracker.commit(diff);
        self.planner.commit(planned);

        #[expect(
            clippy::cast_possible_truncation,
            reason = "group and command counts are bounded by the region count"
        )]
        summary.set_counts(
            region_count,
            grouping.len() as u32,
            diagnostics.len() as u32,
            superseded.len() as u32,
            draw_list.len() as u32,
        );
        self.grouping = grouping;
        self.draw_list = draw_list;

        let summary = summary.finish(self.clock.now(), self.config.pass_budget);
        self.cost_ema.update(summary.total_ticks as f32);
        tracer.pass_summary(&summary);

        Ok(TickReport {
            pass_index,
            fresh_input,
            diagnostics,
            superseded,
            summary,
        })
    }

    /// The draw list of the last successful pass.
    #[must_use]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// Regions of the last successful pass.
    #[must_use]
    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    /// Groups of the last successful pass.
    #[must_use]
    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    /// The identity snapshot.
    #[must_use]
    pub fn tracker(&self) -> &IdentityTracker {
        &self.tracker
    }

    /// The active transitions.
    #[must_use]
    pub fn planner(&self) -> &TransitionPlanner {
        &self.planner
    }

    /// The accessibility policy of the last successful pass.
    #[must_use]
    pub fn policy(&self) -> AccessibilityPolicy {
        self.policy.current()
    }

    /// Whether any transition is still running, so another tick would change
    /// the draw list.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.planner.is_animating()
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Number of passes attempted so far, failed ones included.
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.pass_index
    }

    /// Smoothed wall-time cost of successful passes, in ticks.
    #[must_use]
    pub fn pass_cost_estimate(&self) -> f32 {
        self.cost_ema.get()
    }
}

/// Reads the wall clock at phase boundaries.
struct PhaseClock<'c, C> {
    clock: &'c C,
    pass_index: u64,
}

impl<C: Clock> PhaseClock<'_, C> {
    fn begin(&self, phase: PhaseKind, summary: &mut PassSummaryBuilder, tracer: &mut Tracer<'_>) {
        let timestamp = self.clock.now();
        summary.phase_begin(phase, timestamp);
        tracer.phase_begin(&PhaseBeginEvent {
            pass_index: self.pass_index,
            phase,
            timestamp,
        });
    }

    fn end(&self, phase: PhaseKind, summary: &mut PassSummaryBuilder, tracer: &mut Tracer<'_>) {
        let timestamp = self.clock.now();
        summary.phase_end(phase, timestamp);
        tracer.phase_end(&PhaseEndEvent {
            pass_index: self.pass_index,
            phase,
            timestamp,
        });
    }
}
