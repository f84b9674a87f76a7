// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for compositor passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Compositor`](crate::compositor::Compositor) calls at each stage of a
//! pass. All method bodies default to no-ops, so implementing only the events
//! you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`PassSummaryBuilder`] collects phase timestamps during a pass and
//! produces a [`PassSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates per-command [`DrawCommandEvent`]
//!   batches and the corresponding `TraceSink` method.

use crate::error::TickError;
use crate::policy::AccessibilityPolicy;
use crate::region::IdentityKey;
use crate::time::{Duration, HostTime};
use crate::transition::{Supersession, TransitionKind};
use crate::validate::VariantMismatch;

#[cfg(feature = "trace-rich")]
use crate::draw::DrawCommand;
#[cfg(feature = "trace-rich")]
use crate::group::GroupId;
#[cfg(feature = "trace-rich")]
use crate::region::EffectiveVariant;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a compositor pass is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Accessibility policy → effective variants.
    Policy,
    /// Proximity grouping.
    Group,
    /// Variant reconciliation.
    Validate,
    /// Identity diff against the snapshot.
    Diff,
    /// Transition planning.
    Plan,
    /// Draw-list emission.
    Emit,
}

impl PhaseKind {
    /// All phases in pass order.
    pub const ALL: [Self; 6] = [
        Self::Policy,
        Self::Group,
        Self::Validate,
        Self::Diff,
        Self::Plan,
        Self::Emit,
    ];

    /// A short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::Group => "group",
            Self::Validate => "validate",
            Self::Diff => "diff",
            Self::Plan => "plan",
            Self::Emit => "emit",
        }
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a pass starts.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// Tick time driving transitions.
    pub now: HostTime,
    /// Number of declared regions.
    pub region_count: u32,
    /// `true` if the pass consumes a newly submitted input; `false` when the
    /// last applied input is re-run.
    pub fresh_input: bool,
}

/// Emitted at the start of a pass when submitted inputs were replaced before
/// any pass consumed them.
#[derive(Clone, Copy, Debug)]
pub struct InputDiscardedEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Number of inputs discarded since the previous pass.
    pub count: u32,
}

/// Marks the beginning of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Wall time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a pass phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Wall time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted when the accessibility policy differs from the previous pass.
#[derive(Clone, Copy, Debug)]
pub struct PolicyChangedEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Policy of the previous successful pass.
    pub previous: AccessibilityPolicy,
    /// Policy applied now.
    pub current: AccessibilityPolicy,
    /// Regions forced to opaque rendering this pass.
    pub forced_opaque: u32,
}

/// Emitted when an unfinished transition is replaced.
#[derive(Clone, Copy, Debug)]
pub struct PlanSupersededEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// The identity.
    pub key: IdentityKey,
    /// Kind of the replaced plan.
    pub previous: TransitionKind,
    /// Kind of the new plan.
    pub replacement: TransitionKind,
    /// Progress the replaced plan had reached.
    pub progress: f64,
}

impl PlanSupersededEvent {
    /// Creates the event for `s`.
    #[must_use]
    pub const fn new(pass_index: u64, s: &Supersession) -> Self {
        Self {
            pass_index,
            key: s.key,
            previous: s.previous,
            replacement: s.replacement,
            progress: s.progress,
        }
    }
}

/// Per-pass timing summary produced by [`PassSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Tick time of the pass.
    pub now: HostTime,
    /// Declared regions.
    pub region_count: u32,
    /// Groups formed.
    pub group_count: u32,
    /// Variant mismatches reported.
    pub mismatch_count: u32,
    /// Plans superseded.
    pub superseded_count: u32,
    /// Draw commands emitted.
    pub command_count: u32,
    /// Policy phase duration in ticks (0 if not measured).
    pub policy_ticks: u64,
    /// Group phase duration in ticks (0 if not measured).
    pub group_ticks: u64,
    /// Validate phase duration in ticks (0 if not measured).
    pub validate_ticks: u64,
    /// Diff phase duration in ticks (0 if not measured).
    pub diff_ticks: u64,
    /// Plan phase duration in ticks (0 if not measured).
    pub plan_ticks: u64,
    /// Emit phase duration in ticks (0 if not measured).
    pub emit_ticks: u64,
    /// Wall time from pass start to pass end, in ticks.
    pub total_ticks: u64,
    /// Whether `total_ticks` exceeded the configured pass budget.
    pub over_budget: bool,
}

impl PassSummary {
    /// Duration of `phase` in ticks.
    #[must_use]
    pub const fn phase_ticks(&self, phase: PhaseKind) -> u64 {
        match phase {
            PhaseKind::Policy => self.policy_ticks,
            PhaseKind::Group => self.group_ticks,
            PhaseKind::Validate => self.validate_ticks,
            PhaseKind::Diff => self.diff_ticks,
            PhaseKind::Plan => self.plan_ticks,
            PhaseKind::Emit => self.emit_ticks,
        }
    }
}

/// A compact per-command record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct DrawCommandEvent {
    /// Identity of the drawn region.
    pub key: IdentityKey,
    /// Group, or `None` for a departing region.
    pub group: Option<GroupId>,
    /// Resolved variant.
    pub variant: EffectiveVariant,
    /// Interpolated bounding rectangle.
    pub bounds: kurbo::Rect,
    /// Interpolated opacity.
    pub opacity: f64,
    /// Stacking order.
    pub z_order: i32,
    /// Driving transition.
    pub transition: TransitionKind,
    /// Transition progress.
    pub progress: f64,
    /// Blend flag.
    pub blend: bool,
}

#[cfg(feature = "trace-rich")]
impl From<&DrawCommand> for DrawCommandEvent {
    fn from(cmd: &DrawCommand) -> Self {
        Self {
            key: cmd.key,
            group: cmd.group,
            variant: cmd.variant,
            bounds: cmd.geometry.rect(),
            opacity: cmd.opacity,
            z_order: cmd.z_order,
            transition: cmd.transition,
            progress: cmd.progress,
            blend: cmd.blend,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from compositor passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when submitted inputs were discarded unconsumed.
    fn on_input_discarded(&mut self, e: &InputDiscardedEvent) {
        _ = e;
    }

    /// Called at the beginning of a pass phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a pass phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when the accessibility policy changed.
    fn on_policy_changed(&mut self, e: &PolicyChangedEvent) {
        _ = e;
    }

    /// Called for each group whose members declared different variants.
    fn on_variant_mismatch(&mut self, pass_index: u64, mismatch: &VariantMismatch) {
        _ = (pass_index, mismatch);
    }

    /// Called when an unfinished transition is replaced.
    fn on_plan_superseded(&mut self, e: &PlanSupersededEvent) {
        _ = e;
    }

    /// Called when a configuration error aborts a pass.
    fn on_pass_aborted(&mut self, pass_index: u64, error: &TickError) {
        _ = (pass_index, error);
    }

    /// Called with the timing summary of a successful pass.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called with the emitted draw commands (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_draw_commands(&mut self, pass_index: u64, commands: &[DrawCommandEvent]) {
        _ = (pass_index, commands);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`InputDiscardedEvent`].
    #[inline]
    pub fn input_discarded(&mut self, e: &InputDiscardedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_input_discarded(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PolicyChangedEvent`].
    #[inline]
    pub fn policy_changed(&mut self, e: &PolicyChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_policy_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VariantMismatch`] diagnostic.
    #[inline]
    pub fn variant_mismatch(&mut self, pass_index: u64, mismatch: &VariantMismatch) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_variant_mismatch(pass_index, mismatch);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (pass_index, mismatch);
        }
    }

    /// Emits a [`PlanSupersededEvent`].
    #[inline]
    pub fn plan_superseded(&mut self, e: &PlanSupersededEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_plan_superseded(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a pass aborted by `error`.
    #[inline]
    pub fn pass_aborted(&mut self, pass_index: u64, error: &TickError) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_aborted(pass_index, error);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (pass_index, error);
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Whether rich events reach a sink (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    #[must_use]
    pub fn wants_rich(&self) -> bool {
        self.sink.is_some()
    }

    /// Emits draw command records (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn draw_commands(&mut self, pass_index: u64, commands: &[DrawCommandEvent]) {
        if let Some(s) = &mut self.sink {
            s.on_draw_commands(pass_index, commands);
        }
    }
}

// ---------------------------------------------------------------------------
// PassSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a pass and produces a [`PassSummary`].
#[derive(Debug)]
pub struct PassSummaryBuilder {
    summary: PassSummary,
    started: HostTime,
    phase_starts: [Option<HostTime>; 6],
    phase_ends: [Option<HostTime>; 6],
}

impl PassSummaryBuilder {
    /// Starts building a summary for a pass that began at wall time `started`.
    #[must_use]
    pub fn new(pass_index: u64, now: HostTime, started: HostTime) -> Self {
        Self {
            summary: PassSummary {
                pass_index,
                now,
                ..PassSummary::default()
            },
            started,
            phase_starts: [None; 6],
            phase_ends: [None; 6],
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Records the pass counts.
    pub fn set_counts(
        &mut self,
        region_count: u32,
        group_count: u32,
        mismatch_count: u32,
        superseded_count: u32,
        command_count: u32,
    ) {
        self.summary.region_count = region_count;
        self.summary.group_count = group_count;
        self.summary.mismatch_count = mismatch_count;
        self.summary.superseded_count = superseded_count;
        self.summary.command_count = command_count;
    }

    /// Consumes the builder and produces the final [`PassSummary`].
    ///
    /// `ended` is the wall time at the end of the pass; the pass is flagged
    /// over budget if it took longer than `budget`.
    #[must_use]
    pub fn finish(self, ended: HostTime, budget: Option<Duration>) -> PassSummary {
        let total = ended.saturating_duration_since(self.started);
        PassSummary {
            policy_ticks: self.phase_duration(PhaseKind::Policy),
            group_ticks: self.phase_duration(PhaseKind::Group),
            validate_ticks: self.phase_duration(PhaseKind::Validate),
            diff_ticks: self.phase_duration(PhaseKind::Diff),
            plan_ticks: self.phase_duration(PhaseKind::Plan),
            emit_ticks: self.phase_duration(PhaseKind::Emit),
            total_ticks: total.ticks(),
            over_budget: budget.is_some_and(|b| total > b),
            ..self.summary
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).ticks(),
            _ => 0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Policy => 0,
        PhaseKind::Group => 1,
        PhaseKind::Validate => 2,
        PhaseKind::Diff => 3,
        PhaseKind::Plan => 4,
        PhaseKind::Emit => 5,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
