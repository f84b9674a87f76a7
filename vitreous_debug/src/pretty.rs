// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use vitreous_core::error::TickError;
use vitreous_core::policy::AccessibilityPolicy;
use vitreous_core::time::{HostTime, Timebase};
use vitreous_core::trace::{
    DrawCommandEvent, InputDiscardedEvent, PassBeginEvent, PassSummary, PhaseBeginEvent,
    PhaseEndEvent, PlanSupersededEvent, PolicyChangedEvent, TraceSink,
};
use vitreous_core::validate::VariantMismatch;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ticks_to_us(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1000.0
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.ticks_to_us(t.ticks())
    }
}

fn policy_flags(p: AccessibilityPolicy) -> &'static str {
    match (p.reduce_transparency, p.reduce_motion) {
        (false, false) => "none",
        (true, false) => "reduce-transparency",
        (false, true) => "reduce-motion",
        (true, true) => "reduce-transparency+reduce-motion",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let input = if e.fresh_input { "fresh" } else { "retained" };
        let _ = writeln!(
            self.writer,
            "[pass] #{} now={:.1}µs regions={} input={input}",
            e.pass_index,
            self.host_us(e.now),
            e.region_count,
        );
    }

    fn on_input_discarded(&mut self, e: &InputDiscardedEvent) {
        let _ = writeln!(
            self.writer,
            "[input] #{} discarded={}",
            e.pass_index, e.count,
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] #{} {} at {:.1}µs",
            e.pass_index,
            e.phase.name(),
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] #{} {} at {:.1}µs",
            e.pass_index,
            e.phase.name(),
            self.host_us(e.timestamp),
        );
    }

    fn on_policy_changed(&mut self, e: &PolicyChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[policy] #{} {} -> {} forced_opaque={}",
            e.pass_index,
            policy_flags(e.previous),
            policy_flags(e.current),
            e.forced_opaque,
        );
    }

    fn on_variant_mismatch(&mut self, pass_index: u64, mismatch: &VariantMismatch) {
        let losers: Vec<String> = mismatch.losers.iter().map(|r| r.0.to_string()).collect();
        let _ = writeln!(
            self.writer,
            "[mismatch] #{pass_index} group={} resolved={:?} winner={} overridden=[{}]",
            mismatch.group.0,
            mismatch.resolved,
            mismatch.winner.0,
            losers.join(","),
        );
    }

    fn on_plan_superseded(&mut self, e: &PlanSupersededEvent) {
        let _ = writeln!(
            self.writer,
            "[superseded] #{} key={}:{} {:?}@{:.2} -> {:?}",
            e.pass_index,
            e.key.namespace.0,
            e.key.region.0,
            e.previous,
            e.progress,
            e.replacement,
        );
    }

    fn on_pass_aborted(&mut self, pass_index: u64, error: &TickError) {
        let _ = writeln!(self.writer, "[abort] #{pass_index} {error}");
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let budget = if s.over_budget { "OVER" } else { "ok" };
        let _ = writeln!(
            self.writer,
            "[summary] #{} regions={} groups={} commands={} policy={:.1}µs group={:.1}µs \
             validate={:.1}µs diff={:.1}µs plan={:.1}µs emit={:.1}µs total={:.1}µs budget={budget}",
            s.pass_index,
            s.region_count,
            s.group_count,
            s.command_count,
            self.ticks_to_us(s.policy_ticks),
            self.ticks_to_us(s.group_ticks),
            self.ticks_to_us(s.validate_ticks),
            self.ticks_to_us(s.diff_ticks),
            self.ticks_to_us(s.plan_ticks),
            self.ticks_to_us(s.emit_ticks),
            self.ticks_to_us(s.total_ticks),
        );
    }

    fn on_draw_commands(&mut self, pass_index: u64, commands: &[DrawCommandEvent]) {
        let _ = writeln!(
            self.writer,
            "[draw] #{pass_index} commands={}",
            commands.len(),
        );
        for c in commands {
            let _ = writeln!(
                self.writer,
                "  {}:{} z={} {:?} {:?}@{:.2} opacity={:.2} blend={} bounds=({:.1},{:.1})-({:.1},{:.1})",
                c.key.namespace.0,
                c.key.region.0,
                c.z_order,
                c.variant,
                c.transition,
                c.progress,
                c.opacity,
                c.blend,
                c.bounds.x0,
                c.bounds.y0,
                c.bounds.x1,
                c.bounds.y1,
            );
        }
    }
}
