// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated tick loop that exercises the compositor and its diagnostics.
//!
//! Runs 60 synthetic ticks of a small scene (a tab bar whose capsules merge
//! and split, a toast that materializes and leaves, a reduce-motion toggle,
//! and one misconfigured tick) through a
//! [`Compositor`](vitreous_core::compositor::Compositor). Events go to both a
//! [`PrettyPrintSink`](vitreous_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](vitreous_debug::recorder::RecorderSink); the recording is
//! exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use kurbo::Rect;
use vitreous_core::compositor::{Compositor, TickInput};
use vitreous_core::config::CompositorConfig;
use vitreous_core::error::TickError;
use vitreous_core::policy::AccessibilityPolicy;
use vitreous_core::region::{
    ContainerId, EffectVariant, Namespace, RegionDeclaration, RegionId, ShapeDescriptor, Tint,
    TransitionStyle, UnionKey,
};
use vitreous_core::time::{Duration, HostTime, ManualClock, Timebase};
use vitreous_core::trace::{
    DrawCommandEvent, InputDiscardedEvent, PassBeginEvent, PassSummary, PhaseBeginEvent,
    PhaseEndEvent, PlanSupersededEvent, PolicyChangedEvent, TraceSink, Tracer,
};
use vitreous_core::validate::VariantMismatch;

use vitreous_debug::pretty::PrettyPrintSink;
use vitreous_debug::recorder::RecorderSink;

const TICK_COUNT: u64 = 60;
/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;

const APP: Namespace = Namespace(0);
const SYSTEM: Namespace = Namespace(1);

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.a.on_pass_begin(e);
        self.b.on_pass_begin(e);
    }

    fn on_input_discarded(&mut self, e: &InputDiscardedEvent) {
        self.a.on_input_discarded(e);
        self.b.on_input_discarded(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.a.on_phase_begin(e);
        self.b.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.a.on_phase_end(e);
        self.b.on_phase_end(e);
    }

    fn on_policy_changed(&mut self, e: &PolicyChangedEvent) {
        self.a.on_policy_changed(e);
        self.b.on_policy_changed(e);
    }

    fn on_variant_mismatch(&mut self, pass_index: u64, mismatch: &VariantMismatch) {
        self.a.on_variant_mismatch(pass_index, mismatch);
        self.b.on_variant_mismatch(pass_index, mismatch);
    }

    fn on_plan_superseded(&mut self, e: &PlanSupersededEvent) {
        self.a.on_plan_superseded(e);
        self.b.on_plan_superseded(e);
    }

    fn on_pass_aborted(&mut self, pass_index: u64, error: &TickError) {
        self.a.on_pass_aborted(pass_index, error);
        self.b.on_pass_aborted(pass_index, error);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.a.on_pass_summary(s);
        self.b.on_pass_summary(s);
    }

    fn on_draw_commands(&mut self, pass_index: u64, commands: &[DrawCommandEvent]) {
        self.a.on_draw_commands(pass_index, commands);
        self.b.on_draw_commands(pass_index, commands);
    }
}

/// The scene as the app would declare it on tick `t`.
fn scene(t: u64) -> TickInput {
    let mut regions = Vec::new();

    // Three tabs. Between ticks 10 and 25 the middle tab slides left until
    // it touches the first one, and the outer two share a union key so all
    // three blend as one surface. The third tab asks for a lighter material,
    // which the first tab overrides while they are grouped.
    let middle_x = if (10..25).contains(&t) { 95.0 } else { 130.0 };
    for (id, x) in [(1, 20.0), (2, middle_x), (3, 240.0)] {
        let mut tab = RegionDeclaration::new(
            APP,
            RegionId(id),
            ShapeDescriptor::capsule(Rect::new(x, 700.0, x + 80.0, 736.0)),
        )
        .interactive()
        .in_container(ContainerId(1))
        .with_z_order(1);
        if (10..25).contains(&t) && id != 2 {
            tab = tab.with_union_key(UnionKey(7));
        }
        if id == 3 {
            tab = tab.with_variant(EffectVariant::HighTransparency);
        }
        regions.push(tab);
    }

    // A toast that materializes in place.
    if (20..40).contains(&t) {
        regions.push(
            RegionDeclaration::new(
                SYSTEM,
                RegionId(1),
                ShapeDescriptor::rounded(Rect::new(60.0, 40.0, 300.0, 96.0), 14.0),
            )
            .with_variant(EffectVariant::HighTransparency)
            .with_tint(Tint::rgba(0.2, 0.4, 1.0, 0.15))
            .with_transition(TransitionStyle::Materialize)
            .with_z_order(10),
        );
    }

    // One tick places a system panel across the tab bar's container.
    if t == 50 {
        regions.push(
            RegionDeclaration::new(
                SYSTEM,
                RegionId(2),
                ShapeDescriptor::rect(Rect::new(0.0, 650.0, 400.0, 720.0)),
            )
            .in_container(ContainerId(2)),
        );
    }

    let policy = AccessibilityPolicy {
        reduce_transparency: false,
        reduce_motion: (30..45).contains(&t),
    };
    TickInput::new(regions, policy)
}

fn main() {
    let timebase = Timebase::NANOS;

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase);
    let mut recorder = RecorderSink::new();

    // -- compositor --------------------------------------------------------
    // Each clock read advances 20µs so phase timings are visible.
    let clock = ManualClock::stepping(HostTime(1_000_000_000), Duration(20_000));
    let mut compositor = Compositor::new(CompositorConfig::standard(), clock);

    // -- simulated loop ----------------------------------------------------
    let mut now_ticks: u64 = 1_000_000_000; // start at 1s
    let mut aborted = 0;

    for t in 0..TICK_COUNT {
        // The app skips every fifth declaration; the compositor re-runs the
        // last input. On tick 12 a stale declaration is superseded before the
        // compositor gets to it.
        if t == 12 {
            compositor.submit(scene(t - 1));
        }
        if t % 5 != 3 {
            compositor.submit(scene(t));
        }

        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        match compositor.tick(HostTime(now_ticks), &mut tracer) {
            Ok(report) if !report.diagnostics.is_empty() => {
                println!("tick {t}: {} variant conflicts", report.diagnostics.len());
            }
            Ok(_) => {}
            Err(e) => {
                println!("tick {t}: kept previous draw list ({e})");
                aborted += 1;
            }
        }

        now_ticks += REFRESH_INTERVAL_NS;
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    vitreous_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} ({TICK_COUNT} ticks, {aborted} aborted, {} commands in final draw list, cost estimate {:.1}µs)",
        compositor.draw_list().len(),
        compositor.pass_cost_estimate() / 1000.0,
    );
}
