// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use vitreous_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Events without a timestamp of their own are placed at the tick time of
/// the pass they belong to.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut pass_ts = 0.0;

    let instant = |name: &str, cat: &str, ts: f64, args: Value| {
        json!({
            "ph": "i",
            "name": name,
            "cat": cat,
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": args,
        })
    };

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PassBegin(e) => {
                pass_ts = ticks_to_us(e.now.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "PassBegin",
                    "cat": "Compositor",
                    "ts": pass_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "pass_index": e.pass_index,
                        "region_count": e.region_count,
                        "fresh_input": e.fresh_input,
                    }
                }));
            }
            RecordedEvent::InputDiscarded(e) => {
                events.push(instant(
                    "InputDiscarded",
                    "Compositor",
                    pass_ts,
                    json!({
                        "pass_index": e.pass_index,
                        "count": e.count,
                    }),
                ));
            }
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": e.phase.name(),
                    "cat": "Pass",
                    "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": e.phase.name(),
                    "cat": "Pass",
                    "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                    }
                }));
            }
            RecordedEvent::PolicyChanged(e) => {
                events.push(instant(
                    "PolicyChanged",
                    "Policy",
                    pass_ts,
                    json!({
                        "pass_index": e.pass_index,
                        "reduce_transparency": e.current.reduce_transparency,
                        "reduce_motion": e.current.reduce_motion,
                        "forced_opaque": e.forced_opaque,
                    }),
                ));
            }
            RecordedEvent::VariantMismatch {
                pass_index,
                group,
                resolved,
                winner,
                losers,
            } => {
                events.push(instant(
                    "VariantMismatch",
                    "Diagnostics",
                    pass_ts,
                    json!({
                        "pass_index": pass_index,
                        "group": group.0,
                        "resolved": format!("{resolved:?}"),
                        "winner": winner.0,
                        "losers": losers,
                    }),
                ));
            }
            RecordedEvent::PlanSuperseded(e) => {
                events.push(instant(
                    "PlanSuperseded",
                    "Transition",
                    pass_ts,
                    json!({
                        "pass_index": e.pass_index,
                        "key": format!("{}:{}", e.key.namespace.0, e.key.region.0),
                        "previous": format!("{:?}", e.previous),
                        "replacement": format!("{:?}", e.replacement),
                        "progress": e.progress,
                    }),
                ));
            }
            RecordedEvent::PassAborted {
                pass_index,
                reason,
                offending,
            } => {
                events.push(instant(
                    "PassAborted",
                    "Diagnostics",
                    pass_ts,
                    json!({
                        "pass_index": pass_index,
                        "reason": format!("{reason:?}"),
                        "offending": offending,
                    }),
                ));
            }
            RecordedEvent::PassSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "PassSummary",
                    "cat": "Summary",
                    "ts": ticks_to_us(s.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "pass_index": s.pass_index,
                        "region_count": s.region_count,
                        "group_count": s.group_count,
                        "mismatch_count": s.mismatch_count,
                        "superseded_count": s.superseded_count,
                        "command_count": s.command_count,
                        "policy_us": ticks_to_us(s.policy_ticks, timebase),
                        "group_us": ticks_to_us(s.group_ticks, timebase),
                        "validate_us": ticks_to_us(s.validate_ticks, timebase),
                        "diff_us": ticks_to_us(s.diff_ticks, timebase),
                        "plan_us": ticks_to_us(s.plan_ticks, timebase),
                        "emit_us": ticks_to_us(s.emit_ticks, timebase),
                        "total_us": ticks_to_us(s.total_ticks, timebase),
                        "over_budget": s.over_budget,
                    }
                }));
            }
            RecordedEvent::DrawCommandsCount {
                count,
                departing,
                ..
            } => {
                events.push(json!({
                    "ph": "C",
                    "name": "DrawCommands",
                    "cat": "Rich",
                    "ts": pass_ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "live": count.saturating_sub(departing),
                        "departing": departing,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use vitreous_core::time::HostTime;
    use vitreous_core::trace::{
        InputDiscardedEvent, PassBeginEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass_index: 0,
            now: HostTime(1_000_000),
            region_count: 2,
            fresh_input: true,
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            pass_index: 0,
            phase: PhaseKind::Group,
            timestamp: HostTime(1_000_000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            pass_index: 0,
            phase: PhaseKind::Group,
            timestamp: HostTime(1_000_100),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "PassBegin");
        assert_eq!(parsed[0]["args"]["region_count"], 2);

        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "group");

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["name"], "group");
        assert_eq!(parsed[2]["ts"], 1000.1);
    }

    #[test]
    fn untimed_events_use_the_pass_time() {
        let mut rec = RecorderSink::new();
        rec.on_pass_begin(&PassBeginEvent {
            pass_index: 4,
            now: HostTime(2_000_000),
            region_count: 0,
            fresh_input: false,
        });
        rec.on_input_discarded(&InputDiscardedEvent {
            pass_index: 4,
            count: 1,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[1]["name"], "InputDiscarded");
        assert_eq!(parsed[1]["ts"], 2000.0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
