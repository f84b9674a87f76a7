// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Events carrying slices or errors are stored in reduced form: a variant
//! mismatch keeps its loser count, an aborted pass keeps the error kind and
//! the number of offending regions, and draw-command batches keep only their
//! size.

use vitreous_core::error::TickError;
use vitreous_core::group::GroupId;
use vitreous_core::policy::AccessibilityPolicy;
use vitreous_core::region::{EffectiveVariant, IdentityKey, RegionId};
use vitreous_core::time::HostTime;
use vitreous_core::trace::{
    DrawCommandEvent, InputDiscardedEvent, PassBeginEvent, PassSummary, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, PlanSupersededEvent, PolicyChangedEvent, TraceSink,
};
use vitreous_core::transition::TransitionKind;
use vitreous_core::validate::VariantMismatch;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PASS_BEGIN: u8 = 1;
const TAG_INPUT_DISCARDED: u8 = 2;
const TAG_PHASE_BEGIN: u8 = 3;
const TAG_PHASE_END: u8 = 4;
const TAG_POLICY_CHANGED: u8 = 5;
const TAG_VARIANT_MISMATCH: u8 = 6;
const TAG_PLAN_SUPERSEDED: u8 = 7;
const TAG_PASS_ABORTED: u8 = 8;
const TAG_PASS_SUMMARY: u8 = 9;
const TAG_DRAW_COMMANDS_COUNT: u8 = 10;

/// Why a recorded pass was aborted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// [`TickError::ContainerOverlap`].
    ContainerOverlap,
    /// [`TickError::DuplicateIdentity`].
    DuplicateIdentity,
    /// [`TickError::InvalidGeometry`].
    InvalidGeometry,
}

impl From<&TickError> for AbortReason {
    fn from(e: &TickError) -> Self {
        match e {
            TickError::ContainerOverlap(_) => Self::ContainerOverlap,
            TickError::DuplicateIdentity(_) => Self::DuplicateIdentity,
            TickError::InvalidGeometry(_) => Self::InvalidGeometry,
        }
    }
}

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_len(&mut self, len: usize) {
        self.write_u32(u32::try_from(len).unwrap_or(u32::MAX));
    }

    fn write_key(&mut self, key: IdentityKey) {
        self.write_u32(key.namespace.0);
        self.write_u64(key.region.0);
    }

    fn write_policy(&mut self, p: AccessibilityPolicy) {
        self.write_u8(u8::from(p.reduce_transparency) | (u8::from(p.reduce_motion) << 1));
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Policy => 0,
            PhaseKind::Group => 1,
            PhaseKind::Validate => 2,
            PhaseKind::Diff => 3,
            PhaseKind::Plan => 4,
            PhaseKind::Emit => 5,
        });
    }

    fn write_variant(&mut self, v: EffectiveVariant) {
        self.write_u8(match v {
            EffectiveVariant::Standard => 0,
            EffectiveVariant::HighTransparency => 1,
            EffectiveVariant::Disabled => 2,
            EffectiveVariant::Opaque => 3,
        });
    }

    fn write_transition(&mut self, k: TransitionKind) {
        self.write_u8(match k {
            TransitionKind::Morph => 0,
            TransitionKind::Appear => 1,
            TransitionKind::Disappear => 2,
            TransitionKind::Instant => 3,
            TransitionKind::Materialize => 4,
            TransitionKind::Dematerialize => 5,
        });
    }

    fn write_abort_reason(&mut self, r: AbortReason) {
        self.write_u8(match r {
            AbortReason::ContainerOverlap => 0,
            AbortReason::DuplicateIdentity => 1,
            AbortReason::InvalidGeometry => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u64(e.pass_index);
        self.write_u64(e.now.ticks());
        self.write_u32(e.region_count);
        self.write_bool(e.fresh_input);
    }

    fn on_input_discarded(&mut self, e: &InputDiscardedEvent) {
        self.write_u8(TAG_INPUT_DISCARDED);
        self.write_u64(e.pass_index);
        self.write_u32(e.count);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.pass_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.pass_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_policy_changed(&mut self, e: &PolicyChangedEvent) {
        self.write_u8(TAG_POLICY_CHANGED);
        self.write_u64(e.pass_index);
        self.write_policy(e.previous);
        self.write_policy(e.current);
        self.write_u32(e.forced_opaque);
    }

    fn on_variant_mismatch(&mut self, pass_index: u64, mismatch: &VariantMismatch) {
        self.write_u8(TAG_VARIANT_MISMATCH);
        self.write_u64(pass_index);
        self.write_u32(mismatch.group.0);
        self.write_variant(mismatch.resolved);
        self.write_u64(mismatch.winner.0);
        self.write_len(mismatch.losers.len());
    }

    fn on_plan_superseded(&mut self, e: &PlanSupersededEvent) {
        self.write_u8(TAG_PLAN_SUPERSEDED);
        self.write_u64(e.pass_index);
        self.write_key(e.key);
        self.write_transition(e.previous);
        self.write_transition(e.replacement);
        self.write_f64(e.progress);
    }

    fn on_pass_aborted(&mut self, pass_index: u64, error: &TickError) {
        self.write_u8(TAG_PASS_ABORTED);
        self.write_u64(pass_index);
        self.write_abort_reason(error.into());
        self.write_len(error.offending_regions().len());
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_SUMMARY);
        self.write_u64(s.pass_index);
        self.write_u64(s.now.ticks());
        self.write_u32(s.region_count);
        self.write_u32(s.group_count);
        self.write_u32(s.mismatch_count);
        self.write_u32(s.superseded_count);
        self.write_u32(s.command_count);
        for phase in PhaseKind::ALL {
            self.write_u64(s.phase_ticks(phase));
        }
        self.write_u64(s.total_ticks);
        self.write_bool(s.over_budget);
    }

    fn on_draw_commands(&mut self, pass_index: u64, commands: &[DrawCommandEvent]) {
        self.write_u8(TAG_DRAW_COMMANDS_COUNT);
        self.write_u64(pass_index);
        self.write_len(commands.len());
        self.write_len(commands.iter().filter(|c| c.transition.is_exit()).count());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// An [`InputDiscardedEvent`].
    InputDiscarded(InputDiscardedEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`PolicyChangedEvent`].
    PolicyChanged(PolicyChangedEvent),
    /// A [`VariantMismatch`] without its loser list.
    VariantMismatch {
        /// Pass counter.
        pass_index: u64,
        /// The affected group.
        group: GroupId,
        /// The variant the group renders with.
        resolved: EffectiveVariant,
        /// The member whose variant won.
        winner: RegionId,
        /// Number of overridden members.
        losers: u32,
    },
    /// A [`PlanSupersededEvent`].
    PlanSuperseded(PlanSupersededEvent),
    /// An aborted pass.
    PassAborted {
        /// Pass counter.
        pass_index: u64,
        /// Kind of error.
        reason: AbortReason,
        /// Number of regions named by the error.
        offending: u32,
    },
    /// A [`PassSummary`].
    PassSummary(PassSummary),
    /// Draw-command batch size for a pass.
    DrawCommandsCount {
        /// Pass counter.
        pass_index: u64,
        /// Number of commands.
        count: u32,
        /// How many of them belong to departing regions.
        departing: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take::<1>()?[0])
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_bits(self.read_u64()?))
    }

    fn read_key(&mut self) -> Option<IdentityKey> {
        let namespace = self.read_u32()?;
        let region = self.read_u64()?;
        Some(IdentityKey::new(namespace, region))
    }

    fn read_policy(&mut self) -> Option<AccessibilityPolicy> {
        let bits = self.read_u8()?;
        Some(AccessibilityPolicy {
            reduce_transparency: bits & 1 != 0,
            reduce_motion: bits & 2 != 0,
        })
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Policy,
            1 => PhaseKind::Group,
            2 => PhaseKind::Validate,
            3 => PhaseKind::Diff,
            4 => PhaseKind::Plan,
            _ => PhaseKind::Emit,
        })
    }

    fn read_variant(&mut self) -> Option<EffectiveVariant> {
        Some(match self.read_u8()? {
            0 => EffectiveVariant::Standard,
            1 => EffectiveVariant::HighTransparency,
            2 => EffectiveVariant::Disabled,
            _ => EffectiveVariant::Opaque,
        })
    }

    fn read_transition(&mut self) -> Option<TransitionKind> {
        Some(match self.read_u8()? {
            0 => TransitionKind::Morph,
            1 => TransitionKind::Appear,
            2 => TransitionKind::Disappear,
            3 => TransitionKind::Instant,
            4 => TransitionKind::Materialize,
            _ => TransitionKind::Dematerialize,
        })
    }

    fn read_abort_reason(&mut self) -> Option<AbortReason> {
        Some(match self.read_u8()? {
            0 => AbortReason::ContainerOverlap,
            1 => AbortReason::DuplicateIdentity,
            _ => AbortReason::InvalidGeometry,
        })
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            region_count: self.read_u32()?,
            fresh_input: self.read_bool()?,
        }))
    }

    fn decode_input_discarded(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::InputDiscarded(InputDiscardedEvent {
            pass_index: self.read_u64()?,
            count: self.read_u32()?,
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            pass_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            pass_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_policy_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PolicyChanged(PolicyChangedEvent {
            pass_index: self.read_u64()?,
            previous: self.read_policy()?,
            current: self.read_policy()?,
            forced_opaque: self.read_u32()?,
        }))
    }

    fn decode_variant_mismatch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::VariantMismatch {
            pass_index: self.read_u64()?,
            group: GroupId(self.read_u32()?),
            resolved: self.read_variant()?,
            winner: RegionId(self.read_u64()?),
            losers: self.read_u32()?,
        })
    }

    fn decode_plan_superseded(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PlanSuperseded(PlanSupersededEvent {
            pass_index: self.read_u64()?,
            key: self.read_key()?,
            previous: self.read_transition()?,
            replacement: self.read_transition()?,
            progress: self.read_f64()?,
        }))
    }

    fn decode_pass_aborted(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassAborted {
            pass_index: self.read_u64()?,
            reason: self.read_abort_reason()?,
            offending: self.read_u32()?,
        })
    }

    fn decode_pass_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSummary(PassSummary {
            pass_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            region_count: self.read_u32()?,
            group_count: self.read_u32()?,
            mismatch_count: self.read_u32()?,
            superseded_count: self.read_u32()?,
            command_count: self.read_u32()?,
            policy_ticks: self.read_u64()?,
            group_ticks: self.read_u64()?,
            validate_ticks: self.read_u64()?,
            diff_ticks: self.read_u64()?,
            plan_ticks: self.read_u64()?,
            emit_ticks: self.read_u64()?,
            total_ticks: self.read_u64()?,
            over_budget: self.read_bool()?,
        }))
    }

    fn decode_draw_commands_count(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::DrawCommandsCount {
            pass_index: self.read_u64()?,
            count: self.read_u32()?,
            departing: self.read_u32()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_INPUT_DISCARDED => self.decode_input_discarded(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_POLICY_CHANGED => self.decode_policy_changed(),
            TAG_VARIANT_MISMATCH => self.decode_variant_mismatch(),
            TAG_PLAN_SUPERSEDED => self.decode_plan_superseded(),
            TAG_PASS_ABORTED => self.decode_pass_aborted(),
            TAG_PASS_SUMMARY => self.decode_pass_summary(),
            TAG_DRAW_COMMANDS_COUNT => self.decode_draw_commands_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use vitreous_core::error::ContainerOverlapError;
    use vitreous_core::region::ContainerId;

    use super::*;

    fn sample_summary() -> PassSummary {
        PassSummary {
            pass_index: 7,
            now: HostTime(1_000_000),
            region_count: 12,
            group_count: 4,
            mismatch_count: 1,
            superseded_count: 2,
            command_count: 13,
            policy_ticks: 10,
            group_ticks: 40,
            validate_ticks: 5,
            diff_ticks: 8,
            plan_ticks: 30,
            emit_ticks: 12,
            total_ticks: 110,
            over_budget: false,
        }
    }

    #[test]
    fn pass_summary_survives_recording() {
        let mut rec = RecorderSink::new();
        rec.on_pass_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::PassSummary(s) => assert_eq!(*s, sample_summary()),
            other => panic!("expected PassSummary, got {other:?}"),
        }
    }

    #[test]
    fn phase_pair_keeps_order_and_timestamps() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            pass_index: 5,
            phase: PhaseKind::Diff,
            timestamp: HostTime(2000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            pass_index: 5,
            phase: PhaseKind::Diff,
            timestamp: HostTime(3000),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (RecordedEvent::PhaseBegin(b), RecordedEvent::PhaseEnd(e)) => {
                assert_eq!(b.phase, PhaseKind::Diff);
                assert_eq!(e.phase, PhaseKind::Diff);
                assert_eq!(e.timestamp.ticks() - b.timestamp.ticks(), 1000);
            }
            other => panic!("expected phase pair, got {other:?}"),
        }
    }

    #[test]
    fn policy_bits_are_preserved() {
        let mut rec = RecorderSink::new();
        rec.on_policy_changed(&PolicyChangedEvent {
            pass_index: 3,
            previous: AccessibilityPolicy::default(),
            current: AccessibilityPolicy {
                reduce_transparency: false,
                reduce_motion: true,
            },
            forced_opaque: 0,
        });

        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::PolicyChanged(e)) => {
                assert!(!e.previous.reduce_motion);
                assert!(e.current.reduce_motion);
                assert!(!e.current.reduce_transparency);
            }
            other => panic!("expected PolicyChanged, got {other:?}"),
        }
    }

    #[test]
    fn superseded_progress_is_bit_exact() {
        let mut rec = RecorderSink::new();
        rec.on_plan_superseded(&PlanSupersededEvent {
            pass_index: 9,
            key: IdentityKey::new(2, 40),
            previous: TransitionKind::Appear,
            replacement: TransitionKind::Morph,
            progress: 0.1 + 0.2,
        });

        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::PlanSuperseded(e)) => {
                assert_eq!(e.key, IdentityKey::new(2, 40));
                assert_eq!(e.previous, TransitionKind::Appear);
                assert_eq!(e.replacement, TransitionKind::Morph);
                assert_eq!(e.progress.to_bits(), (0.1_f64 + 0.2).to_bits());
            }
            other => panic!("expected PlanSuperseded, got {other:?}"),
        }
    }

    #[test]
    fn mismatch_and_abort_are_reduced() {
        let mut rec = RecorderSink::new();
        rec.on_variant_mismatch(
            1,
            &VariantMismatch {
                group: GroupId(2),
                resolved: EffectiveVariant::Standard,
                winner: RegionId(10),
                losers: vec![RegionId(11), RegionId(13)],
            },
        );
        rec.on_pass_aborted(
            2,
            &TickError::ContainerOverlap(ContainerOverlapError {
                first: ContainerId(1),
                second: ContainerId(2),
                regions: vec![RegionId(1), RegionId(2), RegionId(3)],
            }),
        );

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert!(matches!(
            events[0],
            RecordedEvent::VariantMismatch {
                pass_index: 1,
                group: GroupId(2),
                winner: RegionId(10),
                losers: 2,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            RecordedEvent::PassAborted {
                pass_index: 2,
                reason: AbortReason::ContainerOverlap,
                offending: 3,
            }
        ));
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_input_discarded(&InputDiscardedEvent {
            pass_index: 1,
            count: 2,
        });
        rec.on_pass_summary(&sample_summary());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            RecordedEvent::InputDiscarded(InputDiscardedEvent { count: 2, .. })
        ));
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }
}
