// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time, durations, and the pass clock.
//!
//! [`HostTime`] is a point in time expressed as platform-native monotonic
//! ticks. [`Duration`] is a span in the same units. [`Timebase`] converts
//! ticks to nanoseconds (`nanoseconds = ticks * numer / denom`); all
//! conversions use `u128` intermediates to avoid overflow.
//!
//! Two different times flow through a compositor pass:
//!
//! - The *semantic* time passed to
//!   [`Compositor::tick`](crate::compositor::Compositor::tick), which drives
//!   transition progress.
//! - The *wall* time read from a [`Clock`] at phase boundaries, which only
//!   feeds performance metrics.

use core::cell::Cell;
use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Converts this host time to nanoseconds using the given timebase.
    #[inline]
    #[must_use]
    pub const fn to_nanos(self, timebase: Timebase) -> u64 {
        timebase.ticks_to_nanos(self.0)
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in platform-native ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Creates a duration from a nanosecond value and timebase.
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64, timebase: Timebase) -> Self {
        Self(timebase.nanos_to_ticks(nanos))
    }

    /// Creates a duration from milliseconds, assuming nanosecond ticks.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

/// A monotonic wall clock read at pass phase boundaries.
///
/// Backends implement this over their platform clock (`mach_absolute_time`,
/// `performance.now()`, ...). The compositor never sleeps or waits on it.
pub trait Clock {
    /// Returns the current host time.
    fn now(&self) -> HostTime;
}

/// A [`Clock`] that only moves when told to.
///
/// Useful for tests and for replaying recorded timings. Every read can
/// optionally advance the clock by a fixed step, which simulates per-phase
/// cost without a real timer.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
    step: u64,
}

impl ManualClock {
    /// Creates a clock fixed at `start`.
    #[must_use]
    pub const fn new(start: HostTime) -> Self {
        Self {
            now: Cell::new(start.0),
            step: 0,
        }
    }

    /// Creates a clock that advances by `step` after every read.
    #[must_use]
    pub const fn stepping(start: HostTime, step: Duration) -> Self {
        Self {
            now: Cell::new(start.0),
            step: step.0,
        }
    }

    /// Moves the clock to `t`.
    pub fn set(&self, t: HostTime) {
        self.now.set(t.0);
    }

    /// Moves the clock forward by `d`.
    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get().saturating_add(d.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> HostTime {
        let t = self.now.get();
        self.now.set(t.saturating_add(self.step));
        HostTime(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_conversion_macos_style() {
        // Typical ARM Mac: 125/3 (ticks run at 24 MHz)
        let tb = Timebase::new(125, 3);
        let ticks = 24_000_000_u64;
        assert_eq!(HostTime(ticks).to_nanos(tb), 1_000_000_000, "24 MHz → 1s");
        assert_eq!(Duration::from_nanos(1_000_000_000, tb).ticks(), ticks);
    }

    #[test]
    fn host_time_duration_ops() {
        let t = HostTime(1000);
        let d = Duration(200);
        assert_eq!((t + d).ticks(), 1200);
        assert_eq!(HostTime(1200) - t, d);
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(HostTime(400)), Duration(600));
        assert_eq!(HostTime(u64::MAX).checked_add(Duration(1)), None);
    }

    #[test]
    fn millis_assume_nanosecond_ticks() {
        assert_eq!(Duration::from_millis(16), Duration(16_000_000));
        assert_eq!(Duration(5).saturating_sub(Duration(9)), Duration::ZERO);
    }

    #[test]
    fn manual_clock_steps_after_each_read() {
        let clock = ManualClock::stepping(HostTime(100), Duration(10));
        assert_eq!(clock.now(), HostTime(100));
        assert_eq!(clock.now(), HostTime(110));
        clock.advance(Duration(1000));
        assert_eq!(clock.now(), HostTime(1120));
        clock.set(HostTime(5));
        assert_eq!(clock.now(), HostTime(5));
    }

    #[test]
    fn fixed_manual_clock_does_not_move() {
        let clock = ManualClock::new(HostTime(42));
        assert_eq!(clock.now(), HostTime(42));
        assert_eq!(clock.now(), HostTime(42));
    }
}
