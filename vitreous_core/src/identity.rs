// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity tracking across ticks.
//!
//! The [`IdentityTracker`] owns the snapshot: the last successfully rendered
//! state of every [`IdentityKey`]. Each tick the current registry is diffed
//! against it:
//!
//! | Previous snapshot    | Current tick | Classification |
//! |----------------------|--------------|----------------|
//! | absent               | declared     | appearing      |
//! | live or departing    | declared     | persisting     |
//! | live                 | absent       | disappearing   |
//! | departing            | absent       | dropped        |
//!
//! A disappearing key stays in the snapshot, marked departing, for exactly one
//! more tick so its exit transition has a source state. Diffing never mutates
//! the snapshot; [`IdentityTracker::commit`] applies a diff once the whole
//! pass has succeeded.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::RoundedRect;

use crate::group::Grouping;
use crate::region::{EffectiveVariant, IdentityKey, RegionRegistry, Tint, TransitionStyle};

/// The retained state of one identity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedRegion {
    /// Declared geometry (not the interpolated one).
    pub geometry: RoundedRect,
    /// Variant the region's group rendered with.
    pub variant: EffectiveVariant,
    /// Stacking order.
    pub z_order: i32,
    /// Tint.
    pub tint: Option<Tint>,
    /// Transition style, which also governs the exit transition.
    pub transition: TransitionStyle,
    /// `true` if the key was absent from the last committed tick.
    pub departing: bool,
}

/// Classification of one tick's keys against the snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IdentityDiff {
    /// New keys, in declaration order.
    pub appearing: Vec<IdentityKey>,
    /// Keys present in both ticks, in declaration order.
    pub persisting: Vec<IdentityKey>,
    /// Keys that were live and are now absent, in key order.
    pub disappearing: Vec<IdentityKey>,
    /// Departing keys that are still absent, in key order. They leave the
    /// snapshot on commit.
    pub dropped: Vec<IdentityKey>,
    next: BTreeMap<IdentityKey, TrackedRegion>,
}

impl IdentityDiff {
    /// The snapshot that [`IdentityTracker::commit`] will install.
    #[must_use]
    pub fn next_snapshot(&self) -> &BTreeMap<IdentityKey, TrackedRegion> {
        &self.next
    }

    /// Whether nothing appeared, disappeared, or was dropped.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.appearing.is_empty() && self.disappearing.is_empty() && self.dropped.is_empty()
    }
}

/// Matches regions across ticks by [`IdentityKey`].
#[derive(Clone, Debug, Default)]
pub struct IdentityTracker {
    snapshot: BTreeMap<IdentityKey, TrackedRegion>,
}

impl IdentityTracker {
    /// Creates a tracker with an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshot entry for `key`.
    #[must_use]
    pub fn get(&self, key: IdentityKey) -> Option<&TrackedRegion> {
        self.snapshot.get(&key)
    }

    /// Number of tracked keys, departing ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Iterates over the snapshot in key order.
    pub fn iter(&self) -> impl Iterator<Item = (IdentityKey, &TrackedRegion)> {
        self.snapshot.iter().map(|(k, v)| (*k, v))
    }

    /// Classifies the keys of `registry` against the snapshot.
    ///
    /// `grouping` supplies the resolved variant of each region.
    #[must_use]
    pub fn diff(&self, registry: &RegionRegistry, grouping: &Grouping) -> IdentityDiff {
        let mut diff = IdentityDiff::default();

        for idx in registry.indices() {
            let key = registry.key(idx);
            if self.snapshot.contains_key(&key) {
                diff.persisting.push(key);
            } else {
                diff.appearing.push(key);
            }
            let variant = grouping.group(grouping.group_of(idx)).variant;
            diff.next.insert(
                key,
                TrackedRegion {
                    geometry: registry.shape(idx).rounded_rect(),
                    variant,
                    z_order: registry.z_order(idx),
                    tint: registry.tint(idx),
                    transition: registry.transition(idx),
                    departing: false,
                },
            );
        }

        for (key, tracked) in &self.snapshot {
            if registry.find(*key).is_some() {
                continue;
            }
            if tracked.departing {
                diff.dropped.push(*key);
            } else {
                diff.disappearing.push(*key);
                diff.next.insert(
                    *key,
                    TrackedRegion {
                        departing: true,
                        ..*tracked
                    },
                );
            }
        }

        diff
    }

    /// Installs the snapshot computed by [`diff`](Self::diff).
    pub fn commit(&mut self, diff: IdentityDiff) {
        self.snapshot = diff.next;
    }
}
