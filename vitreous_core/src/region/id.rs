// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region, identity, and scope identifiers.

use core::fmt;

/// Sentinel value indicating "no region" in index fields.
pub const INVALID: u32 = u32::MAX;

/// Caller-assigned identifier of an effect region.
///
/// Only unique within a [`Namespace`]; see [`IdentityKey`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RegionId(pub u64);

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({})", self.0)
    }
}

/// A namespace partitioning region identifiers.
///
/// Independent view hierarchies (a toolbar, a sheet, a floating palette)
/// typically use separate namespaces so their ids cannot collide.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Namespace(pub u32);

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", self.0)
    }
}

/// The stable key correlating a region across ticks.
///
/// Two declarations in consecutive ticks with the same key are the same
/// region; that is what lets the compositor morph it instead of replacing
/// it. Ordering is namespace-major.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IdentityKey {
    /// The namespace the id lives in.
    pub namespace: Namespace,
    /// The region id within the namespace.
    pub region: RegionId,
}

impl IdentityKey {
    /// Creates a key from raw namespace and region values.
    #[inline]
    #[must_use]
    pub const fn new(namespace: u32, region: u64) -> Self {
        Self {
            namespace: Namespace(namespace),
            region: RegionId(region),
        }
    }
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityKey({}:{})", self.namespace.0, self.region.0)
    }
}

/// Identifies an explicit container scope.
///
/// Regions sharing a container are grouped only with each other, using the
/// container's spacing threshold.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(pub u32);

impl fmt::Debug for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerId({})", self.0)
    }
}

/// Forces regions into one group regardless of their separation.
///
/// Union keys are scoped: only regions in the same container scope that
/// carry the same key are merged.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnionKey(pub u32);

impl fmt::Debug for UnionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnionKey({})", self.0)
    }
}

/// A handle to a region slot in a [`RegionRegistry`](super::RegionRegistry).
///
/// Slots are assigned in declaration order and are only meaningful for the
/// tick whose declarations were loaded. Declaration order is significant:
/// it breaks variant ties and orders equal-z draw commands.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionIdx(pub(crate) u32);

impl RegionIdx {
    /// Returns the raw slot index, which equals the declaration position.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RegionIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionIdx({})", self.0)
    }
}
