// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proximity grouping of effect regions.
//!
//! Regions whose boundaries lie within a spacing threshold of each other,
//! directly or through a chain of neighbors, form one blend [`Group`]. Groups
//! are recomputed from scratch every tick.
//!
//! Grouping is scoped. Every region belongs either to an explicit container
//! scope ([`ContainerId`]) or to the implicit scope, and groups never span
//! two scopes. Each scope has one spacing threshold: the first spacing
//! override declared by one of its members, else the configured default.
//!
//! Explicit scopes must not overlap: if the union rectangles of two
//! containers' members share positive area, grouping fails with
//! [`ContainerOverlapError`]. The implicit scope is exempt.
//!
//! Pairwise adjacency is tested with a sort-and-sweep along x, so dense
//! rows of well-separated regions do not degrade to all-pairs testing.

mod distance;
mod union_find;

pub use distance::{boundary_gap, outline_gap, overlaps, rect_gap};

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::config::DistanceMetric;
use crate::error::ContainerOverlapError;
use crate::region::{ContainerId, EffectiveVariant, INVALID, RegionIdx, RegionRegistry, UnionKey};
use union_find::DisjointSet;

/// Identifies a group within one tick's [`Grouping`].
///
/// Ids are dense and ordered by each group's earliest-declared member. They
/// are not stable across ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u32);

impl GroupId {
    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

/// A set of regions that blend as one surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// This group's id.
    pub id: GroupId,
    /// The explicit container scope, or `None` for the implicit scope.
    pub scope: Option<ContainerId>,
    /// Members in declaration order. Never empty.
    pub members: Vec<RegionIdx>,
    /// Spacing threshold of the scope.
    pub spacing: f64,
    /// The single variant all members render with.
    ///
    /// Set to the earliest member's effective variant;
    /// [`resolve_variants`](crate::validate::resolve_variants) reports
    /// disagreeing members.
    pub variant: EffectiveVariant,
    /// `true` iff the group has more than one member.
    pub blend: bool,
}

/// The partition of one tick's regions into groups.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grouping {
    groups: Vec<Group>,
    membership: Vec<GroupId>,
}

impl Grouping {
    /// All groups, ordered by id.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups (and therefore no regions).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns a group by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a group of this grouping.
    #[must_use]
    pub fn group(&self, id: GroupId) -> &Group {
        assert!(
            id.slot() < self.groups.len(),
            "GroupId {} out of range (len {})",
            id.0,
            self.groups.len()
        );
        &self.groups[id.slot()]
    }

    /// Returns the group containing region `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not part of the grouped registry.
    #[must_use]
    pub fn group_of(&self, idx: RegionIdx) -> GroupId {
        assert!(
            idx.slot() < self.membership.len(),
            "RegionIdx {} out of range (len {})",
            idx.index(),
            self.membership.len()
        );
        self.membership[idx.slot()]
    }

    pub(crate) fn groups_mut(&mut self) -> &mut [Group] {
        &mut self.groups
    }
}

/// Per-scope accumulator.
#[derive(Debug, Default)]
struct Scope {
    members: Vec<u32>,
    spacing: Option<f64>,
    bounds: Option<Rect>,
}

/// Partitions a [`RegionRegistry`] into [`Group`]s.
///
/// Holds scratch buffers reused across ticks.
#[derive(Debug)]
pub struct ProximityGrouper {
    metric: DistanceMetric,
    default_spacing: f64,
    sets: DisjointSet,
    sweep: Vec<u32>,
}

impl ProximityGrouper {
    /// Creates a grouper measuring with `metric`, using `default_spacing` for
    /// scopes without an override.
    #[must_use]
    pub fn new(metric: DistanceMetric, default_spacing: f64) -> Self {
        Self {
            metric,
            default_spacing,
            sets: DisjointSet::default(),
            sweep: Vec::new(),
        }
    }

    /// Groups every region of `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerOverlapError`] for the first pair of explicit
    /// container scopes (in container id order) whose bounding volumes
    /// overlap.
    pub fn group(&mut self, registry: &RegionRegistry) -> Result<Grouping, ContainerOverlapError> {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the registry holds fewer than u32::MAX regions"
        )]
        let len = registry.len() as u32;

        let scopes = collect_scopes(registry);
        check_container_overlap(registry, &scopes)?;

        self.sets.reset(len);
        for scope in scopes.values() {
            self.union_keys(registry, scope);
            self.sweep_scope(registry, scope);
        }

        Ok(self.build(registry, &scopes, len))
    }

    /// Merges same-key regions of one scope.
    fn union_keys(&mut self, registry: &RegionRegistry, scope: &Scope) {
        let mut first_with_key: BTreeMap<UnionKey, u32> = BTreeMap::new();
        for &slot in &scope.members {
            if let Some(key) = registry.union_key(RegionIdx(slot)) {
                let first = *first_with_key.entry(key).or_insert(slot);
                self.sets.union(first, slot);
            }
        }
    }

    /// Merges adjacent regions of one scope.
    fn sweep_scope(&mut self, registry: &RegionRegistry, scope: &Scope) {
        let threshold = scope.spacing.unwrap_or(self.default_spacing);

        self.sweep.clear();
        self.sweep.extend_from_slice(&scope.members);
        self.sweep.sort_by(|&a, &b| {
            let xa = registry.bounds(RegionIdx(a)).x0;
            let xb = registry.bounds(RegionIdx(b)).x0;
            xa.total_cmp(&xb).then(a.cmp(&b))
        });

        for i in 0..self.sweep.len() {
            let a = RegionIdx(self.sweep[i]);
            let shape_a = registry.shape(a);
            for j in (i + 1)..self.sweep.len() {
                let b = RegionIdx(self.sweep[j]);
                let shape_b = registry.shape(b);
                // Every later candidate starts even further right.
                if shape_b.bounds.x0 - shape_a.bounds.x1 > threshold {
                    break;
                }
                if boundary_gap(self.metric, shape_a, shape_b) <= threshold {
                    self.sets.union(a.0, b.0);
                }
            }
        }
    }

    fn build(
        &mut self,
        registry: &RegionRegistry,
        scopes: &BTreeMap<Option<ContainerId>, Scope>,
        len: u32,
    ) -> Grouping {
        let mut group_of_root = alloc::vec![INVALID; len as usize];
        let mut groups: Vec<Group> = Vec::new();
        let mut membership = Vec::with_capacity(len as usize);

        for idx in registry.indices() {
            let root = self.sets.find(idx.0);
            let gid = match group_of_root[root as usize] {
                INVALID => {
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "at most one group per region"
                    )]
                    let gid = GroupId(groups.len() as u32);
                    let scope = registry.container(idx);
                    let spacing = scopes
                        .get(&scope)
                        .and_then(|s| s.spacing)
                        .unwrap_or(self.default_spacing);
                    groups.push(Group {
                        id: gid,
                        scope,
                        members: Vec::new(),
                        spacing,
                        variant: registry.effective_variant(idx),
                        blend: false,
                    });
                    group_of_root[root as usize] = gid.0;
                    gid
                }
                g => GroupId(g),
            };
            groups[gid.slot()].members.push(idx);
            membership.push(gid);
        }

        for group in &mut groups {
            group.blend = group.members.len() > 1;
        }

        Grouping { groups, membership }
    }
}

fn collect_scopes(registry: &RegionRegistry) -> BTreeMap<Option<ContainerId>, Scope> {
    let mut scopes: BTreeMap<Option<ContainerId>, Scope> = BTreeMap::new();
    for idx in registry.indices() {
        let scope = scopes.entry(registry.container(idx)).or_default();
        scope.members.push(idx.0);
        if scope.spacing.is_none() {
            scope.spacing = registry.spacing(idx);
        }
        let bounds = registry.bounds(idx);
        scope.bounds = Some(scope.bounds.map_or(bounds, |b| b.union(bounds)));
    }
    scopes
}

fn check_container_overlap(
    registry: &RegionRegistry,
    scopes: &BTreeMap<Option<ContainerId>, Scope>,
) -> Result<(), ContainerOverlapError> {
    let explicit: Vec<(ContainerId, &Scope)> = scopes
        .iter()
        .filter_map(|(id, scope)| id.map(|id| (id, scope)))
        .collect();

    for (i, &(first, a)) in explicit.iter().enumerate() {
        for &(second, b) in &explicit[i + 1..] {
            let (Some(ra), Some(rb)) = (a.bounds, b.bounds) else {
                continue;
            };
            if overlaps(ra, rb) {
                let mut slots: Vec<u32> = a.members.iter().chain(&b.members).copied().collect();
                slots.sort_unstable();
                let regions = slots
                    .into_iter()
                    .map(|s| registry.region_id(RegionIdx(s)))
                    .collect();
                return Err(ContainerOverlapError {
                    first,
                    second,
                    regions,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::region::{Namespace, RegionDeclaration, RegionId, ShapeDescriptor};

    fn at(id: u64, x0: f64, x1: f64) -> RegionDeclaration {
        RegionDeclaration::new(
            Namespace(0),
            RegionId(id),
            ShapeDescriptor::rect(Rect::new(x0, 0.0, x1, 20.0)),
        )
    }

    fn group(decls: &[RegionDeclaration], spacing: f64) -> Result<Grouping, ContainerOverlapError> {
        let mut registry = RegionRegistry::new();
        registry.load(decls).unwrap();
        ProximityGrouper::new(DistanceMetric::BoundingBox, spacing).group(&registry)
    }

    fn member_ids(grouping: &Grouping) -> Vec<Vec<u32>> {
        grouping
            .groups()
            .iter()
            .map(|g| g.members.iter().map(|m| m.index()).collect())
            .collect()
    }

    #[test]
    fn neighbors_within_spacing_merge() {
        let grouping = group(&[at(1, 0.0, 40.0), at(2, 50.0, 90.0)], 12.0).unwrap();
        assert_eq!(member_ids(&grouping), vec![vec![0, 1]]);
        assert!(grouping.groups()[0].blend);
    }

    #[test]
    fn threshold_is_inclusive() {
        let grouping = group(&[at(1, 0.0, 40.0), at(2, 52.0, 90.0)], 12.0).unwrap();
        assert_eq!(grouping.len(), 1);
        let grouping = group(&[at(1, 0.0, 40.0), at(2, 52.5, 90.0)], 12.0).unwrap();
        assert_eq!(grouping.len(), 2);
    }

    #[test]
    fn singleton_does_not_blend() {
        let grouping = group(&[at(1, 0.0, 40.0), at(2, 500.0, 540.0)], 12.0).unwrap();
        assert_eq!(grouping.len(), 2);
        assert!(grouping.groups().iter().all(|g| !g.blend));
    }

    #[test]
    fn chains_merge_transitively() {
        // 0-1 and 1-2 are adjacent; 0-2 are not.
        let grouping = group(
            &[at(1, 0.0, 40.0), at(2, 48.0, 88.0), at(3, 96.0, 136.0)],
            10.0,
        )
        .unwrap();
        assert_eq!(member_ids(&grouping), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn chain_found_regardless_of_declaration_order() {
        let grouping = group(
            &[at(3, 96.0, 136.0), at(1, 0.0, 40.0), at(2, 48.0, 88.0)],
            10.0,
        )
        .unwrap();
        assert_eq!(member_ids(&grouping), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn group_ids_follow_earliest_member() {
        let grouping = group(
            &[
                at(1, 500.0, 540.0),
                at(2, 0.0, 40.0),
                at(3, 545.0, 580.0),
                at(4, 45.0, 80.0),
            ],
            10.0,
        )
        .unwrap();
        assert_eq!(member_ids(&grouping), vec![vec![0, 2], vec![1, 3]]);
        assert_eq!(grouping.group_of(RegionIdx(3)), GroupId(1));
        assert_eq!(grouping.group(GroupId(0)).id, GroupId(0));
    }

    #[test]
    fn containers_do_not_group_across_scopes() {
        let grouping = group(
            &[
                at(1, 0.0, 40.0).in_container(ContainerId(1)),
                at(2, 45.0, 80.0),
            ],
            10.0,
        )
        .unwrap();
        assert_eq!(grouping.len(), 2);
        assert_eq!(grouping.groups()[0].scope, Some(ContainerId(1)));
        assert_eq!(grouping.groups()[1].scope, None);
    }

    #[test]
    fn scope_spacing_override_applies_to_whole_scope() {
        let decls = [
            at(1, 0.0, 40.0).in_container(ContainerId(1)),
            at(2, 70.0, 100.0)
                .in_container(ContainerId(1))
                .with_spacing(40.0),
            at(3, 200.0, 240.0),
            at(4, 270.0, 300.0),
        ];
        let grouping = group(&decls, 10.0).unwrap();
        assert_eq!(member_ids(&grouping), vec![vec![0, 1], vec![2], vec![3]]);
        assert_eq!(grouping.groups()[0].spacing, 40.0);
        assert_eq!(grouping.groups()[1].spacing, 10.0);
    }

    #[test]
    fn union_key_merges_distant_regions_in_scope() {
        let decls = [
            at(1, 0.0, 40.0).with_union_key(UnionKey(7)),
            at(2, 900.0, 940.0).with_union_key(UnionKey(7)),
            at(3, 1900.0, 1940.0)
                .with_union_key(UnionKey(7))
                .in_container(ContainerId(2)),
        ];
        let grouping = group(&decls, 10.0).unwrap();
        assert_eq!(member_ids(&grouping), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn overlapping_containers_fail() {
        let decls = [
            at(1, 0.0, 40.0).in_container(ContainerId(2)),
            at(2, 100.0, 140.0).in_container(ContainerId(1)),
            at(3, 30.0, 60.0).in_container(ContainerId(1)),
            at(4, 400.0, 440.0),
        ];
        let err = group(&decls, 10.0).unwrap_err();
        assert_eq!(err.first, ContainerId(1));
        assert_eq!(err.second, ContainerId(2));
        assert_eq!(err.regions, vec![RegionId(1), RegionId(2), RegionId(3)]);
    }

    #[test]
    fn touching_containers_are_fine() {
        let decls = [
            at(1, 0.0, 40.0).in_container(ContainerId(1)),
            at(2, 40.0, 80.0).in_container(ContainerId(2)),
        ];
        let grouping = group(&decls, 10.0).unwrap();
        assert_eq!(grouping.len(), 2);
    }

    #[test]
    fn implicit_scope_may_overlap_containers() {
        let decls = [
            at(1, 0.0, 40.0).in_container(ContainerId(1)),
            at(2, 10.0, 30.0),
        ];
        assert!(group(&decls, 10.0).is_ok());
    }

    #[test]
    fn outline_metric_separates_diagonal_capsules() {
        let mut registry = RegionRegistry::new();
        registry
            .load(&[
                RegionDeclaration::new(
                    Namespace(0),
                    RegionId(1),
                    ShapeDescriptor::capsule(Rect::new(0.0, 0.0, 20.0, 20.0)),
                ),
                RegionDeclaration::new(
                    Namespace(0),
                    RegionId(2),
                    ShapeDescriptor::capsule(Rect::new(24.0, 24.0, 44.0, 44.0)),
                ),
            ])
            .unwrap();
        // Box gap is sqrt(32) ≈ 5.7; circle gap is sqrt(24²·2) − 20 ≈ 13.9.
        let boxed = ProximityGrouper::new(DistanceMetric::BoundingBox, 8.0)
            .group(&registry)
            .unwrap();
        let outlined = ProximityGrouper::new(DistanceMetric::Outline, 8.0)
            .group(&registry)
            .unwrap();
        assert_eq!(boxed.len(), 1);
        assert_eq!(outlined.len(), 2);
    }

    #[test]
    fn empty_registry_groups_to_nothing() {
        let grouping = group(&[], 10.0).unwrap();
        assert!(grouping.is_empty());
    }

    #[test]
    fn grouper_is_reusable() {
        let mut registry = RegionRegistry::new();
        let mut grouper = ProximityGrouper::new(DistanceMetric::BoundingBox, 10.0);
        registry.load(&[at(1, 0.0, 40.0), at(2, 45.0, 80.0)]).unwrap();
        assert_eq!(grouper.group(&registry).unwrap().len(), 1);
        registry.load(&[at(1, 0.0, 40.0), at(2, 450.0, 480.0)]).unwrap();
        assert_eq!(grouper.group(&registry).unwrap().len(), 2);
    }
}
