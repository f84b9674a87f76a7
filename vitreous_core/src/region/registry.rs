// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays storage for the current tick's regions.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Rect;

use super::declaration::{EffectVariant, EffectiveVariant, RegionDeclaration, TransitionStyle};
use super::id::{ContainerId, INVALID, IdentityKey, RegionId, RegionIdx, UnionKey};
use super::shape::{ShapeDescriptor, Tint};
use crate::error::TickError;

/// Struct-of-arrays storage for one tick's effect regions.
///
/// The registry is refilled from scratch by [`load`](Self::load) every tick.
/// Declared properties are copied out of the declarations; the computed
/// `effective_variant` column is written by the
/// [`PolicyEngine`](crate::policy::PolicyEngine).
///
/// Regions are addressed by [`RegionIdx`] handles whose index equals the
/// declaration position.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    // -- Declared properties --
    pub(crate) key: Vec<IdentityKey>,
    pub(crate) shape: Vec<ShapeDescriptor>,
    pub(crate) variant: Vec<EffectVariant>,
    pub(crate) tint: Vec<Option<Tint>>,
    pub(crate) interactive: Vec<bool>,
    pub(crate) container: Vec<Option<ContainerId>>,
    pub(crate) spacing: Vec<Option<f64>>,
    pub(crate) z_order: Vec<i32>,
    pub(crate) union_key: Vec<Option<UnionKey>>,
    pub(crate) transition: Vec<TransitionStyle>,

    // -- Computed properties (written by policy) --
    pub(crate) effective_variant: Vec<EffectiveVariant>,

    // -- Lookup --
    by_key: BTreeMap<IdentityKey, u32>,
}

impl RegionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all regions, keeping allocations.
    pub fn clear(&mut self) {
        self.key.clear();
        self.shape.clear();
        self.variant.clear();
        self.tint.clear();
        self.interactive.clear();
        self.container.clear();
        self.spacing.clear();
        self.z_order.clear();
        self.union_key.clear();
        self.transition.clear();
        self.effective_variant.clear();
        self.by_key.clear();
    }

    /// Replaces the registry contents with `declarations`, in order.
    ///
    /// Effective variants start out equal to the declared variants.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::InvalidGeometry`] for non-finite or inverted
    /// bounds, negative radii, or a negative/non-finite spacing override,
    /// and [`TickError::DuplicateIdentity`] when two declarations share an
    /// identity key. The registry is left empty on error.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` regions are declared.
    pub fn load(&mut self, declarations: &[RegionDeclaration]) -> Result<(), TickError> {
        self.clear();
        assert!(
            declarations.len() < INVALID as usize,
            "too many regions declared: {}",
            declarations.len()
        );

        for (slot, decl) in (0_u32..).zip(declarations) {
            let key = decl.key();
            let spacing_ok = decl.spacing.is_none_or(|s| s.is_finite() && s >= 0.0);
            if !decl.shape.is_valid() || !spacing_ok {
                self.clear();
                return Err(TickError::InvalidGeometry(key));
            }
            if self.by_key.insert(key, slot).is_some() {
                self.clear();
                return Err(TickError::DuplicateIdentity(key));
            }
            self.key.push(key);
            self.shape.push(decl.shape);
            self.variant.push(decl.variant);
            self.tint.push(decl.tint);
            self.interactive.push(decl.interactive);
            self.container.push(decl.container);
            self.spacing.push(decl.spacing);
            self.z_order.push(decl.z_order);
            self.union_key.push(decl.union_key);
            self.transition.push(decl.transition);
            self.effective_variant.push(decl.variant.into());
        }
        Ok(())
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// Whether the registry holds no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Iterates over region handles in declaration order.
    pub fn indices(&self) -> impl Iterator<Item = RegionIdx> + use<> {
        let len = self.key.len();
        (0_u32..).take(len).map(RegionIdx)
    }

    /// Finds the region declared with `key`.
    #[must_use]
    pub fn find(&self, key: IdentityKey) -> Option<RegionIdx> {
        self.by_key.get(&key).copied().map(RegionIdx)
    }

    // -- Property getters --

    /// Returns the identity key of a region.
    #[must_use]
    pub fn key(&self, idx: RegionIdx) -> IdentityKey {
        self.validate(idx);
        self.key[idx.slot()]
    }

    /// Returns the region id of a region.
    #[must_use]
    pub fn region_id(&self, idx: RegionIdx) -> RegionId {
        self.key(idx).region
    }

    /// Returns the shape of a region.
    #[must_use]
    pub fn shape(&self, idx: RegionIdx) -> &ShapeDescriptor {
        self.validate(idx);
        &self.shape[idx.slot()]
    }

    /// Returns the bounding rectangle of a region.
    #[must_use]
    pub fn bounds(&self, idx: RegionIdx) -> Rect {
        self.shape(idx).bounds
    }

    /// Returns the declared variant of a region.
    #[must_use]
    pub fn variant(&self, idx: RegionIdx) -> EffectVariant {
        self.validate(idx);
        self.variant[idx.slot()]
    }

    /// Returns the variant after accessibility policy.
    #[must_use]
    pub fn effective_variant(&self, idx: RegionIdx) -> EffectiveVariant {
        self.validate(idx);
        self.effective_variant[idx.slot()]
    }

    /// Returns the tint of a region.
    #[must_use]
    pub fn tint(&self, idx: RegionIdx) -> Option<Tint> {
        self.validate(idx);
        self.tint[idx.slot()]
    }

    /// Returns whether a region is interactive.
    #[must_use]
    pub fn interactive(&self, idx: RegionIdx) -> bool {
        self.validate(idx);
        self.interactive[idx.slot()]
    }

    /// Returns the explicit container of a region.
    #[must_use]
    pub fn container(&self, idx: RegionIdx) -> Option<ContainerId> {
        self.validate(idx);
        self.container[idx.slot()]
    }

    /// Returns the spacing override declared by a region.
    #[must_use]
    pub fn spacing(&self, idx: RegionIdx) -> Option<f64> {
        self.validate(idx);
        self.spacing[idx.slot()]
    }

    /// Returns the z-order of a region.
    #[must_use]
    pub fn z_order(&self, idx: RegionIdx) -> i32 {
        self.validate(idx);
        self.z_order[idx.slot()]
    }

    /// Returns the union key of a region.
    #[must_use]
    pub fn union_key(&self, idx: RegionIdx) -> Option<UnionKey> {
        self.validate(idx);
        self.union_key[idx.slot()]
    }

    /// Returns the transition style of a region.
    #[must_use]
    pub fn transition(&self, idx: RegionIdx) -> TransitionStyle {
        self.validate(idx);
        self.transition[idx.slot()]
    }

    // -- Internal helpers --

    pub(crate) fn set_effective_variant(&mut self, idx: RegionIdx, variant: EffectiveVariant) {
        self.validate(idx);
        self.effective_variant[idx.slot()] = variant;
    }

    /// Panics if the handle does not refer to a loaded region.
    fn validate(&self, idx: RegionIdx) {
        assert!(
            idx.slot() < self.key.len(),
            "RegionIdx {} out of range (len {})",
            idx.0,
            self.key.len()
        );
    }
}
