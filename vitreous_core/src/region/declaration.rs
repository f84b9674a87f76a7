// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick region declarations and effect variants.

use super::id::{ContainerId, IdentityKey, Namespace, RegionId, UnionKey};
use super::shape::{ShapeDescriptor, Tint};

/// The effect style a caller declares for a region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EffectVariant {
    /// The regular translucent material.
    #[default]
    Standard,
    /// A more transparent material for media-rich backgrounds.
    HighTransparency,
    /// No effect; the region keeps its shape but draws no material.
    Disabled,
}

/// The variant a region actually renders with after accessibility policy.
///
/// Superset of [`EffectVariant`]: [`Opaque`](Self::Opaque) only appears
/// when reduce-transparency is in effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectiveVariant {
    /// See [`EffectVariant::Standard`].
    Standard,
    /// See [`EffectVariant::HighTransparency`].
    HighTransparency,
    /// See [`EffectVariant::Disabled`].
    Disabled,
    /// Opaque-equivalent rendering with blending suppressed.
    Opaque,
}

impl EffectiveVariant {
    /// Whether the rasterizer blends this variant with its backdrop and with
    /// group siblings.
    #[must_use]
    pub const fn is_translucent(self) -> bool {
        matches!(self, Self::Standard | Self::HighTransparency)
    }
}

impl From<EffectVariant> for EffectiveVariant {
    fn from(variant: EffectVariant) -> Self {
        match variant {
            EffectVariant::Standard => Self::Standard,
            EffectVariant::HighTransparency => Self::HighTransparency,
            EffectVariant::Disabled => Self::Disabled,
        }
    }
}

/// Per-region choice of how state changes are animated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionStyle {
    /// Interpolate position, size, and corners (matched-geometry morph).
    #[default]
    Morph,
    /// Jump straight to the new state.
    Instant,
    /// Fade in and out in place instead of morphing geometry.
    Materialize,
}

/// One effect region as declared by the caller for a single tick.
///
/// Declarations are plain data; build them fresh every tick. Field defaults
/// from [`new`](Self::new): standard variant, no tint, not interactive, the
/// implicit container scope, no spacing override, z-order 0, no union key,
/// and [`TransitionStyle::Morph`].
#[derive(Clone, Debug, PartialEq)]
pub struct RegionDeclaration {
    /// Region id, unique within `namespace`.
    pub id: RegionId,
    /// Namespace of `id`.
    pub namespace: Namespace,
    /// Geometry and corner treatment.
    pub shape: ShapeDescriptor,
    /// Declared effect variant.
    pub variant: EffectVariant,
    /// Optional tint color.
    pub tint: Option<Tint>,
    /// Whether the region reacts to input (passed through to the rasterizer).
    pub interactive: bool,
    /// Explicit container scope, or `None` for the implicit scope.
    pub container: Option<ContainerId>,
    /// Spacing threshold override for this region's scope.
    pub spacing: Option<f64>,
    /// Stacking order; higher draws later (nearer).
    pub z_order: i32,
    /// Forces grouping with same-key regions in the same scope.
    pub union_key: Option<UnionKey>,
    /// How changes to this region are animated.
    pub transition: TransitionStyle,
}

impl RegionDeclaration {
    /// Creates a declaration with default attributes.
    #[must_use]
    pub fn new(namespace: Namespace, id: RegionId, shape: ShapeDescriptor) -> Self {
        Self {
            id,
            namespace,
            shape,
            variant: EffectVariant::default(),
            tint: None,
            interactive: false,
            container: None,
            spacing: None,
            z_order: 0,
            union_key: None,
            transition: TransitionStyle::default(),
        }
    }

    /// The identity key of this declaration.
    #[must_use]
    pub const fn key(&self) -> IdentityKey {
        IdentityKey {
            namespace: self.namespace,
            region: self.id,
        }
    }

    /// Sets the effect variant.
    #[must_use]
    pub fn with_variant(mut self, variant: EffectVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the tint.
    #[must_use]
    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Marks the region as interactive.
    #[must_use]
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Places the region in an explicit container scope.
    #[must_use]
    pub fn in_container(mut self, container: ContainerId) -> Self {
        self.container = Some(container);
        self
    }

    /// Overrides the spacing threshold of the region's scope.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    /// Sets the z-order.
    #[must_use]
    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    /// Sets the union key.
    #[must_use]
    pub fn with_union_key(mut self, key: UnionKey) -> Self {
        self.union_key = Some(key);
        self
    }

    /// Sets the transition style.
    #[must_use]
    pub fn with_transition(mut self, transition: TransitionStyle) -> Self {
        self.transition = transition;
        self
    }
}
