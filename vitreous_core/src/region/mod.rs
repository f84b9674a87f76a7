// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effect region data model.
//!
//! An *effect region* is a translucent surface floating above host content.
//! Each region has:
//!
//! - An identity ([`IdentityKey`]): a caller-assigned [`RegionId`] inside a
//!   [`Namespace`]. The key is what correlates a region across ticks.
//! - A [`ShapeDescriptor`]: bounding rectangle plus corner treatment.
//! - **Declared properties**: [`EffectVariant`], optional [`Tint`], the
//!   interactive flag, an optional explicit [`ContainerId`], spacing override,
//!   z-order, [`UnionKey`], and [`TransitionStyle`].
//! - **Computed properties** written during a pass: the
//!   [`EffectiveVariant`] after accessibility policy.
//!
//! Regions are declared fresh every tick as [`RegionDeclaration`]s and loaded
//! into a [`RegionRegistry`], which stores them in struct-of-arrays layout
//! with [`RegionIdx`] handles.

mod declaration;
mod id;
mod registry;
mod shape;

pub use declaration::{EffectVariant, EffectiveVariant, RegionDeclaration, TransitionStyle};
pub use id::{ContainerId, INVALID, IdentityKey, Namespace, RegionId, RegionIdx, UnionKey};
pub use registry::RegionRegistry;
pub use shape::{CornerTreatment, ShapeDescriptor, Tint};

pub(crate) use shape::half_min_side;
