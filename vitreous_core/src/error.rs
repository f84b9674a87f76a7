// Copyright 2026 the Vitreous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors that abort a compositor pass.
//!
//! Every error here is detected before the pass mutates any retained state,
//! so the previously emitted draw list stays authoritative. Non-fatal
//! anomalies are not errors: variant conflicts are reported as
//! [`VariantMismatch`](crate::validate::VariantMismatch) diagnostics and
//! superseded transitions only as trace events.

use alloc::vec::Vec;
use core::fmt;
use core::slice;

use crate::region::{ContainerId, IdentityKey, RegionId};

/// Two explicit container scopes have intersecting bounding volumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerOverlapError {
    /// The container declared first (lower id).
    pub first: ContainerId,
    /// The other container.
    pub second: ContainerId,
    /// Every region in either container, in declaration order.
    pub regions: Vec<RegionId>,
}

impl fmt::Display for ContainerOverlapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "container {} overlaps container {} ({} regions)",
            self.first.0,
            self.second.0,
            self.regions.len()
        )
    }
}

impl core::error::Error for ContainerOverlapError {}

/// Errors that abort a compositor pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickError {
    /// Two explicit container scopes overlap.
    ContainerOverlap(ContainerOverlapError),
    /// More than one declaration used the same identity key.
    DuplicateIdentity(IdentityKey),
    /// A declaration had non-finite or negative-size geometry, or an invalid
    /// spacing override.
    InvalidGeometry(IdentityKey),
}

impl TickError {
    /// The region ids the caller needs to fix.
    #[must_use]
    pub fn offending_regions(&self) -> &[RegionId] {
        match self {
            Self::ContainerOverlap(e) => &e.regions,
            Self::DuplicateIdentity(key) | Self::InvalidGeometry(key) => {
                slice::from_ref(&key.region)
            }
        }
    }
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainerOverlap(e) => write!(f, "{e}"),
            Self::DuplicateIdentity(key) => {
                write!(f, "identity {key:?} declared more than once")
            }
            Self::InvalidGeometry(key) => write!(f, "region {key:?} has invalid geometry"),
        }
    }
}

impl core::error::Error for TickError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::ContainerOverlap(e) => Some(e),
            Self::DuplicateIdentity(_) | Self::InvalidGeometry(_) => None,
        }
    }
}

impl From<ContainerOverlapError> for TickError {
    fn from(e: ContainerOverlapError) -> Self {
        Self::ContainerOverlap(e)
    }
}
